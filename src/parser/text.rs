//! Text boxes: the argument of `\text`, `\mbox`, ... is a run of text with embedded math,
//! delimited by `$..$` or `\(..\)`.
use super::{
    error::{ErrorKind, InnerResult},
    source::{Token, TokenKind},
};

const NBSP: char = '\u{A0}';

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Part<'a> {
    /// Text ready for an `mtext`, with its outer whitespace made non-breaking.
    Text(String),
    Math(Vec<Token<'a>>),
}

/// Split the tokens of a text box argument into text and math.
pub(super) fn split<'a>(tokens: &[Token<'a>]) -> InnerResult<Vec<Part<'a>>> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut iter = tokens.iter().copied();
    while let Some(token) = iter.next() {
        let math_end = match token.kind {
            TokenKind::Character('$') => Some(Closing::Dollar),
            TokenKind::ControlSequence("(") => Some(Closing::Paren),
            _ => None,
        };
        if let Some(closing) = math_end {
            push_text(&mut parts, &mut text);
            parts.push(Part::Math(read_math(&mut iter, closing)?));
            continue;
        }
        match token.kind {
            TokenKind::ControlSequence(cs @ ("\\" | "$" | "{" | "}" | " ")) => text.push_str(cs),
            TokenKind::BeginGroup | TokenKind::EndGroup => {}
            TokenKind::BeginArgument | TokenKind::EndArgument => {}
            kind => text.push_str(&kind.to_string()),
        }
    }
    push_text(&mut parts, &mut text);
    Ok(parts)
}

#[derive(Clone, Copy)]
enum Closing {
    Dollar,
    Paren,
}

fn read_math<'a>(
    iter: &mut impl Iterator<Item = Token<'a>>,
    closing: Closing,
) -> InnerResult<Vec<Token<'a>>> {
    let mut depth = 0usize;
    let mut math = Vec::new();
    for token in iter {
        match (token.kind, closing) {
            (TokenKind::Character('$'), Closing::Dollar) if depth == 0 => return Ok(math),
            (TokenKind::ControlSequence(")"), Closing::Paren) if depth == 0 => return Ok(math),
            (TokenKind::BeginGroup, _) => depth += 1,
            (TokenKind::EndGroup, _) => depth = depth.saturating_sub(1),
            _ => {}
        }
        math.push(token);
    }
    Err(ErrorKind::MathNotTerminated)
}

fn push_text(parts: &mut Vec<Part<'_>>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let raw = std::mem::take(text);
    let trimmed_start = raw.trim_start();
    let mut out = String::with_capacity(raw.len());
    if trimmed_start.len() != raw.len() {
        out.push(NBSP);
    }
    let inner = trimmed_start.trim_end();
    out.push_str(inner);
    if inner.len() != trimmed_start.len() && !inner.is_empty() {
        out.push(NBSP);
    }
    parts.push(Part::Text(out));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source::{Mode, TokenSource};

    fn text_tokens(input: &str) -> Vec<Token<'_>> {
        let mut source = TokenSource::new(input);
        source.push_mode(Mode::Text);
        std::iter::from_fn(|| source.next_raw()).collect()
    }

    fn texts(parts: &[Part<'_>]) -> Vec<String> {
        parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => text.clone(),
                Part::Math(tokens) => format!("${}$", crate::parser::source::spell(tokens)),
            })
            .collect()
    }

    #[test]
    fn text_and_math() {
        let parts = split(&text_tokens("c$d$e")).unwrap();
        assert_eq!(texts(&parts), ["c", "$d$", "e"]);
        let parts = split(&text_tokens(r"aa \(\frac{a}{b}\) bb")).unwrap();
        assert_eq!(texts(&parts), ["aa\u{A0}", r"$\frac{a}{b}$", "\u{A0}bb"]);
    }

    #[test]
    fn outer_whitespace() {
        let parts = split(&text_tokens(" b ")).unwrap();
        assert_eq!(texts(&parts), ["\u{A0}b\u{A0}"]);
        let parts = split(&text_tokens(" ")).unwrap();
        assert_eq!(texts(&parts), ["\u{A0}"]);
    }

    #[test]
    fn escapes() {
        let parts = split(&text_tokens(r"aa \\ bb \$")).unwrap();
        assert_eq!(texts(&parts), [r"aa \ bb $"]);
    }

    #[test]
    fn braces_in_math() {
        let parts = split(&text_tokens("${a$b}$")).unwrap();
        assert_eq!(texts(&parts), ["${a$b}$"]);
        assert_eq!(
            split(&text_tokens("a$b")).unwrap_err(),
            ErrorKind::MathNotTerminated
        );
    }
}
