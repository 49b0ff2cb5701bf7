//! The token source: a lazy lexer over the input with a queue of tokens spliced in front of
//! it by macro expansion and argument handling.
use std::{borrow::Cow, collections::VecDeque, fmt};

use crate::{attribute::Dimension, node::Span};

use super::{
    error::{ErrorKind, InnerResult},
    lex, tables,
};

/// A lexical unit of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_control_sequence(&self, name: &str) -> bool {
        matches!(self.kind, TokenKind::ControlSequence(cs) if cs == name)
    }

    pub fn is_char(&self, c: char) -> bool {
        self.kind == TokenKind::Character(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// `\name`, without the backslash. Empty for a backslash ending the input.
    ControlSequence(&'a str),
    Character(char),
    BeginGroup,
    EndGroup,
    /// A run of whitespace.
    Space,
    /// `#n` inside a macro body.
    Parameter(u8),
    /// Start of a re-injected argument.
    BeginArgument,
    /// End of a re-injected argument.
    EndArgument,
}

impl TokenKind<'_> {
    /// Control words swallow the spaces after them, so a letter following one must be
    /// separated when the tokens are spelled back.
    fn is_control_word(&self) -> bool {
        matches!(self, TokenKind::ControlSequence(cs) if cs.starts_with(|c: char| c.is_ascii_alphabetic()))
    }
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ControlSequence(cs) => write!(f, "\\{cs}"),
            TokenKind::Character(c) => write!(f, "{c}"),
            TokenKind::BeginGroup => f.write_str("{"),
            TokenKind::EndGroup => f.write_str("}"),
            TokenKind::Space => f.write_str(" "),
            TokenKind::Parameter(n) => write!(f, "#{n}"),
            TokenKind::BeginArgument | TokenKind::EndArgument => Ok(()),
        }
    }
}

/// Spell a token list back into markup.
pub(crate) fn spell(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut previous: Option<TokenKind<'_>> = None;
    for token in tokens {
        if let (Some(prev), TokenKind::Character(c)) = (previous, token.kind) {
            if prev.is_control_word() && c.is_ascii_alphabetic() {
                out.push(' ');
            }
        }
        out.push_str(&token.kind.to_string());
        previous = Some(token.kind);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Math,
    Text,
}

/// Cursor over the input.
///
/// Tokens are lexed on demand. Tokens pushed back or spliced in by expansions are served
/// first, from the front of the queue.
pub(crate) struct TokenSource<'a> {
    input: &'a str,
    offset: usize,
    pending: VecDeque<Token<'a>>,
    modes: Vec<Mode>,
}

impl<'a> TokenSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            pending: VecDeque::new(),
            modes: vec![Mode::Math],
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Math)
    }

    pub fn push_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    pub fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            self.modes.pop();
        }
    }

    /// The next token, whitespace included.
    pub fn next_raw(&mut self) -> Option<Token<'a>> {
        self.pending.pop_front().or_else(|| self.lex())
    }

    /// The next token. Whitespace is skipped in math mode.
    pub fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let token = self.next_raw()?;
            if token.kind != TokenKind::Space || self.mode() == Mode::Text {
                return Some(token);
            }
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<Token<'a>> {
        let token = self.next()?;
        self.pending.push_front(token);
        Some(token)
    }

    /// Look at the next token, whitespace included.
    pub fn peek_raw(&mut self) -> Option<Token<'a>> {
        let token = self.next_raw()?;
        self.pending.push_front(token);
        Some(token)
    }

    /// The next character, if the next token is one.
    pub fn peek_char(&mut self) -> Option<char> {
        match self.peek()?.kind {
            TokenKind::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn push_back(&mut self, token: Token<'a>) {
        self.pending.push_front(token);
    }

    /// Put `tokens` in front of everything else, keeping their order.
    pub fn prepend<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token<'a>>,
        I::IntoIter: DoubleEndedIterator,
    {
        for token in tokens.into_iter().rev() {
            self.pending.push_front(token);
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The upcoming text as a string: the plain characters of the queue followed by the
    /// raw input, if the whole queue could be spelled.
    ///
    /// Used by the number and dimension matchers, which work on text.
    pub fn lookahead_text(&self) -> Cow<'a, str> {
        let rest = &self.input[self.offset..];
        if self.pending.is_empty() {
            return Cow::Borrowed(rest);
        }
        let mut text = String::new();
        for token in &self.pending {
            match token.kind {
                TokenKind::Character(c) => text.push(c),
                TokenKind::BeginGroup => text.push('{'),
                TokenKind::EndGroup => text.push('}'),
                TokenKind::Space => text.push(' '),
                _ => return Cow::Owned(text),
            }
        }
        text.push_str(rest);
        Cow::Owned(text)
    }

    /// Consume `n` bytes of what [`lookahead_text`](Self::lookahead_text) returned.
    ///
    /// Returns the span of the consumed text.
    pub fn consume_bytes(&mut self, mut n: usize) -> Span {
        let mut span: Option<Span> = None;
        while n > 0 {
            let Some(token) = self.pending.front().copied() else {
                break;
            };
            let len = match token.kind {
                TokenKind::Character(c) => c.len_utf8(),
                _ => 1,
            };
            self.pending.pop_front();
            n = n.saturating_sub(len);
            span = Some(span.map_or(token.span, |s| s.to(token.span)));
        }
        if n > 0 {
            let end = (self.offset + n).min(self.input.len());
            let raw = Span::new(self.offset, end);
            self.offset = end;
            span = Some(span.map_or(raw, |s| s.to(raw)));
        }
        span.unwrap_or(Span::new(self.offset, self.offset))
    }

    /// The next token that is not whitespace, in any mode.
    pub fn next_significant(&mut self) -> Option<Token<'a>> {
        loop {
            let token = self.next_raw()?;
            if token.kind != TokenKind::Space {
                return Some(token);
            }
        }
    }

    /// Read a mandatory argument: the content of a balanced group, or a single token.
    pub fn read_argument(&mut self, name: &str) -> InnerResult<Vec<Token<'a>>> {
        let Some(token) = self.next_significant() else {
            return Err(ErrorKind::MissingArgument(name.into()));
        };
        match token.kind {
            TokenKind::BeginGroup => self.read_group(),
            TokenKind::EndGroup => Err(ErrorKind::ExtraCloseMissingOpen),
            TokenKind::BeginArgument | TokenKind::EndArgument => {
                self.push_back(token);
                Err(ErrorKind::MissingArgument(name.into()))
            }
            _ => Ok(vec![token]),
        }
    }

    /// Read up to the brace closing an already consumed `{`.
    pub fn read_group(&mut self) -> InnerResult<Vec<Token<'a>>> {
        let mut depth = 0usize;
        let mut tokens = Vec::new();
        loop {
            let token = self.next_raw().ok_or(ErrorKind::MissingCloseBrace)?;
            match token.kind {
                TokenKind::BeginGroup => depth += 1,
                TokenKind::EndGroup if depth == 0 => return Ok(tokens),
                TokenKind::EndGroup => depth -= 1,
                TokenKind::EndArgument => {
                    self.push_back(token);
                    return Err(ErrorKind::MissingCloseBrace);
                }
                _ => {}
            }
            tokens.push(token);
        }
    }

    /// Read an optional argument in brackets, if the next token opens one.
    pub fn read_optional(&mut self, name: &str) -> InnerResult<Option<Vec<Token<'a>>>> {
        match self.peek_significant() {
            Some(token) if token.is_char('[') => {
                self.next_significant();
            }
            _ => return Ok(None),
        }
        let mut depth = 0usize;
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_raw() else {
                return Err(ErrorKind::MissingCloseBracket(name.into()));
            };
            match token.kind {
                TokenKind::Character(']') if depth == 0 => return Ok(Some(tokens)),
                TokenKind::BeginGroup => depth += 1,
                TokenKind::EndGroup if depth == 0 => {
                    return Err(ErrorKind::ExtraCloseLooking("']'".into()))
                }
                TokenKind::EndGroup => depth -= 1,
                TokenKind::EndArgument => {
                    self.push_back(token);
                    return Err(ErrorKind::MissingCloseBracket(name.into()));
                }
                _ => {}
            }
            tokens.push(token);
        }
    }

    /// Read the tokens before the control sequence `\target`, which is consumed.
    pub fn read_up_to(&mut self, name: &str, target: &str) -> InnerResult<Vec<Token<'a>>> {
        let mut depth = 0usize;
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_raw() else {
                return Err(ErrorKind::TokenNotFound(
                    format!("\\{target}").into(),
                    name.into(),
                ));
            };
            match token.kind {
                TokenKind::ControlSequence(cs) if depth == 0 && cs == target => {
                    return Ok(tokens)
                }
                TokenKind::BeginGroup => depth += 1,
                TokenKind::EndGroup if depth == 0 => {
                    return Err(ErrorKind::ExtraCloseLooking(format!("\\{target}").into()))
                }
                TokenKind::EndGroup => depth -= 1,
                TokenKind::EndArgument => {
                    self.push_back(token);
                    return Err(ErrorKind::TokenNotFound(
                        format!("\\{target}").into(),
                        name.into(),
                    ));
                }
                _ => {}
            }
            tokens.push(token);
        }
    }

    /// Read a delimiter after `\left`, `\big`, ... An empty string is the null delimiter.
    pub fn read_delimiter(&mut self, name: &str) -> InnerResult<&'static str> {
        let delimiter = self.next_significant().and_then(|token| match token.kind {
            TokenKind::Character(c) => tables::char_delimiter(c),
            TokenKind::ControlSequence(cs) => tables::control_sequence_delimiter_map(cs),
            _ => None,
        });
        delimiter.ok_or_else(|| ErrorKind::MissingOrUnrecognizedDelimiter(name.into()))
    }

    /// Read a dimension, either braced or straight from the input, e.g. `\kern-2pt`.
    pub fn read_dimension(&mut self, name: &str) -> InnerResult<Dimension> {
        let missing = || ErrorKind::MissingDimension(name.into());
        if self.peek_significant().map(|t| t.kind) == Some(TokenKind::BeginGroup) {
            self.next_significant();
            let tokens = self.read_group()?;
            return lex::full_dimension(&spell(&tokens)).ok_or_else(missing);
        }
        let text = self.lookahead_text();
        let mut rest = &*text;
        let dimension = lex::dimension(&mut rest).ok_or_else(missing)?;
        let used = text.len() - rest.len();
        self.consume_bytes(used);
        Ok(dimension)
    }

    /// Read glue such as `3pt plus 1fil`, keeping only its natural width.
    pub fn read_glue(&mut self, name: &str) -> InnerResult<Dimension> {
        if self.peek_significant().map(|t| t.kind) == Some(TokenKind::BeginGroup) {
            return self.read_dimension(name);
        }
        let text = self.lookahead_text();
        let mut rest = &*text;
        let (natural, _, _) =
            lex::glue(&mut rest).ok_or_else(|| ErrorKind::MissingDimension(name.into()))?;
        let used = text.len() - rest.len();
        self.consume_bytes(used);
        Ok(natural)
    }

    fn peek_significant(&mut self) -> Option<Token<'a>> {
        let token = self.next_significant()?;
        self.push_back(token);
        Some(token)
    }

    fn lex(&mut self) -> Option<Token<'a>> {
        loop {
            let rest = &self.input[self.offset..];
            let c = rest.chars().next()?;
            let start = self.offset;
            let (kind, len) = match c {
                '\\' => {
                    let after = &rest[1..];
                    match after.chars().next() {
                        None => (TokenKind::ControlSequence(""), 1),
                        Some(a) if a.is_ascii_alphabetic() => {
                            let name_len = after
                                .bytes()
                                .take_while(|b| b.is_ascii_alphabetic())
                                .count();
                            let name = &after[..name_len];
                            let mut len = 1 + name_len;
                            if self.mode() == Mode::Math {
                                len += after[name_len..]
                                    .chars()
                                    .take_while(|c| c.is_whitespace())
                                    .map(char::len_utf8)
                                    .sum::<usize>();
                            }
                            (TokenKind::ControlSequence(name), len)
                        }
                        Some(a) => (
                            TokenKind::ControlSequence(&after[..a.len_utf8()]),
                            1 + a.len_utf8(),
                        ),
                    }
                }
                '{' => (TokenKind::BeginGroup, 1),
                '}' => (TokenKind::EndGroup, 1),
                '%' => {
                    let skip = rest.find('\n').map_or(rest.len(), |i| i + 1);
                    self.offset += skip;
                    continue;
                }
                c if c.is_whitespace() => {
                    let len = rest
                        .chars()
                        .take_while(|c| c.is_whitespace())
                        .map(char::len_utf8)
                        .sum();
                    (TokenKind::Space, len)
                }
                c => (TokenKind::Character(c), c.len_utf8()),
            };
            self.offset += len;
            return Some(Token::new(kind, Span::new(start, start + len)));
        }
    }
}
