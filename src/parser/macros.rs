//! User macros: `\def`, `\let` and `\newcommand`, and the expansion of macro templates.
//!
//! Definitions live for the duration of a parse. Their token lists are allocated in the
//! parser [`Storage`](super::Storage), so that expansions can hand out tokens borrowing
//! it for as long as the input.
use fxhash::FxHashMap;

use crate::{
    node::Span,
    registry::{MacroTemplate, MacroToken},
};

use super::{
    error::{ErrorKind, InnerResult},
    source::{Token, TokenKind, TokenSource},
};

#[derive(Debug, Default)]
pub(crate) struct MacroContext<'a> {
    definitions: FxHashMap<&'a str, Definition<'a>>,
}

impl<'a> MacroContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro from its parameter text and replacement text (TeXbook ch. 20).
    ///
    /// The parameter text is everything between the name and the opening brace of the
    /// body. It ends with `#` when the last argument is delimited by that brace.
    pub fn define(
        &mut self,
        name: &'a str,
        parameter_text: &[Token<'a>],
        replacement_text: &[Token<'a>],
        storage: &'a bumpalo::Bump,
    ) -> InnerResult<()> {
        let display_name = || format!("\\{name}").into_boxed_str();
        let mut tokens = parameter_text
            .iter()
            .filter(|t| t.kind != TokenKind::Space)
            .peekable();

        let mut prefix = Vec::new();
        while let Some(token) = tokens.next_if(|t| !t.is_char('#')) {
            prefix.push(*token);
        }

        let mut parameters: Vec<Option<&'a [Token<'a>]>> = Vec::new();
        let mut last_param_brace_delimited = false;
        while tokens.next().is_some() {
            let index = match tokens.next().map(|t| t.kind) {
                Some(TokenKind::Character(d @ '1'..='9')) => d as u8 - b'0',
                None => {
                    last_param_brace_delimited = true;
                    break;
                }
                _ => return Err(ErrorKind::SequentialParameters(display_name())),
            };
            if index as usize != parameters.len() + 1 {
                return Err(ErrorKind::SequentialParameters(display_name()));
            }
            let mut delimiter = Vec::new();
            while let Some(token) = tokens.next_if(|t| !t.is_char('#')) {
                delimiter.push(*token);
            }
            parameters.push(if delimiter.is_empty() {
                None
            } else {
                Some(storage.alloc_slice_copy(&delimiter))
            });
        }

        let replacement = parse_replacement_text(replacement_text, parameters.len() as u8)?;
        self.definitions.insert(
            name,
            Definition::Macro(MacroDef {
                prefix: (!prefix.is_empty()).then(|| &*storage.alloc_slice_copy(&prefix)),
                parameters,
                last_param_brace_delimited,
                replacement: storage.alloc_slice_copy(&replacement),
            }),
        );
        Ok(())
    }

    /// Assign a control sequence to a token. A user macro is copied, so that redefining it
    /// later leaves the alias alone.
    pub fn assign(&mut self, name: &'a str, alias_for: Token<'a>) {
        let definition = match alias_for.kind {
            TokenKind::ControlSequence(cs) => self.definitions.get(cs).cloned(),
            _ => None,
        };
        self.definitions
            .insert(name, definition.unwrap_or(Definition::Alias(alias_for)));
    }

    /// `\newcommand`: the optional argument counts in `argument_count`.
    pub fn insert_command(
        &mut self,
        name: &'a str,
        argument_count: u8,
        optional_argument: Option<&[Token<'a>]>,
        replacement: &[Token<'a>],
        storage: &'a bumpalo::Bump,
    ) -> InnerResult<()> {
        let replacement = parse_replacement_text(replacement, argument_count)?;
        self.definitions.insert(
            name,
            Definition::Command(CommandDef {
                argument_count,
                optional_argument: optional_argument.map(|o| &*storage.alloc_slice_copy(o)),
                replacement: storage.alloc_slice_copy(&replacement),
            }),
        );
        Ok(())
    }

    /// Expand the user macro `name`, reading its arguments from `source` and putting the
    /// expansion in front of it. Returns `None` if there is no such macro.
    pub fn try_expand_in(
        &self,
        name: &str,
        call: Span,
        source: &mut TokenSource<'a>,
    ) -> Option<InnerResult<()>> {
        let definition = self.definitions.get(name)?;
        Some(expand_definition_in(name, definition, call, source))
    }
}

fn expand_definition_in<'a>(
    name: &str,
    definition: &Definition<'a>,
    call: Span,
    source: &mut TokenSource<'a>,
) -> InnerResult<()> {
    let display_name = format!("\\{name}");
    let expansion = match definition {
        Definition::Macro(MacroDef {
            prefix,
            parameters,
            last_param_brace_delimited,
            replacement,
        }) => {
            if let Some(prefix) = prefix {
                for expected in prefix.iter() {
                    match source.next_significant() {
                        Some(token) if token.kind == expected.kind => {}
                        _ => return Err(ErrorKind::MismatchedDefinition(display_name.into())),
                    }
                }
            }
            let mut arguments = Vec::with_capacity(parameters.len());
            for (index, parameter) in parameters.iter().enumerate() {
                let last = index + 1 == parameters.len();
                let argument = match parameter {
                    Some(delimiter) => {
                        let argument = read_delimited(source, &display_name, delimiter)?;
                        if last && *last_param_brace_delimited {
                            expect_brace(source, &display_name)?;
                        }
                        argument
                    }
                    None if last && *last_param_brace_delimited => {
                        read_until_brace(source, &display_name)?
                    }
                    None => source.read_argument(&display_name)?,
                };
                arguments.push(argument);
            }
            substitute(replacement.iter().copied(), &arguments, call)
        }
        Definition::Command(CommandDef {
            argument_count,
            optional_argument,
            replacement,
        }) => {
            let arguments = read_command_arguments(
                source,
                &display_name,
                *argument_count,
                optional_argument.map(|o| o.to_vec()),
            )?;
            substitute(replacement.iter().copied(), &arguments, call)
        }
        Definition::Alias(token) => vec![Token::new(token.kind, call)],
    };
    source.prepend(expansion);
    Ok(())
}

/// Expand a macro template from the registry.
pub(crate) fn expand_template<'a>(
    name: &str,
    template: &'a MacroTemplate,
    call: Span,
    source: &mut TokenSource<'a>,
) -> InnerResult<()> {
    let display_name = format!("\\{name}");
    let default = template
        .default
        .as_deref()
        .map(|tokens| tokens.iter().map(|t| template_token(t, call)).collect());
    let arguments = read_command_arguments(source, &display_name, template.arity, default)?;
    let body = template.body.iter().map(|t| template_token(t, call));
    let expansion = substitute(body, &arguments, call);
    source.prepend(expansion);
    Ok(())
}

fn template_token(token: &MacroToken, span: Span) -> Token<'_> {
    let kind = match token {
        MacroToken::ControlSequence(cs) => TokenKind::ControlSequence(cs),
        MacroToken::Character(c) => TokenKind::Character(*c),
        MacroToken::BeginGroup => TokenKind::BeginGroup,
        MacroToken::EndGroup => TokenKind::EndGroup,
        MacroToken::Space => TokenKind::Space,
        MacroToken::Parameter(n) => TokenKind::Parameter(*n),
    };
    Token::new(kind, span)
}

fn read_command_arguments<'a>(
    source: &mut TokenSource<'a>,
    name: &str,
    argument_count: u8,
    optional_argument: Option<Vec<Token<'a>>>,
) -> InnerResult<Vec<Vec<Token<'a>>>> {
    let mut arguments = Vec::with_capacity(argument_count as usize);
    let mut mandatory = argument_count;
    if let Some(default) = optional_argument {
        arguments.push(source.read_optional(name)?.unwrap_or(default));
        mandatory = mandatory.saturating_sub(1);
    }
    for _ in 0..mandatory {
        arguments.push(source.read_argument(name)?);
    }
    Ok(arguments)
}

/// Read an argument delimited by `delimiter`, at brace depth zero.
///
/// The braces of an argument made of a single group are stripped.
fn read_delimited<'a>(
    source: &mut TokenSource<'a>,
    name: &str,
    delimiter: &[Token<'a>],
) -> InnerResult<Vec<Token<'a>>> {
    let runaway = || ErrorKind::RunawayArgument(name.into());
    let mut argument: Vec<Token<'a>> = Vec::new();
    let mut depth = 0usize;
    let mut matched = 0usize;
    loop {
        let token = source.next_raw().ok_or_else(runaway)?;
        match token.kind {
            TokenKind::Space => {
                if matched == 0 {
                    argument.push(token);
                }
                continue;
            }
            TokenKind::EndArgument => {
                source.push_back(token);
                return Err(runaway());
            }
            _ => {}
        }
        if depth == 0 && token.kind == delimiter[matched].kind {
            matched += 1;
            if matched == delimiter.len() {
                break;
            }
            continue;
        }
        if matched > 0 {
            // Partial match: the consumed delimiter tokens belong to the argument.
            argument.extend_from_slice(&delimiter[..matched]);
            matched = 0;
            if depth == 0 && token.kind == delimiter[0].kind {
                matched = 1;
                continue;
            }
        }
        match token.kind {
            TokenKind::BeginGroup => depth += 1,
            TokenKind::EndGroup if depth == 0 => return Err(runaway()),
            TokenKind::EndGroup => depth -= 1,
            _ => {}
        }
        argument.push(token);
    }
    Ok(strip_braces(argument))
}

fn read_until_brace<'a>(source: &mut TokenSource<'a>, name: &str) -> InnerResult<Vec<Token<'a>>> {
    let mut argument = Vec::new();
    loop {
        match source.next_raw() {
            Some(token) if token.kind == TokenKind::BeginGroup => {
                source.push_back(token);
                return Ok(argument);
            }
            Some(token) if !matches!(token.kind, TokenKind::EndGroup | TokenKind::EndArgument) => {
                argument.push(token)
            }
            Some(token) => {
                source.push_back(token);
                return Err(ErrorKind::RunawayArgument(name.into()));
            }
            None => return Err(ErrorKind::RunawayArgument(name.into())),
        }
    }
}

fn expect_brace(source: &mut TokenSource<'_>, name: &str) -> InnerResult<()> {
    match source.next_significant() {
        Some(token) if token.kind == TokenKind::BeginGroup => {
            source.push_back(token);
            Ok(())
        }
        _ => Err(ErrorKind::MismatchedDefinition(name.into())),
    }
}

fn strip_braces(mut argument: Vec<Token<'_>>) -> Vec<Token<'_>> {
    while argument.last().is_some_and(|t| t.kind == TokenKind::Space) {
        argument.pop();
    }
    let is_single_group = argument.first().map(|t| t.kind) == Some(TokenKind::BeginGroup)
        && argument.last().map(|t| t.kind) == Some(TokenKind::EndGroup)
        && {
            let mut depth = 0usize;
            argument[..argument.len() - 1].iter().enumerate().all(|(i, t)| {
                match t.kind {
                    TokenKind::BeginGroup => depth += 1,
                    TokenKind::EndGroup => depth -= 1,
                    _ => {}
                }
                i == 0 || depth > 0
            })
        };
    if is_single_group {
        argument.pop();
        argument.remove(0);
    }
    argument
}

/// Turn `#n` into parameters and `##` into `#`.
fn parse_replacement_text<'a>(
    replacement_text: &[Token<'a>],
    parameter_count: u8,
) -> InnerResult<Vec<Token<'a>>> {
    let mut tokens = replacement_text.iter().copied().peekable();
    let mut replacement = Vec::with_capacity(replacement_text.len());
    while let Some(token) = tokens.next() {
        if !token.is_char('#') {
            replacement.push(token);
            continue;
        }
        match tokens.next() {
            Some(next) if next.is_char('#') => replacement.push(next),
            Some(Token {
                kind: TokenKind::Character(d @ '1'..='9'),
                span,
            }) if (d as u8 - b'0') <= parameter_count => replacement.push(Token::new(
                TokenKind::Parameter(d as u8 - b'0'),
                token.span.to(span),
            )),
            _ => return Err(ErrorKind::IllegalParameterReference),
        }
    }
    Ok(replacement)
}

/// Replace parameters with their arguments. Every token takes the span of the call.
fn substitute<'a, I>(replacement: I, arguments: &[Vec<Token<'a>>], call: Span) -> Vec<Token<'a>>
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut expansion = Vec::new();
    for token in replacement {
        match token.kind {
            TokenKind::Parameter(n) => {
                if let Some(argument) = arguments.get(n as usize - 1) {
                    expansion.extend(argument.iter().map(|t| Token::new(t.kind, call)));
                }
            }
            kind => expansion.push(Token::new(kind, call)),
        }
    }
    expansion
}

#[derive(Debug, Clone)]
struct MacroDef<'a> {
    prefix: Option<&'a [Token<'a>]>,
    /// The delimiter following each parameter, if any.
    parameters: Vec<Option<&'a [Token<'a>]>>,
    last_param_brace_delimited: bool,
    replacement: &'a [Token<'a>],
}

#[derive(Debug, Clone)]
struct CommandDef<'a> {
    argument_count: u8,
    optional_argument: Option<&'a [Token<'a>]>,
    replacement: &'a [Token<'a>],
}

#[derive(Debug, Clone)]
enum Definition<'a> {
    Macro(MacroDef<'a>),
    Alias(Token<'a>),
    Command(CommandDef<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source::spell;

    fn lex(input: &str) -> Vec<Token<'_>> {
        let mut source = TokenSource::new(input);
        std::iter::from_fn(|| source.next_raw()).collect()
    }

    fn definition<'c, 'a>(ctx: &'c MacroContext<'a>, name: &str) -> &'c MacroDef<'a> {
        match ctx.definitions.get(name) {
            Some(Definition::Macro(def)) => def,
            other => panic!("not a macro: {other:?}"),
        }
    }

    fn expand<'a>(ctx: &MacroContext<'a>, name: &str, rest: &'a str) -> String {
        let mut source = TokenSource::new(rest);
        ctx.try_expand_in(name, Span::default(), &mut source)
            .expect("macro is defined")
            .expect("expansion succeeds");
        let tokens: Vec<_> = std::iter::from_fn(|| source.next_raw()).collect();
        spell(&tokens)
    }

    #[test]
    fn no_params() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.define("foo", &[], &lex(r"\this {} is a ## test"), &storage)
            .unwrap();

        let def = definition(&ctx, "foo");
        assert_eq!(def.prefix, None);
        assert!(def.parameters.is_empty());
        assert_eq!(spell(def.replacement), r"\this{} is a # test");
        assert_eq!(expand(&ctx, "foo", "x"), r"\this{} is a # testx");
    }

    #[test]
    fn with_params() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.define(
            "foo",
            &lex("this#1test#2. should #"),
            &lex(r"\this {} is a ## test#1"),
            &storage,
        )
        .unwrap();

        let def = definition(&ctx, "foo");
        assert_eq!(def.prefix.map(spell).as_deref(), Some("this"));
        let delimiters: Vec<_> = def.parameters.iter().map(|p| p.map(spell)).collect();
        assert_eq!(
            delimiters,
            vec![Some("test".to_owned()), Some(".should".to_owned())]
        );
        assert!(def.last_param_brace_delimited);
        assert_eq!(
            def.replacement.last().map(|t| t.kind),
            Some(TokenKind::Parameter(1))
        );
    }

    // TeXbook exercise 20.7:
    // \def\cs AB#1#2C$#3\$ {#3{ab#1}#1 c##\x #2}
    #[test]
    fn texbook() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.define("cs", &lex(r"AB#1#2C$#3\$ "), &lex(r"#3{ab#1}#1 c##\x #2"), &storage)
            .unwrap();

        let def = definition(&ctx, "cs");
        assert_eq!(def.prefix.map(spell).as_deref(), Some("AB"));
        let delimiters: Vec<_> = def.parameters.iter().map(|p| p.map(spell)).collect();
        assert_eq!(
            delimiters,
            vec![None, Some("C$".to_owned()), Some(r"\$".to_owned())]
        );
        assert_eq!(
            expand(&ctx, "cs", r"AB {\Look}C${And\$ }{look}\$ 5"),
            r"{And\$ }{look}{ab\Look}\Look c#\x 5"
        );
    }

    #[test]
    fn brace_delim_no_text() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.define("foo", &lex("#"), &lex("2 + 2 = 4"), &storage)
            .unwrap();

        let def = definition(&ctx, "foo");
        assert_eq!(def.prefix, None);
        assert!(def.parameters.is_empty());
        assert!(def.last_param_brace_delimited);
    }

    #[test]
    fn parameter_errors() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        assert_eq!(
            ctx.define("foo", &lex("#2"), &lex("#2"), &storage),
            Err(ErrorKind::SequentialParameters(r"\foo".into()))
        );
        assert_eq!(
            ctx.define("foo", &lex("#1"), &lex("#2"), &storage),
            Err(ErrorKind::IllegalParameterReference)
        );
        assert!(!ctx.definitions.contains_key("foo"));
    }

    #[test]
    fn commands_and_aliases() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.insert_command("pair", 2, Some(&lex("0")), &lex("(#1,#2)"), &storage)
            .unwrap();
        assert_eq!(expand(&ctx, "pair", "[a]b"), "(a,b)");
        assert_eq!(expand(&ctx, "pair", "{b}"), "(0,b)");

        let alias = lex(r"\pair")[0];
        ctx.assign("copy", alias);
        ctx.insert_command("pair", 0, None, &lex("x"), &storage)
            .unwrap();
        assert_eq!(expand(&ctx, "copy", "{b}"), "(0,b)");

        ctx.assign("plus", lex("+")[0]);
        assert_eq!(expand(&ctx, "plus", "1"), "+1");
    }

    #[test]
    fn mismatched_prefix() {
        let storage = bumpalo::Bump::new();
        let mut ctx = MacroContext::new();
        ctx.define("foo", &lex("AB#1"), &lex("#1"), &storage).unwrap();
        let mut source = TokenSource::new("AC");
        assert_eq!(
            ctx.try_expand_in("foo", Span::default(), &mut source),
            Some(Err(ErrorKind::MismatchedDefinition(r"\foo".into())))
        );
    }
}
