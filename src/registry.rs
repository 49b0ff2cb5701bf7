//! The command and environment tables consulted by the parser.
//!
//! A [`Registry`] maps names to [`Descriptor`]s. Built-in commands name one of the closed set
//! of [`Handler`]s, each carrying its fixed payload, while macros carry a pre-tokenized
//! template which the parser splices into its input. Registries are filled by
//! [`Package`]s when a [`Configuration`](crate::Configuration) is built, and never change
//! afterwards.

use fxhash::FxHashMap;

use crate::{
    attribute::Font,
    config::OptionValue,
    node::TexClass,
    parser::source::{TokenKind, TokenSource},
};

/// What a name stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Builtin(Handler),
    Macro(MacroTemplate),
}

/// The built-in behaviours a command or environment can be bound to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handler {
    /// An `mi`, optionally in a fixed variant (upright Greek capitals, `\infty`).
    Identifier(&'static str, Option<Font>),
    /// An `mo` with extra attributes.
    Operator(&'static str, &'static [(&'static str, &'static str)]),
    /// An `mtext`.
    TextSymbol(&'static str),
    /// A function name such as `\sin`, followed by an invisible function application.
    NamedFn(&'static str),
    /// An operator name such as `\lim`. Movable operators put their limits under and over.
    NamedOp(&'static str, bool),
    /// `\rm`, `\bf`, ...: switch the font for the rest of the group.
    SetFont(Font),
    /// `\mathrm{..}`, ...: typeset the argument in a font. `None` restores the default.
    MathFont(Option<Font>),
    BoldSymbol,
    /// A font whose weight depends on the `bbm.bold` option and `\mathversion`.
    BbmFont { regular: Font, bold: Font },
    MathVersion,
    SetStyle { display: bool, level: u8 },
    /// `\tiny` to `\Huge`, as a scale factor.
    SetSize(f32),
    /// `\mathord{..}` and friends.
    TexAtom(TexClass),
    /// A fixed space, in ems.
    Spacer(f32),
    /// `\hskip`, `\kern`, ...: a space read from the input.
    Hskip { nobreak: bool },
    Frac,
    Sqrt,
    Root,
    /// `\leftroot` (`true`) or `\uproot` (`false`).
    MoveRoot { left: bool },
    Over(OverStyle),
    BuildRel,
    Left,
    Right,
    Middle,
    /// `\big(`, `\Bigl(`, ...
    BigDelim { class: TexClass, size: f32 },
    Accent { text: &'static str, stretchy: bool },
    UnderOver {
        text: &'static str,
        over: bool,
        accent: bool,
        stack: bool,
    },
    /// `\overset`, `\underset`, `\stackrel`.
    Set { over: bool, class: Option<TexClass> },
    Phantom { vertical: bool, horizontal: bool },
    Smash,
    Lap { left: bool },
    Raise { up: bool },
    Rule(RuleKind),
    Strut,
    Not,
    Limits(bool),
    Unicode,
    MmlToken,
    Label,
    Tag,
    NoNumber,
    HFill,
    Cr,
    Linebreak,
    Hline { dashed: bool },
    Def,
    Let,
    NewCommand,
    Begin,
    End,
    /// A plain TeX alignment taking its body as an argument, e.g. `\matrix{..}`.
    Matrix(&'static TableStyle),
    TextBox(TextBox),
    MathChoice,
    /// Consumed without producing anything.
    Ignore,
    /// The `array` environment.
    ArrayEnv,
    /// `matrix`, `pmatrix`, `cases`, `eqnarray`, ...
    MatrixEnv(&'static TableStyle),
    /// `equation` and `equation*`.
    Equation,
}

/// Line thickness and delimiters of a generalized fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverStyle {
    pub thickness: Thickness,
    pub delimiters: Delimiters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thickness {
    Default,
    Zero,
    /// Read a dimension after the command.
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    None,
    Fixed(&'static str, &'static str),
    /// Read two delimiters after the command.
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `\rule{width}{height}`
    Rule,
    /// `\Rule{width}{height}{depth}`
    Rule3,
    /// `\Space{width}{height}{depth}`: like `\Rule`, but invisible.
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBox {
    Text,
    Mbox,
    Hbox,
    Fbox,
}

/// Layout of an alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    /// Delimiters around the table. `Some("")` is an empty delimiter.
    pub open: Option<&'static str>,
    pub close: Option<&'static str>,
    pub columnalign: Option<&'static str>,
    pub rowspacing: &'static str,
    pub columnspacing: &'static str,
    pub displaystyle: bool,
    /// Written along with an empty `data-frame-styles` when set.
    pub framespacing: Option<&'static str>,
    /// The last column holds equation labels.
    pub labeled: bool,
    /// At most one `&` per row.
    pub cases: bool,
    /// Written by `\begin..\end`, which orders the spacing attributes differently.
    pub environment: bool,
    /// Counts as an equation structure for nesting checks.
    pub equation: bool,
}

impl TableStyle {
    pub const MATRIX: TableStyle = TableStyle {
        open: None,
        close: None,
        columnalign: None,
        rowspacing: "4pt",
        columnspacing: "1em",
        displaystyle: false,
        framespacing: Some(".2em .125em"),
        labeled: false,
        cases: false,
        environment: false,
        equation: false,
    };
}

/// A pre-tokenized macro body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroTemplate {
    pub arity: u8,
    /// Default for an optional first argument given in brackets.
    pub default: Option<Box<[MacroToken]>>,
    pub body: Box<[MacroToken]>,
}

impl MacroTemplate {
    /// A template with `arity` mandatory arguments, referenced as `#1`..`#9` in `body`.
    pub fn new(body: &str, arity: u8) -> Self {
        Self {
            arity,
            default: None,
            body: tokenize(body),
        }
    }

    /// A template whose first argument is optional and defaults to `default`.
    pub fn with_default(body: &str, arity: u8, default: &str) -> Self {
        Self {
            arity,
            default: Some(tokenize(default)),
            body: tokenize(body),
        }
    }
}

/// An owned token of a macro template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroToken {
    ControlSequence(Box<str>),
    Character(char),
    BeginGroup,
    EndGroup,
    Space,
    Parameter(u8),
}

/// Lex a template body. `#n` becomes a parameter and `##` a literal `#`.
pub fn tokenize(text: &str) -> Box<[MacroToken]> {
    let mut source = TokenSource::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = source.next_raw() {
        let token = match token.kind {
            TokenKind::ControlSequence(cs) => MacroToken::ControlSequence(cs.into()),
            TokenKind::Character('#') => match source.peek_raw().map(|t| t.kind) {
                Some(TokenKind::Character(d @ '1'..='9')) => {
                    source.next_raw();
                    MacroToken::Parameter(d as u8 - b'0')
                }
                Some(TokenKind::Character('#')) => {
                    source.next_raw();
                    MacroToken::Character('#')
                }
                _ => MacroToken::Character('#'),
            },
            TokenKind::Character(c) => MacroToken::Character(c),
            TokenKind::BeginGroup => MacroToken::BeginGroup,
            TokenKind::EndGroup => MacroToken::EndGroup,
            TokenKind::Space => MacroToken::Space,
            TokenKind::Parameter(n) => MacroToken::Parameter(n),
            TokenKind::BeginArgument | TokenKind::EndArgument => continue,
        };
        tokens.push(token);
    }
    tokens.into_boxed_slice()
}

/// Name lookup for commands and environments.
///
/// Registering a name twice keeps the last descriptor.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    commands: FxHashMap<Box<str>, Descriptor>,
    environments: FxHashMap<Box<str>, Descriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&mut self, name: &str, handler: Handler) {
        self.commands.insert(name.into(), Descriptor::Builtin(handler));
    }

    pub fn macro_template(&mut self, name: &str, template: MacroTemplate) {
        self.commands.insert(name.into(), Descriptor::Macro(template));
    }

    pub fn environment(&mut self, name: &str, descriptor: Descriptor) {
        self.environments.insert(name.into(), descriptor);
    }

    pub fn lookup(&self, name: &str) -> Option<&Descriptor> {
        self.commands.get(name)
    }

    pub fn lookup_environment(&self, name: &str) -> Option<&Descriptor> {
        self.environments.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.environments.is_empty()
    }
}

/// A bundle of registrations and options.
///
/// Packages are applied in the order they are added to the
/// [`ConfigurationBuilder`](crate::ConfigurationBuilder), so a later package can redefine
/// the commands of an earlier one.
pub trait Package {
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut Registry);

    /// Options declared by the package with their defaults, keyed without the package
    /// prefix.
    fn options(&self) -> &[(&'static str, OptionValue)] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_tokens() {
        let template = MacroTemplate::new(r"\mathop{\rm #1}##", 1);
        assert_eq!(
            &*template.body,
            &[
                MacroToken::ControlSequence("mathop".into()),
                MacroToken::BeginGroup,
                MacroToken::ControlSequence("rm".into()),
                MacroToken::Parameter(1),
                MacroToken::EndGroup,
                MacroToken::Character('#'),
            ]
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = Registry::new();
        registry.command("x", Handler::Frac);
        registry.command("x", Handler::Sqrt);
        assert_eq!(registry.lookup("x"), Some(&Descriptor::Builtin(Handler::Sqrt)));
        assert_eq!(registry.lookup_environment("x"), None);
        assert_eq!(registry.len(), 1);
    }
}
