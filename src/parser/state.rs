//! The item stack of the parser.
//!
//! Parsing never recurses. Open structures (groups, arguments, `\left`, table cells, ...)
//! are [`Container`]s holding the row being built, and structures waiting for their next
//! node (a script slot, the arguments of `\frac`, the box of `\raise`, ...) are
//! [`Pending`] items stacked above them. Every finished node travels down the stack until
//! a container absorbs it.
use crate::{
    attribute::{Dimension, Font},
    node::{Attributes, Node, NodeKind, Span, TexClass},
    registry::{TableStyle, TextBox},
};

use super::tables;

/// Inherited typesetting state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Env {
    pub font: Option<Font>,
    /// Letter runs form a single identifier, as in `\mathrm{sin}`.
    pub multi_letter: bool,
    /// Inside `\boldsymbol`.
    pub bold: bool,
    pub display: bool,
    pub level: u8,
}

impl Env {
    pub fn new(display: bool) -> Self {
        Self {
            font: None,
            multi_letter: false,
            bold: false,
            display,
            level: 0,
        }
    }

    /// The style of a script, or of the index of a root with `levels == 2`.
    pub fn script(self, levels: u8) -> Self {
        Self {
            display: false,
            level: self.level.saturating_add(levels),
            ..self
        }
    }

    /// The style of the numerator and denominator of a fraction.
    pub fn fraction(self) -> Self {
        if self.display {
            Self {
                display: false,
                ..self
            }
        } else {
            self.script(1)
        }
    }

    /// Size of delimiters chosen by style: `\choose` and `\mathchoice`.
    pub fn choice(self) -> usize {
        match (self.display, self.level) {
            (true, 0) => 0,
            (false, 0) => 1,
            (_, 1) => 2,
            _ => 3,
        }
    }
}

/// A generalized fraction started by `\over` and friends in a row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Over {
    pub numerator: Vec<Node>,
    pub linethickness: Option<String>,
    pub delimiters: Option<(&'static str, &'static str)>,
}

/// The nodes of an open structure.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub nodes: Vec<Node>,
    pub over: Option<Over>,
    pub env: Env,
    /// A function name was just appended: the next node gets an invisible function
    /// application in front of it.
    pub pending_fn: bool,
}

impl Row {
    pub fn new(env: Env) -> Self {
        Self {
            nodes: Vec::new(),
            over: None,
            env,
            pending_fn: false,
        }
    }

    pub fn append(&mut self, node: Node) {
        if std::mem::take(&mut self.pending_fn) && applies_function(&node) {
            self.nodes
                .push(Node::token(NodeKind::Mo, "\u{2061}").with_class(TexClass::None));
        }
        self.pending_fn = node.flags.function;
        self.nodes.push(node);
    }

    /// Take the content, completing a pending generalized fraction.
    pub fn finish(self) -> Vec<Node> {
        let Some(over) = self.over else {
            return self.nodes;
        };
        let mut fraction = Node::with_children(
            NodeKind::Mfrac,
            vec![Node::row(over.numerator), Node::row(self.nodes)],
        );
        if let Some(thickness) = over.linethickness {
            fraction.set_attr("linethickness", thickness);
        }
        match over.delimiters {
            None => vec![fraction],
            Some((open, close)) => {
                let size = if self.env.choice() == 0 {
                    "2.047em"
                } else {
                    "1.2em"
                };
                vec![Node::atom(
                    TexClass::Ord,
                    vec![
                        sized_delimiter(open, TexClass::Open, size),
                        fraction,
                        sized_delimiter(close, TexClass::Close, size),
                    ],
                )]
            }
        }
    }
}

/// A delimiter at a fixed size, as made by `\bigl(` or `\choose`.
pub(crate) fn sized_delimiter(text: &str, class: TexClass, size: &str) -> Node {
    let mut mo = Node::token(NodeKind::Mo, text)
        .with_attr("minsize", size)
        .with_attr("maxsize", size);
    let stretchy = text
        .chars()
        .next()
        .and_then(tables::operator)
        .is_some_and(tables::OperatorInfo::stretchy);
    if !stretchy {
        mo.set_attr("stretchy", "true");
    }
    Node::atom(class, vec![mo])
}

/// Whether a node following a function name is its argument.
fn applies_function(node: &Node) -> bool {
    if node.is_space() {
        return false;
    }
    let Some(core) = operator_core(node) else {
        return true;
    };
    let class = core
        .texclass
        .unwrap_or_else(|| tables::operator_class(&core.text));
    !matches!(
        class,
        TexClass::Bin | TexClass::Rel | TexClass::Close | TexClass::Punct
    )
}

/// Like [`Node::core_mo`], but also looking through classed single-child rows.
fn operator_core(node: &Node) -> Option<&Node> {
    match node.kind {
        NodeKind::Mrow if node.children.len() == 1 => operator_core(&node.children[0]),
        _ => node.core_mo(),
    }
}

/// Shifts given by `\uproot` and `\leftroot` inside the index of a root.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RootShift {
    pub up: Option<String>,
    pub left: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum ContainerKind {
    Root,
    /// `{..}`
    Group,
    /// An argument spliced back by a handler.
    Argument {
        /// Close into an ORD atom instead of a plain row.
        atom: bool,
        /// Set for the index of a root.
        root_index: Option<RootShift>,
    },
    Left {
        open: &'static str,
    },
    Cell,
    /// Switched on by `\displaystyle`, `\large`, ...; closed by the end of the enclosing
    /// structure.
    Style {
        attributes: Attributes,
    },
    /// `equation`, or an environment defined by a macro.
    Environment {
        name: String,
        equation: bool,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Container {
    pub kind: ContainerKind,
    pub row: Row,
    pub span: Span,
}

impl Container {
    pub fn new(kind: ContainerKind, env: Env, span: Span) -> Self {
        Self {
            kind,
            row: Row::new(env),
            span,
        }
    }
}

/// A script being attached to a base.
#[derive(Debug, Clone)]
pub(crate) struct Script {
    /// An `msubsup` or `munderover` whose empty slots are placeholders.
    pub node: Node,
    pub slot: usize,
    /// Primes that were attached to the base.
    pub primes: Option<Node>,
    /// The row was waiting for a function argument before the base was taken.
    pub fn_pending: bool,
    pub env: Env,
}

impl Script {
    pub fn is_superscript(&self) -> bool {
        self.slot == 2
    }

    pub fn fill(mut self, value: Node) -> Node {
        let value = match self.primes.take() {
            Some(mut primes) if self.slot == 2 => {
                primes.set_attr("data-mjx-pseudoscript", "true");
                Node::with_children(NodeKind::Mrow, vec![primes, value])
            }
            Some(primes) => {
                self.node.children[2] = primes;
                value
            }
            None => value,
        };
        self.node.children[self.slot] = value;
        self.node
    }
}

/// What a [`Build`] makes of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BuildKind {
    Frac,
    Sqrt,
    /// Slots are the index, then the radicand.
    Root,
    Atom(TexClass),
    Font(Option<Font>),
    BoldSymbol,
    Phantom { vertical: bool, horizontal: bool },
    Smash { height: bool, depth: bool },
    Lap { left: bool },
    Accent { text: &'static str, stretchy: bool },
    UnderOver {
        text: &'static str,
        over: bool,
        accent: bool,
        stack: bool,
    },
    /// Slots are the script, then the base.
    Set { over: bool, class: Option<TexClass> },
    /// Slots are the top, then the base.
    BuildRel,
    /// Text parts are filled in advance; math parts arrive as arguments.
    TextBox(TextBox),
}

/// A node waiting for its arguments.
#[derive(Debug, Clone)]
pub(crate) struct Build {
    pub kind: BuildKind,
    pub slots: Vec<Option<Node>>,
    pub env: Env,
    pub span: Span,
}

impl Build {
    pub fn new(kind: BuildKind, arguments: usize, env: Env, span: Span) -> Self {
        Self {
            kind,
            slots: vec![None; arguments],
            env,
            span,
        }
    }

    fn next_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.next_slot().is_none()
    }

    pub fn fill(&mut self, node: Node) {
        if let Some(slot) = self.next_slot() {
            self.slots[slot] = Some(node);
        }
    }

    /// The environment and the container kind for the next argument.
    pub fn argument(&self) -> (Env, ContainerKind) {
        let slot = self.next_slot().unwrap_or(0);
        let plain = ContainerKind::Argument {
            atom: false,
            root_index: None,
        };
        match &self.kind {
            BuildKind::Frac => (self.env.fraction(), plain),
            BuildKind::Root if slot == 0 => (
                self.env.script(2),
                ContainerKind::Argument {
                    atom: false,
                    root_index: Some(RootShift::default()),
                },
            ),
            BuildKind::Set { .. } | BuildKind::BuildRel if slot == 0 => {
                (self.env.script(1), plain)
            }
            BuildKind::Font(font) => (
                Env {
                    font: *font,
                    multi_letter: font.is_some(),
                    ..self.env
                },
                plain,
            ),
            BuildKind::BoldSymbol => (
                Env {
                    bold: true,
                    ..self.env
                },
                plain,
            ),
            BuildKind::TextBox(kind) => {
                let env = match kind {
                    TextBox::Text => Env {
                        font: None,
                        multi_letter: false,
                        bold: false,
                        ..self.env
                    },
                    _ => Env::new(false),
                };
                (
                    env,
                    ContainerKind::Argument {
                        atom: true,
                        root_index: None,
                    },
                )
            }
            _ => (self.env, plain),
        }
    }
}

/// A table row being filled.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    pub style: &'static TableStyle,
    /// The environment name, for tables opened by `\begin`.
    pub name: Option<String>,
    pub attributes: Attributes,
    pub rows: Vec<Node>,
    pub cells: Vec<Node>,
    /// Framed sides with their line style, in the order they were found.
    pub frame: Vec<(&'static str, &'static str)>,
    pub row_lines: Vec<&'static str>,
    /// Base row spacing in ems and the spacing of each row, once `\\[..]` adjusted one.
    pub row_spacing: Option<(f32, Vec<String>)>,
    /// Positions of `\hfill` in the current cell.
    pub hfill: Vec<usize>,
    pub span: Span,
}

impl Table {
    pub fn new(style: &'static TableStyle, name: Option<String>, span: Span) -> Self {
        Self {
            style,
            name,
            attributes: Attributes::new(),
            rows: Vec::new(),
            cells: Vec::new(),
            frame: Vec::new(),
            row_lines: Vec::new(),
            row_spacing: None,
            hfill: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Pending {
    Script(Script),
    Build(Build),
    /// `\not`, waiting for the relation to negate.
    Not,
    /// `\raise` or `\lower`, waiting for the box to move.
    Raise {
        name: &'static str,
        shift: Dimension,
    },
    Table(Table),
}

#[derive(Debug, Clone)]
pub(crate) enum Item {
    Container(Container),
    Pending(Pending),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mi(text: &str) -> Node {
        Node::token(NodeKind::Mi, text)
    }

    #[test]
    fn function_application() {
        let mut row = Row::new(Env::new(true));
        let mut sin = mi("sin");
        sin.flags.function = true;
        row.append(sin);
        assert!(row.pending_fn);
        row.append(mi("x"));
        assert_eq!(row.nodes.len(), 3);
        assert_eq!(row.nodes[1].text, "\u{2061}");

        let mut row = Row::new(Env::new(true));
        row.pending_fn = true;
        row.append(Node::token(NodeKind::Mo, "="));
        assert_eq!(row.nodes.len(), 1);
        assert!(!row.pending_fn);
    }

    #[test]
    fn styles() {
        let display = Env::new(true);
        assert_eq!(display.fraction().level, 0);
        assert!(!display.fraction().display);
        assert_eq!(display.fraction().fraction().level, 1);
        assert_eq!(display.script(2).level, 2);
        assert_eq!(display.choice(), 0);
        assert_eq!(display.script(1).choice(), 2);
    }

    #[test]
    fn over_with_delimiters() {
        let mut row = Row::new(Env::new(true));
        row.over = Some(Over {
            numerator: vec![mi("n")],
            linethickness: Some("0".into()),
            delimiters: Some(("(", ")")),
        });
        row.nodes.push(mi("k"));
        let nodes = row.finish();
        assert_eq!(nodes.len(), 1);
        let atom = &nodes[0];
        assert_eq!(atom.texclass, Some(TexClass::Ord));
        assert_eq!(atom.children[0].children[0].attr("minsize"), Some("2.047em"));
        assert_eq!(atom.children[1].attr("linethickness"), Some("0"));
    }

    #[test]
    fn script_with_primes() {
        let base = Node::with_children(
            NodeKind::Msubsup,
            vec![mi("x"), Node::placeholder(), Node::placeholder()],
        );
        let script = Script {
            node: base,
            slot: 1,
            primes: Some(Node::token(NodeKind::Mo, "\u{2032}")),
            fn_pending: false,
            env: Env::new(false),
        };
        let node = script.fill(mi("a"));
        assert_eq!(node.children[1].text, "a");
        assert_eq!(node.children[2].text, "\u{2032}");
    }
}
