//! The tree produced by the parser.
//!
//! Nodes mirror MathML elements. Each node also carries a TeX spacing class, which the
//! layout stage uses to decide the space inserted between neighbouring atoms. The class
//! is either given explicitly by the markup (`\mathrel`, `\left`, ...) or computed from
//! the node kind and, for operators, from the operator dictionary.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::parser::ParserError;

/// Attributes of a node, in insertion order.
pub type Attributes = IndexMap<String, String>;

/// A byte range into the parsed input.
///
/// Tokens produced by a macro expansion carry the span of the macro call, so that the
/// span of any node always points at text the user actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// The text covered by the span, or an empty string if it does not fall on `input`.
    pub fn slice(self, input: &str) -> &str {
        input.get(self.start..self.end).unwrap_or_default()
    }
}

/// TeX spacing classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TexClass {
    #[default]
    Ord,
    Op,
    Bin,
    Rel,
    Open,
    Close,
    Punct,
    Inner,
    None,
}

impl TexClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TexClass::Ord => "ORD",
            TexClass::Op => "OP",
            TexClass::Bin => "BIN",
            TexClass::Rel => "REL",
            TexClass::Open => "OPEN",
            TexClass::Close => "CLOSE",
            TexClass::Punct => "PUNCT",
            TexClass::Inner => "INNER",
            TexClass::None => "NONE",
        }
    }
}

impl Display for TexClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The MathML element a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Math,
    Mi,
    Mn,
    Mo,
    Mtext,
    Mspace,
    Ms,
    Mrow,
    Mfrac,
    Msqrt,
    Mroot,
    Mstyle,
    Merror,
    Mpadded,
    Mphantom,
    Menclose,
    Msub,
    Msup,
    Msubsup,
    Munder,
    Mover,
    Munderover,
    Mtable,
    Mtr,
    Mlabeledtr,
    Mtd,
}

impl NodeKind {
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Math => "math",
            NodeKind::Mi => "mi",
            NodeKind::Mn => "mn",
            NodeKind::Mo => "mo",
            NodeKind::Mtext => "mtext",
            NodeKind::Mspace => "mspace",
            NodeKind::Ms => "ms",
            NodeKind::Mrow => "mrow",
            NodeKind::Mfrac => "mfrac",
            NodeKind::Msqrt => "msqrt",
            NodeKind::Mroot => "mroot",
            NodeKind::Mstyle => "mstyle",
            NodeKind::Merror => "merror",
            NodeKind::Mpadded => "mpadded",
            NodeKind::Mphantom => "mphantom",
            NodeKind::Menclose => "menclose",
            NodeKind::Msub => "msub",
            NodeKind::Msup => "msup",
            NodeKind::Msubsup => "msubsup",
            NodeKind::Munder => "munder",
            NodeKind::Mover => "mover",
            NodeKind::Munderover => "munderover",
            NodeKind::Mtable => "mtable",
            NodeKind::Mtr => "mtr",
            NodeKind::Mlabeledtr => "mlabeledtr",
            NodeKind::Mtd => "mtd",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "math" => NodeKind::Math,
            "mi" => NodeKind::Mi,
            "mn" => NodeKind::Mn,
            "mo" => NodeKind::Mo,
            "mtext" => NodeKind::Mtext,
            "mspace" => NodeKind::Mspace,
            "ms" => NodeKind::Ms,
            "mrow" => NodeKind::Mrow,
            "mfrac" => NodeKind::Mfrac,
            "msqrt" => NodeKind::Msqrt,
            "mroot" => NodeKind::Mroot,
            "mstyle" => NodeKind::Mstyle,
            "merror" => NodeKind::Merror,
            "mpadded" => NodeKind::Mpadded,
            "mphantom" => NodeKind::Mphantom,
            "menclose" => NodeKind::Menclose,
            "msub" => NodeKind::Msub,
            "msup" => NodeKind::Msup,
            "msubsup" => NodeKind::Msubsup,
            "munder" => NodeKind::Munder,
            "mover" => NodeKind::Mover,
            "munderover" => NodeKind::Munderover,
            "mtable" => NodeKind::Mtable,
            "mtr" => NodeKind::Mtr,
            "mlabeledtr" => NodeKind::Mlabeledtr,
            "mtd" => NodeKind::Mtd,
            _ => return None,
        })
    }

    /// Token elements hold text rather than children.
    pub fn is_token(self) -> bool {
        matches!(
            self,
            NodeKind::Mi
                | NodeKind::Mn
                | NodeKind::Mo
                | NodeKind::Mtext
                | NodeKind::Mspace
                | NodeKind::Ms
        )
    }

    /// Elements whose children form an implicit row.
    pub fn is_row_like(self) -> bool {
        matches!(
            self,
            NodeKind::Math
                | NodeKind::Mrow
                | NodeKind::Msqrt
                | NodeKind::Mstyle
                | NodeKind::Merror
                | NodeKind::Mpadded
                | NodeKind::Mphantom
                | NodeKind::Menclose
                | NodeKind::Mtd
        )
    }

    pub fn is_script(self) -> bool {
        matches!(
            self,
            NodeKind::Msub
                | NodeKind::Msup
                | NodeKind::Msubsup
                | NodeKind::Munder
                | NodeKind::Mover
                | NodeKind::Munderover
        )
    }
}

/// Parser bookkeeping attached to a node. Never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    /// Scripts go above and below (`Some(true)`) or to the side (`Some(false)`).
    pub movesupsub: Option<bool>,
    /// Empty script slot awaiting a value.
    pub placeholder: bool,
    /// A function name, applied to what follows with an invisible U+2061.
    pub function: bool,
    /// An `mo` the operator dictionary does not classify, wrapped in an ORD `mrow` at cleanup.
    pub bare_operator: bool,
    /// Demoted from BIN to ORD by the operator-class filter.
    pub demoted: bool,
    /// A superscript slot filled by prime marks.
    pub primed: bool,
}

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    /// Text content of token elements.
    pub text: String,
    pub attributes: Attributes,
    /// Class set explicitly by the markup. Serialized as `data-mjx-texclass`.
    pub texclass: Option<TexClass>,
    /// The effective spacing class, filled in by the post filters.
    pub class: TexClass,
    pub children: Vec<Node>,
    pub span: Span,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) flags: Flags,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            attributes: Attributes::new(),
            texclass: None,
            class: TexClass::Ord,
            children: Vec::new(),
            span: Span::default(),
            flags: Flags::default(),
        }
    }

    pub fn token(kind: NodeKind, text: impl Into<String>) -> Self {
        let mut node = Self::new(kind);
        node.text = text.into();
        node
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        let mut node = Self::new(kind);
        node.children = children;
        node
    }

    /// An `mrow` with an explicit class.
    pub fn atom(class: TexClass, children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Mrow, children).with_class(class)
    }

    /// A single node, or an `mrow` when there are zero or several.
    pub fn row(mut children: Vec<Node>) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Self::with_children(NodeKind::Mrow, children)
    }

    /// The error node that replaces the whole output when parsing fails.
    pub fn error(message: &str) -> Self {
        Self::with_children(NodeKind::Merror, vec![Self::token(NodeKind::Mtext, message)])
            .with_attr("data-mjx-error", message)
    }

    pub(crate) fn placeholder() -> Self {
        let mut node = Self::new(NodeKind::Mrow);
        node.flags.placeholder = true;
        node
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(mut self, class: TexClass) -> Self {
        self.texclass = Some(class);
        self.class = class;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_owned(), value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub(crate) fn is_placeholder(&self) -> bool {
        self.flags.placeholder
    }

    /// The operator at the heart of an embellished operator, if any.
    ///
    /// Scripts, accents and single-child wrappers are looked through.
    pub fn core_mo(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Mo => Some(self),
            kind if kind.is_script() => self.children.first()?.core_mo(),
            NodeKind::Mrow | NodeKind::Mstyle | NodeKind::Mpadded
                if self.texclass.is_none() && self.children.len() == 1 =>
            {
                self.children[0].core_mo()
            }
            _ => None,
        }
    }

    pub(crate) fn core_mo_mut(&mut self) -> Option<&mut Node> {
        match self.kind {
            NodeKind::Mo => Some(self),
            kind if kind.is_script() => self.children.first_mut()?.core_mo_mut(),
            NodeKind::Mrow | NodeKind::Mstyle | NodeKind::Mpadded
                if self.texclass.is_none() && self.children.len() == 1 =>
            {
                self.children[0].core_mo_mut()
            }
            _ => None,
        }
    }

    /// Whether the node only produces horizontal space.
    pub fn is_space(&self) -> bool {
        match self.kind {
            NodeKind::Mspace => true,
            NodeKind::Mstyle | NodeKind::Mrow | NodeKind::Mpadded => {
                !self.children.is_empty() && self.children.iter().all(Node::is_space)
            }
            _ => false,
        }
    }

    /// Whether this is an `mo` without an explicit class.
    pub(crate) fn is_plain_mo(&self) -> bool {
        self.kind == NodeKind::Mo && self.texclass.is_none()
    }
}

/// Side information gathered while parsing, for the layout stage.
#[derive(Debug, Clone, Default)]
pub struct Hints {
    /// Names given to `\label`.
    pub labels: Vec<String>,
    /// Equation tags given with `\tag`.
    pub tags: Vec<String>,
    /// The diagnostic that replaced the output, if parsing failed.
    pub error: Option<ParserError>,
}

/// The result of a parse: a `math` root and the hints collected on the way.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Node,
    pub hints: Hints,
    pub source: String,
}

impl Document {
    /// Whether the parse failed and the root holds a single `merror`.
    pub fn is_error(&self) -> bool {
        self.hints.error.is_some()
    }

    /// Recompute the spacing class of every node.
    ///
    /// Explicit classes are kept as they are. Use this after editing the tree.
    pub fn reclassify(&mut self) {
        crate::filter::assign_classes(&mut self.root);
    }

    /// The markup a node was built from.
    pub fn source_of(&self, node: &Node) -> &str {
        node.span.slice(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_collapses_single_child() {
        let row = Node::row(vec![Node::token(NodeKind::Mi, "x")]);
        assert_eq!(row.kind, NodeKind::Mi);
        let row = Node::row(vec![]);
        assert_eq!(row.kind, NodeKind::Mrow);
        assert!(row.children.is_empty());
    }

    #[test]
    fn core_operator() {
        let sup = Node::with_children(
            NodeKind::Msup,
            vec![Node::token(NodeKind::Mo, "\u{2211}"), Node::token(NodeKind::Mn, "2")],
        );
        assert_eq!(sup.core_mo().map(|mo| mo.text.as_str()), Some("\u{2211}"));
        let atom = Node::atom(TexClass::Op, vec![Node::token(NodeKind::Mo, "+")]);
        assert!(atom.core_mo().is_none());
    }

    #[test]
    fn spaces() {
        let quad = Node::with_children(
            NodeKind::Mstyle,
            vec![Node::new(NodeKind::Mspace).with_attr("width", "1em")],
        );
        assert!(quad.is_space());
        assert!(!Node::new(NodeKind::Mstyle).is_space());
    }

    #[test]
    fn reclassify_keeps_explicit_classes() {
        fn forget(node: &mut Node) {
            node.class = TexClass::None;
            node.children.iter_mut().for_each(forget);
        }

        let mut document = crate::parse(r"\mathrel{x}+y", &crate::Configuration::default());
        let before = document.root.clone();
        forget(&mut document.root);
        document.reclassify();
        assert_eq!(document.root, before);

        let children = &document.root.children;
        assert_eq!(children[0].texclass, Some(TexClass::Rel));
        assert_eq!(children[0].class, TexClass::Rel);
        assert_eq!(children[0].children[0].class, TexClass::Ord);
        assert_eq!(children[1].text, "+");
        assert_eq!(children[1].class, TexClass::Ord);
        assert_eq!(children[2].class, TexClass::Ord);
    }

    #[test]
    fn span_union() {
        let a = Span::new(2, 4);
        assert_eq!(a.to(Span::new(6, 9)), Span::new(2, 9));
        assert_eq!(Span::default().to(a), a);
        assert_eq!(Span::new(1, 3).slice("abcdef"), "bc");
        assert_eq!(Span::new(4, 30).slice("abc"), "");
    }
}
