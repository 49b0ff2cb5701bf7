//! Contains the [`Parser`], which turns math markup into a [`Document`].
//!
//! The parser pulls tokens from a [`TokenSource`](source::TokenSource) and keeps every open
//! structure on an explicit item stack (see the `state` module), so that neither deeply
//! nested input nor recursive macros can exhaust the call stack. The first error aborts the
//! parse; [`Parser::parse`] then returns a document holding a single `merror` node.

mod environments;
mod error;
mod lex;
mod macros;
mod primitives;
pub(crate) mod source;
mod state;
mod storage;
pub(crate) mod tables;
mod text;

use crate::{
    attribute::{Dimension, Font},
    config::Configuration,
    filter,
    node::{Document, Hints, Node, NodeKind, Span, TexClass},
    registry::Descriptor,
};

pub use error::{ErrorCategory, ParserError};
pub use storage::Storage;

use error::{ErrorKind, InnerResult};
use macros::MacroContext;
use source::{Token, TokenKind, TokenSource};
use state::{Container, ContainerKind, Env, Item, Pending, Script};

/// A parser for math markup, producing a MathML node tree.
///
/// A parser is used once: [`parse`](Parser::parse) and [`try_parse`](Parser::try_parse)
/// consume it. The [`Configuration`] is only read, and the [`Storage`] only receives the
/// definitions made by `\def`, `\let` and `\newcommand` during the parse, so both can be
/// reused for the next input.
///
/// ```
/// use texmml::{Configuration, Parser, Storage};
///
/// let config = Configuration::default();
/// let storage = Storage::new();
/// let document = Parser::new(r"x^2", &config, &storage).parse();
/// assert_eq!(document.root.children[0].kind.tag(), "msup");
/// ```
pub struct Parser<'a> {
    /// The markup being parsed.
    input: &'a str,
    config: &'a Configuration,
    /// Arena for user definitions and for text spelled back from tokens.
    storage: &'a bumpalo::Bump,
    source: TokenSource<'a>,
    /// Open structures and structures waiting for nodes, innermost last.
    stack: Vec<Item>,
    macros: MacroContext<'a>,
    /// Macro expansions performed so far.
    expansions: usize,
    hints: Hints,
    /// `\mathversion{bold}` is in effect.
    bold_version: bool,
    /// The current row already has a `\tag`.
    tagged: bool,
    /// Span of the token being handled, where errors are reported.
    span: Span,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, config: &'a Configuration, storage: &'a Storage) -> Self {
        Self {
            input,
            config,
            storage: &storage.0,
            source: TokenSource::new(input),
            stack: Vec::new(),
            macros: MacroContext::new(),
            expansions: 0,
            hints: Hints::default(),
            bold_version: config.option_bool("bbm.bold"),
            tagged: false,
            span: Span::new(0, 0),
        }
    }

    /// Parse the whole input.
    ///
    /// This never fails: a diagnostic replaces the content of the `math` root by an `merror`
    /// node and is kept in [`Hints::error`].
    pub fn parse(mut self) -> Document {
        let result = self.run();
        let (children, error) = match result {
            Ok(children) => (children, None),
            Err(error) => (vec![Node::error(&error.message())], Some(error)),
        };
        let root = self.finish_root(children);
        let mut hints = self.hints;
        hints.error = error;
        Document {
            root,
            hints,
            source: self.input.to_owned(),
        }
    }

    /// Parse the whole input, returning the `math` root or the diagnostic.
    pub fn try_parse(mut self) -> Result<Node, ParserError> {
        let children = self.run()?;
        Ok(self.finish_root(children))
    }

    fn finish_root(&self, children: Vec<Node>) -> Node {
        let display = if self.config.parser.display {
            "block"
        } else {
            "inline"
        };
        let mut root = Node::with_children(NodeKind::Math, children)
            .with_attr("display", display)
            .with_span(Span::new(0, self.input.len()));
        filter::run(&mut root);
        root
    }

    fn run(&mut self) -> Result<Vec<Node>, ParserError> {
        let env = Env::new(self.config.parser.display);
        self.stack.push(Item::Container(Container::new(
            ContainerKind::Root,
            env,
            Span::new(0, self.input.len()),
        )));
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => return Err(ParserError::new(error, self.span, self.input)),
            }
        }
        self.finish()
            .map_err(|error| ParserError::new(error, self.span, self.input))
    }

    /// Handle the next token. Returns `false` once the input is exhausted.
    fn step(&mut self) -> InnerResult<bool> {
        if self.stack.len() > self.config.parser.max_nesting {
            return Err(ErrorKind::MaxNesting);
        }
        let Some(token) = self.source.next() else {
            self.span = Span::new(self.input.len(), self.input.len());
            return Ok(false);
        };
        self.span = token.span;
        self.handle(token)?;
        Ok(true)
    }

    fn handle(&mut self, token: Token<'a>) -> InnerResult<()> {
        match token.kind {
            TokenKind::ControlSequence(name) => self.control_sequence(name, token.span),
            TokenKind::Character(c) => self.character(c, token.span),
            TokenKind::BeginGroup => {
                self.open(ContainerKind::Group, token.span);
                Ok(())
            }
            TokenKind::EndGroup => self.end_group(token.span),
            TokenKind::Space => Ok(()),
            TokenKind::Parameter(_) => Err(ErrorKind::CantUseHash),
            TokenKind::BeginArgument => {
                self.begin_argument(token.span);
                Ok(())
            }
            TokenKind::EndArgument => self.end_argument(),
        }
    }

    /// Expand or execute a control sequence. Definitions made during the parse shadow the
    /// registry.
    fn control_sequence(&mut self, name: &'a str, span: Span) -> InnerResult<()> {
        if let Some(result) = self.macros.try_expand_in(name, span, &mut self.source) {
            result?;
            return self.count_expansion();
        }
        let config = self.config;
        match config.registry.lookup(name) {
            Some(Descriptor::Builtin(handler)) => self.handle_command(name, *handler, span),
            Some(Descriptor::Macro(template)) => {
                macros::expand_template(name, template, span, &mut self.source)?;
                self.count_expansion()
            }
            None => Err(ErrorKind::UndefinedControlSequence(
                format!("\\{name}").into(),
            )),
        }
    }

    fn count_expansion(&mut self) -> InnerResult<()> {
        self.expansions += 1;
        if self.expansions > self.config.parser.max_macros {
            return Err(ErrorKind::MaxMacroSubstitutions);
        }
        if self.source.pending_len() > self.config.parser.max_buffer {
            return Err(ErrorKind::MaxBufferSize);
        }
        Ok(())
    }

    /// The environment new nodes are built in.
    fn env(&self) -> Env {
        for item in self.stack.iter().rev() {
            match item {
                Item::Container(container) => return container.row.env,
                Item::Pending(Pending::Script(script)) => return script.env,
                Item::Pending(Pending::Build(build)) => return build.argument().0,
                _ => {}
            }
        }
        Env::new(self.config.parser.display)
    }

    fn env_mut(&mut self) -> Option<&mut Env> {
        self.stack.iter_mut().rev().find_map(|item| match item {
            Item::Container(container) => Some(&mut container.row.env),
            Item::Pending(Pending::Script(script)) => Some(&mut script.env),
            _ => None,
        })
    }

    fn open(&mut self, kind: ContainerKind, span: Span) {
        let env = self.env();
        self.open_with(kind, env, span);
    }

    fn open_with(&mut self, kind: ContainerKind, env: Env, span: Span) {
        self.stack
            .push(Item::Container(Container::new(kind, env, span)));
    }

    /// The innermost container, if it is on top of the stack.
    fn top_container(&mut self) -> Option<&mut Container> {
        match self.stack.last_mut() {
            Some(Item::Container(container)) => Some(container),
            _ => None,
        }
    }

    /// Deliver a finished node. It travels down the stack, completing pending structures,
    /// until a container appends it to its row.
    pub(crate) fn push_node(&mut self, node: Node) -> InnerResult<()> {
        let mut node = node;
        loop {
            if let Some(container) = self.top_container() {
                container.row.append(node);
                return Ok(());
            }
            match self.stack.pop() {
                Some(Item::Pending(Pending::Script(script))) => {
                    let fn_pending = script.fn_pending;
                    node = script.fill(node);
                    node.flags.function |= fn_pending;
                }
                Some(Item::Pending(Pending::Build(mut build))) => {
                    build.fill(node);
                    if !build.is_complete() {
                        self.stack.push(Item::Pending(Pending::Build(build)));
                        return Ok(());
                    }
                    node = self.finish_build(build)?;
                }
                Some(Item::Pending(Pending::Not)) => match negate(node) {
                    Ok(negated) => node = negated,
                    Err(node) => {
                        self.push_node(negation_fallback())?;
                        return self.push_node(node);
                    }
                },
                Some(Item::Pending(Pending::Raise { shift, .. })) => node = raise(node, shift),
                Some(Item::Pending(Pending::Table(mut table))) => {
                    table
                        .cells
                        .push(Node::with_children(NodeKind::Mtd, vec![node]));
                    self.stack.push(Item::Pending(Pending::Table(table)));
                    return Ok(());
                }
                Some(Item::Container(_)) | None => return Err(ErrorKind::ExtraCloseMissingOpen),
            }
        }
    }

    /// Resolve what sits above the innermost structure before `closer` acts on it.
    ///
    /// Style containers end with the structure they are in, except for commands working
    /// on the current row such as `\over`.
    fn settle(&mut self, closer: Closer<'_>) -> InnerResult<()> {
        while let Some(item) = self.stack.pop() {
            match item {
                Item::Pending(Pending::Script(script)) => {
                    return Err(closer.script_error(script.is_superscript()))
                }
                Item::Pending(Pending::Not) => self.push_node(negation_fallback())?,
                Item::Pending(Pending::Raise { name, .. }) => {
                    return Err(ErrorKind::MissingBox(name.into()))
                }
                Item::Container(Container {
                    kind: ContainerKind::Style { attributes },
                    row,
                    span,
                }) if closer != Closer::Command => {
                    let mut node =
                        Node::with_children(NodeKind::Mstyle, row.finish()).with_span(span);
                    node.attributes = attributes;
                    self.push_node(node)?;
                }
                item => {
                    self.stack.push(item);
                    break;
                }
            }
        }
        Ok(())
    }

    /// The error for a container left open when its enclosing structure ends.
    fn unclosed(&self, container: &Container) -> ErrorKind {
        match &container.kind {
            ContainerKind::Group => ErrorKind::ExtraOpenMissingClose,
            ContainerKind::Left { .. } => ErrorKind::ExtraLeftMissingRight,
            ContainerKind::Environment { name, .. } => ErrorKind::MissingEnd(name.as_str().into()),
            ContainerKind::Cell => match self.stack.last() {
                Some(Item::Pending(Pending::Table(table))) => match &table.name {
                    Some(name) => ErrorKind::MissingEnd(name.as_str().into()),
                    None => ErrorKind::MissingCloseBrace,
                },
                _ => ErrorKind::MissingCloseBrace,
            },
            ContainerKind::Argument { .. } => ErrorKind::MissingCloseBrace,
            ContainerKind::Root | ContainerKind::Style { .. } => ErrorKind::ExtraCloseMissingOpen,
        }
    }

    /// End of input.
    fn finish(&mut self) -> InnerResult<Vec<Node>> {
        self.settle(Closer::End)?;
        match self.stack.pop() {
            Some(Item::Container(Container {
                kind: ContainerKind::Root,
                row,
                ..
            })) if self.stack.is_empty() => Ok(row.finish()),
            Some(Item::Container(container)) => Err(self.unclosed(&container)),
            _ => Err(ErrorKind::MissingCloseBrace),
        }
    }

    fn end_group(&mut self, span: Span) -> InnerResult<()> {
        self.settle(Closer::Brace)?;
        match self.stack.pop() {
            Some(Item::Container(Container {
                kind: ContainerKind::Group,
                row,
                span: open,
            })) => {
                let node = Node::atom(TexClass::Ord, row.finish()).with_span(open.to(span));
                self.push_node(node)
            }
            Some(item) => {
                self.stack.push(item);
                Err(ErrorKind::ExtraCloseMissingOpen)
            }
            None => Err(ErrorKind::ExtraCloseMissingOpen),
        }
    }

    fn begin_argument(&mut self, span: Span) {
        let (env, kind) = match self.stack.last() {
            Some(Item::Pending(Pending::Build(build))) => build.argument(),
            _ => (
                self.env(),
                ContainerKind::Argument {
                    atom: false,
                    root_index: None,
                },
            ),
        };
        self.open_with(kind, env, span);
    }

    fn end_argument(&mut self) -> InnerResult<()> {
        self.settle(Closer::End)?;
        match self.stack.pop() {
            Some(Item::Container(Container {
                kind: ContainerKind::Argument { atom, root_index },
                row,
                span,
            })) => {
                let mut content = row.finish();
                if let Some(shift) = root_index.filter(|s| s.up.is_some() || s.left.is_some()) {
                    content = vec![primitives::shifted_index(content, shift)];
                }
                let node = if atom {
                    Node::atom(TexClass::Ord, content)
                } else {
                    Node::row(content)
                };
                self.push_node(with_default_span(node, span))
            }
            Some(Item::Container(container)) if self.is_plain_cell(&container) => {
                self.finish_table(container)
            }
            Some(Item::Container(container)) => Err(self.unclosed(&container)),
            Some(item) => {
                self.stack.push(item);
                Err(ErrorKind::MissingCloseBrace)
            }
            None => Err(ErrorKind::ExtraCloseMissingOpen),
        }
    }

    /// Take the last node of the current row as the base of a script or primes.
    ///
    /// Returns the base and whether the row was waiting for a function argument.
    fn take_base(&mut self) -> InnerResult<(Node, bool)> {
        match self.stack.last_mut() {
            Some(Item::Pending(Pending::Script(script))) => {
                Err(Closer::Command.script_error(script.is_superscript()))
            }
            Some(Item::Container(container)) => {
                let fn_pending = std::mem::take(&mut container.row.pending_fn);
                Ok(match container.row.nodes.pop() {
                    Some(node) => (node, fn_pending),
                    None => (empty_base(), false),
                })
            }
            _ => Ok((empty_base(), false)),
        }
    }

    /// `^` or `_`.
    fn script(&mut self, superscript: bool) -> InnerResult<()> {
        let slot = if superscript { 2 } else { 1 };
        let (mut base, fn_pending) = self.take_base()?;

        let mut primes = None;
        if base.flags.primed {
            base.flags.primed = false;
            match base.kind {
                NodeKind::Msup if base.children.len() == 2 => {
                    primes = base.children.pop();
                    if let Some(inner) = base.children.pop() {
                        base = inner;
                    }
                }
                NodeKind::Msubsup if base.children.len() == 3 => {
                    primes = Some(std::mem::replace(
                        &mut base.children[2],
                        Node::placeholder(),
                    ));
                }
                _ => {}
            }
        }

        let internal = matches!(base.kind, NodeKind::Msubsup | NodeKind::Munderover)
            && base.children.len() == 3;
        if internal && !base.children[slot].is_placeholder() {
            return Err(if superscript {
                ErrorKind::DoubleExponent
            } else {
                ErrorKind::DoubleSubscripts
            });
        }

        let node = if internal && base.kind == NodeKind::Msubsup {
            base
        } else if base.flags.movesupsub == Some(true) {
            if internal {
                base
            } else {
                let mut node = scripted(NodeKind::Munderover, base);
                node.flags.movesupsub = Some(true);
                node
            }
        } else {
            scripted(NodeKind::Msubsup, base)
        };

        let env = self.env().script(1);
        self.stack.push(Item::Pending(Pending::Script(Script {
            node,
            slot,
            primes,
            fn_pending,
            env,
        })));

        // A digit right after the marker is a script on its own: `x^23` is `x^{2}3`.
        if let Some(Token {
            kind: TokenKind::Character(digit),
            span,
        }) = self.source.peek()
        {
            if digit.is_ascii_digit() {
                self.source.next();
                let mut mn = Node::token(NodeKind::Mn, digit.to_string()).with_span(span);
                self.apply_font(&mut mn, None, true);
                return self.push_node(mn);
            }
        }
        Ok(())
    }

    /// A run of `'`, attached to the last node as a superscript.
    fn primes(&mut self, span: Span) -> InnerResult<()> {
        let mut count = 1;
        let mut span = span;
        while let Some(Token {
            kind: TokenKind::Character('\'' | '\u{2019}'),
            span: next,
        }) = self.source.peek()
        {
            self.source.next();
            span = span.to(next);
            count += 1;
        }
        let text = match count {
            1 => String::from("\u{2032}"),
            2 => String::from("\u{2033}"),
            3 => String::from("\u{2034}"),
            4 => String::from("\u{2057}"),
            n => "\u{2032}".repeat(n),
        };
        let primes = Node::token(NodeKind::Mo, text)
            .with_attr("data-mjx-alternate", "1")
            .with_span(span);

        let (mut base, fn_pending) = self.take_base()?;
        let mut node = if base.kind == NodeKind::Msubsup && base.children.len() == 3 {
            if !base.children[2].is_placeholder() {
                return Err(ErrorKind::DoubleExponentPrime);
            }
            base.children[2] = primes;
            base
        } else {
            Node::with_children(NodeKind::Msup, vec![base, primes])
        };
        node.flags.primed = true;
        node.flags.function = fn_pending;
        self.push_node(node)
    }

    /// `\limits` and `\nolimits`, acting on the operator just parsed.
    fn limits(&mut self, limits: bool, name: &str) -> InnerResult<()> {
        let misplaced = || ErrorKind::LimitsOnNonOperator(format!("\\{name}").into());
        let Some(container) = self.top_container() else {
            return Err(misplaced());
        };
        let Some(op) = container.row.nodes.last_mut() else {
            return Err(misplaced());
        };
        let class = filter::class_of(op.core_mo().unwrap_or(&*op));
        if class != TexClass::Op && op.flags.movesupsub.is_none() {
            return Err(misplaced());
        }
        match op.kind {
            NodeKind::Munderover if !limits => op.kind = NodeKind::Msubsup,
            NodeKind::Msubsup if limits && op.children.len() == 3 => op.kind = NodeKind::Munderover,
            _ => {}
        }
        op.flags.movesupsub = Some(limits);
        if let Some(core) = op.core_mo_mut() {
            fix_movable_limits(core);
        }
        Ok(())
    }

    /// Give a token the font in effect.
    ///
    /// `own` is the fixed variant of a symbol; `follows_env` tells whether an enclosing font
    /// command replaces it.
    fn apply_font(&self, node: &mut Node, own: Option<Font>, follows_env: bool) {
        let env = self.env();
        let font = if follows_env { env.font.or(own) } else { own };
        let font = if env.bold {
            let letter = node.kind == NodeKind::Mi && node.text.chars().count() == 1;
            let base = font.unwrap_or(if letter { Font::Italic } else { Font::Normal });
            Some(base.emboldened())
        } else {
            font
        };
        if let Some(font) = font {
            set_variant(node, font);
        }
    }
}

/// What ends the structure being settled, for choosing the diagnostic of a dangling script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer<'n> {
    /// End of input or of an argument.
    End,
    Brace,
    Right,
    Middle,
    Environment(&'n str),
    /// `&`, `\\`, `\cr`.
    Cell,
    /// A command acting on the current row, like `\over`.
    Command,
}

impl Closer<'_> {
    fn script_error(self, superscript: bool) -> ErrorKind {
        match self {
            Closer::End => ErrorKind::MissingScript,
            Closer::Brace => ErrorKind::ExtraCloseMissingOpen,
            Closer::Right => ErrorKind::MissingLeftExtraRight,
            Closer::Middle => ErrorKind::ExtraMiddle,
            Closer::Environment(name) => ErrorKind::MissingBeginExtraEnd(name.into()),
            Closer::Cell | Closer::Command if superscript => ErrorKind::MissingOpenForSup,
            Closer::Cell | Closer::Command => ErrorKind::MissingOpenForSub,
        }
    }
}

fn empty_base() -> Node {
    Node::token(NodeKind::Mi, "")
}

/// An internal `msubsup` or `munderover` with both script slots empty.
fn scripted(kind: NodeKind, base: Node) -> Node {
    let span = base.span;
    Node::with_children(kind, vec![base, Node::placeholder(), Node::placeholder()]).with_span(span)
}

fn with_default_span(mut node: Node, span: Span) -> Node {
    if node.span.is_empty() {
        node.span = span;
    }
    node
}

/// `\limits`, `\overline` and friends turn off movable limits on an operator.
fn fix_movable_limits(mo: &mut Node) {
    mo.remove_attr("movablelimits");
    let mut chars = mo.text.chars();
    let movable = match (chars.next(), chars.next()) {
        (Some(c), None) => tables::operator(c).is_some_and(tables::OperatorInfo::movable),
        _ => false,
    };
    if movable {
        mo.set_attr("movablelimits", "false");
    }
}

fn set_variant(node: &mut Node, font: Font) {
    if font == Font::Normal && node.kind != NodeKind::Mi {
        return;
    }
    if let Some(custom) = font.custom() {
        node.set_attr("data-mjx-variant", custom);
    }
    node.set_attr("mathvariant", font.mathvariant());
}

/// Fuse `\not` with a one-character relation, or hand the node back.
fn negate(mut node: Node) -> Result<Node, Node> {
    let mut chars = node.text.chars();
    let single = match (chars.next(), chars.next()) {
        (Some(c), None) if c.len_utf16() == 1 => Some(c),
        _ => None,
    };
    let negatable = matches!(node.kind, NodeKind::Mo | NodeKind::Mi | NodeKind::Mtext)
        && node.children.is_empty()
        && node.flags.movesupsub != Some(true);
    match single {
        Some(c) if negatable => {
            match tables::negation(c) {
                Some(negated) => node.text = negated.to_string(),
                None => node.text.push('\u{338}'),
            }
            node.remove_attr("stretchy");
            Ok(node)
        }
        _ => Err(node),
    }
}

/// The slash `\not` leaves in front of something it cannot negate.
fn negation_fallback() -> Node {
    let slash = Node::with_children(
        NodeKind::Mpadded,
        vec![Node::token(NodeKind::Mtext, "\u{29F8}")],
    )
    .with_attr("width", "0");
    Node::atom(TexClass::Rel, vec![slash])
}

fn raise(node: Node, shift: Dimension) -> Node {
    let span = node.span;
    Node::with_children(NodeKind::Mpadded, vec![node])
        .with_attr("height", shift.signed())
        .with_attr("depth", shift.negate().signed())
        .with_attr("voffset", shift.signed())
        .with_span(span)
}
