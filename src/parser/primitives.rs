//! The behavior of every character and built-in command.
//!
//! Handlers either push a finished node, open a container, or stack a [`Build`] and splice
//! its arguments back into the token source between argument markers, so that argument
//! content is parsed by the main loop like everything else.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    attribute::{em, DimensionUnit},
    node::{Attributes, Node, NodeKind, Span, TexClass},
    registry::{Delimiters, Handler, RuleKind, TextBox, Thickness},
};

use super::{
    error::{ErrorKind, InnerResult},
    fix_movable_limits, lex, set_variant,
    source::{spell, Mode, Token, TokenKind},
    state::{
        sized_delimiter, Build, BuildKind, Container, ContainerKind, Env, Item, Over, Pending,
        RootShift,
    },
    tables,
    text::{self, Part},
    with_default_span, Closer, Parser,
};

lazy_static! {
    static ref LETTERS: Regex = Regex::new(r"^[a-zA-Z]+").expect("valid regex");
    static ref ROMAN_OPERATOR: Regex =
        Regex::new(r"^\s*\\rm\s+([a-zA-Z0-9 ]+)$").expect("valid regex");
    static ref MML_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)^([a-z]+)\s*=\s*('[^']*'|"[^"]*"|[^ ,]*)\s*,?\s*"#)
            .expect("valid regex");
}

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "mathvariant",
    "mathsize",
    "mathcolor",
    "mathbackground",
    "dir",
    "fontfamily",
    "fontsize",
    "fontweight",
    "fontstyle",
    "color",
    "background",
    "id",
    "class",
    "href",
    "style",
];

const MO_ATTRIBUTES: &[&str] = &[
    "form",
    "fence",
    "separator",
    "lspace",
    "rspace",
    "stretchy",
    "symmetric",
    "maxsize",
    "minsize",
    "largeop",
    "movablelimits",
    "accent",
    "linebreak",
    "lineleading",
    "linebreakstyle",
    "linebreakmultchar",
    "indentalign",
    "indentshift",
    "indenttarget",
    "indentalignfirst",
    "indentshiftfirst",
    "indentalignlast",
    "indentshiftlast",
];

const MSPACE_ATTRIBUTES: &[&str] = &["width", "height", "depth", "linebreak"];
const MS_ATTRIBUTES: &[&str] = &["lquote", "rquote"];

impl<'a> Parser<'a> {
    /// Handle a character token.
    pub(super) fn character(&mut self, c: char, span: Span) -> InnerResult<()> {
        match c {
            '^' => self.script(true),
            '_' => self.script(false),
            '\'' | '\u{2019}' => self.primes(span),
            '&' => self.alignment_tab(span),
            '#' => Err(ErrorKind::CantUseHash),
            '~' => self.push_node(Node::token(NodeKind::Mtext, "\u{A0}").with_span(span)),
            c if c.is_ascii_digit() || c == '.' || c == ',' => self.number(c, span),
            c if c.is_alphabetic() => self.letter(c, span),
            c => self.other(c, span),
        }
    }

    fn number(&mut self, c: char, span: Span) -> InnerResult<()> {
        let rest = self.source.lookahead_text();
        let tail = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | ',' | '{' | '}')))
            .unwrap_or(rest.len());
        let candidate = format!("{c}{}", &rest[..tail]);
        let Some(found) = self
            .config
            .parser
            .digits
            .find(&candidate)
            .filter(|m| m.start() == 0)
        else {
            return self.other(c, span);
        };
        let text = found.as_str().replace(|c| c == '{' || c == '}', "");
        let consumed = found.end() - c.len_utf8();
        let span = if consumed > 0 {
            span.to(self.source.consume_bytes(consumed))
        } else {
            span
        };
        let mut mn = Node::token(NodeKind::Mn, text).with_span(span);
        self.apply_font(&mut mn, None, true);
        self.push_node(mn)
    }

    fn letter(&mut self, c: char, span: Span) -> InnerResult<()> {
        let pattern = match &self.config.parser.identifier_pattern {
            Some(pattern) => Some(pattern),
            None if self.env().multi_letter => Some(&*LETTERS),
            None => None,
        };
        let mut text = c.to_string();
        let mut span = span;
        if let Some(pattern) = pattern.filter(|_| c.is_ascii()) {
            let rest = self.source.lookahead_text();
            let tail = rest
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(rest.len());
            let candidate = format!("{c}{}", &rest[..tail]);
            if let Some(found) = pattern.find(&candidate).filter(|m| m.start() == 0) {
                if found.end() > c.len_utf8() {
                    text = found.as_str().to_owned();
                    span = span.to(self.source.consume_bytes(found.end() - c.len_utf8()));
                }
            }
        }
        let mut mi = Node::token(NodeKind::Mi, text).with_span(span);
        self.apply_font(&mut mi, None, true);
        self.push_node(mi)
    }

    fn other(&mut self, c: char, span: Span) -> InnerResult<()> {
        let mut mo = Node::token(NodeKind::Mo, tables::remap(c).to_string()).with_span(span);
        if !mark_operator(&mut mo) {
            mo.flags.bare_operator = true;
        }
        self.apply_font(&mut mo, None, true);
        self.push_node(mo)
    }

    /// Execute a built-in command.
    pub(super) fn handle_command(
        &mut self,
        name: &'a str,
        handler: Handler,
        span: Span,
    ) -> InnerResult<()> {
        let display = format!("\\{name}");
        match handler {
            Handler::Identifier(text, font) => {
                let mut mi = Node::token(NodeKind::Mi, text).with_span(span);
                self.apply_font(&mut mi, font, font.is_some());
                self.push_node(mi)
            }
            Handler::Operator(text, attributes) => {
                let mut mo = Node::token(NodeKind::Mo, text).with_span(span);
                for (attribute, value) in attributes {
                    mo.set_attr(attribute, *value);
                }
                mark_operator(&mut mo);
                self.apply_font(&mut mo, None, false);
                self.push_node(mo)
            }
            Handler::TextSymbol(text) => {
                self.push_node(Node::token(NodeKind::Mtext, text).with_span(span))
            }
            Handler::NamedFn(text) => {
                let mut mi = Node::token(NodeKind::Mi, text).with_span(span);
                mi.flags.function = true;
                self.push_node(mi)
            }
            Handler::NamedOp(text, movable) => {
                let mut mo = Node::token(NodeKind::Mo, text)
                    .with_class(TexClass::Op)
                    .with_span(span);
                if movable {
                    mo.set_attr("movablelimits", "true");
                    mo.flags.movesupsub = Some(true);
                }
                self.push_node(mo)
            }
            Handler::SetFont(font) => {
                if let Some(env) = self.env_mut() {
                    env.font = Some(font);
                }
                Ok(())
            }
            Handler::MathFont(font) => self.await_arguments(BuildKind::Font(font), &display, 1, span),
            Handler::BoldSymbol => self.await_arguments(BuildKind::BoldSymbol, &display, 1, span),
            Handler::BbmFont { regular, bold } => {
                let font = if self.bold_version { bold } else { regular };
                self.await_arguments(BuildKind::Font(Some(font)), &display, 1, span)
            }
            Handler::MathVersion => {
                let version = spell(&self.source.read_argument(&display)?);
                match version.trim() {
                    "bold" => self.bold_version = true,
                    "normal" => self.bold_version = false,
                    _ => {}
                }
                Ok(())
            }
            Handler::SetStyle { display: is_display, level } => {
                let mut attributes = Attributes::new();
                attributes.insert("displaystyle".into(), is_display.to_string());
                attributes.insert("scriptlevel".into(), level.to_string());
                let env = Env {
                    display: is_display,
                    level,
                    ..self.env()
                };
                self.open_with(ContainerKind::Style { attributes }, env, span);
                Ok(())
            }
            Handler::SetSize(size) => {
                let mut attributes = Attributes::new();
                attributes.insert("mathsize".into(), em(size));
                self.open(ContainerKind::Style { attributes }, span);
                Ok(())
            }
            Handler::TexAtom(class) => self.tex_atom(class, &display, span),
            Handler::Spacer(width) => {
                let space = Node::with_children(
                    NodeKind::Mstyle,
                    vec![Node::new(NodeKind::Mspace).with_attr("width", em(width))],
                )
                .with_attr("scriptlevel", "0")
                .with_span(span);
                self.push_node(space)
            }
            Handler::Hskip { nobreak } => {
                let width = if nobreak {
                    self.source.read_dimension(&display)?
                } else {
                    self.source.read_glue(&display)?
                };
                let width = match width.unit {
                    DimensionUnit::Mu => em(width.to_em()),
                    _ => width.to_string(),
                };
                let mut space = Node::new(NodeKind::Mspace)
                    .with_attr("width", width)
                    .with_span(span);
                if nobreak {
                    space.set_attr("linebreak", "nobreak");
                }
                self.push_node(space)
            }
            Handler::Frac => self.await_arguments(BuildKind::Frac, &display, 2, span),
            Handler::Sqrt => self.sqrt(&display, span),
            Handler::Root => {
                let index = self.source.read_up_to(&display, "of")?;
                let radicand = self.source.read_argument(&display)?;
                self.await_build(
                    Build::new(BuildKind::Root, 2, self.env(), span),
                    vec![index, radicand],
                )
            }
            Handler::MoveRoot { left } => self.move_root(left, &display),
            Handler::Over(style) => {
                self.settle(Closer::Command)?;
                match self.top_container() {
                    None => return Err(ErrorKind::Misplaced(display.into())),
                    Some(container) if container.row.over.is_some() => {
                        return Err(ErrorKind::AmbiguousUse(display.into()))
                    }
                    Some(_) => {}
                }
                let delimiters = match style.delimiters {
                    Delimiters::None => None,
                    Delimiters::Fixed(open, close) => Some((open, close)),
                    Delimiters::Read => {
                        let open = self.source.read_delimiter(&display)?;
                        let close = self.source.read_delimiter(&display)?;
                        Some((open, close))
                    }
                };
                let linethickness = match style.thickness {
                    Thickness::Default => None,
                    Thickness::Zero => Some(String::from("0")),
                    Thickness::Read => Some(self.source.read_dimension(&display)?.to_string()),
                };
                if let Some(container) = self.top_container() {
                    let numerator = std::mem::take(&mut container.row.nodes);
                    container.row.pending_fn = false;
                    container.row.over = Some(Over {
                        numerator,
                        linethickness,
                        delimiters,
                    });
                }
                Ok(())
            }
            Handler::BuildRel => {
                let top = self.source.read_up_to(&display, "over")?;
                let base = self.source.read_argument(&display)?;
                self.await_build(
                    Build::new(BuildKind::BuildRel, 2, self.env(), span),
                    vec![top, base],
                )
            }
            Handler::Left => {
                let open = self.source.read_delimiter(&display)?;
                self.open(ContainerKind::Left { open }, span);
                Ok(())
            }
            Handler::Right => self.right(&display, span),
            Handler::Middle => self.middle(&display, span),
            Handler::BigDelim { class, size } => {
                let text = self.source.read_delimiter(&display)?;
                self.push_node(sized_delimiter(text, class, &em(size)).with_span(span))
            }
            Handler::Accent { text, stretchy } => {
                self.await_arguments(BuildKind::Accent { text, stretchy }, &display, 1, span)
            }
            Handler::UnderOver {
                text,
                over,
                accent,
                stack,
            } => self.await_arguments(
                BuildKind::UnderOver {
                    text,
                    over,
                    accent,
                    stack,
                },
                &display,
                1,
                span,
            ),
            Handler::Set { over, class } => {
                self.await_arguments(BuildKind::Set { over, class }, &display, 2, span)
            }
            Handler::Phantom {
                vertical,
                horizontal,
            } => self.await_arguments(
                BuildKind::Phantom {
                    vertical,
                    horizontal,
                },
                &display,
                1,
                span,
            ),
            Handler::Smash => {
                let (height, depth) = match self.source.read_optional(&display)? {
                    Some(option) => match spell(&option).trim() {
                        "t" => (true, false),
                        "b" => (false, true),
                        _ => (true, true),
                    },
                    None => (true, true),
                };
                self.await_arguments(BuildKind::Smash { height, depth }, &display, 1, span)
            }
            Handler::Lap { left } => {
                self.await_arguments(BuildKind::Lap { left }, &display, 1, span)
            }
            Handler::Raise { up } => {
                let shift = self.source.read_dimension(&display)?;
                let (name, shift) = if up {
                    ("\\raise", shift)
                } else {
                    ("\\lower", shift.negate())
                };
                self.stack.push(Item::Pending(Pending::Raise { name, shift }));
                Ok(())
            }
            Handler::Rule(kind) => {
                let width = self.source.read_dimension(&display)?;
                let height = self.source.read_dimension(&display)?;
                let mut rule = Node::new(NodeKind::Mspace)
                    .with_attr("width", width.to_string())
                    .with_attr("height", height.to_string())
                    .with_span(span);
                if kind != RuleKind::Rule {
                    let depth = self.source.read_dimension(&display)?;
                    rule.set_attr("depth", depth.to_string());
                }
                if kind != RuleKind::Space {
                    rule.set_attr("mathbackground", "black");
                }
                self.push_node(rule)
            }
            Handler::Strut => {
                let strut = Node::with_children(NodeKind::Mpadded, vec![Node::new(NodeKind::Mrow)])
                    .with_attr("height", "8.6pt")
                    .with_attr("depth", "3pt")
                    .with_attr("width", "0")
                    .with_span(span);
                self.push_node(strut)
            }
            Handler::Not => {
                self.stack.push(Item::Pending(Pending::Not));
                Ok(())
            }
            Handler::Limits(limits) => self.limits(limits, name),
            Handler::Unicode => {
                self.source.read_optional(&display)?;
                let argument = spell(&self.source.read_argument(&display)?);
                let c = lex::code_point(argument.trim())
                    .ok_or_else(|| ErrorKind::NumberArgument(display.into()))?;
                self.push_node(Node::token(NodeKind::Mtext, c.to_string()).with_span(span))
            }
            Handler::MmlToken => self.mml_token(&display, span),
            Handler::Label => {
                let label = spell(&self.source.read_argument(&display)?);
                if self.hints.labels.contains(&label) {
                    return Err(ErrorKind::MultipleLabel(label.into()));
                }
                self.hints.labels.push(label);
                Ok(())
            }
            Handler::Tag => {
                if self.source.peek_char() == Some('*') {
                    self.source.next();
                }
                let tag = spell(&self.source.read_argument(&display)?);
                if self.tagged {
                    return Err(ErrorKind::MultipleCommand(display.into()));
                }
                self.tagged = true;
                self.hints.tags.push(tag);
                Ok(())
            }
            Handler::NoNumber | Handler::Ignore => Ok(()),
            Handler::HFill => self.hfill(),
            Handler::Cr => self.cr(span),
            Handler::Linebreak => self.linebreak(span),
            Handler::Hline { dashed } => self.hline(dashed),
            Handler::Def => self.def(&display),
            Handler::Let => self.let_assignment(&display),
            Handler::NewCommand => self.new_command(&display),
            Handler::Begin => self.begin_environment(span),
            Handler::End => self.end_environment(span),
            Handler::Matrix(style) => self.matrix(style, &display, span),
            Handler::TextBox(kind) => self.text_box(kind, &display, span),
            Handler::MathChoice => {
                let mut choices = Vec::with_capacity(4);
                for _ in 0..4 {
                    choices.push(self.source.read_argument(&display)?);
                }
                let chosen = choices.swap_remove(self.env().choice());
                self.prepend_argument(chosen, span);
                Ok(())
            }
            Handler::ArrayEnv | Handler::MatrixEnv(_) | Handler::Equation => {
                Err(ErrorKind::Misplaced(display.into()))
            }
        }
    }

    /// Read `count` arguments and stack a build waiting for them.
    fn await_arguments(
        &mut self,
        kind: BuildKind,
        name: &str,
        count: usize,
        span: Span,
    ) -> InnerResult<()> {
        let mut arguments = Vec::with_capacity(count);
        for _ in 0..count {
            arguments.push(self.source.read_argument(name)?);
        }
        self.await_build(Build::new(kind, count, self.env(), span), arguments)
    }

    /// Stack `build` and splice `arguments` back for its empty slots.
    fn await_build(&mut self, build: Build, arguments: Vec<Vec<Token<'a>>>) -> InnerResult<()> {
        if build.is_complete() {
            let node = self.finish_build(build)?;
            return self.push_node(node);
        }
        let span = build.span;
        self.stack.push(Item::Pending(Pending::Build(build)));
        for argument in arguments.into_iter().rev() {
            self.prepend_argument(argument, span);
        }
        Ok(())
    }

    fn prepend_argument(&mut self, tokens: Vec<Token<'a>>, span: Span) {
        self.source.prepend(
            std::iter::once(Token::new(TokenKind::BeginArgument, span))
                .chain(tokens)
                .chain(std::iter::once(Token::new(TokenKind::EndArgument, span)))
                .collect::<Vec<_>>(),
        );
    }

    fn tex_atom(&mut self, class: TexClass, name: &str, span: Span) -> InnerResult<()> {
        let argument = self.source.read_argument(name)?;
        if class == TexClass::Op {
            if let Some(captures) = ROMAN_OPERATOR.captures(&spell(&argument)) {
                let mut mi = Node::token(NodeKind::Mi, captures[1].trim())
                    .with_class(TexClass::Op)
                    .with_attr("mathvariant", "normal")
                    .with_span(span);
                mi.flags.movesupsub = Some(true);
                mi.flags.function = true;
                return self.push_node(mi);
            }
        }
        self.await_build(
            Build::new(BuildKind::Atom(class), 1, self.env(), span),
            vec![argument],
        )
    }

    fn sqrt(&mut self, name: &str, span: Span) -> InnerResult<()> {
        let index = self.source.read_optional(name)?;
        let mut radicand = self.source.read_argument(name)?;
        if let [token] = radicand[..] {
            if token.is_control_sequence("frac") {
                for _ in 0..2 {
                    let argument = self.source.read_argument("\\frac")?;
                    radicand.push(Token::new(TokenKind::BeginGroup, token.span));
                    radicand.extend(argument);
                    radicand.push(Token::new(TokenKind::EndGroup, token.span));
                }
            }
        }
        match index {
            Some(index) if !index.is_empty() => self.await_build(
                Build::new(BuildKind::Root, 2, self.env(), span),
                vec![index, radicand],
            ),
            _ => self.await_build(
                Build::new(BuildKind::Sqrt, 1, self.env(), span),
                vec![radicand],
            ),
        }
    }

    /// `\uproot` and `\leftroot`, recorded on the index being parsed.
    fn move_root(&mut self, left: bool, name: &str) -> InnerResult<()> {
        let Some(shift) = self.root_shift() else {
            return Err(ErrorKind::MisplacedMoveRoot(name.into()));
        };
        let taken = if left { &shift.left } else { &shift.up };
        if taken.is_some() {
            return Err(ErrorKind::MultipleMoveRoot(name.into()));
        }
        let argument = spell(&self.source.read_argument(name)?);
        let n = lex::full_integer(argument.trim())
            .ok_or_else(|| ErrorKind::IntegerArgument(name.into()))?;
        let mut value = format!("{}em", n as f64 / 15.0);
        if n >= 0 {
            value.insert(0, '+');
        }
        if let Some(shift) = self.root_shift() {
            if left {
                shift.left = Some(value);
            } else {
                shift.up = Some(value);
            }
        }
        Ok(())
    }

    fn root_shift(&mut self) -> Option<&mut RootShift> {
        self.stack.iter_mut().rev().find_map(|item| match item {
            Item::Container(Container {
                kind:
                    ContainerKind::Argument {
                        root_index: Some(shift),
                        ..
                    },
                ..
            }) => Some(shift),
            _ => None,
        })
    }

    fn right(&mut self, name: &str, span: Span) -> InnerResult<()> {
        let close = self.source.read_delimiter(name)?;
        self.settle(Closer::Right)?;
        match self.stack.pop() {
            Some(Item::Container(Container {
                kind: ContainerKind::Left { open },
                row,
                span: start,
            })) => {
                let mut children = vec![fence(open, TexClass::Open)];
                children.extend(row.finish());
                children.push(fence(close, TexClass::Close));
                self.push_node(Node::atom(TexClass::Inner, children).with_span(start.to(span)))
            }
            Some(item) => {
                self.stack.push(item);
                Err(ErrorKind::MissingLeftExtraRight)
            }
            None => Err(ErrorKind::MissingLeftExtraRight),
        }
    }

    fn middle(&mut self, name: &str, span: Span) -> InnerResult<()> {
        let text = self.source.read_delimiter(name)?;
        self.settle(Closer::Middle)?;
        let Some(Container {
            kind: ContainerKind::Left { .. },
            row,
            ..
        }) = self.top_container()
        else {
            return Err(ErrorKind::ExtraMiddle);
        };
        let mut mo = Node::token(NodeKind::Mo, text).with_span(span);
        if !dictionary(text).is_some_and(tables::OperatorInfo::stretchy) {
            mo.set_attr("stretchy", "true");
        }
        row.append(Node::atom(TexClass::Close, Vec::new()));
        row.append(mo);
        row.append(Node::atom(TexClass::Open, Vec::new()));
        Ok(())
    }

    /// `\mmlToken{kind}[attributes]{text}`.
    fn mml_token(&mut self, name: &str, span: Span) -> InnerResult<()> {
        let kind_name = spell(&self.source.read_argument(name)?).trim().to_owned();
        let options = self.source.read_optional(name)?.map(|tokens| spell(&tokens));
        let text = spell(&self.source.read_argument(name)?);
        let kind = NodeKind::from_tag(&kind_name)
            .filter(|kind| kind.is_token())
            .ok_or_else(|| ErrorKind::NotTokenElement(kind_name.as_str().into()))?;

        let mut node = Node::token(kind, text).with_span(span);
        let mut rest = options.as_deref().unwrap_or("").trim_start();
        while !rest.is_empty() {
            let captures = MML_ATTRIBUTE
                .captures(rest)
                .ok_or_else(|| ErrorKind::InvalidAttribute(rest.into()))?;
            let attribute = &captures[1];
            if !allows_attribute(kind, attribute) {
                return Err(ErrorKind::UnknownAttribute(
                    attribute.into(),
                    kind_name.as_str().into(),
                ));
            }
            let value = unquote(&captures[2]);
            let value = match value {
                v if v.eq_ignore_ascii_case("true") => "true",
                v if v.eq_ignore_ascii_case("false") => "false",
                v => v,
            };
            if !value.is_empty() {
                node.set_attr(attribute, value);
            }
            rest = &rest[captures[0].len()..];
        }
        self.push_node(node)
    }

    /// `\text`, `\mbox`, `\hbox` and `\fbox`: text with embedded math.
    fn text_box(&mut self, kind: TextBox, name: &str, span: Span) -> InnerResult<()> {
        self.source.push_mode(Mode::Text);
        let argument = self.source.read_argument(name);
        self.source.pop_mode();
        let parts = text::split(&argument?)?;
        self.text_parts(kind, parts, span)
    }

    pub(super) fn text_parts(
        &mut self,
        kind: TextBox,
        parts: Vec<Part<'a>>,
        span: Span,
    ) -> InnerResult<()> {
        let font = self.env().font;
        let mut build = Build::new(BuildKind::TextBox(kind), parts.len(), self.env(), span);
        let mut math = Vec::new();
        for (slot, part) in parts.into_iter().enumerate() {
            match part {
                Part::Text(text) => {
                    let mut mtext = Node::token(NodeKind::Mtext, text).with_span(span);
                    if let Some(font) = font {
                        set_variant(&mut mtext, font);
                    }
                    build.slots[slot] = Some(mtext);
                }
                Part::Math(tokens) => math.push(tokens),
            }
        }
        self.await_build(build, math)
    }

    /// `\def\name<parameters>{body}`.
    fn def(&mut self, name: &str) -> InnerResult<()> {
        let defined = self.control_sequence_name(name)?;
        let mut parameters = Vec::new();
        loop {
            let token = self
                .source
                .next_raw()
                .ok_or_else(|| ErrorKind::MissingArgument(name.into()))?;
            if token.kind == TokenKind::BeginGroup {
                break;
            }
            parameters.push(token);
        }
        let body = self.source.read_group()?;
        self.macros
            .define(defined, &parameters, &body, self.storage)
    }

    /// `\let\name=token`.
    fn let_assignment(&mut self, name: &str) -> InnerResult<()> {
        let defined = self.control_sequence_name(name)?;
        let mut token = self
            .source
            .next_significant()
            .ok_or_else(|| ErrorKind::MissingArgument(name.into()))?;
        if token.is_char('=') {
            token = self
                .source
                .next_significant()
                .ok_or_else(|| ErrorKind::MissingArgument(name.into()))?;
        }
        self.macros.assign(defined, token);
        Ok(())
    }

    /// `\newcommand{\name}[count][default]{body}`, also `\renewcommand`.
    fn new_command(&mut self, name: &str) -> InnerResult<()> {
        let argument = self.source.read_argument(name)?;
        let mut significant = argument.iter().filter(|t| t.kind != TokenKind::Space);
        let defined = match (significant.next(), significant.next()) {
            (
                Some(Token {
                    kind: TokenKind::ControlSequence(cs),
                    ..
                }),
                None,
            ) if !cs.is_empty() => *cs,
            _ => return Err(ErrorKind::IllegalControlSequenceName(name.into())),
        };
        let count = match self.source.read_optional(name)? {
            Some(count) => spell(&count)
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|n| *n <= 9)
                .ok_or_else(|| ErrorKind::IllegalParameterCount(name.into()))?,
            None => 0,
        };
        let default = self.source.read_optional(name)?;
        let body = self.source.read_argument(name)?;
        self.macros
            .insert_command(defined, count, default.as_deref(), &body, self.storage)
    }

    fn control_sequence_name(&mut self, name: &str) -> InnerResult<&'a str> {
        match self.source.next_significant() {
            Some(Token {
                kind: TokenKind::ControlSequence(cs),
                ..
            }) if !cs.is_empty() => Ok(cs),
            _ => Err(ErrorKind::MissingControlSequence(name.into())),
        }
    }

    /// Turn a complete build into its node.
    pub(super) fn finish_build(&mut self, build: Build) -> InnerResult<Node> {
        let span = build
            .slots
            .iter()
            .flatten()
            .fold(build.span, |span, node| {
                if node.span.is_empty() {
                    span
                } else {
                    span.to(node.span)
                }
            });
        let count = build.slots.len();
        let mut arguments = build.slots.into_iter().flatten();
        let mut next = move || arguments.next().unwrap_or_else(|| Node::new(NodeKind::Mrow));

        let node = match build.kind {
            BuildKind::Frac => Node::with_children(NodeKind::Mfrac, vec![next(), next()]),
            BuildKind::Sqrt => Node::with_children(NodeKind::Msqrt, flatten(next())),
            BuildKind::Root => {
                let index = next();
                let radicand = next();
                Node::with_children(NodeKind::Mroot, vec![radicand, index])
            }
            BuildKind::Atom(class) => {
                let mut atom = Node::atom(class, flatten(next()));
                if class == TexClass::Op {
                    atom.flags.movesupsub = Some(true);
                }
                atom
            }
            BuildKind::Font(_) => Node::atom(TexClass::Ord, flatten(next())),
            BuildKind::BoldSymbol => next(),
            BuildKind::Phantom {
                vertical,
                horizontal,
            } => {
                let phantom = Node::with_children(NodeKind::Mphantom, flatten(next()));
                let inner = match (vertical, horizontal) {
                    (true, false) => {
                        Node::with_children(NodeKind::Mpadded, vec![phantom]).with_attr("width", "0")
                    }
                    (false, true) => Node::with_children(NodeKind::Mpadded, vec![phantom])
                        .with_attr("height", "0")
                        .with_attr("depth", "0"),
                    _ => phantom,
                };
                Node::atom(TexClass::Ord, vec![inner])
            }
            BuildKind::Smash { height, depth } => {
                let mut padded = Node::with_children(NodeKind::Mpadded, flatten(next()));
                if height {
                    padded.set_attr("height", "0");
                }
                if depth {
                    padded.set_attr("depth", "0");
                }
                Node::atom(TexClass::Ord, vec![padded])
            }
            BuildKind::Lap { left } => {
                let mut padded =
                    Node::with_children(NodeKind::Mpadded, flatten(next())).with_attr("width", "0");
                if left {
                    padded.set_attr("lspace", "-1width");
                }
                Node::atom(TexClass::Ord, vec![padded])
            }
            BuildKind::Accent { text, stretchy } => {
                let mut accent = Node::token(NodeKind::Mo, text);
                if dictionary(text).is_some_and(tables::OperatorInfo::stretchy) != stretchy {
                    accent.set_attr("stretchy", stretchy.to_string());
                }
                let over = Node::with_children(NodeKind::Mover, vec![next(), accent]);
                Node::atom(TexClass::Ord, vec![over])
            }
            BuildKind::UnderOver {
                text,
                over,
                accent,
                stack,
            } => {
                let mut base = next();
                check_movable_limits(&mut base);
                let embellished = matches!(
                    base.kind,
                    NodeKind::Munderover | NodeKind::Munder | NodeKind::Mover
                );
                if embellished {
                    if let Some(core) = base.core_mo_mut() {
                        core.set_attr("lspace", "0");
                        core.set_attr("rspace", "0");
                        let spacer = Node::token(NodeKind::Mo, "").with_attr("rspace", "0");
                        base = Node::with_children(NodeKind::Mrow, vec![spacer, base]);
                    }
                }
                let mut mark = Node::token(NodeKind::Mo, text);
                if accent {
                    mark.set_attr("accent", "true");
                }
                let kind = if over {
                    NodeKind::Mover
                } else {
                    NodeKind::Munder
                };
                let node = Node::with_children(kind, vec![base, mark]);
                if stack {
                    let mut atom = Node::atom(TexClass::Op, vec![node]);
                    atom.flags.movesupsub = Some(true);
                    atom
                } else {
                    node
                }
            }
            BuildKind::Set { over, class } => {
                let mut script = next();
                let mut base = next();
                check_movable_limits(&mut base);
                if script.kind == NodeKind::Mo {
                    script.set_attr("accent", "false");
                }
                let kind = if over {
                    NodeKind::Mover
                } else {
                    NodeKind::Munder
                };
                let node = Node::with_children(kind, vec![base, script]);
                match class {
                    Some(class) => Node::atom(class, vec![node]),
                    None => node,
                }
            }
            BuildKind::BuildRel => {
                let top = next();
                let base = next();
                Node::atom(
                    TexClass::Rel,
                    vec![Node::with_children(NodeKind::Mover, vec![base, top])],
                )
            }
            BuildKind::TextBox(kind) => {
                let nodes: Vec<Node> = (0..count).map(|_| next()).collect();
                match kind {
                    TextBox::Text if count == 0 => Node::token(NodeKind::Mtext, ""),
                    TextBox::Text => Node::row(nodes),
                    TextBox::Mbox | TextBox::Hbox => Node::with_children(NodeKind::Mstyle, nodes)
                        .with_attr("displaystyle", "false")
                        .with_attr("scriptlevel", "0"),
                    TextBox::Fbox => {
                        Node::with_children(NodeKind::Menclose, nodes).with_attr("notation", "box")
                    }
                }
            }
        };
        Ok(with_default_span(node, span))
    }
}

/// The index of a root moved by `\uproot` and `\leftroot`.
pub(super) fn shifted_index(content: Vec<Node>, shift: RootShift) -> Node {
    let mut node = Node::with_children(NodeKind::Mpadded, content);
    if let Some(left) = shift.left {
        node.set_attr("width", left);
    }
    if let Some(up) = shift.up {
        node.set_attr("voffset", up.clone());
        node.set_attr("height", up);
    }
    node
}

/// The children of a plain row, or the node itself.
fn flatten(node: Node) -> Vec<Node> {
    if node.kind == NodeKind::Mrow && node.texclass.is_none() && !node.is_placeholder() {
        node.children
    } else {
        vec![node]
    }
}

fn dictionary(text: &str) -> Option<tables::OperatorInfo> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => tables::operator(c),
        _ => None,
    }
}

/// Apply what the operator dictionary says about a one-character `mo`. Returns whether the
/// character is in the dictionary.
fn mark_operator(mo: &mut Node) -> bool {
    let Some(info) = dictionary(&mo.text) else {
        return false;
    };
    if info.stretchy() {
        if info.class == TexClass::Ord {
            mo.texclass = Some(TexClass::Ord);
            mo.class = TexClass::Ord;
        }
        if mo.attr("stretchy").is_none() {
            mo.set_attr("stretchy", "false");
        }
    }
    if info.movable() {
        mo.flags.movesupsub = Some(true);
    }
    true
}

/// A delimiter of `\left..\right`, carrying the fence properties its character lacks.
pub(super) fn fence(text: &str, class: TexClass) -> Node {
    let info = dictionary(text);
    let mut mo = Node::token(NodeKind::Mo, text).with_class(class);
    if !info.is_some_and(tables::OperatorInfo::fence) {
        mo.set_attr("fence", "true");
    }
    if !info.is_some_and(tables::OperatorInfo::stretchy) {
        mo.set_attr("stretchy", "true");
    }
    if !info.is_some_and(tables::OperatorInfo::symmetric) {
        mo.set_attr("symmetric", "true");
    }
    mo
}

/// An operator placed under or over something keeps its limits at the side.
fn check_movable_limits(base: &mut Node) {
    if base.kind != NodeKind::Mo {
        return;
    }
    let movable = base.attr("movablelimits") == Some("true")
        || dictionary(&base.text).is_some_and(tables::OperatorInfo::movable);
    if movable {
        base.set_attr("movablelimits", "false");
    } else {
        fix_movable_limits(base);
    }
}

fn allows_attribute(kind: NodeKind, attribute: &str) -> bool {
    let specific: &[&str] = match kind {
        NodeKind::Mo => MO_ATTRIBUTES,
        NodeKind::Mspace => MSPACE_ATTRIBUTES,
        NodeKind::Ms => MS_ATTRIBUTES,
        _ => &[],
    };
    GLOBAL_ATTRIBUTES.contains(&attribute) || specific.contains(&attribute)
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{parser::ParserError, Configuration, Node, NodeKind, Parser, Storage, TexClass};

    fn parse(input: &str) -> Result<Node, ParserError> {
        let config = Configuration::default();
        let storage = Storage::new();
        Parser::new(input, &config, &storage).try_parse()
    }

    fn first(input: &str) -> Node {
        let mut root = parse(input).unwrap();
        root.children.remove(0)
    }

    #[test]
    fn numbers() {
        let root = parse("1{,}000.10").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text, "1,000.10");
        let root = parse("1{,}0000.10").unwrap();
        assert_eq!(root.children[0].text, "1,000");
        assert_eq!(root.children[1].text, "0.10");
    }

    #[test]
    fn literal_operators() {
        let bar = first("|");
        assert_eq!(bar.texclass, Some(TexClass::Ord));
        assert_eq!(bar.attr("stretchy"), Some("false"));
        let minus = first("-");
        assert_eq!(minus.text, "\u{2212}");
        assert!(minus.attributes.is_empty());
        let dollar = first("$");
        assert_eq!(dollar.kind, NodeKind::Mrow);
        assert_eq!(dollar.texclass, Some(TexClass::Ord));
    }

    #[test]
    fn fonts() {
        let group = first(r"\mathbf{\Upsilon}");
        assert_eq!(group.children[0].attr("mathvariant"), Some("bold"));
        let group = first(r"\mathrm{+}");
        assert_eq!(group.children[0].attr("mathvariant"), None);
        let root = parse(r"\rm ab").unwrap();
        assert_eq!(root.children[1].attr("mathvariant"), Some("normal"));
    }

    #[test]
    fn roman_operator() {
        let root = parse(r"\mathop{\rm a} b").unwrap();
        assert_eq!(root.children[0].kind, NodeKind::Mi);
        assert_eq!(root.children[0].texclass, Some(TexClass::Op));
        assert_eq!(root.children[1].text, "\u{2061}");
    }

    #[test]
    fn moved_root_index() {
        let root = first(r"\sqrt[\leftroot{-2}\uproot{2}\beta]{k}");
        assert_eq!(root.kind, NodeKind::Mroot);
        let index = &root.children[1];
        assert_eq!(index.attr("width"), Some("-0.13333333333333333em"));
        assert_eq!(index.attr("voffset"), Some("+0.13333333333333333em"));
        assert_eq!(
            parse(r"\uproot{2}").unwrap_err().message(),
            r"\uproot can appear only within a root"
        );
        assert_eq!(
            parse(r"\sqrt[\uproot{2}\uproot{3}]{k}").unwrap_err().message(),
            r"Multiple use of \uproot"
        );
        assert_eq!(
            parse(r"\sqrt[\uproot{a}]{k}").unwrap_err().message(),
            r"The argument to \uproot must be an integer"
        );
    }

    #[test]
    fn fences() {
        let inner = first(r"\left. ab \right)");
        assert_eq!(inner.texclass, Some(TexClass::Inner));
        assert_eq!(inner.children[0].attr("fence"), Some("true"));
        assert_eq!(inner.children[3].attributes.len(), 0);
        let inner = first(r"\left(a\middle|b\right)");
        assert_eq!(inner.children.len(), 7);
        assert_eq!(inner.children[2].texclass, Some(TexClass::Close));
        assert_eq!(parse(r"a\middle|").unwrap_err().message(), r"Extra \middle");
        assert_eq!(
            parse(r"a\right)").unwrap_err().message(),
            r"Missing \left or extra \right"
        );
    }

    #[test]
    fn over_family() {
        let frac = first(r"1 \above 2pt 2");
        assert_eq!(frac.attr("linethickness"), Some("2pt"));
        assert_eq!(
            parse(r"1 \over 2 \over 3").unwrap_err().message(),
            r"Ambiguous use of \over"
        );
    }

    #[test]
    fn under_over_on_operators() {
        let over = first(r"\overline{\sum}");
        assert_eq!(over.children[0].attr("movablelimits"), Some("false"));
        let over = first(r"\overline{\sum^2_3}");
        assert_eq!(over.children[0].kind, NodeKind::Mrow);
        assert_eq!(over.children[0].children[0].attr("rspace"), Some("0"));
    }

    #[test]
    fn mml_token_attributes() {
        let node = first(r#"\mmlToken{mo}[stretchy="False", lspace=2em]{+}"#);
        assert_eq!(node.attr("stretchy"), Some("false"));
        assert_eq!(node.attr("lspace"), Some("2em"));
        assert_eq!(
            parse(r"\mmlToken{mrow}{}").unwrap_err().message(),
            "mrow is not a token element"
        );
        assert_eq!(
            parse(r"\mmlToken{mi}[movablelimit=true]{}").unwrap_err().message(),
            "movablelimit is not a recognized attribute for mi"
        );
        assert_eq!(
            parse(r"\mmlToken{mi}[m1=true]{}").unwrap_err().message(),
            "Invalid MathML attribute: m1=true"
        );
    }

    #[test]
    fn text_boxes() {
        let text = first(r"\text{c$d$e}");
        assert_eq!(text.kind, NodeKind::Mrow);
        assert_eq!(text.children.len(), 3);
        assert_eq!(text.children[1].texclass, Some(TexClass::Ord));
        let fbox = first(r"\fbox{x}");
        assert_eq!(fbox.attr("notation"), Some("box"));
        assert_eq!(
            parse(r"a\mbox{$}} c").unwrap_err().message(),
            "Math not terminated in text box"
        );
    }

    #[test]
    fn definitions() {
        let root = parse(r"\def\x#1{#1#1}\x a").unwrap();
        assert_eq!(root.children.len(), 2);
        let root = parse(r"\newcommand{\p}[2][x]{#1+#2}\p{y}").unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].text, "x");
        let root = parse(r"\let\plus=+ a\plus b").unwrap();
        assert_eq!(root.children[1].text, "+");
        assert_eq!(
            parse(r"\def x").unwrap_err().message(),
            r"\def must be followed by a control sequence"
        );
        assert_eq!(
            parse(r"\newcommand{x}{y}").unwrap_err().message(),
            r"Illegal control sequence name for \newcommand"
        );
        assert_eq!(
            parse(r"\newcommand{\x}[12]{y}").unwrap_err().message(),
            r"Illegal number of parameters specified in \newcommand"
        );
    }

    #[test]
    fn labels_and_tags() {
        assert_eq!(
            parse(r"\label{a}\label{a}").unwrap_err().message(),
            "Label 'a' multiply defined"
        );
        assert_eq!(
            parse(r"\tag{1}\tag{2}").unwrap_err().message(),
            r"Multiple \tag"
        );
        assert_eq!(
            parse(r"\unicode{zz}").unwrap_err().message(),
            r"Argument to \unicode must be a number"
        );
    }
}
