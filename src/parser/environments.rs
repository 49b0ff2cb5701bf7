//! Tables and `\begin..\end` environments.
//!
//! A table is a [`Table`] pending on the stack with a [`ContainerKind::Cell`] container above
//! it. `&` and `\\` close the cell into the table, `\end` (or the end of the argument of
//! `\matrix` and friends) closes the whole table into an `mtable`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    attribute::{em, Dimension},
    node::{Node, NodeKind, Span, TexClass},
    packages::array_environment_style,
    registry::{Descriptor, Handler, TableStyle, TextBox},
};

use super::{
    error::{ErrorKind, InnerResult},
    lex, macros,
    primitives::fence,
    source::{spell, Token, TokenKind},
    state::{Container, ContainerKind, Env, Item, Pending, Table},
    text, Closer, Parser,
};

lazy_static! {
    static ref ENVIRONMENT_NAME: Regex = Regex::new(r"^[a-zA-Z]+\*?$").expect("valid regex");
}

/// Sides of a frame, in the order `data-frame-styles` lists them.
const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

impl<'a> Parser<'a> {
    /// `&`
    pub(super) fn alignment_tab(&mut self, span: Span) -> InnerResult<()> {
        if !self.in_table() {
            return Err(ErrorKind::Misplaced("&".into()));
        }
        self.settle(Closer::Cell)?;
        self.close_cell()?;
        let cases = match self.stack.last() {
            Some(Item::Pending(Pending::Table(table))) if table.style.cases => {
                if table.cells.len() > 1 {
                    return Err(ErrorKind::ExtraAlignTab);
                }
                true
            }
            _ => false,
        };
        self.open_cell(span);
        if cases {
            self.cases_text(span)?;
        }
        Ok(())
    }

    /// `\\` and `\newline`: a new table row, or a line break outside tables.
    pub(super) fn linebreak(&mut self, span: Span) -> InnerResult<()> {
        let spacing = match self.source.read_optional("\\\\")? {
            Some(tokens) => Some(
                lex::full_dimension(&spell(&tokens))
                    .ok_or_else(|| ErrorKind::BracketMustBeDimension("\\\\".into()))?,
            ),
            None => None,
        };
        if self.in_table() {
            return self.end_row(spacing, span);
        }
        let mut mspace = Node::new(NodeKind::Mspace)
            .with_attr("linebreak", "newline")
            .with_span(span);
        if let Some(spacing) = spacing {
            mspace.set_attr("data-lineleading", spacing.to_string());
        }
        self.push_node(mspace)
    }

    /// `\cr`
    pub(super) fn cr(&mut self, span: Span) -> InnerResult<()> {
        if !self.in_table() {
            return Err(ErrorKind::Misplaced("\\cr".into()));
        }
        self.end_row(None, span)
    }

    /// `\hline` and `\hdashline`: a line under the previous row, or the top of the frame.
    pub(super) fn hline(&mut self, dashed: bool) -> InnerResult<()> {
        let name = if dashed { "\\hdashline" } else { "\\hline" };
        if !self.in_table() {
            return Err(ErrorKind::Misplaced(name.into()));
        }
        let line = if dashed { "dashed" } else { "solid" };
        let Some(table) = self.stack.iter_mut().rev().find_map(|item| match item {
            Item::Pending(Pending::Table(table)) => Some(table),
            _ => None,
        }) else {
            return Err(ErrorKind::Misplaced(name.into()));
        };
        match table.row_lines.last_mut() {
            Some(last) => *last = line,
            None if !table.frame.iter().any(|(side, _)| *side == "top") => {
                table.frame.push(("top", line))
            }
            None => {}
        }
        Ok(())
    }

    /// `\hfill` at the start or the end of a cell aligns its content.
    pub(super) fn hfill(&mut self) -> InnerResult<()> {
        if let [.., Item::Pending(Pending::Table(table)), Item::Container(Container {
            kind: ContainerKind::Cell,
            row,
            ..
        })] = &mut self.stack[..]
        {
            table.hfill.push(row.nodes.len());
            return Ok(());
        }
        Err(ErrorKind::UnsupportedUse("\\hfill".into()))
    }

    /// `\matrix{..}`, `\pmatrix{..}`, `\cases{..}`, ...: the argument is the table body.
    pub(super) fn matrix(
        &mut self,
        style: &'static TableStyle,
        name: &str,
        span: Span,
    ) -> InnerResult<()> {
        let body = self.source.read_argument(name)?;
        self.stack
            .push(Item::Pending(Pending::Table(Table::new(style, None, span))));
        self.open_cell(span);
        self.source.prepend(
            body.into_iter()
                .chain(std::iter::once(Token::new(TokenKind::EndArgument, span)))
                .collect::<Vec<_>>(),
        );
        Ok(())
    }

    /// Whether `container` is the last cell of a table opened by `\matrix` and friends.
    pub(super) fn is_plain_cell(&self, container: &Container) -> bool {
        matches!(container.kind, ContainerKind::Cell)
            && matches!(
                self.stack.last(),
                Some(Item::Pending(Pending::Table(Table { name: None, .. })))
            )
    }

    /// Close the table below the stack top, with `cell` as its last cell.
    pub(super) fn finish_table(&mut self, cell: Container) -> InnerResult<()> {
        self.add_cell(cell)?;
        let Some(Item::Pending(Pending::Table(mut table))) = self.stack.pop() else {
            return Err(ErrorKind::MissingCloseBrace);
        };
        let trailing_empty = !table.rows.is_empty()
            && table.cells.len() == 1
            && table.cells[0].children.is_empty();
        if trailing_empty {
            table.cells.clear();
        } else {
            push_row(&mut table, None);
        }
        self.tagged = false;
        self.push_node(table_node(table))
    }

    /// `\begin{name}`
    pub(super) fn begin_environment(&mut self, span: Span) -> InnerResult<()> {
        let name = spell(&self.source.read_argument("\\begin")?);
        if !ENVIRONMENT_NAME.is_match(&name) {
            return Err(ErrorKind::InvalidEnvironmentName(name.into()));
        }
        let config = self.config;
        match config.registry.lookup_environment(&name) {
            Some(&Descriptor::Builtin(Handler::ArrayEnv)) => {
                let preamble = self
                    .source
                    .read_argument(&format!("\\begin{{{name}}}"))?;
                let mut table = Table::new(array_environment_style(), Some(name), span);
                apply_preamble(&mut table, &preamble)?;
                self.stack.push(Item::Pending(Pending::Table(table)));
                self.open_cell(span);
                Ok(())
            }
            Some(&Descriptor::Builtin(Handler::MatrixEnv(style))) => {
                if style.equation && self.in_equation() {
                    return Err(ErrorKind::ErroneousNesting);
                }
                self.stack.push(Item::Pending(Pending::Table(Table::new(
                    style,
                    Some(name),
                    span,
                ))));
                self.open_cell(span);
                Ok(())
            }
            Some(&Descriptor::Builtin(Handler::Equation)) => {
                if self.in_equation() {
                    return Err(ErrorKind::ErroneousNesting);
                }
                self.open(
                    ContainerKind::Environment {
                        name,
                        equation: true,
                    },
                    span,
                );
                Ok(())
            }
            Some(Descriptor::Macro(template)) => {
                self.open(
                    ContainerKind::Environment {
                        name: name.clone(),
                        equation: false,
                    },
                    span,
                );
                macros::expand_template(&name, template, span, &mut self.source)?;
                self.count_expansion()
            }
            Some(Descriptor::Builtin(_)) | None => Err(ErrorKind::UnknownEnvironment(name.into())),
        }
    }

    /// `\end{name}`
    pub(super) fn end_environment(&mut self, span: Span) -> InnerResult<()> {
        let name = spell(&self.source.read_argument("\\end")?);
        self.settle(Closer::Environment(&name))?;
        match self.stack.pop() {
            Some(Item::Container(cell @ Container {
                kind: ContainerKind::Cell,
                ..
            })) => {
                let open = match self.stack.last() {
                    Some(Item::Pending(Pending::Table(table))) => table.name.clone(),
                    _ => None,
                };
                match open {
                    Some(open) if open == name => self.finish_table(cell),
                    Some(open) => Err(ErrorKind::EnvironmentBadEnd(open.into(), name.into())),
                    None => Err(ErrorKind::MissingBeginExtraEnd(name.into())),
                }
            }
            Some(Item::Container(Container {
                kind: ContainerKind::Environment { name: open, .. },
                row,
                span: start,
            })) => {
                if open != name {
                    return Err(ErrorKind::EnvironmentBadEnd(open.into(), name.into()));
                }
                let nodes = row.finish();
                if matches!(self.stack.last(), Some(Item::Container(_))) {
                    for node in nodes {
                        self.push_node(node)?;
                    }
                    Ok(())
                } else {
                    let mut node = Node::row(nodes);
                    if node.span.is_empty() {
                        node.span = start.to(span);
                    }
                    self.push_node(node)
                }
            }
            Some(item) => {
                self.stack.push(item);
                Err(ErrorKind::MissingBeginExtraEnd(name.into()))
            }
            None => Err(ErrorKind::MissingBeginExtraEnd(name.into())),
        }
    }

    /// Whether the innermost structure, looking through style switches, is a table cell.
    fn in_table(&self) -> bool {
        for item in self.stack.iter().rev() {
            match item {
                Item::Container(Container {
                    kind: ContainerKind::Cell,
                    ..
                }) => return true,
                Item::Container(Container {
                    kind: ContainerKind::Style { .. },
                    ..
                })
                | Item::Pending(_) => {}
                Item::Container(_) => return false,
            }
        }
        false
    }

    fn in_equation(&self) -> bool {
        self.stack.iter().any(|item| match item {
            Item::Container(Container {
                kind: ContainerKind::Environment { equation, .. },
                ..
            }) => *equation,
            Item::Pending(Pending::Table(table)) => table.style.equation,
            _ => false,
        })
    }

    /// Open the next cell of the table on top of the stack.
    fn open_cell(&mut self, span: Span) {
        let display = match self.stack.last() {
            Some(Item::Pending(Pending::Table(table))) => table.style.displaystyle,
            _ => false,
        };
        let env = Env {
            display,
            ..self.env()
        };
        self.open_with(ContainerKind::Cell, env, span);
    }

    fn close_cell(&mut self) -> InnerResult<()> {
        match self.stack.pop() {
            Some(Item::Container(cell)) if matches!(cell.kind, ContainerKind::Cell) => {
                self.add_cell(cell)
            }
            Some(Item::Container(container)) => Err(self.unclosed(&container)),
            Some(item) => {
                self.stack.push(item);
                Err(ErrorKind::MissingCloseBrace)
            }
            None => Err(ErrorKind::ExtraCloseMissingOpen),
        }
    }

    /// Turn a closed cell into an `mtd` of the table now on top of the stack.
    fn add_cell(&mut self, cell: Container) -> InnerResult<()> {
        let Some(Item::Pending(Pending::Table(table))) = self.stack.last_mut() else {
            return Err(ErrorKind::MissingCloseBrace);
        };
        let nodes = cell.row.finish();
        let start = table.hfill.contains(&0);
        let end = table.hfill.contains(&nodes.len());
        table.hfill.clear();
        let mut mtd = Node::with_children(NodeKind::Mtd, nodes);
        match (start, end) {
            (true, true) => mtd.set_attr("columnalign", "center"),
            (true, false) => mtd.set_attr("columnalign", "right"),
            (false, true) => mtd.set_attr("columnalign", "left"),
            (false, false) => {}
        }
        table.cells.push(mtd);
        Ok(())
    }

    fn end_row(&mut self, spacing: Option<Dimension>, span: Span) -> InnerResult<()> {
        self.settle(Closer::Cell)?;
        self.close_cell()?;
        if let Some(Item::Pending(Pending::Table(table))) = self.stack.last_mut() {
            push_row(table, spacing);
        }
        self.tagged = false;
        self.open_cell(span);
        Ok(())
    }

    /// The second column of `\cases` is text, up to the end of the row.
    fn cases_text(&mut self, span: Span) -> InnerResult<()> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        while let Some(token) = self.source.next_raw() {
            match token.kind {
                TokenKind::BeginGroup | TokenKind::BeginArgument => depth += 1,
                TokenKind::Character('&') if depth == 0 => return Err(ErrorKind::ExtraAlignTab),
                TokenKind::ControlSequence("\\" | "cr" | "end")
                | TokenKind::EndGroup
                | TokenKind::EndArgument
                    if depth == 0 =>
                {
                    self.source.push_back(token);
                    break;
                }
                TokenKind::EndGroup | TokenKind::EndArgument => depth -= 1,
                _ => {}
            }
            tokens.push(token);
        }
        let start = tokens
            .iter()
            .position(|token| token.kind != TokenKind::Space)
            .unwrap_or(tokens.len());
        let end = tokens
            .iter()
            .rposition(|token| token.kind != TokenKind::Space)
            .map_or(start, |last| last + 1);
        let tokens = &tokens[start..end];
        match tokens.first() {
            None => Ok(()),
            Some(first) if first.is_control_sequence("text") => {
                self.source.prepend(tokens.to_vec());
                Ok(())
            }
            Some(_) => {
                let parts = text::split(tokens)?;
                self.text_parts(TextBox::Text, parts, span)
            }
        }
    }
}

/// Move the cells of `table` into a new row.
fn push_row(table: &mut Table, spacing: Option<Dimension>) {
    let mut cells = std::mem::take(&mut table.cells);
    let row = if table.style.labeled && cells.len() >= 3 {
        let label = cells.remove(cells.len() - 1);
        cells.insert(0, label);
        Node::with_children(NodeKind::Mlabeledtr, cells)
    } else {
        Node::with_children(NodeKind::Mtr, cells)
    };
    table.rows.push(row);
    table.row_lines.push("none");

    let ended = table.rows.len() - 1;
    match (spacing, &mut table.row_spacing) {
        (Some(extra), None) => {
            let base = base_spacing(table.style);
            let mut rows = vec![em(base); ended];
            rows.push(em(base + extra.to_em()));
            table.row_spacing = Some((base, rows));
        }
        (Some(extra), Some((base, rows))) => rows.push(em(*base + extra.to_em())),
        (None, Some((base, rows))) => rows.push(em(*base)),
        (None, None) => {}
    }
}

fn base_spacing(style: &TableStyle) -> f32 {
    lex::full_dimension(style.rowspacing).map_or(0., Dimension::to_em)
}

/// Read an `array` preamble: column alignments with `|` and `:` lines between them.
fn apply_preamble(table: &mut Table, preamble: &[Token<'_>]) -> InnerResult<()> {
    let mut align = Vec::new();
    let mut lines = Vec::new();
    let mut line = None;
    for token in preamble {
        match token.kind {
            TokenKind::Space => {}
            TokenKind::Character(c @ ('l' | 'c' | 'r')) => {
                match (line.take(), align.is_empty()) {
                    (Some(style), true) => table.frame.push(("left", style)),
                    (style, false) => lines.push(style.unwrap_or("none")),
                    (None, true) => {}
                }
                align.push(match c {
                    'l' => "left",
                    'r' => "right",
                    _ => "center",
                });
            }
            TokenKind::Character('|') => line = Some("solid"),
            TokenKind::Character(':') => line = Some("dashed"),
            kind => return Err(ErrorKind::IllegalPreambleToken(kind.to_string().into())),
        }
    }
    if let Some(style) = line {
        table.frame.push(("right", style));
    }
    table
        .attributes
        .insert("columnalign".to_string(), align.join(" "));
    if lines.iter().any(|line| *line != "none") {
        table
            .attributes
            .insert("columnlines".to_string(), lines.join(" "));
    }
    Ok(())
}

fn table_node(mut table: Table) -> Node {
    let style = table.style;
    let count = table.rows.len();
    let mut mtable = Node::with_children(NodeKind::Mtable, std::mem::take(&mut table.rows))
        .with_span(table.span);
    let rowspacing = match table.row_spacing.take() {
        Some((_, rows)) => rows.join(" "),
        None => style.rowspacing.to_string(),
    };

    if !style.environment {
        mtable.set_attr("rowspacing", rowspacing);
        mtable.set_attr("columnspacing", style.columnspacing);
        if style.displaystyle {
            mtable.set_attr("displaystyle", "true");
        }
        if let Some(columnalign) = style.columnalign {
            mtable.set_attr("columnalign", columnalign);
        }
        if let Some(framespacing) = style.framespacing {
            mtable.set_attr("data-frame-styles", "");
            mtable.set_attr("framespacing", framespacing);
        }
        return delimited(style, mtable);
    }

    mtable.set_attr("columnspacing", style.columnspacing);
    mtable.set_attr("rowspacing", rowspacing);
    if style.displaystyle {
        mtable.set_attr("displaystyle", "true");
    }
    let columnalign = table
        .attributes
        .shift_remove("columnalign")
        .or_else(|| style.columnalign.map(String::from));
    if let Some(columnalign) = columnalign.filter(|align| align != "center") {
        mtable.set_attr("columnalign", columnalign);
    }
    if let Some(columnlines) = table.attributes.shift_remove("columnlines") {
        mtable.set_attr("columnlines", columnlines);
    }
    let inner_lines = &table.row_lines[..count.saturating_sub(1).min(table.row_lines.len())];
    if inner_lines.iter().any(|line| *line != "none") {
        mtable.set_attr("rowlines", inner_lines.join(" "));
    }
    if let Some(&line) = count.checked_sub(1).and_then(|last| table.row_lines.get(last)) {
        if line != "none" {
            table.frame.push(("bottom", line));
        }
    }

    let side = |name: &str| {
        table
            .frame
            .iter()
            .find(|(side, _)| *side == name)
            .map(|&(_, line)| line)
    };
    let full: Option<Vec<&str>> = SIDES.iter().map(|&name| side(name)).collect();
    let mut notation = None;
    match full {
        Some(lines) if lines.iter().all(|line| *line == lines[0]) => {
            if let Some(framespacing) = style.framespacing {
                mtable.set_attr("framespacing", framespacing);
            }
            mtable.set_attr("frame", lines[0]);
        }
        Some(lines) => {
            mtable.set_attr("data-frame-styles", lines.join(" "));
            if let Some(framespacing) = style.framespacing {
                mtable.set_attr("framespacing", framespacing);
            }
        }
        None => {
            if let Some(framespacing) = style.framespacing {
                mtable.set_attr("data-frame-styles", "");
                mtable.set_attr("framespacing", framespacing);
            }
            if !table.frame.is_empty() {
                let sides: Vec<&str> = table.frame.iter().map(|&(side, _)| side).collect();
                notation = Some(sides.join(" "));
            }
        }
    }
    let node = match notation {
        Some(notation) => {
            let span = mtable.span;
            Node::with_children(NodeKind::Menclose, vec![mtable])
                .with_attr("notation", notation)
                .with_attr("data-padding", "0")
                .with_span(span)
        }
        None => mtable,
    };
    delimited(style, node)
}

/// Wrap a table in the delimiters of its style.
fn delimited(style: &TableStyle, table: Node) -> Node {
    match (style.open, style.close) {
        (Some(open), Some(close)) => {
            let span = table.span;
            Node::atom(
                TexClass::Inner,
                vec![
                    fence(open, TexClass::Open),
                    table,
                    fence(close, TexClass::Close),
                ],
            )
            .with_span(span)
        }
        _ => table,
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

    fn shape(table: &Node) -> Vec<usize> {
        table.children.iter().map(|row| row.children.len()).collect()
    }

    #[test]
    fn plain_matrix() {
        let table = first(r"\array{a&b\\ c&d}");
        assert_eq!(table.kind, NodeKind::Mtable);
        assert_eq!(shape(&table), [2, 2]);
        assert_eq!(table.attr("rowspacing"), Some("4pt"));
        assert_eq!(table.attr("data-frame-styles"), Some(""));
        let table = first(r"\matrix a");
        assert_eq!(shape(&table), [1]);
        assert_eq!(
            parse(r"\matrix").unwrap_err().message(),
            r"Missing argument for \matrix"
        );
    }

    #[test]
    fn trailing_row_break() {
        let table = first(r"\matrix{a\\ b\\}");
        assert_eq!(shape(&table), [1, 1]);
    }

    #[test]
    fn custom_row_spacing() {
        let table = first(r"\array{a\\[1cm] b}");
        assert_eq!(table.attr("rowspacing"), Some("3.235em 0.4em"));
        assert_eq!(
            parse(r"\array{a\\[x] b}").unwrap_err().message(),
            r"Bracket argument to \\ must be a dimension"
        );
    }

    #[test]
    fn linebreak_outside_tables() {
        let root = parse(r"a\\b").unwrap();
        assert_eq!(root.children[1].kind, NodeKind::Mspace);
        assert_eq!(root.children[1].attr("linebreak"), Some("newline"));
        assert_eq!(parse(r"a\cr b").unwrap_err().message(), r"Misplaced \cr");
        assert_eq!(parse("a&b").unwrap_err().message(), "Misplaced &");
    }

    #[test]
    fn delimited_matrices() {
        let inner = first(r"\pmatrix{a&b}");
        assert_eq!(inner.texclass, Some(TexClass::Inner));
        assert_eq!(inner.children.len(), 3);
        assert_eq!(inner.children[0].text, "(");
        assert_eq!(inner.children[1].kind, NodeKind::Mtable);
        let cases = first(r"\cases{a}");
        assert_eq!(cases.children[2].text, "");
        assert_eq!(cases.children[2].attr("stretchy"), Some("true"));
    }

    #[test]
    fn cases_text_column() {
        let cases = first(r"\cases{1 & if $x$ \cr 0 & \text{else}}");
        let table = &cases.children[1];
        assert_eq!(shape(table), [2, 2]);
        let text_cell = &table.children[0].children[1].children[0];
        assert_eq!(text_cell.kind, NodeKind::Mrow);
        assert_eq!(text_cell.children[0].text, "if\u{A0}");
        assert_eq!(text_cell.children[1].texclass, Some(TexClass::Ord));
        assert_eq!(
            parse(r"\cases{b & l & k}").unwrap_err().message(),
            r"Extra alignment tab in \cases text"
        );
    }

    #[test]
    fn labeled_rows() {
        let table = first(r"\eqalignno{a&b&c}");
        let row = &table.children[0];
        assert_eq!(row.kind, NodeKind::Mlabeledtr);
        assert_eq!(row.children[0].children[0].text, "c");
        let table = first(r"\eqalign{a&b}");
        assert_eq!(table.children[0].kind, NodeKind::Mtr);
        assert_eq!(table.attr("displaystyle"), Some("true"));
    }

    #[test]
    fn preamble_lines() {
        let table = first(r"\begin{array}{c|cc}a&b&c\\d&e&f\end{array}");
        assert_eq!(table.attr("columnalign"), Some("center center center"));
        assert_eq!(table.attr("columnlines"), Some("solid none"));
        let table = first(r"\begin{array}{c}a\end{array}");
        assert_eq!(table.attr("columnalign"), None);
        assert_eq!(
            parse(r"\begin{array}a").unwrap_err().message(),
            "Illegal pream-token (a)"
        );
    }

    #[test]
    fn row_lines_and_frames() {
        let table = first(r"\begin{array}{ccc}a&b&c\\\hline d&e&f\\ g&h&i \end{array}");
        assert_eq!(table.attr("rowlines"), Some("solid none"));
        let framed = first(r"\begin{array}{|c|}\hline a\\\hline\end{array}");
        assert_eq!(framed.kind, NodeKind::Mtable);
        assert_eq!(framed.attr("frame"), Some("solid"));
        assert_eq!(framed.attr("data-frame-styles"), None);
        let mixed = first(r"\begin{array}{:c:}\hline a\\\hline\end{array}");
        assert_eq!(
            mixed.attr("data-frame-styles"),
            Some("solid dashed solid dashed")
        );
        let partial = first(r"\begin{array}{c}\hline a\\\hline\end{array}");
        assert_eq!(partial.kind, NodeKind::Menclose);
        assert_eq!(partial.attr("notation"), Some("top bottom"));
        assert_eq!(parse(r"\hline").unwrap_err().message(), r"Misplaced \hline");
    }

    #[test]
    fn hfill_alignment() {
        let table = first(r"\begin{array}{c}\hfill a\\ a\hfill\\ \hfill a\hfill\end{array}");
        let align: Vec<_> = table
            .children
            .iter()
            .map(|row| row.children[0].attr("columnalign"))
            .collect();
        assert_eq!(align, [Some("right"), Some("left"), Some("center")]);
        assert_eq!(
            parse(r"a\hfill b").unwrap_err().message(),
            r"Unsupported use of \hfill"
        );
    }

    #[test]
    fn environment_errors() {
        let message = |input| parse(input).unwrap_err().message();
        assert_eq!(message(r"\begin{\ff}"), r"Invalid environment name '\ff'");
        assert_eq!(
            message(r"\begin{equation}a\end{array}"),
            r"\begin{equation} ended with \end{array}"
        );
        assert_eq!(
            message(r"\end{array}"),
            r"Missing \begin{array} or extra \end{array}"
        );
        assert_eq!(message(r"\begin{array}{c}a"), r"Missing \end{array}");
        assert_eq!(
            message(r"\begin{equation}\begin{eqnarray}\end{eqnarray}\end{equation}"),
            "Erroneous nesting of equation structures"
        );
    }

    #[test]
    fn equation_contents_join_the_row() {
        let root = parse(r"\begin{equation}a+b\end{equation}c").unwrap();
        assert_eq!(root.children.len(), 4);
    }
}
