//! Passes over a finished tree.
//!
//! The parser leaves script placeholders, unclassified operators and relation runs in the
//! tree. [`run`] settles them and fills in [`Node::class`] everywhere.

use crate::{
    node::{Node, NodeKind, TexClass},
    parser::tables,
};

/// Run every pass, in order, on the tree rooted at `root`.
pub(crate) fn run(root: &mut Node) {
    clean(root);
    adjust_binary_operators(root);
    combine_relations(root);
    assign_classes(root);
}

/// The spacing class of a node, from its explicit class or its kind.
pub(crate) fn class_of(node: &Node) -> TexClass {
    if node.flags.demoted {
        return TexClass::Ord;
    }
    if let Some(class) = node.texclass {
        return class;
    }
    match node.kind {
        NodeKind::Mo => tables::operator_class(&node.text),
        NodeKind::Mi if node.flags.function => TexClass::Op,
        NodeKind::Mspace => TexClass::None,
        kind if kind.is_script() => node.children.first().map_or(TexClass::Ord, class_of),
        NodeKind::Mrow | NodeKind::Mstyle | NodeKind::Mpadded | NodeKind::Mphantom
            if node.is_space() =>
        {
            TexClass::None
        }
        NodeKind::Mrow | NodeKind::Mstyle | NodeKind::Mpadded if node.children.len() == 1 => {
            class_of(&node.children[0])
        }
        NodeKind::Mfrac => TexClass::Inner,
        _ => TexClass::Ord,
    }
}

/// Store the class of every node in [`Node::class`].
pub(crate) fn assign_classes(node: &mut Node) {
    for child in &mut node.children {
        assign_classes(child);
    }
    node.class = class_of(node);
}

fn clean(node: &mut Node) {
    for child in &mut node.children {
        clean(child);
        if child.kind == NodeKind::Mo && std::mem::take(&mut child.flags.bare_operator) {
            let span = child.span;
            let mo = std::mem::replace(child, Node::new(NodeKind::Mrow));
            *child = Node::atom(TexClass::Ord, vec![mo]).with_span(span);
        }
    }
    drop_empty_scripts(node);
}

/// Turn an `msubsup` or `munderover` with an unfilled slot into its two-child form.
fn drop_empty_scripts(node: &mut Node) {
    let (without_lower, without_upper) = match node.kind {
        NodeKind::Msubsup => (NodeKind::Msup, NodeKind::Msub),
        NodeKind::Munderover => (NodeKind::Mover, NodeKind::Munder),
        _ => return,
    };
    if node.children.len() != 3 {
        return;
    }
    match (
        node.children[1].is_placeholder(),
        node.children[2].is_placeholder(),
    ) {
        (true, true) => {
            node.children.truncate(1);
            if let Some(base) = node.children.pop() {
                let span = node.span;
                *node = base;
                if node.span.is_empty() {
                    node.span = span;
                }
            }
        }
        (true, false) => {
            node.children.remove(1);
            node.kind = without_lower;
        }
        (false, true) => {
            node.children.truncate(2);
            node.kind = without_upper;
        }
        (false, false) => {}
    }
}

/// TeX's rule: a BIN needs an operand on both sides, otherwise it is an ORD.
fn adjust_binary_operators(node: &mut Node) {
    for child in &mut node.children {
        adjust_binary_operators(child);
    }
    match node.kind {
        kind if kind.is_row_like() => adjust_row(&mut node.children),
        kind if kind.is_script() => {
            for script in node.children.iter_mut().skip(1) {
                adjust_row(std::slice::from_mut(script));
            }
        }
        NodeKind::Mfrac | NodeKind::Mroot => {
            for part in &mut node.children {
                adjust_row(std::slice::from_mut(part));
            }
        }
        _ => {}
    }
}

fn adjust_row(row: &mut [Node]) {
    let mut previous = None;
    for i in 0..row.len() {
        let mut class = class_of(&row[i]);
        if class == TexClass::None {
            continue;
        }
        if class == TexClass::Bin {
            let after_operand = previous.is_some_and(|previous| {
                !matches!(
                    previous,
                    TexClass::Bin | TexClass::Op | TexClass::Rel | TexClass::Open | TexClass::Punct
                )
            });
            let before_operand = row[i + 1..]
                .iter()
                .map(class_of)
                .find(|class| *class != TexClass::None)
                .is_some_and(|next| {
                    !matches!(next, TexClass::Rel | TexClass::Close | TexClass::Punct)
                });
            if !(after_operand && before_operand) {
                demote(&mut row[i]);
                class = TexClass::Ord;
            }
        }
        previous = Some(class);
    }
}

fn demote(node: &mut Node) {
    node.flags.demoted = true;
    node.class = TexClass::Ord;
    if let Some(core) = node.core_mo_mut() {
        core.flags.demoted = true;
        core.class = TexClass::Ord;
    }
}

fn combine_relations(node: &mut Node) {
    for child in &mut node.children {
        combine_relations(child);
    }
    if node.kind.is_row_like() {
        combine_row(&mut node.children);
    }
}

/// Merge runs of one repeated relation glyph (`<<`, `==`) and close the gaps in other runs.
fn combine_row(row: &mut Vec<Node>) {
    let mut i = 0;
    while i + 1 < row.len() {
        if is_relation(&row[i]) && is_relation(&row[i + 1]) {
            if repeats(&row[i], &row[i + 1]) {
                let next = row.remove(i + 1);
                row[i].text.push_str(&next.text);
                row[i].span = row[i].span.to(next.span);
                continue;
            }
            row[i].set_attr("rspace", "0pt");
            row[i + 1].set_attr("lspace", "0pt");
        }
        i += 1;
    }
}

fn is_relation(node: &Node) -> bool {
    node.is_plain_mo()
        && !node.flags.demoted
        && tables::operator_class(&node.text) == TexClass::Rel
}

fn repeats(left: &Node, right: &Node) -> bool {
    let Some(glyph) = left.text.chars().next() else {
        return false;
    };
    right.text.chars().all(|c| c == glyph) && same_look(left, right)
}

/// Equal attributes, spacing aside.
fn same_look(left: &Node, right: &Node) -> bool {
    fn significant(node: &Node) -> Vec<(&str, &str)> {
        let mut attributes: Vec<(&str, &str)> = node
            .attributes
            .iter()
            .filter(|(name, _)| !matches!(name.as_str(), "lspace" | "rspace"))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        attributes.sort_unstable();
        attributes
    }
    significant(left) == significant(right)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Configuration, Parser, Storage};

    fn parse(input: &str) -> Node {
        let config = Configuration::default();
        let storage = Storage::new();
        Parser::new(input, &config, &storage).try_parse().unwrap()
    }

    fn texts(node: &Node) -> Vec<&str> {
        node.children.iter().map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn repeated_relations_merge() {
        assert_eq!(texts(&parse("a<<b")), ["a", "<<", "b"]);
        assert_eq!(texts(&parse("a===b")), ["a", "===", "b"]);
        assert_eq!(texts(&parse("==a")), ["==", "a"]);
    }

    #[test]
    fn relation_runs_lose_inner_space() {
        let root = parse("a=<>=b");
        let spacing: Vec<_> = root.children[1..5]
            .iter()
            .map(|mo| (mo.attr("lspace"), mo.attr("rspace")))
            .collect();
        assert_eq!(
            spacing,
            [
                (None, Some("0pt")),
                (Some("0pt"), Some("0pt")),
                (Some("0pt"), Some("0pt")),
                (Some("0pt"), None),
            ]
        );
        let root = parse(r"a =\sim b");
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.children[1].attr("rspace"), Some("0pt"));
    }

    #[test]
    fn only_spacing_may_differ_in_merged_relations() {
        let equals = || Node::token(NodeKind::Mo, "=");
        let mut row = vec![equals().with_attr("lspace", "0pt"), equals()];
        combine_row(&mut row);
        assert_eq!(texts(&Node::with_children(NodeKind::Mrow, row)), ["=="]);

        let mut row = vec![equals().with_attr("mathcolor", "red"), equals()];
        combine_row(&mut row);
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].attr("rspace"), Some("0pt"));
        assert_eq!(row[1].attr("lspace"), Some("0pt"));
    }

    #[test]
    fn classed_wrappers_break_runs() {
        let root = parse(r"a <=\mathrm{>} b");
        assert_eq!(root.children[2].attr("lspace"), Some("0pt"));
        assert_eq!(root.children[2].attr("rspace"), None);
        assert_eq!(root.children[3].kind, NodeKind::Mrow);
    }

    #[test]
    fn binary_operators_need_operands() {
        let root = parse("-x");
        assert_eq!(root.children[0].class, TexClass::Ord);
        let root = parse("a-b");
        assert_eq!(root.children[1].class, TexClass::Bin);
        let root = parse("a+=b");
        assert_eq!(root.children[1].class, TexClass::Ord);
        let root = parse("(+a)");
        assert_eq!(root.children[1].class, TexClass::Ord);
        let root = parse("a++b");
        assert_eq!(root.children[1].class, TexClass::Bin);
        assert_eq!(root.children[2].class, TexClass::Ord);
    }

    #[test]
    fn empty_script_slots() {
        assert_eq!(parse("x_1").children[0].kind, NodeKind::Msub);
        assert_eq!(parse("x^2").children[0].kind, NodeKind::Msup);
        assert_eq!(parse("x_1^2").children[0].kind, NodeKind::Msubsup);
        assert_eq!(parse(r"\sum_1").children[0].kind, NodeKind::Munder);
        assert_eq!(parse(r"\sum^2").children[0].kind, NodeKind::Mover);
    }

    #[test]
    fn unknown_operators_are_ordinary() {
        let root = parse("$");
        let atom = &root.children[0];
        assert_eq!(atom.kind, NodeKind::Mrow);
        assert_eq!(atom.texclass, Some(TexClass::Ord));
        assert_eq!(atom.children[0].text, "$");
    }

    #[test]
    fn classes() {
        let root = parse(r"\sin x");
        assert_eq!(root.children[0].class, TexClass::Op);
        assert_eq!(root.children[1].class, TexClass::None);
        let root = parse(r"\frac12\quad");
        assert_eq!(root.children[0].class, TexClass::Inner);
        assert_eq!(root.children[1].class, TexClass::None);
        let root = parse(r"\sum_1^2");
        assert_eq!(root.children[0].class, TexClass::Op);
    }
}
