//! Node locators
//!
//! A locator is a query string that identifies one primary node, such as
//! `/COMPILATION_UNIT/CLASS_DECLARATION[./IDENTIFIER[@text='A']]`. The inspector shows the
//! locator of the selected node and can find a node again from its locator.

use crate::node::{NodeId, ParseTree};
use std::fmt::Write;

/// Produces locator strings for primary nodes.
pub trait LocatorGenerator {
    /// Locator of `id`, or `None` if the node cannot be located.
    fn locator_of(&self, tree: &ParseTree, id: NodeId) -> Option<String>;
}

/// Path-of-types locator with text predicates.
///
/// Every step is `/TYPE`. A node with real text (non-empty and not just its type name) gets
/// `[@text='...']`; otherwise the first child with real text is used as
/// `[./CHILD[@text='...']]`. When a same-type sibling would produce the same step, that step
/// gets its 1-based position among same-type siblings.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl LocatorGenerator for PathLocator {
    fn locator_of(&self, tree: &ParseTree, id: NodeId) -> Option<String> {
        tree.get(id)?;
        let mut locator = String::new();
        for step in tree.ancestry(id) {
            locator.push_str(&step_of(tree, step));
            if let Some(position) = ambiguous_position(tree, step) {
                let _ = write!(locator, "[{position}]");
            }
        }
        Some(locator)
    }
}

/// Escape `text` for use inside a quoted locator predicate.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;&apos;"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

fn real_text(tree: &ParseTree, id: NodeId) -> Option<&str> {
    let text = tree.data(id)?.text.as_str();
    (!text.is_empty() && text != tree.type_name(id)).then_some(text)
}

fn step_of(tree: &ParseTree, id: NodeId) -> String {
    let mut step = format!("/{}", tree.type_name(id));
    if let Some(text) = real_text(tree, id) {
        let _ = write!(step, "[@text='{}']", encode(text));
    } else if let Some((child, text)) = tree
        .children(id)
        .find_map(|child| real_text(tree, child).map(|text| (child, text)))
    {
        let _ = write!(
            step,
            "[./{}[@text='{}']]",
            tree.type_name(child),
            encode(text)
        );
    }
    step
}

/// 1-based position among same-type siblings, when the step alone is ambiguous.
fn ambiguous_position(tree: &ParseTree, id: NodeId) -> Option<usize> {
    let parent = tree.parent(id)?;
    let kind = tree.data(id)?.kind;
    let step = step_of(tree, id);
    let same_type: Vec<NodeId> = tree
        .children(parent)
        .filter(|&sibling| tree.data(sibling).is_some_and(|data| data.kind == kind))
        .collect();
    let ambiguous = same_type
        .iter()
        .any(|&sibling| sibling != id && step_of(tree, sibling) == step);
    if !ambiguous {
        return None;
    }
    same_type
        .iter()
        .position(|&sibling| sibling == id)
        .map(|index| index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, ParseTreeBuilder};
    use inspector_lang::Vocabulary;
    use std::sync::Arc;

    /// `class A { int x; int y; ; ; }` in a reduced vocabulary.
    fn tree() -> (ParseTree, Vec<NodeId>) {
        let vocabulary = Arc::new(Vocabulary::from_names([
            "EOF",
            "COMPILATION_UNIT",
            "CLASS_DEF",
            "IDENT",
            "OBJBLOCK",
            "VARIABLE_DEF",
            "SEMI",
        ]));
        let mut builder =
            ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, "COMPILATION_UNIT"));
        let root = builder.root();
        let class_def = builder.child(root, NodeData::new(2, 1, 0, "CLASS_DEF"));
        builder.child(class_def, NodeData::new(3, 1, 6, "A"));
        let block = builder.child(class_def, NodeData::new(4, 1, 8, "OBJBLOCK"));
        let x = builder.child(block, NodeData::new(5, 1, 10, "VARIABLE_DEF"));
        builder.child(x, NodeData::new(3, 1, 14, "x"));
        let y = builder.child(block, NodeData::new(5, 1, 17, "VARIABLE_DEF"));
        builder.child(y, NodeData::new(3, 1, 21, "y"));
        let semi_a = builder.child(block, NodeData::new(6, 1, 24, ";"));
        let semi_b = builder.child(block, NodeData::new(6, 1, 26, ";"));
        (builder.finish(), vec![class_def, block, x, semi_a, semi_b])
    }

    #[test]
    fn test_step_uses_child_text() {
        let (tree, ids) = tree();
        assert_eq!(
            PathLocator.locator_of(&tree, ids[0]).unwrap(),
            "/COMPILATION_UNIT/CLASS_DEF[./IDENT[@text='A']]"
        );
    }

    #[test]
    fn test_distinct_siblings_need_no_position() {
        let (tree, ids) = tree();
        let locator = PathLocator.locator_of(&tree, ids[2]).unwrap();
        assert!(locator.ends_with("/VARIABLE_DEF[./IDENT[@text='x']]"));
    }

    #[test]
    fn test_identical_siblings_get_position() {
        let (tree, ids) = tree();
        let first = PathLocator.locator_of(&tree, ids[3]).unwrap();
        let second = PathLocator.locator_of(&tree, ids[4]).unwrap();
        assert!(first.ends_with("/SEMI[@text=';'][1]"));
        assert!(second.ends_with("/SEMI[@text=';'][2]"));
    }

    #[test]
    fn test_position_on_inner_steps_tells_overloads_apart() {
        let vocabulary = Arc::new(Vocabulary::from_names([
            "EOF",
            "CLASS_DEF",
            "METHOD_DEF",
            "IDENT",
            "SLIST",
            "SEMI",
        ]));
        let mut builder = ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, "CLASS_DEF"));
        let root = builder.root();
        let mut semis = Vec::new();
        for line in [2, 3] {
            let method = builder.child(root, NodeData::new(2, line, 2, "METHOD_DEF"));
            builder.child(method, NodeData::new(3, line, 7, "f"));
            let body = builder.child(method, NodeData::new(4, line, 11, "SLIST"));
            semis.push(builder.child(body, NodeData::new(5, line, 12, ";")));
        }
        let tree = builder.finish();

        let second = PathLocator.locator_of(&tree, semis[1]).unwrap();
        assert_eq!(
            second,
            "/CLASS_DEF/METHOD_DEF[./IDENT[@text='f']][2]/SLIST[./SEMI[@text=';']]/SEMI[@text=';']"
        );
        let found = tree
            .preorder()
            .find(|&id| PathLocator.locator_of(&tree, id).as_deref() == Some(second.as_str()));
        assert_eq!(found, Some(semis[1]));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("a<b>&'\""), "a&lt;b&gt;&amp;&apos;&apos;&quot;");
    }
}
