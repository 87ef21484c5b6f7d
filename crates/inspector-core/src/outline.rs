//! Outline: expansion state and visible rows
//!
//! The outline flattens the model into the rows a tree-table shows: a preorder walk from the
//! sentinel root that only descends into expanded nodes. Rows are recomputed from scratch
//! whenever expansion or structure changes.

use crate::model::ParseTreeModel;
use crate::node::{NodeId, ParseTree, TreeNode};
use std::collections::HashSet;

/// Path from the sentinel root to a node. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<TreeNode>);

impl TreePath {
    /// Path holding only the sentinel root.
    pub fn root() -> Self {
        Self(vec![TreeNode::Root])
    }

    /// Build a path from its nodes, root first. `None` for an empty list.
    pub fn from_nodes(nodes: Vec<TreeNode>) -> Option<Self> {
        (!nodes.is_empty()).then_some(Self(nodes))
    }

    /// Path of a primary node, through its ancestors.
    pub fn to_ast(tree: &ParseTree, id: NodeId) -> Self {
        let mut nodes = vec![TreeNode::Root];
        nodes.extend(tree.ancestry(id).into_iter().map(TreeNode::Ast));
        Self(nodes)
    }

    /// Nodes, root first.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.0
    }

    /// The node the path leads to.
    pub fn last(&self) -> TreeNode {
        self.0.last().copied().unwrap_or(TreeNode::Root)
    }

    /// Path to the parent, `None` for the root path.
    pub fn parent(&self) -> Option<TreePath> {
        (self.0.len() > 1).then(|| Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Path extended by `child`.
    pub fn child(&self, child: TreeNode) -> TreePath {
        let mut nodes = self.0.clone();
        nodes.push(child);
        Self(nodes)
    }

    /// Number of edges from the root.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    /// Prefix of `self` ending at `node`, when `node` is a proper ancestor on the path.
    pub fn ancestor_path(&self, node: TreeNode) -> Option<TreePath> {
        let index = self.0.iter().position(|n| *n == node)?;
        (index + 1 < self.0.len()).then(|| Self(self.0[..=index].to_vec()))
    }

    /// Returns `true` if `self` starts with `ancestor` and is longer.
    pub fn is_descendant_of(&self, ancestor: &TreePath) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }
}

/// One visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineRow {
    /// Node shown on the row.
    pub node: TreeNode,
    /// Depth below the sentinel root.
    pub depth: usize,
    /// Row of the parent node.
    pub parent: Option<usize>,
    /// Whether the node's children are visible.
    pub expanded: bool,
    /// Whether the node has no children.
    pub leaf: bool,
}

/// What a mouse press on the outline hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineHit {
    /// The expand/collapse glyph of a row.
    Toggle(usize),
    /// The label of a row.
    Select(usize),
}

/// Expansion state plus the flattened visible rows.
#[derive(Debug, Clone)]
pub struct Outline {
    expanded: HashSet<TreeNode>,
    rows: Vec<OutlineRow>,
    row_height: u16,
    indent: u16,
}

impl Outline {
    /// Create an outline showing only the sentinel root.
    pub fn new(indent: u16) -> Self {
        Self {
            expanded: HashSet::new(),
            rows: vec![OutlineRow {
                node: TreeNode::Root,
                depth: 0,
                parent: None,
                expanded: false,
                leaf: true,
            }],
            row_height: 0,
            indent: indent.max(1),
        }
    }

    /// Forget all expansion state and re-flatten. Called after a structure change.
    pub fn structure_changed(&mut self, model: &ParseTreeModel) {
        self.expanded.clear();
        self.rebuild(model);
    }

    /// Re-flatten the visible rows.
    pub fn rebuild(&mut self, model: &ParseTreeModel) {
        self.rows.clear();
        let mut stack = vec![(model.root(), 0usize, None::<usize>)];
        while let Some((node, depth, parent)) = stack.pop() {
            let row = self.rows.len();
            let child_count = model.child_count(node);
            let expanded = child_count > 0 && self.expanded.contains(&node);
            self.rows.push(OutlineRow {
                node,
                depth,
                parent,
                expanded,
                leaf: child_count == 0,
            });
            if expanded {
                let first = stack.len();
                stack.extend(
                    (0..child_count)
                        .filter_map(|index| model.child_at(node, index))
                        .map(|child| (child, depth + 1, Some(row))),
                );
                stack[first..].reverse();
            }
        }
    }

    /// Number of visible rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Option<&OutlineRow> {
        self.rows.get(index)
    }

    /// All visible rows.
    pub fn rows(&self) -> &[OutlineRow] {
        &self.rows
    }

    /// Path of the node on `row`.
    pub fn path_for_row(&self, row: usize) -> Option<TreePath> {
        let mut nodes = Vec::new();
        let mut current = Some(row);
        while let Some(index) = current {
            let entry = self.rows.get(index)?;
            nodes.push(entry.node);
            current = entry.parent;
        }
        nodes.reverse();
        TreePath::from_nodes(nodes)
    }

    /// Row showing the node `path` leads to, if that node is visible.
    pub fn row_for_path(&self, path: &TreePath) -> Option<usize> {
        let target = path.last();
        let row = self.rows.iter().position(|entry| entry.node == target)?;
        (self.path_for_row(row).as_ref() == Some(path)).then_some(row)
    }

    /// Returns `true` if `node` is expanded.
    pub fn is_expanded(&self, node: TreeNode) -> bool {
        self.expanded.contains(&node)
    }

    /// Expand `node` and re-flatten. Leaves cannot be expanded.
    pub fn expand(&mut self, node: TreeNode, model: &ParseTreeModel) -> bool {
        if model.is_leaf(node) || !self.expanded.insert(node) {
            return false;
        }
        self.rebuild(model);
        true
    }

    /// Collapse `node` and re-flatten.
    pub fn collapse(&mut self, node: TreeNode, model: &ParseTreeModel) -> bool {
        if !self.expanded.remove(&node) {
            return false;
        }
        self.rebuild(model);
        true
    }

    /// Expand every node on `nodes` that has children, then re-flatten once.
    pub fn expand_all(&mut self, nodes: &[TreeNode], model: &ParseTreeModel) -> bool {
        let mut changed = false;
        for node in nodes {
            if !model.is_leaf(*node) {
                changed |= self.expanded.insert(*node);
            }
        }
        if changed {
            self.rebuild(model);
        }
        changed
    }

    /// Height of one row, in cells.
    pub fn row_height(&self) -> u16 {
        self.row_height
    }

    /// Set the row height. Zero is ignored; returns whether the height was applied.
    pub fn set_row_height(&mut self, height: u16) -> bool {
        if height == 0 {
            return false;
        }
        self.row_height = height;
        true
    }

    /// Horizontal indent per depth level, in cells.
    pub fn indent(&self) -> u16 {
        self.indent
    }

    /// Which part of which row lies under `(x, y)`, relative to the outline's top-left.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<OutlineHit> {
        let row = usize::from(y / self.row_height.max(1));
        let entry = self.rows.get(row)?;
        let glyph_start = entry.depth * usize::from(self.indent);
        let x = usize::from(x);
        if !entry.leaf && x >= glyph_start && x < glyph_start + usize::from(self.indent) {
            Some(OutlineHit::Toggle(row))
        } else {
            Some(OutlineHit::Select(row))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, ParseTreeBuilder};
    use inspector_lang::Vocabulary;
    use std::sync::Arc;

    /// CLASS_DEF { MODIFIERS, IDENT, OBJBLOCK { VARIABLE_DEF } }
    fn model() -> ParseTreeModel {
        let vocabulary = Arc::new(Vocabulary::from_names([
            "EOF",
            "CLASS_DEF",
            "MODIFIERS",
            "IDENT",
            "OBJBLOCK",
            "VARIABLE_DEF",
        ]));
        let mut builder = ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, "CLASS_DEF"));
        let root = builder.root();
        builder.child(root, NodeData::new(2, 1, 0, "MODIFIERS"));
        builder.child(root, NodeData::new(3, 1, 6, "A"));
        let block = builder.child(root, NodeData::new(4, 1, 8, "OBJBLOCK"));
        builder.child(block, NodeData::new(5, 1, 10, "VARIABLE_DEF"));
        let mut model = ParseTreeModel::new();
        model.set_root(Some(builder.finish()));
        model
    }

    #[test]
    fn test_fresh_outline_shows_root_only() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.structure_changed(&model);
        assert_eq!(outline.row_count(), 1);
        assert!(!outline.rows()[0].leaf);
        assert_eq!(outline.path_for_row(0), Some(TreePath::root()));
    }

    #[test]
    fn test_expand_and_collapse() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.structure_changed(&model);

        assert!(outline.expand(TreeNode::Root, &model));
        assert_eq!(outline.row_count(), 2);
        let class_def = outline.row(1).unwrap().node;
        assert!(outline.expand(class_def, &model));
        assert_eq!(outline.row_count(), 5);
        assert_eq!(outline.row(4).unwrap().depth, 2);

        assert!(outline.collapse(TreeNode::Root, &model));
        assert_eq!(outline.row_count(), 1);
        // Descendant expansion state survives a collapsed ancestor.
        assert!(outline.expand(TreeNode::Root, &model));
        assert_eq!(outline.row_count(), 5);
    }

    #[test]
    fn test_leaf_cannot_expand() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.structure_changed(&model);
        outline.expand(TreeNode::Root, &model);
        let class_def = outline.row(1).unwrap().node;
        outline.expand(class_def, &model);
        let modifiers = outline.row(2).unwrap().node;
        assert!(!outline.expand(modifiers, &model));
    }

    #[test]
    fn test_row_path_round_trip() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.structure_changed(&model);
        let class_def = model.child_at(TreeNode::Root, 0).unwrap();
        outline.expand_all(&[TreeNode::Root, class_def], &model);
        for row in 0..outline.row_count() {
            let path = outline.path_for_row(row).unwrap();
            assert_eq!(outline.row_for_path(&path), Some(row));
        }
        assert_eq!(outline.path_for_row(99), None);
    }

    #[test]
    fn test_hidden_path_has_no_row() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.structure_changed(&model);
        let class_def = model.child_at(TreeNode::Root, 0).unwrap();
        let path = TreePath::root().child(class_def);
        assert_eq!(outline.row_for_path(&path), None);
    }

    #[test]
    fn test_hit_test() {
        let model = model();
        let mut outline = Outline::new(2);
        outline.set_row_height(1);
        outline.structure_changed(&model);
        outline.expand(TreeNode::Root, &model);
        assert_eq!(outline.hit_test(0, 0), Some(OutlineHit::Toggle(0)));
        assert_eq!(outline.hit_test(2, 1), Some(OutlineHit::Toggle(1)));
        assert_eq!(outline.hit_test(6, 1), Some(OutlineHit::Select(1)));
        assert_eq!(outline.hit_test(0, 7), None);
    }

    #[test]
    fn test_zero_row_height_is_ignored() {
        let mut outline = Outline::new(2);
        assert!(outline.set_row_height(3));
        assert!(!outline.set_row_height(0));
        assert_eq!(outline.row_height(), 3);
    }

    #[test]
    fn test_tree_path_relations() {
        let model = model();
        let class_def = model.child_at(TreeNode::Root, 0).unwrap();
        let child = TreePath::root().child(class_def);
        assert!(child.is_descendant_of(&TreePath::root()));
        assert_eq!(child.parent(), Some(TreePath::root()));
        assert_eq!(child.depth(), 1);
        assert_eq!(TreePath::root().parent(), None);
        assert_eq!(TreePath::from_nodes(Vec::new()), None);
    }
}
