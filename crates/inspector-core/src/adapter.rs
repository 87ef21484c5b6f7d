//! Node adapter
//!
//! Presents primary nodes, doc nodes and the sentinel root through one read-only interface.
//! When doc comments are enabled, the `COMMENT_CONTENT` child of a doc comment gets a single
//! child: the root of that comment's doc tree. Doc trees are parsed the first time they are
//! needed and cached for the lifetime of the installed tree.

use crate::error::{InspectorError, Result};
use crate::line_offsets::LineOffsetTable;
use crate::model::{CellValue, Column};
use crate::node::{DocTree, NodeData, NodeId, ParseMode, ParseTree, TreeNode};
use crate::span::{self, Span};
use inspector_lang::{COMMENT_CONTENT, EOF, TokenType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Text of the sentinel root.
pub const ROOT_TEXT: &str = "ROOT";

/// Classifies and parses doc comments.
pub trait DocCommentParser {
    /// Returns `true` if the block comment `comment` is a doc comment.
    fn is_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> bool;

    /// Parse the doc comment `comment` into a doc tree with absolute positions.
    fn parse_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> DocTree;
}

/// Read-only view over the installed tree.
pub struct NodeAdapter {
    tree: Option<ParseTree>,
    mode: ParseMode,
    doc_parser: Option<Rc<dyn DocCommentParser>>,
    comment_content: Option<TokenType>,
    doc_trees: RefCell<HashMap<NodeId, Rc<DocTree>>>,
    sentinel: NodeData,
}

impl NodeAdapter {
    /// Create an adapter with nothing installed.
    pub fn new() -> Self {
        Self {
            tree: None,
            mode: ParseMode::default(),
            doc_parser: None,
            comment_content: None,
            doc_trees: RefCell::new(HashMap::new()),
            sentinel: NodeData::new(0, 0, 0, ROOT_TEXT),
        }
    }

    /// Register the parser used for doc comments.
    pub fn set_doc_parser(&mut self, parser: Rc<dyn DocCommentParser>) {
        self.doc_parser = Some(parser);
        self.doc_trees.borrow_mut().clear();
    }

    /// Install a new tree (or none), discarding every cached doc tree.
    pub fn set_tree(&mut self, tree: Option<ParseTree>) {
        self.comment_content = tree
            .as_ref()
            .and_then(|tree| tree.vocabulary().tag(COMMENT_CONTENT));
        self.tree = tree;
        self.doc_trees.borrow_mut().clear();
    }

    /// The installed tree.
    pub fn tree(&self) -> Option<&ParseTree> {
        self.tree.as_ref()
    }

    /// Current parse mode.
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Change the parse mode. Affects grafting only; nothing is re-parsed.
    pub fn set_mode(&mut self, mode: ParseMode) {
        self.mode = mode;
    }

    /// Number of children shown for `node`.
    pub fn child_count(&self, node: TreeNode) -> usize {
        match node {
            TreeNode::Root => usize::from(self.tree.is_some()),
            TreeNode::Ast(id) => match &self.tree {
                Some(tree) if self.graft_comment(tree, id).is_some() => 1,
                Some(tree) => tree.child_count(id),
                None => 0,
            },
            TreeNode::Doc { comment, node } => self
                .doc_tree(comment)
                .map_or(0, |doc| doc.children(node).len()),
        }
    }

    /// Child of `node` at `index`.
    ///
    /// For a grafted `COMMENT_CONTENT` node the index is ignored and the doc root returned.
    pub fn child_at(&self, node: TreeNode, index: usize) -> Option<TreeNode> {
        match node {
            TreeNode::Root => {
                let tree = self.tree.as_ref()?;
                (index == 0).then(|| TreeNode::Ast(tree.root()))
            }
            TreeNode::Ast(id) => {
                let tree = self.tree.as_ref()?;
                if let Some(comment) = self.graft_comment(tree, id) {
                    let doc = self.doc_tree_for(tree, comment)?;
                    return Some(TreeNode::Doc {
                        comment,
                        node: doc.root(),
                    });
                }
                tree.child_at(id, index).map(TreeNode::Ast)
            }
            TreeNode::Doc { comment, node } => {
                let doc = self.doc_tree(comment)?;
                let child = doc.children(node).get(index).copied()?;
                Some(TreeNode::Doc {
                    comment,
                    node: child,
                })
            }
        }
    }

    /// Cell value of `node` in `column`.
    pub fn value_at(&self, node: TreeNode, column: Column) -> Result<CellValue> {
        self.with_fields(node, |type_name, data| match column {
            Column::Tree => CellValue::Empty,
            Column::Type => CellValue::Text(type_name.to_string()),
            Column::Line => CellValue::Integer(data.line),
            Column::Column => CellValue::Integer(data.column),
            Column::Text => CellValue::Text(data.text.clone()),
        })
    }

    /// Run `f` with the type name and fields of `node`.
    pub fn with_fields<R>(
        &self,
        node: TreeNode,
        f: impl FnOnce(&str, &NodeData) -> R,
    ) -> Result<R> {
        let result = self.fields_of(node, f);
        if result.is_err() {
            tracing::warn!(?node, "stale node handle");
        }
        result
    }

    fn fields_of<R>(&self, node: TreeNode, f: impl FnOnce(&str, &NodeData) -> R) -> Result<R> {
        match node {
            TreeNode::Root => Ok(f(EOF, &self.sentinel)),
            TreeNode::Ast(id) => {
                let tree = self.tree.as_ref().ok_or(InspectorError::StaleNode)?;
                let data = tree.data(id).ok_or(InspectorError::StaleNode)?;
                Ok(f(tree.type_name(id), data))
            }
            TreeNode::Doc { comment, node } => {
                let doc = self.doc_tree(comment).ok_or(InspectorError::StaleNode)?;
                let data = doc.data(node).ok_or(InspectorError::StaleNode)?;
                Ok(f(doc.type_name(node), data))
            }
        }
    }

    /// Source span of `node`, computed over the raw tree.
    pub fn span_of(&self, node: TreeNode, table: &LineOffsetTable) -> Option<Span> {
        match node {
            TreeNode::Root => {
                let start = table.offset_of(self.sentinel.line, self.sentinel.column)?;
                let end = match &self.tree {
                    Some(tree) => span::end_position(tree, tree.root(), table)?,
                    None if self.sentinel.text == EOF => start,
                    None => start + self.sentinel.text.chars().count(),
                };
                Some(Span::new(start, end))
            }
            TreeNode::Ast(id) => span::resolve_span(self.tree.as_ref()?, id, table),
            TreeNode::Doc { comment, node } => {
                let doc = self.doc_tree(comment)?;
                span::resolve_span(doc.as_ref(), node, table)
            }
        }
    }

    /// The cached doc tree parsed from `comment`, if it has been parsed.
    pub fn doc_tree(&self, comment: NodeId) -> Option<Rc<DocTree>> {
        self.doc_trees.borrow().get(&comment).cloned()
    }

    /// Number of cached doc trees.
    pub fn cached_doc_trees(&self) -> usize {
        self.doc_trees.borrow().len()
    }

    fn doc_tree_for(&self, tree: &ParseTree, comment: NodeId) -> Option<Rc<DocTree>> {
        if let Some(doc) = self.doc_tree(comment) {
            return Some(doc);
        }
        let parser = self.doc_parser.as_ref()?;
        let doc = Rc::new(parser.parse_doc_comment(tree, comment));
        tracing::debug!(
            comment = comment.index(),
            nodes = doc.len(),
            "parsed doc comment"
        );
        self.doc_trees.borrow_mut().insert(comment, Rc::clone(&doc));
        Some(doc)
    }

    /// The doc comment whose content `id` is, when `id` gets a grafted doc subtree.
    fn graft_comment(&self, tree: &ParseTree, id: NodeId) -> Option<NodeId> {
        if self.mode != ParseMode::WithCommentsAndDocs {
            return None;
        }
        let parser = self.doc_parser.as_ref()?;
        if tree.data(id)?.kind != self.comment_content? {
            return None;
        }
        let comment = tree.parent(id)?;
        parser.is_doc_comment(tree, comment).then_some(comment)
    }
}

impl Default for NodeAdapter {
    fn default() -> Self {
        Self::new()
    }
}
