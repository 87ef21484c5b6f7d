//! Tree-table model
//!
//! Exposes the installed tree as a five-column tree-table: column 0 is the hierarchy itself,
//! the others are scalar fields of the node on that row.
//!
//! # Example
//!
//! ```rust
//! use inspector_core::{CellValue, ParseTreeModel, TreeNode};
//!
//! let mut model = ParseTreeModel::new();
//! model.subscribe(|event| println!("model changed: {event:?}"));
//!
//! assert_eq!(model.column_count(), 5);
//! assert_eq!(model.column_name(3).unwrap(), "Column");
//! assert_eq!(model.child_count(TreeNode::Root), 0);
//! assert_eq!(
//!     model.value_at(TreeNode::Root, 4).unwrap(),
//!     CellValue::Text("ROOT".to_string())
//! );
//! ```

use crate::adapter::{DocCommentParser, NodeAdapter};
use crate::error::{InspectorError, Result};
use crate::line_offsets::LineOffsetTable;
use crate::node::{ParseMode, ParseTree, TreeNode};
use crate::outline::TreePath;
use crate::span::Span;
use std::fmt;
use std::rc::Rc;

/// Column headers, in column order.
pub const COLUMN_NAMES: [&str; 5] = ["Tree", "Type", "Line", "Column", "Text"];

/// A tree-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// The hierarchy column. Holds no scalar value.
    Tree,
    /// Type display name.
    Type,
    /// 1-based line.
    Line,
    /// 0-based column.
    Column,
    /// Literal text.
    Text,
}

impl Column {
    /// Every column, in order.
    pub const ALL: [Column; 5] = [
        Column::Tree,
        Column::Type,
        Column::Line,
        Column::Column,
        Column::Text,
    ];

    /// Column at `index`.
    pub fn from_index(index: usize) -> Result<Column> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InspectorError::UnknownColumn(index))
    }

    /// Position of the column.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header text.
    pub fn name(self) -> &'static str {
        COLUMN_NAMES[self.index()]
    }

    /// Value class of the column.
    pub fn class(self) -> ColumnClass {
        match self {
            Column::Tree => ColumnClass::TreeModel,
            Column::Type | Column::Text => ColumnClass::Text,
            Column::Line | Column::Column => ColumnClass::Integer,
        }
    }
}

/// What kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    /// Marker for the hierarchy column; rendered by the outline.
    TreeModel,
    /// Strings.
    Text,
    /// Integers.
    Integer,
}

/// Value of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// No scalar value (the tree column).
    Empty,
    /// A string.
    Text(String),
    /// An integer.
    Integer(usize),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(value) => write!(f, "{value}"),
        }
    }
}

/// Notification sent to model listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeModelEvent {
    /// Everything below the path's last node changed.
    StructureChanged(TreePath),
}

/// Model listener callback type.
pub type TreeModelListener = Box<dyn FnMut(&TreeModelEvent)>;

/// The tree-table model over an installed parse tree.
///
/// The root is always [`TreeNode::Root`]; installing a tree replaces its only child.
pub struct ParseTreeModel {
    adapter: NodeAdapter,
    listeners: Vec<TreeModelListener>,
}

impl ParseTreeModel {
    /// Create a model with nothing installed.
    pub fn new() -> Self {
        Self {
            adapter: NodeAdapter::new(),
            listeners: Vec::new(),
        }
    }

    /// Register the doc comment parser used when doc subtrees are enabled.
    pub fn with_doc_parser(mut self, parser: Rc<dyn DocCommentParser>) -> Self {
        self.adapter.set_doc_parser(parser);
        self
    }

    /// Register a listener. Listeners run last-registered-first.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TreeModelEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Install `tree` (or nothing) under the sentinel root.
    ///
    /// Emits exactly one [`TreeModelEvent::StructureChanged`] rooted at the sentinel.
    pub fn set_root(&mut self, tree: Option<ParseTree>) {
        tracing::debug!(
            nodes = tree.as_ref().map_or(0, ParseTree::len),
            "installing parse tree"
        );
        self.adapter.set_tree(tree);
        self.notify(&TreeModelEvent::StructureChanged(TreePath::root()));
    }

    /// Change how comments are presented. Emits nothing; callers reload to see the effect.
    pub fn set_parse_mode(&mut self, mode: ParseMode) {
        self.adapter.set_mode(mode);
    }

    /// Current parse mode.
    pub fn parse_mode(&self) -> ParseMode {
        self.adapter.mode()
    }

    /// The installed tree.
    pub fn tree(&self) -> Option<&ParseTree> {
        self.adapter.tree()
    }

    /// The node adapter.
    pub fn adapter(&self) -> &NodeAdapter {
        &self.adapter
    }

    /// The sentinel root.
    pub fn root(&self) -> TreeNode {
        TreeNode::Root
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        COLUMN_NAMES.len()
    }

    /// Header of column `index`.
    pub fn column_name(&self, index: usize) -> Result<&'static str> {
        Column::from_index(index).map(Column::name)
    }

    /// Value class of column `index`.
    pub fn column_class(&self, index: usize) -> Result<ColumnClass> {
        Column::from_index(index).map(Column::class)
    }

    /// Only the hierarchy column accepts edit starts; its editor then rejects them.
    pub fn is_cell_editable(&self, column: usize) -> bool {
        matches!(self.column_class(column), Ok(ColumnClass::TreeModel))
    }

    /// Cell value of `node` in column `index`.
    pub fn value_at(&self, node: TreeNode, column: usize) -> Result<CellValue> {
        self.adapter.value_at(node, Column::from_index(column)?)
    }

    /// Number of children of `node`.
    pub fn child_count(&self, node: TreeNode) -> usize {
        self.adapter.child_count(node)
    }

    /// Child of `node` at `index`.
    pub fn child_at(&self, node: TreeNode, index: usize) -> Option<TreeNode> {
        self.adapter.child_at(node, index)
    }

    /// Returns `true` if `node` has no children.
    pub fn is_leaf(&self, node: TreeNode) -> bool {
        self.child_count(node) == 0
    }

    /// Position of `child` among the children of `parent`.
    pub fn index_of_child(&self, parent: TreeNode, child: TreeNode) -> Option<usize> {
        (0..self.child_count(parent)).find(|&index| self.child_at(parent, index) == Some(child))
    }

    /// Source span of `node`.
    pub fn span_of(&self, node: TreeNode, table: &LineOffsetTable) -> Option<Span> {
        self.adapter.span_of(node, table)
    }

    /// Outline label of `node`: `text[line x column]`.
    pub fn label(&self, node: TreeNode) -> Result<String> {
        self.adapter.with_fields(node, |_, data| {
            format!("{}[{}x{}]", data.text, data.line, data.column)
        })
    }

    fn notify(&mut self, event: &TreeModelEvent) {
        for listener in self.listeners.iter_mut().rev() {
            listener(event);
        }
    }
}

impl Default for ParseTreeModel {
    fn default() -> Self {
        Self::new()
    }
}
