#![warn(missing_docs)]
//! Inspector Core - Headless Parse Tree Inspector
//!
//! # Overview
//!
//! `inspector-core` shows a parse tree as a tree-table: an expandable outline of the nodes plus
//! scalar columns (type, line, column, text) for each visible row. Selecting a row yields the
//! character span the node covers in its source, so a front end can highlight it. Doc comments
//! can be expanded into their own secondary trees, parsed on demand.
//!
//! The crate does not parse anything itself and does not draw anything. A [`SourceParser`]
//! supplies the trees (see `inspector-treesitter`) and a front end renders the rows (see
//! `tui-inspector`).
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  InspectorSession (open / reload / mode)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  TreeTableView (rows, idle refresh, search) │  ← Widget State
//! ├──────────────────────┬──────────────────────┤
//! │  Outline             │  SelectionBridge     │  ← Rows & Selection
//! ├──────────────────────┴──────────────────────┤
//! │  ParseTreeModel (5 columns, listeners)      │  ← Tree-Table Model
//! ├─────────────────────────────────────────────┤
//! │  NodeAdapter (doc tree grafting)            │  ← Node Access
//! ├─────────────────────────────────────────────┤
//! │  ParseTree / DocTree, LineOffsetTable       │  ← Data
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use inspector_core::{
//!     CellValue, LineOffsetTable, NodeData, ParseTreeBuilder, ParseTreeModel, TreeNode,
//!     TreeTableConfig, TreeTableView,
//! };
//! use inspector_lang::Vocabulary;
//! use std::sync::Arc;
//!
//! let vocabulary = Arc::new(Vocabulary::from_names(["EOF", "CLASS_DEF", "IDENT"]));
//! let mut builder = ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, "CLASS_DEF"));
//! let root = builder.root();
//! builder.child(root, NodeData::new(2, 1, 6, "A"));
//!
//! let mut view = TreeTableView::new(ParseTreeModel::new(), TreeTableConfig::default());
//! view.set_root(Some(builder.finish()), LineOffsetTable::build(&["class A {}"]));
//! view.process_idle();
//! assert_eq!(view.row_count(), 1);
//!
//! view.expand_node(TreeNode::Root);
//! view.process_idle();
//! assert_eq!(view.row_count(), 2);
//! assert_eq!(view.value_at(1, 1).unwrap(), CellValue::Text("CLASS_DEF".to_string()));
//! ```
//!
//! # Module Description
//!
//! - [`node`] - Primary and doc trees, node handles, parse modes
//! - [`line_offsets`] - (line, column) to character offset mapping
//! - [`span`] - Source span of a node
//! - [`adapter`] - Uniform node access and doc tree grafting
//! - [`model`] - The five-column tree-table model
//! - [`outline`] - Expansion state and visible rows
//! - [`selection`] - Row and path selection kept in sync
//! - [`idle`] - Coalescing idle task queue
//! - [`locator`] - Locator strings for primary nodes
//! - [`view`] - The tree-table view
//! - [`session`] - Document loading and the application-facing API
//!
//! # Threading
//!
//! Everything here runs on one thread. Types that hold the doc tree cache or the selection
//! guard are `!Send`.

pub mod adapter;
pub mod error;
pub mod idle;
pub mod line_offsets;
pub mod locator;
pub mod model;
pub mod node;
pub mod outline;
pub mod selection;
pub mod session;
pub mod span;
mod text;
pub mod view;

pub use adapter::{DocCommentParser, NodeAdapter, ROOT_TEXT};
pub use error::{InspectorError, Result};
pub use idle::IdleQueue;
pub use line_offsets::LineOffsetTable;
pub use locator::{LocatorGenerator, PathLocator};
pub use model::{
    COLUMN_NAMES, CellValue, Column, ColumnClass, ParseTreeModel, TreeModelEvent,
    TreeModelListener,
};
pub use node::{
    DocNode, DocNodeId, DocTree, DocTreeBuilder, NodeData, NodeId, ParseMode, ParseTree,
    ParseTreeBuilder, TreeNode,
};
pub use outline::{Outline, OutlineHit, OutlineRow, TreePath};
pub use selection::{
    ListSelectionEvent, ListSelectionModel, RowMapper, SelectionBridge, SelectionEvent,
    TreeSelectionEvent, TreeSelectionModel,
};
pub use session::{
    InspectorSession, SessionChange, SessionChangeType, SourceDocument, SourceParser,
};
pub use span::{Span, resolve_span};
pub use text::split_lines;
pub use view::{
    ColumnLayout, EditTrigger, KeyStroke, MouseEvent, SearchOutcome, TableEvent, TreeTableConfig,
    TreeTableView, ViewAction,
};
