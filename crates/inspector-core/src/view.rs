//! Tree-table view
//!
//! [`TreeTableView`] fuses an [`Outline`] (the hierarchy column) with a grid of scalar columns.
//! It owns the model, the outline and the [`SelectionBridge`], and adds the behavior that only
//! exists at the widget level:
//!
//! - **Deferred refresh**: the grid's row count is a snapshot. Model structure changes and
//!   expand/collapse post one coalesced [`ViewTask::RefreshRows`] that runs on the next idle
//!   tick ([`TreeTableView::process_idle`]) and broadcasts [`TableEvent::DataChanged`].
//! - **Edit gate**: only the tree column is editable, and its editor forwards mouse presses to
//!   the outline before rejecting the edit.
//! - **Row height sync**: grid and outline always agree on the row height.
//! - **Expand/collapse action**: bound to `Enter` and double click.
//! - **Locator search**: finds a node from its locator string.

use crate::error::{InspectorError, Result};
use crate::idle::IdleQueue;
use crate::line_offsets::LineOffsetTable;
use crate::locator::{LocatorGenerator, PathLocator};
use crate::model::{CellValue, Column, ColumnClass, ParseTreeModel};
use crate::node::{ParseMode, ParseTree, TreeNode};
use crate::outline::{Outline, OutlineHit, OutlineRow, TreePath};
use crate::selection::SelectionBridge;
use crate::span::Span;
use std::collections::HashMap;

/// Panel text when a search runs with nothing loaded.
pub const NOTHING_LOADED: &str = "No file opened";
/// Panel text for nodes that have no locator.
pub const LOCATOR_UNSUPPORTED: &str = "Locator is not supported yet for doc comment nodes";

/// Cells of padding added to every computed column width.
const COLUMN_PADDING: u16 = 1;
/// Widest number the `Line` and `Column` columns are sized for.
const NUMBER_COLUMN_CHARS: u16 = 6;
/// Width the `Type` column is sized for.
const TYPE_COLUMN_CHARS: u16 = 28;
/// Share of the viewport given to the tree column, in percent.
const TREE_COLUMN_PERCENT: u32 = 60;
/// Narrowest `Text` column.
const MIN_TEXT_COLUMN: u16 = 8;

/// View configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeTableConfig {
    /// Height of one row, in cells.
    pub row_height: u16,
    /// Outline indent per depth level, in cells.
    pub indent_width: u16,
    /// Width available to the whole table, in cells.
    pub viewport_width: u16,
}

impl TreeTableConfig {
    /// Set the row height.
    pub fn with_row_height(mut self, row_height: u16) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the indent width.
    pub fn with_indent_width(mut self, indent_width: u16) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Set the viewport width.
    pub fn with_viewport_width(mut self, viewport_width: u16) -> Self {
        self.viewport_width = viewport_width;
        self
    }
}

impl Default for TreeTableConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            indent_width: 2,
            viewport_width: 120,
        }
    }
}

/// Column widths and horizontal positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    widths: [u16; 5],
}

impl ColumnLayout {
    /// Initial widths for a table `viewport_width` cells wide.
    pub fn initial(viewport_width: u16) -> Self {
        let number = NUMBER_COLUMN_CHARS + COLUMN_PADDING;
        let type_width = TYPE_COLUMN_CHARS + COLUMN_PADDING;
        let tree = (u32::from(viewport_width) * TREE_COLUMN_PERCENT / 100) as u16;
        let text = viewport_width
            .saturating_sub(tree + type_width + 2 * number)
            .max(MIN_TEXT_COLUMN);
        Self {
            widths: [tree, type_width, number, number, text],
        }
    }

    /// Width of `column`.
    pub fn width(&self, column: Column) -> u16 {
        self.widths[column.index()]
    }

    /// Set the width of `column`.
    pub fn set_width(&mut self, column: Column, width: u16) {
        self.widths[column.index()] = width;
    }

    /// X of the left edge of `column`.
    pub fn left(&self, column: Column) -> u16 {
        self.widths[..column.index()].iter().sum()
    }

    /// Column under `x`.
    pub fn column_at_x(&self, x: u16) -> Option<Column> {
        let mut left = 0;
        for column in Column::ALL {
            let right = left + self.width(column);
            if x >= left && x < right {
                return Some(column);
            }
            left = right;
        }
        None
    }

    /// All widths in column order.
    pub fn widths(&self) -> [u16; 5] {
        self.widths
    }
}

/// Deferred work of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTask {
    /// Re-read the row count and broadcast a data change.
    RefreshRows,
}

/// Notification sent to grid listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Every row may have changed.
    DataChanged {
        /// Row count after the change.
        row_count: usize,
    },
}

/// Grid listener callback type.
pub type TableListener = Box<dyn FnMut(&TableEvent)>;

/// A mouse press, relative to the top-left of the table body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Column, in cells.
    pub x: u16,
    /// Row, in cells.
    pub y: u16,
    /// 1 for a single click, 2 for a double click.
    pub click_count: u8,
}

impl MouseEvent {
    /// A single click.
    pub fn click(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            click_count: 1,
        }
    }

    /// A double click.
    pub fn double_click(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            click_count: 2,
        }
    }
}

/// What started a cell edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTrigger {
    /// A mouse press on the cell.
    Mouse(MouseEvent),
    /// A key press while the cell had focus.
    Keyboard,
}

/// Keys the view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStroke {
    /// Enter.
    Enter,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
}

/// Named view actions, reachable through the input map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewAction {
    /// Toggle expansion of the selected node.
    ExpandCollapse,
    /// Select the previous row.
    SelectPrevious,
    /// Select the next row.
    SelectNext,
    /// Collapse the selected node, or select its parent if already collapsed.
    CollapseOrParent,
    /// Expand the selected node.
    Expand,
    /// Select the first row.
    SelectFirst,
    /// Select the last row.
    SelectLast,
}

/// Result of a locator search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A node matched; it is now visible and selected.
    Found,
    /// No node matched.
    NotFound,
    /// Nothing is loaded.
    Empty,
}

/// Tree-table widget state.
pub struct TreeTableView {
    model: ParseTreeModel,
    outline: Outline,
    selection: SelectionBridge,
    idle: IdleQueue<ViewTask>,
    table_rows: usize,
    row_height: u16,
    layout: ColumnLayout,
    table_listeners: Vec<TableListener>,
    input_map: HashMap<KeyStroke, ViewAction>,
    locator: Box<dyn LocatorGenerator>,
    line_offsets: LineOffsetTable,
    code_selection: Option<Span>,
    locator_panel: String,
}

impl TreeTableView {
    /// Create a view over `model`.
    pub fn new(mut model: ParseTreeModel, config: TreeTableConfig) -> Self {
        let idle = IdleQueue::new();
        let queue = idle.clone();
        model.subscribe(move |_event| {
            queue.post_coalesced(ViewTask::RefreshRows);
        });
        let mut outline = Outline::new(config.indent_width);
        outline.structure_changed(&model);
        let table_rows = outline.row_count();
        let mut view = Self {
            model,
            outline,
            selection: SelectionBridge::new(),
            idle,
            table_rows,
            row_height: 0,
            layout: ColumnLayout::initial(config.viewport_width),
            table_listeners: Vec::new(),
            input_map: default_input_map(),
            locator: Box::new(PathLocator),
            line_offsets: LineOffsetTable::empty(),
            code_selection: None,
            locator_panel: String::new(),
        };
        view.set_row_height(config.row_height.max(1));
        view
    }

    /// Replace the locator generator.
    pub fn with_locator(mut self, locator: Box<dyn LocatorGenerator>) -> Self {
        self.locator = locator;
        self
    }

    /// The model.
    pub fn model(&self) -> &ParseTreeModel {
        &self.model
    }

    /// The outline.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// The selection bridge.
    pub fn selection(&self) -> &SelectionBridge {
        &self.selection
    }

    /// The line offsets of the installed document.
    pub fn line_offsets(&self) -> &LineOffsetTable {
        &self.line_offsets
    }

    /// Register a grid listener.
    pub fn subscribe_table<F>(&mut self, listener: F)
    where
        F: FnMut(&TableEvent) + 'static,
    {
        self.table_listeners.push(Box::new(listener));
    }

    /// Install a tree with the line offsets of its document.
    ///
    /// The outline collapses to the sentinel root and the selection is cleared right away; the
    /// grid's row count follows on the next idle tick.
    pub fn set_root(&mut self, tree: Option<ParseTree>, line_offsets: LineOffsetTable) {
        self.line_offsets = line_offsets;
        self.model.set_root(tree);
        self.outline.structure_changed(&self.model);
        self.selection.clear(&self.outline);
        self.code_selection = None;
    }

    /// Change the parse mode. Nothing is refreshed until the next reload.
    pub fn set_parse_mode(&mut self, mode: ParseMode) {
        self.model.set_parse_mode(mode);
    }

    /// Run every pending idle task. Returns how many ran.
    pub fn process_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.idle.pop() {
            match task {
                ViewTask::RefreshRows => {
                    self.table_rows = self.outline.row_count();
                    tracing::debug!(rows = self.table_rows, "refreshed table rows");
                    let event = TableEvent::DataChanged {
                        row_count: self.table_rows,
                    };
                    for listener in self.table_listeners.iter_mut() {
                        listener(&event);
                    }
                }
            }
            ran += 1;
        }
        ran
    }

    /// Returns `true` if a row refresh is waiting for the next idle tick.
    pub fn has_pending_refresh(&self) -> bool {
        self.idle.is_pending(&ViewTask::RefreshRows)
    }

    /// Number of grid rows, as of the last refresh.
    pub fn row_count(&self) -> usize {
        self.table_rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.model.column_count()
    }

    /// Header of column `index`.
    pub fn column_name(&self, index: usize) -> Result<&'static str> {
        self.model.column_name(index)
    }

    /// Value class of column `index`.
    pub fn column_class(&self, index: usize) -> Result<ColumnClass> {
        self.model.column_class(index)
    }

    /// Node shown on `row`.
    pub fn node_at_row(&self, row: usize) -> Option<TreeNode> {
        self.outline.row(row).map(|entry| entry.node)
    }

    /// Outline entry of `row`.
    pub fn outline_row(&self, row: usize) -> Option<&OutlineRow> {
        self.outline.row(row)
    }

    /// Cell value at `(row, column)`.
    pub fn value_at(&self, row: usize, column: usize) -> Result<CellValue> {
        let column = Column::from_index(column)?;
        let node = self
            .node_at_row(row)
            .ok_or(InspectorError::RowOutOfRange(row))?;
        self.model.adapter().value_at(node, column)
    }

    /// Outline label of `row`.
    pub fn label_at(&self, row: usize) -> Result<String> {
        let node = self
            .node_at_row(row)
            .ok_or(InspectorError::RowOutOfRange(row))?;
        self.model.label(node)
    }

    /// Returns `true` if the model accepts edit starts on the cell.
    pub fn is_cell_editable(&self, row: usize, column: usize) -> bool {
        row < self.row_count() && self.model.is_cell_editable(column)
    }

    /// Try to start editing a cell. Always ends with the edit rejected.
    ///
    /// For the tree column, a mouse-originated start is first forwarded to the outline with
    /// `x` translated into the column, so clicks still expand, collapse and select.
    pub fn edit_cell_at(&mut self, row: usize, column: usize, trigger: EditTrigger) -> bool {
        if !self.is_cell_editable(row, column) {
            return false;
        }
        self.tree_editor_accepts(trigger)
    }

    fn tree_editor_accepts(&mut self, trigger: EditTrigger) -> bool {
        if let EditTrigger::Mouse(event) = trigger {
            let translated = MouseEvent {
                x: event.x.saturating_sub(self.layout.left(Column::Tree)),
                ..event
            };
            self.dispatch_outline_mouse(translated);
        }
        false
    }

    /// Handle a mouse press on the table body.
    pub fn click(&mut self, event: MouseEvent) {
        let row = usize::from(event.y / self.row_height.max(1));
        match self.layout.column_at_x(event.x) {
            Some(column) if column.class() == ColumnClass::TreeModel => {
                self.edit_cell_at(row, column.index(), EditTrigger::Mouse(event));
            }
            Some(_) if row < self.outline.row_count() => self.select_row(row),
            _ => {}
        }
        if event.click_count >= 2 {
            self.expand_selected_node();
        }
    }

    fn dispatch_outline_mouse(&mut self, event: MouseEvent) {
        match self.outline.hit_test(event.x, event.y) {
            Some(OutlineHit::Toggle(_)) if event.click_count >= 2 => {}
            Some(OutlineHit::Toggle(row)) => {
                if let Some(node) = self.node_at_row(row) {
                    self.toggle_node(node);
                }
            }
            Some(OutlineHit::Select(row)) => self.select_row(row),
            None => {}
        }
    }

    /// Grid row height.
    pub fn row_height(&self) -> u16 {
        self.row_height
    }

    /// Outline row height.
    pub fn outline_row_height(&self) -> u16 {
        self.outline.row_height()
    }

    /// Set the grid row height; the outline follows if it differs.
    pub fn set_row_height(&mut self, height: u16) {
        if height == 0 {
            return;
        }
        self.row_height = height;
        if self.outline.row_height() != height {
            self.set_outline_row_height(height);
        }
    }

    /// Set the outline row height; the grid follows if it differs.
    pub fn set_outline_row_height(&mut self, height: u16) {
        if !self.outline.set_row_height(height) {
            return;
        }
        if self.row_height != height {
            self.set_row_height(height);
        }
    }

    /// Column layout.
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Recompute the initial column widths for a new viewport width.
    pub fn set_viewport_width(&mut self, width: u16) {
        self.layout = ColumnLayout::initial(width);
    }

    /// Select `row` only.
    pub fn select_row(&mut self, row: usize) {
        self.select_rows(row, row);
    }

    /// Select rows `[first, last]` only.
    pub fn select_rows(&mut self, first: usize, last: usize) {
        self.selection
            .set_row_selection(first, last, &self.outline);
        self.update_code_selection();
    }

    /// Add rows `[first, last]` to the selection.
    pub fn add_row_selection(&mut self, first: usize, last: usize) {
        self.selection
            .add_row_selection(first, last, &self.outline);
        self.update_code_selection();
    }

    /// Remove rows `[first, last]` from the selection.
    pub fn remove_row_selection(&mut self, first: usize, last: usize) {
        self.selection
            .remove_row_selection(first, last, &self.outline);
        self.update_code_selection();
    }

    /// Select `path` only.
    pub fn select_path(&mut self, path: TreePath) {
        self.selection.set_selection_path(path, &self.outline);
        self.update_code_selection();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear(&self.outline);
        self.update_code_selection();
    }

    /// Lead selected node.
    pub fn selected_node(&self) -> Option<TreeNode> {
        self.selection.lead_path().map(TreePath::last)
    }

    /// Row of the lead selected node.
    pub fn selected_row(&self) -> Option<usize> {
        self.selection
            .lead_path()
            .and_then(|path| self.outline.row_for_path(path))
    }

    /// Span of the selected node in the source text.
    pub fn current_selection_span(&self) -> Option<Span> {
        self.code_selection
    }

    fn update_code_selection(&mut self) {
        self.code_selection = self
            .selected_node()
            .and_then(|node| self.model.span_of(node, &self.line_offsets));
    }

    /// Expand `node` if it is collapsed, collapse it otherwise.
    pub fn toggle_node(&mut self, node: TreeNode) {
        if self.outline.is_expanded(node) {
            self.collapse_node(node);
        } else {
            self.expand_node(node);
        }
    }

    /// Expand `node`.
    pub fn expand_node(&mut self, node: TreeNode) {
        if self.outline.expand(node, &self.model) {
            self.rows_moved();
        }
    }

    /// Collapse `node`.
    pub fn collapse_node(&mut self, node: TreeNode) {
        if self.outline.collapse(node, &self.model) {
            self.selection.collapse_descendants(node, &self.outline);
            self.update_code_selection();
            self.idle.post_coalesced(ViewTask::RefreshRows);
        }
    }

    fn rows_moved(&mut self) {
        self.selection.reset_row_selection(&self.outline);
        self.idle.post_coalesced(ViewTask::RefreshRows);
    }

    /// The expand/collapse action: refresh the code selection and locator for the selected
    /// node, toggle its expansion and keep it selected.
    pub fn expand_selected_node(&mut self) {
        let Some(path) = self.selection.lead_path().cloned() else {
            return;
        };
        self.update_code_selection();
        self.show_locator(path.last());
        self.toggle_node(path.last());
        self.select_path(path);
    }

    fn show_locator(&mut self, node: TreeNode) {
        self.locator_panel = match node {
            TreeNode::Ast(id) => self
                .model
                .tree()
                .and_then(|tree| self.locator.locator_of(tree, id))
                .unwrap_or_default(),
            TreeNode::Doc { .. } => LOCATOR_UNSUPPORTED.to_string(),
            TreeNode::Root => String::new(),
        };
    }

    /// Text of the locator panel.
    pub fn locator_panel(&self) -> &str {
        &self.locator_panel
    }

    /// Replace the text of the locator panel.
    pub fn set_locator_panel(&mut self, text: impl Into<String>) {
        self.locator_panel = text.into();
    }

    /// Find the first primary node, in depth-first order, whose locator equals `query`.
    ///
    /// On a match its ancestors are expanded, it becomes the selection and the panel shows its
    /// locator. Otherwise a
    /// diagnostic line is appended to the locator panel and the outline is left alone.
    pub fn search_by_locator(&mut self, query: &str) -> SearchOutcome {
        let Some(tree) = self.model.tree() else {
            self.locator_panel = NOTHING_LOADED.to_string();
            return SearchOutcome::Empty;
        };
        let found = tree
            .preorder()
            .find(|&id| self.locator.locator_of(tree, id).as_deref() == Some(query))
            .map(|id| TreePath::to_ast(tree, id));

        let Some(path) = found else {
            tracing::debug!(query, "locator search found nothing");
            if !self.locator_panel.is_empty() && !self.locator_panel.ends_with('\n') {
                self.locator_panel.push('\n');
            }
            self.locator_panel
                .push_str(&format!("No node matching locator '{query}' found."));
            return SearchOutcome::NotFound;
        };

        let ancestors = &path.nodes()[..path.nodes().len() - 1];
        if self.outline.expand_all(ancestors, &self.model) {
            self.rows_moved();
        }
        self.show_locator(path.last());
        self.select_path(path);
        SearchOutcome::Found
    }

    /// Bind `key` to `action`.
    pub fn bind_key(&mut self, key: KeyStroke, action: ViewAction) {
        self.input_map.insert(key, action);
    }

    /// Run the action bound to `key`. Returns `false` if the key is unbound.
    pub fn handle_key(&mut self, key: KeyStroke) -> bool {
        let Some(action) = self.input_map.get(&key).copied() else {
            return false;
        };
        self.perform(action);
        true
    }

    /// Run a view action.
    pub fn perform(&mut self, action: ViewAction) {
        let last_row = self.outline.row_count().saturating_sub(1);
        let selected = self.selected_row();
        match action {
            ViewAction::ExpandCollapse => self.expand_selected_node(),
            ViewAction::SelectPrevious => {
                let row = selected.map_or(0, |row| row.saturating_sub(1));
                self.select_row(row);
            }
            ViewAction::SelectNext => {
                let row = selected.map_or(0, |row| (row + 1).min(last_row));
                self.select_row(row);
            }
            ViewAction::SelectFirst => self.select_row(0),
            ViewAction::SelectLast => self.select_row(last_row),
            ViewAction::Expand => {
                if let Some(node) = self.selected_node() {
                    self.expand_node(node);
                }
            }
            ViewAction::CollapseOrParent => {
                let Some(row) = selected else {
                    return;
                };
                let Some(entry) = self.outline.row(row).copied() else {
                    return;
                };
                if entry.expanded {
                    self.collapse_node(entry.node);
                } else if let Some(parent) = entry.parent {
                    self.select_row(parent);
                }
            }
        }
    }
}

fn default_input_map() -> HashMap<KeyStroke, ViewAction> {
    HashMap::from([
        (KeyStroke::Enter, ViewAction::ExpandCollapse),
        (KeyStroke::Up, ViewAction::SelectPrevious),
        (KeyStroke::Down, ViewAction::SelectNext),
        (KeyStroke::Left, ViewAction::CollapseOrParent),
        (KeyStroke::Right, ViewAction::Expand),
        (KeyStroke::Home, ViewAction::SelectFirst),
        (KeyStroke::End, ViewAction::SelectLast),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let layout = ColumnLayout::initial(100);
        assert_eq!(layout.width(Column::Tree), 60);
        assert_eq!(layout.width(Column::Type), 29);
        assert_eq!(layout.width(Column::Line), 7);
        assert_eq!(layout.width(Column::Column), 7);
        assert_eq!(layout.width(Column::Text), MIN_TEXT_COLUMN);
        assert_eq!(layout.left(Column::Type), 60);
        assert_eq!(layout.column_at_x(59), Some(Column::Tree));
        assert_eq!(layout.column_at_x(60), Some(Column::Type));
    }

    #[test]
    fn test_wide_layout_gives_rest_to_text() {
        let layout = ColumnLayout::initial(200);
        assert_eq!(layout.widths().iter().sum::<u16>(), 200);
    }

    #[test]
    fn test_row_height_sync() {
        let mut view = TreeTableView::new(ParseTreeModel::new(), TreeTableConfig::default());
        assert_eq!(view.row_height(), 1);
        assert_eq!(view.outline_row_height(), 1);

        view.set_row_height(2);
        assert_eq!(view.outline_row_height(), 2);
        view.set_outline_row_height(3);
        assert_eq!(view.row_height(), 3);
        view.set_outline_row_height(0);
        assert_eq!(view.row_height(), 3);
        assert_eq!(view.outline_row_height(), 3);
    }

    #[test]
    fn test_keyboard_edit_is_rejected() {
        let mut view = TreeTableView::new(ParseTreeModel::new(), TreeTableConfig::default());
        assert!(view.is_cell_editable(0, 0));
        assert!(!view.is_cell_editable(0, 1));
        assert!(!view.edit_cell_at(0, 0, EditTrigger::Keyboard));
    }

    #[test]
    fn test_search_with_nothing_loaded() {
        let mut view = TreeTableView::new(ParseTreeModel::new(), TreeTableConfig::default());
        assert_eq!(view.search_by_locator("/X"), SearchOutcome::Empty);
        assert_eq!(view.locator_panel(), NOTHING_LOADED);
    }
}
