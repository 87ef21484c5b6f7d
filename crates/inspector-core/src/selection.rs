//! Row and path selection
//!
//! A tree-table has two selection models: the grid's flat row selection and the outline's
//! hierarchical path selection. [`SelectionBridge`] owns both and mirrors every change of one
//! into the other. A single `updating` flag breaks the feedback loop: a change that arrives
//! while a mirror pass is running is ignored, not queued.

use crate::node::TreeNode;
use crate::outline::{Outline, TreePath};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Maps between visible rows and tree paths.
pub trait RowMapper {
    /// Path of the node on `row`.
    fn path_for_row(&self, row: usize) -> Option<TreePath>;

    /// Row of the node `path` leads to, if visible.
    fn row_for_path(&self, path: &TreePath) -> Option<usize>;
}

impl RowMapper for Outline {
    fn path_for_row(&self, row: usize) -> Option<TreePath> {
        Outline::path_for_row(self, row)
    }

    fn row_for_path(&self, path: &TreePath) -> Option<usize> {
        Outline::row_for_path(self, path)
    }
}

/// Rows whose selection state changed, as an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSelectionEvent {
    /// First row that may have changed.
    pub first: usize,
    /// Last row that may have changed.
    pub last: usize,
}

/// Flat row selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSelectionModel {
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
    lead: Option<usize>,
}

impl ListSelectionModel {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `row` is selected.
    pub fn is_selected(&self, row: usize) -> bool {
        self.selected.contains(&row)
    }

    /// Smallest selected row.
    pub fn min_selection_index(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    /// Largest selected row.
    pub fn max_selection_index(&self) -> Option<usize> {
        self.selected.last().copied()
    }

    /// Returns `true` if no row is selected.
    pub fn is_selection_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected rows in ascending order.
    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Row the last interval started at.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Row the last interval ended at.
    pub fn lead(&self) -> Option<usize> {
        self.lead
    }

    /// Replace the selection with `[a, b]`.
    pub fn set_selection_interval(&mut self, a: usize, b: usize) -> Option<ListSelectionEvent> {
        self.anchor = Some(a);
        self.lead = Some(b);
        self.replace((a.min(b)..=a.max(b)).collect())
    }

    /// Add `[a, b]` to the selection.
    pub fn add_selection_interval(&mut self, a: usize, b: usize) -> Option<ListSelectionEvent> {
        self.anchor = Some(a);
        self.lead = Some(b);
        let mut selected = self.selected.clone();
        selected.extend(a.min(b)..=a.max(b));
        self.replace(selected)
    }

    /// Remove `[a, b]` from the selection.
    pub fn remove_selection_interval(
        &mut self,
        a: usize,
        b: usize,
    ) -> Option<ListSelectionEvent> {
        let range = a.min(b)..=a.max(b);
        let selected = self
            .selected
            .iter()
            .copied()
            .filter(|row| !range.contains(row))
            .collect();
        self.replace(selected)
    }

    /// Deselect every row.
    pub fn clear_selection(&mut self) -> Option<ListSelectionEvent> {
        self.anchor = None;
        self.lead = None;
        self.replace(BTreeSet::new())
    }

    fn replace(&mut self, selected: BTreeSet<usize>) -> Option<ListSelectionEvent> {
        let first = self.selected.symmetric_difference(&selected).min().copied()?;
        let last = self.selected.symmetric_difference(&selected).max().copied()?;
        self.selected = selected;
        Some(ListSelectionEvent { first, last })
    }
}

/// Paths added to and removed from the hierarchical selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSelectionEvent {
    /// Newly selected paths.
    pub added: Vec<TreePath>,
    /// Deselected paths.
    pub removed: Vec<TreePath>,
}

/// Hierarchical path selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSelectionModel {
    paths: Vec<TreePath>,
    lead: Option<TreePath>,
}

impl TreeSelectionModel {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected paths in selection order.
    pub fn selection_paths(&self) -> &[TreePath] {
        &self.paths
    }

    /// Most recently selected path.
    pub fn lead_selection_path(&self) -> Option<&TreePath> {
        self.lead.as_ref()
    }

    /// Returns `true` if `path` is selected.
    pub fn is_path_selected(&self, path: &TreePath) -> bool {
        self.paths.contains(path)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_selection_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Replace the selection with `paths`.
    pub fn set_selection_paths(&mut self, paths: Vec<TreePath>) -> Option<TreeSelectionEvent> {
        let mut unique: Vec<TreePath> = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        let removed: Vec<TreePath> = self
            .paths
            .iter()
            .filter(|path| !unique.contains(path))
            .cloned()
            .collect();
        let added: Vec<TreePath> = unique
            .iter()
            .filter(|path| !self.paths.contains(path))
            .cloned()
            .collect();
        self.lead = unique.last().cloned();
        self.paths = unique;
        (!added.is_empty() || !removed.is_empty()).then_some(TreeSelectionEvent { added, removed })
    }

    /// Add `path` to the selection and make it the lead.
    pub fn add_selection_path(&mut self, path: TreePath) -> Option<TreeSelectionEvent> {
        if self.paths.contains(&path) {
            self.lead = Some(path);
            return None;
        }
        self.lead = Some(path.clone());
        self.paths.push(path.clone());
        Some(TreeSelectionEvent {
            added: vec![path],
            removed: Vec::new(),
        })
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) -> Option<TreeSelectionEvent> {
        self.set_selection_paths(Vec::new())
    }
}

/// A change observed by bridge listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The row selection changed.
    Rows(ListSelectionEvent),
    /// The path selection changed.
    Paths(TreeSelectionEvent),
}

/// Selection listener callback type.
pub type SelectionListener = Box<dyn FnMut(&SelectionEvent)>;

/// Sets the updating flag on entry and clears it when dropped, unwinding included.
struct UpdatingGuard(Rc<Cell<bool>>);

impl UpdatingGuard {
    fn enter(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.get() {
            return None;
        }
        flag.set(true);
        Some(Self(Rc::clone(flag)))
    }
}

impl Drop for UpdatingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps the row selection and the path selection equivalent.
pub struct SelectionBridge {
    rows: ListSelectionModel,
    paths: TreeSelectionModel,
    updating: Rc<Cell<bool>>,
    ignored: usize,
    listeners: Vec<SelectionListener>,
}

impl SelectionBridge {
    /// Create a bridge with both selections empty.
    pub fn new() -> Self {
        Self {
            rows: ListSelectionModel::new(),
            paths: TreeSelectionModel::new(),
            updating: Rc::new(Cell::new(false)),
            ignored: 0,
            listeners: Vec::new(),
        }
    }

    /// The row selection.
    pub fn rows(&self) -> &ListSelectionModel {
        &self.rows
    }

    /// The path selection.
    pub fn paths(&self) -> &TreeSelectionModel {
        &self.paths
    }

    /// Lead selected path.
    pub fn lead_path(&self) -> Option<&TreePath> {
        self.paths.lead_selection_path()
    }

    /// Returns `true` while a mirror pass is running.
    pub fn is_updating(&self) -> bool {
        self.updating.get()
    }

    /// Number of change notifications ignored because a mirror pass was running.
    pub fn ignored_count(&self) -> usize {
        self.ignored
    }

    /// Register a listener for every change of either selection.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Select rows `[first, last]` only.
    pub fn set_row_selection(&mut self, first: usize, last: usize, mapper: &dyn RowMapper) {
        let event = self.rows.set_selection_interval(first, last);
        self.rows_event(event, mapper);
    }

    /// Add rows `[first, last]` to the selection.
    pub fn add_row_selection(&mut self, first: usize, last: usize, mapper: &dyn RowMapper) {
        let event = self.rows.add_selection_interval(first, last);
        self.rows_event(event, mapper);
    }

    /// Remove rows `[first, last]` from the selection.
    pub fn remove_row_selection(&mut self, first: usize, last: usize, mapper: &dyn RowMapper) {
        let event = self.rows.remove_selection_interval(first, last);
        self.rows_event(event, mapper);
    }

    /// Select `path` only.
    pub fn set_selection_path(&mut self, path: TreePath, mapper: &dyn RowMapper) {
        self.set_selection_paths(vec![path], mapper);
    }

    /// Replace the path selection.
    pub fn set_selection_paths(&mut self, paths: Vec<TreePath>, mapper: &dyn RowMapper) {
        let event = self.paths.set_selection_paths(paths);
        self.paths_event(event, mapper);
    }

    /// Deselect everything.
    pub fn clear(&mut self, mapper: &dyn RowMapper) {
        let event = self.paths.clear_selection();
        self.paths_event(event, mapper);
        let event = self.rows.clear_selection();
        self.rows_event(event, mapper);
    }

    /// Re-derive the rows of the selected paths after rows moved (expand/collapse).
    pub fn reset_row_selection(&mut self, mapper: &dyn RowMapper) {
        self.paths_changed(mapper);
    }

    /// Move selected paths hidden under the collapsed `node` onto `node` itself, then
    /// re-derive the rows.
    pub fn collapse_descendants(&mut self, node: TreeNode, mapper: &dyn RowMapper) {
        let fold = |path: &TreePath| path.ancestor_path(node).unwrap_or_else(|| path.clone());
        let mut paths: Vec<TreePath> = self.paths.selection_paths().iter().map(fold).collect();
        if let Some(lead) = self.paths.lead_selection_path().map(fold) {
            paths.retain(|path| *path != lead);
            paths.push(lead);
        }
        match self.paths.set_selection_paths(paths) {
            Some(event) => self.paths_event(Some(event), mapper),
            None => self.paths_changed(mapper),
        }
    }

    fn rows_event(&mut self, event: Option<ListSelectionEvent>, mapper: &dyn RowMapper) {
        if let Some(event) = event {
            self.emit(&SelectionEvent::Rows(event));
            self.rows_changed(mapper);
        }
    }

    fn paths_event(&mut self, event: Option<TreeSelectionEvent>, mapper: &dyn RowMapper) {
        if let Some(event) = event {
            self.emit(&SelectionEvent::Paths(event));
            self.paths_changed(mapper);
        }
    }

    /// Rebuild the path selection from the selected rows.
    fn rows_changed(&mut self, mapper: &dyn RowMapper) {
        let Some(_guard) = UpdatingGuard::enter(&self.updating) else {
            self.ignored += 1;
            return;
        };
        let event = self.paths.clear_selection();
        self.paths_event(event, mapper);
        let (Some(min), Some(max)) = (
            self.rows.min_selection_index(),
            self.rows.max_selection_index(),
        ) else {
            return;
        };
        for row in min..=max {
            if !self.rows.is_selected(row) {
                continue;
            }
            if let Some(path) = mapper.path_for_row(row) {
                let event = self.paths.add_selection_path(path);
                self.paths_event(event, mapper);
            }
        }
    }

    /// Push the rows of the selected paths into the row selection.
    fn paths_changed(&mut self, mapper: &dyn RowMapper) {
        let Some(_guard) = UpdatingGuard::enter(&self.updating) else {
            self.ignored += 1;
            return;
        };
        let rows: Vec<usize> = self
            .paths
            .selection_paths()
            .iter()
            .filter_map(|path| mapper.row_for_path(path))
            .collect();
        let event = self.rows.clear_selection();
        self.rows_event(event, mapper);
        for row in rows {
            let event = self.rows.add_selection_interval(row, row);
            self.rows_event(event, mapper);
        }
    }

    fn emit(&mut self, event: &SelectionEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl Default for SelectionBridge {
    fn default() -> Self {
        Self::new()
    }
}
