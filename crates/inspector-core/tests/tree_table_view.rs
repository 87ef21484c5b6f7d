mod common;

use common::{CLASS_A, class_a_tree};
use inspector_core::{
    CellValue, Column, EditTrigger, InspectorError, KeyStroke, LineOffsetTable, MouseEvent,
    ParseTreeModel, SearchOutcome, Span, TableEvent, TreeNode, TreeTableConfig, TreeTableView,
    split_lines,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const VAR_X: &str =
    "/CLASS_DEF[./IDENT[@text='A']]/OBJBLOCK[./VARIABLE_DEF[@text='x']]/VARIABLE_DEF[@text='x']";

fn loaded_view() -> TreeTableView {
    let mut view = TreeTableView::new(ParseTreeModel::new(), TreeTableConfig::default());
    view.set_root(
        Some(class_a_tree()),
        LineOffsetTable::build(&split_lines(CLASS_A)),
    );
    view.process_idle();
    view
}

fn type_column_x(view: &TreeTableView) -> u16 {
    view.layout().left(Column::Type) + 1
}

#[test]
fn test_fresh_load_shows_root_only() {
    let view = loaded_view();
    assert_eq!(view.row_count(), 1);
    assert_eq!(view.node_at_row(0), Some(TreeNode::Root));
    assert!(!view.has_pending_refresh());
    assert_eq!(
        view.value_at(0, 4).unwrap(),
        CellValue::Text("ROOT".to_string())
    );
}

#[test]
fn test_row_count_updates_on_idle_tick() {
    let mut view = loaded_view();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    view.subscribe_table(move |event| sink.borrow_mut().push(*event));

    view.expand_node(TreeNode::Root);
    assert!(view.has_pending_refresh());
    assert_eq!(view.row_count(), 1);
    assert_eq!(view.outline().row_count(), 2);

    assert_eq!(view.process_idle(), 1);
    assert_eq!(view.row_count(), 2);
    assert_eq!(*events.borrow(), vec![TableEvent::DataChanged { row_count: 2 }]);
    assert_eq!(view.process_idle(), 0);
}

#[test]
fn test_refresh_requests_coalesce() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    let class_def = view.outline().row(1).unwrap().node;
    view.expand_node(class_def);
    view.set_root(Some(class_a_tree()), view.line_offsets().clone());
    assert_eq!(view.process_idle(), 1);
    assert_eq!(view.row_count(), 1);
}

#[test]
fn test_row_count_matches_expanded_reachable_nodes() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    let class_def = view.outline().row(1).unwrap().node;
    view.expand_node(class_def);
    view.process_idle();
    // root, CLASS_DEF, IDENT, OBJBLOCK
    assert_eq!(view.row_count(), 4);

    let block = view.outline().row(3).unwrap().node;
    view.expand_node(block);
    view.collapse_node(class_def);
    view.process_idle();
    assert_eq!(view.row_count(), 2);
}

#[test]
fn test_value_at_out_of_range() {
    let view = loaded_view();
    assert!(matches!(
        view.value_at(3, 1),
        Err(InspectorError::RowOutOfRange(3))
    ));
    assert!(matches!(
        view.value_at(0, 9),
        Err(InspectorError::UnknownColumn(9))
    ));
}

#[test]
fn test_row_heights_stay_in_sync() {
    let mut view = TreeTableView::new(
        ParseTreeModel::new(),
        TreeTableConfig::default().with_row_height(2),
    );
    assert_eq!(view.row_height(), 2);
    assert_eq!(view.outline_row_height(), 2);
    view.set_outline_row_height(4);
    assert_eq!(view.row_height(), 4);
    view.set_row_height(1);
    assert_eq!(view.outline_row_height(), 1);
}

#[test]
fn test_tree_column_click_reaches_outline() {
    let mut view = loaded_view();
    assert!(!view.edit_cell_at(0, 0, EditTrigger::Mouse(MouseEvent::click(0, 0))));
    view.process_idle();
    assert_eq!(view.row_count(), 2);

    // Label of row 1 (CLASS_DEF, depth 1): past its glyph.
    view.click(MouseEvent::click(6, 1));
    assert_eq!(view.selected_row(), Some(1));
    assert_eq!(view.row_count(), 2);
}

#[test]
fn test_other_columns_reject_edits_without_side_effects() {
    let mut view = loaded_view();
    let x = type_column_x(&view);
    assert!(!view.edit_cell_at(0, 1, EditTrigger::Mouse(MouseEvent::click(x, 0))));
    assert!(!view.has_pending_refresh());
    assert_eq!(view.selected_row(), None);
}

#[test]
fn test_expand_action_keeps_selection_and_shows_locator() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    view.process_idle();
    view.select_row(1);

    assert!(view.handle_key(KeyStroke::Enter));
    view.process_idle();
    assert_eq!(view.row_count(), 4);
    assert_eq!(view.selected_row(), Some(1));
    assert_eq!(view.locator_panel(), "/CLASS_DEF[./IDENT[@text='A']]");
    // CLASS_DEF runs from the start of line 1 to the end of `x` on line 2.
    assert_eq!(view.current_selection_span(), Some(Span::new(0, 17)));

    assert!(view.handle_key(KeyStroke::Enter));
    view.process_idle();
    assert_eq!(view.row_count(), 2);
    assert_eq!(view.selected_row(), Some(1));
}

#[test]
fn test_double_click_runs_expand_action() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    view.process_idle();
    let x = type_column_x(&view);
    view.click(MouseEvent::double_click(x, 1));
    view.process_idle();
    assert_eq!(view.selected_row(), Some(1));
    assert_eq!(view.row_count(), 4);
}

#[test]
fn test_keyboard_navigation() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    view.process_idle();
    assert!(view.handle_key(KeyStroke::Down));
    assert_eq!(view.selected_row(), Some(0));
    view.handle_key(KeyStroke::Down);
    assert_eq!(view.selected_row(), Some(1));
    view.handle_key(KeyStroke::Right);
    view.process_idle();
    assert_eq!(view.row_count(), 4);
    view.handle_key(KeyStroke::End);
    assert_eq!(view.selected_row(), Some(3));
    view.handle_key(KeyStroke::Left);
    assert_eq!(view.selected_row(), Some(1));
    view.handle_key(KeyStroke::Left);
    view.process_idle();
    assert_eq!(view.row_count(), 2);
    view.handle_key(KeyStroke::Up);
    assert_eq!(view.selected_row(), Some(0));
}

#[test]
fn test_search_expands_and_selects_match() {
    let mut view = loaded_view();
    assert_eq!(view.search_by_locator(VAR_X), SearchOutcome::Found);
    view.process_idle();
    assert_eq!(view.row_count(), 6);
    assert_eq!(view.selected_row(), Some(4));
    // The var-def `x` sits at line 2, column 2.
    let start = view.line_offsets().offset_of(2, 2).unwrap();
    assert_eq!(view.current_selection_span(), Some(Span::new(start, start + 1)));
    assert_eq!(start, 12);
    assert_eq!(view.locator_panel(), VAR_X);
}

#[test]
fn test_search_hit_replaces_panel_text() {
    let mut view = loaded_view();
    assert_eq!(view.search_by_locator("/NOPE"), SearchOutcome::NotFound);
    assert_eq!(view.search_by_locator(VAR_X), SearchOutcome::Found);
    assert_eq!(view.locator_panel(), VAR_X);
}

#[test]
fn test_collapsing_ancestor_moves_selection_to_it() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    let class_def = view.outline().row(1).unwrap().node;
    view.expand_node(class_def);
    view.process_idle();
    view.select_row(3);
    let block = view.selected_node().unwrap();

    // Glyph of CLASS_DEF (depth 1, indent 2).
    view.click(MouseEvent::click(2, 1));
    view.process_idle();
    assert_eq!(view.row_count(), 2);
    assert_eq!(view.selected_row(), Some(1));
    assert_eq!(view.selected_node(), Some(class_def));
    assert_eq!(view.selection().rows().selected_rows().collect::<Vec<_>>(), vec![1]);
    assert_eq!(view.current_selection_span(), Some(Span::new(0, 17)));

    assert!(view.handle_key(KeyStroke::Enter));
    view.process_idle();
    assert_eq!(view.row_count(), 4);
    assert!(view.outline().is_expanded(class_def));
    assert!(!view.outline().is_expanded(block));
}

#[test]
fn test_double_click_on_glyph_toggles_once() {
    let mut view = loaded_view();
    view.expand_node(TreeNode::Root);
    view.process_idle();
    let class_def = view.outline().row(1).unwrap().node;

    view.click(MouseEvent::click(2, 1));
    view.click(MouseEvent::double_click(2, 1));
    view.process_idle();
    assert!(view.outline().is_expanded(class_def));
    assert_eq!(view.row_count(), 4);
}

#[test]
fn test_search_miss_leaves_outline_alone() {
    let mut view = loaded_view();
    view.set_locator_panel("previous");
    assert_eq!(view.search_by_locator("/NOPE"), SearchOutcome::NotFound);
    assert_eq!(
        view.locator_panel(),
        "previous\nNo node matching locator '/NOPE' found."
    );
    assert!(!view.has_pending_refresh());
    assert_eq!(view.outline().row_count(), 1);
}

#[test]
fn test_reload_clears_selection() {
    let mut view = loaded_view();
    view.search_by_locator(VAR_X);
    assert!(view.current_selection_span().is_some());
    view.set_root(Some(class_a_tree()), view.line_offsets().clone());
    assert_eq!(view.selected_row(), None);
    assert_eq!(view.current_selection_span(), None);
    assert!(view.selection().rows().is_selection_empty());
}
