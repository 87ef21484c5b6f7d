mod common;

use common::class_a_tree;
use inspector_core::{Outline, ParseTreeModel, SelectionBridge, TreeNode, TreePath};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fully expanded outline over the `class A` fixture: six visible rows.
fn expanded() -> (ParseTreeModel, Outline) {
    let mut model = ParseTreeModel::new();
    model.set_root(Some(class_a_tree()));
    let mut outline = Outline::new(2);
    outline.structure_changed(&model);
    let class_def = model.child_at(TreeNode::Root, 0).unwrap();
    let block = model.child_at(class_def, 1).unwrap();
    outline.expand_all(&[TreeNode::Root, class_def, block], &model);
    (model, outline)
}

#[test]
fn test_gap_in_row_range_is_skipped() {
    let (_model, outline) = expanded();
    assert_eq!(outline.row_count(), 6);

    let mut bridge = SelectionBridge::new();
    bridge.set_row_selection(2, 4, &outline);
    bridge.remove_row_selection(3, 3, &outline);

    let expected = vec![
        outline.path_for_row(2).unwrap(),
        outline.path_for_row(4).unwrap(),
    ];
    assert_eq!(bridge.paths().selection_paths(), expected.as_slice());
    assert_eq!(bridge.rows().selected_rows().collect::<Vec<_>>(), vec![2, 4]);
}

#[test]
fn test_path_selection_selects_its_row() {
    let (model, outline) = expanded();
    let class_def = model.child_at(TreeNode::Root, 0).unwrap();
    let ident = model.child_at(class_def, 0).unwrap();
    let path = TreePath::root().child(class_def).child(ident);

    let mut bridge = SelectionBridge::new();
    bridge.set_selection_path(path.clone(), &outline);
    assert_eq!(bridge.rows().selected_rows().collect::<Vec<_>>(), vec![2]);
    assert_eq!(bridge.lead_path(), Some(&path));
}

#[test]
fn test_rows_follow_paths_after_collapse() {
    let (model, mut outline) = expanded();
    let mut bridge = SelectionBridge::new();
    bridge.set_row_selection(1, 1, &outline);

    let class_def = model.child_at(TreeNode::Root, 0).unwrap();
    let block = model.child_at(class_def, 1).unwrap();
    outline.collapse(block, &model);
    bridge.reset_row_selection(&outline);
    assert_eq!(bridge.rows().selected_rows().collect::<Vec<_>>(), vec![1]);

    // Row 3 is OBJBLOCK; collapsing the root hides it and moves the selection to the root.
    bridge.set_row_selection(3, 3, &outline);
    outline.collapse(TreeNode::Root, &model);
    bridge.collapse_descendants(TreeNode::Root, &outline);
    assert_eq!(bridge.rows().selected_rows().collect::<Vec<_>>(), vec![0]);
    assert_eq!(bridge.paths().selection_paths(), &[TreePath::root()]);
    assert_eq!(bridge.lead_path(), Some(&TreePath::root()));
}

#[test]
fn test_collapse_keeps_unrelated_paths() {
    let (model, mut outline) = expanded();
    let mut bridge = SelectionBridge::new();
    // IDENT `A` and VARIABLE_DEF `x`.
    bridge.set_row_selection(2, 2, &outline);
    bridge.add_row_selection(4, 4, &outline);

    let class_def = model.child_at(TreeNode::Root, 0).unwrap();
    let block = model.child_at(class_def, 1).unwrap();
    outline.collapse(block, &model);
    bridge.collapse_descendants(block, &outline);

    assert_eq!(bridge.rows().selected_rows().collect::<Vec<_>>(), vec![2, 3]);
    let block_path = TreePath::root().child(class_def).child(block);
    assert_eq!(bridge.lead_path(), Some(&block_path));
    assert!(!bridge.is_updating());
}

#[test]
fn test_no_stuck_guard_after_random_events() {
    let (_model, outline) = expanded();
    let rows = outline.row_count();
    let mut rng = StdRng::seed_from_u64(0x5e1e_c7ed);
    let mut bridge = SelectionBridge::new();

    for step in 0..500 {
        let a = rng.gen_range(0..rows);
        let b = rng.gen_range(0..rows);
        match rng.gen_range(0..5) {
            0 => bridge.set_row_selection(a, b, &outline),
            1 => bridge.add_row_selection(a, b, &outline),
            2 => bridge.remove_row_selection(a, b, &outline),
            3 => {
                if let Some(path) = outline.path_for_row(a) {
                    bridge.set_selection_path(path, &outline);
                }
            }
            _ => bridge.clear(&outline),
        }
        assert!(!bridge.is_updating(), "guard stuck after step {step}");

        let mirrored: Vec<usize> = bridge
            .paths()
            .selection_paths()
            .iter()
            .filter_map(|path| outline.row_for_path(path))
            .collect();
        let mut mirrored_sorted = mirrored.clone();
        mirrored_sorted.sort_unstable();
        assert_eq!(
            bridge.rows().selected_rows().collect::<Vec<_>>(),
            mirrored_sorted,
            "selections diverged after step {step}"
        );
    }
}
