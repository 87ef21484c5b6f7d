use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use inspector_core::{
    LineOffsetTable, LocatorGenerator, NodeData, Outline, ParseTree, ParseTreeBuilder,
    ParseTreeModel, PathLocator, TreeNode,
};
use inspector_lang::Vocabulary;
use std::sync::Arc;

/// A class with `methods` methods of `statements` statements each.
fn wide_tree(methods: usize, statements: usize) -> ParseTree {
    let vocabulary = Arc::new(Vocabulary::from_names([
        "EOF",
        "CLASS_DEF",
        "METHOD_DEF",
        "SLIST",
        "EXPR",
        "IDENT",
    ]));
    let mut builder = ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, "CLASS_DEF"));
    let root = builder.root();
    let mut line = 2;
    for m in 0..methods {
        let method = builder.child(root, NodeData::new(2, line, 4, "METHOD_DEF"));
        builder.child(method, NodeData::new(5, line, 9, format!("m{m}")));
        let body = builder.child(method, NodeData::new(3, line, 14, "SLIST"));
        for s in 0..statements {
            line += 1;
            let expr = builder.child(body, NodeData::new(4, line, 8, "EXPR"));
            builder.child(expr, NodeData::new(5, line, 8, format!("v{s}")));
        }
        line += 1;
    }
    builder.finish()
}

fn expanded_outline(model: &ParseTreeModel) -> Outline {
    let mut outline = Outline::new(2);
    outline.structure_changed(model);
    let mut stack = vec![TreeNode::Root];
    let mut nodes = Vec::new();
    while let Some(node) = stack.pop() {
        nodes.push(node);
        stack.extend((0..model.child_count(node)).filter_map(|i| model.child_at(node, i)));
    }
    outline.expand_all(&nodes, model);
    outline
}

fn bench_flatten_fully_expanded(c: &mut Criterion) {
    let mut model = ParseTreeModel::new();
    model.set_root(Some(wide_tree(500, 40)));
    c.bench_function("outline/expand_all_40k_nodes", |b| {
        b.iter(|| {
            let outline = expanded_outline(black_box(&model));
            black_box(outline.row_count());
        })
    });
}

fn bench_toggle_near_top(c: &mut Criterion) {
    let mut model = ParseTreeModel::new();
    model.set_root(Some(wide_tree(500, 40)));
    let outline = expanded_outline(&model);
    let method = outline.row(2).map(|row| row.node).unwrap();
    c.bench_function("outline/toggle_first_method", |b| {
        b.iter_batched(
            || outline.clone(),
            |mut outline| {
                outline.collapse(method, &model);
                outline.expand(method, &model);
                black_box(outline.row_for_path(&outline.path_for_row(2).unwrap()));
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_locator_search(c: &mut Criterion) {
    let tree = wide_tree(200, 20);
    let target = tree.preorder().last().unwrap();
    let query = PathLocator.locator_of(&tree, target).unwrap();
    c.bench_function("locator/find_last_of_8k_nodes", |b| {
        b.iter(|| {
            let found = tree
                .preorder()
                .find(|&id| PathLocator.locator_of(&tree, id).as_deref() == Some(query.as_str()));
            black_box(found);
        })
    });
}

fn bench_line_offsets(c: &mut Criterion) {
    let lines: Vec<String> = (0..50_000)
        .map(|i| format!("    int field{i} = {i}; // line {i}"))
        .collect();
    c.bench_function("line_offsets/build_50k_lines", |b| {
        b.iter(|| black_box(LineOffsetTable::build(black_box(&lines)).line_count()))
    });
}

criterion_group!(
    benches,
    bench_flatten_fully_expanded,
    bench_toggle_near_top,
    bench_locator_search,
    bench_line_offsets
);
criterion_main!(benches);
