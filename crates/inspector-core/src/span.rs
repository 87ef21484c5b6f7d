//! Selection span resolution
//!
//! Maps a node to the half-open character range it covers in the source text. The range starts
//! at the node's own position and ends where its rightmost descendant ends.

use crate::line_offsets::LineOffsetTable;
use crate::node::{DocNodeId, DocTree, NodeData, NodeId, ParseTree};

/// Half-open character range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First character.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A tree the resolver can walk without any grafting.
pub trait SpanTree {
    /// Node id type.
    type Id: Copy;

    /// Renderable fields of a node.
    fn data(&self, id: Self::Id) -> Option<&NodeData>;

    /// Display name of a node's type.
    fn type_name(&self, id: Self::Id) -> &str;

    /// Rightmost child of a node.
    fn last_child(&self, id: Self::Id) -> Option<Self::Id>;
}

impl SpanTree for ParseTree {
    type Id = NodeId;

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        ParseTree::data(self, id)
    }

    fn type_name(&self, id: NodeId) -> &str {
        ParseTree::type_name(self, id)
    }

    fn last_child(&self, id: NodeId) -> Option<NodeId> {
        ParseTree::last_child(self, id)
    }
}

impl SpanTree for DocTree {
    type Id = DocNodeId;

    fn data(&self, id: DocNodeId) -> Option<&NodeData> {
        DocTree::data(self, id)
    }

    fn type_name(&self, id: DocNodeId) -> &str {
        DocTree::type_name(self, id)
    }

    fn last_child(&self, id: DocNodeId) -> Option<DocNodeId> {
        self.children(id).last().copied()
    }
}

/// Resolve the span of `id`.
///
/// Returns `None` if the node is unknown or its line is outside `table`.
pub fn resolve_span<T: SpanTree>(tree: &T, id: T::Id, table: &LineOffsetTable) -> Option<Span> {
    let data = tree.data(id)?;
    let start = table.offset_of(data.line, data.column)?;
    let end = end_position(tree, id, table)?;
    Some(Span { start, end })
}

/// End offset of the rightmost descendant of `id`.
///
/// A leaf whose text is exactly its type name carries no source text of its own and ends where
/// it starts.
pub fn end_position<T: SpanTree>(tree: &T, id: T::Id, table: &LineOffsetTable) -> Option<usize> {
    let mut current = id;
    while let Some(child) = tree.last_child(current) {
        current = child;
    }
    let data = tree.data(current)?;
    let start = table.offset_of(data.line, data.column)?;
    if data.text == tree.type_name(current) {
        Some(start)
    } else {
        Some(start + data.text.chars().count())
    }
}
