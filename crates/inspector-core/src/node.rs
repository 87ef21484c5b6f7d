//! Parse-tree data model
//!
//! Two arenas hold the trees the inspector shows:
//!
//! - [`ParseTree`]: the primary tree produced by the source parser. Children are stored as a
//!   first-child / next-sibling chain.
//! - [`DocTree`]: a secondary tree parsed from one doc comment. Children are stored as an
//!   array.
//!
//! Both carry the [`Vocabulary`] their type tags belong to. Parent links are plain ids, so
//! nothing owns its parent. [`TreeNode`] is the handle the tree-table model hands out.

use inspector_lang::{TokenType, Vocabulary};
use std::sync::Arc;

/// Type name used when a tag is missing from its vocabulary.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Id of a node in a [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Id of a node in a [`DocTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocNodeId(u32);

impl DocNodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The renderable fields every node carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Type tag in the owning tree's vocabulary.
    pub kind: TokenType,
    /// 1-based line.
    pub line: usize,
    /// 0-based column, in characters.
    pub column: usize,
    /// Literal text; may be empty.
    pub text: String,
}

impl NodeData {
    /// Create node data.
    pub fn new(kind: TokenType, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            column,
            text: text.into(),
        }
    }
}

/// Which comments the parser keeps and whether doc comments get their own subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseMode {
    /// Comments are dropped.
    Plain,
    /// Comments are kept as nodes.
    WithComments,
    /// Comments are kept and doc comments expand into a parsed doc tree.
    #[default]
    WithCommentsAndDocs,
}

impl ParseMode {
    /// Every mode, in menu order.
    pub const ALL: [ParseMode; 3] = [
        ParseMode::Plain,
        ParseMode::WithComments,
        ParseMode::WithCommentsAndDocs,
    ];

    /// Returns `true` if comment nodes are kept.
    pub fn keeps_comments(self) -> bool {
        !matches!(self, ParseMode::Plain)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ParseMode::Plain => "Plain Java",
            ParseMode::WithComments => "Java with comments",
            ParseMode::WithCommentsAndDocs => "Java with comments and Javadocs",
        }
    }

    /// The mode after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ParseMode::Plain => ParseMode::WithComments,
            ParseMode::WithComments => ParseMode::WithCommentsAndDocs,
            ParseMode::WithCommentsAndDocs => ParseMode::Plain,
        }
    }
}

/// Handle of a node shown by the tree-table.
///
/// `Root` is the synthetic sentinel that is always present, so "nothing loaded" still has a
/// root. `Doc` nodes are identified by the comment they were parsed from plus their id in that
/// comment's doc tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeNode {
    /// Sentinel root.
    Root,
    /// Node of the installed [`ParseTree`].
    Ast(NodeId),
    /// Node of a grafted [`DocTree`].
    Doc {
        /// The block comment whose doc tree holds the node.
        comment: NodeId,
        /// Node id inside that doc tree.
        node: DocNodeId,
    },
}

/// Node of a [`ParseTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    child_count: usize,
}

impl AstNode {
    /// Renderable fields.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Parent id; `None` for the tree root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// First child id.
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    /// Last child id.
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    /// Next sibling id.
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.child_count
    }
}

/// Primary parse tree. Immutable once built.
#[derive(Debug, Clone)]
pub struct ParseTree {
    vocabulary: Arc<Vocabulary>,
    nodes: Vec<AstNode>,
}

impl ParseTree {
    /// Root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Vocabulary of the type tags.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    /// Renderable fields of a node.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(AstNode::data)
    }

    /// Display name of a node's type.
    pub fn type_name(&self, id: NodeId) -> &str {
        self.data(id)
            .and_then(|data| self.vocabulary.name(data.kind))
            .unwrap_or(UNKNOWN_TYPE)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(AstNode::parent)
    }

    /// Number of children of a node.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, AstNode::child_count)
    }

    /// Child at `index`, found by walking the sibling chain.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(AstNode::last_child)
    }

    /// Children of a node in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).and_then(AstNode::first_child),
        }
    }

    /// All node ids in depth-first preorder.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Ids from the root down to `id`, both included.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }
}

/// Iterator over the children of a [`ParseTree`] node.
pub struct Children<'a> {
    tree: &'a ParseTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(AstNode::next_sibling);
        Some(current)
    }
}

/// Depth-first preorder iterator over a [`ParseTree`].
pub struct Preorder<'a> {
    tree: &'a ParseTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        let first = self.stack.len();
        self.stack.extend(self.tree.children(current));
        self.stack[first..].reverse();
        Some(current)
    }
}

/// Builder for [`ParseTree`]. Children are appended in source order.
#[derive(Debug)]
pub struct ParseTreeBuilder {
    vocabulary: Arc<Vocabulary>,
    nodes: Vec<AstNode>,
}

impl ParseTreeBuilder {
    /// Start a tree with its root node.
    pub fn new(vocabulary: Arc<Vocabulary>, root: NodeData) -> Self {
        Self {
            vocabulary,
            nodes: vec![AstNode {
                data: root,
                parent: None,
                first_child: None,
                last_child: None,
                next_sibling: None,
                child_count: 0,
            }],
        }
    }

    /// Root id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `data` as the last child of `parent`.
    ///
    /// An unknown `parent` attaches the node to the root.
    pub fn child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let parent = if parent.index() < self.nodes.len() {
            parent
        } else {
            self.root()
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode {
            data,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            next_sibling: None,
            child_count: 0,
        });
        let previous = self.nodes[parent.index()].last_child;
        match previous {
            Some(previous) => self.nodes[previous.index()].next_sibling = Some(id),
            None => self.nodes[parent.index()].first_child = Some(id),
        }
        let parent_node = &mut self.nodes[parent.index()];
        parent_node.last_child = Some(id);
        parent_node.child_count += 1;
        id
    }

    /// Finish the tree.
    pub fn finish(self) -> ParseTree {
        ParseTree {
            vocabulary: self.vocabulary,
            nodes: self.nodes,
        }
    }
}

/// Node of a [`DocTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocNode {
    data: NodeData,
    parent: Option<DocNodeId>,
    children: Vec<DocNodeId>,
}

impl DocNode {
    /// Renderable fields.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Parent id; `None` for the doc root.
    pub fn parent(&self) -> Option<DocNodeId> {
        self.parent
    }

    /// Children in order.
    pub fn children(&self) -> &[DocNodeId] {
        &self.children
    }
}

/// Secondary tree parsed from one doc comment.
#[derive(Debug, Clone)]
pub struct DocTree {
    vocabulary: Arc<Vocabulary>,
    nodes: Vec<DocNode>,
}

impl DocTree {
    /// Root node id.
    pub fn root(&self) -> DocNodeId {
        DocNodeId(0)
    }

    /// Vocabulary of the type tags.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A doc tree always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Node by id.
    pub fn get(&self, id: DocNodeId) -> Option<&DocNode> {
        self.nodes.get(id.index())
    }

    /// Renderable fields of a node.
    pub fn data(&self, id: DocNodeId) -> Option<&NodeData> {
        self.get(id).map(DocNode::data)
    }

    /// Display name of a node's type.
    pub fn type_name(&self, id: DocNodeId) -> &str {
        self.data(id)
            .and_then(|data| self.vocabulary.name(data.kind))
            .unwrap_or(UNKNOWN_TYPE)
    }

    /// Children of a node.
    pub fn children(&self, id: DocNodeId) -> &[DocNodeId] {
        self.get(id).map(DocNode::children).unwrap_or(&[])
    }

    /// Parent of a node.
    pub fn parent(&self, id: DocNodeId) -> Option<DocNodeId> {
        self.get(id).and_then(DocNode::parent)
    }
}

/// Builder for [`DocTree`].
#[derive(Debug)]
pub struct DocTreeBuilder {
    vocabulary: Arc<Vocabulary>,
    nodes: Vec<DocNode>,
}

impl DocTreeBuilder {
    /// Start a doc tree with its root node.
    pub fn new(vocabulary: Arc<Vocabulary>, root: NodeData) -> Self {
        Self {
            vocabulary,
            nodes: vec![DocNode {
                data: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Root id.
    pub fn root(&self) -> DocNodeId {
        DocNodeId(0)
    }

    /// Append `data` as the last child of `parent`.
    ///
    /// An unknown `parent` attaches the node to the root.
    pub fn child(&mut self, parent: DocNodeId, data: NodeData) -> DocNodeId {
        let parent = if parent.index() < self.nodes.len() {
            parent
        } else {
            self.root()
        };
        let id = DocNodeId(self.nodes.len() as u32);
        self.nodes.push(DocNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Finish the tree.
    pub fn finish(self) -> DocTree {
        DocTree {
            vocabulary: self.vocabulary,
            nodes: self.nodes,
        }
    }
}
