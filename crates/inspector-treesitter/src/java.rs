use crate::javadoc::JavadocParser;
use inspector_core::{
    DocCommentParser, NodeData, NodeId, ParseMode, ParseTree, ParseTreeBuilder, SourceParser,
    split_lines,
};
use inspector_lang::{
    CommentConfig, EOF, SYNTHETIC_COMMENT_TOKENS, TokenType, Vocabulary, java_comments,
    token_display_name,
};
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Point};

/// Grammar kinds that hold comments.
const COMMENT_KINDS: [&str; 3] = ["block_comment", "line_comment", "comment"];

/// Errors produced by [`JavaParser`].
#[derive(Debug, Error)]
pub enum JavaParseError {
    #[error("tree-sitter language error: {0}")]
    /// Setting the tree-sitter language failed.
    Language(String),

    #[error("parser produced no tree")]
    /// Tree-sitter gave up without a tree.
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    /// The source does not parse cleanly. Position of the first error, 1-based line.
    Syntax {
        /// Line of the first error.
        line: usize,
        /// Character column of the first error.
        column: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct CommentTags {
    begin: TokenType,
    end: TokenType,
    single: TokenType,
    content: TokenType,
}

/// Java parser backed by `tree-sitter-java`.
///
/// Node types are the grammar's kinds renamed for display (`class_declaration` becomes
/// `CLASS_DECLARATION`, `{` becomes `LCURLY`). Comments are restructured into
/// `BLOCK_COMMENT_BEGIN` / `SINGLE_LINE_COMMENT` nodes with a `COMMENT_CONTENT` child when the
/// parse mode keeps them, and dropped otherwise.
pub struct JavaParser {
    parser: Parser,
    vocabulary: Arc<Vocabulary>,
    comments: CommentConfig,
    tags: CommentTags,
    doc_parser: Rc<JavadocParser>,
}

impl JavaParser {
    /// Create a parser for the bundled Java grammar.
    pub fn new() -> Result<Self, JavaParseError> {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| JavaParseError::Language(e.to_string()))?;

        let mut vocabulary = grammar_vocabulary(&language);
        let [begin, end, single, content] =
            SYNTHETIC_COMMENT_TOKENS.map(|name| vocabulary.push(name));

        Ok(Self {
            parser,
            vocabulary: Arc::new(vocabulary),
            comments: java_comments(),
            tags: CommentTags {
                begin,
                end,
                single,
                content,
            },
            doc_parser: Rc::new(JavadocParser::new()),
        })
    }

    /// The grammar vocabulary plus the synthetic comment tokens.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Parse a whole source text.
    pub fn parse_text(&mut self, text: &str, mode: ParseMode) -> Result<ParseTree, JavaParseError> {
        self.parse(&split_lines(text), mode)
    }

    fn build(&self, root: Node<'_>, source: &str, lines: &[String], mode: ParseMode) -> ParseTree {
        let mut builder =
            ParseTreeBuilder::new(self.vocabulary.clone(), self.node_data(root, source, lines));
        let mut stack = Vec::new();
        push_children(&mut stack, root, builder.root());
        while let Some((node, parent)) = stack.pop() {
            if COMMENT_KINDS.contains(&node.kind()) {
                if mode.keeps_comments() {
                    self.add_comment(&mut builder, parent, node, source, lines);
                }
                continue;
            }
            let id = builder.child(parent, self.node_data(node, source, lines));
            push_children(&mut stack, node, id);
        }
        builder.finish()
    }

    fn node_data(&self, node: Node<'_>, source: &str, lines: &[String]) -> NodeData {
        let kind = TokenType::from(node.kind_id());
        let (line, column) = position(lines, node.start_position());
        let text = if node.child_count() == 0 {
            source.get(node.byte_range()).unwrap_or_default()
        } else {
            self.vocabulary.name(kind).unwrap_or(EOF)
        };
        NodeData::new(kind, line, column, text)
    }

    fn add_comment(
        &self,
        builder: &mut ParseTreeBuilder,
        parent: NodeId,
        node: Node<'_>,
        source: &str,
        lines: &[String],
    ) {
        let raw = source.get(node.byte_range()).unwrap_or_default();
        let (line, column) = position(lines, node.start_position());
        if let (Some(content), Some(start), Some(end)) = (
            self.comments.block_content(raw),
            self.comments.block_start.as_deref(),
            self.comments.block_end.as_deref(),
        ) {
            let begin = builder.child(parent, NodeData::new(self.tags.begin, line, column, start));
            let content_column = column + start.chars().count();
            builder.child(
                begin,
                NodeData::new(self.tags.content, line, content_column, content),
            );
            let (end_line, end_column) = position(lines, node.end_position());
            let end_column = end_column.saturating_sub(end.chars().count());
            builder.child(begin, NodeData::new(self.tags.end, end_line, end_column, end));
        } else if let (Some(content), Some(start)) = (
            self.comments.line_content(raw),
            self.comments.line.as_deref(),
        ) {
            let single = builder.child(parent, NodeData::new(self.tags.single, line, column, start));
            let content_column = column + start.chars().count();
            builder.child(
                single,
                NodeData::new(self.tags.content, line, content_column, content),
            );
        }
    }
}

impl SourceParser for JavaParser {
    type Error = JavaParseError;

    fn parse(&mut self, lines: &[String], mode: ParseMode) -> Result<ParseTree, JavaParseError> {
        let source = lines.join("\n");
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or(JavaParseError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            let error = first_error(root).unwrap_or(root);
            let (line, column) = position(lines, error.start_position());
            return Err(JavaParseError::Syntax { line, column });
        }
        let parsed = self.build(root, &source, lines, mode);
        tracing::debug!(nodes = parsed.len(), mode = mode.label(), "parsed java source");
        Ok(parsed)
    }

    fn doc_parser(&self) -> Option<Rc<dyn DocCommentParser>> {
        Some(self.doc_parser.clone())
    }
}

/// One display name per grammar kind, tag = kind id. Kind 0 is end of input.
fn grammar_vocabulary(language: &Language) -> Vocabulary {
    let mut vocabulary = Vocabulary::new();
    vocabulary.push(EOF);
    for id in 1..language.node_kind_count() {
        let Ok(id) = u16::try_from(id) else {
            break;
        };
        let kind = language.node_kind_for_id(id).unwrap_or_default();
        let named = language.node_kind_is_named(id);
        vocabulary.push(token_display_name(kind, named, TokenType::from(id)));
    }
    vocabulary
}

fn push_children<'t>(stack: &mut Vec<(Node<'t>, NodeId)>, node: Node<'t>, id: NodeId) {
    let mut cursor = node.walk();
    let first = stack.len();
    stack.extend(node.children(&mut cursor).map(|child| (child, id)));
    stack[first..].reverse();
}

/// First `ERROR` or missing node in document order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let first = stack.len();
        stack.extend(node.children(&mut cursor).filter(|child| child.has_error()));
        stack[first..].reverse();
    }
    None
}

/// 1-based line and character column of a tree-sitter point.
fn position(lines: &[String], point: Point) -> (usize, usize) {
    let column = lines.get(point.row).map_or(point.column, |line| {
        line.char_indices()
            .take_while(|&(byte, _)| byte < point.column)
            .count()
    });
    (point.row + 1, column)
}
