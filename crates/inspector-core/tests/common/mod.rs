#![allow(dead_code)]

use inspector_core::{
    DocCommentParser, DocTree, DocTreeBuilder, NodeData, NodeId, ParseMode, ParseTree,
    ParseTreeBuilder, SourceParser,
};
use inspector_lang::{JavadocToken, Vocabulary, javadoc_vocabulary};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

pub const CLASS_A: &str = "class A {\n  int x;\n}\n";
pub const DOCUMENTED: &str = "/** Doc. */\nclass A {}\n";

fn vocabulary() -> Arc<Vocabulary> {
    Arc::new(Vocabulary::from_names([
        "EOF",
        "CLASS_DEF",
        "IDENT",
        "OBJBLOCK",
        "VARIABLE_DEF",
        "LCURLY",
        "RCURLY",
        "BLOCK_COMMENT_BEGIN",
        "COMMENT_CONTENT",
        "BLOCK_COMMENT_END",
    ]))
}

fn tag(vocabulary: &Vocabulary, name: &str) -> u32 {
    vocabulary.tag(name).unwrap()
}

/// `class A {\n  int x;\n}`: class-def, identifier `A`, block, var-def `x`, identifier `x`.
pub fn class_a_tree() -> ParseTree {
    let vocabulary = vocabulary();
    let v = vocabulary.clone();
    let mut builder =
        ParseTreeBuilder::new(vocabulary, NodeData::new(tag(&v, "CLASS_DEF"), 1, 0, "CLASS_DEF"));
    let root = builder.root();
    builder.child(root, NodeData::new(tag(&v, "IDENT"), 1, 6, "A"));
    let block = builder.child(root, NodeData::new(tag(&v, "OBJBLOCK"), 1, 8, "OBJBLOCK"));
    builder.child(block, NodeData::new(tag(&v, "VARIABLE_DEF"), 2, 2, "x"));
    builder.child(block, NodeData::new(tag(&v, "IDENT"), 2, 6, "x"));
    builder.finish()
}

/// `/** Doc. */\nclass A {}`, with the comment only when `mode` keeps comments.
pub fn documented_tree(mode: ParseMode) -> ParseTree {
    let vocabulary = vocabulary();
    let v = vocabulary.clone();
    let mut builder =
        ParseTreeBuilder::new(vocabulary, NodeData::new(tag(&v, "CLASS_DEF"), 2, 0, "CLASS_DEF"));
    let root = builder.root();
    if mode.keeps_comments() {
        let begin = builder.child(
            root,
            NodeData::new(tag(&v, "BLOCK_COMMENT_BEGIN"), 1, 0, "/*"),
        );
        builder.child(begin, NodeData::new(tag(&v, "COMMENT_CONTENT"), 1, 2, "* Doc. "));
        builder.child(begin, NodeData::new(tag(&v, "BLOCK_COMMENT_END"), 1, 9, "*/"));
    }
    builder.child(root, NodeData::new(tag(&v, "IDENT"), 2, 6, "A"));
    let block = builder.child(root, NodeData::new(tag(&v, "OBJBLOCK"), 2, 8, "OBJBLOCK"));
    builder.child(block, NodeData::new(tag(&v, "LCURLY"), 2, 8, "{"));
    builder.child(block, NodeData::new(tag(&v, "RCURLY"), 2, 9, "}"));
    builder.finish()
}

/// Treats `/**` comments as doc comments and turns them into `JAVADOC_CONTENT { TEXT }`.
#[derive(Default)]
pub struct StubDocParser {
    pub parses: Cell<usize>,
}

impl DocCommentParser for StubDocParser {
    fn is_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> bool {
        tree.children(comment).any(|child| {
            tree.type_name(child) == "COMMENT_CONTENT"
                && tree
                    .data(child)
                    .is_some_and(|data| data.text.starts_with('*') && data.text.len() > 1)
        })
    }

    fn parse_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> DocTree {
        self.parses.set(self.parses.get() + 1);
        let content = tree.child_at(comment, 0).and_then(|id| tree.data(id)).unwrap();
        let mut builder = DocTreeBuilder::new(
            Arc::new(javadoc_vocabulary()),
            NodeData::new(
                JavadocToken::JavadocContent.tag(),
                content.line,
                content.column,
                JavadocToken::JavadocContent.name(),
            ),
        );
        let root = builder.root();
        builder.child(
            root,
            NodeData::new(
                JavadocToken::Text.tag(),
                content.line,
                content.column + 2,
                content.text.trim_start_matches('*').trim(),
            ),
        );
        builder.finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected token at line {line}")]
pub struct ToyError {
    pub line: usize,
}

/// Hands out fixture trees; fails on any source containing `!`.
pub struct ToyParser {
    pub doc_parser: Rc<StubDocParser>,
    pub parses: Rc<Cell<usize>>,
}

impl ToyParser {
    pub fn new() -> Self {
        Self {
            doc_parser: Rc::new(StubDocParser::default()),
            parses: Rc::new(Cell::new(0)),
        }
    }
}

impl SourceParser for ToyParser {
    type Error = ToyError;

    fn parse(&mut self, lines: &[String], mode: ParseMode) -> Result<ParseTree, ToyError> {
        self.parses.set(self.parses.get() + 1);
        if let Some(line) = lines.iter().position(|line| line.contains('!')) {
            return Err(ToyError { line: line + 1 });
        }
        if lines.first().is_some_and(|line| line.starts_with("/**")) {
            Ok(documented_tree(mode))
        } else {
            Ok(class_a_tree())
        }
    }

    fn doc_parser(&self) -> Option<Rc<dyn DocCommentParser>> {
        Some(self.doc_parser.clone())
    }
}
