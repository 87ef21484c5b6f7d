use inspector_core::{
    DocCommentParser, DocNodeId, DocTree, DocTreeBuilder, NodeData, NodeId, ParseTree,
};
use inspector_lang::{BLOCK_COMMENT_BEGIN, JavadocToken, Vocabulary, javadoc_vocabulary};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@(\w+)\s*([^}]*)\}").expect("valid inline tag regex"));

/// Block tags whose first word is a parameter name.
const PARAMETER_TAGS: [&str; 3] = ["param", "throws", "exception"];

/// Javadoc parser producing [`DocTree`]s with absolute source positions.
///
/// The structure is line oriented: every continuation line contributes a `NEWLINE` and, when
/// present, a `LEADING_ASTERISK`. A line opening with `@tag` starts a `JAVADOC_BLOCK_TAG`
/// whose `DESCRIPTION` collects the following text until the next block tag.
#[derive(Debug, Clone)]
pub struct JavadocParser {
    vocabulary: Arc<Vocabulary>,
}

impl JavadocParser {
    /// Create a parser over the javadoc vocabulary.
    pub fn new() -> Self {
        Self {
            vocabulary: Arc::new(javadoc_vocabulary()),
        }
    }

    /// The vocabulary of produced doc trees.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Parse the text of a `COMMENT_CONTENT` node located at `line`/`column`.
    pub fn parse_content(&self, content: &str, line: usize, column: usize) -> DocTree {
        let mut builder = DocTreeBuilder::new(
            self.vocabulary.clone(),
            named(JavadocToken::JavadocContent, line, column),
        );
        let root = builder.root();
        let Some(body) = content.strip_prefix('*') else {
            return builder.finish();
        };

        let mut container = root;
        let mut previous_end = column + 1;
        for (index, segment) in body.split('\n').enumerate() {
            let line = line + index;
            let mut col = if index == 0 { column + 1 } else { 0 };
            let mut rest = segment;
            if index > 0 {
                builder.child(
                    container,
                    token(JavadocToken::Newline, line - 1, previous_end, "\n"),
                );
                let trimmed = rest.trim_start();
                col += char_len(&rest[..rest.len() - trimmed.len()]);
                rest = trimmed;
                if let Some(after) = rest.strip_prefix('*') {
                    builder.child(container, token(JavadocToken::LeadingAsterisk, line, col, "*"));
                    col += 1;
                    rest = after;
                }
            }
            previous_end = col + char_len(rest);

            let trimmed = rest.trim_start();
            let tag_col = col + char_len(&rest[..rest.len() - trimmed.len()]);
            if is_block_tag(trimmed) {
                container = add_block_tag(&mut builder, root, trimmed, line, tag_col);
            } else {
                add_text(&mut builder, container, rest, line, col);
            }
        }
        builder.finish()
    }
}

impl Default for JavadocParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocCommentParser for JavadocParser {
    fn is_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> bool {
        tree.type_name(comment) == BLOCK_COMMENT_BEGIN
            && tree
                .children(comment)
                .next()
                .and_then(|content| tree.data(content))
                .is_some_and(|data| data.text.starts_with('*') && data.text.chars().count() > 1)
    }

    fn parse_doc_comment(&self, tree: &ParseTree, comment: NodeId) -> DocTree {
        match tree.children(comment).next().and_then(|id| tree.data(id)) {
            Some(content) => self.parse_content(&content.text, content.line, content.column),
            None => {
                let (line, column) = tree.data(comment).map_or((1, 0), |d| (d.line, d.column));
                self.parse_content("", line, column)
            }
        }
    }
}

fn token(kind: JavadocToken, line: usize, column: usize, text: &str) -> NodeData {
    NodeData::new(kind.tag(), line, column, text)
}

/// Inner doc nodes carry their own type name as text.
fn named(kind: JavadocToken, line: usize, column: usize) -> NodeData {
    token(kind, line, column, kind.name())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn is_block_tag(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('@') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// `@name [parameter] description` under `root`. Returns the `DESCRIPTION` node.
fn add_block_tag(
    builder: &mut DocTreeBuilder,
    root: DocNodeId,
    text: &str,
    line: usize,
    column: usize,
) -> DocNodeId {
    let tag = builder.child(root, named(JavadocToken::JavadocBlockTag, line, column));
    builder.child(tag, token(JavadocToken::AtSign, line, column, "@"));

    let after_at = &text[1..];
    let name_len = after_at
        .find(|c: char| !c.is_alphanumeric())
        .unwrap_or(after_at.len());
    let name = &after_at[..name_len];
    builder.child(tag, token(JavadocToken::TagName, line, column + 1, name));

    let mut col = column + 1 + char_len(name);
    let mut rest = &after_at[name_len..];
    if PARAMETER_TAGS.contains(&name) {
        let trimmed = rest.trim_start();
        let param_col = col + char_len(&rest[..rest.len() - trimmed.len()]);
        let param_len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        if param_len > 0 {
            let param = &trimmed[..param_len];
            builder.child(tag, token(JavadocToken::ParameterName, line, param_col, param));
            col = param_col + char_len(param);
            rest = &trimmed[param_len..];
        }
    }

    let description = builder.child(tag, named(JavadocToken::Description, line, col));
    add_text(builder, description, rest, line, col);
    description
}

/// Free text and inline tags of one line, starting at `column`.
fn add_text(
    builder: &mut DocTreeBuilder,
    parent: DocNodeId,
    text: &str,
    line: usize,
    column: usize,
) {
    let at = |byte: usize| column + char_len(&text[..byte]);
    let mut last = 0;
    for captures in INLINE_TAG.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        add_plain(builder, parent, &text[last..whole.start()], line, at(last));

        let start = at(whole.start());
        let inline = builder.child(parent, named(JavadocToken::JavadocInlineTag, line, start));
        builder.child(inline, token(JavadocToken::JavadocInlineTagStart, line, start, "{@"));
        if let Some(name) = captures.get(1) {
            let name_col = at(name.start());
            builder.child(inline, token(JavadocToken::TagName, line, name_col, name.as_str()));
        }
        if let Some(body) = captures.get(2) {
            add_plain(builder, inline, body.as_str(), line, at(body.start()));
        }
        builder.child(
            inline,
            token(JavadocToken::JavadocInlineTagEnd, line, at(whole.end() - 1), "}"),
        );
        last = whole.end();
    }
    add_plain(builder, parent, &text[last..], line, at(last));
}

/// A trimmed `TEXT` node; whitespace-only text adds nothing.
fn add_plain(
    builder: &mut DocTreeBuilder,
    parent: DocNodeId,
    text: &str,
    line: usize,
    column: usize,
) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = text.len() - text.trim_start().len();
    builder.child(
        parent,
        token(JavadocToken::Text, line, column + char_len(&text[..lead]), trimmed),
    );
}
