#![warn(missing_docs)]
//! `inspector-lang` - token vocabularies for `inspector-core`.
//!
//! Parse-tree nodes store an integer type tag. A [`Vocabulary`] turns that tag back into the
//! display name shown in the inspector's `Type` column. Two vocabularies exist side by side:
//!
//! - the primary (Java) vocabulary, built at runtime by the parser from its grammar plus the
//!   synthetic comment tokens declared here
//! - the javadoc vocabulary, which is closed and fixed ([`JavadocToken`])
//!
//! This crate has no dependencies and knows nothing about parsing.

mod java;
mod javadoc;

use std::collections::HashMap;

pub use java::{
    BLOCK_COMMENT_BEGIN, BLOCK_COMMENT_END, COMMENT_CONTENT, EOF, SINGLE_LINE_COMMENT,
    SYNTHETIC_COMMENT_TOKENS, java_comments, token_display_name,
};
pub use javadoc::{JavadocToken, javadoc_vocabulary};

/// Integer type tag of a parse-tree node.
pub type TokenType = u32;

/// Comment tokens/config for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Split a raw block comment into its content, without the start/end tokens.
    ///
    /// Returns `None` if `raw` is not delimited by this config's block tokens.
    pub fn block_content<'a>(&self, raw: &'a str) -> Option<&'a str> {
        if !self.has_block() {
            return None;
        }
        let start = self.block_start.as_deref()?;
        let end = self.block_end.as_deref()?;
        raw.strip_prefix(start)?.strip_suffix(end)
    }

    /// Split a raw line comment into its content, without the line token.
    pub fn line_content<'a>(&self, raw: &'a str) -> Option<&'a str> {
        if !self.has_line() {
            return None;
        }
        raw.strip_prefix(self.line.as_deref()?)
    }
}

/// A closed table of token display names indexed by [`TokenType`].
///
/// Tags are assigned densely in push order. Several tags may share a display name (grammars
/// alias tokens); [`Vocabulary::tag`] returns the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    names: Vec<String>,
    by_name: HashMap<String, TokenType>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary whose tags are the positions of `names`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::new();
        for name in names {
            vocabulary.push(name);
        }
        vocabulary
    }

    /// Append a display name and return the tag assigned to it.
    pub fn push(&mut self, name: impl Into<String>) -> TokenType {
        let name = name.into();
        let tag = self.names.len() as TokenType;
        self.by_name.entry(name.clone()).or_insert(tag);
        self.names.push(name);
        tag
    }

    /// Display name of `tag`, if the tag belongs to this vocabulary.
    pub fn name(&self, tag: TokenType) -> Option<&str> {
        self.names.get(tag as usize).map(String::as_str)
    }

    /// First tag registered under `name`.
    pub fn tag(&self, name: &str) -> Option<TokenType> {
        self.by_name.get(name).copied()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no tag has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(tag, name)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenType, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(tag, name)| (tag as TokenType, name.as_str()))
    }
}
