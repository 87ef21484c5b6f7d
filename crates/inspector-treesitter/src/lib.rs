#![warn(missing_docs)]
//! `inspector-treesitter` - Java and javadoc parsers for `inspector-core`.
//!
//! This crate provides the two parsers the inspector consumes:
//!
//! - [`JavaParser`]: a `tree-sitter-java` parse restructured into the inspector's node model,
//!   with comments kept or dropped according to the [`inspector_core::ParseMode`]
//! - [`JavadocParser`]: turns doc-comment content into a secondary tree that the core grafts
//!   under the comment on demand
//!
//! Both implement the core's collaborator traits ([`inspector_core::SourceParser`] and
//! [`inspector_core::DocCommentParser`]), so an [`inspector_core::InspectorSession`] can be
//! driven directly by a [`JavaParser`].

mod java;
mod javadoc;

pub use java::{JavaParseError, JavaParser};
pub use javadoc::JavadocParser;
