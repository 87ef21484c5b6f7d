//! The javadoc vocabulary.

use crate::{TokenType, Vocabulary};

/// Node types produced by the javadoc parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum JavadocToken {
    /// Root of a doc-comment tree. Its text is its own type name.
    JavadocContent = 0,
    /// Free text.
    Text,
    /// A line break inside the comment.
    Newline,
    /// The `*` that starts a continuation line.
    LeadingAsterisk,
    /// A block tag such as `@param name description`.
    JavadocBlockTag,
    /// The `@` of a block tag.
    AtSign,
    /// Name of a block or inline tag.
    TagName,
    /// Parameter name of `@param`, `@throws` and `@exception`.
    ParameterName,
    /// Description following a block tag.
    Description,
    /// An inline tag such as `{@code x}`.
    JavadocInlineTag,
    /// The `{@` that opens an inline tag.
    JavadocInlineTagStart,
    /// The `}` that closes an inline tag.
    JavadocInlineTagEnd,
}

impl JavadocToken {
    /// Every token, in tag order.
    pub const ALL: [JavadocToken; 12] = [
        JavadocToken::JavadocContent,
        JavadocToken::Text,
        JavadocToken::Newline,
        JavadocToken::LeadingAsterisk,
        JavadocToken::JavadocBlockTag,
        JavadocToken::AtSign,
        JavadocToken::TagName,
        JavadocToken::ParameterName,
        JavadocToken::Description,
        JavadocToken::JavadocInlineTag,
        JavadocToken::JavadocInlineTagStart,
        JavadocToken::JavadocInlineTagEnd,
    ];

    /// Integer tag stored in doc-tree nodes.
    pub fn tag(self) -> TokenType {
        self as TokenType
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            JavadocToken::JavadocContent => "JAVADOC_CONTENT",
            JavadocToken::Text => "TEXT",
            JavadocToken::Newline => "NEWLINE",
            JavadocToken::LeadingAsterisk => "LEADING_ASTERISK",
            JavadocToken::JavadocBlockTag => "JAVADOC_BLOCK_TAG",
            JavadocToken::AtSign => "AT_SIGN",
            JavadocToken::TagName => "TAG_NAME",
            JavadocToken::ParameterName => "PARAMETER_NAME",
            JavadocToken::Description => "DESCRIPTION",
            JavadocToken::JavadocInlineTag => "JAVADOC_INLINE_TAG",
            JavadocToken::JavadocInlineTagStart => "JAVADOC_INLINE_TAG_START",
            JavadocToken::JavadocInlineTagEnd => "JAVADOC_INLINE_TAG_END",
        }
    }
}

/// Build the javadoc vocabulary.
pub fn javadoc_vocabulary() -> Vocabulary {
    Vocabulary::from_names(JavadocToken::ALL.iter().map(|token| token.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_vocabulary_positions() {
        let vocabulary = javadoc_vocabulary();
        assert_eq!(vocabulary.len(), JavadocToken::ALL.len());
        for token in JavadocToken::ALL {
            assert_eq!(vocabulary.name(token.tag()), Some(token.name()));
        }
    }
}
