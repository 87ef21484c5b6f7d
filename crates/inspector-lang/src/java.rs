//! Java token naming.

use crate::CommentConfig;

/// Display name of the end-of-input token; also the type of the inspector's sentinel root.
pub const EOF: &str = "EOF";
/// Opening `/*` of a block comment. Its children are the content and the closing token.
pub const BLOCK_COMMENT_BEGIN: &str = "BLOCK_COMMENT_BEGIN";
/// Closing `*/` of a block comment.
pub const BLOCK_COMMENT_END: &str = "BLOCK_COMMENT_END";
/// `//` of a line comment. Its only child is the content.
pub const SINGLE_LINE_COMMENT: &str = "SINGLE_LINE_COMMENT";
/// Text of a comment between its delimiters.
pub const COMMENT_CONTENT: &str = "COMMENT_CONTENT";

/// Synthetic tokens a parser appends to its grammar vocabulary when it keeps comments.
pub const SYNTHETIC_COMMENT_TOKENS: [&str; 4] = [
    BLOCK_COMMENT_BEGIN,
    BLOCK_COMMENT_END,
    SINGLE_LINE_COMMENT,
    COMMENT_CONTENT,
];

/// Comment tokens of the Java language.
pub fn java_comments() -> CommentConfig {
    CommentConfig::line_and_block("//", "/*", "*/")
}

/// Display name for a grammar node kind.
///
/// Named kinds are upper-cased (`class_declaration` -> `CLASS_DECLARATION`), keywords become
/// `LITERAL_*` and punctuation gets a symbolic name (`{` -> `LCURLY`). Anything else is
/// named after its tag so that the name never equals a token's literal text.
pub fn token_display_name(kind: &str, named: bool, tag: u32) -> String {
    if named {
        return kind.to_ascii_uppercase();
    }
    if let Some(name) = punctuation_name(kind) {
        return name.to_string();
    }
    if !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return format!("LITERAL_{}", kind.to_ascii_uppercase());
    }
    format!("TOKEN_{tag}")
}

fn punctuation_name(kind: &str) -> Option<&'static str> {
    let name = match kind {
        "{" => "LCURLY",
        "}" => "RCURLY",
        "(" => "LPAREN",
        ")" => "RPAREN",
        "[" => "LBRACK",
        "]" => "RBRACK",
        ";" => "SEMI",
        "," => "COMMA",
        "." => "DOT",
        "..." => "ELLIPSIS",
        "@" => "AT",
        "@interface" => "AT_INTERFACE",
        "?" => "QUESTION",
        ":" => "COLON",
        "::" => "DOUBLE_COLON",
        "->" => "LAMBDA",
        "=" => "ASSIGN",
        "==" => "EQUAL",
        "!=" => "NOT_EQUAL",
        "<" => "LT",
        ">" => "GT",
        "<=" => "LE",
        ">=" => "GE",
        "+" => "PLUS",
        "-" => "MINUS",
        "*" => "STAR",
        "/" => "DIV",
        "%" => "MOD",
        "++" => "INC",
        "--" => "DEC",
        "!" => "LNOT",
        "~" => "BNOT",
        "&&" => "LAND",
        "||" => "LOR",
        "&" => "BAND",
        "|" => "BOR",
        "^" => "BXOR",
        "<<" => "SL",
        ">>" => "SR",
        ">>>" => "BSR",
        "+=" => "PLUS_ASSIGN",
        "-=" => "MINUS_ASSIGN",
        "*=" => "STAR_ASSIGN",
        "/=" => "DIV_ASSIGN",
        "%=" => "MOD_ASSIGN",
        "&=" => "BAND_ASSIGN",
        "|=" => "BOR_ASSIGN",
        "^=" => "BXOR_ASSIGN",
        "<<=" => "SL_ASSIGN",
        ">>=" => "SR_ASSIGN",
        ">>>=" => "BSR_ASSIGN",
        _ => return None,
    };
    Some(name)
}
