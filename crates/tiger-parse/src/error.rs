use crate::token::Tag;
use thiserror::Error;
use tiger_ast::ast::BinOp;

/// Lexical problems. Offsets are byte positions in the source buffer.
///
/// `BadHexDigit` and `BadOctalDigit` stop the lexer; the others ride along on an
/// `Invalid` token and surface when the parser reaches it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("unknown escape sequence '\\{escape}' at offset {offset}")]
    UnknownEscape { escape: char, offset: usize },
    #[error("invalid character {ch:?} at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },
    #[error("malformed identifier '{text}' at offset {offset}, only '_main' may start with '_'")]
    MalformedIdent { text: String, offset: usize },
    #[error("unterminated comment at offset {offset}")]
    UnterminatedComment { offset: usize },
    #[error("{found:?} is not a hex digit at offset {offset}")]
    BadHexDigit { found: char, offset: usize },
    #[error("{found:?} is not an octal digit at offset {offset}")]
    BadOctalDigit { found: char, offset: usize },
}

/// Syntax errors. `index` is the position in the filtered token sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("expected {expected}, got {found} at token {index}")]
    Expected {
        expected: Tag,
        found: Tag,
        index: usize,
    },
    #[error("expected {expected}, got end of input at token {index}")]
    UnexpectedEof { expected: String, index: usize },
    #[error("unexpected {found} in {context} at token {index}")]
    Unexpected {
        found: Tag,
        context: &'static str,
        index: usize,
    },
    #[error("integer literal '{text}' out of range at token {index}")]
    IntOutOfRange { text: String, index: usize },
    #[error("nesting depth limit of {limit} exceeded at token {index}")]
    DepthLimit { limit: usize, index: usize },
    #[error("trailing {found} after end of program at token {index}")]
    TrailingInput { found: Tag, index: usize },
}

/// Failures of the precedence shaping pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("comparison operators are not associative: '{first}' followed by '{second}'")]
    NonAssociative { first: BinOp, second: BinOp },
}
