#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod error;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod token;

pub use error::{LexError, ParseError, ShapeError};
pub use parser::{parse_str, parse_str_with, ParseOptions, Parser, DEFAULT_MAX_DEPTH};
pub use token::{Tag, Tok};

/// Lexes the whole of `src`, comments and line breaks included.
pub fn tokenize(src: &str) -> Result<Vec<Tok>, LexError> {
    lexer::Lexer::new(src).all_tokens()
}
