//! Parser module for MiniJava
//!
//! This module handles lexical analysis and parsing of MiniJava source into
//! an AST.

pub mod lexer;
pub mod parser;
pub mod error;

pub use error::ParseError;
pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::Parser;

use crate::ast::Program;
use crate::common::error::{Error, Result};

/// Tokenize MiniJava source code
///
/// Whitespace and comments are filtered; the first invalid token aborts with
/// `Error::Lexical`.
pub fn lex(source: &str) -> Result<Vec<LexicalToken>> {
    Lexer::new(source).tokenize().map_err(Error::Lexical)
}

/// Parse MiniJava source code into an AST
///
/// This is the main entry point for parsing; the first parse error halts with
/// `Error::Parse`.
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(source)?.parse()
}
