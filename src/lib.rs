//! MiniJava compiler (mjc)
//!
//! The front and middle end of a compiler for a small object-oriented
//! teaching language: a restricted Java-like syntax with classes, methods,
//! `int`/`boolean` primitives, integer arrays and a `main` class.
//!
//! ## Architecture
//!
//! - **parser**: lexical analysis and parsing of MiniJava source into an AST
//! - **ast**: abstract syntax tree, pretty printer and GraphViz emitter
//! - **symbol**: the symbol table consulted by the type checker
//! - **analysis**: symbol-table construction and type checking
//! - **bin**: command-line interface
//!
//! ## Compilation flow
//!
//! ```text
//! Source → Lexer → Parser → AST → SymbolTableBuilder → TypeChecker
//!                                        ↓                  ↓
//!                                  SymbolTable      TypeMap + diagnostics
//! ```
//!
//! Lexical and parse errors are fatal for their stage. Symbol and type
//! diagnostics accumulate: both semantic passes always run to completion,
//! and a downstream code generator must not be invoked if any diagnostic
//! was reported.

pub mod ast;
pub mod parser;
pub mod types;
pub mod symbol;
pub mod analysis;
pub mod common;

pub use common::error::{Diagnostic, Error, ErrorKind, Result};

use analysis::{SymbolTableBuilder, TypeChecker, TypeMap};
use ast::Program;
use symbol::SymbolTable;

/// Result of running the full middle end over one compilation unit
///
/// This is exactly the contract a code generator consumes: the AST, the
/// resolved symbol table and the node→type mapping, plus the diagnostics
/// that decide whether code generation may happen at all.
pub struct Analysis {
    pub program: Program,
    pub symbols: SymbolTable,
    pub types: TypeMap,
    /// Symbol and type diagnostics, in pass order and source order within
    /// each pass.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run the whole middle end on a source text
///
/// Lexical and parse failures return `Err`. Symbol building and type
/// checking both run even if the other reported errors; their diagnostics
/// are collected in the returned [`Analysis`].
pub fn analyze(source: &str) -> Result<Analysis> {
    let program = parser::parse(source)?;

    let mut builder = SymbolTableBuilder::new();
    let mut symbols = builder.build(&program);
    let mut diagnostics = builder.into_errors();

    let mut checker = TypeChecker::new();
    checker.check(&program, &mut symbols);
    let (types, type_errors) = checker.into_parts();
    diagnostics.extend(type_errors);

    Ok(Analysis {
        program,
        symbols,
        types,
        diagnostics,
    })
}
