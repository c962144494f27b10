//! Semantic analysis passes
//!
//! Two sequential passes over the AST: symbol-table construction and type
//! checking. Both accumulate diagnostics and always complete their
//! traversal; the driver aborts compilation afterwards if either reported
//! anything.

pub mod symbol_builder;
pub mod type_checker;

pub use symbol_builder::SymbolTableBuilder;
pub use type_checker::{TypeChecker, TypeMap};
