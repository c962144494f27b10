//! Common definitions shared across modules
//!
//! This module contains the error model used throughout the compiler: the
//! crate-level `Error`/`Result` pair and the `Diagnostic` value objects the
//! semantic passes accumulate.

pub mod error;

pub use error::{Diagnostic, Error, ErrorKind, Result};
