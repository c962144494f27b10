use std::fmt;

use thiserror::Error;

use crate::ast::{BinaryOp, Location};
use crate::types::Type;

/// Result type for mjc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the mjc compiler
///
/// Lexical and parse failures are fatal for their stage and carried here as
/// single diagnostics; symbol and type diagnostics accumulate in the analysis
/// result instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Lexical(Diagnostic),

    #[error("{0}")]
    Parse(Diagnostic),
}

/// The kinds of diagnostics the compiler reports
///
/// Each variant carries the textual arguments its rendered message needs; the
/// position lives in the enclosing [`Diagnostic`]. Per-operator kinds keep
/// their operator so that e.g. an invalid left operand of `&&` and of `+`
/// remain distinct kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("invalid token '{0}'")]
    LexerError(String),

    #[error("{0}")]
    ParserError(String),

    #[error("duplicate declaration of class '{0}'")]
    DuplicateClass(String),

    #[error("duplicate declaration of field '{0}'")]
    DuplicateField(String),

    #[error("duplicate declaration of method '{0}'")]
    DuplicateMethod(String),

    #[error("duplicate declaration of parameter '{0}'")]
    DuplicateParameter(String),

    #[error("duplicate declaration of local variable '{0}'")]
    DuplicateLocal(String),

    #[error("undeclared identifier '{0}'")]
    UndeclaredIdentifier(String),

    #[error("undeclared class '{0}'")]
    UndeclaredClass(String),

    #[error("class '{class_name}' has no method '{method_name}'")]
    UndeclaredMethod {
        method_name: String,
        class_name: String,
    },

    #[error("expected variable, but '{0}' is a class")]
    ExpectedVariableGotClass(String),

    #[error("invalid assignment of {found} to variable of type {expected}")]
    InvalidAssignment { found: Type, expected: Type },

    #[error("expected array type, but found {0}")]
    NotArrayType(Type),

    #[error("array index must be of type int, but found {0}")]
    WrongIndexType(Type),

    #[error("array size must be of type int, but found {0}")]
    WrongSizeType(Type),

    #[error("if condition must be of type boolean")]
    WrongIfConditionType,

    #[error("while condition must be of type boolean")]
    WrongWhileConditionType,

    #[error("can not print value of type {0}")]
    UnprintableType(Type),

    #[error("invalid left operand of type {found} to operator '{operator}'")]
    InvalidLeftOperand { operator: BinaryOp, found: Type },

    #[error("invalid right operand of type {found} to operator '{operator}'")]
    InvalidRightOperand { operator: BinaryOp, found: Type },

    #[error("invalid comparison of {left} and {right} with operator '{operator}'")]
    InvalidComparison {
        operator: BinaryOp,
        left: Type,
        right: Type,
    },

    #[error("negation expected operand of type boolean, but found {0}")]
    NegationExpectedBoolean(Type),

    #[error("method call on non-class type {0}")]
    MethodCallOnNonClassType(Type),

    #[error("wrong number of arguments to method '{method_name}': expected {expected}, found {found}")]
    WrongParameterCount {
        method_name: String,
        found: usize,
        expected: usize,
    },

    #[error("wrong type of argument {index} to method '{method_name}': expected {expected}, found {found}")]
    WrongParameterType {
        method_name: String,
        index: usize,
        found: Type,
        expected: Type,
    },

    #[error("method '{method_name}' must return value of type {expected}")]
    WrongReturnType {
        method_name: String,
        expected: Type,
    },

    #[error("length of non-array type {0}")]
    LengthOnNonArrayType(Type),

    #[error("invalid integer literal '{0}'")]
    InvalidIntLiteral(String),
}

/// A positioned diagnostic
///
/// Displays as `<line>:<col>: error: <message>`; the driver prefixes the file
/// path to produce `<file>:<line>:<col>: error: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: error: {}",
            self.location.line, self.location.column, self.kind
        )
    }
}
