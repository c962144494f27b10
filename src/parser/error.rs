use std::fmt;

use crate::ast::Location;
use crate::common::error::{Diagnostic, Error, ErrorKind};

#[derive(Debug, Clone)]
pub enum ParseError {
    /// Unexpected token encountered
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    /// Unexpected end of input
    UnexpectedEndOfInput {
        expected: String,
        location: Location,
    },

    /// Invalid syntax
    InvalidSyntax {
        message: String,
        location: Location,
    },
}

impl ParseError {
    /// Create a new unexpected token error
    pub fn unexpected_token(expected: &str, found: &str, location: Location) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            location,
        }
    }

    /// Create a new unexpected end of input error
    pub fn unexpected_end_of_input(expected: &str, location: Location) -> Self {
        ParseError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            location,
        }
    }

    /// Create a new invalid syntax error
    pub fn invalid_syntax(message: &str, location: Location) -> Self {
        ParseError::InvalidSyntax {
            message: message.to_string(),
            location,
        }
    }

    /// Get the location of the error
    pub fn location(&self) -> Location {
        match self {
            ParseError::UnexpectedToken { location, .. } => *location,
            ParseError::UnexpectedEndOfInput { location, .. } => *location,
            ParseError::InvalidSyntax { location, .. } => *location,
        }
    }

    /// The rendered message, without position
    pub fn message(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, found, .. } => {
                format!("expected {}, found {}", expected, found)
            }
            ParseError::UnexpectedEndOfInput { expected, .. } => {
                format!("unexpected end of input, expected {}", expected)
            }
            ParseError::InvalidSyntax { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location();
        write!(
            f,
            "Parse error at {}:{}: {}",
            location.line,
            location.column,
            self.message()
        )
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for Error {
    fn from(parse_error: ParseError) -> Self {
        let location = parse_error.location();
        Error::Parse(Diagnostic::new(
            ErrorKind::ParserError(parse_error.message()),
            location,
        ))
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
