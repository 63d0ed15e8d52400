//! Error types for dcpcheck.
//!
//! Two channels exist. [`DcpError`] covers failures while building atoms or
//! applying declarations; [`ParseError`] is the single fatal failure surfaced
//! by [`Parser::parse`](crate::parser::Parser::parse). Recoverable DCP
//! violations are not errors at all: they are attached to the expression
//! tree as [`Violation`](crate::expr::Violation)s.

use thiserror::Error;

/// Error type for atom construction and declarations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DcpError {
    /// An atom was applied to no arguments.
    #[error("No arguments given to {atom}.")]
    NoArguments { atom: String },

    /// An atom was applied to the wrong number of arguments.
    #[error("{atom} expects {expected}, but was given {got}.")]
    ArgumentCount {
        atom: String,
        expected: String,
        got: usize,
    },

    /// A parameterized atom without a default was not given its parameter.
    #[error("Missing value for {parameter} in {atom}(..., {parameter}).")]
    MissingParameter {
        atom: String,
        parameter: &'static str,
    },

    /// A parameter failed its validator.
    #[error("Invalid value '{value}' for {parameter} in {atom}(..., {parameter}).")]
    InvalidParameter {
        atom: String,
        parameter: &'static str,
        value: String,
    },

    /// `Inf` was passed where no parameter is accepted.
    #[error("'Inf' is not a valid argument to {atom}.")]
    UnexpectedInfinity { atom: String },

    /// `quad_over_lin` divisor not known to be positive.
    #[error("{atom} only accepts positive divisor arguments.")]
    NonPositiveDivisor { atom: String },

    /// The same name appears twice in one declaration statement.
    #[error("'{name}' is declared more than once in the same statement.")]
    DuplicateDeclaration { name: String },

    /// Composition called with no arguments or mismatched lengths.
    #[error(
        "Composition needs one monotonicity per argument and at least one argument \
         (got {monotonicities} monotonicities for {arguments} arguments)."
    )]
    Composition {
        monotonicities: usize,
        arguments: usize,
    },
}

/// Result type for dcpcheck operations.
pub type Result<T> = std::result::Result<T, DcpError>;

/// Category of a fatal parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// One of `<`, `>`, `=`, `^`.
    DisallowedToken,
    /// A character outside the language.
    IllegalCharacter,
    /// An identifier not present in the symbol table.
    UnknownIdentifier,
    /// A call to a name not present in the atom library.
    UnknownFunction,
    /// A call with an empty argument slot.
    MissingArguments,
    /// A malformed call.
    CallSyntax,
    /// A token where an operand or operator was expected.
    InvalidSyntax,
    /// The statement ended while an operand was still expected.
    InvalidExpression,
    /// More than one comparison operator.
    MultipleConstraints,
    /// Parentheses, calls or negations nested beyond the configured depth.
    NestingTooDeep,
    /// Statement longer than the configured limit.
    InputTooLong,
    /// An atom could not be built from its arguments.
    Construction,
    /// A declaration statement was rejected.
    Declaration,
}

/// Fatal failure to parse one statement.
///
/// The position is a byte offset into the statement text pointing at (or
/// near) the offending token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Stable category.
    pub kind: ParseErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Approximate byte offset of the failure.
    pub position: usize,
    /// Underlying construction or declaration failure, if any.
    #[source]
    pub cause: Option<DcpError>,
}

impl ParseError {
    /// Create a parse error without an underlying cause.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, position: usize) -> Self {
        ParseError {
            kind,
            message: message.into(),
            position,
            cause: None,
        }
    }

    /// Wrap an atom construction failure.
    pub fn construction(cause: DcpError, position: usize) -> Self {
        ParseError {
            kind: ParseErrorKind::Construction,
            message: cause.to_string(),
            position,
            cause: Some(cause),
        }
    }

    /// Wrap a rejected declaration.
    pub fn declaration(cause: DcpError, position: usize) -> Self {
        ParseError {
            kind: ParseErrorKind::Declaration,
            message: cause.to_string(),
            position,
            cause: Some(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages() {
        let e = DcpError::NoArguments {
            atom: "max".to_string(),
        };
        assert_eq!(e.to_string(), "No arguments given to max.");

        let e = DcpError::InvalidParameter {
            atom: "norm".to_string(),
            parameter: "p",
            value: "0.5".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid value '0.5' for p in norm(..., p).");
    }

    #[test]
    fn test_parse_error_source() {
        let cause = DcpError::NonPositiveDivisor {
            atom: "quad_over_lin".to_string(),
        };
        let e = ParseError::construction(cause.clone(), 3);
        assert_eq!(e.kind, ParseErrorKind::Construction);
        assert_eq!(e.to_string(), cause.to_string());
        assert!(e.source().is_some());

        let e = ParseError::new(ParseErrorKind::InvalidSyntax, "bad", 0);
        assert!(e.source().is_none());
    }
}
