//! Statement parser.
//!
//! A [`Parser`] is a session: it owns a symbol table of declared variables
//! and parameters and the list of expression statements parsed so far.
//! Statements are read with a `pest` grammar (`grammar.pest`) and built into
//! annotated expression trees.
//!
//! ```
//! use dcpcheck::prelude::*;
//!
//! let mut parser = Parser::new();
//! parser.parse("variable x y").unwrap();
//! parser.parse("parameter positive a").unwrap();
//!
//! let e = parser.parse("a * square(x) <= log(y) + a").unwrap().unwrap();
//! assert!(e.violations().is_empty());
//! assert_eq!(parser.statements().len(), 1);
//! ```

mod grammar;
pub mod lexer;
pub mod settings;
pub mod symbols;

use std::collections::HashSet;

use tracing::debug;

use crate::dcp::Sign;
use crate::error::{DcpError, ParseError, ParseErrorKind};
use crate::expr::Expression;

use grammar::{parse_declaration, parse_statement};
use lexer::{tokenize, TokenKind};

pub use settings::ParserSettings;
pub use symbols::SymbolTable;

/// A parsing session.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: ParserSettings,
    symbols: SymbolTable,
    statements: Vec<Expression>,
}

impl Parser {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with custom settings.
    pub fn with_settings(settings: ParserSettings) -> Self {
        Parser {
            settings,
            ..Self::default()
        }
    }

    /// Parse one statement.
    ///
    /// Declarations (`variable x y`, `parameter positive a`) update the
    /// symbol table and return `Ok(None)`, as does blank input. Any other
    /// statement is appended to [`statements`](Self::statements) and
    /// returned. On error nothing is changed.
    pub fn parse(&mut self, text: &str) -> Result<Option<Expression>, ParseError> {
        if text.len() > self.settings.max_input_len {
            return Err(ParseError::new(
                ParseErrorKind::InputTooLong,
                format!(
                    "Statement is {} bytes long; the limit is {}.",
                    text.len(),
                    self.settings.max_input_len
                ),
                self.settings.max_input_len,
            ));
        }

        let tokens = tokenize(text)?;
        let Some(first) = tokens.first() else {
            return Ok(None);
        };
        if let TokenKind::Ident(word) = &first.kind {
            if word == "variable" || word == "parameter" {
                self.declaration(text)?;
                return Ok(None);
            }
        }

        let expr = parse_statement(text, &tokens, &self.symbols, self.settings.max_depth)?;
        debug!(
            statement = %expr,
            curvature = %expr.curvature(),
            sign = %expr.sign(),
            violations = expr.violations().len(),
            "parsed statement"
        );
        self.statements.push(expr.clone());
        Ok(Some(expr))
    }

    fn declaration(&mut self, text: &str) -> Result<(), ParseError> {
        let declaration = parse_declaration(text)?;
        let position = text.len() - text.trim_start().len();
        let declared = if declaration.is_parameter {
            self.declare_parameters(&declaration.names, declaration.sign)
        } else {
            self.declare_variables(&declaration.names)
        };
        declared.map_err(|e| ParseError::declaration(e, position))
    }

    /// Declare one variable.
    pub fn declare_variable(&mut self, name: &str) {
        debug!(name, "declared variable");
        self.symbols.declare_variable(name);
    }

    /// Declare one parameter of the given sign.
    pub fn declare_parameter(&mut self, name: &str, sign: Sign) {
        debug!(name, sign = %sign, "declared parameter");
        self.symbols.declare_parameter(name, sign);
    }

    /// Declare several variables at once; fails without declaring anything
    /// if a name repeats.
    pub fn declare_variables(&mut self, names: &[&str]) -> Result<(), DcpError> {
        check_distinct(names)?;
        for name in names {
            self.declare_variable(name);
        }
        Ok(())
    }

    /// Declare several parameters of one sign at once; fails without
    /// declaring anything if a name repeats.
    pub fn declare_parameters(&mut self, names: &[&str], sign: Sign) -> Result<(), DcpError> {
        check_distinct(names)?;
        for name in names {
            self.declare_parameter(name, sign);
        }
        Ok(())
    }

    /// Expression statements parsed so far, in order.
    pub fn statements(&self) -> &[Expression] {
        &self.statements
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }
}

fn check_distinct(names: &[&str]) -> Result<(), DcpError> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(*name) {
            return Err(DcpError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
