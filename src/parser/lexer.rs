//! Tokenizer for statements.
//!
//! Tokens come from the flat `tokens` rule of `grammar.pest`, which accepts
//! any input. Disallowed and illegal characters are reported here, before
//! the statement grammar runs, and the token spans are used to locate
//! syntax errors.

use std::fmt;

use pest::error::InputLocation;
use pest::Parser;
use tracing::trace;

use crate::constraints::Relation;
use crate::error::{ParseError, ParseErrorKind};

use super::grammar::{DcpGrammar, Rule};

/// Token categories.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal with its value.
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Compare(Relation),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(v) => write!(f, "{v}"),
            TokenKind::Ident(name) => f.write_str(name),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Compare(r) => f.write_str(r.symbol()),
        }
    }
}

/// A token and its byte span in the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Split a statement into tokens.
///
/// `<`, `>`, `=` and `^` on their own are rejected with a hint, as is any
/// character outside the language.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let scan = DcpGrammar::parse(Rule::tokens, source).map_err(|e| {
        let position = match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((start, _)) => start,
        };
        illegal(source, position)
    })?;

    let mut tokens = Vec::new();
    for pair in scan.flat_map(|p| p.into_inner()) {
        let span = pair.as_span();
        let (start, end) = (span.start(), span.end());
        let text = pair.as_str();

        let kind = match pair.as_rule() {
            Rule::number => TokenKind::Number(
                text.parse::<f64>().map_err(|_| illegal(source, start))?,
            ),
            Rule::ident => TokenKind::Ident(text.to_string()),
            Rule::leq => TokenKind::Compare(Relation::Leq),
            Rule::geq => TokenKind::Compare(Relation::Geq),
            Rule::eq => TokenKind::Compare(Relation::Eq),
            Rule::punct => match text {
                "+" => TokenKind::Plus,
                "-" => TokenKind::Minus,
                "*" => TokenKind::Star,
                "/" => TokenKind::Slash,
                "(" => TokenKind::LParen,
                ")" => TokenKind::RParen,
                _ => TokenKind::Comma,
            },
            Rule::disallowed => {
                let message = match text {
                    "<" => "'<' constraints are not valid. Consider using '<='.",
                    ">" => "'>' constraints are not valid. Consider using '>='.",
                    "=" => "'=' is not valid. Did you mean '=='?",
                    _ => "'^' is not valid. Consider using the 'pow' function.",
                };
                return Err(ParseError::new(ParseErrorKind::DisallowedToken, message, start));
            }
            Rule::EOI => continue,
            _ => return Err(illegal(source, start)),
        };

        trace!(token = %kind, start, end, "token");
        tokens.push(Token { kind, start, end });
    }

    Ok(tokens)
}

fn illegal(source: &str, position: usize) -> ParseError {
    let ch = source
        .get(position..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or('?');
    ParseError::new(
        ParseErrorKind::IllegalCharacter,
        format!("Illegal character '{ch}'."),
        position,
    )
}
