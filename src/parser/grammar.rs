//! Statement grammar and tree building.
//!
//! The grammar lives in `grammar.pest`:
//!
//! ```text
//! statement := sum { compare sum }
//! sum       := product { ("+" | "-") product }
//! product   := unary { ("*" | "/") unary }
//! unary     := { "-" } primary
//! primary   := number | ident "(" slot { "," slot } ")" | "(" sum ")" | ident
//! ```
//!
//! Pest only checks syntax. `Builder` walks the pairs and builds the
//! annotated [`Expression`]; symbol lookup, atom construction, the one
//! constraint rule and the depth limit are enforced there. Pest failures are
//! mapped back onto the fixed messages of [`ParseErrorKind`].

use pest::error::InputLocation;
use pest::Parser;
use pest_derive::Parser;

use crate::atoms::{apply, lookup, CallArgument};
use crate::constraints::Relation;
use crate::dcp::Sign;
use crate::error::{ParseError, ParseErrorKind};
use crate::expr::{BinaryOp, Expression};

use super::lexer::{Token, TokenKind};
use super::symbols::SymbolTable;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub(crate) struct DcpGrammar;

type Pair<'i> = pest::iterators::Pair<'i, Rule>;
type PResult<T> = Result<T, ParseError>;

/// Parse and build one expression statement.
pub(crate) fn parse_statement(
    source: &str,
    tokens: &[Token],
    symbols: &SymbolTable,
    max_depth: usize,
) -> PResult<Expression> {
    check_nesting(tokens, max_depth)?;
    let pair = DcpGrammar::parse(Rule::statement, source)
        .map_err(|e| syntax_error(source, tokens, &e))?
        .next()
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidExpression, incomplete(source), 0))?;
    Builder::new(symbols, max_depth).statement(pair)
}

/// A `variable` or `parameter` statement.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Declaration<'i> {
    pub is_parameter: bool,
    pub sign: Sign,
    pub names: Vec<&'i str>,
}

/// Parse a declaration statement.
pub(crate) fn parse_declaration(source: &str) -> PResult<Declaration<'_>> {
    let pair = DcpGrammar::parse(Rule::declaration, source)
        .map_err(|e| {
            ParseError::new(
                ParseErrorKind::Declaration,
                format!("Invalid declaration '{}'.", source.trim()),
                error_position(&e),
            )
        })?
        .next();

    let mut declaration = Declaration {
        is_parameter: false,
        sign: Sign::Unknown,
        names: Vec::new(),
    };
    for item in pair.into_iter().flat_map(Pair::into_inner) {
        match item.as_rule() {
            Rule::parameter_kw => declaration.is_parameter = true,
            Rule::sign_kw => {
                declaration.sign = match item.as_str() {
                    "positive" => Sign::Positive,
                    "negative" => Sign::Negative,
                    _ => Sign::Zero,
                }
            }
            Rule::ident => declaration.names.push(item.as_str()),
            _ => {}
        }
    }

    if declaration.names.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::Declaration,
            format!("Missing names in declaration '{}'.", source.trim()),
            source.len(),
        ));
    }
    Ok(declaration)
}

// ============================================================================
// Tree building
// ============================================================================

/// Builds an [`Expression`] from the pairs of a `statement`.
pub(crate) struct Builder<'a> {
    symbols: &'a SymbolTable,
    depth: usize,
    max_depth: usize,
}

impl<'a> Builder<'a> {
    pub fn new(symbols: &'a SymbolTable, max_depth: usize) -> Self {
        Builder {
            symbols,
            depth: 0,
            max_depth,
        }
    }

    pub fn statement(mut self, pair: Pair<'_>) -> PResult<Expression> {
        let position = pair.as_span().start();
        let mut sides = Vec::with_capacity(2);
        let mut relations = Vec::with_capacity(1);
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::sum => sides.push(item),
                Rule::leq => relations.push((Relation::Leq, item.as_span().start())),
                Rule::geq => relations.push((Relation::Geq, item.as_span().start())),
                Rule::eq => relations.push((Relation::Eq, item.as_span().start())),
                _ => {}
            }
        }

        if let Some(&(_, second)) = relations.get(1) {
            return Err(ParseError::new(
                ParseErrorKind::MultipleConstraints,
                "An expression can only contain one constraint.",
                second,
            ));
        }

        let mut sides = sides.into_iter();
        let lhs = self.expression(expect(sides.next(), position)?)?;
        match relations.first() {
            Some(&(relation, at)) => {
                let rhs = self.expression(expect(sides.next(), at)?)?;
                Ok(Expression::constraint(lhs, relation, rhs))
            }
            None => Ok(lhs),
        }
    }

    fn expression(&mut self, pair: Pair<'_>) -> PResult<Expression> {
        match pair.as_rule() {
            Rule::sum | Rule::product => self.chain(pair),
            Rule::unary => self.unary(pair),
            Rule::number => number(&pair),
            Rule::ident => self.identifier(&pair),
            Rule::group => self.group(pair),
            Rule::call => self.call(pair),
            _ => Err(ParseError::new(
                ParseErrorKind::InvalidSyntax,
                format!("Invalid syntax at '{}'.", pair.as_str()),
                pair.as_span().start(),
            )),
        }
    }

    // operand { op operand }, folded to the left
    fn chain(&mut self, pair: Pair<'_>) -> PResult<Expression> {
        let position = pair.as_span().start();
        let mut inner = pair.into_inner();
        let mut lhs = self.expression(expect(inner.next(), position)?)?;
        while let Some(op) = inner.next() {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                _ => BinaryOp::Div,
            };
            let rhs = self.expression(expect(inner.next(), position)?)?;
            lhs = Expression::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self, pair: Pair<'_>) -> PResult<Expression> {
        let position = pair.as_span().start();
        let mut negations = 0;
        let mut operand = None;
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::neg => negations += 1,
                _ => operand = Some(item),
            }
        }

        let operand = expect(operand, position)?;
        let mut expr = self.nested(negations, position, |b| b.expression(operand))?;
        for _ in 0..negations {
            expr = Expression::neg(expr);
        }
        Ok(expr)
    }

    fn identifier(&self, pair: &Pair<'_>) -> PResult<Expression> {
        let name = pair.as_str();
        self.symbols.get(name).cloned().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownIdentifier,
                format!("'{name}' is not a known variable or parameter."),
                pair.as_span().start(),
            )
        })
    }

    fn group(&mut self, pair: Pair<'_>) -> PResult<Expression> {
        let position = pair.as_span().start();
        let inner = expect(pair.into_inner().next(), position)?;
        let expr = self.nested(1, position, |b| b.expression(inner))?;
        Ok(expr.parenthesized())
    }

    fn call(&mut self, pair: Pair<'_>) -> PResult<Expression> {
        let start = pair.as_span().start();
        let mut inner = pair.into_inner();
        let name = expect(inner.next(), start)?.as_str();
        let function = lookup(name).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownFunction,
                format!("'{name}' is not a known function."),
                start,
            )
        })?;

        let slots: Vec<Pair<'_>> = inner.collect();
        if slots.iter().any(|s| s.as_str().trim().is_empty()) {
            let rendered: Vec<&str> = slots.iter().map(|s| s.as_str().trim()).collect();
            return Err(ParseError::new(
                ParseErrorKind::MissingArguments,
                format!("Missing arguments in '{}({})'.", name, rendered.join(", ")),
                start,
            ));
        }

        let args = self.nested(1, start, |b| {
            slots
                .into_iter()
                .map(|slot| b.argument(slot))
                .collect::<PResult<Vec<_>>>()
        })?;
        apply(&function, args).map_err(|e| ParseError::construction(e, start))
    }

    fn argument(&mut self, slot: Pair<'_>) -> PResult<CallArgument> {
        let position = slot.as_span().start();
        let value = expect(slot.into_inner().next(), position)?;
        match value.as_rule() {
            Rule::infinity => Ok(CallArgument::Infinity),
            _ => self.expression(value).map(CallArgument::Expression),
        }
    }

    fn nested<T>(
        &mut self,
        levels: usize,
        position: usize,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth + levels > self.max_depth {
            return Err(too_deep(self.max_depth, position));
        }
        self.depth += levels;
        let result = f(self);
        self.depth -= levels;
        result
    }
}

fn number(pair: &Pair<'_>) -> PResult<Expression> {
    let text = pair.as_str();
    let value = text.parse::<f64>().map_err(|_| {
        ParseError::new(
            ParseErrorKind::InvalidSyntax,
            format!("Invalid syntax at '{text}'."),
            pair.as_span().start(),
        )
    })?;
    Ok(Expression::literal(value, text))
}

// The grammar guarantees the shape of every pair; a missing child means the
// statement could not be read at all.
fn expect(pair: Option<Pair<'_>>, position: usize) -> PResult<Pair<'_>> {
    pair.ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::InvalidSyntax,
            "Invalid syntax.",
            position,
        )
    })
}

// ============================================================================
// Limits and error mapping
// ============================================================================

// Parentheses bound the recursion of the generated parser, so they are
// counted before pest runs. Unary minus is counted while building.
fn check_nesting(tokens: &[Token], max_depth: usize) -> PResult<()> {
    let mut depth = 0usize;
    for tok in tokens {
        match tok.kind {
            TokenKind::LParen => {
                depth += 1;
                if depth > max_depth {
                    return Err(too_deep(max_depth, tok.start));
                }
            }
            TokenKind::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn too_deep(max_depth: usize, position: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::NestingTooDeep,
        format!("Expression is nested more than {max_depth} levels deep."),
        position,
    )
}

fn error_position(error: &pest::error::Error<Rule>) -> usize {
    match error.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((start, _)) => start,
    }
}

fn syntax_error(source: &str, tokens: &[Token], error: &pest::error::Error<Rule>) -> ParseError {
    let position = error_position(error);

    if let Some(name) = enclosing_call(tokens, position) {
        return ParseError::new(
            ParseErrorKind::CallSyntax,
            format!("Syntax error in call to '{name}'."),
            position,
        );
    }

    let Some(found) = tokens.iter().find(|t| t.start >= position) else {
        return ParseError::new(ParseErrorKind::InvalidExpression, incomplete(source), position);
    };
    let message = match last_complete(source, tokens, position) {
        Some(last) => format!("Invalid syntax after '{last}'."),
        None => format!("Invalid syntax at '{}'.", &source[found.start..found.end]),
    };
    ParseError::new(ParseErrorKind::InvalidSyntax, message, position)
}

fn incomplete(source: &str) -> String {
    format!("'{}' is not a valid expression.", source.trim())
}

// Name of the innermost call whose parentheses are open at `position`.
fn enclosing_call(tokens: &[Token], position: usize) -> Option<&str> {
    let mut open: Vec<Option<&str>> = Vec::new();
    let mut previous: Option<&Token> = None;
    for tok in tokens.iter().take_while(|t| t.start < position) {
        match tok.kind {
            TokenKind::LParen => open.push(match previous.map(|p| &p.kind) {
                Some(TokenKind::Ident(name)) => Some(name.as_str()),
                _ => None,
            }),
            TokenKind::RParen => {
                open.pop();
            }
            _ => {}
        }
        previous = Some(tok);
    }
    open.into_iter().rev().flatten().next()
}

// Text of the longest expression that parses completely before `position`,
// starting after the last comparison if there is one, else at the start.
fn last_complete<'s>(source: &'s str, tokens: &[Token], position: usize) -> Option<&'s str> {
    let after_compare = tokens
        .iter()
        .rev()
        .find(|t| t.end <= position && matches!(t.kind, TokenKind::Compare(_)))
        .map(|t| t.end);
    after_compare
        .into_iter()
        .chain([0])
        .find_map(|start| complete_prefix(source, start, position))
}

fn complete_prefix(source: &str, start: usize, position: usize) -> Option<&str> {
    let rest = source.get(start..)?;
    let offset = start + (rest.len() - rest.trim_start().len());
    let pair = DcpGrammar::parse(Rule::sum, &source[offset..]).ok()?.next()?;
    let end = offset + pair.as_span().end();
    (end > offset && end <= position).then(|| &source[offset..end])
}
