//! Core expression type for dcpcheck.
//!
//! An [`Expression`] is an immutable, annotated node. Curvature and sign are
//! computed once, when the node is built, from the node's children. Children
//! are owned by their parent; there is no sharing between trees.

use std::fmt;

use crate::atoms::AtomCall;
use crate::constraints::Relation;
use crate::dcp::{add_curvature, add_sign, mul_curvature, mul_sign, Curvature, Monotonicity, Sign};

use super::violation::{PartitionedViolations, Violation};

/// Binding strength of the construct that produced a node.
///
/// Only used to decide where parentheses are needed when rendering text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// `==`, `<=`, `>=`
    Constraint,
    /// `+`, `-`
    Additive,
    /// `*`, `/`
    Multiplicative,
    /// Unary minus.
    Unary,
    /// Leaves, calls and parenthesized groups.
    Atomic,
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Binding strength.
    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Mul | BinaryOp::Div => Precedence::Multiplicative,
        }
    }
}

/// What produced a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A numeric literal.
    Literal(f64),
    /// A declared variable.
    Variable,
    /// A declared parameter.
    Parameter,
    /// A leaf with caller-supplied curvature and sign.
    Opaque,
    /// Unary negation.
    Neg,
    /// Binary arithmetic.
    Binary(BinaryOp),
    /// Application of a library function.
    Atom(Box<AtomCall>),
    /// A constraint between two sides.
    Constraint(Relation),
}

/// An annotated expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) kind: ExprKind,
    pub(crate) curvature: Curvature,
    pub(crate) sign: Sign,
    pub(crate) text: String,
    pub(crate) children: Vec<Expression>,
    pub(crate) monotonicity: Option<Vec<Monotonicity>>,
    pub(crate) violations: Vec<Violation>,
    pub(crate) short_name: Option<String>,
    pub(crate) precedence: Precedence,
}

impl Expression {
    fn leaf(kind: ExprKind, curvature: Curvature, sign: Sign, text: String) -> Self {
        Expression {
            kind,
            curvature,
            sign,
            text,
            children: Vec::new(),
            monotonicity: None,
            violations: Vec::new(),
            short_name: None,
            precedence: Precedence::Atomic,
        }
    }

    /// A numeric literal, keeping its source spelling.
    pub fn literal(value: f64, text: impl Into<String>) -> Self {
        Self::leaf(
            ExprKind::Literal(value),
            Curvature::Constant,
            Sign::of_value(value),
            text.into(),
        )
    }

    /// A numeric constant rendered in its shortest form.
    pub fn constant(value: f64) -> Self {
        let mut c = Self::literal(value, format!("{value}"));
        if value < 0.0 {
            c.precedence = Precedence::Unary;
        }
        c
    }

    /// A variable: affine, unknown sign.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::leaf(
            ExprKind::Variable,
            Curvature::Affine,
            Sign::Unknown,
            name.into(),
        )
    }

    /// A parameter: constant, with a declared sign.
    pub fn parameter(name: impl Into<String>, sign: Sign) -> Self {
        Self::leaf(ExprKind::Parameter, Curvature::Constant, sign, name.into())
    }

    /// A leaf standing for an arbitrary sub-expression of known curvature
    /// and sign.
    pub fn opaque(name: impl Into<String>, curvature: Curvature, sign: Sign) -> Self {
        Self::leaf(ExprKind::Opaque, curvature, sign, name.into())
    }

    /// Unary negation: -a
    pub fn neg(operand: Expression) -> Self {
        let text = format!("-{}", operand_text(&operand, Precedence::Unary));
        Expression {
            kind: ExprKind::Neg,
            curvature: operand.curvature.negate(),
            sign: operand.sign.negate(),
            text,
            children: vec![operand],
            monotonicity: None,
            violations: Vec::new(),
            short_name: None,
            precedence: Precedence::Unary,
        }
    }

    /// Binary arithmetic: lhs op rhs
    ///
    /// Products and quotients of two non-constant operands are
    /// non-convex; no violation is attached here.
    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        let (curvature, sign) = match op {
            BinaryOp::Add => (
                add_curvature(lhs.curvature, rhs.curvature),
                add_sign(lhs.sign, rhs.sign),
            ),
            BinaryOp::Sub => (
                add_curvature(lhs.curvature, rhs.curvature.negate()),
                add_sign(lhs.sign, rhs.sign.negate()),
            ),
            BinaryOp::Mul | BinaryOp::Div => (
                mul_curvature((lhs.curvature, lhs.sign), (rhs.curvature, rhs.sign)),
                mul_sign(lhs.sign, rhs.sign),
            ),
        };

        let prec = op.precedence();
        let text = format!(
            "{} {} {}",
            operand_text(&lhs, prec),
            op.symbol(),
            right_operand_text(&rhs, prec)
        );

        Expression {
            kind: ExprKind::Binary(op),
            curvature,
            sign,
            text,
            children: vec![lhs, rhs],
            monotonicity: None,
            violations: Vec::new(),
            short_name: None,
            precedence: prec,
        }
    }

    /// This node wrapped in parentheses.
    ///
    /// The result is the same node with bracketed text and atomic precedence;
    /// the tree gains no extra level.
    pub fn parenthesized(self) -> Self {
        Expression {
            text: format!("({})", self.text),
            precedence: Precedence::Atomic,
            ..self
        }
    }

    /// Get the curvature of this expression.
    pub fn curvature(&self) -> Curvature {
        self.curvature
    }

    /// Get the sign of this expression.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Canonical text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sub-expressions in order. For a function application these are the
    /// arguments the user wrote.
    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    /// Monotonicity in each argument; `None` unless this is an application.
    pub fn monotonicity(&self) -> Option<&[Monotonicity]> {
        self.monotonicity.as_deref()
    }

    /// Violations attached to this node (not its descendants).
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Display name: the function name for applications, else the text.
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.text)
    }

    /// What produced this node.
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Binding strength of the construct that produced this node.
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// The application record, if this node is a function application.
    pub fn atom(&self) -> Option<&AtomCall> {
        match &self.kind {
            ExprKind::Atom(call) => Some(call),
            _ => None,
        }
    }

    /// Numeric value of a literal or a negated literal.
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Literal(v) => Some(*v),
            ExprKind::Neg => match self.children.first().map(|c| &c.kind) {
                Some(ExprKind::Literal(v)) => Some(-*v),
                _ => None,
            },
            _ => None,
        }
    }

    /// Check if this expression is convex.
    pub fn is_convex(&self) -> bool {
        self.curvature.is_convex()
    }

    /// Check if this expression is concave.
    pub fn is_concave(&self) -> bool {
        self.curvature.is_concave()
    }

    /// Check if this expression is affine.
    pub fn is_affine(&self) -> bool {
        self.curvature.is_affine()
    }

    /// True if neither this node nor any descendant carries a violation.
    pub fn is_dcp(&self) -> bool {
        self.violations.is_empty() && self.children.iter().all(Expression::is_dcp)
    }

    /// Split this node's violations into indexed and unsorted groups.
    pub fn partition_violations(&self) -> PartitionedViolations<'_> {
        PartitionedViolations::from_violations(&self.violations)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn operand_text(child: &Expression, min: Precedence) -> String {
    if child.precedence < min {
        format!("({})", child.text)
    } else {
        child.text.clone()
    }
}

// Right operands bind one level tighter: a - (b - c) keeps its parentheses.
pub(crate) fn right_operand_text(child: &Expression, min: Precedence) -> String {
    if child.precedence <= min {
        format!("({})", child.text)
    } else {
        child.text.clone()
    }
}
