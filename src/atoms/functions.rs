//! Free-function constructors for every library function.
//!
//! These build the same nodes the parser builds for the corresponding call
//! text. Parameters are passed as plain numbers and rendered in the call
//! text; `f64::INFINITY` is rendered as `Inf`.

use crate::error::Result;
use crate::expr::Expression;

use super::application::{apply, CallArgument};
use super::kind::{AtomKind, Function};
use super::parameter::ParamValue;

fn call(kind: AtomKind, args: Vec<Expression>, parameter: Option<f64>) -> Result<Expression> {
    call_function(&Function::new(kind), args, parameter)
}

fn call_function(
    function: &Function,
    args: Vec<Expression>,
    parameter: Option<f64>,
) -> Result<Expression> {
    let mut call: Vec<CallArgument> = args.into_iter().map(CallArgument::from).collect();
    match parameter {
        Some(p) if p == f64::INFINITY => call.push(CallArgument::Infinity),
        Some(p) => call.push(Expression::constant(p).into()),
        None => {}
    }
    apply(function, call)
}

fn unary(kind: AtomKind, x: &Expression) -> Result<Expression> {
    call(kind, vec![x.clone()], None)
}

// ============================================================================
// Aggregates
// ============================================================================

/// Sum of the arguments. Affine, increasing in each.
pub fn sum(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::Sum, args, None)
}

/// Largest argument. Convex, increasing in each.
pub fn max(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::Max, args, None)
}

/// Smallest argument. Concave, increasing in each.
pub fn min(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::Min, args, None)
}

/// log(sum(exp(x_i))). Convex, increasing.
pub fn log_sum_exp(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::LogSumExp, args, None)
}

/// Sum of the `k` largest arguments.
pub fn sum_largest(args: Vec<Expression>, k: f64) -> Result<Expression> {
    call(AtomKind::SumLargest, args, Some(k))
}

/// Sum of the `k` smallest arguments.
pub fn sum_smallest(args: Vec<Expression>, k: f64) -> Result<Expression> {
    call(AtomKind::SumSmallest, args, Some(k))
}

/// Geometric mean. Concave, increasing; arguments must be nonnegative.
pub fn geo_mean(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::GeoMean, args, None)
}

// ============================================================================
// Logs and exponentials
// ============================================================================

/// Natural logarithm. Concave, increasing; the argument must be positive.
pub fn log(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Log, x)
}

/// Exponential. Convex, positive, increasing.
pub fn exp(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Exp, x)
}

/// Log of the standard normal CDF. Concave, increasing.
pub fn log_normcdf(x: &Expression) -> Result<Expression> {
    unary(AtomKind::LogNormcdf, x)
}

/// Entropy -x log x. Concave, nonmonotonic.
pub fn entr(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Entr, x)
}

/// KL divergence x log(x/y) - x + y. Convex.
pub fn kl_div(x: &Expression, y: &Expression) -> Result<Expression> {
    call(AtomKind::KlDiv, vec![x.clone(), y.clone()], None)
}

/// Relative entropy x log(x/y). Convex.
pub fn rel_entr(x: &Expression, y: &Expression) -> Result<Expression> {
    call(AtomKind::RelEntr, vec![x.clone(), y.clone()], None)
}

// ============================================================================
// Powers
// ============================================================================

/// x^2.
pub fn square(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Square, x)
}

/// |x|^2.
pub fn square_abs(x: &Expression) -> Result<Expression> {
    unary(AtomKind::SquareAbs, x)
}

/// max(x, 0)^2.
pub fn square_pos(x: &Expression) -> Result<Expression> {
    unary(AtomKind::SquarePos, x)
}

/// Square root. Concave, increasing.
pub fn sqrt(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Sqrt, x)
}

/// x^p. Curvature depends on the regime of `p`.
pub fn pow(x: &Expression, p: f64) -> Result<Expression> {
    call(AtomKind::Pow, vec![x.clone()], Some(p))
}

/// |x|^p for p >= 1.
pub fn pow_abs(x: &Expression, p: f64) -> Result<Expression> {
    call(AtomKind::PowAbs, vec![x.clone()], Some(p))
}

/// max(x, 0)^p for p >= 1.
pub fn pow_pos(x: &Expression, p: f64) -> Result<Expression> {
    call(AtomKind::PowPos, vec![x.clone()], Some(p))
}

/// 1/x for positive x. Convex, decreasing.
pub fn inv_pos(x: &Expression) -> Result<Expression> {
    unary(AtomKind::InvPos, x)
}

/// Sum of squares of the numerator arguments over the last (positive)
/// argument.
pub fn quad_over_lin(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::QuadOverLin, args, None)
}

/// Sum of squares.
pub fn sum_square(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::SumSquare, args, None)
}

/// Sum of squared magnitudes.
pub fn sum_square_abs(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::SumSquareAbs, args, None)
}

/// Sum of squared positive parts.
pub fn sum_square_pos(args: Vec<Expression>) -> Result<Expression> {
    call(AtomKind::SumSquarePos, args, None)
}

// ============================================================================
// Norms
// ============================================================================

/// p-norm for p >= 1 or `f64::INFINITY`.
///
/// # Example
///
/// ```
/// use dcpcheck::prelude::*;
///
/// let x = Expression::variable("x");
/// let n = norm(vec![x], 2.0).unwrap();
/// assert_eq!(n.text(), "norm(x, 2)");
/// assert_eq!(n.curvature(), Curvature::Convex);
/// ```
pub fn norm(args: Vec<Expression>, p: f64) -> Result<Expression> {
    call(AtomKind::Norm, args, Some(p))
}

fn norm_alias(name: &'static str, value: ParamValue, args: Vec<Expression>) -> Result<Expression> {
    let function = Function {
        kind: AtomKind::Norm,
        name,
        fixed: Some(value),
    };
    call_function(&function, args, None)
}

/// L1 norm.
pub fn norm1(args: Vec<Expression>) -> Result<Expression> {
    norm_alias("norm1", ParamValue::Number(1.0), args)
}

/// L2 norm.
pub fn norm2(args: Vec<Expression>) -> Result<Expression> {
    norm_alias("norm2", ParamValue::Number(2.0), args)
}

/// Infinity norm.
pub fn norm_inf(args: Vec<Expression>) -> Result<Expression> {
    norm_alias("norm_inf", ParamValue::Infinity, args)
}

/// Absolute value.
pub fn abs(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Abs, x)
}

/// Sum of the `k` largest magnitudes.
pub fn norm_largest(args: Vec<Expression>, k: f64) -> Result<Expression> {
    call(AtomKind::NormLargest, args, Some(k))
}

/// Positive part max(x, 0).
pub fn pos(x: &Expression) -> Result<Expression> {
    unary(AtomKind::Pos, x)
}

// ============================================================================
// Huber family
// ============================================================================

/// Huber penalty with threshold `m`.
pub fn huber(x: &Expression, m: f64) -> Result<Expression> {
    call(AtomKind::Huber, vec![x.clone()], Some(m))
}

/// Reverse Huber penalty with threshold `m`.
pub fn berhu(x: &Expression, m: f64) -> Result<Expression> {
    call(AtomKind::Berhu, vec![x.clone()], Some(m))
}

/// One-sided Huber penalty with threshold `m`.
pub fn huber_pos(x: &Expression, m: f64) -> Result<Expression> {
    call(AtomKind::HuberPos, vec![x.clone()], Some(m))
}

/// Huber penalty of the Euclidean norm of the arguments.
pub fn huber_circ(args: Vec<Expression>, m: f64) -> Result<Expression> {
    call(AtomKind::HuberCirc, args, Some(m))
}
