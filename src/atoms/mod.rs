//! The atom library.
//!
//! Atoms are the functions an expression may call. Each one is known by:
//!
//! - **Curvature**: convex, concave or affine as a function of its inputs
//! - **Sign**: derived from the signs of its inputs
//! - **Monotonicity**: per argument, possibly depending on argument signs
//!
//! Composite functions such as `square` or `sum_square_pos` are expanded
//! into nested applications of simpler atoms and evaluated as such.

pub mod application;
pub mod functions;
pub mod kind;
pub mod parameter;
pub(crate) mod rules;

pub use application::{apply, ArgSource, AtomCall, CallArgument, EvaluationArg};
pub use kind::{lookup, Arity, AtomKind, Function};
pub use parameter::{ParamValue, Parameter, ParameterSpec};

pub use functions::{
    abs, berhu, entr, exp, geo_mean, huber, huber_circ, huber_pos, inv_pos, kl_div, log,
    log_normcdf, log_sum_exp, max, min, norm, norm1, norm2, norm_inf, norm_largest, pos, pow,
    pow_abs, pow_pos, quad_over_lin, rel_entr, sqrt, square, square_abs, square_pos, sum,
    sum_largest, sum_smallest, sum_square, sum_square_abs, sum_square_pos,
};
