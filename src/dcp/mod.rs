//! DCP (Disciplined Convex Programming) analysis.
//!
//! This module provides the core DCP algebra:
//! - Curvature tracking (constant, affine, convex, concave, non-convex)
//! - Sign tracking (positive, negative, zero, unknown)
//! - Monotonicity and the composition rule

pub mod curvature;
pub mod monotonicity;
pub mod sign;

pub use curvature::{add_curvature, mul_curvature, Curvature};
pub use monotonicity::{compose_arguments, Composition, Monotonicity};
pub use sign::{add_sign, mul_sign, Sign};
