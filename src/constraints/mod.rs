//! Constraint construction and DCP validity checks.

pub mod constraint;

pub use constraint::{ConstraintExt, Relation};
