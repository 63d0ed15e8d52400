//! Expression types.
//!
//! This module provides the annotated expression tree:
//! - `Expression` - an immutable node with curvature, sign and text
//! - `Violation` - DCP violations attached to nodes
//! - Operator overloading for building trees programmatically

pub mod expression;
pub mod operators;
pub mod violation;

// Re-export main types
pub use expression::{BinaryOp, ExprKind, Expression, Precedence};
pub use violation::{PartitionedViolations, Violation, ViolationKind};
