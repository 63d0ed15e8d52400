//! # dcpcheck
//!
//! Disciplined Convex Programming (DCP) analysis for a small expression
//! language.
//!
//! dcpcheck parses statements such as `a * square(x) <= log(y) + b`, builds
//! an annotated expression tree and reports, for every node, its curvature,
//! its sign and any composition that breaks the DCP rules.
//!
//! ## Quick Start
//!
//! ```
//! use dcpcheck::prelude::*;
//!
//! let mut parser = Parser::new();
//! parser.parse("variable x y").unwrap();
//! parser.parse("parameter positive a b").unwrap();
//!
//! let e = parser.parse("a * log(x) <= square(y) + b").unwrap().unwrap();
//! assert_eq!(e.violations().len(), 1);
//!
//! let lhs = &e.children()[0];
//! assert_eq!(lhs.curvature(), Curvature::Concave);
//! ```
//!
//! ## DCP Rules
//!
//! - An atom applied to arguments is certified when each argument's
//!   curvature agrees with the atom's monotonicity in that argument
//! - **Equality constraints** require **affine** sides
//! - `lhs <= rhs` requires a **convex** lhs and a **concave** rhs
//! - `lhs >= rhs` requires a **concave** lhs and a **convex** rhs
//!
//! Violations never abort parsing. They are attached to the node where the
//! composition fails, indexed by argument when one argument is to blame.
//!
//! ## Supported Atoms
//!
//! ### Convex
//! - Norms: `norm`, `norm1`, `norm2`, `norm_inf`, `abs`, `norm_largest`
//! - Powers: `square`, `square_abs`, `square_pos`, `pow_abs`, `pow_pos`,
//!   `inv_pos`, `quad_over_lin`, `sum_square`, `sum_square_abs`, `sum_square_pos`
//! - Penalties: `huber`, `berhu`, `huber_pos`, `huber_circ`, `pos`
//! - Other: `max`, `exp`, `log_sum_exp`, `kl_div`, `rel_entr`, `sum_largest`
//!
//! ### Concave
//! - `min`, `log`, `log_normcdf`, `entr`, `geo_mean`, `sqrt`, `sum_smallest`
//!
//! ### Affine
//! - `sum`, and `+`, `-`, `*` or `/` with a constant operand
//!
//! `pow(x, p)` is convex for p <= 0 or p > 1 and concave otherwise.

pub mod atoms;
pub mod constraints;
pub mod dcp;
pub mod error;
pub mod expr;
pub mod parser;

/// Prelude module for convenient imports.
///
/// ```
/// use dcpcheck::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        BinaryOp, ExprKind, Expression, PartitionedViolations, Precedence, Violation,
        ViolationKind,
    };

    // Atoms
    pub use crate::atoms::{
        abs, berhu, entr, exp, geo_mean, huber, huber_circ, huber_pos, inv_pos, kl_div, log,
        log_normcdf, log_sum_exp, max, min, norm, norm1, norm2, norm_inf, norm_largest, pos, pow,
        pow_abs, pow_pos, quad_over_lin, rel_entr, sqrt, square, square_abs, square_pos, sum,
        sum_largest, sum_smallest, sum_square, sum_square_abs, sum_square_pos, AtomKind,
        CallArgument, ParamValue,
    };

    // Constraints
    pub use crate::constraints::{ConstraintExt, Relation};

    // DCP
    pub use crate::dcp::{Curvature, Monotonicity, Sign};

    // Parser
    pub use crate::parser::{Parser, ParserSettings, SymbolTable};

    // Errors
    pub use crate::error::{DcpError, ParseError, ParseErrorKind, Result};
}

// Re-export main types at crate root
pub use error::{DcpError, ParseError, ParseErrorKind, Result};
pub use expr::Expression;
pub use parser::Parser;
