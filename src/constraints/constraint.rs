//! Constraints between two expressions.
//!
//! DCP rules for constraints:
//! - `lhs == rhs`: both sides affine
//! - `lhs <= rhs`: lhs convex, rhs concave
//! - `lhs >= rhs`: lhs concave, rhs convex
//!
//! A constraint that breaks these rules is still built; it carries one
//! whole-expression violation.

use std::fmt;

use crate::dcp::{Curvature, Sign};
use crate::expr::{Expression, ExprKind, Precedence, Violation, ViolationKind};

/// Comparison relation of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `==`
    Eq,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
}

impl Relation {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "==",
            Relation::Leq => "<=",
            Relation::Geq => ">=",
        }
    }

    /// Check whether sides of the given curvatures may be related.
    pub fn admits(self, lhs: Curvature, rhs: Curvature) -> bool {
        match self {
            Relation::Eq => lhs.is_affine() && rhs.is_affine(),
            Relation::Leq => lhs.is_convex() && rhs.is_concave(),
            Relation::Geq => lhs.is_concave() && rhs.is_convex(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expression {
    /// Build a constraint node: lhs relation rhs.
    ///
    /// Curvature and sign are those of `lhs - rhs`.
    pub fn constraint(lhs: Expression, relation: Relation, rhs: Expression) -> Self {
        let curvature = Curvature::sum([lhs.curvature(), rhs.curvature().negate()]);
        let sign = Sign::sum([lhs.sign(), rhs.sign().negate()]);

        let mut violations = Vec::new();
        if !relation.admits(lhs.curvature(), rhs.curvature()) {
            violations.push(Violation::whole(ViolationKind::CurvatureMismatch {
                relation,
                lhs: lhs.curvature(),
                rhs: rhs.curvature(),
            }));
        }

        Expression {
            kind: ExprKind::Constraint(relation),
            curvature,
            sign,
            text: format!("{} {} {}", lhs.text(), relation.symbol(), rhs.text()),
            children: vec![lhs, rhs],
            monotonicity: None,
            violations,
            short_name: None,
            precedence: Precedence::Constraint,
        }
    }

    /// The relation, if this node is a constraint.
    pub fn relation(&self) -> Option<Relation> {
        match self.kind() {
            ExprKind::Constraint(r) => Some(*r),
            _ => None,
        }
    }
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(&self, rhs: &Expression) -> Expression;

    /// Create inequality constraint: self <= rhs.
    fn leq(&self, rhs: &Expression) -> Expression;

    /// Create inequality constraint: self >= rhs.
    fn geq(&self, rhs: &Expression) -> Expression;
}

impl ConstraintExt for Expression {
    fn equals(&self, rhs: &Expression) -> Expression {
        Expression::constraint(self.clone(), Relation::Eq, rhs.clone())
    }

    fn leq(&self, rhs: &Expression) -> Expression {
        Expression::constraint(self.clone(), Relation::Leq, rhs.clone())
    }

    fn geq(&self, rhs: &Expression) -> Expression {
        Expression::constraint(self.clone(), Relation::Geq, rhs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convex() -> Expression {
        Expression::opaque("f", Curvature::Convex, Sign::Positive)
    }

    fn concave() -> Expression {
        Expression::opaque("g", Curvature::Concave, Sign::Unknown)
    }

    #[test]
    fn test_equality_constraint() {
        let x = Expression::variable("x");
        let c = Expression::constant(1.0);
        let constr = x.equals(&c);

        assert!(constr.violations().is_empty());
        assert_eq!(constr.relation(), Some(Relation::Eq));
        assert_eq!(constr.text(), "x == 1");
        assert_eq!(constr.curvature(), Curvature::Affine);
    }

    #[test]
    fn test_inequality_constraints() {
        assert!(convex().leq(&concave()).violations().is_empty());
        assert!(concave().geq(&convex()).violations().is_empty());
        assert_eq!(concave().leq(&convex()).violations().len(), 1);
        assert_eq!(convex().geq(&concave()).violations().len(), 1);
    }

    #[test]
    fn test_non_dcp_constraint_keeps_annotations() {
        let constr = convex().equals(&Expression::variable("x"));
        assert_eq!(constr.violations().len(), 1);
        assert!(!constr.violations()[0].is_indexed());
        assert_eq!(constr.curvature(), Curvature::Convex);
        assert_eq!(constr.sign(), Sign::Unknown);
        assert_eq!(constr.children().len(), 2);
    }

    #[test]
    fn test_constant_sides() {
        let one = Expression::constant(1.0);
        for r in [Relation::Eq, Relation::Leq, Relation::Geq] {
            assert!(r.admits(Curvature::Constant, Curvature::Affine));
        }
        assert!(one.leq(&one).violations().is_empty());
    }
}
