//! DCP violations attached to expression nodes.

use std::collections::BTreeMap;
use std::fmt;

use crate::constraints::Relation;
use crate::dcp::{Curvature, Monotonicity, Sign};

/// Why a composition is not DCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Composing a function of curvature `function` with an argument of
    /// curvature `argument` through `monotonicity` is not certifiable.
    MonotonicityMismatch {
        function: Curvature,
        monotonicity: Monotonicity,
        argument: Curvature,
    },
    /// A constraint relates sides whose curvatures the relation forbids.
    CurvatureMismatch {
        relation: Relation,
        lhs: Curvature,
        rhs: Curvature,
    },
    /// An argument's sign lies outside the function's domain.
    SignMismatch { required: Sign, actual: Sign },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MonotonicityMismatch {
                function,
                monotonicity,
                argument,
            } => write!(
                f,
                "cannot compose a {function} {monotonicity} function with a {argument} argument"
            ),
            ViolationKind::CurvatureMismatch { relation, lhs, rhs } => {
                write!(f, "cannot have '{lhs} {} {rhs}'", relation.symbol())
            }
            ViolationKind::SignMismatch { required, actual } => {
                write!(f, "expected a {required} argument, got {actual}")
            }
        }
    }
}

/// A DCP violation, attributed either to one argument or to a whole node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// Attributable to the argument at `index` of an application.
    Argument { index: usize, kind: ViolationKind },
    /// Attributable to the node as a whole.
    WholeExpression { kind: ViolationKind },
}

impl Violation {
    /// Violation against one argument.
    pub fn argument(index: usize, kind: ViolationKind) -> Self {
        Violation::Argument { index, kind }
    }

    /// Violation against the whole node.
    pub fn whole(kind: ViolationKind) -> Self {
        Violation::WholeExpression { kind }
    }

    /// The reason for the violation.
    pub fn kind(&self) -> &ViolationKind {
        match self {
            Violation::Argument { kind, .. } | Violation::WholeExpression { kind } => kind,
        }
    }

    /// Argument position, if the violation is indexed.
    pub fn index(&self) -> Option<usize> {
        match self {
            Violation::Argument { index, .. } => Some(*index),
            Violation::WholeExpression { .. } => None,
        }
    }

    /// Whether the violation points at one argument.
    pub fn is_indexed(&self) -> bool {
        self.index().is_some()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Argument { index, kind } => write!(f, "argument {index}: {kind}"),
            Violation::WholeExpression { kind } => write!(f, "{kind}"),
        }
    }
}

/// Violations of one node split by attribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedViolations<'a> {
    /// Indexed violations by argument position.
    pub indexed: BTreeMap<usize, Vec<&'a Violation>>,
    /// Whole-expression violations in attachment order.
    pub unsorted: Vec<&'a Violation>,
}

impl<'a> PartitionedViolations<'a> {
    /// Split violations by their own indexed/unindexed tag.
    pub fn from_violations(violations: &'a [Violation]) -> Self {
        let mut out = PartitionedViolations::default();
        for v in violations {
            match v.index() {
                Some(i) => out.indexed.entry(i).or_default().push(v),
                None => out.unsorted.push(v),
            }
        }
        out
    }
}
