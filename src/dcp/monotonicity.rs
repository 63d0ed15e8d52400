//! Monotonicity and the DCP composition rule.
//!
//! An atom `f(x1, ..., xn)` with curvature `c` composes with argument `xi`
//! through its monotonicity in that position. The overall curvature of the
//! application is the sum of the per-argument composed curvatures.

use std::fmt;

use super::curvature::Curvature;
use super::sign::Sign;
use crate::error::{DcpError, Result};

/// Monotonicity of a function in one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Monotonicity {
    /// Non-decreasing in the argument.
    Increasing,
    /// Non-increasing in the argument.
    Decreasing,
    /// Neither.
    Nonmonotonic,
}

impl Monotonicity {
    /// Monotonicity of functions akin to `|x|`: increasing for non-negative
    /// arguments, decreasing for negative ones, unknown otherwise.
    pub fn of_abs(sign: Sign) -> Self {
        match sign {
            Sign::Positive | Sign::Zero => Monotonicity::Increasing,
            Sign::Negative => Monotonicity::Decreasing,
            Sign::Unknown => Monotonicity::Nonmonotonic,
        }
    }

    /// Compose a function of curvature `outer` with an argument of curvature
    /// `inner` through this monotonicity.
    ///
    /// A function of a constant is constant, whatever its own curvature.
    pub fn dcp_curvature(self, outer: Curvature, inner: Curvature) -> Curvature {
        use Curvature::*;
        if inner.is_constant() {
            return Constant;
        }
        match outer {
            Constant => Constant,
            Nonconvex => Nonconvex,
            Affine => match self {
                Monotonicity::Increasing => inner,
                Monotonicity::Decreasing => inner.negate(),
                Monotonicity::Nonmonotonic if inner.is_affine() => inner,
                Monotonicity::Nonmonotonic => Nonconvex,
            },
            Convex => {
                let admissible = match self {
                    Monotonicity::Increasing => inner.is_convex(),
                    Monotonicity::Decreasing => inner.is_concave(),
                    Monotonicity::Nonmonotonic => inner.is_affine(),
                };
                if admissible {
                    Convex
                } else {
                    Nonconvex
                }
            }
            Concave => {
                let admissible = match self {
                    Monotonicity::Increasing => inner.is_concave(),
                    Monotonicity::Decreasing => inner.is_convex(),
                    Monotonicity::Nonmonotonic => inner.is_affine(),
                };
                if admissible {
                    Concave
                } else {
                    Nonconvex
                }
            }
        }
    }

    /// Monotonicity of `f(g(x))` in `x`, where `self` is `f` in `g` and
    /// `inner` is `g` in `x`.
    pub fn then(self, inner: Monotonicity) -> Self {
        use Monotonicity::*;
        match (self, inner) {
            (Nonmonotonic, _) | (_, Nonmonotonic) => Nonmonotonic,
            (Increasing, m) => m,
            (Decreasing, Increasing) => Decreasing,
            (Decreasing, Decreasing) => Increasing,
        }
    }

    /// Lower-case name for this monotonicity.
    pub fn name(self) -> &'static str {
        match self {
            Monotonicity::Increasing => "non-decreasing",
            Monotonicity::Decreasing => "non-increasing",
            Monotonicity::Nonmonotonic => "non-monotonic",
        }
    }
}

impl fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of composing an atom with all of its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Sum of the per-argument curvatures.
    pub curvature: Curvature,
    /// Composed curvature in each argument position.
    pub arguments: Vec<Curvature>,
    /// Positions where composition turned a certifiable argument non-convex.
    pub mismatches: Vec<usize>,
}

/// Apply the DCP composition rule to every argument of an atom.
///
/// Fails if there are no arguments or the monotonicity list does not line up
/// with the argument curvatures.
pub fn compose_arguments(
    outer: Curvature,
    monotonicities: &[Monotonicity],
    arguments: &[Curvature],
) -> Result<Composition> {
    if arguments.is_empty() || monotonicities.len() != arguments.len() {
        return Err(DcpError::Composition {
            monotonicities: monotonicities.len(),
            arguments: arguments.len(),
        });
    }

    let composed: Vec<Curvature> = monotonicities
        .iter()
        .zip(arguments)
        .map(|(m, &inner)| m.dcp_curvature(outer, inner))
        .collect();

    let mismatches = composed
        .iter()
        .zip(arguments)
        .enumerate()
        .filter(|(_, (c, inner))| c.is_nonconvex() && !inner.is_nonconvex())
        .map(|(i, _)| i)
        .collect();

    Ok(Composition {
        curvature: Curvature::sum(composed.iter().copied()),
        arguments: composed,
        mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Curvature::*;
    use Monotonicity::*;

    const ALL: [Curvature; 5] = [Constant, Affine, Convex, Concave, Nonconvex];

    #[test]
    fn test_affine_increasing_is_identity() {
        for c in ALL {
            assert_eq!(Increasing.dcp_curvature(Affine, c), c);
        }
    }

    #[test]
    fn test_affine_decreasing_reverses() {
        assert_eq!(Decreasing.dcp_curvature(Affine, Convex), Concave);
        assert_eq!(Decreasing.dcp_curvature(Affine, Concave), Convex);
        assert_eq!(Decreasing.dcp_curvature(Affine, Affine), Affine);
    }

    #[test]
    fn test_constant_and_nonconvex_outer() {
        for m in [Increasing, Decreasing, Nonmonotonic] {
            for c in ALL {
                assert_eq!(m.dcp_curvature(Constant, c), Constant);
            }
            for c in [Affine, Convex, Concave, Nonconvex] {
                assert_eq!(m.dcp_curvature(Nonconvex, c), Nonconvex);
            }
        }
    }

    #[test]
    fn test_convex_outer() {
        assert_eq!(Increasing.dcp_curvature(Convex, Convex), Convex);
        assert_eq!(Increasing.dcp_curvature(Convex, Concave), Nonconvex);
        assert_eq!(Decreasing.dcp_curvature(Convex, Concave), Convex);
        assert_eq!(Decreasing.dcp_curvature(Convex, Convex), Nonconvex);
        assert_eq!(Nonmonotonic.dcp_curvature(Convex, Affine), Convex);
        assert_eq!(Nonmonotonic.dcp_curvature(Convex, Convex), Nonconvex);
    }

    #[test]
    fn test_concave_outer() {
        assert_eq!(Increasing.dcp_curvature(Concave, Concave), Concave);
        assert_eq!(Increasing.dcp_curvature(Concave, Convex), Nonconvex);
        assert_eq!(Decreasing.dcp_curvature(Concave, Convex), Concave);
        assert_eq!(Nonmonotonic.dcp_curvature(Concave, Affine), Concave);
        assert_eq!(Nonmonotonic.dcp_curvature(Concave, Concave), Nonconvex);
    }

    #[test]
    fn test_abs_pattern() {
        assert_eq!(Monotonicity::of_abs(Sign::Positive), Increasing);
        assert_eq!(Monotonicity::of_abs(Sign::Zero), Increasing);
        assert_eq!(Monotonicity::of_abs(Sign::Negative), Decreasing);
        assert_eq!(Monotonicity::of_abs(Sign::Unknown), Nonmonotonic);
    }

    #[test]
    fn test_chain() {
        assert_eq!(Increasing.then(Decreasing), Decreasing);
        assert_eq!(Decreasing.then(Decreasing), Increasing);
        assert_eq!(Decreasing.then(Nonmonotonic), Nonmonotonic);
    }

    #[test]
    fn test_compose_arguments() {
        let c = compose_arguments(Convex, &[Increasing, Decreasing], &[Convex, Concave]).unwrap();
        assert_eq!(c.curvature, Convex);
        assert!(c.mismatches.is_empty());

        let c = compose_arguments(
            Concave,
            &[Nonmonotonic, Increasing, Decreasing],
            &[Constant, Convex, Affine],
        )
        .unwrap();
        assert_eq!(c.curvature, Nonconvex);
        assert_eq!(c.mismatches, vec![1]);

        let c = compose_arguments(Nonconvex, &[Increasing, Decreasing], &[Constant, Constant])
            .unwrap();
        assert_eq!(c.curvature, Constant);
    }

    #[test]
    fn test_constant_argument() {
        for outer in ALL {
            for m in [Increasing, Decreasing, Nonmonotonic] {
                assert_eq!(m.dcp_curvature(outer, Constant), Constant);
            }
        }
    }

    #[test]
    fn test_nonconvex_argument_is_not_a_mismatch() {
        let c = compose_arguments(Convex, &[Increasing], &[Nonconvex]).unwrap();
        assert_eq!(c.curvature, Nonconvex);
        assert!(c.mismatches.is_empty());
    }

    #[test]
    fn test_compose_requires_arguments() {
        assert!(compose_arguments(Convex, &[], &[]).is_err());
        assert!(compose_arguments(Convex, &[Increasing], &[Affine, Affine]).is_err());
    }
}
