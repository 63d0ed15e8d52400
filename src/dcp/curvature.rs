//! Curvature tracking for DCP (Disciplined Convex Programming).
//!
//! This module implements the curvature lattice that determines whether an
//! expression is constant, affine, convex, concave, or not provably either.

use std::fmt;

use super::sign::Sign;

/// Curvature of an expression.
///
/// The values form a lattice: `Constant ⊑ Affine ⊑ Convex`,
/// `Affine ⊑ Concave`, and `Nonconvex` is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curvature {
    /// Constant value (most restrictive).
    Constant,
    /// Affine function (both convex and concave).
    Affine,
    /// Convex function.
    Convex,
    /// Concave function.
    Concave,
    /// Not provably convex or concave under the DCP rules.
    Nonconvex,
}

impl Curvature {
    /// Check if the curvature is convex (constant, affine, or convex).
    pub fn is_convex(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Convex)
    }

    /// Check if the curvature is concave (constant, affine, or concave).
    pub fn is_concave(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine | Curvature::Concave)
    }

    /// Check if the curvature is affine (constant or affine).
    pub fn is_affine(self) -> bool {
        matches!(self, Curvature::Constant | Curvature::Affine)
    }

    /// Check if this is a constant.
    pub fn is_constant(self) -> bool {
        matches!(self, Curvature::Constant)
    }

    /// Check if this is the top of the lattice.
    pub fn is_nonconvex(self) -> bool {
        matches!(self, Curvature::Nonconvex)
    }

    /// Lattice order: `self ⊑ other`.
    pub fn leq(self, other: Curvature) -> bool {
        match other {
            Curvature::Constant => self.is_constant(),
            Curvature::Affine => self.is_affine(),
            Curvature::Convex => self.is_convex(),
            Curvature::Concave => self.is_concave(),
            Curvature::Nonconvex => true,
        }
    }

    /// Negate the curvature (convex <-> concave).
    pub fn negate(self) -> Self {
        match self {
            Curvature::Convex => Curvature::Concave,
            Curvature::Concave => Curvature::Convex,
            other => other,
        }
    }

    /// Curvature of a sum of terms. An empty sum is constant.
    pub fn sum<I>(curvatures: I) -> Self
    where
        I: IntoIterator<Item = Curvature>,
    {
        curvatures
            .into_iter()
            .fold(Curvature::Constant, add_curvature)
    }

    /// Scale by a constant factor of the given sign.
    ///
    /// A zero factor collapses to `Constant`; a negative factor negates.
    /// A factor of unknown sign leaves the curvature unchanged.
    pub fn scale(self, factor: Sign) -> Self {
        match factor {
            Sign::Zero => Curvature::Constant,
            Sign::Negative => self.negate(),
            Sign::Positive | Sign::Unknown => self,
        }
    }

    /// Lower-case name for this curvature.
    pub fn name(self) -> &'static str {
        match self {
            Curvature::Constant => "constant",
            Curvature::Affine => "affine",
            Curvature::Convex => "convex",
            Curvature::Concave => "concave",
            Curvature::Nonconvex => "non-convex",
        }
    }
}

impl fmt::Display for Curvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combine curvatures for addition: a + b.
pub fn add_curvature(a: Curvature, b: Curvature) -> Curvature {
    use Curvature::*;
    match (a, b) {
        // Constants don't affect curvature
        (Constant, x) | (x, Constant) => x,
        (Affine, Affine) => Affine,
        // Unknown propagates
        (Nonconvex, _) | (_, Nonconvex) => Nonconvex,
        // Affine doesn't affect non-constant curvature
        (Affine, x) | (x, Affine) => x,
        (Convex, Convex) => Convex,
        (Concave, Concave) => Concave,
        (Convex, Concave) | (Concave, Convex) => Nonconvex,
    }
}

/// Curvature of a product or quotient of two terms.
///
/// Only a constant factor preserves curvature: with exactly one constant
/// operand the other operand's curvature is scaled by the constant's sign.
/// A product of two non-constant terms is never certifiable.
pub fn mul_curvature(a: (Curvature, Sign), b: (Curvature, Sign)) -> Curvature {
    match (a.0.is_constant(), b.0.is_constant()) {
        (true, true) => Curvature::Constant,
        (true, false) => b.0.scale(a.1),
        (false, true) => a.0.scale(b.1),
        (false, false) => Curvature::Nonconvex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Curvature; 5] = [
        Curvature::Constant,
        Curvature::Affine,
        Curvature::Convex,
        Curvature::Concave,
        Curvature::Nonconvex,
    ];

    #[test]
    fn test_curvature_basics() {
        assert!(Curvature::Constant.is_convex());
        assert!(Curvature::Constant.is_concave());
        assert!(Curvature::Constant.is_affine());

        assert!(Curvature::Affine.is_convex());
        assert!(Curvature::Affine.is_concave());
        assert!(Curvature::Affine.is_affine());

        assert!(Curvature::Convex.is_convex());
        assert!(!Curvature::Convex.is_concave());
        assert!(!Curvature::Convex.is_affine());

        assert!(!Curvature::Concave.is_convex());
        assert!(Curvature::Concave.is_concave());
        assert!(!Curvature::Concave.is_affine());

        assert!(!Curvature::Nonconvex.is_convex());
        assert!(!Curvature::Nonconvex.is_concave());
    }

    #[test]
    fn test_lattice_order() {
        assert!(Curvature::Constant.leq(Curvature::Concave));
        assert!(Curvature::Affine.leq(Curvature::Convex));
        assert!(!Curvature::Convex.leq(Curvature::Concave));
        assert!(!Curvature::Concave.leq(Curvature::Convex));
        for c in ALL {
            assert!(c.leq(Curvature::Nonconvex));
            assert!(c.leq(c));
        }
    }

    #[test]
    fn test_negate_curvature() {
        assert_eq!(Curvature::Convex.negate(), Curvature::Concave);
        assert_eq!(Curvature::Concave.negate(), Curvature::Convex);
        assert_eq!(Curvature::Affine.negate(), Curvature::Affine);
        assert_eq!(Curvature::Constant.negate(), Curvature::Constant);
        assert_eq!(Curvature::Nonconvex.negate(), Curvature::Nonconvex);
    }

    #[test]
    fn test_scale_curvature() {
        for c in ALL {
            assert_eq!(c.scale(Sign::Zero), Curvature::Constant);
            assert_eq!(c.scale(Sign::Positive), c);
            assert_eq!(c.scale(Sign::Unknown), c);
            assert_eq!(c.scale(Sign::Negative), c.negate());
        }
    }

    #[test]
    fn test_add_curvature() {
        use Curvature::*;
        assert_eq!(add_curvature(Convex, Convex), Convex);
        assert_eq!(add_curvature(Concave, Concave), Concave);
        assert_eq!(add_curvature(Affine, Affine), Affine);
        assert_eq!(add_curvature(Convex, Affine), Convex);
        assert_eq!(add_curvature(Concave, Affine), Concave);
        assert_eq!(add_curvature(Convex, Concave), Nonconvex);
        assert_eq!(add_curvature(Nonconvex, Constant), Nonconvex);
    }

    #[test]
    fn test_sum_with_nonconvex_is_nonconvex() {
        for a in ALL {
            for b in ALL {
                assert_eq!(
                    Curvature::sum([a, Curvature::Nonconvex, b]),
                    Curvature::Nonconvex
                );
            }
        }
    }

    #[test]
    fn test_sum_of_one_is_identity() {
        for c in ALL {
            assert_eq!(Curvature::sum([c]), c);
        }
    }

    #[test]
    fn test_sum_picks_least_upper_bound() {
        use Curvature::*;
        assert_eq!(Curvature::sum([Constant, Constant]), Constant);
        assert_eq!(Curvature::sum([Constant, Affine, Constant]), Affine);
        assert_eq!(Curvature::sum([Affine, Convex, Constant]), Convex);
        assert_eq!(Curvature::sum([Concave, Affine]), Concave);
        assert_eq!(Curvature::sum([Concave, Convex]), Nonconvex);
    }

    #[test]
    fn test_mul_curvature() {
        use Curvature::*;
        assert_eq!(
            mul_curvature((Constant, Sign::Negative), (Convex, Sign::Unknown)),
            Concave
        );
        assert_eq!(
            mul_curvature((Concave, Sign::Unknown), (Constant, Sign::Positive)),
            Concave
        );
        assert_eq!(
            mul_curvature((Constant, Sign::Zero), (Nonconvex, Sign::Unknown)),
            Constant
        );
        assert_eq!(
            mul_curvature((Affine, Sign::Unknown), (Affine, Sign::Unknown)),
            Nonconvex
        );
        assert_eq!(
            mul_curvature((Constant, Sign::Positive), (Constant, Sign::Negative)),
            Constant
        );
    }
}
