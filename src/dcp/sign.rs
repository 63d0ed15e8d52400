//! Sign tracking for DCP (Disciplined Convex Programming).
//!
//! This module tracks whether expressions are positive, negative, zero, or
//! have unknown sign. Sign information drives the sign-dependent monotonicity
//! of atoms such as `abs` and `pos`.

use std::fmt;

/// Sign of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Expression is always >= 0 (and not known to be zero).
    Positive,
    /// Expression is always <= 0 (and not known to be zero).
    Negative,
    /// Expression is always == 0.
    Zero,
    /// Sign is unknown.
    Unknown,
}

impl Sign {
    /// Sign of a numeric literal.
    pub fn of_value(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else if value == 0.0 {
            Sign::Zero
        } else {
            Sign::Unknown
        }
    }

    /// Check if the sign is non-negative (>= 0).
    pub fn is_nonnegative(self) -> bool {
        matches!(self, Sign::Positive | Sign::Zero)
    }

    /// Check if the sign is non-positive (<= 0).
    ///
    /// `Unknown` is not non-positive.
    pub fn is_nonpositive(self) -> bool {
        matches!(self, Sign::Negative | Sign::Zero)
    }

    /// Check if the sign is zero.
    pub fn is_zero(self) -> bool {
        matches!(self, Sign::Zero)
    }

    /// Negate the sign.
    pub fn negate(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Unknown => Sign::Unknown,
        }
    }

    /// Sign of a sum of terms.
    pub fn sum<I>(signs: I) -> Self
    where
        I: IntoIterator<Item = Sign>,
    {
        let mut all_nonneg = true;
        let mut all_nonpos = true;
        let mut all_zero = true;

        for s in signs {
            all_nonneg &= s.is_nonnegative();
            all_nonpos &= s.is_nonpositive();
            all_zero &= s.is_zero();
        }

        if all_zero {
            Sign::Zero
        } else if all_nonneg {
            Sign::Positive
        } else if all_nonpos {
            Sign::Negative
        } else {
            Sign::Unknown
        }
    }

    /// Sign of a product (or quotient) of two terms.
    pub fn mul(self, other: Sign) -> Self {
        use Sign::*;
        match (self, other) {
            // Zero times anything is zero
            (Zero, _) | (_, Zero) => Zero,
            (Positive, Positive) | (Negative, Negative) => Positive,
            (Positive, Negative) | (Negative, Positive) => Negative,
            (Unknown, _) | (_, Unknown) => Unknown,
        }
    }

    /// Sign of the largest of several terms.
    ///
    /// Zero counts as positive before ranking.
    pub fn max_of<I>(signs: I) -> Self
    where
        I: IntoIterator<Item = Sign>,
    {
        signs
            .into_iter()
            .map(|s| if s.is_zero() { Sign::Positive } else { s })
            .max_by_key(|s| s.extremal_rank())
            .unwrap_or(Sign::Unknown)
    }

    /// Sign of the smallest of several terms.
    ///
    /// Zero counts as negative before ranking.
    pub fn min_of<I>(signs: I) -> Self
    where
        I: IntoIterator<Item = Sign>,
    {
        signs
            .into_iter()
            .map(|s| if s.is_zero() { Sign::Negative } else { s })
            .min_by_key(|s| s.extremal_rank())
            .unwrap_or(Sign::Unknown)
    }

    // Negative < Unknown < Positive. Zero is substituted before ranking.
    fn extremal_rank(self) -> u8 {
        match self {
            Sign::Negative => 0,
            Sign::Unknown | Sign::Zero => 1,
            Sign::Positive => 2,
        }
    }

    /// Lower-case keyword for this sign.
    pub fn name(self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
            Sign::Zero => "zero",
            Sign::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combine signs for addition: a + b.
pub fn add_sign(a: Sign, b: Sign) -> Sign {
    Sign::sum([a, b])
}

/// Combine signs for multiplication: a * b.
pub fn mul_sign(a: Sign, b: Sign) -> Sign {
    a.mul(b)
}
