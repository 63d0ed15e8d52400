//! Curvature, sign and monotonicity rules of the primitive atoms.
//!
//! Composite functions (`square`, `pow_abs`, `sum_square_pos`,
//! `huber_circ`, ...) are not given rules of their own. Each one is
//! expanded into a [`Stage`] tree over the primitives below and evaluated
//! bottom-up, so its verdict is whatever the primitive rules produce.

use crate::dcp::{Curvature, Monotonicity, Sign};
use crate::error::{DcpError, Result};
use crate::expr::ViolationKind;

use super::kind::AtomKind;
use super::parameter::ParamValue;

/// An atom with its own rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Primitive {
    Sum,
    Max,
    Min,
    LogSumExp,
    Log,
    Exp,
    LogNormcdf,
    /// `pos` and `huber_pos`.
    PositivePart,
    /// `norm` and `abs`.
    Norm,
    NormLargest,
    /// `huber` and `berhu`.
    Huber,
    Entr,
    InvPos,
    /// `kl_div` and `rel_entr`.
    Divergence,
    /// `geo_mean` and `sqrt`.
    GeoMean,
    Pow(f64),
    QuadOverLin,
    SumLargest,
    SumSmallest,
}

/// What a primitive says about one application.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rule {
    pub sign: Sign,
    pub curvature: Curvature,
    pub monotonicity: Vec<Monotonicity>,
    /// Inputs whose sign lies outside the domain.
    pub sign_violations: Vec<(usize, ViolationKind)>,
}

impl Rule {
    fn new(sign: Sign, curvature: Curvature, monotonicity: Vec<Monotonicity>) -> Self {
        Rule {
            sign,
            curvature,
            monotonicity,
            sign_violations: Vec::new(),
        }
    }

    fn require(mut self, signs: &[Sign], admissible: fn(Sign) -> bool) -> Self {
        for (i, &actual) in signs.iter().enumerate() {
            if !admissible(actual) {
                self.sign_violations.push((
                    i,
                    ViolationKind::SignMismatch {
                        required: Sign::Positive,
                        actual,
                    },
                ));
            }
        }
        self
    }
}

fn not_nonpositive(s: Sign) -> bool {
    !s.is_nonpositive()
}

fn not_negative(s: Sign) -> bool {
    s != Sign::Negative
}

impl Primitive {
    /// Evaluate the rule for inputs of the given signs.
    ///
    /// `atom` is the user-facing name, used in errors.
    pub fn rule(self, atom: &str, signs: &[Sign]) -> Result<Rule> {
        use Curvature::*;
        use Monotonicity::*;

        let n = signs.len();
        let all = |m: Monotonicity| vec![m; n];
        let abs_like = || signs.iter().map(|&s| Monotonicity::of_abs(s)).collect();
        let first = signs.first().copied().unwrap_or(Sign::Unknown);

        let rule = match self {
            Primitive::Sum => Rule::new(Sign::sum(signs.iter().copied()), Affine, all(Increasing)),
            Primitive::Max => {
                Rule::new(Sign::max_of(signs.iter().copied()), Convex, all(Increasing))
            }
            Primitive::Min => {
                Rule::new(Sign::min_of(signs.iter().copied()), Concave, all(Increasing))
            }
            Primitive::LogSumExp => Rule::new(Sign::Unknown, Convex, all(Increasing)),
            Primitive::Log => Rule::new(Sign::Unknown, Concave, all(Increasing))
                .require(signs, not_nonpositive),
            Primitive::Exp => Rule::new(Sign::Positive, Convex, all(Increasing)),
            Primitive::LogNormcdf => Rule::new(Sign::Unknown, Concave, all(Increasing)),
            Primitive::PositivePart => {
                // The positive part of a nonpositive quantity is identically zero.
                if first.is_nonpositive() {
                    Rule::new(Sign::Zero, Constant, all(Increasing))
                } else {
                    Rule::new(Sign::Positive, Convex, all(Increasing))
                }
            }
            Primitive::Norm => {
                let sign = if signs.iter().all(|s| s.is_zero()) {
                    Sign::Zero
                } else {
                    Sign::Positive
                };
                Rule::new(sign, Convex, abs_like())
            }
            Primitive::NormLargest | Primitive::Huber => {
                Rule::new(Sign::Positive, Convex, abs_like())
            }
            Primitive::Entr => Rule::new(Sign::Unknown, Concave, all(Nonmonotonic)),
            Primitive::InvPos => Rule::new(Sign::Positive, Convex, all(Decreasing))
                .require(signs, not_nonpositive),
            Primitive::Divergence => Rule::new(Sign::Unknown, Convex, all(Nonmonotonic))
                .require(signs, not_negative),
            Primitive::GeoMean => {
                let sign = if signs.contains(&Sign::Negative) {
                    Sign::Negative
                } else {
                    Sign::Positive
                };
                Rule::new(sign, Concave, all(Increasing)).require(signs, not_negative)
            }
            Primitive::Pow(p) => {
                if p <= 0.0 {
                    Rule::new(Sign::Positive, Convex, all(Decreasing))
                } else if p <= 1.0 {
                    Rule::new(first, Concave, all(Increasing))
                } else {
                    Rule::new(Sign::Positive, Convex, abs_like())
                }
            }
            Primitive::QuadOverLin => {
                let Some((&divisor, numerator)) = signs.split_last() else {
                    return Err(DcpError::NoArguments {
                        atom: atom.to_string(),
                    });
                };
                if divisor != Sign::Positive {
                    return Err(DcpError::NonPositiveDivisor {
                        atom: atom.to_string(),
                    });
                }
                let sign = if numerator.iter().all(|s| s.is_zero()) {
                    Sign::Zero
                } else {
                    Sign::Positive
                };
                let mut monotonicity: Vec<Monotonicity> =
                    numerator.iter().map(|&s| Monotonicity::of_abs(s)).collect();
                monotonicity.push(Decreasing);
                Rule::new(sign, Convex, monotonicity)
            }
            Primitive::SumLargest => Rule::new(Sign::Unknown, Convex, all(Increasing)),
            Primitive::SumSmallest => Rule::new(Sign::Unknown, Concave, all(Increasing)),
        };
        Ok(rule)
    }
}

/// Where one input of a stage comes from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Source {
    /// A user argument, by position.
    Argument(usize),
    /// The output of a nested stage.
    Helper(Box<Stage>),
    /// A synthetic numeric constant.
    Literal(f64),
}

/// One primitive applied to its inputs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stage {
    pub primitive: Primitive,
    pub inputs: Vec<Source>,
}

impl Stage {
    fn new(primitive: Primitive, inputs: Vec<Source>) -> Self {
        Stage { primitive, inputs }
    }

    fn over(primitive: Primitive, arguments: usize) -> Self {
        Stage::new(primitive, (0..arguments).map(Source::Argument).collect())
    }

    fn helper(self) -> Source {
        Source::Helper(Box::new(self))
    }

    // x^p applied to f(x)
    fn power_of(inner: Primitive, p: f64) -> Self {
        Stage::new(
            Primitive::Pow(p),
            vec![Stage::new(inner, vec![Source::Argument(0)]).helper()],
        )
    }

    // ||inputs||_2^2 / 1
    fn sum_square(inputs: Vec<Source>) -> Self {
        Stage::new(
            Primitive::QuadOverLin,
            vec![Stage::new(Primitive::Norm, inputs).helper(), Source::Literal(1.0)],
        )
    }
}

impl AtomKind {
    /// Expand this function, applied to `arguments` user arguments, into
    /// primitive stages.
    pub(crate) fn plan(self, parameter: Option<ParamValue>, arguments: usize) -> Result<Stage> {
        let exponent = || {
            parameter
                .map(ParamValue::as_f64)
                .ok_or_else(|| DcpError::MissingParameter {
                    atom: self.name().to_string(),
                    parameter: "p",
                })
        };
        let each = |inner: Primitive| -> Vec<Source> {
            (0..arguments)
                .map(|i| Stage::new(inner, vec![Source::Argument(i)]).helper())
                .collect()
        };

        let stage = match self {
            AtomKind::Sum => Stage::over(Primitive::Sum, arguments),
            AtomKind::Max => Stage::over(Primitive::Max, arguments),
            AtomKind::Min => Stage::over(Primitive::Min, arguments),
            AtomKind::LogSumExp => Stage::over(Primitive::LogSumExp, arguments),
            AtomKind::Log => Stage::over(Primitive::Log, arguments),
            AtomKind::Exp => Stage::over(Primitive::Exp, arguments),
            AtomKind::LogNormcdf => Stage::over(Primitive::LogNormcdf, arguments),
            AtomKind::Pos | AtomKind::HuberPos => Stage::over(Primitive::PositivePart, arguments),
            AtomKind::Norm | AtomKind::Abs => Stage::over(Primitive::Norm, arguments),
            AtomKind::NormLargest => Stage::over(Primitive::NormLargest, arguments),
            AtomKind::Huber | AtomKind::Berhu => Stage::over(Primitive::Huber, arguments),
            AtomKind::Entr => Stage::over(Primitive::Entr, arguments),
            AtomKind::InvPos => Stage::over(Primitive::InvPos, arguments),
            AtomKind::KlDiv | AtomKind::RelEntr => Stage::over(Primitive::Divergence, arguments),
            AtomKind::GeoMean | AtomKind::Sqrt => Stage::over(Primitive::GeoMean, arguments),
            AtomKind::Pow => Stage::over(Primitive::Pow(exponent()?), arguments),
            AtomKind::QuadOverLin => Stage::over(Primitive::QuadOverLin, arguments),
            AtomKind::SumLargest => Stage::over(Primitive::SumLargest, arguments),
            AtomKind::SumSmallest => Stage::over(Primitive::SumSmallest, arguments),
            AtomKind::Square => Stage::new(
                Primitive::QuadOverLin,
                vec![Source::Argument(0), Source::Literal(1.0)],
            ),
            AtomKind::SquareAbs => Stage::power_of(Primitive::Norm, 2.0),
            AtomKind::SquarePos => Stage::power_of(Primitive::PositivePart, 2.0),
            AtomKind::PowAbs => Stage::power_of(Primitive::Norm, exponent()?),
            AtomKind::PowPos => Stage::power_of(Primitive::PositivePart, exponent()?),
            AtomKind::SumSquare => {
                Stage::sum_square((0..arguments).map(Source::Argument).collect())
            }
            AtomKind::SumSquareAbs => Stage::sum_square(each(Primitive::Norm)),
            AtomKind::SumSquarePos => Stage::sum_square(each(Primitive::PositivePart)),
            AtomKind::HuberCirc => Stage::new(
                Primitive::PositivePart,
                vec![Stage::over(Primitive::Norm, arguments).helper()],
            ),
        };
        Ok(stage)
    }
}
