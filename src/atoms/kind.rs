//! The closed set of library functions.

use std::fmt;

use super::parameter::{
    ParamValue, ParameterSpec, HUBER_M, K, NORM_P, POW_P, POW_P_AT_LEAST_ONE,
};

/// Every function the library knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Sum,
    Max,
    Min,
    LogSumExp,
    Log,
    Exp,
    LogNormcdf,
    Square,
    SquareAbs,
    SquarePos,
    Pow,
    PowAbs,
    PowPos,
    Sqrt,
    GeoMean,
    Norm,
    Abs,
    NormLargest,
    Huber,
    Berhu,
    HuberPos,
    HuberCirc,
    Pos,
    Entr,
    InvPos,
    KlDiv,
    RelEntr,
    QuadOverLin,
    SumSquare,
    SumSquareAbs,
    SumSquarePos,
    SumLargest,
    SumSmallest,
}

/// How many non-parameter arguments a function takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, k) = match self {
            Arity::Exactly(k) => ("exactly", k),
            Arity::AtLeast(k) => ("at least", k),
        };
        let noun = if *k == 1 { "argument" } else { "arguments" };
        write!(f, "{prefix} {k} {noun}")
    }
}

impl AtomKind {
    pub const ALL: [AtomKind; 33] = [
        AtomKind::Sum,
        AtomKind::Max,
        AtomKind::Min,
        AtomKind::LogSumExp,
        AtomKind::Log,
        AtomKind::Exp,
        AtomKind::LogNormcdf,
        AtomKind::Square,
        AtomKind::SquareAbs,
        AtomKind::SquarePos,
        AtomKind::Pow,
        AtomKind::PowAbs,
        AtomKind::PowPos,
        AtomKind::Sqrt,
        AtomKind::GeoMean,
        AtomKind::Norm,
        AtomKind::Abs,
        AtomKind::NormLargest,
        AtomKind::Huber,
        AtomKind::Berhu,
        AtomKind::HuberPos,
        AtomKind::HuberCirc,
        AtomKind::Pos,
        AtomKind::Entr,
        AtomKind::InvPos,
        AtomKind::KlDiv,
        AtomKind::RelEntr,
        AtomKind::QuadOverLin,
        AtomKind::SumSquare,
        AtomKind::SumSquareAbs,
        AtomKind::SumSquarePos,
        AtomKind::SumLargest,
        AtomKind::SumSmallest,
    ];

    /// Call name.
    pub fn name(self) -> &'static str {
        match self {
            AtomKind::Sum => "sum",
            AtomKind::Max => "max",
            AtomKind::Min => "min",
            AtomKind::LogSumExp => "log_sum_exp",
            AtomKind::Log => "log",
            AtomKind::Exp => "exp",
            AtomKind::LogNormcdf => "log_normcdf",
            AtomKind::Square => "square",
            AtomKind::SquareAbs => "square_abs",
            AtomKind::SquarePos => "square_pos",
            AtomKind::Pow => "pow",
            AtomKind::PowAbs => "pow_abs",
            AtomKind::PowPos => "pow_pos",
            AtomKind::Sqrt => "sqrt",
            AtomKind::GeoMean => "geo_mean",
            AtomKind::Norm => "norm",
            AtomKind::Abs => "abs",
            AtomKind::NormLargest => "norm_largest",
            AtomKind::Huber => "huber",
            AtomKind::Berhu => "berhu",
            AtomKind::HuberPos => "huber_pos",
            AtomKind::HuberCirc => "huber_circ",
            AtomKind::Pos => "pos",
            AtomKind::Entr => "entr",
            AtomKind::InvPos => "inv_pos",
            AtomKind::KlDiv => "kl_div",
            AtomKind::RelEntr => "rel_entr",
            AtomKind::QuadOverLin => "quad_over_lin",
            AtomKind::SumSquare => "sum_square",
            AtomKind::SumSquareAbs => "sum_square_abs",
            AtomKind::SumSquarePos => "sum_square_pos",
            AtomKind::SumLargest => "sum_largest",
            AtomKind::SumSmallest => "sum_smallest",
        }
    }

    /// Number of arguments accepted, not counting the parameter.
    pub fn arity(self) -> Arity {
        match self {
            AtomKind::Log
            | AtomKind::Exp
            | AtomKind::LogNormcdf
            | AtomKind::Square
            | AtomKind::SquareAbs
            | AtomKind::SquarePos
            | AtomKind::Pow
            | AtomKind::PowAbs
            | AtomKind::PowPos
            | AtomKind::Sqrt
            | AtomKind::Abs
            | AtomKind::Huber
            | AtomKind::Berhu
            | AtomKind::HuberPos
            | AtomKind::Pos
            | AtomKind::Entr
            | AtomKind::InvPos => Arity::Exactly(1),
            AtomKind::KlDiv | AtomKind::RelEntr => Arity::Exactly(2),
            AtomKind::QuadOverLin => Arity::AtLeast(2),
            _ => Arity::AtLeast(1),
        }
    }

    /// Parameter taken from a trailing literal, if the function has one.
    pub fn parameter(self) -> Option<ParameterSpec> {
        match self {
            AtomKind::Norm => Some(NORM_P),
            AtomKind::Huber | AtomKind::Berhu | AtomKind::HuberPos | AtomKind::HuberCirc => {
                Some(HUBER_M)
            }
            AtomKind::NormLargest | AtomKind::SumLargest | AtomKind::SumSmallest => Some(K),
            AtomKind::Pow => Some(POW_P),
            AtomKind::PowAbs | AtomKind::PowPos => Some(POW_P_AT_LEAST_ONE),
            _ => None,
        }
    }
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A callable name: a function, possibly with its parameter pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Function {
    pub kind: AtomKind,
    /// Name as written in calls.
    pub name: &'static str,
    /// Parameter value implied by the name (`norm1` is `norm` with p = 1).
    pub fixed: Option<ParamValue>,
}

impl Function {
    pub fn new(kind: AtomKind) -> Self {
        Function {
            kind,
            name: kind.name(),
            fixed: None,
        }
    }
}

const ALIASES: [(&str, ParamValue); 3] = [
    ("norm1", ParamValue::Number(1.0)),
    ("norm2", ParamValue::Number(2.0)),
    ("norm_inf", ParamValue::Infinity),
];

/// Look up a call name.
pub fn lookup(name: &str) -> Option<Function> {
    if let Some(kind) = AtomKind::ALL.iter().copied().find(|k| k.name() == name) {
        return Some(Function::new(kind));
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(alias, value)| Function {
            kind: AtomKind::Norm,
            name: alias,
            fixed: Some(*value),
        })
}
