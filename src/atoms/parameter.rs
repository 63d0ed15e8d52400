//! Scalar parameters of parameterized atoms.
//!
//! Each parameterized atom owns a [`ParameterSpec`]: the parameter's name,
//! its default (if any) and a validator. Specs are plain constants, so
//! validation is a pure function of the value.

use std::fmt;

use crate::error::{DcpError, Result};

/// Value of an atom parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// A finite number.
    Number(f64),
    /// The `Inf` keyword.
    Infinity,
}

impl ParamValue {
    /// Numeric value, with `Inf` mapped to positive infinity.
    pub fn as_f64(self) -> f64 {
        match self {
            ParamValue::Number(v) => v,
            ParamValue::Infinity => f64::INFINITY,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Infinity => f.write_str("Inf"),
        }
    }
}

/// Name, default and validator of one atom parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSpec {
    /// Name used in messages, e.g. `p` in `norm(..., p)`.
    pub name: &'static str,
    /// Value used when the call does not end in a literal.
    pub default: Option<ParamValue>,
    /// Accepts or rejects a value.
    pub validate: fn(ParamValue) -> bool,
}

fn norm_order(v: ParamValue) -> bool {
    match v {
        ParamValue::Infinity => true,
        ParamValue::Number(p) => p >= 1.0,
    }
}

fn positive(v: ParamValue) -> bool {
    matches!(v, ParamValue::Number(m) if m > 0.0)
}

fn finite(v: ParamValue) -> bool {
    matches!(v, ParamValue::Number(x) if x.is_finite())
}

fn at_least_one(v: ParamValue) -> bool {
    matches!(v, ParamValue::Number(p) if p.is_finite() && p >= 1.0)
}

/// `p` of `norm`: at least 1, or `Inf`. Defaults to 2.
pub const NORM_P: ParameterSpec = ParameterSpec {
    name: "p",
    default: Some(ParamValue::Number(2.0)),
    validate: norm_order,
};

/// `M` of the Huber family: positive. Defaults to 1.
pub const HUBER_M: ParameterSpec = ParameterSpec {
    name: "M",
    default: Some(ParamValue::Number(1.0)),
    validate: positive,
};

/// `k` of the largest/smallest sums. Required.
pub const K: ParameterSpec = ParameterSpec {
    name: "k",
    default: None,
    validate: finite,
};

/// `p` of `pow`. Required.
pub const POW_P: ParameterSpec = ParameterSpec {
    name: "p",
    default: None,
    validate: finite,
};

/// `p` of `pow_abs` and `pow_pos`: at least 1. Required.
pub const POW_P_AT_LEAST_ONE: ParameterSpec = ParameterSpec {
    name: "p",
    default: None,
    validate: at_least_one,
};

/// A validated parameter attached to an application.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The value in effect.
    pub value: ParamValue,
    /// Source spelling when the user supplied the value; `None` when it
    /// came from a default or a name alias.
    pub text: Option<String>,
}

impl ParameterSpec {
    /// Pick the given value or the default, then validate it.
    pub fn resolve(&self, atom: &str, given: Option<(ParamValue, String)>) -> Result<Parameter> {
        let (value, text) = match given {
            Some((value, text)) => (value, Some(text)),
            None => match self.default {
                Some(value) => (value, None),
                None => {
                    return Err(DcpError::MissingParameter {
                        atom: atom.to_string(),
                        parameter: self.name,
                    })
                }
            },
        };
        self.check(atom, value, text.as_deref())?;
        Ok(Parameter { value, text })
    }

    /// Validate a value fixed by a name alias.
    pub fn fixed(&self, atom: &str, value: ParamValue) -> Result<Parameter> {
        self.check(atom, value, None)?;
        Ok(Parameter { value, text: None })
    }

    fn check(&self, atom: &str, value: ParamValue, text: Option<&str>) -> Result<()> {
        if (self.validate)(value) {
            Ok(())
        } else {
            Err(DcpError::InvalidParameter {
                atom: atom.to_string(),
                parameter: self.name,
                value: text.map_or_else(|| value.to_string(), str::to_string),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_order() {
        assert!((NORM_P.validate)(ParamValue::Number(1.0)));
        assert!((NORM_P.validate)(ParamValue::Number(1341.143)));
        assert!((NORM_P.validate)(ParamValue::Infinity));
        assert!(!(NORM_P.validate)(ParamValue::Number(0.5)));
        assert!(!(NORM_P.validate)(ParamValue::Number(0.0)));
    }

    #[test]
    fn test_huber_m() {
        assert!((HUBER_M.validate)(ParamValue::Number(100.0)));
        assert!(!(HUBER_M.validate)(ParamValue::Number(0.0)));
        assert!(!(HUBER_M.validate)(ParamValue::Infinity));
    }

    #[test]
    fn test_resolve_default() {
        let p = NORM_P.resolve("norm", None).unwrap();
        assert_eq!(p.value, ParamValue::Number(2.0));
        assert!(p.text.is_none());
    }

    #[test]
    fn test_resolve_given() {
        let p = HUBER_M
            .resolve("huber", Some((ParamValue::Number(2.0), "2".to_string())))
            .unwrap();
        assert_eq!(p.value, ParamValue::Number(2.0));
        assert_eq!(p.text.as_deref(), Some("2"));
    }

    #[test]
    fn test_resolve_rejects() {
        let err = NORM_P
            .resolve("norm", Some((ParamValue::Number(0.5), "0.5".to_string())))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value '0.5' for p in norm(..., p).");

        let err = K.resolve("sum_largest", None).unwrap_err();
        assert!(matches!(err, DcpError::MissingParameter { parameter: "k", .. }));

        let err = POW_P_AT_LEAST_ONE
            .resolve("pow_abs", Some((ParamValue::Number(0.0), "0".to_string())))
            .unwrap_err();
        assert!(matches!(err, DcpError::InvalidParameter { .. }));
    }
}
