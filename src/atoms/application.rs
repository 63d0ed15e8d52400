//! Applying a library function to arguments.
//!
//! The flow is: pull the parameter off the end of the argument list,
//! validate arity, expand the function into primitive stages, then evaluate
//! the stages bottom-up. Violations found inside a stage are attributed to
//! the user argument they stem from when there is exactly one.

use std::collections::BTreeMap;

use crate::dcp::{compose_arguments, Curvature, Monotonicity, Sign};
use crate::error::{DcpError, Result};
use crate::expr::{ExprKind, Expression, Precedence, Violation, ViolationKind};

use super::kind::{AtomKind, Function};
use super::parameter::{ParamValue, Parameter};
use super::rules::{Source, Stage};

/// One argument in a call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArgument {
    Expression(Expression),
    /// The `Inf` keyword; only valid as a parameter.
    Infinity,
}

impl From<Expression> for CallArgument {
    fn from(e: Expression) -> Self {
        CallArgument::Expression(e)
    }
}

/// Origin of an input seen by the outermost primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSource {
    /// The user argument at this position.
    User(usize),
    /// A synthesized sub-application over these user arguments.
    Synthetic { covers: Vec<usize> },
    /// A synthesized constant.
    Literal(f64),
}

/// An input of the outermost primitive of an application.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationArg {
    pub curvature: Curvature,
    pub sign: Sign,
    pub source: ArgSource,
}

/// Record of a function application, stored on the resulting node.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomCall {
    kind: AtomKind,
    name: String,
    parameter: Option<Parameter>,
    evaluation_args: Vec<EvaluationArg>,
}

impl AtomCall {
    pub fn kind(&self) -> AtomKind {
        self.kind
    }

    /// Name as called; differs from `kind().name()` for aliases.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter(&self) -> Option<&Parameter> {
        self.parameter.as_ref()
    }

    /// Inputs of the outermost primitive. For composite functions these
    /// are not the arguments the user wrote.
    pub fn evaluation_args(&self) -> &[EvaluationArg] {
        &self.evaluation_args
    }

    /// True if the function was expanded into more than one primitive.
    pub fn is_composite(&self) -> bool {
        self.evaluation_args
            .iter()
            .enumerate()
            .any(|(i, a)| a.source != ArgSource::User(i))
    }
}

/// Apply `function` to `args`.
///
/// Fails for structural problems: bad arity, missing or invalid parameter,
/// a misplaced `Inf`, or a `quad_over_lin` divisor not known to be
/// positive. DCP violations do not fail; they are attached to the result.
///
/// For functions that take a parameter, a trailing numeric literal (or
/// `Inf`) is always read as that parameter, even when it is the only
/// argument. `huber(2)` is therefore `huber` of no arguments, not
/// `huber(2, 1)`.
pub fn apply(function: &Function, mut args: Vec<CallArgument>) -> Result<Expression> {
    let atom = function.name;
    if args.is_empty() {
        return Err(DcpError::NoArguments {
            atom: atom.to_string(),
        });
    }

    let parameter = match function.kind.parameter() {
        None => None,
        Some(declared) => Some(match function.fixed {
            Some(value) => declared.fixed(atom, value)?,
            None => {
                let given = match args.last() {
                    Some(CallArgument::Infinity) => Some((ParamValue::Infinity, "Inf".to_string())),
                    Some(CallArgument::Expression(e)) => e
                        .as_number()
                        .map(|v| (ParamValue::Number(v), e.text().to_string())),
                    None => None,
                };
                if given.is_some() {
                    args.pop();
                }
                declared.resolve(atom, given)?
            }
        }),
    };

    let args = args
        .into_iter()
        .map(|a| match a {
            CallArgument::Expression(e) => Ok(e),
            CallArgument::Infinity => Err(DcpError::UnexpectedInfinity {
                atom: atom.to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    if args.is_empty() {
        return Err(DcpError::NoArguments {
            atom: atom.to_string(),
        });
    }
    let arity = function.kind.arity();
    if !arity.accepts(args.len()) {
        return Err(DcpError::ArgumentCount {
            atom: atom.to_string(),
            expected: arity.to_string(),
            got: args.len(),
        });
    }

    let stage = function
        .kind
        .plan(parameter.as_ref().map(|p| p.value), args.len())?;
    let evaluation = evaluate(&stage, atom, &args)?;

    let monotonicity = (0..args.len())
        .map(|i| {
            evaluation
                .monotonicity
                .get(&i)
                .copied()
                .unwrap_or(Monotonicity::Nonmonotonic)
        })
        .collect();

    let mut rendered: Vec<&str> = args.iter().map(Expression::text).collect();
    if let Some(text) = parameter.as_ref().and_then(|p| p.text.as_deref()) {
        rendered.push(text);
    }
    let text = format!("{}({})", atom, rendered.join(", "));

    Ok(Expression {
        kind: ExprKind::Atom(Box::new(AtomCall {
            kind: function.kind,
            name: atom.to_string(),
            parameter,
            evaluation_args: evaluation.inputs,
        })),
        curvature: evaluation.curvature,
        sign: evaluation.sign,
        text,
        children: args,
        monotonicity: Some(monotonicity),
        violations: evaluation.violations,
        short_name: Some(atom.to_string()),
        precedence: Precedence::Atomic,
    })
}

struct Evaluation {
    curvature: Curvature,
    sign: Sign,
    /// Monotonicity in each user argument the stage covers.
    monotonicity: BTreeMap<usize, Monotonicity>,
    violations: Vec<Violation>,
    inputs: Vec<EvaluationArg>,
}

fn evaluate(stage: &Stage, atom: &str, args: &[Expression]) -> Result<Evaluation> {
    let mut inputs = Vec::with_capacity(stage.inputs.len());
    let mut paths: Vec<BTreeMap<usize, Monotonicity>> = Vec::with_capacity(stage.inputs.len());
    let mut violations = Vec::new();

    for source in &stage.inputs {
        match source {
            Source::Argument(i) => {
                let arg = &args[*i];
                inputs.push(EvaluationArg {
                    curvature: arg.curvature(),
                    sign: arg.sign(),
                    source: ArgSource::User(*i),
                });
                paths.push(BTreeMap::from([(*i, Monotonicity::Increasing)]));
            }
            Source::Helper(inner) => {
                let nested = evaluate(inner, atom, args)?;
                violations.extend(nested.violations);
                inputs.push(EvaluationArg {
                    curvature: nested.curvature,
                    sign: nested.sign,
                    source: ArgSource::Synthetic {
                        covers: nested.monotonicity.keys().copied().collect(),
                    },
                });
                paths.push(nested.monotonicity);
            }
            Source::Literal(value) => {
                inputs.push(EvaluationArg {
                    curvature: Curvature::Constant,
                    sign: Sign::of_value(*value),
                    source: ArgSource::Literal(*value),
                });
                paths.push(BTreeMap::new());
            }
        }
    }

    let signs: Vec<Sign> = inputs.iter().map(|a| a.sign).collect();
    let curvatures: Vec<Curvature> = inputs.iter().map(|a| a.curvature).collect();
    let rule = stage.primitive.rule(atom, &signs)?;
    let composition = compose_arguments(rule.curvature, &rule.monotonicity, &curvatures)?;

    for j in composition.mismatches {
        let kind = ViolationKind::MonotonicityMismatch {
            function: rule.curvature,
            monotonicity: rule.monotonicity[j],
            argument: curvatures[j],
        };
        violations.push(attribute(&inputs[j].source, kind));
    }
    for (j, kind) in rule.sign_violations {
        violations.push(attribute(&inputs[j].source, kind));
    }

    let mut monotonicity = BTreeMap::new();
    for (outer, path) in rule.monotonicity.iter().zip(paths) {
        for (i, inner) in path {
            let chained = outer.then(inner);
            monotonicity
                .entry(i)
                .and_modify(|m: &mut Monotonicity| {
                    if *m != chained {
                        *m = Monotonicity::Nonmonotonic;
                    }
                })
                .or_insert(chained);
        }
    }

    Ok(Evaluation {
        curvature: composition.curvature,
        sign: rule.sign,
        monotonicity,
        violations,
        inputs,
    })
}

fn attribute(source: &ArgSource, kind: ViolationKind) -> Violation {
    match source {
        ArgSource::User(i) => Violation::argument(*i, kind),
        ArgSource::Synthetic { covers } if covers.len() == 1 => Violation::argument(covers[0], kind),
        _ => Violation::whole(kind),
    }
}
