//! End-to-end tests for the statement parser.

use dcpcheck::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn session(declarations: &[&str]) -> Parser {
    init_tracing();
    let mut parser = Parser::new();
    for d in declarations {
        assert_eq!(parser.parse(d).unwrap(), None);
    }
    parser
}

fn parse_ok(parser: &mut Parser, text: &str) -> Expression {
    let e = parser.parse(text).unwrap().unwrap();
    assert_eq!(e.text(), text);
    e
}

fn error_message(parser: &mut Parser, text: &str) -> String {
    parser.parse(text).unwrap_err().to_string()
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_disallowed_tokens() {
    let mut p = session(&["variable x y z", "parameter positive a b"]);
    assert_eq!(
        error_message(&mut p, "x < 2"),
        "'<' constraints are not valid. Consider using '<='."
    );
    assert_eq!(
        error_message(&mut p, "x > 2"),
        "'>' constraints are not valid. Consider using '>='."
    );
    assert_eq!(
        error_message(&mut p, "a * x = y + b"),
        "'=' is not valid. Did you mean '=='?"
    );
    assert_eq!(
        error_message(&mut p, "x^2"),
        "'^' is not valid. Consider using the 'pow' function."
    );
    assert_eq!(error_message(&mut p, "."), "Illegal character '.'.");

    let err = p.parse("x < 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DisallowedToken);
    assert_eq!(err.position, 2);
}

#[test]
fn test_call_errors() {
    let mut p = session(&["variable x y z", "parameter positive a b"]);
    assert_eq!(
        error_message(&mut p, "1 + sum(x,y) + max(1,,)"),
        "Missing arguments in 'max(1, , )'."
    );
    assert_eq!(error_message(&mut p, "max()"), "Missing arguments in 'max()'.");
    assert_eq!(error_message(&mut p, "max(1 1)"), "Syntax error in call to 'max'.");
    assert_eq!(
        error_message(&mut p, "1 + sum(x,y) + max(1,++)"),
        "Syntax error in call to 'max'."
    );
    assert_eq!(error_message(&mut p, "none(x)"), "'none' is not a known function.");
    assert_eq!(
        error_message(&mut p, "none"),
        "'none' is not a known variable or parameter."
    );
}

#[test]
fn test_arithmetic_errors() {
    let mut p = session(&["variable x y z"]);
    assert_eq!(error_message(&mut p, "-"), "'-' is not a valid expression.");
    assert_eq!(error_message(&mut p, "1--"), "'1--' is not a valid expression.");
    assert_eq!(error_message(&mut p, "1<= =="), "Invalid syntax after '1'.");
    assert_eq!(error_message(&mut p, "1 + >= max(1)"), "Invalid syntax after '1'.");
    assert_eq!(error_message(&mut p, "1 + (1 == 1)"), "Invalid syntax after '1'.");
}

#[test]
fn test_one_constraint_per_statement() {
    let mut p = session(&["variable x"]);
    for text in ["1 == 1 == 1", "1 + 1 -2 <= 3*5 - x + max(x) <= 2"] {
        let err = p.parse(text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MultipleConstraints);
        assert_eq!(err.to_string(), "An expression can only contain one constraint.");
    }
}

#[test]
fn test_construction_errors() {
    let mut p = session(&["variable x y"]);

    let err = p.parse("norm(x, 0.5)").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Construction);
    assert!(matches!(err.cause, Some(DcpError::InvalidParameter { .. })));

    let err = p.parse("pow(x)").unwrap_err();
    assert!(matches!(err.cause, Some(DcpError::MissingParameter { .. })));

    let err = p.parse("max(x, Inf)").unwrap_err();
    assert!(matches!(err.cause, Some(DcpError::UnexpectedInfinity { .. })));

    let err = p.parse("kl_div(x)").unwrap_err();
    assert!(matches!(err.cause, Some(DcpError::ArgumentCount { .. })));

    let err = p.parse("quad_over_lin(x, y)").unwrap_err();
    assert!(matches!(err.cause, Some(DcpError::NonPositiveDivisor { .. })));

    // A lone number is read as the threshold, leaving huber no argument.
    assert_eq!(error_message(&mut p, "huber(2)"), "No arguments given to huber.");

    assert!(p.statements().is_empty());
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_parse_variables() {
    let mut p = session(&["variable x"]);
    assert!(p.symbols().contains("x"));
    assert_eq!(p.symbols().get("x").unwrap().curvature(), Curvature::Affine);

    p.parse(" variable  y    z ").unwrap();
    assert!(p.symbols().contains("z"));
    assert_eq!(p.symbols().len(), 3);
}

#[test]
fn test_parse_parameters() {
    let mut p = session(&["parameter x"]);
    let x = p.symbols().get("x").unwrap();
    assert_eq!(x.curvature(), Curvature::Constant);
    assert_eq!(x.sign(), Sign::Unknown);

    p.parse(" parameter negative  y    z ").unwrap();
    assert_eq!(p.symbols().get("z").unwrap().sign(), Sign::Negative);
    assert_eq!(p.symbols().len(), 3);
}

#[test]
fn test_redeclaration_replaces_symbol() {
    let mut p = session(&["variable x", "parameter positive x"]);
    assert_eq!(p.symbols().len(), 1);
    assert_eq!(p.symbols().get("x").unwrap().curvature(), Curvature::Constant);
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_empty_statement() {
    let mut p = session(&[]);
    assert_eq!(p.parse("").unwrap(), None);
    assert_eq!(p.parse("   ").unwrap(), None);
    assert!(p.statements().is_empty());
}

#[test]
fn test_basic_eval() {
    let mut p = session(&[
        "variable x y z",
        "parameter positive a b",
        "parameter zero c d",
    ]);
    let e = parse_ok(&mut p, "c * (a * x + d * (y / b - z) + x)");
    assert_eq!(e.curvature(), Curvature::Constant);
    assert_eq!(e.sign(), Sign::Zero);

    let rhs = &e.children()[1];
    assert_eq!(rhs.text(), "(a * x + d * (y / b - z) + x)");
    assert_eq!(rhs.curvature(), Curvature::Affine);
    assert_eq!(p.statements().len(), 1);
}

#[test]
fn test_constants_eval() {
    let mut p = session(&["variable x y z", "parameter negative a b"]);
    let e = parse_ok(&mut p, "-2 * b + 0 * (z * x - 5) + -a / 1.5");
    assert_eq!(e.curvature(), Curvature::Constant);
    assert_eq!(e.sign(), Sign::Positive);
}

#[test]
fn test_unknown_sign_factor_keeps_curvature() {
    let mut p = session(&["variable x", "parameter a", "parameter negative n"]);
    assert_eq!(parse_ok(&mut p, "a * square(x)").curvature(), Curvature::Convex);
    assert_eq!(parse_ok(&mut p, "log(x) / a").curvature(), Curvature::Concave);
    assert_eq!(parse_ok(&mut p, "n * square(x)").curvature(), Curvature::Concave);
}

#[test]
fn test_atoms_eval() {
    let mut p = session(&["variable u v", "parameter positive c d"]);

    let e = parse_ok(
        &mut p,
        "c * square(square(u)) - log(v) - (-c * log_sum_exp(d, u, v) - max(u, c))",
    );
    assert_eq!(e.curvature(), Curvature::Convex);
    assert_eq!(e.sign(), Sign::Unknown);

    let e = parse_ok(&mut p, "-square(square(u)) - max(square(v), c)");
    assert_eq!(e.curvature(), Curvature::Concave);
    assert_eq!(e.sign(), Sign::Negative);

    let e = parse_ok(&mut p, "c * square(log(u)) + max(c, log_sum_exp(max(u, v), c))");
    assert_eq!(e.curvature(), Curvature::Nonconvex);
    assert_eq!(e.sign(), Sign::Positive);

    for text in ["kl_div(u, v)", "huber(u, 2)", "pow(u, -2)"] {
        assert_eq!(parse_ok(&mut p, text).curvature(), Curvature::Convex);
    }
}

#[test]
fn test_parameterized_atoms() {
    let mut p = session(&["variable u v"]);
    let e = parse_ok(
        &mut p,
        "huber(u, 2) + pow(u, 2) + huber_circ(u, v, 2) \
         + pow_pos(v, 3) + pow_abs(u, 5) + sum_largest(u, v, 1) \
         + norm_largest(v, 2, 2) + norm(v) + norm(v, 2) + huber(u)",
    );
    assert_eq!(e.curvature(), Curvature::Convex);

    for text in ["norm(u, Inf)", "norm_inf(u)", "norm1(u)", "norm2(u)"] {
        assert_eq!(parse_ok(&mut p, text).curvature(), Curvature::Convex);
    }

    let e = parse_ok(&mut p, "norm_largest(v, 2, 2)");
    assert_eq!(e.children().len(), 2);
}

#[test]
fn test_positive_part_atoms() {
    let mut p = session(&["variable x", "parameter negative n"]);

    let e = parse_ok(&mut p, "huber_pos(n)");
    assert_eq!(e.curvature(), Curvature::Constant);
    assert_eq!(e.sign(), Sign::Zero);

    for text in ["pos(x)", "huber_pos(x, 2)"] {
        let e = parse_ok(&mut p, text);
        assert_eq!(e.sign(), Sign::Positive);
        assert_eq!(e.curvature(), Curvature::Convex);
    }
}

#[test]
fn test_nested_violations_stay_on_their_node() {
    let mut p = session(&["variable u", "parameter positive c"]);
    let e = parse_ok(&mut p, "c * square(log(u))");
    assert_eq!(e.curvature(), Curvature::Nonconvex);
    assert!(e.violations().is_empty());

    let square = &e.children()[1];
    assert_eq!(square.short_name(), "square");
    assert_eq!(square.violations().len(), 1);
    assert_eq!(square.violations()[0].index(), Some(0));
}

// ============================================================================
// Constraints
// ============================================================================

#[test]
fn test_constraints_eval() {
    let mut p = session(&["variable x y", "parameter positive a b"]);
    let cases = [
        ("a * x == y + b", 0),
        ("a * x + b == 2", 0),
        ("max(x, y) == (y + square(b))", 1),
        ("a * square(x) <= log(y) + b", 0),
        ("a * log(x) <= square(y) + b", 1),
        ("a * log(x) <= 2", 1),
        ("a * log(x) >= square(y) + b", 0),
        ("a * square(x) >= log(y) + b", 1),
    ];
    for (text, violations) in cases {
        let e = parse_ok(&mut p, text);
        assert_eq!(e.children().len(), 2, "{text}");
        assert_eq!(e.violations().len(), violations, "{text}");
    }
    assert_eq!(p.statements().len(), cases.len());
}

#[test]
fn test_constraint_violations_are_unindexed() {
    let mut p = session(&["variable x y"]);
    let e = parse_ok(&mut p, "log(x) <= square(y)");
    let parts = e.partition_violations();
    assert!(parts.indexed.is_empty());
    assert_eq!(parts.unsorted.len(), 1);
    assert!(matches!(
        parts.unsorted[0].kind(),
        ViolationKind::CurvatureMismatch {
            relation: Relation::Leq,
            lhs: Curvature::Concave,
            rhs: Curvature::Convex,
        }
    ));
    assert_eq!(e.relation(), Some(Relation::Leq));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_nesting_limit() {
    init_tracing();
    let mut p = Parser::with_settings(ParserSettings {
        max_depth: 4,
        ..ParserSettings::default()
    });
    p.parse("variable x").unwrap();
    assert!(p.parse("max(max(x))").is_ok());

    let err = p.parse("((((((x))))))").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
}

fn nested_squares(levels: usize) -> String {
    format!("{}x{}", "square(".repeat(levels), ")".repeat(levels))
}

// Runs on a thread with the default 2 MiB test stack.
fn parse_on_small_stack(text: String) -> std::result::Result<(), ParseError> {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(move || {
            let mut p = session(&["variable x"]);
            p.parse(&text).map(|_| ())
        })
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_default_depth_limit() {
    let max_depth = ParserSettings::default().max_depth;

    assert!(parse_on_small_stack(nested_squares(max_depth)).is_ok());

    let err = parse_on_small_stack(nested_squares(max_depth + 1)).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
    assert_eq!(
        err.to_string(),
        format!("Expression is nested more than {max_depth} levels deep.")
    );

    let negations = format!("{}x", "-".repeat(max_depth + 1));
    let err = parse_on_small_stack(negations).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_built_trees_reparse_to_same_text() {
    let mut p = session(&["variable x y", "parameter positive a"]);
    let x = Expression::variable("x");
    let y = Expression::variable("y");
    let a = Expression::parameter("a", Sign::Positive);

    let built = vec![
        -(&x + &y),
        2.0 - -&x,
        -(-&x),
        &x / (&y * 2.0),
        &x - (&y - &a),
        (&x - &y) * &a,
        pow(&x, -2.0).unwrap(),
        norm(vec![x.clone(), y.clone()], f64::INFINITY).unwrap(),
        huber(&(-&x), 2.0).unwrap(),
        max(vec![x.clone(), y.clone()]).unwrap() - square(&(&x - &y)).unwrap(),
        (&a * square(&x).unwrap()).leq(&(log(&y).unwrap() + &a)),
        log(&x).unwrap().geq(&(-&a)),
    ];

    for expr in built {
        let parsed = p.parse(expr.text()).unwrap().unwrap();
        assert_eq!(parsed.text(), expr.text());
        assert_eq!(parsed.curvature(), expr.curvature(), "{expr}");
        assert_eq!(parsed.sign(), expr.sign(), "{expr}");
        assert_eq!(parsed.violations().len(), expr.violations().len(), "{expr}");
    }
}
