//! End-to-end parse and evaluate tests against the shared context

use docexpr::model::INDEX_VARIABLE;
use docexpr::{
    Color, Context, ContextOptions, EvaluationError, Unit, UnitKind, Value, Variables, evaluate,
    parse, referenced_variables,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;

fn eval_in(text: &str, context: &Context, variables: &Variables) -> Result<Value, EvaluationError> {
    let expression = parse(text, context).unwrap_or_else(|e| panic!("'{text}' failed to parse: {e}"));
    evaluate(&expression, variables, context)
}

fn eval(text: &str) -> Value {
    eval_in(text, Context::shared(), &Variables::default())
        .unwrap_or_else(|e| panic!("'{text}' failed to evaluate: {e}"))
}

#[rstest]
#[case::precedence("2 + 3 * 4", Value::Integer(14))]
#[case::parentheses("(2 + 3) * 4", Value::Integer(20))]
#[case::leading_sign("-5 + 3", Value::Integer(-2))]
#[case::sign_after_operator("5 - -3", Value::Integer(8))]
#[case::left_associative("10 - 4 - 3", Value::Integer(3))]
#[case::integer_addition("1 + 2", Value::Integer(3))]
#[case::division_is_real("7 / 2", Value::Double(3.5))]
#[case::modulus("7 % 3", Value::Integer(1))]
#[case::exponent("2 ^ 10", Value::Double(1024.0))]
#[case::string_concatenation("'a' + 1", Value::from("a1"))]
#[case::shift("1 << 4", Value::Integer(16))]
#[case::bitwise("6 & 3 | 8", Value::Integer(10))]
fn test_arithmetic(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(eval(text), expected);
}

#[rstest]
#[case("3 > 2 and 'b' >= 'a'", true)]
#[case("1 == 1.0", true)]
#[case("'10' = 10", true)]
#[case("'abc' == 'ABC'", false)]
#[case("1 <> 2", true)]
#[case("not (1 < 2)", false)]
#[case("!false || false", true)]
#[case("null == null", true)]
#[case("In(2, 1, 2, 3)", true)]
#[case("In('x', 'a', 'b')", false)]
#[case("In('b', 'a', 'b')", true)]
#[case::in_without_candidates("In(1)", false)]
fn test_boolean_results(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(eval(text), Value::Boolean(expected));
}

#[rstest]
#[case::coalesce("null ?? 5", Value::Integer(5))]
#[case::coalesce_is_lazy("5 ?? (1 / 0)", Value::Integer(5))]
#[case::if_skips_branch("If(true, 1, (1 / 0))", Value::Integer(1))]
#[case::iif_alias("iif(1 > 2, 'yes', 'no')", Value::from("no"))]
#[case::if_error_fallback("IfError(1 / 0, -1)", Value::Integer(-1))]
#[case::if_error_passes_value("IfError(4 / 2, -1)", Value::Double(2.0))]
#[case::var_fallback("Var(missing, 'fallback')", Value::from("fallback"))]
#[case::missing_channel_coalesces("Rgb(255, 0) ?? 'none'", Value::from("none"))]
#[case::missing_var_argument_coalesces("Var() ?? 5", Value::Integer(5))]
#[case::calc("Calc(10pt + 1in)", Value::Unit(Unit::points(82.0)))]
#[case::percent("calc(100% - 20%)", Value::Unit(Unit::percent(80.0)))]
#[case::scaled_unit("2 * 3mm", Value::Unit(Unit::new(6.0, UnitKind::Millimetre)))]
#[case::rgb("Rgb(255, 128, 0)", Value::Color(Color::rgb(255, 128, 0)))]
#[case::rgb_percent("Rgb(50%, 0, 0)", Value::Color(Color::rgb(128, 0, 0)))]
#[case::rgb_clamps("RGB(300, -5, 12)", Value::Color(Color::rgb(255, 0, 12)))]
#[case::color_literal("#ff8800", Value::Color(Color::rgb(255, 136, 0)))]
fn test_functions_and_dimensions(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(eval(text), expected);
}

#[rstest]
#[case("Max(3, 7, 1)", Value::Integer(7))]
#[case("Min(3, 7, 1)", Value::Integer(1))]
#[case("Sum(1, 2, 3)", Value::Integer(6))]
#[case("Abs(-4)", Value::Integer(4))]
#[case("Round(2.5)", Value::Decimal(Decimal::from(2)))]
#[case("Length('héllo')", Value::Integer(5))]
#[case("Upper('abc')", Value::from("ABC"))]
#[case("Substring('template', 2, 3)", Value::from("mpl"))]
#[case("IndexOf('template', 'pl')", Value::Integer(3))]
#[case("Concat('a', 1, 'b')", Value::from("a1b"))]
#[case("Join('-', 'x', 'y', 'z')", Value::from("x-y-z"))]
#[case("PadLeft('7', 3, '0')", Value::from("007"))]
#[case("Integer('42')", Value::Integer(42))]
fn test_helper_functions(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(eval(text), expected);
}

#[test]
fn test_unsupported_unit_in_rgb() {
    let err = eval_in("Rgb(10px, 0, 0)", Context::shared(), &Variables::default()).unwrap_err();
    assert_eq!(
        err,
        EvaluationError::UnsupportedUnit {
            function: "Rgb".to_string(),
            unit: UnitKind::Pixel,
        }
    );
}

#[rstest]
#[case("1 / 0")]
#[case("'abc' - 1")]
#[case("10pt + 50%")]
#[case("Regex('a', '(')")]
fn test_evaluation_errors(#[case] text: &str) {
    assert!(eval_in(text, Context::shared(), &Variables::default()).is_err());
}

#[test]
fn test_parse_once_evaluate_with_different_bindings() {
    let context = Context::shared();
    let expression = parse("price * quantity", context).unwrap();

    let mut first = Variables::default();
    first.insert("price".to_string(), Value::Integer(3));
    first.insert("quantity".to_string(), Value::Integer(4));

    let mut second = Variables::default();
    second.insert("price".to_string(), Value::Double(2.5));
    second.insert("quantity".to_string(), Value::Integer(2));

    assert_eq!(evaluate(&expression, &first, context).unwrap(), Value::Integer(12));
    assert_eq!(evaluate(&expression, &second, context).unwrap(), Value::Double(5.0));
    assert_eq!(evaluate(&expression, &first, context).unwrap(), Value::Integer(12));
}

#[test]
fn test_unbound_variables_are_null() {
    assert_eq!(eval("missing"), Value::Null);
    assert_eq!(eval("missing ?? 'default'"), Value::from("default"));
}

#[test]
fn test_index_reads_reserved_binding() {
    let mut variables = Variables::default();
    variables.insert(INDEX_VARIABLE.to_string(), Value::Integer(2));
    assert_eq!(
        eval_in("Index() + 1", Context::shared(), &variables).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(eval("Index()"), Value::Integer(-1));
}

#[test]
fn test_case_insensitive_equality() {
    let context = Context::new(ContextOptions {
        ignore_case_for_equality: true,
        ..ContextOptions::default()
    });
    let variables = Variables::default();
    assert_eq!(
        eval_in("'abc' == 'ABC'", &context, &variables).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        eval_in("In('X', 'x', 'y')", &context, &variables).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_canonical_form_and_referenced_variables() {
    let expression = parse("a + b * -a", Context::shared()).unwrap();
    assert_eq!(expression.to_string(), "(a + (b * (-a)))");
    assert_eq!(referenced_variables(&expression), vec!["a", "b"]);

    let reparsed = parse(&expression.to_string(), Context::shared()).unwrap();
    assert_eq!(reparsed, expression);
}

#[rstest]
#[case::and_evaluates_right("false and (1 / 0) = 1")]
#[case::or_evaluates_right("true or (1 / 0) = 1")]
#[case::symbolic_and("false && (1 / 0) = 1")]
fn test_logical_operators_evaluate_both_sides(#[case] text: &str) {
    assert_eq!(
        eval_in(text, Context::shared(), &Variables::default()).unwrap_err(),
        EvaluationError::DivisionByZero
    );
}

#[test]
fn test_missing_argument_outside_coalesce_is_an_error() {
    let err = eval_in("Rgb(255, 0)", Context::shared(), &Variables::default()).unwrap_err();
    assert!(err.is_missing_operand());
}

#[rstest]
#[case::sequence_probe_is_not_flattened("In(pair, 1, 2)", false)]
#[case::sequence_candidate_is_searched("In(2, pair)", true)]
#[case::later_sequence_candidate_matches("In(1, 'x', pair)", true)]
fn test_in_with_sequences(#[case] text: &str, #[case] expected: bool) {
    let mut variables = Variables::default();
    variables.insert(
        "pair".to_string(),
        Value::sequence([Value::Integer(1), Value::Integer(2)]),
    );
    assert_eq!(
        eval_in(text, Context::shared(), &variables).unwrap(),
        Value::Boolean(expected)
    );
}

#[test]
fn test_double_minus_outside_arguments_negates_twice() {
    let mut variables = Variables::default();
    variables.insert("x".to_string(), Value::Integer(3));
    assert_eq!(
        eval_in("2 * --x", Context::shared(), &variables).unwrap(),
        Value::Integer(6)
    );
    assert_eq!(
        eval_in("Var(--x, 'unset')", Context::shared(), &variables).unwrap(),
        Value::from("unset")
    );
}
