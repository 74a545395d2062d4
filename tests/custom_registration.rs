//! Extending and restricting a context with custom functions and operators

use docexpr::ast::{BinaryOperator, Expression};
use docexpr::parser::{SpannedToken, Token};
use docexpr::registry::operator::require_operand;
use docexpr::registry::operators::InfixOperator;
use docexpr::registry::{ExpressionOperator, FunctionDescriptor, Precedence};
use docexpr::{
    Arity, ContextBuilder, ContextOptions, EvaluationResult, ExpressionFunction, FunctionArgs,
    ParseError, ParseResult, RegistryError, Value, VariableProvider, Variables, evaluate, parse,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// `Clamp(value, low, high)`
struct ClampFunction;

impl ExpressionFunction for ClampFunction {
    fn name(&self) -> &str {
        "Clamp"
    }

    fn aliases(&self) -> &[&'static str] {
        &["clamp"]
    }

    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        let value = args.evaluate(0)?;
        let low = args.evaluate(1)?;
        let high = args.evaluate(2)?;
        let strings = args.context().string_comparison();
        if docexpr::model::TypeCoercion::compare(&value, &low, strings).is_lt() {
            Ok(low)
        } else if docexpr::model::TypeCoercion::compare(&value, &high, strings).is_gt() {
            Ok(high)
        } else {
            Ok(value)
        }
    }
}

/// Rebinds `&` to string concatenation through a private function node
struct ConcatOperator {
    function: Arc<FunctionDescriptor>,
}

impl ConcatOperator {
    fn new() -> Self {
        let function = FunctionDescriptor::from_closure("&", Arity::exactly(2), "", |args| {
            let left = args.evaluate(0)?;
            let right = args.evaluate(1)?;
            Ok(Value::String(format!("{left}{right}")))
        });
        Self {
            function: Arc::new(function),
        }
    }
}

impl ExpressionOperator for ConcatOperator {
    fn tags(&self) -> &[&'static str] {
        &["&"]
    }

    fn human_friendly_name(&self) -> &str {
        "Concatenation"
    }

    fn precedence(&self) -> Precedence {
        Precedence::Additive
    }

    fn build(
        &self,
        token: &SpannedToken<'_>,
        _previous: Option<&Token<'_>>,
        [left, right]: [Option<Expression>; 2],
    ) -> ParseResult<Expression> {
        let left = require_operand(left, token)?;
        let right = require_operand(right, token)?;
        Ok(Expression::call("&", Arc::clone(&self.function), [left, right]))
    }
}

fn run(builder: ContextBuilder, text: &str) -> Value {
    let context = builder.build();
    let expression = parse(text, &context).unwrap();
    evaluate(&expression, &Variables::default(), &context).unwrap()
}

#[test]
fn test_trait_function() {
    let builder = ContextBuilder::new().register_function(ClampFunction).unwrap();
    assert_eq!(run(builder, "clamp(15, 0, 10) + Clamp(-3, 0, 10)"), Value::Integer(10));
}

#[test]
fn test_closure_function_reads_variables() {
    let context = ContextBuilder::new()
        .register_closure("Greeting", Arity::exactly(0), "Greets the user", |args| {
            let name = args
                .variables()
                .get_variable("user")
                .map(|value| value.into_owned())
                .unwrap_or_else(|| Value::from("stranger"));
            Ok(Value::String(format!("Hello, {name}")))
        })
        .unwrap()
        .build();

    let expression = parse("Greeting()", &context).unwrap();
    let mut variables = Variables::default();
    assert_eq!(
        evaluate(&expression, &variables, &context).unwrap(),
        Value::from("Hello, stranger")
    );
    variables.insert("user".to_string(), Value::from("Ada"));
    assert_eq!(
        evaluate(&expression, &variables, &context).unwrap(),
        Value::from("Hello, Ada")
    );
}

#[test]
fn test_duplicate_registration_fails_unless_forced() {
    let err = ContextBuilder::new()
        .register_closure("In", Arity::any(), "", |_| Ok(Value::Null))
        .err();
    assert_eq!(
        err,
        Some(RegistryError::DuplicateFunction {
            name: "In".to_string()
        })
    );

    let err = ContextBuilder::new()
        .register_operator(Arc::new(ConcatOperator::new()))
        .err();
    assert_eq!(
        err,
        Some(RegistryError::DuplicateOperator {
            tag: "&".to_string()
        })
    );

    let forced = ContextBuilder::new()
        .register_function_forced(FunctionDescriptor::from_closure(
            "In",
            Arity::any(),
            "",
            |_| Ok(Value::from("replaced")),
        ))
        .register_operator_forced(Arc::new(ConcatOperator::new()));
    let context = forced.build();
    let expression = parse("In() & 1 & 2", &context).unwrap();
    assert_eq!(
        evaluate(&expression, &Variables::default(), &context).unwrap(),
        Value::from("replaced12")
    );
}

#[test]
fn test_operator_alias_registration() {
    static TAGS: [&str; 1] = ["<>"];
    let builder = ContextBuilder::new()
        .unregister_operator("<>")
        .register_operator(Arc::new(InfixOperator::new(
            &TAGS,
            "Equality",
            Precedence::Equality,
            BinaryOperator::Equal,
        )))
        .unwrap();
    assert_eq!(run(builder, "1 <> 1"), Value::Boolean(true));
}

#[test]
fn test_unregistered_names_fail_to_parse() {
    let context = ContextBuilder::new()
        .unregister_function("If")
        .unregister_operator("??")
        .build();

    assert!(matches!(
        parse("iif(true, 1, 2)", &context),
        Err(ParseError::UnknownFunction { .. })
    ));
    assert!(matches!(
        parse("null ?? 1", &context),
        Err(ParseError::UnknownOperator { .. })
    ));
    assert!(parse("1 + 1", &context).is_ok());
}

#[test]
fn test_case_insensitive_parsing() {
    let builder = ContextBuilder::with_options(ContextOptions {
        ignore_case_for_parsing: true,
        ..ContextOptions::default()
    });
    assert_eq!(run(builder, "IF(NOT FALSE, CALC(2 * 3), 0)"), Value::Integer(6));
}

#[test]
fn test_arity_checked_at_parse_time() {
    let context = ContextBuilder::new().build();
    let err = parse("If(true, 1)", &context).unwrap_err();
    assert!(err.is_arity_error());
    assert_eq!(
        err,
        ParseError::InvalidArity {
            name: "If".to_string(),
            min: Some(3),
            max: Some(3),
            actual: 2,
            position: 0,
        }
    );
}
