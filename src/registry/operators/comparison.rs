//! Equality and relational operators

use std::cmp::Ordering;
use std::sync::Arc;

use super::InfixOperator;
use crate::ast::BinaryOperator;
use crate::model::{StringComparison, TypeCoercion, Value};
use crate::registry::operator::{OperatorRegistry, Precedence};

fn ordering(left: &Value, right: &Value, strings: StringComparison) -> Ordering {
    TypeCoercion::compare(left, right, strings)
}

pub fn equal(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_eq())
}

pub fn not_equal(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_ne())
}

pub fn less_than(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_lt())
}

pub fn less_or_equal(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_le())
}

pub fn greater_than(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_gt())
}

pub fn greater_or_equal(left: &Value, right: &Value, strings: StringComparison) -> Value {
    Value::Boolean(ordering(left, right, strings).is_ge())
}

pub(super) fn register_comparison_operators(registry: &mut OperatorRegistry) {
    const OPERATORS: [(&[&str], &str, Precedence, BinaryOperator); 6] = [
        (&["==", "="], "Equals", Precedence::Equality, BinaryOperator::Equal),
        (&["!=", "<>"], "Not Equals", Precedence::Equality, BinaryOperator::NotEqual),
        (&["<"], "Less Than", Precedence::Relational, BinaryOperator::LessThan),
        (
            &["<="],
            "Less Than Or Equal",
            Precedence::Relational,
            BinaryOperator::LessThanOrEqual,
        ),
        (&[">"], "Greater Than", Precedence::Relational, BinaryOperator::GreaterThan),
        (
            &[">="],
            "Greater Than Or Equal",
            Precedence::Relational,
            BinaryOperator::GreaterThanOrEqual,
        ),
    ];
    for (tags, name, precedence, op) in OPERATORS {
        registry.register_forced(Arc::new(InfixOperator::new(tags, name, precedence, op)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;

    const ORDINAL: StringComparison = StringComparison::Ordinal;

    #[test]
    fn test_numeric_comparison_across_kinds() {
        assert_eq!(equal(&1.into(), &1.0f64.into(), ORDINAL), Value::Boolean(true));
        assert_eq!(equal(&1.into(), &"1".into(), ORDINAL), Value::Boolean(true));
        assert_eq!(less_than(&2.into(), &"10".into(), ORDINAL), Value::Boolean(true));
        assert_eq!(greater_or_equal(&3.into(), &3.into(), ORDINAL), Value::Boolean(true));
    }

    #[test]
    fn test_string_case_sensitivity() {
        assert_eq!(equal(&"A".into(), &"a".into(), ORDINAL), Value::Boolean(false));
        assert_eq!(
            equal(&"A".into(), &"a".into(), StringComparison::IgnoreCase),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_null_and_units() {
        assert_eq!(equal(&Value::Null, &Value::Null, ORDINAL), Value::Boolean(true));
        assert_eq!(less_than(&Value::Null, &0.into(), ORDINAL), Value::Boolean(true));
        assert_eq!(
            equal(&Value::Unit(Unit::points(72.0)), &"1in".into(), ORDINAL),
            Value::Boolean(true)
        );
        assert_eq!(
            not_equal(&Value::Unit(Unit::points(1.0)), &Value::Unit(Unit::points(2.0)), ORDINAL),
            Value::Boolean(true)
        );
    }
}
