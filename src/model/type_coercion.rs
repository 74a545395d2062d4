//! Type coercion and comparison utilities
//!
//! Numbers follow a promotion ladder (integer, decimal, double, single). Binary
//! numeric operations promote both sides to the wider of the two kinds, and
//! comparisons pick the most precise kind both operands can be read as before
//! falling back to their textual forms.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use super::unit::{Unit, UnitKind};
use super::value::Value;

/// Result type for type coercion operations
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Errors that can occur during type coercion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The value cannot be read as the requested type
    #[error("Cannot convert {type_name} '{value}' to {target}")]
    InvalidConversion {
        /// Textual form of the offending value
        value: String,
        /// Kind of the offending value
        type_name: &'static str,
        /// Requested target type
        target: &'static str,
    },

    /// Two dimensional values cannot be brought onto a shared unit
    #[error("Cannot combine '{left}' and '{right}' values")]
    IncompatibleUnits {
        /// Unit of the left operand
        left: UnitKind,
        /// Unit of the right operand
        right: UnitKind,
    },
}

impl CoercionError {
    pub(crate) fn invalid(value: &Value, target: &'static str) -> Self {
        CoercionError::InvalidConversion {
            value: value.to_string(),
            type_name: value.type_name(),
            target,
        }
    }
}

/// Position on the numeric promotion ladder, narrowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Integer,
    Decimal,
    Double,
    Single,
}

/// A value already known to be numeric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    Single(f32),
}

impl Number {
    pub fn kind(&self) -> NumericKind {
        match self {
            Number::Integer(_) => NumericKind::Integer,
            Number::Decimal(_) => NumericKind::Decimal,
            Number::Double(_) => NumericKind::Double,
            Number::Single(_) => NumericKind::Single,
        }
    }

    /// Widen to `kind`. Never narrows: a wider number is returned unchanged.
    pub fn promote(self, kind: NumericKind) -> Number {
        if kind <= self.kind() {
            return self;
        }
        match kind {
            NumericKind::Integer => self,
            NumericKind::Decimal => match self {
                Number::Integer(i) => Number::Decimal(Decimal::from(i)),
                other => other,
            },
            NumericKind::Double => Number::Double(self.to_f64()),
            NumericKind::Single => Number::Single(self.to_f64() as f32),
        }
    }

    /// Promote both numbers to the wider of their kinds
    pub fn promote_pair(left: Number, right: Number) -> (Number, Number) {
        let kind = left.kind().max(right.kind());
        (left.promote(kind), right.promote(kind))
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Number::Double(d) => d,
            Number::Single(s) => f64::from(s),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::Decimal(d) => d.is_zero(),
            Number::Double(d) => *d == 0.0,
            Number::Single(s) => *s == 0.0,
        }
    }

    /// Compare after promotion to a shared kind
    pub fn compare(self, other: Number) -> Ordering {
        match Number::promote_pair(self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(&b),
            (Number::Decimal(a), Number::Decimal(b)) => a.cmp(&b),
            (Number::Single(a), Number::Single(b)) => {
                a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
            }
            (a, b) => {
                let (a, b) = (a.to_f64(), b.to_f64());
                a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
            }
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(i) => Value::Integer(i),
            Number::Decimal(d) => Value::Decimal(d),
            Number::Double(d) => Value::Double(d),
            Number::Single(s) => Value::Single(s),
        }
    }
}

/// How strings are compared for equality and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringComparison {
    /// Exact, case-sensitive comparison
    #[default]
    Ordinal,
    /// Case-insensitive comparison
    IgnoreCase,
}

impl StringComparison {
    pub fn compare(self, left: &str, right: &str) -> Ordering {
        match self {
            StringComparison::Ordinal => left.cmp(right),
            StringComparison::IgnoreCase => left
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(right.chars().flat_map(char::to_lowercase)),
        }
    }

    pub fn equals(self, left: &str, right: &str) -> bool {
        self.compare(left, right) == Ordering::Equal
    }
}

/// Type coercion utility for expression values
pub struct TypeCoercion;

impl TypeCoercion {
    /// Read a value as a number. Null yields `None`.
    pub fn to_number(value: &Value) -> CoercionResult<Option<Number>> {
        match value {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(Number::Integer(*i))),
            Value::Decimal(d) => Ok(Some(Number::Decimal(*d))),
            Value::Double(d) => Ok(Some(Number::Double(*d))),
            Value::Single(s) => Ok(Some(Number::Single(*s))),
            Value::Boolean(b) => Ok(Some(Number::Integer(i64::from(*b)))),
            Value::String(s) => Self::parse_number(s)
                .map(Some)
                .ok_or_else(|| CoercionError::invalid(value, "Number")),
            Value::Color(_) | Value::Unit(_) | Value::Sequence(_) => {
                Err(CoercionError::invalid(value, "Number"))
            }
        }
    }

    /// Parse text as the narrowest numeric kind that holds it
    pub fn parse_number(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Integer(i));
        }
        if let Ok(d) = Decimal::from_str(text) {
            return Some(Number::Decimal(d));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Double)
    }

    /// Read a value as a double; null is rejected
    pub fn to_f64(value: &Value) -> CoercionResult<f64> {
        Self::to_number(value)?
            .map(Number::to_f64)
            .ok_or_else(|| CoercionError::invalid(value, "Double"))
    }

    /// Read a value as a decimal; null is rejected
    pub fn to_decimal(value: &Value) -> CoercionResult<Decimal> {
        match Self::to_number(value)? {
            Some(Number::Integer(i)) => Ok(Decimal::from(i)),
            Some(Number::Decimal(d)) => Ok(d),
            Some(other) => Decimal::from_f64(other.to_f64())
                .ok_or_else(|| CoercionError::invalid(value, "Decimal")),
            None => Err(CoercionError::invalid(value, "Decimal")),
        }
    }

    /// Read a value as an integer, rounding real numbers to the nearest whole value
    pub fn to_rounded_integer(value: &Value) -> CoercionResult<i64> {
        match Self::to_number(value)? {
            Some(Number::Integer(i)) => Ok(i),
            Some(Number::Decimal(d)) => d
                .round()
                .to_i64()
                .ok_or_else(|| CoercionError::invalid(value, "Integer")),
            Some(other) => {
                let rounded = other.to_f64().round();
                if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
                    Ok(rounded as i64)
                } else {
                    Err(CoercionError::invalid(value, "Integer"))
                }
            }
            None => Err(CoercionError::invalid(value, "Integer")),
        }
    }

    /// Read a value as an unsigned 32-bit integer for bitwise operators
    pub fn to_u32(value: &Value) -> CoercionResult<u32> {
        let whole = match Self::to_number(value)? {
            Some(Number::Integer(i)) => i,
            Some(Number::Decimal(d)) => d.trunc().to_i64().unwrap_or(-1),
            Some(other) => {
                let f = other.to_f64().trunc();
                if f.is_finite() { f as i64 } else { -1 }
            }
            None => 0,
        };
        u32::try_from(whole).map_err(|_| CoercionError::invalid(value, "UInt32"))
    }

    /// Read a value as a boolean
    pub fn to_boolean(value: &Value) -> CoercionResult<bool> {
        match value {
            Value::Null => Ok(false),
            Value::Boolean(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            Value::Decimal(d) => Ok(!d.is_zero()),
            Value::Double(d) => Ok(*d != 0.0),
            Value::Single(s) => Ok(*s != 0.0),
            Value::Unit(u) => Ok(u.value != 0.0),
            Value::Sequence(items) => Ok(!items.is_empty()),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" | "" => Ok(false),
                _ => Err(CoercionError::invalid(value, "Boolean")),
            },
            Value::Color(_) => Err(CoercionError::invalid(value, "Boolean")),
        }
    }

    /// Read a value as a dimensional value. Strings such as `"1in"` are parsed.
    pub fn to_unit(value: &Value) -> Option<Unit> {
        match value {
            Value::Unit(u) => Some(*u),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Compare using the most precise type both operands can be read as.
    ///
    /// Null sorts below every other value and equals only null.
    pub fn compare(left: &Value, right: &Value, strings: StringComparison) -> Ordering {
        match (left, right) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => strings.compare(a, b),
            (Value::Color(a), Value::Color(b)) => {
                (a.red, a.green, a.blue).cmp(&(b.red, b.green, b.blue))
            }
            (Value::Sequence(a), Value::Sequence(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ordering = Self::compare(x, y, strings);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Unit(_), _) | (_, Value::Unit(_)) => {
                match (Self::to_unit(left), Self::to_unit(right)) {
                    (Some(a), Some(b)) => a
                        .align(&b)
                        .and_then(|(x, y, _)| x.partial_cmp(&y))
                        .unwrap_or_else(|| Self::compare_text(left, right, strings)),
                    _ => Self::compare_text(left, right, strings),
                }
            }
            _ => match (Self::to_number(left), Self::to_number(right)) {
                (Ok(Some(a)), Ok(Some(b))) => a.compare(b),
                _ => Self::compare_text(left, right, strings),
            },
        }
    }

    /// Equality under [`TypeCoercion::compare`]
    pub fn values_equal(left: &Value, right: &Value, strings: StringComparison) -> bool {
        Self::compare(left, right, strings) == Ordering::Equal
    }

    fn compare_text(left: &Value, right: &Value, strings: StringComparison) -> Ordering {
        strings.compare(&left.to_string(), &right.to_string())
    }

    /// Flatten nested sequences into a single list of scalar values
    pub fn flatten(values: &[Value]) -> Vec<Value> {
        let mut flat = Vec::with_capacity(values.len());
        Self::flatten_into(values, &mut flat);
        flat
    }

    fn flatten_into(values: &[Value], out: &mut Vec<Value>) {
        for value in values {
            match value {
                Value::Sequence(items) => Self::flatten_into(items, out),
                other => out.push(other.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_ladder() {
        let (a, b) = Number::promote_pair(Number::Integer(2), Number::Decimal(Decimal::new(15, 1)));
        assert_eq!(a, Number::Decimal(Decimal::from(2)));
        assert_eq!(b.kind(), NumericKind::Decimal);

        let (a, b) = Number::promote_pair(Number::Double(1.0), Number::Single(2.0));
        assert_eq!(a, Number::Single(1.0));
        assert_eq!(b, Number::Single(2.0));

        // promotion never narrows
        assert_eq!(Number::Double(1.5).promote(NumericKind::Integer), Number::Double(1.5));
    }

    #[test]
    fn test_parse_number_prefers_narrowest() {
        assert_eq!(TypeCoercion::parse_number("42"), Some(Number::Integer(42)));
        assert_eq!(
            TypeCoercion::parse_number(" 1.25 "),
            Some(Number::Decimal(Decimal::new(125, 2)))
        );
        assert_eq!(TypeCoercion::parse_number("1e3"), Some(Number::Double(1000.0)));
        assert_eq!(TypeCoercion::parse_number("abc"), None);
        assert_eq!(TypeCoercion::parse_number("inf"), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(TypeCoercion::to_number(&Value::Null).unwrap(), None);
        assert_eq!(
            TypeCoercion::to_number(&Value::Boolean(true)).unwrap(),
            Some(Number::Integer(1))
        );
        assert!(TypeCoercion::to_number(&Value::string("twelve")).is_err());
        assert!(TypeCoercion::to_number(&Value::Unit(Unit::points(1.0))).is_err());
    }

    #[test]
    fn test_to_boolean() {
        assert!(TypeCoercion::to_boolean(&Value::string("TRUE")).unwrap());
        assert!(!TypeCoercion::to_boolean(&Value::Integer(0)).unwrap());
        assert!(!TypeCoercion::to_boolean(&Value::Null).unwrap());
        assert!(TypeCoercion::to_boolean(&Value::string("maybe")).is_err());
    }

    #[test]
    fn test_to_u32() {
        assert_eq!(TypeCoercion::to_u32(&Value::Integer(6)).unwrap(), 6);
        assert_eq!(TypeCoercion::to_u32(&Value::Double(3.9)).unwrap(), 3);
        assert!(TypeCoercion::to_u32(&Value::Integer(-1)).is_err());
    }

    #[test]
    fn test_rounded_integer() {
        assert_eq!(TypeCoercion::to_rounded_integer(&Value::Double(127.5)).unwrap(), 128);
        assert_eq!(
            TypeCoercion::to_rounded_integer(&Value::Decimal(Decimal::new(25, 1))).unwrap(),
            3
        );
        assert_eq!(TypeCoercion::to_rounded_integer(&Value::string("12")).unwrap(), 12);
    }

    #[test]
    fn test_compare_most_precise_type() {
        let ordinal = StringComparison::Ordinal;
        assert_eq!(
            TypeCoercion::compare(&Value::Integer(2), &Value::Double(2.0), ordinal),
            Ordering::Equal
        );
        assert_eq!(
            TypeCoercion::compare(&Value::Integer(10), &Value::string("9"), ordinal),
            Ordering::Greater
        );
        // non-numeric text falls back to string comparison
        assert_eq!(
            TypeCoercion::compare(&Value::Integer(10), &Value::string("abc"), ordinal),
            Ordering::Less
        );
        assert_eq!(
            TypeCoercion::compare(&Value::Null, &Value::Integer(0), ordinal),
            Ordering::Less
        );
        assert!(TypeCoercion::values_equal(&Value::Null, &Value::Null, ordinal));
    }

    #[test]
    fn test_compare_units() {
        let ordinal = StringComparison::Ordinal;
        let inch = Value::Unit(Unit::new(1.0, UnitKind::Inch));
        assert!(TypeCoercion::values_equal(&inch, &Value::Unit(Unit::points(72.0)), ordinal));
        assert_eq!(
            TypeCoercion::compare(&inch, &Value::string("80pt"), ordinal),
            Ordering::Less
        );
    }

    #[test]
    fn test_string_comparison_modes() {
        let a = Value::string("Hello");
        let b = Value::string("hello");
        assert!(!TypeCoercion::values_equal(&a, &b, StringComparison::Ordinal));
        assert!(TypeCoercion::values_equal(&a, &b, StringComparison::IgnoreCase));
    }

    #[test]
    fn test_flatten() {
        let nested = vec![
            Value::Integer(1),
            Value::sequence([Value::Integer(2), Value::sequence([Value::Integer(3)])]),
        ];
        assert_eq!(
            TypeCoercion::flatten(&nested),
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
    }
}
