//! Dynamically typed values produced by expressions

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

use super::color::Color;
use super::unit::Unit;

/// Result of evaluating an expression, or a binding supplied by the caller
///
/// The variant set is closed; coercion helpers in
/// [`TypeCoercion`](super::type_coercion::TypeCoercion) match over it exhaustively.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value; unbound variables evaluate to this
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Exact decimal value
    Decimal(Decimal),

    /// Double precision floating point value
    Double(f64),

    /// Single precision floating point value
    Single(f32),

    /// String value
    String(String),

    /// RGB color
    Color(Color),

    /// Dimensional value such as `12pt` or `50%`
    Unit(Unit),

    /// Ordered sequence of values, used by membership tests and aggregates
    Sequence(Vec<Value>),
}

impl Value {
    /// Create a string value
    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Create a sequence value
    pub fn sequence(values: impl IntoIterator<Item = Value>) -> Self {
        Self::Sequence(values.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value is one of the numeric kinds
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Decimal(_) | Self::Double(_) | Self::Single(_)
        )
    }

    /// Whether the value is a non-integer numeric kind
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Decimal(_) | Self::Double(_) | Self::Single(_))
    }

    /// Name of the value kind, used in error messages and by `TypeOf()`
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::Double(_) => "Double",
            Self::Single(_) => "Single",
            Self::String(_) => "String",
            Self::Color(_) => "Color",
            Self::Unit(_) => "Unit",
            Self::Sequence(_) => "Sequence",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Color> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Self::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i32 => Integer,
    i64 => Integer,
    u32 => Integer,
    Decimal => Decimal,
    f64 => Double,
    f32 => Single,
    String => String,
    &str => String,
    Color => Color,
    Unit => Unit,
    Vec<Value> => Sequence,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Convert from serde_json::Value, used for bindings loaded from JSON
impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(d) = n.as_u64().map(Decimal::from) {
                    Self::Decimal(d)
                } else {
                    n.as_f64().map_or(Self::Null, Self::Double)
                }
            }
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Sequence(items.into_iter().map(Value::from).collect()),
            // Structured data has no expression-level representation
            JsonValue::Object(_) => Self::String(value.to_string()),
        }
    }
}

/// Convert to serde_json::Value
impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(b),
            Value::Integer(i) => JsonValue::Number(i.into()),
            Value::Decimal(d) => d
                .normalize()
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map_or_else(|| JsonValue::String(d.to_string()), JsonValue::Number),
            Value::Double(f) => serde_json::Number::from_f64(f)
                .map_or_else(|| JsonValue::String(f.to_string()), JsonValue::Number),
            Value::Single(f) => serde_json::Number::from_f64(f64::from(f))
                .map_or_else(|| JsonValue::String(f.to_string()), JsonValue::Number),
            Value::String(s) => JsonValue::String(s),
            Value::Color(c) => JsonValue::String(c.to_string()),
            Value::Unit(u) => JsonValue::String(u.to_string()),
            Value::Sequence(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
        }
    }
}

/// Textual form of a value, used by string concatenation and text comparison
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{}", d.normalize()),
            Self::Double(d) => write!(f, "{d}"),
            Self::Single(s) => write!(f, "{s}"),
            Self::String(s) => f.write_str(s),
            Self::Color(c) => write!(f, "{c}"),
            Self::Unit(u) => write!(f, "{u}"),
            Self::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let json_value: JsonValue = self.clone().into();
        json_value.serialize(serializer)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::Double(d) => write!(f, "Double({d})"),
            Self::Single(s) => write!(f, "Single({s})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Color(c) => write!(f, "Color({c})"),
            Self::Unit(u) => write!(f, "Unit({u})"),
            Self::Sequence(items) => f.debug_list().entries(items).finish(),
        }
    }
}
