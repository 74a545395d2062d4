//! String manipulation functions
//!
//! Arguments are read through their textual form, so numbers and units can be
//! passed wherever a string is expected. Character positions count Unicode
//! scalar values, not bytes.

use regex::Regex;

use super::define;
use crate::evaluator::EvaluationResult;
use crate::model::{StringComparison, TypeCoercion, Value};
use crate::registry::function::{Arity, FunctionArgs, FunctionRegistry};

fn text(args: &FunctionArgs<'_>, index: usize) -> EvaluationResult<String> {
    Ok(args.evaluate(index)?.to_string())
}

/// Non-negative count argument, e.g. a start position or a width
fn count(args: &FunctionArgs<'_>, index: usize) -> EvaluationResult<usize> {
    let value = TypeCoercion::to_rounded_integer(&args.evaluate(index)?)?;
    usize::try_from(value)
        .map_err(|_| args.error(format!("argument {} must not be negative, got {value}", index + 1)))
}

/// Fold case when the context compares strings case-insensitively
fn normalized(args: &FunctionArgs<'_>, text: String) -> String {
    match args.context().string_comparison() {
        StringComparison::Ordinal => text,
        StringComparison::IgnoreCase => text.to_lowercase(),
    }
}

fn text_pair(args: &FunctionArgs<'_>) -> EvaluationResult<(String, String)> {
    let haystack = normalized(args, text(args, 0)?);
    let needle = normalized(args, text(args, 1)?);
    Ok((haystack, needle))
}

fn pad_char(args: &FunctionArgs<'_>) -> EvaluationResult<char> {
    Ok(match args.evaluate_optional(2)? {
        Some(fill) => fill.to_string().chars().next().unwrap_or(' '),
        None => ' ',
    })
}

fn pad(args: &FunctionArgs<'_>, left: bool) -> EvaluationResult<Value> {
    let value = text(args, 0)?;
    let width = count(args, 1)?;
    let fill = pad_char(args)?;
    let missing = width.saturating_sub(value.chars().count());
    let padding: String = std::iter::repeat_n(fill, missing).collect();
    Ok(Value::String(if left {
        padding + &value
    } else {
        value + &padding
    }))
}

fn substring(args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
    let value = text(args, 0)?;
    let start = count(args, 1)?;
    let chars = value.chars().skip(start);
    Ok(Value::String(match args.evaluate_optional(2)? {
        Some(length) => {
            let length = usize::try_from(TypeCoercion::to_rounded_integer(&length)?)
                .map_err(|_| args.error("length must not be negative"))?;
            chars.take(length).collect()
        }
        None => chars.collect(),
    }))
}

fn regex_match(args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
    let value = text(args, 0)?;
    let pattern = text(args, 1)?;
    let pattern = match args.context().string_comparison() {
        StringComparison::Ordinal => pattern,
        StringComparison::IgnoreCase => format!("(?i){pattern}"),
    };
    let regex =
        Regex::new(&pattern).map_err(|e| args.error(format!("Invalid regex pattern: {e}")))?;
    Ok(Value::Boolean(regex.is_match(&value)))
}

/// Register the string functions
pub fn register_string_functions(registry: &mut FunctionRegistry) {
    define(
        registry,
        "Concat",
        &["concat"],
        Arity::at_least(1),
        "Concatenates the textual forms of all arguments.",
        |args| {
            let parts = args.evaluate_all()?;
            Ok(Value::String(parts.iter().map(Value::to_string).collect()))
        },
    );
    define(
        registry,
        "Join",
        &["join"],
        Arity::at_least(2),
        "Joins the remaining arguments with the separator given first. Sequences are flattened and nulls skipped.",
        |args| {
            let values = args.evaluate_all()?;
            let Some((separator, values)) = values.split_first() else {
                return Ok(Value::Null);
            };
            let parts: Vec<String> = TypeCoercion::flatten(values)
                .iter()
                .filter(|value| !value.is_null())
                .map(Value::to_string)
                .collect();
            Ok(Value::String(parts.join(&separator.to_string())))
        },
    );
    define(
        registry,
        "Length",
        &["length", "Len", "len"],
        Arity::exactly(1),
        "Number of characters in the textual form of the argument.",
        |args| Ok(Value::Integer(text(args, 0)?.chars().count() as i64)),
    );
    define(
        registry,
        "Contains",
        &["contains"],
        Arity::exactly(2),
        "Whether the first argument contains the second.",
        |args| {
            let (haystack, needle) = text_pair(args)?;
            Ok(Value::Boolean(haystack.contains(&needle)))
        },
    );
    define(
        registry,
        "StartsWith",
        &["startsWith", "startswith"],
        Arity::exactly(2),
        "Whether the first argument starts with the second.",
        |args| {
            let (haystack, needle) = text_pair(args)?;
            Ok(Value::Boolean(haystack.starts_with(&needle)))
        },
    );
    define(
        registry,
        "EndsWith",
        &["endsWith", "endswith"],
        Arity::exactly(2),
        "Whether the first argument ends with the second.",
        |args| {
            let (haystack, needle) = text_pair(args)?;
            Ok(Value::Boolean(haystack.ends_with(&needle)))
        },
    );
    define(
        registry,
        "IndexOf",
        &["indexOf", "indexof"],
        Arity::exactly(2),
        "Character position of the second argument within the first, or -1.",
        |args| {
            let (haystack, needle) = text_pair(args)?;
            Ok(Value::Integer(match haystack.find(&needle) {
                Some(byte) => haystack[..byte].chars().count() as i64,
                None => -1,
            }))
        },
    );
    define(
        registry,
        "Substring",
        &["substring"],
        Arity::range(2, 3),
        "Characters from the zero-based start position, optionally limited to a length.",
        substring,
    );
    define(
        registry,
        "PadLeft",
        &["padLeft", "padleft"],
        Arity::range(2, 3),
        "Pads on the left to the given width, with spaces or the given character.",
        |args| pad(args, true),
    );
    define(
        registry,
        "PadRight",
        &["padRight", "padright"],
        Arity::range(2, 3),
        "Pads on the right to the given width, with spaces or the given character.",
        |args| pad(args, false),
    );
    define(
        registry,
        "Regex",
        &["regex"],
        Arity::exactly(2),
        "Whether the first argument matches the regular expression given second.",
        regex_match,
    );
    define(
        registry,
        "Upper",
        &["upper", "ToUpper", "toUpper"],
        Arity::exactly(1),
        "Upper-case form of the argument.",
        |args| Ok(Value::String(text(args, 0)?.to_uppercase())),
    );
    define(
        registry,
        "Lower",
        &["lower", "ToLower", "toLower"],
        Arity::exactly(1),
        "Lower-case form of the argument.",
        |args| Ok(Value::String(text(args, 0)?.to_lowercase())),
    );
    define(
        registry,
        "Trim",
        &["trim"],
        Arity::exactly(1),
        "Removes leading and trailing whitespace.",
        |args| Ok(Value::String(text(args, 0)?.trim().to_string())),
    );
}
