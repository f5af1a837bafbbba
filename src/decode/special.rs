use serde_json::Number;

use crate::constants::{is_keyword, EMPTY_LIST_LITERAL, EMPTY_MAP_LITERAL};
use crate::value::{Map, Value};
use crate::DecodeOptions;

/// Replaces literal markers in string values with their typed equivalents.
/// Anything that is not a string passes through unchanged.
pub fn replace_specials(value: Value) -> Value {
    let text = match value {
        Value::String(text) => text,
        other => return other,
    };
    if is_keyword(&text) {
        return match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Null,
        };
    }
    if is_digits(&text) {
        return match text.parse::<u64>() {
            Ok(n) => Value::Number(Number::from(n)),
            Err(_) => Value::String(text),
        };
    }
    match text.as_str() {
        EMPTY_LIST_LITERAL => Value::Array(Vec::new()),
        EMPTY_MAP_LITERAL => Value::Object(Map::new()),
        _ => Value::String(text),
    }
}

pub fn clean_value(value: Value, options: &DecodeOptions) -> Value {
    clean_value_or(value, options, Value::Null)
}

/// Swaps blank strings and empty containers for `default` unless the options
/// keep them.
pub fn clean_value_or(value: Value, options: &DecodeOptions, default: Value) -> Value {
    let drop = match &value {
        Value::String(s) => s.is_empty() && !options.allow_blank,
        Value::Array(items) => items.is_empty() && !options.allow_empty,
        Value::Object(map) => map.is_empty() && !options.allow_empty,
        _ => false,
    };
    if drop {
        default
    } else {
        value
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
