//! The value model shared by every filter.
//!
//! Filters operate on [`serde_json::Value`], re-exported here as [`Value`].
//! `Value::Null` is the universal "absent" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use serde_json::{Map, Number, Value};

/// The variant of a [`Value`], named the way error messages present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Integer or floating-point number
    Number,
    /// UTF-8 string
    String,
    /// Ordered sequence
    Array,
    /// Keyed mapping
    Object,
}

impl Kind {
    /// Returns the kind of `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns the user-facing name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Number => "Number",
            Self::String => "String",
            Self::Array => "Array",
            Self::Object => "Object",
        }
    }

    /// Joins a set of kinds into a sorted, de-duplicated, comma-separated list.
    #[must_use]
    pub fn join(kinds: &[Self]) -> String {
        let mut names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        names.join(", ")
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the nesting depth of `value`.
///
/// Scalars have depth 1; every enclosing array or object adds one level.
/// Walks the value with an explicit stack so arbitrarily deep input cannot
/// overflow the call stack.
#[must_use]
pub fn depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 1usize)];

    while let Some((current, level)) = stack.pop() {
        deepest = deepest.max(level);
        match current {
            Value::Array(items) => stack.extend(items.iter().map(|item| (item, level + 1))),
            Value::Object(map) => stack.extend(map.values().map(|item| (item, level + 1))),
            _ => {}
        }
    }

    deepest
}

/// Renders a value as a short, human-readable string for error context.
///
/// Strings are rendered without quotes; everything else uses JSON notation.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_of_every_variant() {
        assert_eq!(Kind::of(&json!(null)), Kind::Null);
        assert_eq!(Kind::of(&json!(true)), Kind::Boolean);
        assert_eq!(Kind::of(&json!(1.5)), Kind::Number);
        assert_eq!(Kind::of(&json!("x")), Kind::String);
        assert_eq!(Kind::of(&json!([])), Kind::Array);
        assert_eq!(Kind::of(&json!({})), Kind::Object);
    }

    #[test]
    fn join_sorts_and_dedups() {
        let joined = Kind::join(&[Kind::Object, Kind::Array, Kind::Object]);
        assert_eq!(joined, "Array, Object");
    }

    #[test]
    fn depth_of_nested_values() {
        assert_eq!(depth(&json!(1)), 1);
        assert_eq!(depth(&json!([])), 1);
        assert_eq!(depth(&json!([1, 2])), 2);
        assert_eq!(depth(&json!({"a": [{"b": 1}]})), 4);
    }

    #[test]
    fn depth_handles_very_deep_input() {
        let mut value = json!(0);
        for _ in 0..10_000 {
            value = Value::Array(vec![value]);
        }
        assert_eq!(depth(&value), 10_001);
        // Dropping a deeply nested serde_json::Value recurses; unwind it first.
        let mut current = value;
        while let Value::Array(mut items) = current {
            current = items.pop().unwrap_or(Value::Null);
        }
    }

    #[test]
    fn display_value_strips_string_quotes() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(null)), "null");
    }
}
