//! Type, presence, membership, and length filters.

use crate::error::{ErrorRecord, WRONG_TYPE_TEMPLATE, codes};
use crate::filter::{Filter, FilterResult};
use crate::value::{Kind, Value};

/// Code for empty values rejected by [`NotEmpty`] and [`Required`].
pub const EMPTY: &str = "empty";
/// Code for values outside a [`Choice`].
pub const NOT_VALID_CHOICE: &str = "not_valid_choice";
/// Code for values shorter than a [`MinLength`].
pub const TOO_SHORT: &str = "too_short";
/// Code for values longer than a [`MaxLength`].
pub const TOO_LONG: &str = "too_long";

const LENGTH_KINDS: [Kind; 3] = [Kind::Array, Kind::Object, Kind::String];

/// Length of a string (in characters), array, or object.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

// ============================================================================
// NOOP
// ============================================================================

/// Returns every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOp;

impl Filter for NoOp {
    fn apply(&self, value: Value) -> FilterResult {
        Ok(value)
    }
}

// ============================================================================
// TYPE
// ============================================================================

/// Accepts only values of the given kinds.
#[derive(Debug, Clone)]
pub struct Type {
    allowed: Vec<Kind>,
}

impl Type {
    /// Creates a filter accepting `allowed` kinds.
    pub fn new(allowed: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Returns the accepted kinds.
    pub fn allowed(&self) -> &[Kind] {
        &self.allowed
    }
}

impl Filter for Type {
    fn apply(&self, value: Value) -> FilterResult {
        if self.allowed.contains(&Kind::of(&value)) {
            Ok(value)
        } else {
            Err(ErrorRecord::wrong_type(&value, &self.allowed).into())
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(codes::WRONG_TYPE, WRONG_TYPE_TEMPLATE)]
    }
}

// ============================================================================
// NOT EMPTY / REQUIRED
// ============================================================================

/// Rejects empty strings, arrays, and objects.
///
/// Scalars other than `null` are never empty. `null` passes unless
/// `allow_none(false)` is set.
#[derive(Debug, Clone, Copy)]
pub struct NotEmpty {
    allow_none: bool,
}

impl NotEmpty {
    /// Creates a filter that lets `null` through.
    pub const fn new() -> Self {
        Self { allow_none: true }
    }

    /// Sets whether `null` is accepted.
    #[must_use = "builder methods must be chained or built"]
    pub const fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }
}

impl Default for NotEmpty {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for NotEmpty {
    fn apply(&self, value: Value) -> FilterResult {
        if length_of(&value) == Some(0) {
            Err(self.reject(EMPTY, &value).into())
        } else {
            Ok(value)
        }
    }

    fn apply_none(&self) -> FilterResult {
        if self.allow_none {
            Ok(Value::Null)
        } else {
            Err(self.reject(EMPTY, &Value::Null).into())
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(EMPTY, "Non-empty value expected.")]
    }
}

/// Rejects `null` and empty values.
///
/// This is the only filter in the catalog that rejects `null` by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Filter for Required {
    fn apply(&self, value: Value) -> FilterResult {
        if length_of(&value) == Some(0) {
            Err(self.reject(EMPTY, &value).into())
        } else {
            Ok(value)
        }
    }

    fn apply_none(&self) -> FilterResult {
        Err(self.reject(EMPTY, &Value::Null).into())
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(EMPTY, "This value is required.")]
    }
}

// ============================================================================
// CHOICE
// ============================================================================

/// Accepts only values equal to one of a fixed set.
///
/// Comparison is exact; `"A"` does not match `"a"`.
#[derive(Debug, Clone)]
pub struct Choice {
    choices: Vec<Value>,
}

impl Choice {
    /// Creates a filter accepting `choices`.
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    fn rendered_choices(&self) -> String {
        let mut rendered: Vec<String> = self.choices.iter().map(Value::to_string).collect();
        rendered.sort_unstable();
        format!("[{}]", rendered.join(", "))
    }
}

impl Filter for Choice {
    fn apply(&self, value: Value) -> FilterResult {
        if self.choices.contains(&value) {
            return Ok(value);
        }
        Err(self
            .reject(NOT_VALID_CHOICE, &value)
            .param("choices", self.rendered_choices())
            .into())
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(NOT_VALID_CHOICE, "Valid options are: {choices}")]
    }
}

// ============================================================================
// LENGTH
// ============================================================================

/// Rejects strings, arrays, and objects shorter than a minimum.
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    min: usize,
}

impl MinLength {
    /// Creates a filter requiring at least `min` elements or characters.
    pub const fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Filter for MinLength {
    fn apply(&self, value: Value) -> FilterResult {
        let Some(length) = length_of(&value) else {
            return Err(ErrorRecord::wrong_type(&value, &LENGTH_KINDS).into());
        };

        if length < self.min {
            return Err(self
                .reject(TOO_SHORT, &value)
                .param("length", length.to_string())
                .param("min", self.min.to_string())
                .into());
        }
        Ok(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(TOO_SHORT, "Value is too short (length must be >= {min}).")]
    }
}

/// Rejects strings, arrays, and objects longer than a maximum.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    /// Creates a filter allowing at most `max` elements or characters.
    pub const fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Filter for MaxLength {
    fn apply(&self, value: Value) -> FilterResult {
        let Some(length) = length_of(&value) else {
            return Err(ErrorRecord::wrong_type(&value, &LENGTH_KINDS).into());
        };

        if length > self.max {
            return Err(self
                .reject(TOO_LONG, &value)
                .param("length", length.to_string())
                .param("max", self.max.to_string())
                .into());
        }
        Ok(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(TOO_LONG, "Value is too long (length must be <= {max}).")]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_errors, assert_passes, assert_unchanged};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("x"))]
    #[case(json!([1]))]
    #[case(json!({"a": 1}))]
    #[case(json!(0))]
    #[case(json!(false))]
    fn test_not_empty_accepts(#[case] input: Value) {
        assert_unchanged(&NotEmpty::new(), input);
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!([]))]
    #[case(json!({}))]
    fn test_not_empty_rejects(#[case] input: Value) {
        assert_errors(&NotEmpty::new(), input, json!({"": [EMPTY]}));
    }

    #[test]
    fn test_not_empty_null_policy() {
        assert_passes(&NotEmpty::new(), Value::Null, Value::Null);
        assert_errors(&NotEmpty::new().allow_none(false), Value::Null, json!({"": [EMPTY]}));
    }

    #[test]
    fn test_required() {
        assert_unchanged(&Required, json!("x"));
        assert_errors(&Required, Value::Null, json!({"": [EMPTY]}));
        assert_errors(&Required, json!(""), json!({"": [EMPTY]}));

        let record = Required.run(Value::Null).unwrap_err();
        assert_eq!(record.get("").unwrap()[0].message, "This value is required.");
    }

    #[test]
    fn test_type() {
        let filter = Type::new([Kind::String, Kind::Number]);
        assert_unchanged(&filter, json!("a"));
        assert_unchanged(&filter, json!(1));
        assert_passes(&filter, Value::Null, Value::Null);

        let report = filter.run(json!(true)).unwrap_err();
        assert_eq!(
            report.get("").unwrap()[0].message,
            "Boolean is not valid (allowed types: Number, String)."
        );
    }

    #[test]
    fn test_choice() {
        let filter = Choice::new(["a", "b"]);
        assert_unchanged(&filter, json!("a"));

        let report = filter.run(json!("A")).unwrap_err();
        let record = &report.get("").unwrap()[0];
        assert_eq!(record.code, NOT_VALID_CHOICE);
        assert_eq!(record.message, r#"Valid options are: ["a", "b"]"#);
    }

    #[rstest]
    #[case(json!("héllo"), true)]
    #[case(json!("hi"), false)]
    #[case(json!([1, 2, 3]), true)]
    #[case(json!({"a": 1}), false)]
    fn test_min_length(#[case] input: Value, #[case] valid: bool) {
        assert_eq!(MinLength::new(3).run(input).is_ok(), valid);
    }

    #[test]
    fn test_max_length() {
        assert_unchanged(&MaxLength::new(2), json!("ab"));
        let report = MaxLength::new(2).run(json!("abc")).unwrap_err();
        let record = &report.get("").unwrap()[0];
        assert_eq!(record.code, TOO_LONG);
        assert_eq!(record.param("length"), Some("3"));
        assert_eq!(record.message, "Value is too long (length must be <= 2).");
    }

    #[test]
    fn test_length_wrong_type() {
        assert_errors(&MinLength::new(1), json!(5), json!({"": [codes::WRONG_TYPE]}));
    }
}
