//! Numeric coercion and bounds.

use crate::error::ErrorRecord;
use crate::filter::{Filter, FilterResult};
use crate::value::{Kind, Value};

/// Code for strings that do not parse as a number.
pub const NOT_NUMERIC: &str = "not_numeric";
/// Code for NaN and infinities.
pub const NOT_FINITE: &str = "not_finite";
/// Code for numbers with a fractional part.
pub const NOT_INT: &str = "not_int";
/// Code for values below a [`Min`].
pub const TOO_SMALL: &str = "too_small";
/// Code for values above a [`Max`].
pub const TOO_BIG: &str = "too_big";

// ============================================================================
// INT
// ============================================================================

/// Interprets the value as an integer.
///
/// Numeric strings are parsed (surrounding whitespace is ignored, exponent
/// notation is accepted). Numbers with a fractional part are rejected rather
/// than truncated.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// assert_eq!(Int.run(json!(" 42 ")), Ok(json!(42)));
/// assert_eq!(Int.run(json!("1e3")), Ok(json!(1000)));
/// assert!(Int.run(json!("1.5")).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Int;

impl Int {
    fn coerce_float(&self, float: f64, value: &Value) -> FilterResult {
        if !float.is_finite() {
            return Err(self.reject(NOT_FINITE, value).into());
        }
        if float.fract() != 0.0 {
            return Err(self.reject(NOT_INT, value).into());
        }

        // 2^63 and 2^64 are exact as f64, so both range checks are exact.
        if float >= i64::MIN as f64 && float < i64::MAX as f64 {
            Ok(Value::from(float as i64))
        } else if float >= 0.0 && float < u64::MAX as f64 {
            Ok(Value::from(float as u64))
        } else {
            Err(self.reject(NOT_INT, value).into())
        }
    }

    fn coerce_text(&self, text: &str, value: &Value) -> FilterResult {
        let text = text.trim();
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::from(int));
        }
        if let Ok(uint) = text.parse::<u64>() {
            return Ok(Value::from(uint));
        }

        match text.parse::<f64>() {
            Ok(float) => self.coerce_float(float, value),
            Err(_) => Err(self.reject(NOT_NUMERIC, value).into()),
        }
    }
}

impl Filter for Int {
    fn apply(&self, value: Value) -> FilterResult {
        if value.is_i64() || value.is_u64() {
            return Ok(value);
        }

        match &value {
            Value::Number(number) => match number.as_f64() {
                Some(float) => self.coerce_float(float, &value),
                None => Err(self.reject(NOT_NUMERIC, &value).into()),
            },
            Value::String(text) => self.coerce_text(text, &value),
            other => Err(ErrorRecord::wrong_type(other, &[Kind::Number, Kind::String]).into()),
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (NOT_NUMERIC, "Numeric value expected."),
            (NOT_FINITE, "Numeric value expected."),
            (NOT_INT, "Integer value expected."),
        ]
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Rejects numbers below a lower bound.
///
/// The bound is inclusive unless [`exclusive`](Min::exclusive) is set.
/// Non-numeric values are rejected as `wrong_type`; put a coercing filter
/// such as [`Int`] in front to accept numeric strings.
#[derive(Debug, Clone, Copy)]
pub struct Min {
    min: f64,
    exclusive: bool,
}

impl Min {
    /// Creates an inclusive lower bound.
    pub fn new(min: impl Into<f64>) -> Self {
        Self {
            min: min.into(),
            exclusive: false,
        }
    }

    /// Makes the bound exclusive.
    #[must_use = "builder methods must be chained or built"]
    pub const fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

impl Filter for Min {
    fn apply(&self, value: Value) -> FilterResult {
        let Some(actual) = value.as_f64() else {
            return Err(ErrorRecord::wrong_type(&value, &[Kind::Number]).into());
        };

        if actual < self.min || (self.exclusive && actual == self.min) {
            return Err(self
                .reject(TOO_SMALL, &value)
                .param("operator", if self.exclusive { ">" } else { ">=" })
                .param("min", self.min.to_string())
                .into());
        }
        Ok(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(TOO_SMALL, "Value is too small (must be {operator} {min}).")]
    }
}

/// Rejects numbers above an upper bound.
///
/// The bound is inclusive unless [`exclusive`](Max::exclusive) is set.
#[derive(Debug, Clone, Copy)]
pub struct Max {
    max: f64,
    exclusive: bool,
}

impl Max {
    /// Creates an inclusive upper bound.
    pub fn new(max: impl Into<f64>) -> Self {
        Self {
            max: max.into(),
            exclusive: false,
        }
    }

    /// Makes the bound exclusive.
    #[must_use = "builder methods must be chained or built"]
    pub const fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }
}

impl Filter for Max {
    fn apply(&self, value: Value) -> FilterResult {
        let Some(actual) = value.as_f64() else {
            return Err(ErrorRecord::wrong_type(&value, &[Kind::Number]).into());
        };

        if actual > self.max || (self.exclusive && actual == self.max) {
            return Err(self
                .reject(TOO_BIG, &value)
                .param("operator", if self.exclusive { "<" } else { "<=" })
                .param("max", self.max.to_string())
                .into());
        }
        Ok(value)
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(TOO_BIG, "Value is too large (must be {operator} {max}).")]
    }
}

// ============================================================================
// TESTS
// ============================================================================
