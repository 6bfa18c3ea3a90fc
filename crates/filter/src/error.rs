//! Error types for invalid values
//!
//! This module provides the structured record a filter emits when it rejects
//! a value ([`ErrorRecord`]), the path that locates the rejected value inside
//! the input ([`FieldPath`]), and the flat, path-keyed report that a whole
//! evaluation produces ([`ErrorReport`]).
//!
//! Codes and messages use `Cow<'static, str>` so the common case of static
//! codes and fixed messages does not allocate.

use crate::filter::DEFAULT_TEMPLATE;
use crate::value::{Kind, Value, display_value};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// Codes emitted by the core itself.
///
/// Leaf filters define their own codes next to their implementation.
pub mod codes {
    /// The value has the wrong type altogether.
    pub const WRONG_TYPE: &str = "wrong_type";
    /// A declared mapping key is absent and may not be omitted.
    pub const MISSING: &str = "missing";
    /// A mapping key (or collection index) is not allowed.
    pub const UNEXPECTED: &str = "unexpected";
    /// No switch case matched the dispatch key and there is no default.
    pub const UNEXPECTED_CASE: &str = "unexpected_case";
    /// The input nests deeper than the configured limit.
    pub const TOO_DEEP: &str = "too_deep";
    /// A filter rejected the value without saying why.
    pub const INVALID: &str = "invalid";
}

/// Message template shared by every wrong-type rejection.
pub const WRONG_TYPE_TEMPLATE: &str = "{incoming} is not valid (allowed types: {allowed}).";

// ============================================================================
// FIELD PATH
// ============================================================================

/// One step of a [`FieldPath`]: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Key of a mapping entry.
    Key(String),
    /// Position of a sequence element.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a value inside the input, from the outermost segment inwards.
///
/// Renders as the segments joined with `.`; the root path renders as `""`.
///
/// # Examples
///
/// ```rust
/// use sift_filter::error::{FieldPath, Segment};
///
/// let path = FieldPath::key("x").prefixed(Segment::Index(0));
/// assert_eq!(path.to_string(), "0.x");
/// assert_eq!(FieldPath::root().to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[Segment; 4]>,
}

impl FieldPath {
    /// The path of the value handed to the outermost filter.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-segment path naming a mapping key.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::root().prefixed(Segment::Key(key.into()))
    }

    /// A single-segment path naming a sequence index.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self::root().prefixed(Segment::Index(index))
    }

    /// Returns this path with `segment` placed in front of it.
    #[must_use]
    pub fn prefixed(mut self, segment: Segment) -> Self {
        self.segments.insert(0, segment);
        self
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// ERROR RECORD
// ============================================================================

/// A coded description of one invalid value.
///
/// Produced by exactly the filter that detected the problem. Construction
/// goes through [`ErrorRecordBuilder`] so the message can be rendered from a
/// template once every context entry is known.
///
/// # Examples
///
/// ```rust
/// use sift_filter::ErrorRecord;
///
/// let record = ErrorRecord::builder("too_small", "Value is too small (must be >= {min}).")
///     .param("min", "5")
///     .build();
///
/// assert_eq!(record.code, "too_small");
/// assert_eq!(record.message, "Value is too small (must be >= 5).");
/// assert_eq!(record.param("min"), Some("5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Error code for programmatic handling.
    ///
    /// Examples: "wrong_type", "missing", "too_big"
    pub code: Cow<'static, str>,

    /// Human-readable message rendered from the filter's template.
    pub message: Cow<'static, str>,

    /// Values that parameterised the message, in insertion order.
    ///
    /// Example: `[("min", "5"), ("actual", "3")]`
    pub context: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ErrorRecord {
    /// Creates a record with a fixed message and no context.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Starts a record whose message is rendered from `template`.
    pub fn builder(
        code: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
    ) -> ErrorRecordBuilder {
        ErrorRecordBuilder {
            code: code.into(),
            template: template.into(),
            context: Vec::new(),
        }
    }

    /// Creates the shared wrong-type record.
    #[must_use]
    pub fn wrong_type(value: &Value, allowed: &[Kind]) -> Self {
        Self::builder(codes::WRONG_TYPE, WRONG_TYPE_TEMPLATE)
            .param("incoming", Kind::of(value).name())
            .param("allowed", Kind::join(allowed))
            .param("value", display_value(value))
            .build()
    }

    /// Creates the generic record for a failure that gave no reason.
    #[must_use]
    pub fn invalid() -> Self {
        Self::new(codes::INVALID, DEFAULT_TEMPLATE)
    }

    /// Adds a context entry unless one with the same name exists.
    pub(crate) fn ensure_param(
        &mut self,
        name: &'static str,
        value: impl Into<Cow<'static, str>>,
    ) {
        if self.param(name).is_none() {
            self.context.push((Cow::Borrowed(name), value.into()));
        }
    }

    /// Looks up a context value by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }

    /// Converts the record to JSON, optionally including its context.
    #[must_use]
    pub fn to_json(&self, with_context: bool) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("code".into(), Value::String(self.code.to_string()));
        object.insert("message".into(), Value::String(self.message.to_string()));

        if with_context {
            let context = self
                .context
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            object.insert("context".into(), Value::Object(context));
        }

        Value::Object(object)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorRecord {}

/// Context is deliberately left out; use [`ErrorRecord::to_json`] when it
/// should be exposed.
impl Serialize for ErrorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorRecord", 2)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Builder that renders an [`ErrorRecord`] message from a template.
///
/// `{name}` placeholders in the template are replaced with the matching
/// context entry; placeholders without an entry are kept verbatim.
#[derive(Debug, Clone)]
pub struct ErrorRecordBuilder {
    code: Cow<'static, str>,
    template: Cow<'static, str>,
    context: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ErrorRecordBuilder {
    /// Adds a context entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn param(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.context.push((name.into(), value.into()));
        self
    }

    /// Renders the message and produces the record.
    #[must_use]
    pub fn build(self) -> ErrorRecord {
        let message = render(&self.template, &self.context);
        ErrorRecord {
            code: self.code,
            message,
            context: self.context,
        }
    }
}

impl From<ErrorRecordBuilder> for ErrorRecord {
    fn from(builder: ErrorRecordBuilder) -> Self {
        builder.build()
    }
}

fn render(
    template: &Cow<'static, str>,
    context: &[(Cow<'static, str>, Cow<'static, str>)],
) -> Cow<'static, str> {
    if !template.contains('{') {
        return template.clone();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest: &str = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Cow::Owned(out);
        };

        let name = &after[..close];
        match context.iter().find(|(k, _)| k.as_ref() == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..=open + close + 1]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

// ============================================================================
// ERROR REPORT
// ============================================================================

/// Every error produced by one evaluation, keyed by the rendered path of the
/// value that caused it.
///
/// Paths keep the order in which they were first reported; records under a
/// path keep the order in which they were pushed. Two paths that render to
/// the same text (the key `"a.b"` and the key `a` followed by `b`) share one
/// entry, so no record is ever lost when the report is flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    entries: IndexMap<String, Vec<ErrorRecord>>,
}

impl ErrorReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates a report holding one record at the root path.
    #[must_use]
    pub fn single(record: ErrorRecord) -> Self {
        let mut report = Self::new();
        report.push(FieldPath::root(), record);
        report
    }

    /// Adds a record under `path`.
    pub fn push(&mut self, path: FieldPath, record: ErrorRecord) {
        self.entries.entry(path.to_string()).or_default().push(record);
    }

    /// Moves every record of `other` into this report, keeping its paths.
    pub fn merge(&mut self, other: Self) {
        for (path, records) in other.entries {
            self.entries.entry(path).or_default().extend(records);
        }
    }

    /// Moves every record of `child` into this report with `segment`
    /// prepended to its path.
    ///
    /// This is how a structural filter attributes the errors of a sub-value
    /// to the key or index it was found under. An empty `child` still marks
    /// the sub-value as failed with a single `invalid` record.
    pub fn merge_under(&mut self, segment: impl Into<Segment>, child: Self) {
        let segment = segment.into();
        if child.is_empty() {
            self.push(FieldPath::root().prefixed(segment), ErrorRecord::invalid());
            return;
        }

        for (path, records) in child.entries {
            let path = if path.is_empty() {
                segment.to_string()
            } else {
                format!("{segment}.{path}")
            };
            self.entries.entry(path).or_default().extend(records);
        }
    }

    /// Returns true when no errors were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of paths with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total number of records across all paths.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns the records reported under the rendered path `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[ErrorRecord]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Returns the records reported under `path`.
    #[must_use]
    pub fn get_path(&self, path: &FieldPath) -> Option<&[ErrorRecord]> {
        self.get(&path.to_string())
    }

    /// Iterates over rendered paths and their records.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ErrorRecord])> {
        self.entries
            .iter()
            .map(|(path, records)| (path.as_str(), records.as_slice()))
    }

    /// Returns the error codes per rendered path.
    #[must_use]
    pub fn codes(&self) -> IndexMap<String, Vec<&str>> {
        self.entries
            .iter()
            .map(|(path, records)| {
                (
                    path.clone(),
                    records.iter().map(|r| r.code.as_ref()).collect(),
                )
            })
            .collect()
    }

    /// Converts the report to JSON in the `{path: [{code, message}]}` shape.
    ///
    /// Context often echoes the rejected input; only include it when the
    /// consumer is trusted.
    #[must_use]
    pub fn to_json(&self, with_context: bool) -> Value {
        let object = self
            .entries
            .iter()
            .map(|(path, records)| {
                let records = records.iter().map(|r| r.to_json(with_context)).collect();
                (path.clone(), Value::Array(records))
            })
            .collect();
        Value::Object(object)
    }

    /// Emits one `WARN` event per record.
    pub fn log(&self) {
        for (path, records) in &self.entries {
            for record in records {
                tracing::warn!(
                    path = %path,
                    code = %record.code,
                    "{}",
                    record.message
                );
            }
        }
    }

    /// Names `filter` as the producer of every record that names none yet.
    ///
    /// An empty report becomes a single `invalid` record, so a failure is
    /// never reported without a reason.
    pub(crate) fn attributed_to(mut self, filter: &'static str) -> Self {
        if self.is_empty() {
            self = Self::single(ErrorRecord::invalid());
        }
        for record in self.entries.values_mut().flatten() {
            record.ensure_param("filter", filter);
        }
        self
    }

    /// Records each record's rendered path in its context.
    pub(crate) fn with_paths(mut self) -> Self {
        for (path, records) in &mut self.entries {
            for record in records {
                record.ensure_param("path", path.clone());
            }
        }
        self
    }
}

impl From<ErrorRecord> for ErrorReport {
    fn from(record: ErrorRecord) -> Self {
        Self::single(record)
    }
}

impl From<ErrorRecordBuilder> for ErrorReport {
    fn from(builder: ErrorRecordBuilder) -> Self {
        Self::single(builder.build())
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = (&'a String, &'a Vec<ErrorRecord>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<ErrorRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, records) in &self.entries {
            map.serialize_entry(path, records)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filtering failed with {} error(s):", self.record_count())?;
        for (path, records) in &self.entries {
            for record in records {
                if path.is_empty() {
                    writeln!(f, "  {record}")?;
                } else {
                    writeln!(f, "  [{path}] {record}")?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

// ============================================================================
// TESTS
// ============================================================================
