//! REPEATER combinator - one chain for every element of a collection

use super::UNEXPECTED_TEMPLATE;
use crate::chain::Chain;
use crate::error::{ErrorRecord, ErrorReport, FieldPath, Segment, codes};
use crate::filter::{Filter, FilterResult};
use crate::value::{Kind, Map, Value};
use std::collections::BTreeSet;

/// Applies one chain to every element of a sequence or every value of a
/// mapping.
///
/// Every element is evaluated, even after a failure, so one pass reports
/// all invalid elements. Errors are attributed to the element's index (for
/// sequences) or key (for mappings). Strings are rejected as `wrong_type`
/// even though they are iterable.
///
/// When `restrict_keys` is set, elements whose index or key is not listed
/// are reported as `unexpected` instead of being filtered.
///
/// # Examples
///
/// ```rust
/// use sift_filter::prelude::*;
/// use serde_json::json;
///
/// let repeater = Repeater::new(Int);
/// let runner = Runner::new(&repeater, json!(["1", "x", "3", "y"]));
///
/// let codes = runner.error_codes();
/// assert_eq!(codes.len(), 2);
/// assert!(codes.contains_key("1"));
/// assert!(codes.contains_key("3"));
/// ```
#[derive(Debug, Clone)]
pub struct Repeater {
    chain: Chain,
    restrict_keys: Option<BTreeSet<Segment>>,
}

impl Repeater {
    /// Creates a repeater applying `filter` to every element.
    pub fn new<F: Filter + 'static>(filter: F) -> Self {
        Self {
            chain: Chain::new(filter),
            restrict_keys: None,
        }
    }

    /// Only allows the listed indices or keys.
    #[must_use = "builder methods must be chained or built"]
    pub fn restrict_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Segment>,
    {
        self.restrict_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the chain applied to each element.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    fn allows(&self, segment: &Segment) -> bool {
        self.restrict_keys
            .as_ref()
            .is_none_or(|keys| keys.contains(segment))
    }

    fn unexpected(&self, segment: &Segment, value: &Value) -> ErrorRecord {
        self.reject(codes::UNEXPECTED, value)
            .param("actual_key", segment.to_string())
            .build()
    }

    fn filter_sequence(&self, items: Vec<Value>) -> FilterResult {
        let mut cleaned = Vec::with_capacity(items.len());
        let mut report = ErrorReport::new();

        for (index, item) in items.into_iter().enumerate() {
            let segment = Segment::Index(index);
            if !self.allows(&segment) {
                report.push(FieldPath::index(index), self.unexpected(&segment, &item));
                continue;
            }

            match self.chain.run(item) {
                Ok(value) => cleaned.push(value),
                Err(child) => report.merge_under(segment, child),
            }
        }

        if report.is_empty() {
            Ok(Value::Array(cleaned))
        } else {
            Err(report)
        }
    }

    fn filter_mapping(&self, map: Map<String, Value>) -> FilterResult {
        let mut cleaned = Map::new();
        let mut report = ErrorReport::new();

        for (key, item) in map {
            let segment = Segment::Key(key);
            if !self.allows(&segment) {
                let record = self.unexpected(&segment, &item);
                report.push(FieldPath::root().prefixed(segment), record);
                continue;
            }

            match self.chain.run(item) {
                Ok(value) => {
                    if let Segment::Key(key) = segment {
                        cleaned.insert(key, value);
                    }
                }
                Err(child) => report.merge_under(segment, child),
            }
        }

        if report.is_empty() {
            Ok(Value::Object(cleaned))
        } else {
            Err(report)
        }
    }
}

impl Filter for Repeater {
    fn apply(&self, value: Value) -> FilterResult {
        match value {
            Value::Array(items) => self.filter_sequence(items),
            Value::Object(map) => self.filter_mapping(map),
            other => Err(ErrorRecord::wrong_type(&other, &[Kind::Array, Kind::Object]).into()),
        }
    }

    fn templates(&self) -> &'static [(&'static str, &'static str)] {
        &[(codes::UNEXPECTED, UNEXPECTED_TEMPLATE)]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterExt;
    use crate::filters::{Int, Min, NoOp, Required};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_sequence_preserves_order_and_length() {
        let repeater = Repeater::new(Int);
        assert_eq!(repeater.run(json!(["1", 2, "3"])), Ok(json!([1, 2, 3])));
    }

    #[test]
    fn test_mapping_preserves_keys() {
        let repeater = Repeater::new(Int);
        assert_eq!(
            repeater.run(json!({"b": "2", "a": "1"})),
            Ok(json!({"b": 2, "a": 1}))
        );
    }

    #[test]
    fn test_reports_every_failing_element() {
        let repeater = Repeater::new(Int.pipe(Min::new(0)));
        let report = repeater.run(json!(["x", -1, 5, "y"])).unwrap_err();

        assert_eq!(report.len(), 3);
        assert_eq!(report.codes().get("0"), Some(&vec!["not_numeric"]));
        assert_eq!(report.codes().get("1"), Some(&vec!["too_small"]));
        assert_eq!(report.codes().get("3"), Some(&vec!["not_numeric"]));
    }

    #[test]
    fn test_mapping_errors_keyed_by_original_key() {
        let repeater = Repeater::new(Int);
        let report = repeater.run(json!({"ok": 1, "bad": "z"})).unwrap_err();
        assert_eq!(report.codes().get("bad"), Some(&vec!["not_numeric"]));
    }

    #[rstest]
    #[case(json!("abc"), "String")]
    #[case(json!(42), "Number")]
    #[case(json!(true), "Boolean")]
    fn test_non_collection_is_wrong_type(#[case] input: Value, #[case] kind: &str) {
        let report = Repeater::new(NoOp).run(input).unwrap_err();
        let record = &report.get("").unwrap()[0];
        assert_eq!(record.code, codes::WRONG_TYPE);
        assert_eq!(record.param("incoming"), Some(kind));
        assert_eq!(record.param("allowed"), Some("Array, Object"));
    }

    #[test]
    fn test_null_passes() {
        assert_eq!(Repeater::new(Required).run(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_null_elements_reach_required() {
        let report = Repeater::new(Required).run(json!([1, null])).unwrap_err();
        assert_eq!(report.codes().get("1"), Some(&vec!["empty"]));
    }

    #[test]
    fn test_restrict_keys_on_sequence() {
        let repeater = Repeater::new(NoOp).restrict_keys([0usize, 1]);
        assert!(repeater.run(json!([1, 2])).is_ok());

        let report = repeater.run(json!([1, 2, 3])).unwrap_err();
        assert_eq!(report.codes().get("2"), Some(&vec!["unexpected"]));
        assert_eq!(report.get("2").unwrap()[0].message, "Unexpected key \"2\".");
    }

    #[test]
    fn test_restrict_keys_on_mapping() {
        let repeater = Repeater::new(NoOp).restrict_keys(["a", "b"]);
        assert!(repeater.run(json!({"a": 1})).is_ok());

        let report = repeater.run(json!({"a": 1, "c": 2})).unwrap_err();
        assert_eq!(report.codes().get("c"), Some(&vec!["unexpected"]));
    }

    #[test]
    fn test_empty_collections() {
        let repeater = Repeater::new(Required);
        assert_eq!(repeater.run(json!([])), Ok(json!([])));
        assert_eq!(repeater.run(json!({})), Ok(json!({})));
    }
}
