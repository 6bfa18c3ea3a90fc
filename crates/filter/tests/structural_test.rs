//! Integration tests for Mapper, Repeater, and Switch, alone and nested.

use pretty_assertions::assert_eq;
use serde_json::json;
use sift_filter::prelude::*;

fn codes(runner: &Runner<'_>) -> Vec<(String, Vec<String>)> {
    runner
        .error_codes()
        .into_iter()
        .map(|(path, codes)| (path, codes.into_iter().map(str::to_owned).collect()))
        .collect()
}

// ============================================================================
// MAPPER
// ============================================================================

#[test]
fn mapper_key_policy() {
    let mapper = Mapper::builder()
        .field("id", Int)
        .field("subject", NoOp)
        .allow_extra_keys(false)
        .allow_missing_keys(false)
        .build()
        .unwrap();

    let runner = Runner::new(&mapper, json!({"id": -1, "attachment": "x"}));
    assert!(!runner.is_valid());

    let codes = runner.error_codes();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes.get("attachment"), Some(&vec!["unexpected"]));
    assert_eq!(codes.get("subject"), Some(&vec!["missing"]));
    assert!(codes.get("id").is_none());
}

#[test]
fn mapper_round_trip() {
    let mapper = Mapper::builder().field("a", NoOp).build().unwrap();
    let runner = Runner::new(&mapper, json!({"a": 5}));
    assert!(runner.is_valid());
    assert_eq!(runner.cleaned_data(), Some(&json!({"a": 5})));
}

#[test]
fn mapper_extra_keys_pass_unvalidated() {
    let mapper = Mapper::builder().field("a", Int).build().unwrap();
    let runner = Runner::new(&mapper, json!({"a": "1", "b": "not an int"}));
    assert_eq!(runner.cleaned_data(), Some(&json!({"a": 1, "b": "not an int"})));
}

#[test]
fn mapper_omits_failed_keys_and_reports_every_key() {
    let mapper = Mapper::builder()
        .field("a", Int)
        .field("b", Int)
        .field("c", Int)
        .build()
        .unwrap();

    let result = mapper.run(json!({"a": "x", "b": "2", "c": "y"}));
    let report = result.unwrap_err();
    assert_eq!(report.len(), 2);
    assert!(report.get("a").is_some());
    assert!(report.get("c").is_some());
}

// ============================================================================
// REPEATER
// ============================================================================

#[test]
fn repeater_reports_all_failures_in_one_pass() {
    let repeater = Repeater::new(Int);
    let input = json!(["1", "a", "3", "b", "c", "6"]);
    let runner = Runner::new(&repeater, input);

    let paths: Vec<String> = codes(&runner).into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["1", "3", "4"]);
    assert_eq!(runner.cleaned_data(), None);
}

#[test]
fn repeater_rejects_strings() {
    let filter = Repeater::new(NoOp);
    let runner = Runner::new(&filter, json!("abc"));
    assert_eq!(
        codes(&runner),
        vec![("".to_owned(), vec!["wrong_type".to_owned()])]
    );
}

// ============================================================================
// SWITCH
// ============================================================================

#[test]
fn switch_without_matching_case_or_default() {
    let switch = Switch::builder(|value| value.get("v").and_then(Value::as_str).map(str::to_owned))
        .case("int", Mapper::builder().key("v").field("n", Int).build().unwrap())
        .build()
        .unwrap();

    let runner = Runner::new(&switch, json!({"v": "float", "n": 1.5}));
    let record = &runner.errors().get("").unwrap()[0];
    assert_eq!(record.code, "unexpected_case");
    assert_eq!(record.param("key"), Some("float"));
}

#[test]
fn switch_errors_are_not_prefixed() {
    let switch = Switch::by_field("v")
        .case("int", Mapper::builder().key("v").field("n", Int).build().unwrap())
        .build()
        .unwrap();

    let runner = Runner::new(&switch, json!({"v": "int", "n": 1.5}));
    assert_eq!(runner.error_codes().get("n"), Some(&vec!["not_int"]));
}

// ============================================================================
// NESTING
// ============================================================================

#[test]
fn repeater_of_mappers_combines_index_and_field() {
    let item = Mapper::builder().field("x", Int).build().unwrap();
    let list = Repeater::new(item);

    let runner = Runner::new(&list, json!([{"x": "bad"}, {"x": "1"}]));
    assert_eq!(
        codes(&runner),
        vec![("0.x".to_owned(), vec!["not_numeric".to_owned()])]
    );
}

#[test]
fn three_levels_of_nesting() {
    let point = Mapper::builder()
        .field("x", Required.pipe(Int))
        .field("y", Required.pipe(Int))
        .build()
        .unwrap();
    let shape = Mapper::builder()
        .field("points", Required.pipe(Repeater::new(point)))
        .build()
        .unwrap();
    let shapes = Repeater::new(shape);

    let input = json!([
        {"points": [{"x": 1, "y": 2}]},
        {"points": [{"x": 1, "y": 2}, {"x": "q"}]},
    ]);
    let runner = Runner::new(&shapes, input);

    assert_eq!(
        codes(&runner),
        vec![
            ("1.points.1.x".to_owned(), vec!["not_numeric".to_owned()]),
            ("1.points.1.y".to_owned(), vec!["empty".to_owned()]),
        ]
    );
}

#[test]
fn switch_inside_repeater() {
    let event = Switch::by_field("kind")
        .case("a", Mapper::builder().key("kind").field("n", Required.pipe(Int)).build().unwrap())
        .default(NoOp)
        .build()
        .unwrap();
    let events = Repeater::new(event);

    let runner = Runner::new(&events, json!([{"kind": "b"}, {"kind": "a"}]));
    assert_eq!(runner.error_codes().get("1.n"), Some(&vec!["empty"]));
    assert_eq!(runner.errors().len(), 1);
}

#[test]
fn errors_serialize_in_report_shape() {
    let item = Mapper::builder().field("x", Int).build().unwrap();
    let filter = Repeater::new(item);
    let runner = Runner::new(&filter, json!([{"x": "1.5"}]));

    assert_eq!(
        runner.errors_json(),
        json!({"0.x": [{"code": "not_int", "message": "Integer value expected."}]})
    );
    assert_eq!(
        serde_json::to_value(runner.errors()).unwrap(),
        runner.errors_json()
    );
}

// ============================================================================
// FAILURES WITHOUT A REASON
// ============================================================================

/// Fails without reporting anything.
#[derive(Debug)]
struct Silent;

impl Filter for Silent {
    fn apply(&self, _value: Value) -> FilterResult {
        Err(ErrorReport::new())
    }
}

#[test]
fn silent_failure_inside_repeater_is_reported_per_element() {
    let repeater = Repeater::new(Silent);
    let runner = Runner::new(&repeater, json!([1, 2]));

    assert!(!runner.is_valid());
    assert_eq!(runner.cleaned_data(), None);
    assert_eq!(
        codes(&runner),
        vec![
            ("0".to_owned(), vec!["invalid".to_owned()]),
            ("1".to_owned(), vec!["invalid".to_owned()]),
        ]
    );
}

#[test]
fn silent_failure_inside_mapper_is_reported_under_key() {
    let mapper = Mapper::builder().field("a", Silent).build().unwrap();
    let runner = Runner::new(&mapper, json!({"a": 1}));

    assert!(!runner.is_valid());
    assert_eq!(runner.error_codes().get("a"), Some(&vec!["invalid"]));
    assert_eq!(runner.errors().get("a").unwrap()[0].param("filter"), Some("Silent"));
}

// ============================================================================
// PATHS THAT RENDER ALIKE
// ============================================================================

#[test]
fn dotted_key_and_nested_key_share_one_path() {
    let inner = Mapper::builder().field("b", Int).build().unwrap();
    let mapper = Mapper::builder()
        .field("a.b", Int)
        .field("a", inner)
        .build()
        .unwrap();
    let runner = Runner::new(&mapper, json!({"a.b": "x", "a": {"b": "1.5"}}));

    assert_eq!(runner.errors().record_count(), 2);
    assert_eq!(
        codes(&runner),
        vec![(
            "a.b".to_owned(),
            vec!["not_numeric".to_owned(), "not_int".to_owned()]
        )]
    );
    assert_eq!(runner.errors_json()["a.b"].as_array().map(Vec::len), Some(2));
}
