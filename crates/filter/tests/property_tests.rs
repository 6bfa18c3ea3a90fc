//! Property-based tests for sift-filter.

use proptest::prelude::*;
use serde_json::json;
use sift_filter::prelude::*;

/// Arbitrary JSON values of bounded size.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Values that `Int` may accept or reject: numbers and numeric-ish strings.
fn arb_numeric_input() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        any::<i32>().prop_map(|n| Value::from(n.to_string())),
        (-100.0f64..100.0).prop_map(Value::from),
        "[0-9x.\\-]{0,5}".prop_map(Value::from),
    ]
}

fn catalog_chains() -> Vec<Chain> {
    vec![
        Int.pipe(Min::new(0)),
        MinLength::new(1).pipe(MaxLength::new(3)),
        Chain::new(NotEmpty::new()),
        Chain::new(Type::new([Kind::String])),
        Chain::new(Choice::new([json!(1), json!("a")])),
        Chain::new(Repeater::new(Int)),
        Chain::new(Mapper::builder().field("a", Int).allow_extra_keys(false).build().unwrap()),
    ]
}

// ============================================================================
// ABSENT VALUE: null passes every chain without Required
// ============================================================================

#[test]
fn null_passes_catalog_chains() {
    for chain in catalog_chains() {
        let runner = Runner::new(&chain, Value::Null);
        assert!(runner.is_valid(), "{chain:?} rejected null");
        assert_eq!(runner.cleaned_data(), Some(&Value::Null));
    }
}

// ============================================================================
// DETERMINISM: the same input always yields the same verdict
// ============================================================================

proptest! {
    #[test]
    fn runner_is_deterministic(value in arb_value()) {
        for chain in catalog_chains() {
            let first = Runner::new(&chain, value.clone()).into_result();
            let second = Runner::new(&chain, value.clone()).into_result();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn validity_iff_empty_report(value in arb_value()) {
        for chain in catalog_chains() {
            let runner = Runner::new(&chain, value.clone());
            prop_assert_eq!(runner.is_valid(), runner.errors().is_empty());
        }
    }
}

// ============================================================================
// ASSOCIATIVITY: grouping of pipes never changes the result
// ============================================================================

proptest! {
    #[test]
    fn pipe_is_associative(value in arb_numeric_input(), lo in -50i32..0, hi in 0i32..50) {
        let left = pipe(pipe(Int, Min::new(lo)), Max::new(hi));
        let right = pipe(Int, pipe(Min::new(lo), Max::new(hi)));
        let flat = Int.pipe(Min::new(lo)).pipe(Max::new(hi));

        let expected = Runner::new(&flat, value.clone()).into_result();
        prop_assert_eq!(Runner::new(&left, value.clone()).into_result(), expected.clone());
        prop_assert_eq!(Runner::new(&right, value).into_result(), expected);
    }
}

// ============================================================================
// REPEATER: every failing element is reported, nothing else
// ============================================================================

proptest! {
    #[test]
    fn repeater_reports_exactly_failing_indices(items in prop::collection::vec(arb_numeric_input(), 0..12)) {
        let repeater = Repeater::new(Int);
        let runner = Runner::new(&repeater, Value::Array(items.clone()));

        let failing: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| Int.run((*item).clone()).is_err())
            .map(|(index, _)| index.to_string())
            .collect();

        let reported: Vec<String> = runner.error_codes().into_keys().collect();
        prop_assert_eq!(&reported, &failing);

        if failing.is_empty() {
            let cleaned = runner.cleaned_data().and_then(Value::as_array).map(Vec::len);
            prop_assert_eq!(cleaned, Some(items.len()));
        }
    }

    #[test]
    fn mapper_reports_each_failing_key(a in arb_numeric_input(), b in arb_numeric_input()) {
        let mapper = Mapper::builder().field("a", Int).field("b", Int).build().unwrap();
        let runner = Runner::new(&mapper, json!({"a": a.clone(), "b": b.clone()}));

        let codes = runner.error_codes();
        prop_assert_eq!(codes.contains_key("a"), Int.run(a).is_err());
        prop_assert_eq!(codes.contains_key("b"), Int.run(b).is_err());
    }
}
