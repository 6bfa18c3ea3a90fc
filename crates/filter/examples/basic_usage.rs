//! Basic usage example for sift-filter
//!
//! Run with `RUST_LOG=sift_filter=debug` to see the runner's trace events.

use serde_json::json;
use sift_filter::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A mapping with a required integer id and a non-empty subject
    let message = Mapper::builder()
        .field("id", Required.pipe(Int).pipe(Min::new(1)))
        .field("subject", Required.pipe(MaxLength::new(60)))
        .field("tags", Repeater::new(Required.pipe(MinLength::new(2))))
        .allow_missing_keys(KeyPolicy::only(["tags"]))
        .allow_extra_keys(false)
        .build()?;

    let good = json!({"id": "17", "subject": "hello"});
    let runner = Runner::new(&message, good);
    if let Some(cleaned) = runner.cleaned_data() {
        println!("✓ cleaned: {cleaned}");
    }

    let bad = json!({"id": -1, "tags": ["ok", "x"], "attachment": "a.png"});
    let runner = Runner::new(&message, bad);
    if !runner.is_valid() {
        println!("✗ {}", runner.errors());
        runner.errors().log();
    }

    // Dispatch on a field to pick the right chain
    let event = Switch::by_field("type")
        .case("click", Mapper::builder().key("type").field("x", Required.pipe(Int)).build()?)
        .case("key", Mapper::builder().key("type").field("code", Required).build()?)
        .build()?;

    let runner = Runner::new(&event, json!({"type": "scroll"}));
    println!("✗ {}", runner.errors_json());

    Ok(())
}
