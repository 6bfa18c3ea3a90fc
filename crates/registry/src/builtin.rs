//! Factories for the sift-filter reference catalog.

use crate::{FilterProvider, RegistryBuilder, RegistryError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sift_filter::filters::{
    Choice, Int, Max, MaxLength, Min, MinLength, NoOp, NotEmpty, Required, Type,
};
use sift_filter::{Chain, Kind};

/// Registers the reference catalog under the filters' type names.
///
/// | Name        | Arguments                                   |
/// |-------------|---------------------------------------------|
/// | `NoOp`      | none                                        |
/// | `Required`  | none                                        |
/// | `Int`       | none                                        |
/// | `NotEmpty`  | `{"allow_none": bool}` (default `true`)     |
/// | `Type`      | `{"types": ["String", ...]}`                |
/// | `Choice`    | `{"choices": [...]}`                        |
/// | `MinLength` | `{"min": usize}`                            |
/// | `MaxLength` | `{"max": usize}`                            |
/// | `Min`       | `{"min": number, "exclusive": bool}`        |
/// | `Max`       | `{"max": number, "exclusive": bool}`        |
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NotEmptyArgs {
    #[serde(default = "default_true")]
    allow_none: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeArgs {
    types: Vec<Kind>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ChoiceArgs {
    choices: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinLengthArgs {
    min: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaxLengthArgs {
    max: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinArgs {
    min: f64,
    #[serde(default)]
    exclusive: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaxArgs {
    max: f64,
    #[serde(default)]
    exclusive: bool,
}

const fn default_true() -> bool {
    true
}

/// Deserializes factory arguments; `null` means "no arguments".
fn parse<T: DeserializeOwned>(name: &str, args: &Value) -> Result<T, RegistryError> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args.clone()
    };

    serde_json::from_value(args).map_err(|source| RegistryError::InvalidArguments {
        name: name.to_owned(),
        source,
    })
}

impl FilterProvider for Builtins {
    fn name(&self) -> &str {
        "builtin"
    }

    fn register(&self, builder: &mut RegistryBuilder) {
        builder
            .register("NoOp", |args| {
                parse::<NoArgs>("NoOp", args)?;
                Ok(Chain::new(NoOp))
            })
            .register("Required", |args| {
                parse::<NoArgs>("Required", args)?;
                Ok(Chain::new(Required))
            })
            .register("Int", |args| {
                parse::<NoArgs>("Int", args)?;
                Ok(Chain::new(Int))
            })
            .register("NotEmpty", |args| {
                let args: NotEmptyArgs = parse("NotEmpty", args)?;
                Ok(Chain::new(NotEmpty::new().allow_none(args.allow_none)))
            })
            .register("Type", |args| {
                let args: TypeArgs = parse("Type", args)?;
                Ok(Chain::new(Type::new(args.types)))
            })
            .register("Choice", |args| {
                let args: ChoiceArgs = parse("Choice", args)?;
                Ok(Chain::new(Choice::new(args.choices)))
            })
            .register("MinLength", |args| {
                let args: MinLengthArgs = parse("MinLength", args)?;
                Ok(Chain::new(MinLength::new(args.min)))
            })
            .register("MaxLength", |args| {
                let args: MaxLengthArgs = parse("MaxLength", args)?;
                Ok(Chain::new(MaxLength::new(args.max)))
            })
            .register("Min", |args| {
                let args: MinArgs = parse("Min", args)?;
                let filter = Min::new(args.min);
                Ok(Chain::new(if args.exclusive { filter.exclusive() } else { filter }))
            })
            .register("Max", |args| {
                let args: MaxArgs = parse("Max", args)?;
                let filter = Max::new(args.max);
                Ok(Chain::new(if args.exclusive { filter.exclusive() } else { filter }))
            });
    }
}
