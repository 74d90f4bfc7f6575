//! Built-in pipes
//!
//! Each built-in is produced by the pipe factory with a representative
//! factory default ("" / 0 / false / []) and a coerce-aware coercion
//! function. The alias registry at the bottom resolves the shorthand
//! strings ("string", "number[]", ...) schemas may use in place of pipe
//! values.

use serde_json::{Number, Value};

use crate::errors::{FieldError, PipeError};
use crate::options::PipeOptions;
use crate::pipe::Pipe;
use crate::types::Schema;

/// Accepts strings; with `coerce` (default) stringifies booleans and
/// numbers, otherwise rejects non-strings.
pub fn string() -> Pipe {
    Pipe::new(
        "string",
        |value: &Value, config, _ctx| match value {
            Value::String(text) => Ok(Value::String(text.clone())),
            Value::Bool(flag) if config.coerce => Ok(Value::String(flag.to_string())),
            Value::Number(num) if config.coerce => Ok(Value::String(num.to_string())),
            _ => Err(PipeError::reason("not a string")),
        },
        PipeOptions::new().default_value("").coerce(true),
    )
}

/// Lineage alias for [`string`].
pub fn text() -> Pipe {
    string().named("text")
}

/// Accepts numbers; with `coerce` (default) converts booleans and numeric
/// strings, rejecting non-numeric strings.
pub fn number() -> Pipe {
    Pipe::new(
        "number",
        |value: &Value, config, _ctx| match value {
            Value::Number(num) => Ok(Value::Number(num.clone())),
            Value::Bool(flag) if config.coerce => {
                Ok(Value::Number(Number::from(i64::from(*flag))))
            }
            Value::String(text) if config.coerce => coerce_number(text),
            _ => Err(PipeError::reason("not a number")),
        },
        PipeOptions::new().default_value(0).coerce(true),
    )
}

/// Lineage alias for [`number`].
pub fn float() -> Pipe {
    number().named("float")
}

/// Accepts booleans; with `coerce` (default) applies truthiness to any
/// input, otherwise rejects non-booleans.
pub fn boolean() -> Pipe {
    Pipe::new(
        "boolean",
        |value: &Value, config, _ctx| match value {
            Value::Bool(flag) => Ok(Value::Bool(*flag)),
            other if config.coerce => Ok(Value::Bool(truthy(other))),
            _ => Err(PipeError::reason("not a boolean")),
        },
        PipeOptions::new().default_value(false).coerce(true),
    )
}

/// Requires an array; types each element against the `of` sub-schema,
/// collecting every element failure instead of stopping at the first.
pub fn array() -> Pipe {
    Pipe::new(
        "array",
        |value: &Value, config, ctx| {
            let items = match value {
                Value::Array(items) => items,
                _ => return Err(PipeError::reason("not an array")),
            };
            let element_schema = match &config.of {
                Some(schema) => schema,
                // No element schema: keep the elements as they are.
                None => return Ok(Value::Array(items.clone())),
            };

            let mut fixed = Vec::with_capacity(items.len());
            let mut errors: Vec<FieldError> = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", ctx.path(), i);
                let (val, errs) = ctx.eval(item, element_schema, &item_path);
                fixed.push(val);
                errors.extend(errs);
            }

            if errors.is_empty() {
                Ok(Value::Array(fixed))
            } else {
                Err(PipeError::group(errors))
            }
        },
        PipeOptions::new().default_value(Value::Array(Vec::new())),
    )
}

/// Lineage alias for [`array`].
pub fn list() -> Pipe {
    array().named("list")
}

/// Trims surrounding whitespace; strings only.
pub fn trim() -> Pipe {
    Pipe::new(
        "trim",
        |value: &Value, _config, _ctx| match value {
            Value::String(text) => Ok(Value::String(text.trim().to_string())),
            _ => Err(PipeError::reason("not a string")),
        },
        PipeOptions::new().default_value(""),
    )
}

/// Folds to lowercase; strings only.
pub fn lower() -> Pipe {
    Pipe::new(
        "lower",
        |value: &Value, _config, _ctx| match value {
            Value::String(text) => Ok(Value::String(text.to_lowercase())),
            _ => Err(PipeError::reason("not a string")),
        },
        PipeOptions::new().default_value(""),
    )
}

/// Folds to uppercase; strings only.
pub fn upper() -> Pipe {
    Pipe::new(
        "upper",
        |value: &Value, _config, _ctx| match value {
            Value::String(text) => Ok(Value::String(text.to_uppercase())),
            _ => Err(PipeError::reason("not a string")),
        },
        PipeOptions::new().default_value(""),
    )
}

/// Resolves a type-alias shorthand to a built-in pipe.
///
/// A trailing `[]` wraps the base alias in an array pipe. An unknown alias
/// is a schema-definition error, not a value error.
pub(crate) fn lookup_alias(name: &str) -> Result<Pipe, PipeError> {
    if let Some(base) = name.strip_suffix("[]") {
        let element = lookup_alias(base)?;
        return Ok(array().of(Schema::Pipe(element)));
    }

    match name {
        "string" | "text" => Ok(string()),
        "number" | "float" => Ok(number()),
        "boolean" | "bool" => Ok(boolean()),
        "array" | "list" => Ok(array()),
        "trim" => Ok(trim()),
        "lower" => Ok(lower()),
        "upper" => Ok(upper()),
        _ => Err(PipeError::reason(format!("unrecognized {} pipe", name))),
    }
}

/// Integer strings stay integers; anything else goes through f64, with
/// NaN and infinities rejected.
fn coerce_number(text: &str) -> Result<Value, PipeError> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(Value::Number(Number::from(int)));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| PipeError::reason("not a number"))
}

/// JS-style truthiness: zero, NaN, and the empty string are false; every
/// other value, including arrays and objects, is true.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
