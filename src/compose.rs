//! Composition helpers
//!
//! [`schema`] wraps an arbitrary sub-schema as a single pipe so nested
//! shapes can sit inside a pipe list or a record field; [`join`] composes
//! several pipes into one with pipe-list semantics.

use serde_json::{Map, Value};

use crate::errors::PipeError;
use crate::pipe::{is_absent, Pipe};
use crate::types::Schema;

/// Wrap a nested schema as a single reusable pipe.
///
/// Absent input is seeded with `{}` for record sub-schemas (`null`
/// otherwise) before delegating to the evaluator, so a missing object still
/// comes back fully shaped. Nested diagnostics aggregate into one grouped
/// failure at the pipe's own path.
pub fn schema(def: impl Into<Schema>) -> Pipe {
    let def = def.into();
    let seeds_record = matches!(def, Schema::Record(_));

    Pipe::raw("schema", move |value: &Value, _config, ctx| {
        let seeded;
        let value = if is_absent(value) {
            seeded = if seeds_record {
                Value::Object(Map::new())
            } else {
                Value::Null
            };
            &seeded
        } else {
            value
        };

        let (fixed, errors) = ctx.eval(value, &def, ctx.path());
        if errors.is_empty() {
            Ok(fixed)
        } else {
            Err(PipeError::group(errors))
        }
    })
}

/// Compose several pipes into one, applied left-to-right.
///
/// Failure semantics mirror a pipe-list schema: fail-fast with the first
/// step's error in strict evaluation, per-step default substitution in
/// repair.
pub fn join(pipes: impl IntoIterator<Item = Pipe>) -> Pipe {
    let def = Schema::List(pipes.into_iter().map(Schema::Pipe).collect());

    Pipe::raw("join", move |value: &Value, _config, ctx| {
        let (fixed, mut errors) = ctx.eval(value, &def, ctx.path());
        match errors.pop() {
            None => Ok(fixed),
            Some(failure) => Err(failure.error),
        }
    })
}
