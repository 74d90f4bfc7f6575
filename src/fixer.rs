//! The recursive schema evaluator
//!
//! One depth-first traversal with two leaf-failure policies:
//! [`Mode::Collect`] records a path-tagged diagnostic and keeps the original
//! value, [`Mode::Repair`] substitutes the pipe's default and keeps going.
//! Within a pipe list the first failure stops the list; across record fields
//! every field is evaluated and the diagnostics are merged.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{FieldError, FixError, PipeError};
use crate::pipes::lookup_alias;
use crate::types::Schema;

/// How a leaf failure is resolved during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Record the failure and keep the original value
    Collect,
    /// Substitute the pipe's default and keep going
    Repair,
}

/// Per-call state threaded through the recursive traversal.
///
/// Composite pipes receive a context so they can re-enter the evaluator for
/// nested values (array elements, wrapped schemas) under the same mode.
pub struct Context<'a> {
    path: &'a str,
    mode: Mode,
}

impl Context<'_> {
    /// The dot-and-bracket path of the value being evaluated; empty at the
    /// schema root.
    pub fn path(&self) -> &str {
        self.path
    }

    /// Re-enter the evaluator from inside a composite pipe.
    pub fn eval(&self, value: &Value, schema: &Schema, path: &str) -> (Value, Vec<FieldError>) {
        eval(value, schema, path, self.mode)
    }
}

/// Evaluate a value against a schema, collecting diagnostics.
///
/// Never fails: returns the fixed value together with the path-tagged error
/// list (empty on full success). Absent leaves still resolve through the
/// default contract, so a clean input yields a fully-shaped value.
pub fn parse(value: &Value, schema: impl Into<Schema>) -> (Value, Vec<FieldError>) {
    eval(value, &schema.into(), "", Mode::Collect)
}

/// Evaluate a value against a schema, failing on any diagnostic.
pub fn fix(value: &Value, schema: impl Into<Schema>) -> Result<Value, FixError> {
    let (fixed, errors) = parse(value, schema);
    if errors.is_empty() {
        Ok(fixed)
    } else {
        Err(FixError::new(errors))
    }
}

/// Evaluate a value against a schema, substituting defaults for anything
/// invalid. Never fails; always returns a fully-shaped value.
pub fn repair(value: &Value, schema: impl Into<Schema>) -> Value {
    eval(value, &schema.into(), "", Mode::Repair).0
}

fn eval(value: &Value, schema: &Schema, path: &str, mode: Mode) -> (Value, Vec<FieldError>) {
    match schema {
        Schema::Pipe(_) | Schema::Alias(_) => {
            eval_list(value, std::slice::from_ref(schema), path, mode)
        }
        Schema::List(steps) => eval_list(value, steps, path, mode),
        Schema::Record(fields) => eval_record(value, fields, path, mode),
    }
}

/// Fold the steps left-to-right over an accumulator seeded with the value.
///
/// Collect mode is fail-fast: the first failure returns the original input
/// (not the partially transformed accumulator) with one diagnostic. Repair
/// mode substitutes the failing step's default and continues the chain.
fn eval_list(
    value: &Value,
    steps: &[Schema],
    path: &str,
    mode: Mode,
) -> (Value, Vec<FieldError>) {
    let mut acc = value.clone();
    for step in steps {
        match apply_step(&acc, step, path, mode) {
            Ok(next) => acc = next,
            Err(error) => match mode {
                Mode::Collect => {
                    return (value.clone(), vec![FieldError::new(path, error)]);
                }
                Mode::Repair => {
                    acc = match step_fallback(step) {
                        Some(fallback) => {
                            debug!(path, reason = %error, "replaced invalid value with default");
                            fallback
                        }
                        // A schema-definition error, not bad input: the
                        // schema names a pipe that does not exist.
                        None => {
                            warn!(path, reason = %error, "unresolvable schema step, using null");
                            Value::Null
                        }
                    };
                }
            },
        }
    }
    (acc, Vec::new())
}

fn apply_step(value: &Value, step: &Schema, path: &str, mode: Mode) -> Result<Value, PipeError> {
    match step {
        Schema::Pipe(pipe) => pipe.invoke(value, &Context { path, mode }),
        Schema::Alias(name) => lookup_alias(name)?.invoke(value, &Context { path, mode }),
        nested => {
            let (fixed, errors) = eval(value, nested, path, mode);
            if errors.is_empty() {
                Ok(fixed)
            } else {
                Err(PipeError::group(errors))
            }
        }
    }
}

fn step_fallback(step: &Schema) -> Option<Value> {
    match step {
        Schema::Pipe(pipe) => Some(pipe.fallback()),
        Schema::Alias(name) => lookup_alias(name).ok().map(|pipe| pipe.fallback()),
        _ => Some(Value::Null),
    }
}

/// Evaluate every declared field and merge the diagnostics.
///
/// A non-record input is traversed as an empty record, so structurally
/// wrong input surfaces per-field required/type diagnostics instead of one
/// opaque failure. Undeclared input fields are dropped; the result object
/// carries every schema field regardless of errors.
fn eval_record(
    value: &Value,
    fields: &IndexMap<String, Schema>,
    path: &str,
    mode: Mode,
) -> (Value, Vec<FieldError>) {
    let empty = Map::new();
    let source = value.as_object().unwrap_or(&empty);
    let null = Value::Null;

    let mut fixed = Map::new();
    let mut errors = Vec::new();
    for (field, field_schema) in fields {
        let field_path = join_path(path, field);
        let incoming = source.get(field.as_str()).unwrap_or(&null);
        let (val, errs) = eval(incoming, field_schema, &field_path, mode);
        fixed.insert(field.clone(), val);
        errors.extend(errs);
    }
    (Value::Object(fixed), errors)
}

/// Creates a field path from prefix and field name.
fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
