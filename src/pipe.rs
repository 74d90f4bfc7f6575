//! The pipe factory
//!
//! A [`Pipe`] wraps a raw coercion function together with its layered
//! configuration. Factory-built pipes run a gate before the coercion
//! function: absent input (null, or the empty string) resolves through the
//! required/default contract without ever reaching the coercion function.
//! Raw pipes (the composition helpers in [`crate::compose`]) skip the gate
//! and manage absence themselves.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::PipeError;
use crate::fixer::Context;
use crate::options::{PipeConfig, PipeOptions};
use crate::types::Schema;

/// The coercion function wrapped by a pipe.
pub type PipeFn =
    dyn Fn(&Value, &PipeConfig, &Context<'_>) -> Result<Value, PipeError> + Send + Sync;

/// A single named coercion/validation step; the atomic schema unit.
///
/// Pipes are immutable and cheap to clone; a pipe built once is safe to
/// share across threads and evaluate concurrently.
#[derive(Clone)]
pub struct Pipe {
    name: String,
    fixer: Arc<PipeFn>,
    options: PipeOptions,
    gated: bool,
}

impl Pipe {
    /// Create a factory pipe: the absent/required/default gate runs before
    /// the coercion function.
    pub fn new<F>(name: impl Into<String>, fixer: F, defaults: PipeOptions) -> Self
    where
        F: Fn(&Value, &PipeConfig, &Context<'_>) -> Result<Value, PipeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            fixer: Arc::new(fixer),
            options: defaults,
            gated: true,
        }
    }

    /// Create a raw pipe: the coercion function sees every input, including
    /// absent ones.
    pub(crate) fn raw<F>(name: impl Into<String>, fixer: F) -> Self
    where
        F: Fn(&Value, &PipeConfig, &Context<'_>) -> Result<Value, PipeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            fixer: Arc::new(fixer),
            options: PipeOptions::new(),
            gated: false,
        }
    }

    /// The pipe's name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the pipe.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Layer a full option set on top of the current configuration.
    pub fn with(mut self, options: PipeOptions) -> Self {
        self.options = self.options.layered(&options);
        self
    }

    /// Set the default substituted for absent or unfixable input.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.with(PipeOptions::new().default_value(value))
    }

    /// Mark absent input as a hard "required" failure.
    pub fn required(self, required: bool) -> Self {
        self.with(PipeOptions::new().required(required))
    }

    /// Enable or disable loose-type conversion.
    pub fn coerce(self, coerce: bool) -> Self {
        self.with(PipeOptions::new().coerce(coerce))
    }

    /// Set the element sub-schema (array pipes).
    pub fn of(self, schema: impl Into<Schema>) -> Self {
        self.with(PipeOptions::new().of(schema))
    }

    /// Apply the pipe to a value.
    pub(crate) fn invoke(&self, value: &Value, ctx: &Context<'_>) -> Result<Value, PipeError> {
        let config = self.options.resolve();

        if self.gated && is_absent(value) {
            if config.required {
                return Err(PipeError::reason("required"));
            }
            // Defaults are pre-validated; return them verbatim.
            return match config.default {
                Some(default) => Ok(default),
                None => Ok(value.clone()),
            };
        }

        (self.fixer)(value, &config, ctx)
    }

    /// The value repair mode substitutes when this pipe fails.
    pub(crate) fn fallback(&self) -> Value {
        self.options.resolve().default.unwrap_or(Value::Null)
    }
}

impl fmt::Debug for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("gated", &self.gated)
            .finish()
    }
}

/// Build a custom pipe with the same default/required/coerce contract as
/// the built-ins.
pub fn pipe<F>(fixer: F, defaults: PipeOptions) -> Pipe
where
    F: Fn(&Value, &PipeConfig, &Context<'_>) -> Result<Value, PipeError> + Send + Sync + 'static,
{
    Pipe::new("custom", fixer, defaults)
}

/// Null and the empty string count as missing input.
pub(crate) fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::{fix, parse, repair};
    use serde_json::json;

    fn floor() -> Pipe {
        pipe(
            |value, _config, _ctx| match value.as_f64() {
                Some(float) => Ok(json!(float.floor() as i64)),
                None => Err(PipeError::reason("not a number")),
            },
            PipeOptions::new().default_value(0),
        )
        .named("floor")
    }

    #[test]
    fn test_absent_value_takes_default() {
        assert_eq!(fix(&Value::Null, floor()).unwrap(), json!(0));
        assert_eq!(fix(&json!(""), floor()).unwrap(), json!(0));
    }

    #[test]
    fn test_absent_without_default_passes_through() {
        let raw = pipe(
            |value, _config, _ctx| Ok(value.clone()),
            PipeOptions::new(),
        );
        assert_eq!(fix(&Value::Null, raw).unwrap(), Value::Null);
    }

    #[test]
    fn test_required_beats_default() {
        let (_, errors) = parse(&Value::Null, floor().required(true));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, PipeError::reason("required"));
    }

    #[test]
    fn test_custom_pipe_coerces_and_fails() {
        assert_eq!(fix(&json!(105.48), floor()).unwrap(), json!(105));
        assert!(fix(&json!("oops"), floor()).is_err());
        assert_eq!(repair(&json!("oops"), floor()), json!(0));
    }

    #[test]
    fn test_instance_default_overrides_factory() {
        let p = floor().default_value(7);
        assert_eq!(fix(&Value::Null, p).unwrap(), json!(7));
    }
}
