//! Pipe configuration
//!
//! A pipe's behavior is settled by three option layers resolved
//! left-to-right: factory defaults, instance options given when the pipe is
//! built, and call-time overrides. [`PipeOptions`] is the partial, layerable
//! form; [`PipeConfig`] is the immutable result handed to the coercion
//! function on every invocation.

use serde_json::Value;

use crate::types::Schema;

/// Partial pipe configuration; unset fields defer to the layer below.
#[derive(Debug, Clone, Default)]
pub struct PipeOptions {
    /// Value substituted when the input is absent (or, in repair mode,
    /// invalid)
    pub default: Option<Value>,
    /// Whether absent input is a hard "required" failure
    pub required: Option<bool>,
    /// Whether loosely-typed input is converted rather than rejected
    pub coerce: Option<bool>,
    /// Element sub-schema, for pipes that recurse (array); boxed because a
    /// schema can hold a pipe that holds options
    pub of: Option<Box<Schema>>,
}

impl PipeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default value
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the required flag
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Set the coerce flag
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = Some(coerce);
        self
    }

    /// Set the element sub-schema
    pub fn of(mut self, schema: impl Into<Schema>) -> Self {
        self.of = Some(Box::new(schema.into()));
        self
    }

    /// Layer `over` on top of `self`; fields set in `over` win.
    pub fn layered(&self, over: &PipeOptions) -> PipeOptions {
        PipeOptions {
            default: over.default.clone().or_else(|| self.default.clone()),
            required: over.required.or(self.required),
            coerce: over.coerce.or(self.coerce),
            of: over.of.clone().or_else(|| self.of.clone()),
        }
    }

    /// Resolve into the final per-invocation configuration.
    pub fn resolve(&self) -> PipeConfig {
        PipeConfig {
            default: self.default.clone(),
            required: self.required.unwrap_or(false),
            coerce: self.coerce.unwrap_or(true),
            of: self.of.as_deref().cloned(),
        }
    }
}

/// Fully resolved configuration for one pipe invocation.
#[derive(Debug, Clone)]
pub struct PipeConfig {
    /// Value substituted when the input is absent
    pub default: Option<Value>,
    /// Whether absent input is a hard "required" failure
    pub required: bool,
    /// Whether loosely-typed input is converted rather than rejected
    pub coerce: bool,
    /// Element sub-schema, for pipes that recurse
    pub of: Option<Schema>,
}
