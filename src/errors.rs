//! Error types for schema evaluation
//!
//! A pipe failure is either a leaf reason ("not a string", "required") or a
//! group of nested path-tagged errors collected by a composite pipe. The
//! strict [`crate::fix`] entry point converts a non-empty diagnostic list
//! into one [`FixError`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure produced by a single pipe invocation.
///
/// Serializes to the same JSON shape the diagnostics are reported in:
/// a bare string for a leaf reason, an array of `{path, error}` objects
/// for a nested aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipeError {
    /// Leaf failure with a short reason.
    Reason(String),
    /// Aggregate failure from a nested traversal (array elements, nested schema).
    Group(Vec<FieldError>),
}

impl PipeError {
    /// Create a leaf failure
    pub fn reason(text: impl Into<String>) -> Self {
        Self::Reason(text.into())
    }

    /// Create an aggregate failure from nested diagnostics
    pub fn group(errors: Vec<FieldError>) -> Self {
        Self::Group(errors)
    }
}

impl fmt::Display for PipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reason(text) => write!(f, "{}", text),
            Self::Group(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
        }
    }
}

/// A diagnostic tagged with the dot-and-bracket path it was raised at.
///
/// The empty path denotes the schema root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Field path (e.g. "address.city", "novels[1]")
    pub path: String,
    /// What went wrong at that path
    pub error: PipeError,
}

impl FieldError {
    pub fn new(path: impl Into<String>, error: PipeError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{}: {}", self.path, self.error)
        }
    }
}

/// Aggregate failure raised by the strict [`crate::fix`] entry point.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot fix value: {}", fmt_errors(.errors))]
pub struct FixError {
    errors: Vec<FieldError>,
}

impl FixError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// The full diagnostic list, in traversal order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume the error and take the diagnostic list
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

fn fmt_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
