//! Schema type definitions
//!
//! A [`Schema`] is a finite, acyclic description of the expected shape of a
//! value. The shape is decided once at construction time, not inferred at
//! each recursion step: a single pipe, an ordered pipeline, a keyed record,
//! or a type-alias shorthand resolved against the built-in registry.

use indexmap::IndexMap;

use crate::pipe::Pipe;

/// A schema describing the expected shape of a value.
#[derive(Debug, Clone)]
pub enum Schema {
    /// A single coercion step
    Pipe(Pipe),
    /// An ordered pipeline applied left-to-right to one value
    List(Vec<Schema>),
    /// A keyed record of field sub-schemas, in declaration order
    Record(IndexMap<String, Schema>),
    /// A type-alias shorthand ("string", "number[]", ...), resolved against
    /// the built-in registry during evaluation
    Alias(String),
}

impl Schema {
    /// Build a record schema from `(field, sub-schema)` pairs.
    ///
    /// Declaration order is preserved; a repeated field name replaces the
    /// earlier entry.
    pub fn record<K, S>(fields: impl IntoIterator<Item = (K, S)>) -> Self
    where
        K: Into<String>,
        S: Into<Schema>,
    {
        Schema::Record(
            fields
                .into_iter()
                .map(|(field, sub)| (field.into(), sub.into()))
                .collect(),
        )
    }

    /// Build an alias schema resolved against the built-in registry.
    pub fn alias(name: impl Into<String>) -> Self {
        Schema::Alias(name.into())
    }

    /// Build a pipeline schema from an ordered sequence of pipes.
    pub fn list<S: Into<Schema>>(steps: impl IntoIterator<Item = S>) -> Self {
        Schema::List(steps.into_iter().map(Into::into).collect())
    }
}

impl From<Pipe> for Schema {
    fn from(pipe: Pipe) -> Self {
        Schema::Pipe(pipe)
    }
}

impl From<&Pipe> for Schema {
    fn from(pipe: &Pipe) -> Self {
        Schema::Pipe(pipe.clone())
    }
}

impl From<Vec<Pipe>> for Schema {
    fn from(pipes: Vec<Pipe>) -> Self {
        Schema::List(pipes.into_iter().map(Schema::Pipe).collect())
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(steps: Vec<Schema>) -> Self {
        Schema::List(steps)
    }
}

impl From<&str> for Schema {
    fn from(alias: &str) -> Self {
        Schema::Alias(alias.to_string())
    }
}

impl From<&Schema> for Schema {
    fn from(schema: &Schema) -> Self {
        schema.clone()
    }
}
