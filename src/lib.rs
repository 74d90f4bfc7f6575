//! refix - best-effort data fixing
//!
//! Given an untrusted [`serde_json::Value`] and a declarative [`Schema`],
//! refix produces a normalized value of the expected shape. Evaluation is a
//! single depth-first pass with two faces over one recursive core:
//!
//! - [`repair`] never fails: every invalid or missing leaf is replaced by the
//!   pipe's configured default, and the result is always fully shaped.
//! - [`parse`] never fails either, but reports what went wrong: it returns
//!   the fixed value together with a path-tagged diagnostic list.
//! - [`fix`] is the strict face: any diagnostic becomes a [`FixError`].
//!
//! # Design Principles
//!
//! - Deterministic: same value and schema always produce the same output
//! - Pure: no I/O, no shared state; schemas are immutable and reusable
//! - One pass: depth-first, proportional to the size of the input
//! - Fail-fast within a pipe list, collect-all across record fields
//!
//! # Usage
//!
//! ```
//! use refix::{repair, string, number, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::record([
//!     ("name", string()),
//!     ("age", number()),
//! ]);
//!
//! let fixed = repair(&json!({ "name": "Ada", "age": "36" }), &schema);
//! assert_eq!(fixed, json!({ "name": "Ada", "age": 36 }));
//! ```

mod compose;
mod errors;
mod fixer;
mod options;
mod pipe;
mod pipes;
mod types;

pub use compose::{join, schema};
pub use errors::{FieldError, FixError, PipeError};
pub use fixer::{fix, parse, repair, Context};
pub use options::{PipeConfig, PipeOptions};
pub use pipe::{pipe, Pipe};
pub use pipes::{array, boolean, float, list, lower, number, string, text, trim, upper};
pub use types::Schema;
