//! Error types for pointer resolution, expansion, loading and validation.

use std::path::PathBuf;
use thiserror::Error;

use crate::pointer::Namespace;

/// Errors while resolving a single pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("malformed pointer \"{pointer}\": expected /definitions/<name> or /properties/<name>")]
    MalformedPointer { pointer: String },

    #[error("unresolved reference: no {namespace} entry named \"{name}\"")]
    UnresolvedReference { namespace: Namespace, name: String },

    #[error("cyclic reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },
}

/// A resolution failure located at the named path where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expansion failed at {path}: {source}")]
pub struct ExpandError {
    /// Dotted/bracketed chain of names, e.g. `properties.Memo.Tags[*]`.
    pub path: String,
    #[source]
    pub source: ResolveError,
}

impl ExpandError {
    /// The underlying resolution failure.
    pub fn cause(&self) -> &ResolveError {
        &self.source
    }
}

/// Errors while loading schema or document text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
