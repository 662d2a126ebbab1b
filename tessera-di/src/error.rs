//! Error types for component construction and resolution

use crate::key::{ComponentId, Key};
use std::fmt;
use thiserror::Error;

/// Result type alias for DI operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur during DI operations
#[derive(Error, Debug)]
pub enum DiError {
    /// Conflicting bindings detected while constructing a component
    #[error(transparent)]
    Override(#[from] OverrideError),

    /// No reachable, visible binding for the requested key
    #[error("No binding found for {key}")]
    Injection { key: Key },

    /// A binding (transitively) requested itself
    #[error("Circular dependency detected: {path}")]
    CircularDependency { path: String },

    /// Resolution nested deeper than the configured limit
    #[error("Resolution of {key} exceeded maximum depth of {depth}")]
    ResolutionTooDeep { key: Key, depth: usize },

    /// A cached value did not have the type its key promised
    #[error("Resolved value for {key} has unexpected type {found}")]
    TypeMismatch { key: Key, found: &'static str },

    /// Failure raised by a provider body
    #[error(transparent)]
    Provider(#[from] anyhow::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DiError {
    /// Wrap an arbitrary failure raised inside a provider body
    pub fn provider<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        DiError::Provider(error.into())
    }

    /// Whether this error means "nothing to inject" rather than a broken graph
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::Injection { .. })
    }
}

/// Construction-time key collisions
#[derive(Error, Debug)]
pub enum OverrideError {
    /// The same key is declared twice across a component's own modules
    #[error("Duplicate binding for {key}: declared in {first} and again in {second}")]
    Duplicate {
        key: Key,
        first: ModuleLabel,
        second: ModuleLabel,
    },

    /// Several parents expose the same key and the component does not override it
    ///
    /// Only exposures declared by different components conflict. A key that
    /// reaches the component through several parents but is declared by one
    /// common ancestor (a diamond) resolves to that single declaration and is
    /// accepted.
    #[error("Ambiguous binding for {key}: exposed by parent components {}", join_ids(.parents))]
    Ambiguous { key: Key, parents: Vec<ComponentId> },
}

impl OverrideError {
    /// The colliding key
    pub fn key(&self) -> &Key {
        match self {
            OverrideError::Duplicate { key, .. } | OverrideError::Ambiguous { key, .. } => key,
        }
    }
}

/// Human-readable module identity for override diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLabel {
    pub index: usize,
    pub name: Option<String>,
}

impl fmt::Display for ModuleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "module \"{}\"", name),
            None => write!(f, "module #{}", self.index),
        }
    }
}

fn join_ids(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
