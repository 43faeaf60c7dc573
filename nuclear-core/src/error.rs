//! Error types for nuclear-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A read was attempted for a type that has never been published.
    #[error("No data published for type {type_name}")]
    MissingData { type_name: &'static str },

    /// `on` was called without any trigger types. Such a callback could never fire.
    #[error("Subscription has an empty trigger set")]
    EmptyTriggerSet,

    /// A resolved value did not have the type its argument position expects.
    #[error("Type mismatch: value is not a {expected}")]
    TypeMismatch { expected: &'static str },

    /// A callback received a different number of resolved values than it takes.
    #[error("Arity mismatch: callback takes {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A reactor handed to a controller reads from a different data store.
    #[error("Reactor {reactor} does not share the controller's data store")]
    ForeignStore { reactor: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a [`Error::MissingData`].
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Error::MissingData { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
