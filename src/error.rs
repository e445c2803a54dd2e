//! Error types for the walkthrough crate.

/// Top-level error type.
///
/// Transitions never fail — every operation is a total function over the
/// machine's states, with undefined-from-state transitions defined as
/// no-ops. Errors only surface at construction time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Walkthrough {name} has no steps")]
    EmptySteps { name: String },

    #[error("Duplicate step id in walkthrough {name}: {step}")]
    DuplicateStep { name: String, step: String },

    #[error("Unknown step id in walkthrough {name}: {step}")]
    UnknownStep { name: String, step: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Persistence backend errors.
///
/// These are never surfaced from transition operations — the machine logs
/// them and carries on with the in-memory state. They only reach callers
/// through a backend's own constructor (e.g. opening a state file).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
