//! Error types for the sentio core library.

use thiserror::Error;

/// Top-level error type for all sentio operations.
#[derive(Error, Debug)]
pub enum SentioError {
    /// Entity not found in the registry.
    #[error("Entity not found: {0}")]
    EntityNotFound(crate::EntityId),

    /// No skill with the given name has been registered.
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// A skill definition failed load-time validation.
    #[error("Invalid skill definition '{name}': {reason}")]
    InvalidDefinition {
        /// Name of the offending definition.
        name: String,
        /// What the validator objected to.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SentioError>;
