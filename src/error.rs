//! Error types for the fiber workflow engine.
//!
//! Only misconfiguration and vocabulary parsing failures are errors. Business
//! outcomes such as an illegal transition or missing evidence are returned as
//! structured decision values, never through this type.

use thiserror::Error;

/// The main error type for the fiber workflow engine.
///
/// # Example
///
/// ```
/// use fiber_workflow::error::EngineError;
///
/// let error = EngineError::RateCardNotFound {
///     id: "acme-2025".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rate card not found: acme-2025");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates an engine invariant.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// The requested rate card id is not in the repository.
    #[error("Rate card not found: {id}")]
    RateCardNotFound {
        /// The rate card id that was requested.
        id: String,
    },

    /// A status string is outside the six-value status vocabulary.
    #[error("Unknown status: {value}")]
    UnknownStatus {
        /// The rejected status text.
        value: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidConfiguration`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
