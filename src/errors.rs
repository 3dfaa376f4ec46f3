/*!
 * Error types for the prepapyri application.
 *
 * The normalization core only fails when it is built from a pattern that
 * does not compile. Everything else in the core is reported through the
 * warnings accumulator. The batch shell wraps file and configuration
 * failures in `AppError`.
 */

use thiserror::Error;

/// Errors raised while building normalization stages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A substitution or mask pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern source
        pattern: String,
        /// Message reported by the regex compiler
        message: String,
    },
}

impl PipelineError {
    /// Wrap a regex compilation failure for `pattern`
    pub fn invalid_pattern(pattern: &str, error: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: error.to_string(),
        }
    }
}

/// Main application error type for the batch driver
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error while building the normalization pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
