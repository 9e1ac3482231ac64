//! Error types shared by the linking and evaluation stages.

use thiserror::Error;

/// Errors that can occur while linking instances or scoring tracks.
#[derive(Debug, Error)]
pub enum Error {
    /// Two structures that must agree in size do not.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Threshold out of range or unknown overlap mode.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Input that makes an overlap score undefined, such as an empty mask
    /// used as the reference operand of intersection-over-self.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A link table that is out of range or maps two instances onto one.
    #[error("invalid link table: {0}")]
    InvalidLinks(String),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for linking and evaluation operations.
pub type Result<T> = std::result::Result<T, Error>;
