//! Error types for libxingma-core.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type. Every variant is fatal for the run: this is a batch
/// compiler, so conditions surface and halt rather than degrade.
#[derive(Error, Debug)]
pub enum Error {
    /// A decomposition referenced a character that has no definition.
    #[error("no definition for '{0}'")]
    UndefinedChar(char),

    /// A code failed validation at short-code table emission.
    #[error("invalid code {code:?} (maps to {text:?})")]
    InvalidCode { code: String, text: String },

    /// Report writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
