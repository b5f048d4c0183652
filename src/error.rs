//! Error types for nuspec
//!
//! Every failure surfaces to the caller; nothing here is retried or recovered.

use thiserror::Error;

/// Result type alias for nuspec operations
pub type Result<T> = std::result::Result<T, NuspecError>;

/// Error type for manifest reading, writing and configuration
#[derive(Error, Debug)]
pub enum NuspecError {
    /// I/O errors (file open, read, write, stream read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or mismatched XML input
    #[error("Parse error: {0}")]
    Parse(String),

    /// XML writer failure while encoding a manifest
    #[error("Encode error: {0}")]
    Encode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl NuspecError {
    /// Whether this error came from the underlying file system or stream
    pub fn is_io(&self) -> bool {
        matches!(self, NuspecError::Io(_))
    }

    /// Whether this error means the input was not an acceptable manifest
    pub fn is_parse(&self) -> bool {
        matches!(self, NuspecError::Parse(_))
    }
}
