use std::path::PathBuf;

/// Errors that can occur across Conway.
///
/// Library crates use this type directly; the binary crate converts to
/// `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use conway_core::ConwayError;
///
/// let err = ConwayError::InvalidInput("empty author".into());
/// assert!(err.to_string().contains("empty author"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConwayError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected at the boundary (malformed efforts or change rows).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
