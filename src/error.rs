//! Error types for the symptom intake service.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading the script corpus or the guideline table.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed entry at index {index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("Duplicate guideline label: {label}")]
    DuplicateLabel { label: String },
}

/// Errors surfaced to callers of the dialogue engine.
///
/// Not finding a template or a guideline is not an error; those paths answer
/// with fallback text instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Missing required input: {field}")]
    MissingInput { field: &'static str },

    #[error("Invalid or expired session: {id}")]
    InvalidSession { id: String },
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
