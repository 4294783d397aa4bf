//! Error types for the growth engine.
//!
//! Every error here is raised while building or configuring parts of an
//! organism. None of them are recoverable mid-run; callers are expected to
//! fix their configuration and start over.

use thiserror::Error;

/// Main error type for `grow-core` operations.
#[derive(Error, Debug)]
pub enum GrowthError {
    /// Malformed parameter bounds, step lists or bank tuples.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parameter bank was queried for a subsystem that was never registered.
    #[error("Key not found in parameter bank: {0}")]
    KeyNotFound(String),

    /// Geometry that would divide by zero or produce NaN positions.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Config file could not be read.
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for `grow-core` operations.
pub type Result<T> = std::result::Result<T, GrowthError>;

impl GrowthError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new missing-key error.
    #[must_use]
    pub fn key_not_found<S: Into<String>>(key: S) -> Self {
        Self::KeyNotFound(key.into())
    }

    /// Creates a new degenerate geometry error.
    #[must_use]
    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        Self::DegenerateGeometry(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_message() {
        let err = GrowthError::config("min 2 > max 1");
        assert_eq!(err.to_string(), "Configuration error: min 2 > max 1");
    }

    #[test]
    fn key_not_found_names_the_key() {
        let err = GrowthError::key_not_found("branch");
        assert!(err.to_string().contains("branch"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GrowthError = io_err.into();
        assert!(matches!(err, GrowthError::Io(_)));
    }
}
