//! Error types for the wind texture pipeline.

use thiserror::Error;

use crate::grid::Component;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Every failure is fatal to a pipeline run; nothing here is retried.
#[derive(Debug, Error)]
pub enum WindError {
    // === Acquisition ===
    #[error("Transport error fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    // === Decoding ===
    #[error("Malformed grid dump: {0}")]
    MalformedDump(String),

    #[error("Required field not found in grid dump: {0}")]
    FieldNotFound(String),

    // === Composition ===
    #[error(
        "Component grids differ in size: east is {east_width}x{east_height}, north is {north_width}x{north_height}"
    )]
    DimensionMismatch {
        east_width: usize,
        east_height: usize,
        north_width: usize,
        north_height: usize,
    },

    #[error("Non-finite {component} sample at index {index}: {value}")]
    InvalidSample {
        component: Component,
        index: usize,
        value: f64,
    },

    // === Output ===
    #[error("Texture encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Request ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl WindError {
    /// Create a Transport error.
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a ToolInvocation error.
    pub fn tool(tool: impl Into<String>, message: impl ToString) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = WindError::transport("https://example.com/grib", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "Transport error fetching https://example.com/grib: HTTP 404 Not Found"
        );

        let err = WindError::tool("grib_set", "exit status 1");
        assert!(err.to_string().contains("grib_set"));

        let err = WindError::FieldNotFound("Ni".to_string());
        assert!(err.to_string().ends_with("Ni"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = WindError::DimensionMismatch {
            east_width: 360,
            east_height: 181,
            north_width: 720,
            north_height: 361,
        };
        assert!(err.to_string().contains("360x181"));
        assert!(err.to_string().contains("720x361"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: WindError = io.into();
        assert!(matches!(err, WindError::Io(_)));
    }
}
