use thiserror::Error;

/// kpod error types
#[derive(Error, Debug)]
pub enum KpodError {
    /// External build tool could not be located or does not run
    #[error("{tool} is not installed on this server: {reason}")]
    DependencyMissing { tool: String, reason: String },

    /// External build tool ran and failed, or could not be spawned
    #[error("error running the {tool} bud command: {reason}")]
    ExecutionFailed {
        tool: String,
        reason: String,
        exit_code: Option<i32>,
    },

    /// Image reference did not resolve to any stored image
    #[error("No such image: {0}")]
    ImageNotFound(String),

    /// Image reference matched more than one stored image
    #[error("Ambiguous image reference: {0}")]
    AmbiguousReference(String),

    /// Image store could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Runtime handle could not be constructed
    #[error("Unable to get runtime: {0}")]
    RuntimeInit(String),

    /// Request-scoped work was cancelled before it finished
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KpodError {
    /// Exit code the CLI should terminate with for this error.
    ///
    /// A failed delegated run mirrors the tool's own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            KpodError::ExecutionFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for KpodError {
    fn from(err: serde_json::Error) -> Self {
        KpodError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for KpodError {
    fn from(err: serde_yaml::Error) -> Self {
        KpodError::SerializationError(err.to_string())
    }
}

/// Result type alias for kpod operations
pub type Result<T> = std::result::Result<T, KpodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_missing_display() {
        let error = KpodError::DependencyMissing {
            tool: "buildah".to_string(),
            reason: "No such file or directory (os error 2)".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "buildah is not installed on this server: No such file or directory (os error 2)"
        );
    }

    #[test]
    fn test_execution_failed_display() {
        let error = KpodError::ExecutionFailed {
            tool: "buildah".to_string(),
            reason: "exit status: 125".to_string(),
            exit_code: Some(125),
        };
        assert_eq!(
            error.to_string(),
            "error running the buildah bud command: exit status: 125"
        );
    }

    #[test]
    fn test_exit_code_mirrors_tool() {
        let error = KpodError::ExecutionFailed {
            tool: "buildah".to_string(),
            reason: "exit status: 125".to_string(),
            exit_code: Some(125),
        };
        assert_eq!(error.exit_code(), 125);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let signalled = KpodError::ExecutionFailed {
            tool: "buildah".to_string(),
            reason: "signal: 9 (SIGKILL)".to_string(),
            exit_code: None,
        };
        assert_eq!(signalled.exit_code(), 1);

        let missing = KpodError::DependencyMissing {
            tool: "buildah".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(missing.exit_code(), 1);
        assert_eq!(KpodError::ImageNotFound("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_image_not_found_display() {
        let error = KpodError::ImageNotFound("doesnotexist".to_string());
        assert_eq!(error.to_string(), "No such image: doesnotexist");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: KpodError = io_error.into();
        assert!(matches!(error, KpodError::IoError(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ invalid }");
        let error: KpodError = result.unwrap_err().into();
        assert!(matches!(error, KpodError::SerializationError(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content:");
        let error: KpodError = result.unwrap_err().into();
        assert!(matches!(error, KpodError::SerializationError(_)));
    }
}
