use thiserror::Error;

/// Unified error type for float-tags operations
#[derive(Error, Debug)]
pub enum FloatTagsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version tag '{tag}' does not match (semver) regex '{pattern}'")]
    NonSemverTag { tag: String, pattern: String },

    #[error("Git command failed: {0}")]
    Git(String),

    #[error("GitHub request failed{}: {}", status_suffix(.status), .message)]
    GitHub {
        status: Option<u16>,
        message: String,
    },

    #[error("Missing release: {0}")]
    MissingRelease(String),

    #[error("Stage task failed: {0}")]
    Task(String),

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// Convenience type alias for Results in float-tags
pub type Result<T> = std::result::Result<T, FloatTagsError>;

impl FloatTagsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        FloatTagsError::Config(msg.into())
    }

    /// Create a git command error with context
    pub fn git(msg: impl Into<String>) -> Self {
        FloatTagsError::Git(msg.into())
    }

    /// Create a GitHub API error with an optional HTTP status
    pub fn github(status: Option<u16>, msg: impl Into<String>) -> Self {
        FloatTagsError::GitHub {
            status,
            message: msg.into(),
        }
    }

    /// Create an error for a release that was expected to exist
    pub fn missing_release(msg: impl Into<String>) -> Self {
        FloatTagsError::MissingRelease(msg.into())
    }

    /// Create a stage task error with context
    pub fn task(msg: impl Into<String>) -> Self {
        FloatTagsError::Task(msg.into())
    }

    /// Prefix a GitHub failure with the operation that produced it
    pub fn during(self, operation: &str) -> Self {
        match self {
            FloatTagsError::GitHub { status, message } => FloatTagsError::GitHub {
                status,
                message: format!("{}: {}", operation, message),
            },
            FloatTagsError::Http(e) => FloatTagsError::github(None, format!("{}: {}", operation, e)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FloatTagsError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_non_semver_message_names_tag_and_pattern() {
        let err = FloatTagsError::NonSemverTag {
            tag: "v1.2".to_string(),
            pattern: r"^[0-9]+\.[0-9]+\.[0-9]+$".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r"Version tag 'v1.2' does not match (semver) regex '^[0-9]+\.[0-9]+\.[0-9]+$'"
        );
    }

    #[test]
    fn test_github_error_with_and_without_status() {
        assert_eq!(
            FloatTagsError::github(Some(422), "Validation Failed").to_string(),
            "GitHub request failed (422): Validation Failed"
        );
        assert_eq!(
            FloatTagsError::github(None, "connection reset").to_string(),
            "GitHub request failed: connection reset"
        );
    }

    #[test]
    fn test_during_prefixes_github_errors_only() {
        let err = FloatTagsError::github(Some(500), "boom").during("get-latest-release");
        assert_eq!(
            err.to_string(),
            "GitHub request failed (500): get-latest-release: boom"
        );

        let err = FloatTagsError::config("no token").during("get-latest-release");
        assert_eq!(err.to_string(), "Configuration error: no token");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FloatTagsError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (FloatTagsError::config("x"), "Configuration error"),
            (FloatTagsError::git("x"), "Git command failed"),
            (FloatTagsError::missing_release("x"), "Missing release"),
            (FloatTagsError::task("x"), "Stage task failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
