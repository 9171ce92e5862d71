//! Error types for story loading and issue creation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which record of a story file failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLocation {
    /// The top-level story record.
    Story,
    /// A task record, by zero-based position in `tasks`.
    Task(usize),
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story => write!(f, "story"),
            Self::Task(index) => write!(f, "task[{index}]"),
        }
    }
}

/// Errors that can occur while loading stories or talking to Jira.
#[derive(Debug, Error)]
pub enum EpicError {
    /// Input is missing a required field or has a field of the wrong shape.
    #[error("Malformed input at {record}: {reason}")]
    MalformedInput {
        record: RecordLocation,
        reason: String,
    },

    /// Jira rejected the supplied credentials.
    #[error("Authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    /// Jira accepted the request but refused to create the issue.
    #[error("Issue creation rejected ({status}): {message}")]
    RemoteCreation { status: u16, message: String },

    /// Network-level failure (timeout, DNS, connection reset).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured epic could not be fetched.
    #[error("Jira epic not found: {epic_key} ({reason})")]
    EpicNotFound { epic_key: String, reason: String },

    /// The epic key does not belong to the configured project.
    #[error("Jira epic {epic_key} doesn't match project {project_key}")]
    EpicProjectMismatch {
        epic_key: String,
        project_key: String,
    },

    /// Missing or invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Story file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Story file or response body is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EpicError {
    /// Shorthand for a [`EpicError::MalformedInput`].
    pub(crate) fn malformed(record: RecordLocation, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            record,
            reason: reason.into(),
        }
    }

    /// Whether this error makes every further call pointless.
    ///
    /// Rejected credentials stop the whole batch; anything else is recorded
    /// against the story or task that hit it.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

/// Result alias for this crate.
pub type Result<T, E = EpicError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_location_display() {
        assert_eq!(RecordLocation::Story.to_string(), "story");
        assert_eq!(RecordLocation::Task(3).to_string(), "task[3]");
    }

    #[test]
    fn test_malformed_message_names_record() {
        let err = EpicError::malformed(RecordLocation::Task(1), "missing summary");
        assert_eq!(err.to_string(), "Malformed input at task[1]: missing summary");
    }

    #[test]
    fn test_only_authentication_is_fatal() {
        let auth = EpicError::Authentication {
            status: 401,
            message: "nope".to_string(),
        };
        let remote = EpicError::RemoteCreation {
            status: 400,
            message: "summary too long".to_string(),
        };
        assert!(auth.is_fatal());
        assert!(!remote.is_fatal());
        assert!(!EpicError::Config("x".to_string()).is_fatal());
    }
}
