use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Version;

/// Exit status used for every failure that does not carry its own code.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("`{command}` failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    #[error("release on {expected}, you are on '{actual}'")]
    WrongBranch { expected: String, actual: String },

    #[error("Remote update failed with status {code}: {message}")]
    RemoteUpdate { code: i32, message: String },

    #[error("Branch is behind its upstream, merge these commits first:\n{commits}")]
    OutOfSync { commits: String },

    #[error("Version tag error: {0}")]
    Tag(String),

    #[error("please specify version number, e.g. {suggested}")]
    MissingVersion { suggested: Version },

    #[error("can't parse version number {0}")]
    InvalidVersionArgument(String),

    #[error("Invalid version increment from {current} to {requested}: {reason}")]
    InvalidIncrement {
        current: Version,
        requested: Version,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in the release tool
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::File {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error.
    ///
    /// A failed remote update propagates its own status; everything else
    /// exits with `-1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::RemoteUpdate { code, .. } if *code != 0 => *code,
            _ => FAILURE_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_file_error_keeps_io_source() {
        use std::error::Error as _;

        let err = ReleaseError::file(
            "CMakeLists.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().starts_with("I/O error on CMakeLists.txt"));

        let source = err.source().expect("file errors carry their io::Error");
        assert_eq!(source.to_string(), "file not found");
    }

    #[test]
    fn test_wrong_branch_names_actual_branch() {
        let err = ReleaseError::WrongBranch {
            expected: "master".to_string(),
            actual: "feature/x".to_string(),
        };
        assert_eq!(err.to_string(), "release on master, you are on 'feature/x'");
    }

    #[test]
    fn test_missing_version_suggests_next() {
        let err = ReleaseError::MissingVersion {
            suggested: Version::new(1, 2, 4),
        };
        assert_eq!(err.to_string(), "please specify version number, e.g. 1.2.4");
    }

    #[test]
    fn test_file_error_includes_path() {
        let err = ReleaseError::file(
            "/tmp/CMakeLists.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/CMakeLists.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_exit_code_propagates_remote_status() {
        let err = ReleaseError::RemoteUpdate {
            code: 128,
            message: "could not read from remote".to_string(),
        };
        assert_eq!(err.exit_code(), 128);
    }

    #[test]
    fn test_exit_code_defaults_to_failure() {
        let errors = vec![
            ReleaseError::config("x"),
            ReleaseError::tag("x"),
            ReleaseError::InvalidVersionArgument("abc".to_string()),
            ReleaseError::OutOfSync {
                commits: "abc1234 fix".to_string(),
            },
            ReleaseError::RemoteUpdate {
                code: 0,
                message: "killed by signal".to_string(),
            },
        ];

        for err in errors {
            assert_eq!(err.exit_code(), FAILURE_EXIT_CODE, "{}", err);
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::tag("x"), "Version tag error"),
            (
                ReleaseError::InvalidVersionArgument("x".to_string()),
                "can't parse version number",
            ),
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
