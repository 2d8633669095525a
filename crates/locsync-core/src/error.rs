//! Error types for locsync-core

use std::path::PathBuf;

/// Result type for locsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in locsync-core operations
///
/// Conflicts and user aborts are not errors; they are reported through
/// [`crate::sync::PushStatus`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}. Run `locsync init` first.")]
    ConfigNotFound { path: PathBuf },

    /// Missing or invalid configuration (remote target, resource directory)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Missing or unusable credential
    #[error("Authentication required: {message}")]
    Authentication { message: String },

    /// Local and remote state cannot be synchronized safely
    #[error("Incompatible project: {message}")]
    Compatibility { message: String },

    /// The remote rejected the credential (HTTP 401)
    #[error("Remote rejected the credential (401). Re-authenticate and set a fresh token.")]
    Unauthorized,

    /// The credential lacks permission for the project (HTTP 403)
    #[error("Permission denied for project '{project}' (403). Ask a project owner for write access.")]
    Forbidden { project: String },

    /// The remote project does not exist (HTTP 404)
    #[error("Remote project '{project}' not found (404). Check `[remote] project` in the config.")]
    ProjectNotFound { project: String },

    /// The remote refused the request as a whole (HTTP 409)
    #[error("Remote reported a conflicting update (409): {message}. Retry the push.")]
    RemoteConflict { message: String },

    /// Any other non-success HTTP status
    #[error("Remote returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure talking to the remote
    #[error("Network error talking to {url}: {message}")]
    Network { url: String, message: String },

    /// The cycle was cancelled before completion
    #[error("Sync cancelled")]
    Cancelled,

    /// Reading or writing a resource file failed
    #[error("Resource error at {path}: {message}")]
    Resource { path: String, message: String },

    /// Filesystem error from locsync-fs
    #[error(transparent)]
    Fs(#[from] locsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn compatibility(message: impl Into<String>) -> Self {
        Self::Compatibility {
            message: message.into(),
        }
    }

    pub fn resource(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resource {
            path: path.into(),
            message: message.into(),
        }
    }
}
