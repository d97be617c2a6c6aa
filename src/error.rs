use thiserror::Error;

use crate::github::GitHubError;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Event error: {0}")]
    Event(String),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] GitHubError),

    /// The tracked context was seen once and then disappeared while pending.
    #[error("status context '{context}' disappeared from {commit} while pending")]
    StatusVanished { context: String, commit: String },

    #[error("Reconciliation cancelled before a verdict was reached")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_vanished_display() {
        let err = GateError::StatusVanished {
            context: "OpenPublishing.Build".into(),
            commit: "acme/docs@1a2b3c4".into(),
        };
        assert_eq!(
            err.to_string(),
            "status context 'OpenPublishing.Build' disappeared from acme/docs@1a2b3c4 while pending"
        );
    }

    #[test]
    fn github_error_converts() {
        let err: GateError = GitHubError::ApiError {
            status: 404,
            message: "Not Found".into(),
        }
        .into();
        assert!(matches!(err, GateError::GitHub(_)));
        assert_eq!(
            err.to_string(),
            "GitHub API error: API error (status 404): Not Found"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GateError>();
    }
}
