// ── Core error types ──
//
// User-facing errors from virtool-core. Transport and server failures
// arrive as `virtool_api::Error` and are translated here; the store keeps
// a serializable `ErrorRecord` rather than the error itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::{DiscardReason, Intent};

/// Error code recorded for client-side validation failures.
pub const VALIDATION_CODE: &str = "validation";

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Session closed")]
    SessionClosed,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("{message}")]
    Validation { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{intent} request was dropped ({reason})")]
    Discarded { intent: Intent, reason: DiscardReason },

    #[error("Server error: {message}")]
    Api {
        message: String,
        /// Server error id (e.g. `not_found`, `conflict`).
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<virtool_api::Error> for CoreError {
    fn from(err: virtool_api::Error) -> Self {
        match err {
            virtool_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            virtool_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            virtool_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            virtool_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            virtool_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound { message },
            virtool_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            virtool_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── ErrorRecord ──────────────────────────────────────────────────────

/// Serializable error payload carried by FAILED actions and kept in the
/// store under `"{INTENT}_ERROR"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<&CoreError> for ErrorRecord {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::NotFound { message } => Self {
                message: message.clone(),
                status: Some(404),
                code: Some("not_found".into()),
            },
            CoreError::Api {
                message,
                code,
                status,
            } => Self {
                message: message.clone(),
                status: *status,
                code: code.clone(),
            },
            CoreError::AuthenticationFailed { message } => Self {
                message: message.clone(),
                status: Some(401),
                code: None,
            },
            CoreError::Validation { message } => Self {
                message: message.clone(),
                status: None,
                code: Some(VALIDATION_CODE.into()),
            },
            other => Self {
                message: other.to_string(),
                status: None,
                code: None,
            },
        }
    }
}

impl From<ErrorRecord> for CoreError {
    fn from(record: ErrorRecord) -> Self {
        match (record.status, record.code.as_deref()) {
            (Some(404), _) => CoreError::NotFound {
                message: record.message,
            },
            (Some(401), _) => CoreError::AuthenticationFailed {
                message: record.message,
            },
            (None, Some(VALIDATION_CODE)) => CoreError::Validation {
                message: record.message,
            },
            (None, None) => CoreError::Internal(record.message),
            (status, _) => CoreError::Api {
                message: record.message,
                code: record.code,
                status,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_both_ways() {
        let api = virtool_api::Error::Api {
            status: 404,
            message: "Not found".into(),
            code: Some("not_found".into()),
        };
        let core = CoreError::from(api);
        assert_eq!(
            core,
            CoreError::NotFound {
                message: "Not found".into()
            }
        );

        let record = ErrorRecord::from(&core);
        assert_eq!(record.status, Some(404));
        assert_eq!(CoreError::from(record), core);
    }

    #[test]
    fn server_error_keeps_code() {
        let core = CoreError::from(virtool_api::Error::Api {
            status: 409,
            message: "Group already exists".into(),
            code: Some("conflict".into()),
        });
        let record = ErrorRecord::from(&core);
        assert_eq!(record.message, "Group already exists");
        assert_eq!(record.code.as_deref(), Some("conflict"));
        assert_eq!(CoreError::from(record), core);
    }

    #[test]
    fn validation_record_round_trips() {
        let core = CoreError::validation("Group names may not contain spaces");
        let record = ErrorRecord::from(&core);
        assert_eq!(record.code.as_deref(), Some(VALIDATION_CODE));
        assert_eq!(CoreError::from(record), core);
    }
}
