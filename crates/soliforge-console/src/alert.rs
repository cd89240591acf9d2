/*
[INPUT]:  SoliforgeError values from view-model operations
[OUTPUT]: ViewError classified for presentation (login redirect, load error, alert)
[POS]:    View layer - user-facing error taxonomy
[UPDATE]: When adding new user-visible failure modes
*/

use soliforge_client::SoliforgeError;
use thiserror::Error;

/// Shown when the detail endpoint fails without a server message
pub const LOAD_TASK_FALLBACK: &str = "Failed to load task details.";

/// Failure a view has to show to the user.
///
/// Background poll failures never become a `ViewError`; they are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The session is gone; the caller routes back to the login screen
    #[error("Session expired, please sign in again")]
    Unauthenticated,

    /// Initial load failed; the message replaces the view
    #[error("{0}")]
    Load(String),

    /// A user action failed; shown as a blocking alert
    #[error("{action} failed: {detail}")]
    Alert { action: String, detail: String },
}

impl ViewError {
    /// Classify an initial-load failure, falling back to `fallback` when the
    /// server sent no detail
    pub fn load(err: SoliforgeError, fallback: &str) -> Self {
        match err {
            SoliforgeError::Unauthenticated => ViewError::Unauthenticated,
            SoliforgeError::Api { message, .. } if !message.trim().is_empty() => {
                ViewError::Load(message)
            }
            _ => ViewError::Load(fallback.to_string()),
        }
    }

    /// Classify a failed user action
    pub fn alert(action: &str, err: SoliforgeError) -> Self {
        match err {
            SoliforgeError::Unauthenticated => ViewError::Unauthenticated,
            other => ViewError::Alert {
                action: action.to_string(),
                detail: other.detail(),
            },
        }
    }

    /// An alert raised before any request was sent
    pub fn rejected(action: &str, detail: impl Into<String>) -> Self {
        ViewError::Alert {
            action: action.to_string(),
            detail: detail.into(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ViewError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_prefers_server_detail() {
        let err = SoliforgeError::Api {
            status: 404,
            message: "Task not found".to_string(),
        };
        assert_eq!(
            ViewError::load(err, LOAD_TASK_FALLBACK),
            ViewError::Load("Task not found".to_string())
        );

        let err = SoliforgeError::InvalidResponse("garbage".to_string());
        assert_eq!(
            ViewError::load(err, LOAD_TASK_FALLBACK).to_string(),
            LOAD_TASK_FALLBACK
        );
    }

    #[test]
    fn test_unauthenticated_is_never_an_alert() {
        let err = ViewError::alert("Start", SoliforgeError::Unauthenticated);
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn test_alert_text() {
        let err = ViewError::alert(
            "Stop",
            SoliforgeError::Api {
                status: 409,
                message: "Task is not running".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Stop failed: Task is not running");
    }
}
