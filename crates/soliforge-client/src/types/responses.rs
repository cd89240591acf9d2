/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::TaskStatus;
use super::models::{Task, serde_helpers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// One page of `GET /tasks/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPage {
    #[serde(default, deserialize_with = "serde_helpers::deserialize_null_default")]
    pub items: Vec<Task>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Response of `POST /tasks/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreated {
    #[serde(deserialize_with = "serde_helpers::deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Acknowledgement body of start/stop/delete/upload.
///
/// The backend is inconsistent here (message, status, or nothing at all);
/// every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_page_tolerates_missing_total() {
        let page: TaskPage = serde_json::from_str(
            r#"{"items": [{"id": 1, "name": "a", "status": "uploaded"}]}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.total.is_none());
    }

    #[test]
    fn test_action_response_accepts_arbitrary_ack() {
        let ack: ActionResponse =
            serde_json::from_str(r#"{"message": "Task started", "task_id": "x"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Task started"));
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
