/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::TaskStatus;

/// Form body for `POST /auth/token` (OAuth2 password flow)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl RegisterRequest {
    /// Blank usernames fall back to the local part of the e-mail address
    pub fn new(email: impl Into<String>, password: impl Into<String>, username: Option<&str>) -> Self {
        let email = email.into();
        let username = match username.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => email.split('@').next().unwrap_or_default().to_string(),
        };
        Self {
            email,
            password: password.into(),
            username,
        }
    }
}

/// Query string for `GET /tasks/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            keyword: None,
            creator_name: None,
            status: None,
            start_date: None,
            end_date: None,
            owner_id: None,
        }
    }
}

impl TaskListQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = non_blank(keyword.into());
        self
    }

    pub fn creator_name(mut self, creator_name: impl Into<String>) -> Self {
        self.creator_name = non_blank(creator_name.into());
        self
    }

    pub fn status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = non_blank(owner_id.into());
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_username_defaults_to_email_prefix() {
        let request = RegisterRequest::new("alice@example.com", "pw", None);
        assert_eq!(request.username, "alice");

        let request = RegisterRequest::new("alice@example.com", "pw", Some("  "));
        assert_eq!(request.username, "alice");

        let request = RegisterRequest::new("alice@example.com", "pw", Some("auditor"));
        assert_eq!(request.username, "auditor");
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let query = TaskListQuery::default()
            .keyword("  ")
            .creator_name(" bob ")
            .owner_id("");
        assert!(query.keyword.is_none());
        assert_eq!(query.creator_name.as_deref(), Some("bob"));
        assert!(query.owner_id.is_none());
    }

    #[test]
    fn test_query_serializes_only_present_filters() {
        let query = TaskListQuery::default()
            .page_size(50)
            .status(Some(TaskStatus::Running))
            .date_range(NaiveDate::from_ymd_opt(2026, 1, 2), None);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "page": 1,
                "page_size": 50,
                "status": "running",
                "start_date": "2026-01-02"
            })
        );
    }
}
