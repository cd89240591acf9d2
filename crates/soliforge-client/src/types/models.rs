/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
[UPDATE]: 2026-09-02 accept naive timestamps and numeric ids from the backend
[UPDATE]: 2026-10-19 tolerate unknown matrix case values, read owner_name as creator
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{LogLevel, TaskStatus, TestCaseSource, TestCaseStatus};

/// Snapshot of an audit task as returned by list and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "serde_helpers::deserialize_id")]
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_optional_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_optional_timestamp"
    )]
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds; only meaningful once the task has left `running`
    #[serde(
        default,
        deserialize_with = "serde_helpers::deserialize_optional_seconds"
    )]
    pub duration: Option<u64>,
    #[serde(default, alias = "owner_name")]
    pub creator_name: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_optional_id")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub slither_report: Option<String>,
    #[serde(default)]
    pub codes: Option<SourceCodes>,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_null_default")]
    pub matrix_cases: Vec<TestCase>,
}

impl Task {
    /// Creator shown in task tables; `Unknown` when the backend sent none
    pub fn creator_label(&self) -> &str {
        self.creator_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unknown")
    }

    pub fn has_contract(&self) -> bool {
        self.contract_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }

    pub fn original_code(&self) -> Option<&str> {
        self.codes
            .as_ref()
            .and_then(|codes| codes.original.as_deref())
            .filter(|code| !code.is_empty())
    }

    pub fn fixed_code(&self) -> Option<&str> {
        self.codes
            .as_ref()
            .and_then(|codes| codes.fix.as_deref())
            .filter(|code| !code.is_empty())
    }

    /// First eight characters of the id, as shown on dashboard cards
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

/// Contract source before and after the backend's fix pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCodes {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub fix: Option<String>,
}

/// One generated adversarial scenario; status is owned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(deserialize_with = "serde_helpers::deserialize_id")]
    pub id: String,
    pub source: TestCaseSource,
    pub status: TestCaseStatus,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Proof-of-concept attack code
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(
        rename = "time",
        alias = "timestamp",
        deserialize_with = "serde_helpers::deserialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    #[serde(rename = "content", alias = "message")]
    pub message: String,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "serde_helpers::deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub(crate) mod serde_helpers {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error as _};

    /// RFC 3339, or a naive ISO-8601 timestamp interpreted as UTC
    pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        raw.replacen(' ', "T", 1)
            .parse::<NaiveDateTime>()
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(crate) fn deserialize_optional_timestamp<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Integer(i64),
        Float(f64),
    }

    impl StringOrNumber {
        fn into_string(self) -> String {
            match self {
                StringOrNumber::String(value) => value,
                StringOrNumber::Integer(value) => value.to_string(),
                StringOrNumber::Float(value) => value.to_string(),
            }
        }
    }

    pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(StringOrNumber::deserialize(deserializer)?.into_string())
    }

    pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<StringOrNumber> = Option::deserialize(deserializer)?;
        Ok(raw.map(StringOrNumber::into_string))
    }

    pub(crate) fn deserialize_optional_seconds<'de, D>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<StringOrNumber> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(StringOrNumber::Integer(value)) => Ok(Some(value.max(0) as u64)),
            Some(StringOrNumber::Float(value)) => Ok(Some(value.max(0.0).floor() as u64)),
            Some(StringOrNumber::String(value)) => value
                .trim()
                .parse::<f64>()
                .map(|seconds| Some(seconds.max(0.0).floor() as u64))
                .map_err(|_| D::Error::custom(format!("invalid duration: {value}"))),
        }
    }

    pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
