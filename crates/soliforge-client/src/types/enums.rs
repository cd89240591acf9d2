/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Uploaded,
    Running,
    Stopped,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Created,
        TaskStatus::Uploaded,
        TaskStatus::Running,
        TaskStatus::Stopped,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Created => "created",
            TaskStatus::Uploaded => "uploaded",
            TaskStatus::Running => "running",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Statuses the execution view keeps polling
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Created | TaskStatus::Running)
    }

    /// Statuses a task can only leave through a new start request
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Stopped | TaskStatus::Completed | TaskStatus::Failed
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown task status: {s}"))
    }
}

/// Which engine produced a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestCaseSource {
    #[serde(rename = "SLITHER")]
    StaticAnalysis,
    #[serde(rename = "FUZZER")]
    Fuzzer,
    #[serde(rename = "RED_TEAM")]
    AdversarialAgent,
    #[serde(other)]
    Unknown,
}

impl TestCaseSource {
    pub fn label(&self) -> &'static str {
        match self {
            TestCaseSource::StaticAnalysis => "static-analysis",
            TestCaseSource::Fuzzer => "fuzzer",
            TestCaseSource::AdversarialAgent => "adversarial-agent",
            TestCaseSource::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestCaseStatus {
    Failing,
    Passing,
    Pending,
    /// Status this client does not know; counted in totals only
    #[serde(other)]
    Unknown,
}

/// Severity of a task log line.
///
/// Backends emit whatever their logger prints, so unknown levels decode as
/// `Info` instead of failing the whole log fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => LogLevel::Debug,
            "WARN" | "WARNING" => LogLevel::Warning,
            "ERROR" | "CRITICAL" | "FATAL" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LogLevel::from_str_lossy(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Created, true, false)]
    #[case(TaskStatus::Uploaded, false, false)]
    #[case(TaskStatus::Running, true, false)]
    #[case(TaskStatus::Stopped, false, true)]
    #[case(TaskStatus::Completed, false, true)]
    #[case(TaskStatus::Failed, false, true)]
    fn test_task_status_classification(
        #[case] status: TaskStatus,
        #[case] active: bool,
        #[case] terminal: bool,
    ) {
        assert_eq!(status.is_active(), active);
        assert_eq!(status.is_terminal(), terminal);
        assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
    }

    #[test]
    fn test_task_status_parse_is_case_insensitive() {
        assert_eq!(" Running ".parse::<TaskStatus>(), Ok(TaskStatus::Running));
        assert!("paused".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_test_case_wire_names() {
        let source: TestCaseSource = serde_json::from_str(r#""RED_TEAM""#).unwrap();
        assert_eq!(source, TestCaseSource::AdversarialAgent);
        assert_eq!(source.label(), "adversarial-agent");

        let status: TestCaseStatus = serde_json::from_str(r#""FAILING""#).unwrap();
        assert_eq!(status, TestCaseStatus::Failing);
    }

    #[test]
    fn test_unknown_test_case_values_decode() {
        let source: TestCaseSource = serde_json::from_str(r#""SYMBOLIC""#).unwrap();
        assert_eq!(source, TestCaseSource::Unknown);
        assert_eq!(source.label(), "unknown");

        let status: TestCaseStatus = serde_json::from_str(r#""TIMEOUT""#).unwrap();
        assert_eq!(status, TestCaseStatus::Unknown);
    }

    #[rstest]
    #[case("INFO", LogLevel::Info)]
    #[case("error", LogLevel::Error)]
    #[case("WARN", LogLevel::Warning)]
    #[case("SUCCESS", LogLevel::Info)]
    fn test_log_level_is_lenient(#[case] raw: &str, #[case] expected: LogLevel) {
        let json = format!("\"{raw}\"");
        let level: LogLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(level, expected);
    }
}
