/*
[INPUT]:  Task matrix cases and Slither report text
[OUTPUT]: Threat counts, pass rate, failing-case list, static-analysis highlights
[POS]:    View layer - attack matrix summary
[UPDATE]: When changing how matrix results are summarized
*/

use soliforge_client::{Task, TestCase, TestCaseStatus};

/// Shown for a failing case without a description
pub const DEFAULT_CASE_DESCRIPTION: &str = "AI Attack Vector";
/// Shown for a case without proof-of-concept code
pub const MISSING_CASE_CODE: &str = "// Code not available";

const STATIC_FINDING_LIMIT: usize = 5;
const STATIC_FINDING_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixSummary {
    pub total: usize,
    /// Cases whose attack succeeded
    pub threats: usize,
    pub passing: usize,
    pub pending: usize,
}

impl MatrixSummary {
    pub fn from_cases(cases: &[TestCase]) -> Self {
        cases.iter().fold(Self::default(), |mut summary, case| {
            summary.total += 1;
            match case.status {
                TestCaseStatus::Failing => summary.threats += 1,
                TestCaseStatus::Passing => summary.passing += 1,
                TestCaseStatus::Pending => summary.pending += 1,
                TestCaseStatus::Unknown => {}
            }
            summary
        })
    }

    pub fn for_task(task: &Task) -> Self {
        Self::from_cases(&task.matrix_cases)
    }

    /// Share of cases that are not threats, rounded; 0 for an empty matrix
    pub fn pass_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let safe = (self.total - self.threats) as f64;
        (safe / self.total as f64 * 100.0).round() as u32
    }

    pub fn blocked_label(&self) -> String {
        format!("{} / {} BLOCKED", self.passing, self.total)
    }
}

pub fn failing_cases(task: &Task) -> Vec<&TestCase> {
    task.matrix_cases
        .iter()
        .filter(|case| case.status == TestCaseStatus::Failing)
        .collect()
}

pub fn case_description(case: &TestCase) -> &str {
    if case.description.trim().is_empty() {
        DEFAULT_CASE_DESCRIPTION
    } else {
        &case.description
    }
}

pub fn case_code(case: &TestCase) -> &str {
    if case.code.trim().is_empty() {
        MISSING_CASE_CODE
    } else {
        &case.code
    }
}

/// First Slither lines that mention a severity, trimmed for a side panel
pub fn static_findings(report: Option<&str>) -> Vec<String> {
    let Some(report) = report else {
        return Vec::new();
    };
    report
        .lines()
        .filter(|line| line.contains("High") || line.contains("Medium") || line.contains("Low"))
        .take(STATIC_FINDING_LIMIT)
        .map(|line| {
            if line.chars().count() > STATIC_FINDING_WIDTH {
                let head: String = line.chars().take(STATIC_FINDING_WIDTH).collect();
                format!("{head}...")
            } else {
                line.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use soliforge_client::TestCaseSource;

    fn case(status: TestCaseStatus) -> TestCase {
        TestCase {
            id: "c".to_string(),
            source: TestCaseSource::Fuzzer,
            status,
            name: "case".to_string(),
            description: String::new(),
            code: String::new(),
        }
    }

    #[test]
    fn test_summary_counts_and_rate() {
        let cases = vec![
            case(TestCaseStatus::Failing),
            case(TestCaseStatus::Passing),
            case(TestCaseStatus::Passing),
        ];
        let summary = MatrixSummary::from_cases(&cases);
        assert_eq!(summary.threats, 1);
        assert_eq!(summary.passing, 2);
        assert_eq!(summary.pass_rate(), 67);
        assert_eq!(summary.blocked_label(), "2 / 3 BLOCKED");
    }

    #[test]
    fn test_pending_cases_count_toward_pass_rate() {
        let cases = vec![case(TestCaseStatus::Pending), case(TestCaseStatus::Failing)];
        let summary = MatrixSummary::from_cases(&cases);
        assert_eq!(summary.pass_rate(), 50);
        assert_eq!(summary.blocked_label(), "0 / 2 BLOCKED");
    }

    #[test]
    fn test_unknown_status_only_counts_in_total() {
        let cases = vec![case(TestCaseStatus::Unknown), case(TestCaseStatus::Passing)];
        let summary = MatrixSummary::from_cases(&cases);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.threats, 0);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.blocked_label(), "1 / 2 BLOCKED");
    }

    #[test]
    fn test_empty_matrix() {
        let summary = MatrixSummary::from_cases(&[]);
        assert_eq!(summary.pass_rate(), 0);
        assert_eq!(summary.threats, 0);
    }

    #[test]
    fn test_case_placeholders() {
        let mut failing = case(TestCaseStatus::Failing);
        assert_eq!(case_description(&failing), DEFAULT_CASE_DESCRIPTION);
        assert_eq!(case_code(&failing), MISSING_CASE_CODE);
        failing.code = "function attack() {}".to_string();
        assert_eq!(case_code(&failing), "function attack() {}");
    }

    #[test]
    fn test_static_findings_take_first_five_severity_lines() {
        let report = (0..8)
            .map(|i| format!("Medium: finding {i}"))
            .chain(std::iter::once("INFO: compiled".to_string()))
            .collect::<Vec<_>>()
            .join("\n");
        let findings = static_findings(Some(&report));
        assert_eq!(findings.len(), 5);
        assert_eq!(findings[0], "Medium: finding 0");
        assert!(static_findings(None).is_empty());
    }

    #[test]
    fn test_static_findings_truncate_long_lines() {
        let report = format!("High: {}", "x".repeat(100));
        let findings = static_findings(Some(&report));
        assert!(findings[0].ends_with("..."));
        assert_eq!(findings[0].chars().count(), 63);
    }
}
