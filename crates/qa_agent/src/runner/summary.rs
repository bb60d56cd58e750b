//! Pass/fail counts parsed from a pytest or jest report

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "===== 1 failed, 2 passed in 0.12s =====" or the bare "-q" variant
    static ref PYTEST_SUMMARY: Regex =
        Regex::new(r"^=*\s*(\d+ \w+)(, \d+ \w+)* in [\d.]+s").unwrap();
    // "Tests:       1 failed, 2 passed, 3 total"
    static ref JEST_SUMMARY: Regex = Regex::new(r"^Tests:\s+\d+ \w+").unwrap();
    static ref COUNT: Regex = Regex::new(r"(\d+) (passed|failed|skipped|todo|errors?)\b").unwrap();
}

/// Test counts extracted from a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub errors: u32,
}

impl TestSummary {
    pub fn total(&self) -> u32 {
        self.passed
            .saturating_add(self.failed)
            .saturating_add(self.skipped)
            .saturating_add(self.errors)
    }

    /// Percentage of tests that passed, rounded; 0 for an empty run
    pub fn pass_rate(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.passed as f64 / total as f64) * 100.0).round() as u32
    }
}

/// Parse the last summary line of a report
///
/// Returns all-zero counts when no summary line is present.
pub fn summarize(report: &str) -> TestSummary {
    let line = report
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| PYTEST_SUMMARY.is_match(line) || JEST_SUMMARY.is_match(line));

    let mut summary = TestSummary::default();
    let Some(line) = line else {
        return summary;
    };

    for caps in COUNT.captures_iter(line) {
        let count: u32 = caps[1].parse().unwrap_or(u32::MAX);
        match &caps[2] {
            "passed" => summary.passed = summary.passed.saturating_add(count),
            "failed" => summary.failed = summary.failed.saturating_add(count),
            "skipped" | "todo" => summary.skipped = summary.skipped.saturating_add(count),
            _ => summary.errors = summary.errors.saturating_add(count),
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pytest_summary() {
        let report = "\
tests/test_ui.py::test_checkout PASSED
tests/test_ui.py::test_refund FAILED
=========== 1 failed, 2 passed, 1 skipped in 0.12s ===========
";
        let summary = summarize(report);
        assert_eq!(
            summary,
            TestSummary {
                passed: 2,
                failed: 1,
                skipped: 1,
                errors: 0
            }
        );
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.pass_rate(), 50);
    }

    #[test]
    fn test_pytest_quiet_summary_with_errors() {
        let summary = summarize("..E\n2 passed, 1 error in 0.30s\n");
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_jest_summary() {
        let report = "\
Test Suites: 1 failed, 5 passed, 6 total
Tests:       3 failed, 40 passed, 2 todo, 45 total
Snapshots:   0 total
Time:        2.1 s
";
        let summary = summarize(report);
        assert_eq!(summary.passed, 40);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.total(), 45);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let summary = summarize("== 4294967295 passed, 1 failed, 99999999999 errors in 1.00s ==");
        assert_eq!(summary.passed, u32::MAX);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, u32::MAX);
        assert_eq!(summary.total(), u32::MAX);
        assert_eq!(summary.pass_rate(), 100);
    }

    #[test]
    fn test_missing_summary() {
        let summary = summarize("collected 0 items\n");
        assert_eq!(summary, TestSummary::default());
        assert_eq!(summary.pass_rate(), 0);
    }
}
