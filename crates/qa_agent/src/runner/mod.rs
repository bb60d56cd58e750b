//! Test runner module
//!
//! This module provides:
//! - `capture`: Runs a test harness as a child process and captures its report
//! - `summary`: Extracts pass/fail counts from a captured report

mod capture;
mod summary;

pub use capture::{RunOptions, RunnerKind, TestRunResult, TestRunner};
pub use summary::{summarize, TestSummary};
