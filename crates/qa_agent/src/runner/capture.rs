//! Test harness invocation with captured output streams

use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{QaError, Result};

/// Test harness flavor, which decides how run options become arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerKind {
    Pytest,
    Jest,
    /// Any executable that takes the target path as its only argument
    Command,
}

impl RunnerKind {
    /// Executable used when no override is given
    pub fn default_program(&self) -> &'static str {
        match self {
            Self::Pytest => "pytest",
            Self::Jest => "npx",
            Self::Command => "sh",
        }
    }

    /// Arguments placed before the run flags when the default program is used
    pub fn default_prefix_args(&self) -> &'static [&'static str] {
        match self {
            Self::Jest => &["jest"],
            _ => &[],
        }
    }

    /// Language the harness tests are written in
    pub fn language(&self) -> &'static str {
        match self {
            Self::Pytest => "Python",
            Self::Jest => "JavaScript",
            Self::Command => "the project's language",
        }
    }

    /// Human-readable harness name used in prompts
    pub fn harness_name(&self) -> &'static str {
        match self {
            Self::Pytest => "Pytest",
            Self::Jest => "Jest",
            Self::Command => "a command-line test runner",
        }
    }

    /// Markdown fence tag for source code of this harness
    pub fn fence_tag(&self) -> &'static str {
        match self {
            Self::Pytest => "python",
            Self::Jest => "javascript",
            Self::Command => "",
        }
    }
}

impl FromStr for RunnerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pytest" => Ok(Self::Pytest),
            "jest" => Ok(Self::Jest),
            "command" => Ok(Self::Command),
            _ => Err(format!("Invalid runner kind: {}", s)),
        }
    }
}

/// Options controlling a single test run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub verbose: bool,
    pub with_coverage: bool,
}

impl RunOptions {
    /// Create default options (quiet, no coverage)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Request coverage instrumentation
    pub fn with_coverage(mut self, with_coverage: bool) -> Self {
        self.with_coverage = with_coverage;
        self
    }
}

/// Captured result of one test run
#[derive(Debug, Clone)]
pub struct TestRunResult {
    pub kind: RunnerKind,
    pub stdout: String,
    pub stderr: String,
    /// Harness exit code; `-1` when the process was killed by a signal
    pub exit_code: i32,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
}

impl TestRunResult {
    /// Whether the harness reported success
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The text the harness writes its results to
    ///
    /// Jest's default reporter prints per-file results and the `Tests:` line
    /// on stderr, so its report is stderr followed by stdout.
    pub fn report(&self) -> String {
        match self.kind {
            RunnerKind::Jest => format!("{}{}", self.stderr, self.stdout),
            RunnerKind::Pytest | RunnerKind::Command => self.stdout.clone(),
        }
    }
}

/// Runs a test harness against a target path
#[derive(Debug, Clone)]
pub struct TestRunner {
    kind: RunnerKind,
    program: String,
    prefix_args: Vec<String>,
}

impl TestRunner {
    /// Create a runner using the harness's default executable
    pub fn new(kind: RunnerKind) -> Self {
        Self {
            kind,
            program: kind.default_program().to_string(),
            prefix_args: kind
                .default_prefix_args()
                .iter()
                .map(|arg| arg.to_string())
                .collect(),
        }
    }

    /// Create a runner with a custom executable path
    pub fn with_program(kind: RunnerKind, program: impl Into<String>) -> Self {
        Self {
            kind,
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    pub fn kind(&self) -> RunnerKind {
        self.kind
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve the argument list for a run
    pub fn build_args(&self, path: &Path, options: &RunOptions) -> Vec<String> {
        let mut args = self.prefix_args.clone();

        match self.kind {
            RunnerKind::Pytest => {
                if options.verbose {
                    args.push("-v".to_string());
                }
                if options.with_coverage {
                    args.push("--cov=.".to_string());
                    args.push("--cov-report=term-missing".to_string());
                }
            }
            RunnerKind::Jest => {
                if options.verbose {
                    args.push("--verbose".to_string());
                }
                if options.with_coverage {
                    args.push("--coverage".to_string());
                }
            }
            RunnerKind::Command => {}
        }

        args.push(path.to_string_lossy().into_owned());
        args
    }

    /// Run the harness and capture its output
    ///
    /// Both streams are piped into buffers owned by this call, so nothing the
    /// harness prints reaches this process's stdout/stderr. A non-zero exit
    /// code is returned as data, not as an error.
    pub async fn run(&self, path: impl AsRef<Path>, options: &RunOptions) -> Result<TestRunResult> {
        let args = self.build_args(path.as_ref(), options);
        debug!(program = %self.program, ?args, "Spawning test runner");

        let started_at = Local::now();
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| QaError::Runner(format!("{}: {}", self.program, e)))?;

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        info!(
            exit_code,
            duration_ms = duration.as_millis() as u64,
            "Test run finished"
        );

        Ok(TestRunResult {
            kind: self.kind,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            started_at,
            duration,
        })
    }
}
