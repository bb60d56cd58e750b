//! qa-agent CLI - run a test suite and ask a model to analyze the report
//!
//! Usage:
//!     qa-agent run [OPTIONS] <PATH>
//!     qa-agent generate [OPTIONS] <REQUIREMENTS_FILE>
//!
//! Environment Variables:
//!     API_KEY: API key for model authentication (required for model steps)
//!     QA_AGENT_BASE_URL: Model API base URL (default: https://openrouter.ai/api/v1)
//!     QA_AGENT_MODEL: Model name (default: deepseek/deepseek-r1:free)
//!     QA_AGENT_RUNNER: Test harness: pytest, jest or command (default: pytest)
//!     QA_AGENT_RUNNER_PROGRAM: Test harness executable override (jest defaults to `npx jest`)
//!     RUST_LOG: Log filter (default: info)

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use qa_agent::{summarize, ModelConfig, QaPipeline, RunOptions, RunnerKind, TestRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// QA Agent - LLM-assisted test analysis
#[derive(Parser, Debug)]
#[command(name = "qa-agent")]
#[command(about = "QA Agent - run tests and get LLM feedback on the report")]
#[command(after_help = r#"Examples:
    # Run a pytest file verbosely with coverage and analyze the report
    qa-agent run tests/test_ui.py --verbose --coverage

    # Also ask for a rewritten test file
    qa-agent run tests/test_ui.py --rewrite

    # Run a jest directory without calling the model
    qa-agent --runner jest run tests/unit --no-analyze

    # Generate black-box tests from a requirements file
    qa-agent generate stripe_requirements.txt
"#)]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,

    /// Test harness used to run and describe tests
    #[arg(long, env = "QA_AGENT_RUNNER", default_value = "pytest", value_parser = ["pytest", "jest", "command"])]
    runner: String,

    /// Test harness executable (defaults to `pytest`, `npx jest` or `sh`)
    #[arg(long, env = "QA_AGENT_RUNNER_PROGRAM")]
    runner_program: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Model API base URL
    #[arg(long, env = "QA_AGENT_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    base_url: String,

    /// Model name
    #[arg(long, env = "QA_AGENT_MODEL", default_value = "deepseek/deepseek-r1:free")]
    model: String,

    /// API key for model authentication
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a test target, log its report and analyze it
    Run {
        /// Test file or directory to run
        path: PathBuf,

        /// Ask the harness for verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Request coverage instrumentation
        #[arg(long)]
        coverage: bool,

        /// Only run the tests, skip the model analysis
        #[arg(long, conflicts_with = "rewrite")]
        no_analyze: bool,

        /// After analysis, ask for a rewritten version of PATH
        #[arg(long)]
        rewrite: bool,
    },

    /// Generate black-box tests from a requirements file
    Generate {
        /// Plain-text requirements file
        requirements: PathBuf,
    },
}

impl ModelArgs {
    fn to_config(&self) -> ModelConfig {
        let config = ModelConfig::new(&self.base_url, &self.model);
        match &self.api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}

/// Check the harness executable is installed before running it
fn check_runner_installed(runner: &TestRunner) -> Result<()> {
    which::which(runner.program()).map_err(|_| {
        anyhow!(
            "{} is not installed or not in PATH (set --runner-program to override)",
            runner.program()
        )
    })?;
    Ok(())
}

async fn run_command(
    pipeline: &QaPipeline,
    path: PathBuf,
    options: RunOptions,
    analyze: bool,
    rewrite: bool,
) -> Result<i32> {
    check_runner_installed(pipeline.runner())?;

    info!(path = %path.display(), ?options, "Running tests");
    let run = pipeline.run_tests(&path, &options).await?;

    info!(
        started_at = %run.started_at.format("%Y-%m-%d %H:%M:%S"),
        "Exit code: {}",
        run.exit_code
    );
    info!("Shell output:\n{}", run.stdout);
    info!("Error output:\n{}", run.stderr);

    let report = run.report();
    let summary = summarize(&report);
    info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        errors = summary.errors,
        "{}/{} passed ({}%) in {:.2}s",
        summary.passed,
        summary.total(),
        summary.pass_rate(),
        run.duration.as_secs_f64()
    );

    if !analyze {
        return Ok(run.exit_code);
    }

    let analysis = pipeline.analyze_tests(&report).await?;
    info!("\n\n=== REPORT ANALYSIS ===\n");
    info!("{}", analysis);

    if rewrite {
        let code = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read test source {}", path.display()))?;
        let rewritten = pipeline.rewrite_tests(&report, &analysis, &code).await?;
        info!("\n\n=== REWRITE TESTS ===\n");
        info!("{}", rewritten);
    }

    Ok(run.exit_code)
}

async fn generate_command(pipeline: &QaPipeline, requirements: PathBuf) -> Result<()> {
    let text = tokio::fs::read_to_string(&requirements)
        .await
        .with_context(|| format!("Failed to read requirements {}", requirements.display()))?;

    let tests = pipeline.generate_tests(&text).await?;
    println!("{}", tests);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let kind: RunnerKind = args.runner.parse().map_err(|e: String| anyhow!(e))?;
    let runner = match &args.runner_program {
        Some(program) => TestRunner::with_program(kind, program),
        None => TestRunner::new(kind),
    };
    let pipeline = QaPipeline::new(runner, args.model.to_config());

    match args.command {
        Command::Run {
            path,
            verbose,
            coverage,
            no_analyze,
            rewrite,
        } => {
            let options = RunOptions::new()
                .with_verbose(verbose)
                .with_coverage(coverage);
            let exit_code = run_command(&pipeline, path, options, !no_analyze, rewrite).await?;
            std::process::exit(exit_code);
        }
        Command::Generate { requirements } => {
            generate_command(&pipeline, requirements).await?;
        }
    }

    Ok(())
}
