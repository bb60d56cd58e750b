//! qa_agent: LLM-assisted test analysis
//!
//! This library provides:
//! - A request client for OpenAI-compatible chat-completion endpoints
//! - A test runner that captures a harness's report and exit code
//! - A pipeline that forwards captured reports to the model for analysis,
//!   rewriting and black-box test generation
//!
//! # Example
//!
//! ```no_run
//! use qa_agent::{ModelConfig, QaPipeline, RunOptions, RunnerKind, TestRunner};
//!
//! #[tokio::main]
//! async fn main() -> qa_agent::Result<()> {
//!     let model_config = ModelConfig::default().with_api_key("sk-xxxxx");
//!     let pipeline = QaPipeline::new(TestRunner::new(RunnerKind::Pytest), model_config);
//!
//!     let run = pipeline
//!         .run_tests("tests/test_ui.py", &RunOptions::new().with_verbose(true))
//!         .await?;
//!     let analysis = pipeline.analyze_tests(&run.stdout).await?;
//!     println!("{}", analysis);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod model;
pub mod pipeline;
pub mod runner;

pub use error::{QaError, Result};

pub use config::{get_analysis_prompt, get_generation_prompt, get_rewrite_prompt};

pub use model::{ChatBackend, ModelConfig, OpenAiBackend, RequestClient};

pub use pipeline::{analysis_message, rewrite_message, QaPipeline, GENERATION_REQUEST};

pub use runner::{summarize, RunOptions, RunnerKind, TestRunResult, TestRunner, TestSummary};
