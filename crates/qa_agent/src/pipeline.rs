//! Run, analyze and rewrite pipeline
//!
//! Each step is a single request/response: run the suite, hand the captured
//! report to an analysis client, and optionally ask a rewrite client for a
//! replacement test file.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::{get_analysis_prompt, get_generation_prompt, get_rewrite_prompt};
use crate::error::Result;
use crate::model::{ChatBackend, ModelConfig, RequestClient};
use crate::runner::{RunOptions, RunnerKind, TestRunResult, TestRunner};

/// Message asking the model for a black-box test suite
pub const GENERATION_REQUEST: &str = "Write a complete black box test suite for these requirements.";

/// Where the pipeline's model clients send their requests
enum Transport {
    Config(ModelConfig),
    Backend(Arc<dyn ChatBackend>),
}

/// Straight-line test pipeline: run, analyze, optionally rewrite
pub struct QaPipeline {
    runner: TestRunner,
    transport: Transport,
}

impl QaPipeline {
    /// Create a pipeline whose clients talk to the endpoint in `model_config`
    ///
    /// The credential is only checked when a model step runs, so a pipeline
    /// without one can still run tests.
    pub fn new(runner: TestRunner, model_config: ModelConfig) -> Self {
        Self {
            runner,
            transport: Transport::Config(model_config),
        }
    }

    /// Create a pipeline over an existing backend
    pub fn with_backend(runner: TestRunner, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            runner,
            transport: Transport::Backend(backend),
        }
    }

    pub fn runner(&self) -> &TestRunner {
        &self.runner
    }

    fn client(&self, system_prompt: String) -> Result<RequestClient> {
        match &self.transport {
            Transport::Config(config) => RequestClient::new(config, system_prompt),
            Transport::Backend(backend) => {
                Ok(RequestClient::with_backend(Arc::clone(backend), system_prompt))
            }
        }
    }

    /// Run the test suite at `path` and capture its report
    pub async fn run_tests(&self, path: impl AsRef<Path>, options: &RunOptions) -> Result<TestRunResult> {
        self.runner.run(path, options).await
    }

    /// Ask the model for human-readable feedback on a test report
    pub async fn analyze_tests(&self, report: &str) -> Result<String> {
        let client = self.client(get_analysis_prompt(self.runner.kind()))?;
        info!("Sending analysis request to LLM...");
        client.send(&analysis_message(report)).await
    }

    /// Ask the model for a replacement test file
    pub async fn rewrite_tests(&self, report: &str, analysis: &str, test_code: &str) -> Result<String> {
        let client = self.client(get_rewrite_prompt(self.runner.kind()))?;
        info!("Sending rewrite request to LLM...");
        client
            .send(&rewrite_message(self.runner.kind(), report, analysis, test_code))
            .await
    }

    /// Ask the model for black-box tests derived from a requirements text
    pub async fn generate_tests(&self, requirements: &str) -> Result<String> {
        let client = self.client(get_generation_prompt(self.runner.kind(), requirements))?;
        info!("Sending generation request to LLM...");
        client.send(GENERATION_REQUEST).await
    }
}

/// Build the analysis request for a report
pub fn analysis_message(report: &str) -> String {
    format!("Analyze the following test report:\n\n{}", report)
}

/// Build the rewrite request embedding report, analysis and code
pub fn rewrite_message(kind: RunnerKind, report: &str, analysis: &str, test_code: &str) -> String {
    format!(
        "Here is the test report:\n\n{report}\n\n\
         And here is the analysis of the test report:\n\n{analysis}\n\n\
         Based on this analysis, rewrite the following test code. Ensure the tests are\n\
         written in a way that is easy to understand and maintain.\n\n\
         Code to rewrite:\n\
         ```{fence}\n{test_code}\n```\n",
        fence = kind.fence_tag(),
    )
}
