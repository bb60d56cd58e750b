//! Error types for model requests and test runs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    #[error("Missing credential: set API_KEY or pass --api-key")]
    MissingCredential,

    #[error("Model returned no content{}", refusal_suffix(.refusal))]
    EmptyResponse { refusal: Option<String> },

    #[error("Model API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("Test runner failed to start: {0}")]
    Runner(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn refusal_suffix(refusal: &Option<String>) -> String {
    match refusal {
        Some(reason) if !reason.is_empty() => format!(" (refusal: {})", reason),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, QaError>;
