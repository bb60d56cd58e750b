//! Model client module for AI inference
//!
//! This module provides:
//! - `client`: OpenAI-compatible request client and the backend seam it sends through

mod client;

pub use client::{ChatBackend, ModelConfig, OpenAiBackend, RequestClient};
