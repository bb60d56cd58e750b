//! Configuration module for qa_agent
//!
//! This module contains:
//! - `prompts`: System prompts for the analysis, rewrite and generation clients

mod prompts;

pub use prompts::{get_analysis_prompt, get_generation_prompt, get_rewrite_prompt};
