//! Readwise Cleaner - a CLI tool for rewriting messy Readwise highlights with an LLM
//!
//! This library fetches books and highlights from the Readwise API, selects
//! podcast-derived transcript highlights, cleans each one through an OpenRouter
//! chat-completions call, and writes the result back. A companion entry point
//! cleans a single text snippet or file without touching Readwise.

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod filter;
pub mod pipeline;
pub mod readwise;

pub use cleaner::{OpenRouterCleaner, TextCleaner};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use pipeline::{SyncOptions, SyncReport, TextSource};
pub use readwise::{Book, Highlight, HighlightStore, ReadwiseClient};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the cleaner
#[derive(thiserror::Error, Debug)]
pub enum CleanError {
    #[error("No model specified. Use --model flag or set OPENROUTER_MODEL in .env")]
    MissingModel,

    #[error("{0} not found in environment or .env file")]
    MissingKey(&'static str),

    #[error("LLM API request failed: {status} - {body}")]
    ApiStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("LLM response is missing choices[0].message.content")]
    MalformedResponse,
}
