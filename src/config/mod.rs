use anyhow::Result;

use crate::CleanError;

/// Default Readwise API base URL
pub const READWISE_BASE_URL: &str = "https://readwise.io/api/v2";

/// Default OpenRouter chat-completions endpoint
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Runtime configuration resolved from the environment.
///
/// All values are captured as options at startup; each subcommand asks only
/// for what it needs, so a missing Readwise key does not block single-text
/// cleaning. Nothing here reaches the network.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Readwise API token (`READWISE_API_KEY`)
    pub readwise_api_key: Option<String>,

    /// OpenRouter API key (`OPENROUTER_API_KEY`)
    pub openrouter_api_key: Option<String>,

    /// Default OpenRouter model (`OPENROUTER_MODEL`), overridable per run
    pub model: Option<String>,
}

impl Config {
    /// Snapshot configuration from the process environment.
    ///
    /// Callers should load `.env` (via `dotenv`) before this runs; process
    /// environment always wins over the file.
    pub fn from_env() -> Self {
        Self {
            readwise_api_key: read_var("READWISE_API_KEY"),
            openrouter_api_key: read_var("OPENROUTER_API_KEY"),
            model: read_var("OPENROUTER_MODEL"),
        }
    }

    /// Resolve the model to use, preferring a CLI override over the
    /// environment. Prints which source supplied the model; fails when
    /// neither is set.
    pub fn resolve_model(&self, cli_override: Option<&str>) -> Result<String> {
        if let Some(model) = cli_override {
            println!("Using model from CLI: {model}");
            return Ok(model.to_string());
        }
        if let Some(model) = &self.model {
            println!("Using model from environment: {model}");
            return Ok(model.clone());
        }
        Err(CleanError::MissingModel.into())
    }

    /// The Readwise API token, or a configuration error.
    pub fn require_readwise_key(&self) -> Result<&str> {
        self.readwise_api_key
            .as_deref()
            .ok_or_else(|| CleanError::MissingKey("READWISE_API_KEY").into())
    }

    /// The OpenRouter API key, or a configuration error.
    pub fn require_openrouter_key(&self) -> Result<&str> {
        self.openrouter_api_key
            .as_deref()
            .ok_or_else(|| CleanError::MissingKey("OPENROUTER_API_KEY").into())
    }
}

/// Read an environment variable, treating empty values as unset.
fn read_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
