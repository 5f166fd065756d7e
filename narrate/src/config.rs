//! narrate configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_MODEL: &str = "gpt-4o-mini-tts";
const DEFAULT_VOICE: &str = "alloy";
const DEFAULT_RESPONSE_FORMAT: &str = "mp3";
const DEFAULT_TOKEN_BUDGET: usize = 1600;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024; // 100MB

/// Narration style sent with every synthesis request. Process-wide, not
/// configurable per call.
const DEFAULT_INSTRUCTIONS: &str = "Speak with a warm, clear, and engaging tone suited to \
    long-form narration in both Japanese and English. Use natural pacing with gentle emphasis \
    on key points, add brief pauses at punctuation marks and between sentences, and keep a \
    consistent, friendly energy throughout.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrateConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Speech model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Voice to narrate with
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Audio container format requested from the service
    #[serde(default = "default_response_format")]
    pub response_format: String,

    /// Style instructions sent with every request
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Maximum tokens per synthesis request
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Synthesis attempts per chunk before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base retry delay in seconds (multiplied by the attempt number)
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Maximum input file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_response_format() -> String {
    DEFAULT_RESPONSE_FORMAT.to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

fn default_token_budget() -> usize {
    DEFAULT_TOKEN_BUDGET
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for NarrateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            voice: default_voice(),
            response_format: default_response_format(),
            instructions: default_instructions(),
            token_budget: default_token_budget(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl NarrateConfig {
    /// Get the config file path: ~/.config/cli-programs/narrate.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("narrate.toml"))
    }

    /// Load config from file, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: NarrateConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Resolve the API key: config file first, environment variable second.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(API_KEY_ENV_VAR).with_context(|| {
            format!("{API_KEY_ENV_VAR} environment variable is not set and no api_key in config")
        })
    }

    /// Base retry delay as a Duration.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}
