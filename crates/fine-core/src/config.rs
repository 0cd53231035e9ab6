//! Assistant generation settings
//!
//! Loaded from an embedded default (`config/assistant.toml`) with an optional
//! user override at `~/.local/share/fine/config/assistant.toml`. Missing keys in
//! the override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("../../../config/assistant.toml");

/// Settings applied to every assistant request
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout; a timed-out call degrades like any other failure
    pub timeout: Duration,
    /// Conversation turns forwarded with a chat message
    pub history_turns: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(60),
            history_turns: 6,
        }
    }
}

impl AssistantSettings {
    /// Load from the default override location, falling back to the embedded file
    pub fn load() -> Result<Self> {
        load_config(default_config_path().as_deref())
    }

    /// Load from an explicit override path
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fine").join("config").join("assistant.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<AssistantSettings> {
    let content = match override_path {
        Some(path) if path.exists() => fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };
    parse_config(&content)
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    generation: Option<RawGeneration>,
    context: Option<RawContext>,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawContext {
    history_turns: Option<usize>,
}

fn parse_config(content: &str) -> Result<AssistantSettings> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = AssistantSettings::default();

    if let Some(generation) = raw.generation {
        if let Some(temperature) = generation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(Error::Config(format!(
                    "temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
            settings.temperature = temperature;
        }
        if let Some(max_tokens) = generation.max_tokens {
            settings.max_tokens = max_tokens;
        }
        if let Some(timeout) = generation.timeout_secs {
            settings.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(context) = raw.context {
        if let Some(turns) = context.history_turns {
            settings.history_turns = turns;
        }
    }

    Ok(settings)
}
