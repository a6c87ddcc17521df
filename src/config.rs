use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::PromptTemplates;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub display: DisplayConfig,
    pub templates: PromptTemplates,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub model: String,
    /// Default sampling temperature; overridable per request.
    pub temperature: f64,
    /// Default response-length cap; overridable per request.
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Endpoint override, used by the test suite to point at a mock
    /// server. Never written to disk.
    #[serde(skip)]
    pub api_url: Option<String>,
    /// Injected from the environment at startup, never persisted.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout_secs: 30,
            api_url: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub show_duration: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            show_duration: true,
        }
    }
}

impl Config {
    pub fn create_default(path: &Path) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the config file, creating it with defaults on first run,
    /// then pulls the API credential out of the environment. A missing
    /// credential is not fatal here; it surfaces per request so the
    /// session stays usable.
    pub fn ensure_config_exists() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            println!("Creating default config at {:?}", config_path);
            Self::create_default(&config_path)?;
        }

        let mut config = Self::load(&config_path)?;
        config.analyzer.api_key = read_api_key_from_env();
        Ok(config)
    }
}

/// The one required secret. Read here rather than inside the analyzer
/// so tests and other callers can inject their own.
pub fn read_api_key_from_env() -> Option<String> {
    std::env::var("GROQ_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "revu", "revu")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
