use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzers::QualityThresholds;
use crate::error::{CodexError, Result};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const ENV_PREFIX: &str = "CODEXAGENT";
const LOCAL_CONFIG_NAME: &str = "codexagent";

/// Settings for the whole process, built once at startup.
///
/// Layers, lowest priority first: built-in defaults, the user config file
/// (`<config dir>/codexagent/config.toml`), `./codexagent.toml` or the file
/// passed with `--config`, then `CODEXAGENT__SECTION__KEY` environment
/// variables. `GEMINI_API_KEY` fills in the API key when no file sets one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodexConfig {
    pub ai: AiConfig,
    pub file_scanning: FileScanningConfig,
    pub quality: QualityThresholds,
    pub summarize: SummarizeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_seconds: None,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScanningConfig {
    pub exclude_patterns: Vec<String>,
    pub follow_symlinks: bool,
    pub max_depth: Option<usize>,
}

impl Default for FileScanningConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                ".git".to_string(),
                "__pycache__".to_string(),
                ".venv".to_string(),
                ".tox".to_string(),
                "node_modules".to_string(),
            ],
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    pub include_patterns: Vec<String>,
    pub max_snippets: usize,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["*.py".to_string(), "*.md".to_string()],
            max_snippets: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub colors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { colors: true }
    }
}

impl CodexConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(dirs) = ProjectDirs::from("", "", LOCAL_CONFIG_NAME) {
            let user_config = dirs.config_dir().join("config.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(LOCAL_CONFIG_NAME).required(false)),
        };

        let mut config: CodexConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CodexError::Configuration(e.to_string()))?;

        if config.ai.api_key.as_deref().map_or(true, str::is_empty) {
            config.ai.api_key = std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        }

        Ok(config)
    }

    /// The model API credential; its absence is fatal.
    pub fn api_key(&self) -> Result<&str> {
        self.ai
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CodexError::Configuration(format!(
                    "{} is not set in the environment or config file",
                    API_KEY_ENV
                ))
            })
    }
}
