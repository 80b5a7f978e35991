//! Configuration loading, validation, and management for coursechat.
//!
//! Loads configuration from `~/.coursechat/config.toml` with environment
//! variable overrides. Validates all settings before anything is built
//! from them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.coursechat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the chat completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per assistant reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout for chat calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where the two requirement corpora live
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Section extraction heuristics
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Character caps for the assembled context
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Prompt wording
    #[serde(default)]
    pub prompt: PromptConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    500
}
fn default_request_timeout_secs() -> u64 {
    60
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("corpus", &self.corpus)
            .field("extraction", &self.extraction)
            .field("budget", &self.budget)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Locators for the two corpora. A locator starting with `http://` or
/// `https://` is fetched over HTTP; anything else is a filesystem path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Short per-program summary document
    #[serde(default = "default_summary_locator")]
    pub summary: String,

    /// Full degree-requirements document with line-oriented program headers
    #[serde(default = "default_detailed_locator")]
    pub detailed: String,
}

fn default_summary_locator() -> String {
    AppConfig::corpus_dir()
        .join("program_summary.txt")
        .to_string_lossy()
        .into_owned()
}
fn default_detailed_locator() -> String {
    AppConfig::corpus_dir()
        .join("degree_requirements.txt")
        .to_string_lossy()
        .into_owned()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            summary: default_summary_locator(),
            detailed: default_detailed_locator(),
        }
    }
}

/// Heuristics used to cut one program's section out of the detailed corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Prefix stripped from a program identifier to get its bare code
    /// (`major6-3` → `6-3`)
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: String,

    /// Course number whose programs have sections in the detailed corpus.
    /// Also forms the `<course>-<digit>` header shape that ends a section.
    #[serde(default = "default_detailed_course")]
    pub detailed_course: String,

    /// A header line must contain at least one of these (case-sensitive)
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

fn default_identifier_prefix() -> String {
    "major".into()
}
fn default_detailed_course() -> String {
    "6".into()
}
fn default_keywords() -> Vec<String> {
    [
        "Science",
        "Engineering",
        "Intelligence",
        "Computer",
        "Electrical",
        "Molecular",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            identifier_prefix: default_identifier_prefix(),
            detailed_course: default_detailed_course(),
            keywords: default_keywords(),
        }
    }
}

/// Character caps applied after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,

    #[serde(default = "default_detail_chars")]
    pub detail_chars: usize,
}

fn default_summary_chars() -> usize {
    8_000
}
fn default_detail_chars() -> usize {
    20_000
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            summary_chars: default_summary_chars(),
            detail_chars: default_detail_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_institution")]
    pub institution: String,

    #[serde(default = "default_tool_name")]
    pub tool_name: String,
}

fn default_institution() -> String {
    "MIT".into()
}
fn default_tool_name() -> String {
    "CourseRoad".into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            institution: default_institution(),
            tool_name: default_tool_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.coursechat/config.toml).
    ///
    /// Also checks environment variables:
    /// - `COURSECHAT_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `COURSECHAT_MODEL` overrides the model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply credential and model overrides read through `lookup`.
    ///
    /// A non-blank credential already present in the file wins over the
    /// environment; the model override always applies. Blank values are
    /// ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if !self.has_api_key() {
            self.api_key = non_blank("COURSECHAT_API_KEY").or_else(|| non_blank("OPENAI_API_KEY"));
        }

        if let Some(model) = non_blank("COURSECHAT_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".coursechat")
    }

    /// Default directory for the corpus files.
    pub fn corpus_dir() -> PathBuf {
        Self::config_dir().join("corpus")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.budget.summary_chars == 0 || self.budget.detail_chars == 0 {
            return Err(ConfigError::ValidationError(
                "budget caps must be greater than zero".into(),
            ));
        }

        if self.corpus.summary.trim().is_empty() || self.corpus.detailed.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "corpus locators must not be empty".into(),
            ));
        }

        let ex = &self.extraction;
        if ex.identifier_prefix.is_empty() || ex.detailed_course.is_empty() {
            return Err(ConfigError::ValidationError(
                "extraction.identifier_prefix and extraction.detailed_course must not be empty"
                    .into(),
            ));
        }
        if ex.keywords.iter().all(|k| k.is_empty()) {
            return Err(ConfigError::ValidationError(
                "extraction.keywords needs at least one non-empty keyword".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            corpus: CorpusConfig::default(),
            extraction: ExtractionConfig::default(),
            budget: BudgetConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
