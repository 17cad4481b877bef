use std::path::PathBuf;
use std::sync::Arc;

use easy_config_store::ConfigStore;
use eyre::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::chat::prompt::OutputMode;
use crate::export::ExportFormat;

pub type Config = Arc<ConfigInner>;

pub fn config(path: PathBuf) -> Result<Config> {
    let config_store = ConfigStore::<ConfigInner>::read(path, "config".to_string())?;
    let inner = (*config_store).clone();

    info!("config parsing successful");
    debug!("loaded configuration:\n{}", toml::to_string_pretty(&inner.redacted())?);

    Ok(Arc::new(inner))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigInner {
    pub llm: LLMConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ConfigInner {
    fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.llm.api_key.is_some() {
            copy.llm.api_key = Some("<redacted>".to_string());
        }
        copy
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    /// Prefer `api_key_env`; a key here stays in the user's own config file.
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LLMConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default = "default_pdf_timeout_secs")]
    pub pdf_timeout_secs: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            format: ExportFormat::default(),
            pdf_timeout_secs: default_pdf_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_pdf_timeout_secs() -> u64 {
    120
}

impl Default for ConfigInner {
    fn default() -> Self {
        let cfg = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.default.toml",));

        toml::from_str(cfg).unwrap() // should be okay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses_without_key() {
        let cfg = ConfigInner::default();
        assert_eq!(cfg.llm.api_key, None);
        assert_eq!(cfg.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.output.mode, OutputMode::Structured);
        assert_eq!(cfg.output.format, ExportFormat::Pdf);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: ConfigInner = toml::from_str(
            r#"
            [llm]
            api_key = "abc"
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.llm.model, "gemini-1.5-pro");
        assert_eq!(cfg.llm.timeout_secs, 60);
        assert_eq!(cfg.output, OutputConfig::default());
        assert_eq!(cfg.llm.resolve_api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut cfg = ConfigInner::default();
        cfg.llm.api_key = Some("secret".into());
        let dumped = toml::to_string_pretty(&cfg.redacted()).unwrap();
        assert!(!dumped.contains("secret"));
    }

    #[test]
    fn test_blank_key_falls_through_to_env_name() {
        let cfg = LLMConfig {
            api_key: Some("  ".into()),
            api_key_env: "RESUME_FORGE_TEST_NEVER_SET".into(),
            ..LLMConfig::default()
        };
        assert_eq!(cfg.resolve_api_key(), None);
    }
}
