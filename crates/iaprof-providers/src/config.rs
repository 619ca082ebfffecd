//! Provider configuration and factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use iaprof_core::mentor::MentorConfig;
use iaprof_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;

/// Configuration for the generative-model provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        #[serde(default = "default_api_key")]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Gemini {
            api_key: default_api_key(),
            base_url: None,
        }
    }
}

fn default_api_key() -> String {
    "${GEMINI_API_KEY}".to_string()
}

/// Model ids per call category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_fast_model")]
    pub fast: String,
    #[serde(default = "default_deep_model")]
    pub deep: String,
    #[serde(default = "default_vision_model")]
    pub vision: String,
}

fn default_fast_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_deep_model() -> String {
    "gemini-3-pro-preview".to_string()
}
fn default_vision_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            fast: default_fast_model(),
            deep: default_deep_model(),
            vision: default_vision_model(),
        }
    }
}

/// Top-level iaprof configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IaprofConfig {
    /// Provider connection settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Models used for each kind of call.
    #[serde(default)]
    pub models: ModelsConfig,
    /// Sampling temperature; provider default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Where session reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./iaprof-reports")
}

impl Default for IaprofConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            models: ModelsConfig::default(),
            temperature: None,
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
        }
    }
}

impl IaprofConfig {
    /// Mentor settings derived from this configuration.
    pub fn mentor_config(&self) -> MentorConfig {
        MentorConfig {
            fast_model: self.models.fast.clone(),
            deep_model: self.models.deep.clone(),
            vision_model: self.models.vision.clone(),
            temperature: self.temperature,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `iaprof.toml` in the current directory
/// 2. `~/.config/iaprof/config.toml`
///
/// Environment variable overrides: `IAPROF_API_KEY`, then `API_KEY`.
pub fn load_config() -> Result<IaprofConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<IaprofConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("iaprof.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<IaprofConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => IaprofConfig::default(),
    };

    config.provider = resolve_provider_config(&config.provider);

    // Apply env var overrides
    let override_key = std::env::var("IAPROF_API_KEY")
        .or_else(|_| std::env::var("API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty());
    if let Some(key) = override_key {
        let ProviderConfig::Gemini { api_key, .. } = &mut config.provider;
        *api_key = key;
    }

    if let Some(t) = config.temperature {
        anyhow::ensure!(
            (0.0..=2.0).contains(&t),
            "temperature must be between 0.0 and 2.0, got {t}"
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("iaprof"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.trim().is_empty(),
                "no Gemini API key configured; set GEMINI_API_KEY or IAPROF_API_KEY, or edit iaprof.toml"
            );
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())))
        }
    }
}
