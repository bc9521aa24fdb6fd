//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studycomp_core::engine::QuizEngineConfig;
use studycomp_core::model::Difficulty;
use studycomp_core::traits::TextGenerator;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single text-generation provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    Mock {
        /// Prompt substring to canned response.
        #[serde(default)]
        responses: HashMap<String, String>,
        #[serde(default)]
        default_response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock {
                responses,
                default_response,
            } => f
                .debug_struct("Mock")
                .field("responses", &responses.len())
                .field("default_response", default_response)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level studycomp configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudycompConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for generation; unset means offline.
    #[serde(default)]
    pub default_provider: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on a single generation call.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
    /// Retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub default_difficulty: Difficulty,
    #[serde(default = "default_questions_per_quiz")]
    pub questions_per_quiz: usize,
    /// Directory holding `syllabus.json` and `progress.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Knowledge base replacing the built-in one (file or directory).
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_generation_timeout() -> u64 {
    20
}
fn default_retries() -> u32 {
    1
}
fn default_retry_delay() -> u64 {
    500
}
fn default_questions_per_quiz() -> usize {
    5
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StudycompConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: None,
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            generation_timeout_secs: default_generation_timeout(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            default_difficulty: Difficulty::default(),
            questions_per_quiz: default_questions_per_quiz(),
            data_dir: default_data_dir(),
            knowledge_base: None,
        }
    }
}

impl StudycompConfig {
    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> QuizEngineConfig {
        QuizEngineConfig {
            model: self.default_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            system_prompt_override: None,
        }
    }

    /// Instantiate the default provider, or `None` when running offline.
    pub fn default_generator(&self) -> Result<Option<Arc<dyn TextGenerator>>> {
        let Some(name) = self.default_provider.as_deref() else {
            return Ok(None);
        };
        let provider_config = self
            .providers
            .get(name)
            .with_context(|| format!("default provider '{name}' is not configured"))?;
        let provider = create_provider(name, provider_config)?;
        tracing::debug!(provider = name, model = %self.default_model, "using text generator");
        Ok(Some(Arc::from(provider)))
    }
}

/// Expand `${VAR_NAME}` references. Unset variables expand to nothing and an
/// unterminated reference is kept verbatim.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            org_id: org_id.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
        ProviderConfig::Mock { .. } => config.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `studycomp.toml` in the current directory
/// 2. `~/.config/studycomp/config.toml`
///
/// Environment variable overrides: `STUDYCOMP_OPENAI_KEY`, `STUDYCOMP_GEMINI_KEY`.
pub fn load_config() -> Result<StudycompConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<StudycompConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("studycomp.toml");
            if local.exists() {
                Some(local)
            } else {
                global_config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<StudycompConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StudycompConfig::default(),
    };
    tracing::debug!(path = ?config_path, "loaded configuration");

    // Apply env var overrides
    if let Ok(key) = std::env::var("STUDYCOMP_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("STUDYCOMP_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn global_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studycomp"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn TextGenerator>> {
    let provider: Box<dyn TextGenerator> = match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiProvider::new(api_key, base_url.clone(), org_id.clone())?),
        ProviderConfig::Gemini { api_key, base_url } => {
            Box::new(GeminiProvider::new(api_key, base_url.clone())?)
        }
        ProviderConfig::Ollama { base_url } => Box::new(OllamaProvider::new(base_url)?),
        ProviderConfig::Mock {
            responses,
            default_response,
        } => {
            let mut mock = MockProvider::new(responses.clone());
            if let Some(response) = default_response {
                mock = mock.with_default_response(response);
            }
            Box::new(mock)
        }
    };
    tracing::debug!(name, provider = provider.name(), "created provider");
    Ok(provider)
}
