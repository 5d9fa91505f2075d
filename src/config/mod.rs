#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::domain::model::ApiKey;
use crate::utils::error::{HelperError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use std::time::Duration;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://api.cohere.ai/v1/generate";
pub const DEFAULT_MODEL: &str = "command-a-03-2025";
pub const DEFAULT_MAX_TOKENS: u32 = 450;
pub const DEFAULT_TEMPERATURE: f64 = 0.4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub endpoint: String,
    pub language: String,
    pub api_key: ApiKey,
}

impl OcrSettings {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub api_key: ApiKey,
}

impl GenerationSettings {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            endpoint: DEFAULT_GENERATION_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_key,
        }
    }
}

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ocr_api_key: Option<String>,
    pub cohere_api_key: Option<String>,
    pub ocr_endpoint: Option<String>,
    pub generation_endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub bind: Option<String>,
}

/// Fully resolved settings, handed to the clients at construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ocr: OcrSettings,
    pub generation: GenerationSettings,
    pub timeout_secs: u64,
    pub bind: String,
}

impl AppConfig {
    /// Built-in defaults, then the config file, then overrides.
    pub fn resolve(file: Option<&TomlConfig>, overrides: &ConfigOverrides) -> Result<Self> {
        let ocr_file = file.and_then(|f| f.ocr.clone()).unwrap_or_default();
        let generation_file = file.and_then(|f| f.generation.clone()).unwrap_or_default();
        let http_file = file.and_then(|f| f.http.clone()).unwrap_or_default();
        let server_file = file.and_then(|f| f.server.clone()).unwrap_or_default();

        let ocr_api_key = overrides.ocr_api_key.clone().or(ocr_file.api_key);
        let cohere_api_key = overrides.cohere_api_key.clone().or(generation_file.api_key);

        let ocr_api_key = validate_required_field("ocr.api_key", &ocr_api_key)?;
        let cohere_api_key = validate_required_field("generation.api_key", &cohere_api_key)?;

        Ok(Self {
            ocr: OcrSettings {
                endpoint: overrides
                    .ocr_endpoint
                    .clone()
                    .or(ocr_file.endpoint)
                    .unwrap_or_else(|| DEFAULT_OCR_ENDPOINT.to_string()),
                language: ocr_file
                    .language
                    .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
                api_key: ApiKey::new(ocr_api_key.clone()),
            },
            generation: GenerationSettings {
                endpoint: overrides
                    .generation_endpoint
                    .clone()
                    .or(generation_file.endpoint)
                    .unwrap_or_else(|| DEFAULT_GENERATION_ENDPOINT.to_string()),
                model: overrides
                    .model
                    .clone()
                    .or(generation_file.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: generation_file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: generation_file.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                api_key: ApiKey::new(cohere_api_key.clone()),
            },
            timeout_secs: overrides
                .timeout_secs
                .or(http_file.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            bind: overrides
                .bind
                .clone()
                .or(server_file.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("ocr.endpoint", &self.ocr.endpoint)?;
        validate_non_empty_string("ocr.language", &self.ocr.language)?;
        validate_api_key("ocr.api_key", &self.ocr.api_key)?;

        validate_url("generation.endpoint", &self.generation.endpoint)?;
        validate_non_empty_string("generation.model", &self.generation.model)?;
        validate_positive_number(
            "generation.max_tokens",
            u64::from(self.generation.max_tokens),
            1,
        )?;
        validate_range(
            "generation.temperature",
            self.generation.temperature,
            0.0,
            5.0,
        )?;
        validate_api_key("generation.api_key", &self.generation.api_key)?;

        validate_range("http.timeout_seconds", self.timeout_secs, 1, 600)?;
        validate_non_empty_string("server.bind", &self.bind)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

// Keys are never echoed back in the error value.
fn validate_api_key(field_name: &str, key: &ApiKey) -> Result<()> {
    let reason = if key.expose().trim().is_empty() {
        "API key cannot be empty"
    } else if key.expose().contains("${") {
        "API key references an environment variable that is not set"
    } else {
        return Ok(());
    };
    Err(HelperError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: "***".to_string(),
        reason: reason.to_string(),
    })
}
