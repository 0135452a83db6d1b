//! Agent configuration and API key resolution.
//!
//! The config file is plain JSON. Missing sections and fields take their
//! defaults, so a partial file is always valid input. API keys are looked up
//! in a [`CredentialStore`] before the file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::AppError;

pub const CONFIG_FILE_NAME: &str = "ai_agent_config.json";

/// Remote LLM service an API key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Gemini,
    AthenaMist,
}

impl Service {
    pub fn key(&self) -> &'static str {
        match self {
            Service::Gemini => "gemini",
            Service::AthenaMist => "athena_mist",
        }
    }

    /// Environment variable read by [`EnvCredentialStore`]
    pub fn env_var(&self) -> &'static str {
        match self {
            Service::Gemini => "GEMINI_API_KEY",
            Service::AthenaMist => "ATHENA_MIST_API_KEY",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Service {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "gemini" => Ok(Service::Gemini),
            "athena_mist" | "athenamist" => Ok(Service::AthenaMist),
            other => Err(AppError::Validation(format!("Unknown service: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(url)]
    pub base_url: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AthenaMistSettings {
    pub api_key: String,
    #[validate(url)]
    pub endpoint: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for AthenaMistSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.athenamist.ai/v1".to_string(),
            model: "athena-mist-v1".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UiSettings {
    pub theme: String,
    #[validate(range(min = 6, max = 72))]
    pub font_size: u32,
    pub show_advanced: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font_size: 12,
            show_advanced: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AssistantSettings {
    /// Prior turns sent along with each request
    #[validate(range(min = 1, max = 100))]
    pub history_limit: usize,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            history_limit: 10,
            request_timeout_secs: 90,
        }
    }
}

/// Full agent configuration as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AgentConfig {
    #[validate(nested)]
    pub gemini: GeminiSettings,
    #[validate(nested)]
    pub athena_mist: AthenaMistSettings,
    #[validate(nested)]
    pub ui: UiSettings,
    #[validate(nested)]
    pub assistant: AssistantSettings,
}

impl AgentConfig {
    /// Load from `path`, falling back to defaults when the file is missing,
    /// unreadable or malformed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Strict variant of [`AgentConfig::load`]: any failure is returned.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let config: AgentConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    fn stored_key(&self, service: Service) -> &str {
        match service {
            Service::Gemini => &self.gemini.api_key,
            Service::AthenaMist => &self.athena_mist.api_key,
        }
    }

    fn stored_key_mut(&mut self, service: Service) -> &mut String {
        match service {
            Service::Gemini => &mut self.gemini.api_key,
            Service::AthenaMist => &mut self.athena_mist.api_key,
        }
    }

    /// Resolve the API key for `service`: credential store first, then the file.
    pub fn api_key(&self, service: Service, store: &dyn CredentialStore) -> Option<String> {
        store
            .get(service)
            .filter(|k| !k.is_empty())
            .or_else(|| Some(self.stored_key(service).to_string()).filter(|k| !k.is_empty()))
    }

    /// Store a key in the credential store and in memory.
    ///
    /// A read-only store is not fatal; the in-memory copy is still updated.
    pub fn set_api_key(
        &mut self,
        service: Service,
        key: &str,
        store: &dyn CredentialStore,
    ) -> Result<(), AppError> {
        if let Err(e) = store.set(service, key) {
            warn!("Credential store rejected {} key: {}", service, e);
        }
        *self.stored_key_mut(service) = key.to_string();
        Ok(())
    }

    pub fn delete_api_key(
        &mut self,
        service: Service,
        store: &dyn CredentialStore,
    ) -> Result<(), AppError> {
        store.delete(service)?;
        self.stored_key_mut(service).clear();
        Ok(())
    }

    /// Copy with every API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.gemini.api_key = mask_key(&copy.gemini.api_key);
        copy.athena_mist.api_key = mask_key(&copy.athena_mist.api_key);
        copy
    }
}

/// Keep the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Default config location: `$ATHENA_CONFIG_DIR/ai_agent_config.json`, or
/// the current directory.
pub fn default_config_path() -> PathBuf {
    std::env::var_os("ATHENA_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

/// Secure storage for API keys, consulted before the config file.
pub trait CredentialStore: Send + Sync {
    fn get(&self, service: Service) -> Option<String>;
    fn set(&self, service: Service, key: &str) -> Result<(), AppError>;
    fn delete(&self, service: Service) -> Result<(), AppError>;
}

/// Reads keys from environment variables. Read-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn get(&self, service: Service) -> Option<String> {
        std::env::var(service.env_var()).ok()
    }

    fn set(&self, service: Service, _key: &str) -> Result<(), AppError> {
        Err(AppError::Config(format!(
            "Environment credentials are read-only; export {} instead",
            service.env_var()
        )))
    }

    fn delete(&self, _service: Service) -> Result<(), AppError> {
        Ok(())
    }
}

/// Process-local key storage
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    keys: Mutex<HashMap<Service, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(service: Service, key: &str) -> Self {
        let store = Self::new();
        if let Ok(mut keys) = store.keys.lock() {
            keys.insert(service, key.to_string());
        }
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, service: Service) -> Option<String> {
        self.keys.lock().ok()?.get(&service).cloned()
    }

    fn set(&self, service: Service, key: &str) -> Result<(), AppError> {
        self.keys
            .lock()
            .map_err(|e| AppError::Internal(format!("Credential store poisoned: {}", e)))?
            .insert(service, key.to_string());
        Ok(())
    }

    fn delete(&self, service: Service) -> Result<(), AppError> {
        self.keys
            .lock()
            .map_err(|e| AppError::Internal(format!("Credential store poisoned: {}", e)))?
            .remove(&service);
        Ok(())
    }
}
