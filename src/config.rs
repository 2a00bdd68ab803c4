use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerdantError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tips: TipsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            limits: LimitsConfig::default(),
            storage: StorageConfig::default(),
            tips: TipsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("VERDANT_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let path = dirs::config_dir()
            .ok_or_else(|| VerdantError::MissingConfig("config directory not found".to_string()))?
            .join("verdant/config.toml");
        Self::load_patch(&path)
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        let path = root.join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| VerdantError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| VerdantError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.gateway {
            self.gateway.merge(patch);
        }
        if let Some(patch) = patch.limits {
            self.limits.merge(patch);
        }
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.tips {
            self.tips.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("VERDANT_API_KEY") {
            self.gateway.api_key = Some(value);
        }
        if let Some(value) = env_string("VERDANT_PROJECT_ID") {
            self.gateway.project_id = Some(value);
        }
        if let Some(value) = env_string("VERDANT_REGION") {
            self.gateway.region = value;
        }
        if let Some(value) = env_string("VERDANT_TEXT_MODEL") {
            self.gateway.text_model = value;
        }
        if let Some(value) = env_string("VERDANT_VERIFY_MODEL") {
            self.gateway.verify_model = value;
        }
        if let Some(value) = env_u64("VERDANT_TIMEOUT_SECS")? {
            self.gateway.timeout_secs = value;
        }

        if let Some(value) = env_u32("VERDANT_CALLS_PER_MINUTE")? {
            self.limits.calls_per_minute = value;
        }

        if let Some(value) = env_string("VERDANT_TIP_LOG_DIR") {
            self.storage.tip_log_dir = value;
        }
        if let Some(value) = env_string("VERDANT_ACTIONS_FILE") {
            self.storage.actions_file = value;
        }

        if let Some(value) = env_u32("VERDANT_TIP_MAX_ATTEMPTS")? {
            self.tips.max_attempts = value;
        }
        if let Some(value) = env_f32("VERDANT_TIP_TEMPERATURE")? {
            self.tips.temperature = value;
        }
        if let Some(value) = env_u32("VERDANT_TIP_MAX_TOKENS")? {
            self.tips.max_new_tokens = value;
        }
        if let Some(value) = env_string("VERDANT_TIP_OBJECTIVE") {
            self.tips.objective = value;
        }

        Ok(())
    }
}

/// Inference service connection settings.
///
/// The API key and project id have no defaults: absence of either is a fatal
/// configuration error when the gateway client is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub text_model: String,
    #[serde(default)]
    pub verify_model: String,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            region: "us-south".to_string(),
            text_model: "ibm/granite-3-8b-instruct".to_string(),
            verify_model: "ibm/granite-13b-instruct-v2".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GatewayConfig {
    fn merge(&mut self, patch: GatewayPatch) {
        if let Some(value) = patch.api_key {
            self.api_key = Some(value);
        }
        if let Some(value) = patch.project_id {
            self.project_id = Some(value);
        }
        if let Some(value) = patch.region {
            self.region = value;
        }
        if let Some(value) = patch.text_model {
            self.text_model = value;
        }
        if let Some(value) = patch.verify_model {
            self.verify_model = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }

    /// Resolve the required secrets, failing when either is absent.
    pub fn credentials(&self) -> Result<ResolvedCredentials> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                VerdantError::MissingConfig(
                    "api key not set; set VERDANT_API_KEY or [gateway].api_key".to_string(),
                )
            })?;
        let project_id = self
            .project_id
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                VerdantError::MissingConfig(
                    "project id not set; set VERDANT_PROJECT_ID or [gateway].project_id"
                        .to_string(),
                )
            })?;
        Ok(ResolvedCredentials {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            region: self.region.clone(),
        })
    }
}

/// Secrets resolved from config and environment.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub api_key: String,
    pub project_id: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub calls_per_minute: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: 30,
        }
    }
}

impl LimitsConfig {
    fn merge(&mut self, patch: LimitsPatch) {
        if let Some(value) = patch.calls_per_minute {
            self.calls_per_minute = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Tip history directory, relative to the data root.
    #[serde(default)]
    pub tip_log_dir: String,
    /// Action ledger file, relative to the data root.
    #[serde(default)]
    pub actions_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tip_log_dir: "tip_logs".to_string(),
            actions_file: "actions.json".to_string(),
        }
    }
}

impl StorageConfig {
    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.tip_log_dir {
            self.tip_log_dir = value;
        }
        if let Some(value) = patch.actions_file {
            self.actions_file = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipsConfig {
    /// Generation attempts before the duplicate-tolerant fallback.
    #[serde(default)]
    pub max_attempts: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_new_tokens: u32,
    /// Objective clause appended to the tip prompt.
    #[serde(default)]
    pub objective: String,
}

impl Default for TipsConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            temperature: 0.7,
            max_new_tokens: 100,
            objective: "aligned with UN SDG 8".to_string(),
        }
    }
}

impl TipsConfig {
    fn merge(&mut self, patch: TipsPatch) {
        if let Some(value) = patch.max_attempts {
            self.max_attempts = value;
        }
        if let Some(value) = patch.temperature {
            self.temperature = value;
        }
        if let Some(value) = patch.max_new_tokens {
            self.max_new_tokens = value;
        }
        if let Some(value) = patch.objective {
            self.objective = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub gateway: Option<GatewayPatch>,
    pub limits: Option<LimitsPatch>,
    pub storage: Option<StoragePatch>,
    pub tips: Option<TipsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GatewayPatch {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub region: Option<String>,
    pub text_model: Option<String>,
    pub verify_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LimitsPatch {
    pub calls_per_minute: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    pub tip_log_dir: Option<String>,
    pub actions_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TipsPatch {
    pub max_attempts: Option<u32>,
    pub temperature: Option<f32>,
    pub max_new_tokens: Option<u32>,
    pub objective: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| VerdantError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| VerdantError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<f32>()
            .map(Some)
            .map_err(|err| VerdantError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
