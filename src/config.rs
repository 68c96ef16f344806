use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{BaselineError, Result};

/// Property-name prefixes considered long-stable across engines, used as
/// the last-resort positive signal when every real source is silent.
const DEFAULT_STABLE_PREFIXES: &[&str] = &[
    "margin",
    "padding",
    "border",
    "display",
    "font",
    "background",
    "width",
    "height",
    "position",
    "text-align",
    "line-height",
    "float",
    "overflow",
    "z-index",
];

pub const DEFAULT_CONFIG_FILE: &str = "baseline.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data: DataConfig,
    pub network: NetworkConfig,
    pub heuristic: HeuristicConfig,
}

impl EngineConfig {
    /// Load from a TOML file, falling back to defaults when the file does
    /// not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| BaselineError::Config(e.to_string()))?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.network.base_url.is_empty() {
            errors.push("network.base_url must not be empty");
        }
        if self.network.limit == 0 {
            errors.push("network.limit must be greater than 0");
        }
        if self.network.retry.max_attempts == 0 {
            errors.push("network.retry.max_attempts must be greater than 0");
        }
        if self.heuristic.enabled && self.heuristic.prefixes.is_empty() {
            errors.push("heuristic.prefixes must not be empty when the heuristic is enabled");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BaselineError::Config(errors.join("; ")))
        }
    }
}

/// Locations of the three knowledge-source files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub features: String,
    pub exceptions: String,
    pub webstatus_cache: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            features: "web-features.json".to_string(),
            exceptions: "exceptions.json".to_string(),
            webstatus_cache: "webstatus-cache.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn features_path(&self) -> PathBuf {
        self.dir.join(&self.features)
    }

    pub fn exceptions_path(&self) -> PathBuf {
        self.dir.join(&self.exceptions)
    }

    pub fn webstatus_cache_path(&self) -> PathBuf {
        self.dir.join(&self.webstatus_cache)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Live lookups are opt-in; everything works offline without them.
    pub enabled: bool,
    pub base_url: String,
    pub limit: u32,
    pub retry: RetryConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.webstatus.dev/v1/features".to_string(),
            limit: 100,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    /// Delay before retry n is `n * base_delay_ms`.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub enabled: bool,
    pub prefixes: Vec<String>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefixes: DEFAULT_STABLE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
