use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VismemError};

/// Top-level configuration. Layered: global file first, then a
/// `vismem.toml` in the working directory; later layers win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VismemConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the visual-memory service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Explicit bearer token. Prefer the env var or token file for
    /// anything beyond local experiments.
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable consulted when no explicit token is set.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Optional file holding the token on its first line.
    #[serde(default)]
    pub token_file: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: default_token_env(),
            token_file: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_env() -> String {
    "VISMEM_TOKEN".to_string()
}

/// Global config path: `~/.config/vismem/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vismem").join("config.toml"))
}

impl VismemConfig {
    pub fn load(working_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = working_dir {
            let local = dir.join("vismem.toml");
            if local.exists() {
                builder = builder.add_source(File::from(local).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| VismemError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| VismemError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Clamp out-of-range values back to usable defaults.
    fn validate(&mut self) {
        if self.backend.base_url.trim().is_empty() {
            self.backend.base_url = default_base_url();
        }
        // Joining request paths assumes no trailing slash.
        while self.backend.base_url.ends_with('/') {
            self.backend.base_url.pop();
        }
        if self.backend.timeout_secs == 0 {
            self.backend.timeout_secs = default_timeout_secs();
        }
    }
}
