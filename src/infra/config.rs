// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::ConfigError;
use crate::infra::paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub retention: RetentionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://127.0.0.1:3000".into(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upper bound for both retention settings, in hours (about a century).
pub const MAX_RETENTION_HOURS: u64 = 24 * 365 * 100;

/// Session retention window and sweep period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub max_age_hours: u64,
    pub sweep_interval_minutes: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_hours: 24,
            sweep_interval_minutes: 60,
        }
    }
}

impl RetentionConfig {
    /// Saturates instead of wrapping; `Config::validate` rejects such values.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours.saturating_mul(60 * 60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }
}

impl Config {
    /// Load config from `path`, or from the default location. A missing
    /// default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => match paths::config_file_path() {
                Some(p) if p.exists() => Self::load_from(&p)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply a `PORT`-style override. `None` leaves the config untouched.
    pub fn apply_port_override(&mut self, value: Option<String>) -> Result<(), ConfigError> {
        let Some(raw) = value else {
            return Ok(());
        };
        self.server.port = raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "PORT".into(),
            message: format!("'{raw}' is not a valid port"),
        })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention.max_age_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "retention.max_age_hours".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.retention.max_age_hours > MAX_RETENTION_HOURS {
            return Err(ConfigError::Invalid {
                key: "retention.max_age_hours".into(),
                message: format!("must be at most {MAX_RETENTION_HOURS}"),
            });
        }
        if self.retention.sweep_interval_minutes == 0 {
            return Err(ConfigError::Invalid {
                key: "retention.sweep_interval_minutes".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.retention.sweep_interval_minutes > MAX_RETENTION_HOURS * 60 {
            return Err(ConfigError::Invalid {
                key: "retention.sweep_interval_minutes".into(),
                message: format!("must be at most {}", MAX_RETENTION_HOURS * 60),
            });
        }
        Ok(())
    }
}
