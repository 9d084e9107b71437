use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::error::{Error, Result};

const CONFIG_ENV: &str = "FITZONE_CONFIG";
const CONFIG_FILE: &str = "fitzone.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: Backend,
    pub uri: String,
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Mongodb,
            uri: "mongodb://localhost:27017".to_string(),
            name: "fitzone".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScheduleSettings {
    /// File path or http(s) URL of the fixture list.
    pub source: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            source: "schedule.json".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub verbose: bool,
    pub disabled: Vec<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
            disabled: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MaintenanceSettings {
    pub cleanup_after_days: i64,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            cleanup_after_days: 30,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub user_header: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            user_header: "X-Fitzone-User".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub schedule: ScheduleSettings,
    pub logging: LoggingSettings,
    pub maintenance: MaintenanceSettings,
    pub server: ServerSettings,
}

impl Config {
    /// Reads `$FITZONE_CONFIG`, falling back to `fitzone.toml` in the working directory.
    /// A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()
                .map_err(|e| Error::Config(e.to_string()))?
                .join(CONFIG_FILE),
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("unable to open {}: {}", path.display(), e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.database.backend, Backend::Mongodb);
        assert_eq!(config.schedule.source, "schedule.json");
        assert_eq!(config.maintenance.cleanup_after_days, 30);
        assert_eq!(config.server.user_header, "X-Fitzone-User");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [database]
            backend = "memory"

            [logging]
            level = "debug"
            disabled = ["Feed"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, Backend::Memory);
        assert_eq!(config.database.name, "fitzone");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.disabled, vec!["Feed".to_string()]);
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        let err = Config::from_toml("[database]\nbackend = \"redis\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
