use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::adapters::{AdapterDefaults, parse_time};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub calendar: CalendarConfig,
    pub notifications: NotificationsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarConfig {
    pub project_default_time: String,
    pub task_default_time: String,
    pub first_day_of_week: String,
    pub default_view: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsConfig {
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl CalendarConfig {
    pub fn adapter_defaults(&self) -> Result<AdapterDefaults, ConfigError> {
        let project_time = parse_time(&self.project_default_time).ok_or_else(|| ConfigError::InvalidValue {
            field: "calendar.project_default_time",
            value: self.project_default_time.clone(),
        })?;
        let task_time = parse_time(&self.task_default_time).ok_or_else(|| ConfigError::InvalidValue {
            field: "calendar.task_default_time",
            value: self.task_default_time.clone(),
        })?;

        Ok(AdapterDefaults {
            project_time,
            task_time,
        })
    }

    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        self.first_day_of_week
            .parse::<Weekday>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "calendar.first_day_of_week",
                value: self.first_day_of_week.clone(),
            })
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nexapro")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                timeout_seconds: 30,
            },
            calendar: CalendarConfig {
                project_default_time: "09:00".to_string(),
                task_default_time: "10:00".to_string(),
                first_day_of_week: "Monday".to_string(),
                default_view: "Month".to_string(),
            },
            notifications: NotificationsConfig {
                poll_interval_seconds: 30,
            },
            storage: StorageConfig {
                path: Self::config_dir().join("store.db"),
            },
        }
    }
}
