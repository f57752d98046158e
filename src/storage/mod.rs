pub mod config;
pub mod local_store;
pub mod settings;

pub use config::{Config, ConfigError};
pub use local_store::{LocalStore, StoreError};
pub use settings::{Settings, SettingsStore};
