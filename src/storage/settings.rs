use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::app::ViewType;
use crate::storage::local_store::{LocalStore, StoreError, keys};
use crate::sync::listeners::{Listeners, Subscription};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub language: String,
    pub calendar_view: ViewType,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "en".to_string(),
            calendar_view: ViewType::Month,
            email_notifications: true,
            push_notifications: true,
            compact_mode: false,
        }
    }
}

/// Process-wide UI preferences.
///
/// Loaded once from the local store (falling back to defaults when nothing,
/// or nothing readable, is persisted). Every `set` persists first, then
/// notifies subscribers in the same call, so writers and readers in the same
/// process always agree.
pub struct SettingsStore {
    store: Arc<LocalStore>,
    current: RwLock<Settings>,
    listeners: Listeners<Settings>,
}

impl SettingsStore {
    pub fn load(store: Arc<LocalStore>) -> Self {
        let current = match store.get::<Settings>(keys::SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings: {}", e);
                Settings::default()
            }
        };

        Self {
            store,
            current: RwLock::new(current),
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> Settings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, settings: Settings) -> Result<(), StoreError> {
        self.update(|current| *current = settings).map(|_| ())
    }

    /// Read, change and persist happen under one write lock. Subscribers are
    /// notified after it is released.
    pub fn update<F>(&self, change: F) -> Result<Settings, StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let settings = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let mut settings = current.clone();
            change(&mut settings);
            self.store.set(keys::SETTINGS, &settings)?;
            *current = settings.clone();
            settings
        };
        tracing::info!("Settings updated");
        self.listeners.notify(&settings);
        Ok(settings)
    }

    pub fn reset(&self) -> Result<(), StoreError> {
        self.set(Settings::default())
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        self.listeners.add(callback)
    }
}
