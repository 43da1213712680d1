//! localStorage-backed settings store.

use lateral_core::{LateralError, Result, Settings, SettingsStore};
use web_sys as web;

const STORAGE_KEY: &str = "lateral.settings";

#[derive(Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web::Storage> {
        web::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| LateralError::store("localStorage unavailable"))
    }
}

impl SettingsStore for LocalStore {
    fn load(&self) -> Result<Option<Settings>> {
        let raw = self
            .storage()?
            .get_item(STORAGE_KEY)
            .map_err(|e| LateralError::store(format!("{e:?}")))?;
        // Corrupt JSON degrades to defaults inside from_json.
        Ok(raw.map(|json| Settings::from_json(&json)))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.storage()?
            .set_item(STORAGE_KEY, &settings.to_json())
            .map_err(|e| LateralError::store(format!("{e:?}")))
    }
}
