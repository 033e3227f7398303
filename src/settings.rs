#![cfg(feature = "std")]
//! Settings collaborator: where the chosen difficulty comes from.
//!
//! The core never persists anything. A UI layer plugs its own store in
//! behind [`SettingsStore`]; [`MemorySettings`] serves tests and the CLI.

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;

use crate::ai::Difficulty;

/// Key under which the difficulty string is stored.
pub const DIFFICULTY_KEY: &str = "difficulty";

#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the stored difficulty, falling back to the default when the
/// value is missing, unreadable or unknown.
pub async fn load_difficulty<S: SettingsStore + ?Sized>(store: &S) -> Difficulty {
    match store.get(DIFFICULTY_KEY).await {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            warn!("ignoring stored difficulty {:?}: {}", raw, e);
            Difficulty::default()
        }),
        Ok(None) => Difficulty::default(),
        Err(e) => {
            warn!("could not read difficulty setting: {}", e);
            Difficulty::default()
        }
    }
}
