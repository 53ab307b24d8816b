use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::Store;

/// In-process store. Nothing survives a restart.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn run_migrations(&self) -> Result<(), String> {
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Option<String> {
        let map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
