use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod memory;
pub mod sqlite;

/// Key holding the default reader settings record.
pub const SETTINGS_KEY: &str = "blogSettings";
/// Key holding the full post list, newest first.
pub const POSTS_KEY: &str = "blogPosts";
/// Key holding the admin password hash.
pub const PASSWORD_KEY: &str = "adminPassword";

/// String-keyed persistence. Every value the blog keeps goes through here.
/// Implementations: `SqliteStore` (rusqlite/r2d2) and `MemoryStore`.
pub trait Store: Send + Sync {
    fn run_migrations(&self) -> Result<(), String>;

    fn kv_get(&self, key: &str) -> Option<String>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), String>;

    fn backend(&self) -> &str;
}

/// Read and decode a JSON value. Missing keys and malformed JSON both yield
/// `None`; the latter is logged so a corrupted store is noticed.
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = store.kv_get(key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Stored value for {} is malformed ({}), ignoring it", key, e);
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn Store, key: &str, value: &T) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.kv_set(key, &raw)
}
