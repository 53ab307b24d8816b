use rusqlite::{params, OptionalExtension};

use crate::db::DbPool;

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// One `kv` table, see `db::run_migrations`.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool(path)?;
        Ok(Self::new(pool))
    }
}

impl Store for SqliteStore {
    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool)
    }

    fn kv_get(&self, key: &str) -> Option<String> {
        let conn = self.pool.get().ok()?;
        conn.query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .ok()
        .flatten()
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn backend(&self) -> &str {
        "sqlite"
    }
}
