use log::{info, warn};
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Where the key-value store lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    /// Ephemeral: everything is lost when the process exits.
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactLinks {
    pub facebook: String,
    pub telegram: String,
    pub email: String,
    pub phone: String,
}

/// Blog configuration, read from the `blog` table of Rocket.toml
/// (or `ROCKET_BLOG_*` environment variables).
///
/// Secrets and paths are never serialized, so the struct can be handed to
/// templates directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub site_name: String,
    /// Default author of new posts and copyright holder.
    pub owner: String,
    #[serde(skip_serializing)]
    pub storage: StorageBackend,
    #[serde(skip_serializing)]
    pub db_path: String,
    #[serde(skip_serializing)]
    pub default_password: String,
    #[serde(skip_serializing)]
    pub recovery_phrase: String,
    #[serde(skip_serializing)]
    pub password_cost: u32,
    pub contact: ContactLinks,
}

impl Default for BlogConfig {
    fn default() -> Self {
        BlogConfig {
            site_name: "Kolom".to_string(),
            owner: "Blog Owner".to_string(),
            storage: StorageBackend::Sqlite,
            db_path: "website/db/kolom.db".to_string(),
            default_password: "sir678543".to_string(),
            recovery_phrase: "Iam Saiful678".to_string(),
            password_cost: bcrypt::DEFAULT_COST,
            contact: ContactLinks::default(),
        }
    }
}

impl BlogConfig {
    /// Extract the `blog` table from a figment, falling back to defaults.
    pub fn from_figment(figment: &Figment) -> Self {
        match figment.extract_inner::<BlogConfig>("blog") {
            Ok(config) => {
                info!("Loaded blog config for \"{}\"", config.site_name);
                config
            }
            Err(e) => {
                warn!("No usable [blog] config ({}), using defaults", e);
                BlogConfig::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::from_figment(&rocket::Config::figment())
    }
}
