use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
    pub edamam: Option<EdamamCredentials>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdamamCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl EdamamCredentials {
    /// Read credentials through `var`, preferring the `NIBBLE_`-prefixed names.
    /// Both the id and the key must be present and non-empty.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |primary: &str, fallback: &str| {
            var(primary)
                .or_else(|| var(fallback))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Some(Self {
            app_id: read("NIBBLE_EDAMAM_APP_ID", "EDAMAM_APP_ID")?,
            app_key: read("NIBBLE_EDAMAM_APP_KEY", "EDAMAM_APP_KEY")?,
        })
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let proj_dirs =
            ProjectDirs::from("", "", "nibble").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = std::env::var_os("NIBBLE_DB_PATH")
            .map_or_else(|| data_dir.join("nibble.db"), PathBuf::from);

        let edamam = EdamamCredentials::from_vars(|name| std::env::var(name).ok());
        if edamam.is_none() {
            tracing::info!("Edamam credentials not set, lookups will use the built-in food table");
        }

        Ok(Config { db_path, edamam })
    }
}
