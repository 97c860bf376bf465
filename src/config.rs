use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub yandex: YandexConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Empty list means the bot answers everyone.
    #[serde(default)]
    pub allowed_user_ids: Vec<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YandexConfig {
    /// OAuth application id, shown to users in the authorize link.
    pub oauth_client_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Folder on the user's Disk that uploads default to; interpolated
    /// into the help text.
    #[serde(default = "default_upload_folder")]
    pub default_upload_folder: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://cloud-api.yandex.net/v1/disk".to_string()
}

fn default_upload_folder() -> String {
    "Telegram Bot".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("diskbot.db")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
