// File: src/config.rs
//
// Settings are read once at startup and handed to every component that needs
// them. Nothing reads the environment after this point.

use std::path::PathBuf;

use chrono_tz::Tz;
use tracing::debug;

use crate::Error;

pub const ENV_PREFIX: &str = "WORDLE_";

/// Spreadsheet written by the renderer.
pub const ARTIFACT_FILE_NAME: &str = "wordle_stats.xlsx";
/// Image expected next to the spreadsheet once rasterized.
pub const IMAGE_FILE_NAME: &str = "wordle_stats.png";

#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub guild_id: u64,
    pub channel_id: u64,
    /// Account id of the app that posts the daily results.
    pub app_id: u64,
    pub timezone: Tz,
    pub log_level: String,
    pub output_dir: PathBuf,
    pub soffice_binary: String,
}

impl Settings {
    /// Loads `.env` (if present) and then reads `WORDLE_*` variables.
    pub fn from_env() -> Result<Self, Error> {
        if dotenv::dotenv().is_err() {
            debug!("No .env file found; using process environment only");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; `key` is given without prefix.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                Error::Configuration(format!("missing required setting {ENV_PREFIX}{key}"))
            })
        };
        let require_id = |key: &str| -> Result<u64, Error> {
            let raw = require(key)?;
            match raw.parse::<u64>() {
                Ok(id) if id > 0 => Ok(id),
                _ => Err(Error::Configuration(format!(
                    "{ENV_PREFIX}{key} must be a non-zero numeric id, got '{raw}'"
                ))),
            }
        };

        let timezone_name = get("TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let timezone = timezone_name.parse::<Tz>().map_err(|_| {
            Error::Configuration(format!("unknown time zone '{timezone_name}'"))
        })?;

        Ok(Self {
            token: require("TOKEN")?,
            guild_id: require_id("GUILD_ID")?,
            channel_id: require_id("CHANNEL_ID")?,
            app_id: require_id("APP_ID")?,
            timezone,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            output_dir: get("OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            soffice_binary: get("SOFFICE").unwrap_or_else(|| "soffice".to_string()),
        })
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(ARTIFACT_FILE_NAME)
    }

    pub fn image_path(&self) -> PathBuf {
        self.output_dir.join(IMAGE_FILE_NAME)
    }
}
