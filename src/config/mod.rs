use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::account::DisplayCurrency,
    errors::LedgerError,
    report::{RangeMode, ReportTab},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    /// Symbol from the display currency table used for account totals.
    pub display_currency: String,
    #[serde(default)]
    pub default_tab: ReportTab,
    #[serde(default)]
    pub default_range: RangeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_at: Option<NaiveDateTime>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            display_currency: DisplayCurrency::default().symbol.into(),
            default_tab: ReportTab::default(),
            default_range: RangeMode::default(),
            last_opened_at: None,
        }
    }
}

impl Config {
    /// Resolved display currency, falling back to the table's first entry.
    pub fn currency(&self) -> DisplayCurrency {
        DisplayCurrency::find(&self.display_currency).unwrap_or_default()
    }

    /// Applies a `key value` pair as typed on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        match key {
            "locale" => self.locale = value.trim().to_string(),
            "currency" | "display_currency" => {
                let currency = DisplayCurrency::find(value).ok_or_else(|| {
                    LedgerError::Validation(format!("unknown display currency `{value}`"))
                })?;
                self.display_currency = currency.symbol.to_string();
            }
            "tab" | "default_tab" => {
                self.default_tab = value.parse().map_err(LedgerError::Validation)?;
            }
            "range" | "default_range" => {
                self.default_range = value.parse().map_err(LedgerError::Validation)?;
            }
            other => {
                return Err(LedgerError::Validation(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Loads the stored configuration. A missing file yields defaults; an
    /// unreadable one is logged and also yields defaults.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        match self.read() {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "configuration unreadable; using defaults");
                Config::default()
            }
        }
    }

    fn read(&self) -> Result<Config, LedgerError> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
