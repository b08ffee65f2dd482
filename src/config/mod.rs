use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::errors::{Result, TrackerError};
use crate::utils::paths::{self, ensure_dir, write_atomic};

/// Display currency. Amounts are never converted; only the symbol changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "€")]
    Euro,
    #[serde(rename = "$")]
    Dollar,
    #[serde(rename = "£")]
    Pound,
    #[serde(rename = "¥")]
    Yen,
    #[serde(rename = "CHF")]
    Franc,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Euro,
        Currency::Dollar,
        Currency::Pound,
        Currency::Yen,
        Currency::Franc,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Euro => "€",
            Currency::Dollar => "$",
            Currency::Pound => "£",
            Currency::Yen => "¥",
            Currency::Franc => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Currency {
    type Err = TrackerError;

    /// Accepts the symbol or a common code (`eur`, `usd`, `gbp`, `jpy`, `chf`).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.to_ascii_lowercase().as_str() {
            "€" | "eur" => Currency::Euro,
            "$" | "usd" => Currency::Dollar,
            "£" | "gbp" => Currency::Pound,
            "¥" | "jpy" => Currency::Yen,
            "chf" => Currency::Franc,
            _ => {
                return Err(TrackerError::InvalidInput(format!(
                    "unsupported currency `{trimmed}`"
                )))
            }
        };
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

/// Loads and saves [`Settings`] as pretty JSON in the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        ensure_dir(base)?;
        Ok(Self {
            path: paths::settings_file_in(base),
        })
    }

    /// Missing file means defaults.
    pub fn load(&self) -> Result<Settings> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
