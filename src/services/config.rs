//! User configuration (`~/.salesviz/config.json`)

use crate::types::{Result, SalesvizError};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_DIR: &str = ".salesviz";
pub const CONFIG_FILE: &str = "config.json";

fn default_group_names() -> BTreeMap<String, String> {
    [
        ("BOT", "Bột"),
        ("SET", "Set Trà"),
        ("THO", "Trà Hoa"),
        ("TTC", "Trà củ, quả sấy"),
        ("TMX", "Trà Mix"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV path or http(s) URL
    pub input: String,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Panels per row in small-multiples reports
    pub grid_columns: usize,
    pub delimiter: String,
    /// Group code -> full display name for panel titles
    pub group_names: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: "data/data.csv".into(),
            output_dir: PathBuf::from("charts"),
            width: 900,
            height: 600,
            grid_columns: 3,
            delimiter: ",".into(),
            group_names: default_group_names(),
        }
    }
}

impl Config {
    /// `~/.salesviz/config.json`, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path (must exist), else the default location
    /// when present, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SalesvizError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&content)
            .map_err(|e| SalesvizError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| SalesvizError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SalesvizError::Config("width and height must be positive".into()));
        }
        if self.grid_columns == 0 {
            return Err(SalesvizError::Config("grid_columns must be at least 1".into()));
        }
        self.delimiter_byte()?;
        Ok(())
    }

    /// The delimiter as a single ASCII byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(SalesvizError::Config(format!(
                "delimiter must be one ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    /// Full group name for a code, falling back to the code itself
    pub fn group_display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.group_names.get(code).map(String::as_str).unwrap_or(code)
    }
}
