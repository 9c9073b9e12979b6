use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_grindguard_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub judge: JudgeSection,
    /// IANA timezone for "today" and the mission seed.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Default curated sheet CSV, overridable per command with --sheet.
    pub sheet: Option<String>,
    /// Default enrichment metadata CSV.
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeSection {
    pub username: Option<String>,
    pub base_url: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge: JudgeSection {
                username: None,
                base_url: crate::judge::DEFAULT_BASE_URL.to_string(),
            },
            timezone: default_timezone(),
            sheet: None,
            metadata: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_grindguard_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

impl Config {
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
