use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_paylens_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ocr: OcrSection,
    pub scan: ScanSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSection {
    pub model: String,
    pub base_url: String,
    /// Instruction sent to the extraction service with each image.
    pub instruction: String,
}

/// Constant annotations attached to calendar-mode records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    pub category: String,
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr: OcrSection {
                model: paylens_ocr::DEFAULT_MODEL.to_string(),
                base_url: paylens_ocr::DEFAULT_BASE_URL.to_string(),
                instruction: paylens_ocr::DEFAULT_INSTRUCTION.to_string(),
            },
            scan: ScanSection {
                category: "Google Pay".to_string(),
                description: "payment successful".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_paylens_home()?.join("config.toml"))
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

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
