use anyhow::{Context, Result};
use cashflow_ingest::parsers::boa_credit::DEFAULT_FALLBACK_YEAR;
use cashflow_ingest::{IngestOptions, StatementFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::default_config_path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
    pub parsers: ParsersSection,
    pub institutions: InstitutionsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Curated transaction dataset (relative paths resolve against the working directory)
    pub dataset: PathBuf,
    /// Directory for monthly_rollup.csv and monthly_plot.png
    pub reports: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/curated/transactions.csv"),
            reports: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsersSection {
    /// Year for boa_pdf statements whose file name and header carry none
    pub boa_fallback_year: i32,
}

impl Default for ParsersSection {
    fn default() -> Self {
        Self {
            boa_fallback_year: DEFAULT_FALLBACK_YEAR,
        }
    }
}

/// Institution label overrides per statement kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionsSection {
    pub boh_pdf: Option<String>,
    pub boa_pdf: Option<String>,
    pub discover_csv: Option<String>,
    pub generic_csv: Option<String>,
}

impl Config {
    pub fn institution_for(&self, format: StatementFormat) -> String {
        let configured = match format {
            StatementFormat::BohPdf => &self.institutions.boh_pdf,
            StatementFormat::BoaPdf => &self.institutions.boa_pdf,
            StatementFormat::DiscoverCsv => &self.institutions.discover_csv,
            StatementFormat::GenericCsv => &self.institutions.generic_csv,
        };
        configured
            .clone()
            .unwrap_or_else(|| format.default_institution().to_string())
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            boa_fallback_year: self.parsers.boa_fallback_year,
        }
    }
}

/// `--config` if given, else the default location.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(&Config::default(), path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
