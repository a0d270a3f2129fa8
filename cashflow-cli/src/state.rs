use anyhow::{Context, Result};
use std::path::PathBuf;

/// `$CASHFLOW_HOME`, else `~/.cashflow`.
pub fn cashflow_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("CASHFLOW_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cashflow"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(cashflow_home()?.join("config.toml"))
}
