//! Runtime configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use canvas::engine::CanvasConfig;

use crate::error::AppError;

pub const DEFAULT_GRID_SIZE: f64 = 50.0;
pub const DEFAULT_ZOOM_OUT_EXTENT: f64 = 4000.0;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub database_url: String,
    pub grid_size: f64,
    pub zoom_out_extent: f64,
    pub log_filter: String,
}

impl Config {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `METI_DATA_DIR`: default `$HOME/.local/share/meti`, or `./data`
    ///   when `METI_DEBUG` is set
    /// - `METI_DATABASE_URL`: default `sqlite://<data_dir>/meti.db?mode=rwc`
    /// - `METI_GRID_SIZE`: default 50
    /// - `METI_ZOOM_OUT_EXTENT`: default 4000
    /// - `METI_LOG`: tracing filter, default `info`
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse or is
    /// not positive.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_dir = lookup("METI_DATA_DIR")
            .filter(|v| !v.is_empty())
            .map_or_else(|| default_data_dir(&lookup), PathBuf::from);
        let database_url = lookup("METI_DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("sqlite://{}?mode=rwc", data_dir.join("meti.db").display()));
        let grid_size = parse_positive(&lookup, "METI_GRID_SIZE", DEFAULT_GRID_SIZE)?;
        let zoom_out_extent = parse_positive(&lookup, "METI_ZOOM_OUT_EXTENT", DEFAULT_ZOOM_OUT_EXTENT)?;
        let log_filter = lookup("METI_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self { data_dir, database_url, grid_size, zoom_out_extent, log_filter })
    }

    /// Canvas tunables derived from this config; everything else keeps its default.
    #[must_use]
    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig { grid_size: self.grid_size, zoom_out_extent: self.zoom_out_extent, ..CanvasConfig::default() }
    }
}

fn default_data_dir(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if lookup("METI_DEBUG").is_some() {
        return PathBuf::from("data");
    }
    match lookup("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".local").join("share").join("meti"),
        _ => PathBuf::from("data"),
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> Result<f64, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(AppError::Config(format!("{key} must be a positive number, got {raw:?}"))),
    }
}
