use anyhow::{bail, Context, Result};

use crate::data::export::ExportFormat;

const PREVIEW_ROWS_KEY: &str = "DATA_SWEEPER_PREVIEW_ROWS";
const DEFAULT_FORMAT_KEY: &str = "DATA_SWEEPER_DEFAULT_FORMAT";
const WINDOW_WIDTH_KEY: &str = "DATA_SWEEPER_WINDOW_WIDTH";
const WINDOW_HEIGHT_KEY: &str = "DATA_SWEEPER_WINDOW_HEIGHT";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Rows shown in each file's preview grid.
    pub preview_rows: usize,
    /// Target format preselected for new uploads.
    pub default_format: ExportFormat,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            default_format: ExportFormat::Csv,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Read the config from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(PREVIEW_ROWS_KEY) {
            let rows: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{PREVIEW_ROWS_KEY}='{raw}'"))?;
            if rows == 0 {
                bail!("{PREVIEW_ROWS_KEY} must be at least 1");
            }
            config.preview_rows = rows;
        }
        if let Some(raw) = lookup(DEFAULT_FORMAT_KEY) {
            config.default_format = raw
                .parse()
                .with_context(|| format!("{DEFAULT_FORMAT_KEY}='{raw}'"))?;
        }
        if let Some(raw) = lookup(WINDOW_WIDTH_KEY) {
            config.window_size[0] = parse_dimension(WINDOW_WIDTH_KEY, &raw)?;
        }
        if let Some(raw) = lookup(WINDOW_HEIGHT_KEY) {
            config.window_size[1] = parse_dimension(WINDOW_HEIGHT_KEY, &raw)?;
        }
        Ok(config)
    }
}

fn parse_dimension(key: &str, raw: &str) -> Result<f32> {
    let value: f32 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key}='{raw}'"))?;
    if !(value.is_finite() && value >= 100.0) {
        bail!("{key} must be at least 100 pixels");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (PREVIEW_ROWS_KEY, "10"),
            (DEFAULT_FORMAT_KEY, "excel"),
            (WINDOW_WIDTH_KEY, "900"),
        ]))
        .unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.default_format, ExportFormat::Excel);
        assert_eq!(config.window_size, [900.0, 800.0]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[(PREVIEW_ROWS_KEY, "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(PREVIEW_ROWS_KEY, "many")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(DEFAULT_FORMAT_KEY, "json")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(WINDOW_HEIGHT_KEY, "20")])).is_err());
    }
}
