use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use clap::Args;
use paging_core::{ListConfig, LoadMorePolicy, MissingSourcePolicy};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "list_demo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub page_size: u32,
    pub debounce_ms: u64,
    pub catalog_size: usize,
    pub latency_ms: u64,
    pub fail_every: Option<u32>,
    pub search_enabled: bool,
    pub strict_load_more: bool,
    pub surface_missing_source: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce_ms: 300,
            catalog_size: 95,
            latency_ms: 150,
            fail_every: None,
            search_enabled: true,
            strict_load_more: true,
            surface_missing_source: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    page_size: Option<u32>,
    debounce_ms: Option<u64>,
    catalog_size: Option<usize>,
    latency_ms: Option<u64>,
    fail_every: Option<u32>,
    search_enabled: Option<bool>,
    strict_load_more: Option<bool>,
    surface_missing_source: Option<bool>,
}

/// Command-line layer, applied after the file and the environment.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOverrides {
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long)]
    pub debounce_ms: Option<u64>,
    #[arg(long)]
    pub catalog_size: Option<usize>,
    #[arg(long)]
    pub latency_ms: Option<u64>,
    /// Make every Nth catalog request fail; 0 disables.
    #[arg(long)]
    pub fail_every: Option<u32>,
    /// Leave the search source unset.
    #[arg(long)]
    pub no_search: bool,
    /// Keep paging after a short page; only an empty page ends the list.
    #[arg(long)]
    pub lenient_load_more: bool,
    /// Report a fetch with no configured source as an error.
    #[arg(long)]
    pub surface_missing_source: bool,
}

impl Settings {
    pub fn list_config(&self) -> ListConfig {
        let load_more = if self.strict_load_more {
            LoadMorePolicy::FullPage
        } else {
            LoadMorePolicy::AnyFetch
        };
        let missing_source = if self.surface_missing_source {
            MissingSourcePolicy::Surface
        } else {
            MissingSourcePolicy::Ignore
        };

        ListConfig::default()
            .with_page_size(self.page_size)
            .with_debounce(Duration::from_millis(self.debounce_ms))
            .with_load_more(load_more)
            .with_missing_source(missing_source)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.page_size {
            self.page_size = v;
        }
        if let Some(v) = file_cfg.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = file_cfg.catalog_size {
            self.catalog_size = v;
        }
        if let Some(v) = file_cfg.latency_ms {
            self.latency_ms = v;
        }
        if file_cfg.fail_every.is_some() {
            self.fail_every = file_cfg.fail_every;
        }
        if let Some(v) = file_cfg.search_enabled {
            self.search_enabled = v;
        }
        if let Some(v) = file_cfg.strict_load_more {
            self.strict_load_more = v;
        }
        if let Some(v) = file_cfg.surface_missing_source {
            self.surface_missing_source = v;
        }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = env("APP__PAGE_SIZE") {
            self.page_size = parse_var("APP__PAGE_SIZE", &v)?;
        }
        if let Some(v) = env("APP__DEBOUNCE_MS") {
            self.debounce_ms = parse_var("APP__DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = env("APP__CATALOG_SIZE") {
            self.catalog_size = parse_var("APP__CATALOG_SIZE", &v)?;
        }
        if let Some(v) = env("APP__LATENCY_MS") {
            self.latency_ms = parse_var("APP__LATENCY_MS", &v)?;
        }
        if let Some(v) = env("APP__FAIL_EVERY") {
            self.fail_every = match v.trim() {
                "" | "0" => None,
                raw => Some(parse_var("APP__FAIL_EVERY", raw)?),
            };
        }
        if let Some(v) = env("APP__SEARCH_ENABLED") {
            self.search_enabled = parse_var("APP__SEARCH_ENABLED", &v)?;
        }
        if let Some(v) = env("APP__STRICT_LOAD_MORE") {
            self.strict_load_more = parse_var("APP__STRICT_LOAD_MORE", &v)?;
        }
        if let Some(v) = env("APP__SURFACE_MISSING_SOURCE") {
            self.surface_missing_source = parse_var("APP__SURFACE_MISSING_SOURCE", &v)?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(v) = overrides.page_size {
            self.page_size = v;
        }
        if let Some(v) = overrides.debounce_ms {
            self.debounce_ms = v;
        }
        if let Some(v) = overrides.catalog_size {
            self.catalog_size = v;
        }
        if let Some(v) = overrides.latency_ms {
            self.latency_ms = v;
        }
        if let Some(v) = overrides.fail_every {
            self.fail_every = (v > 0).then_some(v);
        }
        if overrides.no_search {
            self.search_enabled = false;
        }
        if overrides.lenient_load_more {
            self.strict_load_more = false;
        }
        if overrides.surface_missing_source {
            self.surface_missing_source = true;
        }
    }
}

fn parse_var<T>(name: &str, raw: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("invalid value '{raw}' for {name}"))
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(path, |name| std::env::var(name).ok())
}

pub fn load_settings_with_env(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg = toml::from_str::<FileSettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        settings.apply_file(file_cfg);
    }

    settings.apply_env(env)?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
