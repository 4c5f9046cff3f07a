//! Exporter config loader.
//!
//! Configuration normally comes from environment variables. Setting
//! `APEX_EXPORTER_CONFIG` switches to a strict YAML file instead.

pub mod schema;

use std::collections::HashMap;
use std::fs;

use apexporter_core::error::{ExporterError, Result};

pub use schema::{ExporterConfig, ExporterSection, RawConfig};

/// Env var naming a YAML config file.
pub const CONFIG_PATH_VAR: &str = "APEX_EXPORTER_CONFIG";

/// Load from `APEX_EXPORTER_CONFIG` if set, otherwise from the environment.
pub fn load() -> Result<ExporterConfig> {
    match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) if !path.trim().is_empty() => load_from_file(&path),
        _ => load_from_env(),
    }
}

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let raw: RawConfig = serde_yaml::from_str(s)
        .map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))?;
    raw.into_config()
}

pub fn load_from_env() -> Result<ExporterConfig> {
    load_from_vars(std::env::vars())
}

/// Build a config from `(name, value)` pairs. Empty values count as unset.
pub fn load_from_vars<I>(vars: I) -> Result<ExporterConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut vars: HashMap<String, String> = vars
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect();

    // Report identity and key problems before any exporter-section parse error.
    schema::validate_credentials(
        vars.get("API_KEY").map(String::as_str).unwrap_or_default(),
        &vars.get("USER_ID").cloned(),
        &vars.get("PLAYER_NAME").cloned(),
    )?;

    let mut exporter = ExporterSection::default();
    if let Some(listen) = vars.remove("LISTEN_ADDR") {
        exporter.listen = listen;
    }
    if let Some(secs) = vars.remove("POLL_INTERVAL_SECS") {
        exporter.poll_interval_secs = secs.trim().parse().map_err(|_| {
            ExporterError::Config(format!("POLL_INTERVAL_SECS {secs:?} is not a number"))
        })?;
    }
    if let Some(url) = vars.remove("API_BASE_URL") {
        exporter.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(flag) = vars.remove("EXIT_ON_POLL_ERROR") {
        exporter.exit_on_poll_error = parse_bool("EXIT_ON_POLL_ERROR", &flag)?;
    }

    RawConfig {
        api_key: vars.remove("API_KEY"),
        uid: vars.remove("USER_ID"),
        player_name: vars.remove("PLAYER_NAME"),
        platform: vars.remove("PLATFORM"),
        exporter,
    }
    .into_config()
}

fn parse_bool(name: &str, v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ExporterError::Config(format!("{name} {v:?} is not a boolean"))),
    }
}
