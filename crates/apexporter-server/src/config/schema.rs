use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use apexporter_core::error::{ExporterError, Result};
use apexporter_core::{Platform, PlayerIdentity};

/// Validated exporter configuration.
pub struct ExporterConfig {
    pub api_key: String,
    pub uid: Option<String>,
    pub player_name: Option<String>,
    pub platform: Platform,
    pub exporter: ExporterSection,
}

/// Configuration as written, before validation. Every field is optional so
/// file and env sources report problems in the same order.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default)]
    pub player_name: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub exporter: ExporterSection,
}

impl RawConfig {
    /// Identity first, then the API key, then platform, then the exporter section.
    pub fn into_config(self) -> Result<ExporterConfig> {
        let api_key = self.api_key.unwrap_or_default();
        validate_credentials(&api_key, &self.uid, &self.player_name)?;

        let platform: Platform = non_empty(&self.platform)
            .ok_or_else(|| ExporterError::Config("PLATFORM not set".into()))?
            .parse()?;

        let cfg = ExporterConfig {
            api_key,
            uid: self.uid,
            player_name: self.player_name,
            platform,
            exporter: self.exporter,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        validate_credentials(&self.api_key, &self.uid, &self.player_name)?;
        self.exporter.validate()?;

        Ok(())
    }

    /// The configured player. Only meaningful after `validate`.
    pub fn identity(&self) -> Result<PlayerIdentity> {
        match (non_empty(&self.uid), non_empty(&self.player_name)) {
            (Some(uid), None) => Ok(PlayerIdentity::Uid(uid.to_string())),
            (None, Some(name)) => Ok(PlayerIdentity::Name(name.to_string())),
            _ => Err(ExporterError::Config(
                "exactly one of USER_ID or PLAYER_NAME must be set".into(),
            )),
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("api_key", &"<redacted>")
            .field("uid", &self.uid)
            .field("player_name", &self.player_name)
            .field("platform", &self.platform)
            .field("exporter", &self.exporter)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_exit_on_poll_error")]
    pub exit_on_poll_error: bool,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            poll_interval_secs: default_poll_interval_secs(),
            api_base_url: default_api_base_url(),
            exit_on_poll_error: default_exit_on_poll_error(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=3600).contains(&self.poll_interval_secs) {
            return Err(ExporterError::Config(
                "exporter.poll_interval_secs must be between 1 and 3600".into(),
            ));
        }
        let url = self.api_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ExporterError::Config(
                "exporter.api_base_url must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ExporterError::Config(format!(
                "exporter.listen {:?} is not a socket address: {e}",
                self.listen
            ))
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Identity and key checks, in the order operators see them reported.
pub(crate) fn validate_credentials(
    api_key: &str,
    uid: &Option<String>,
    player_name: &Option<String>,
) -> Result<()> {
    match (non_empty(uid), non_empty(player_name)) {
        (None, None) => {
            return Err(ExporterError::Config(
                "either USER_ID or PLAYER_NAME must be set".into(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(ExporterError::Config(
                "both USER_ID and PLAYER_NAME cannot be set".into(),
            ))
        }
        _ => {}
    }
    if api_key.trim().is_empty() {
        return Err(ExporterError::Config("API_KEY not set".into()));
    }
    Ok(())
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
pub(crate) fn default_poll_interval_secs() -> u64 {
    15
}
pub(crate) fn default_api_base_url() -> String {
    "https://api.mozambiquehe.re".into()
}
pub(crate) fn default_exit_on_poll_error() -> bool {
    true
}
