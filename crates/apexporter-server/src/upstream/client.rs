use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use apexporter_core::error::{ExporterError, Result};
use apexporter_core::{MapSnapshot, Platform, PlayerIdentity, PlayerSnapshot};

use crate::config::ExporterConfig;
use crate::upstream::StatsSource;

const MAP_ROTATION: &str = "maprotation";
const BRIDGE: &str = "bridge";

/// Client for the Apex Legends stats API (api.mozambiquehe.re).
pub struct MozambiqueClient {
    http: reqwest::Client,
    base_url: String,
    identity: PlayerIdentity,
    platform: Platform,
}

impl MozambiqueClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        identity: PlayerIdentity,
        platform: Platform,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(api_key)
            .map_err(|_| ExporterError::Config("API_KEY is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("apexporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExporterError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
            platform,
        })
    }

    pub fn from_config(cfg: &ExporterConfig) -> Result<Self> {
        Self::new(
            &cfg.exporter.api_base_url,
            &cfg.api_key,
            cfg.identity()?,
            cfg.platform,
        )
    }

    async fn get_json(&self, endpoint: &'static str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "collecting");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ExporterError::Upstream(format!("{endpoint}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExporterError::UpstreamStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ExporterError::Upstream(format!("{endpoint}: {e}")))?;
        let v: Value = serde_json::from_slice(&body)?;

        // The API reports some failures as `{"Error": "..."}` with a 200.
        if let Some(msg) = v.get("Error") {
            let msg = msg.as_str().map(str::to_string).unwrap_or_else(|| msg.to_string());
            return Err(ExporterError::Upstream(format!("{endpoint}: {msg}")));
        }
        Ok(v)
    }
}

#[async_trait]
impl StatsSource for MozambiqueClient {
    async fn map_rotation(&self) -> Result<MapSnapshot> {
        let v = self.get_json(MAP_ROTATION, &[]).await?;
        MapSnapshot::from_json(&v)
    }

    async fn player_stats(&self) -> Result<PlayerSnapshot> {
        let (key, value) = self.identity.query_pair();
        let query = [(key, value), ("platform", self.platform.as_str())];
        let v = self.get_json(BRIDGE, &query).await?;
        PlayerSnapshot::from_json(&v)
    }
}
