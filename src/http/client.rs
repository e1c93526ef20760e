use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::unwrap_jsonp;
use crate::config::HttpSettings;
use crate::error::{Error, Result};

/// Performs a single GET and parses the body.
///
/// No retries and no caching: every failure propagates to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url`; when `jsonp` is set the body is unwrapped before parsing.
    async fn get(&self, url: &str, jsonp: bool) -> Result<Value>;
}

/// [`HttpClient`] backed by reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, jsonp: bool) -> Result<Value> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("GET {} failed with status {}", url, status);
            return Err(Error::UpstreamStatus {
                service: "http",
                status: status.to_string(),
            });
        }

        let body = response.text().await?;
        let json = if jsonp { unwrap_jsonp(&body)? } else { body.as_str() };
        Ok(serde_json::from_str(json)?)
    }
}
