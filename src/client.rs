//! The Zotero API client.

use crate::backoff::Backoff;
use crate::config::ZoteroConfig;
use crate::error::{Result, ZoteroError};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Zotero API version sent with every request.
const API_VERSION: &str = "3";

const USER_AGENT: &str = concat!("zotero-mcp/", env!("CARGO_PKG_VERSION"));

/// Async client for the Zotero Web API or the local desktop API.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> zotero_mcp::error::Result<()> {
/// use zotero_mcp::{SearchParams, ZoteroClient};
///
/// let client = ZoteroClient::from_env()?;
/// let items = client.search(&SearchParams::new("attention")).await?;
/// for item in &items {
///     println!("{} ({})", item.key, item.item_type());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ZoteroClient {
    pub(crate) http: Client,
    pub(crate) config: ZoteroConfig,
    pub(crate) backoff: Backoff,
}

impl ZoteroClient {
    /// Create a new client for the configured library.
    pub fn new(config: ZoteroConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            config,
            backoff: Backoff::new(),
        }
    }

    /// Create a client from `ZOTERO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ZoteroConfig::from_env()?))
    }

    /// The library this client talks to.
    pub fn config(&self) -> &ZoteroConfig {
        &self.config
    }

    /// GET a path inside the library.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let url = self.config.library_url(path);
        tracing::debug!(%url, ?params, "GET");
        let request = self.http.get(&url).query(params);
        self.send(request).await
    }

    /// PATCH an object with a JSON body, conditional on its last known version.
    pub(crate) async fn patch_json(
        &self,
        path: &str,
        version: u64,
        body: &serde_json::Value,
    ) -> Result<String> {
        let url = self.config.library_url(path);
        tracing::debug!(%url, version, "PATCH");
        let request = self
            .http
            .patch(&url)
            .header("If-Unmodified-Since-Version", version.to_string())
            .json(body);

        match self.send(request).await {
            Err(ZoteroError::Api { status: 412, .. }) => {
                Err(ZoteroError::PreconditionFailed { version })
            }
            other => other,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        self.backoff.wait().await;

        let mut request = request.header("Zotero-API-Version", API_VERSION);
        if let Some(key) = &self.config.api_key {
            request = request.header("Zotero-API-Key", key);
        }

        let response = request.send().await?;

        self.backoff.update_from_headers(response.headers()).await;
        handle_response(response).await
    }
}

/// Handle the HTTP response, mapping status codes to errors.
async fn handle_response(response: reqwest::Response) -> Result<String> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response.text().await?),
        401 | 403 => Err(ZoteroError::AuthRequired),
        404 => Err(ZoteroError::NotFound("Resource not found".to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(ZoteroError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, body = %body, "Zotero API error");
            Err(ZoteroError::Api {
                status,
                message: body,
            })
        }
    }
}
