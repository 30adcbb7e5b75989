//! HTTP transport for the forum's `/do/...` endpoints.
//!
//! Requests are form-encoded POSTs (an empty form for every current
//! action); the body is decoded as an `ActionResult`. Cookies are kept so a
//! logged-in session carries across requests.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::core::action::ActionRequest;
use crate::core::outcome::ActionResult;
use crate::transport::{Transport, TransportError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// A client that keeps cookies between requests. Falls back to a plain
/// client, which cannot carry a login session, if the builder fails.
fn session_client() -> reqwest::Client {
    match reqwest::Client::builder().cookie_store(true).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Cookie-aware HTTP client unavailable, session cookies will not be sent: {}", e);
            reqwest::Client::new()
        }
    }
}

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: Option<String>) -> Self {
        let env_url = std::env::var("MODPANEL_BASE_URL").ok();
        let final_url = base_url
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url: final_url.trim_end_matches('/').to_string(),
            client: session_client(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn post(&self, request: &ActionRequest) -> Result<ActionResult, TransportError> {
        let url = self.url(&request.path);
        info!("POST {} ({} form fields)", url, request.payload.len());

        let response = self
            .client
            .post(&url)
            .form(&request.payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("API error: {} - {}", status, err_body);
            return Err(TransportError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        serde_json::from_str::<ActionResult>(&body).map_err(|e| {
            warn!("Undecodable result from {}: {}", url, e);
            TransportError::Decode(e.to_string())
        })
    }
}
