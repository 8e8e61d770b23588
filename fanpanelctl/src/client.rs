//! HTTP client for the fan controller RPC endpoints.

use anyhow::{Context, Result};
use fanpanel_core::api::{self, CURVES_PATH, STATUS_PATH};
use fanpanel_core::{CurveSet, StatusSnapshot};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Everything the panel needs before it can be shown
#[derive(Debug, Clone, PartialEq)]
pub struct InitialLoad {
    pub status: StatusSnapshot,
    pub curves: CurveSet,
}

/// HTTP client for the device's `getStatus` / `getAllCurves` calls.
///
/// # Retry Logic
///
/// Requests that fail before a response arrives (connection refused, timeout)
/// are retried with a linearly growing delay: `retry_delay * (attempt + 1)`.
/// HTTP error statuses and error envelopes are returned immediately.
///
/// # Examples
///
/// ```no_run
/// use fanpanelctl::client::FanPanelClient;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = FanPanelClient::with_config(
///     "http://192.168.1.1:8080".to_string(),
///     10,  // timeout in seconds
///     3,   // max retries
///     Duration::from_millis(500),  // initial retry delay
/// )?;
///
/// let status = client.get_status().await?;
/// println!("Fan: {} RPM", status.fan_rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FanPanelClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl FanPanelClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `server_url` - Base URL of the device (e.g., "http://192.168.1.1:8080")
    /// * `timeout_secs` - Request timeout in seconds
    /// * `max_retries` - Maximum number of retry attempts for failed requests
    /// * `retry_delay` - Initial delay between retries
    pub fn with_config(
        server_url: String,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("fanpanelctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_url(&server_url),
            max_retries,
            retry_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process an HTTP response and extract the envelope data.
    ///
    /// An empty body or `null` data yields `T::default()`.
    async fn handle_response<T>(response: Response, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            let error_msg = match status {
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::BAD_REQUEST => format!("Bad request to {}: {}", endpoint, text),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Server error at {}: {}", endpoint, text)
                }
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(anyhow::anyhow!(error_msg));
        }

        if text.trim().is_empty() {
            debug!("Empty body from {}", endpoint);
            return Ok(T::default());
        }

        let api_response: api::ApiResponse<Option<T>> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        match api_response {
            api::ApiResponse::Success { data } => Ok(data.unwrap_or_default()),
            api::ApiResponse::Error { error } => {
                Err(anyhow::anyhow!("Server error at {}: {}", endpoint, error))
            }
        }
    }

    /// Execute a GET with automatic retry on connection-level failures.
    async fn get_with_retry<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        let endpoint = path.trim_start_matches(api::API_PREFIX);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    return Self::handle_response(response, endpoint).await;
                }
                Err(e) => {
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    last_error = Some(e);

                    if attempt < self.max_retries && should_retry {
                        let delay = self.retry_delay * (attempt + 1);
                        debug!(
                            "Request to {} failed (attempt {}), retrying in {:?}",
                            endpoint,
                            attempt + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    } else {
                        break;
                    }
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        warn!("Giving up on {} after {} attempts", endpoint, self.max_retries + 1);
        Err(anyhow::anyhow!(
            "Failed to reach {} after {} attempts: {}",
            endpoint,
            self.max_retries + 1,
            reason
        ))
    }

    /// `getStatus`: fan and temperature snapshot.
    pub async fn get_status(&self) -> Result<StatusSnapshot> {
        self.get_with_retry(STATUS_PATH).await
    }

    /// `getAllCurves`: every stored preset curve, in device order.
    pub async fn get_all_curves(&self) -> Result<CurveSet> {
        self.get_with_retry(CURVES_PATH).await
    }

    /// Fetch status and curves concurrently; fails if either call fails.
    pub async fn load_initial(&self) -> Result<InitialLoad> {
        let (status, curves) = tokio::try_join!(self.get_status(), self.get_all_curves())?;
        debug!("Initial load: {} curves", curves.len());
        Ok(InitialLoad { status, curves })
    }

    /// Check whether the server answers at all.
    ///
    /// Uses a short timeout (3 seconds) and never returns an error for an
    /// unreachable server.
    pub async fn ping(&self) -> Result<bool> {
        let url = format!("{}{}", self.base_url, STATUS_PATH);

        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("Failed to create ping client")?;

        match client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_e) => Ok(false),
        }
    }
}
