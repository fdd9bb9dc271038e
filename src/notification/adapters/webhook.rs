//! HTTP webhook dispatcher.
//!
//! Posts `{"text": "<message>"}` as JSON to the channel endpoint, the payload
//! accepted by incoming-webhook chat connectors.

use crate::notification::{
    domain::ChannelEndpoint,
    ports::{DispatchError, DispatchResult, MessageDispatcher},
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bound on a single webhook call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// [`MessageDispatcher`] posting to incoming webhooks over HTTP.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Creates a dispatcher whose calls are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(timeout: Duration) -> DispatchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::transport)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MessageDispatcher for WebhookDispatcher {
    async fn dispatch(&self, endpoint: &ChannelEndpoint, text: &str) -> DispatchResult<()> {
        let response = self
            .client
            .post(endpoint.url().clone())
            .json(&WebhookPayload { text })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DispatchError::Timeout
                } else {
                    DispatchError::transport(err)
                }
            })?;

        let status = response.status();
        debug!(endpoint = %endpoint, status = %status, "webhook response received");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        warn!(
            endpoint = %endpoint,
            status = %status,
            body = %truncated,
            "webhook rejected message"
        );
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body: truncated,
        })
    }
}
