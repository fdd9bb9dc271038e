//! Outbound message dispatch port.

use crate::notification::domain::ChannelEndpoint;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Delivers rendered message text to a chat endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Posts `text` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the endpoint rejects the message, the
    /// call times out or the transport fails.
    async fn dispatch(&self, endpoint: &ChannelEndpoint, text: &str) -> DispatchResult<()>;
}

/// Errors returned by dispatchers.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The endpoint answered with a non-success status.
    #[error("endpoint rejected message with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The endpoint did not answer within the dispatch timeout.
    #[error("dispatch timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("dispatch transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
