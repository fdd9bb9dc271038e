//! In-memory dispatcher that records messages instead of sending them.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::notification::{
    domain::ChannelEndpoint,
    ports::{DispatchError, DispatchResult, MessageDispatcher},
};

/// One message handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    /// Target endpoint.
    pub endpoint: ChannelEndpoint,
    /// Rendered message text.
    pub text: String,
}

#[derive(Debug, Default)]
struct RecorderState {
    delivered: Vec<RecordedPost>,
    attempts: usize,
    scripted: VecDeque<DispatchResult<()>>,
}

/// Thread-safe recording dispatcher for tests and dry runs.
///
/// Outcomes queued with [`RecordingDispatcher::push_outcome`] are consumed
/// one per attempt; once the queue is empty every attempt succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next unscripted attempt.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] when the internal lock is poisoned.
    pub fn push_outcome(&self, outcome: DispatchResult<()>) -> DispatchResult<()> {
        self.lock()?.scripted.push_back(outcome);
        Ok(())
    }

    /// Returns successfully delivered messages in order.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] when the internal lock is poisoned.
    pub fn delivered(&self) -> DispatchResult<Vec<RecordedPost>> {
        Ok(self.lock()?.delivered.clone())
    }

    /// Returns the number of dispatch attempts, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Transport`] when the internal lock is poisoned.
    pub fn attempts(&self) -> DispatchResult<usize> {
        Ok(self.lock()?.attempts)
    }

    fn lock(&self) -> DispatchResult<std::sync::MutexGuard<'_, RecorderState>> {
        self.state
            .lock()
            .map_err(|err| DispatchError::transport(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl MessageDispatcher for RecordingDispatcher {
    async fn dispatch(&self, endpoint: &ChannelEndpoint, text: &str) -> DispatchResult<()> {
        let mut state = self.lock()?;
        state.attempts += 1;
        state.scripted.pop_front().unwrap_or(Ok(()))?;
        state.delivered.push(RecordedPost {
            endpoint: endpoint.clone(),
            text: text.to_owned(),
        });
        Ok(())
    }
}
