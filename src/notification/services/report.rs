//! Per-intent delivery outcomes of one notification run.

use crate::notification::{
    domain::{NotificationIntent, RenderError},
    ports::DispatchError,
};
use thiserror::Error;

/// Why an intent was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The project resolved to no endpoint.
    NoChannel,
}

/// Why an attempted delivery failed.
#[derive(Debug, Clone, Error)]
pub enum DeliveryFailure {
    /// The message could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The dispatcher reported a failure.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Outcome of a single intent.
#[derive(Debug, Clone)]
pub enum DeliveryOutcome {
    /// The endpoint accepted the message.
    Delivered,
    /// Nothing was sent.
    Skipped(SkipReason),
    /// Sending was attempted and failed.
    Failed(DeliveryFailure),
}

impl DeliveryOutcome {
    /// Returns whether the message reached the endpoint.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Returns whether delivery was attempted and failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// An intent paired with what happened to it.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The evaluated intent.
    pub intent: NotificationIntent,
    /// Its outcome.
    pub outcome: DeliveryOutcome,
}

/// Result of notifying about one mutation or one deadline sweep.
///
/// A report never turns into an error of the triggering operation; callers
/// inspect it or ignore it.
#[derive(Debug, Clone, Default)]
pub struct NotificationReport {
    deliveries: Vec<Delivery>,
}

impl NotificationReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deliveries: Vec::new(),
        }
    }

    /// Records the outcome of one intent.
    pub fn push(&mut self, intent: NotificationIntent, outcome: DeliveryOutcome) {
        self.deliveries.push(Delivery { intent, outcome });
    }

    /// Appends every delivery from `other`.
    pub fn merge(&mut self, other: Self) {
        self.deliveries.extend(other.deliveries);
    }

    /// Returns deliveries in evaluation order.
    #[must_use]
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Iterates over the evaluated intents.
    pub fn intents(&self) -> impl Iterator<Item = &NotificationIntent> {
        self.deliveries.iter().map(|delivery| &delivery.intent)
    }

    /// Returns the number of intents evaluated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    /// Returns whether no intent was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Returns the number of delivered messages.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.count(DeliveryOutcome::is_delivered)
    }

    /// Returns the number of skipped intents.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, DeliveryOutcome::Skipped(_)))
    }

    /// Returns the number of failed deliveries.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(DeliveryOutcome::is_failed)
    }

    fn count(&self, predicate: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.deliveries
            .iter()
            .filter(|delivery| predicate(&delivery.outcome))
            .count()
    }
}

impl IntoIterator for NotificationReport {
    type Item = Delivery;
    type IntoIter = std::vec::IntoIter<Delivery>;

    fn into_iter(self) -> Self::IntoIter {
        self.deliveries.into_iter()
    }
}
