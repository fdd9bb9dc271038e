//! Notification orchestration.
//!
//! Runs after a task mutation has been committed: evaluates the change,
//! resolves the project's channel once, then renders and dispatches each
//! intent. Every intent is attempted; failures are logged and recorded in the
//! returned [`NotificationReport`] and never propagate to the caller.

use super::report::{DeliveryFailure, DeliveryOutcome, NotificationReport, SkipReason};
use crate::board::domain::Project;
use crate::notification::{
    domain::{
        ChannelResolver, MessageRenderer, NotificationIntent, ResolvedChannel, TaskMutation,
        TransitionEvaluator,
    },
    ports::MessageDispatcher,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Coordinates evaluator, resolver, renderer and dispatcher.
#[derive(Clone)]
pub struct NotificationOrchestrator<D>
where
    D: MessageDispatcher,
{
    evaluator: TransitionEvaluator,
    resolver: ChannelResolver,
    renderer: MessageRenderer,
    dispatcher: Arc<D>,
}

impl<D> NotificationOrchestrator<D>
where
    D: MessageDispatcher,
{
    /// Creates an orchestrator.
    #[must_use]
    pub const fn new(
        evaluator: TransitionEvaluator,
        resolver: ChannelResolver,
        renderer: MessageRenderer,
        dispatcher: Arc<D>,
    ) -> Self {
        Self {
            evaluator,
            resolver,
            renderer,
            dispatcher,
        }
    }

    /// Returns the transition evaluator.
    #[must_use]
    pub const fn evaluator(&self) -> &TransitionEvaluator {
        &self.evaluator
    }

    /// Returns the channel resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ChannelResolver {
        &self.resolver
    }

    /// Notifies about a committed mutation of a task in `project`.
    pub async fn on_mutation(
        &self,
        project: &Project,
        mutation: TaskMutation<'_>,
    ) -> NotificationReport {
        let intents = self.evaluator.evaluate(mutation, project);
        self.deliver(project, intents).await
    }

    /// Renders and dispatches precomputed intents for `project`.
    pub async fn deliver(
        &self,
        project: &Project,
        intents: Vec<NotificationIntent>,
    ) -> NotificationReport {
        let mut report = NotificationReport::new();
        if intents.is_empty() {
            return report;
        }

        let Some(channel) = self.resolver.resolve(project) else {
            debug!(
                project_id = %project.id(),
                intents = intents.len(),
                "no notification channel configured, skipping"
            );
            for intent in intents {
                report.push(intent, DeliveryOutcome::Skipped(SkipReason::NoChannel));
            }
            return report;
        };

        for intent in intents {
            let outcome = self.attempt(&channel, &intent).await;
            report.push(intent, outcome);
        }
        report
    }

    async fn attempt(
        &self,
        channel: &ResolvedChannel,
        intent: &NotificationIntent,
    ) -> DeliveryOutcome {
        let event = intent.event().template_name();
        let text = match self.renderer.render(intent) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    task_id = %intent.task().id(),
                    event,
                    error = %err,
                    "failed to render notification"
                );
                return DeliveryOutcome::Failed(DeliveryFailure::Render(err));
            }
        };

        match self.dispatcher.dispatch(&channel.endpoint, &text).await {
            Ok(()) => {
                info!(
                    task_id = %intent.task().id(),
                    event,
                    channel = %channel.key,
                    "notification delivered"
                );
                DeliveryOutcome::Delivered
            }
            Err(err) => {
                warn!(
                    task_id = %intent.task().id(),
                    event,
                    channel = %channel.key,
                    error = %err,
                    "notification dispatch failed"
                );
                DeliveryOutcome::Failed(DeliveryFailure::Dispatch(err))
            }
        }
    }
}
