//! Renders notification intents into chat message text.

use super::{NotificationEvent, NotificationIntent};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;
use url::Url;

const LINK: &str = "{% if project_url %}\n🔗 {{ project_url }}{% endif %}";

const STARTED_WORK: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" is now In Progress.\n",
    "• Due: {{ due_date }}",
    "{% if tags %}\n• Tags: {{ tags }}{% endif %}",
);

const READY_FOR_REVIEW: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" is ready for review.\n",
    "• Assignee: @{{ assignee }}\n",
    "• Due: {{ due_date }}",
);

const COMPLETED: &str = concat!(
    "{{ mentions }}\n",
    "🎉 Task \"{{ title }}\" is done. Great work!",
);

const STATUS_CHANGED: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" moved from {{ from_status }} to {{ to_status }}.",
);

const FIELDS_CHANGED: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" was updated:",
    "{% for change in changes %}\n• {{ change }}{% endfor %}",
);

const DELETED: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" was deleted.\n",
    "• Due: {{ due_date }}\n",
    "• Status: {{ status }}\n",
    "• Tags: {{ tags or \"(none)\" }}",
);

const DUE_SOON: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" is due in {{ days_left }} days ({{ due_date }}).",
);

const DUE_TODAY: &str = concat!(
    "{{ mentions }}\n",
    "Task \"{{ title }}\" is due today ({{ due_date }}).",
);

/// Errors raised while rendering a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render '{template}' message: {reason}")]
pub struct RenderError {
    /// Template that failed.
    pub template: &'static str,
    /// Engine diagnostic.
    pub reason: String,
}

#[derive(Debug, Serialize)]
struct MessageContext<'a> {
    mentions: String,
    title: &'a str,
    assignee: &'a str,
    due_date: String,
    status: &'static str,
    tags: &'a str,
    changes: Vec<String>,
    from_status: Option<&'static str>,
    to_status: Option<&'static str>,
    days_left: Option<u32>,
    project_url: Option<String>,
}

/// Turns intents into message text.
///
/// Every message starts with `@handle` mentions of the audience and ends with
/// a link to the project page when a base URL is configured.
#[derive(Debug, Clone, Default)]
pub struct MessageRenderer {
    project_base_url: Option<Url>,
}

impl MessageRenderer {
    /// Creates a renderer; `project_base_url` prefixes project links.
    #[must_use]
    pub const fn new(project_base_url: Option<Url>) -> Self {
        Self { project_base_url }
    }

    /// Returns the project page URL for `project_id`, if links are enabled.
    #[must_use]
    pub fn project_url(&self, project_id: &str) -> Option<Url> {
        let mut url = self.project_base_url.clone()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(project_id);
        Some(url)
    }

    /// Renders the message text for `intent`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template engine rejects the template
    /// or context.
    pub fn render(&self, intent: &NotificationIntent) -> Result<String, RenderError> {
        let event = intent.event();
        let template_name = event.template_name();
        let body = template_source(event);
        let source = format!("{body}{LINK}");
        let context = self.build_context(intent);

        Environment::new()
            .render_str(&source, context)
            .map_err(|err| RenderError {
                template: template_name,
                reason: err.to_string(),
            })
    }

    fn build_context<'a>(&self, intent: &'a NotificationIntent) -> MessageContext<'a> {
        let task = intent.task();
        let mentions = intent
            .audience()
            .recipients()
            .iter()
            .map(|handle| format!("@{handle}"))
            .collect::<Vec<_>>()
            .join(" ");

        let (from_status, to_status) = match intent.event() {
            NotificationEvent::StatusChanged { from, to } => (Some(from.label()), Some(to.label())),
            _ => (None, None),
        };
        let changes = match intent.event() {
            NotificationEvent::FieldsChanged { changes } => {
                changes.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        };
        let days_left = match intent.event() {
            NotificationEvent::DueSoon { days_left } => Some(*days_left),
            _ => None,
        };

        MessageContext {
            mentions,
            title: task.title(),
            assignee: task.assignee().as_str(),
            due_date: task.due_date().to_string(),
            status: task.status().label(),
            tags: task.tags(),
            changes,
            from_status,
            to_status,
            days_left,
            project_url: self
                .project_url(intent.project_id().as_str())
                .map(String::from),
        }
    }
}

const fn template_source(event: &NotificationEvent) -> &'static str {
    match event {
        NotificationEvent::StartedWork => STARTED_WORK,
        NotificationEvent::ReadyForReview => READY_FOR_REVIEW,
        NotificationEvent::Completed => COMPLETED,
        NotificationEvent::StatusChanged { .. } => STATUS_CHANGED,
        NotificationEvent::FieldsChanged { .. } => FIELDS_CHANGED,
        NotificationEvent::Deleted => DELETED,
        NotificationEvent::DueSoon { .. } => DUE_SOON,
        NotificationEvent::DueToday => DUE_TODAY,
    }
}
