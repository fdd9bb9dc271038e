//! Domain model for task notifications.
//!
//! The evaluator turns committed task mutations into intents, the resolver
//! picks an endpoint per project and the renderer turns intents into text.
//! None of these perform I/O.

mod channel;
mod evaluator;
mod intent;
mod render;

pub use channel::{
    ChannelConfigError, ChannelDirectory, ChannelEndpoint, ChannelResolver, ResolvedChannel,
};
pub use evaluator::{
    DEFAULT_REMINDER_DAYS, DeadlinePolicy, TaskMutation, TransitionEvaluator, field_changes,
};
pub use intent::{
    Audience, FieldChange, NotificationEvent, NotificationIntent, RecipientRole, TaskField,
};
pub use render::{MessageRenderer, RenderError};
