//! Adapter implementations of the notification ports.

pub mod memory;
pub mod webhook;

pub use memory::{RecordedPost, RecordingDispatcher};
pub use webhook::{DEFAULT_DISPATCH_TIMEOUT, WebhookDispatcher};
