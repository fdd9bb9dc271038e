//! Port contracts for notification delivery.

pub mod dispatcher;

pub use dispatcher::{DispatchError, DispatchResult, MessageDispatcher};
#[cfg(test)]
pub use dispatcher::MockMessageDispatcher;
