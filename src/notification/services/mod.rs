//! Application services for notification delivery.

mod deadline;
mod orchestrator;
mod report;

pub use deadline::{DeadlineScanError, DeadlineScanService};
pub use orchestrator::NotificationOrchestrator;
pub use report::{Delivery, DeliveryFailure, DeliveryOutcome, NotificationReport, SkipReason};
