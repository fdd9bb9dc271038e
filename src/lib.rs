//! Taskboard: a project task board with chat notifications.
//!
//! Tasks belong to projects and move freely between board columns. Every
//! committed task mutation is evaluated by the notification engine, which
//! decides who is told, through which channel and with what message, and
//! delivers it without letting channel failures affect the stored task.
//!
//! # Architecture
//!
//! Both bounded contexts follow hexagonal architecture principles:
//!
//! - **Domain**: validation and decision logic with no infrastructure
//!   dependencies
//! - **Ports**: trait interfaces for storage and outbound messaging
//! - **Adapters**: in-memory, `PostgreSQL` and HTTP webhook implementations
//! - **Services**: orchestration of domain and ports
//!
//! # Modules
//!
//! - [`board`]: projects, tasks and their lifecycle
//! - [`notification`]: transition evaluation, channel resolution, rendering
//!   and dispatch
//! - [`config`]: layered configuration
//! - [`telemetry`]: tracing set-up

pub mod board;
pub mod config;
pub mod notification;
pub mod telemetry;
