//! Task notification engine.
//!
//! Decides, for every committed task mutation, who is told what and where,
//! and delivers the messages without letting channel failures reach the
//! task store. Laid out like the board context:
//!
//! - Decision logic, channel resolution and rendering in [`domain`]
//! - The outbound dispatcher contract in [`ports`]
//! - HTTP and in-memory dispatchers in [`adapters`]
//! - Orchestration and the deadline sweep in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
