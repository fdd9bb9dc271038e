//! Step definitions for task notification scenarios.

pub mod then;
pub mod when;
pub mod world;
