//! Unit tests for the notification context.

mod support;
