//! Layered configuration.
//!
//! Values are merged in this order, later sources overriding earlier ones:
//!
//! 1. compiled defaults
//! 2. `taskboard.toml` in the working directory, or the file passed with
//!    `--config`
//! 3. `TASKBOARD_*` environment variables, nested with `__`
//!    (`TASKBOARD_NOTIFICATION__CHANNELS__TEAM_ALPHA=https://...`)
//!
//! Unknown keys are rejected so that typos surface at start-up.

use crate::board::domain::TaskStatus;
use crate::notification::{
    domain::{
        ChannelConfigError, ChannelDirectory, ChannelResolver, DEFAULT_REMINDER_DAYS,
        DeadlinePolicy, MessageRenderer, TransitionEvaluator,
    },
    ports::MessageDispatcher,
    services::NotificationOrchestrator,
};
use chrono::FixedOffset;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskboard.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the schema.
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    /// The channel table is invalid.
    #[error(transparent)]
    Channels(#[from] ChannelConfigError),

    /// `notification.utc_offset_minutes` is outside ±24 hours.
    #[error("utc offset of {0} minutes is out of range")]
    InvalidUtcOffset(i32),

    /// `notification.dispatch_timeout_secs` is zero.
    #[error("dispatch timeout must be at least one second")]
    ZeroDispatchTimeout,

    /// `database.url` is required but unset.
    #[error("database.url is not configured")]
    MissingDatabaseUrl,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TaskboardConfig {
    /// Default tracing level for the crate, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Database connection.
    pub database: DatabaseConfig,
    /// Board behaviour.
    pub board: BoardConfig,
    /// Notification delivery.
    pub notification: NotificationConfig,
}

impl Default for TaskboardConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            database: DatabaseConfig::default(),
            board: BoardConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 4,
        }
    }
}

impl DatabaseConfig {
    /// Returns the connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

/// `[board]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoardConfig {
    /// Status given to tasks created without one.
    pub default_status: TaskStatus,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_status: TaskStatus::InProgress,
        }
    }
}

/// `[notification]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NotificationConfig {
    /// Channel used by projects without a known key.
    pub default_channel: Option<String>,
    /// Channel key to webhook URL.
    pub channels: BTreeMap<String, String>,
    /// Base of project page links; links are omitted when unset.
    pub project_base_url: Option<Url>,
    /// Bound on a single webhook call.
    pub dispatch_timeout_secs: u64,
    /// Offset of the board calendar used by the deadline sweep.
    pub utc_offset_minutes: i32,
    /// Days before the due date at which the reminder fires.
    pub reminder_days: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_channel: None,
            channels: BTreeMap::new(),
            project_base_url: None,
            dispatch_timeout_secs: 10,
            utc_offset_minutes: 0,
            reminder_days: DEFAULT_REMINDER_DAYS,
        }
    }
}

impl NotificationConfig {
    /// Builds the channel directory.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError`] for malformed keys or URLs, or when the
    /// default channel names no configured channel.
    pub fn channel_directory(&self) -> Result<ChannelDirectory, ChannelConfigError> {
        ChannelDirectory::from_raw(
            self.channels
                .iter()
                .map(|(key, url)| (key.as_str(), url.as_str())),
            self.default_channel
                .as_deref()
                .filter(|key| !key.trim().is_empty()),
        )
    }

    /// Returns the message renderer.
    #[must_use]
    pub fn renderer(&self) -> MessageRenderer {
        MessageRenderer::new(self.project_base_url.clone())
    }

    /// Returns the transition evaluator.
    #[must_use]
    pub fn evaluator(&self) -> TransitionEvaluator {
        TransitionEvaluator::new(DeadlinePolicy::new(self.reminder_days))
    }

    /// Returns the dispatch timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDispatchTimeout`] when the timeout is zero.
    pub const fn dispatch_timeout(&self) -> Result<Duration, ConfigError> {
        if self.dispatch_timeout_secs == 0 {
            return Err(ConfigError::ZeroDispatchTimeout);
        }
        Ok(Duration::from_secs(self.dispatch_timeout_secs))
    }

    /// Returns the board calendar offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUtcOffset`] when the offset is out of
    /// range.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_minutes))
    }

    /// Wires an orchestrator around `dispatcher`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Channels`] when the channel table is invalid.
    pub fn orchestrator<D>(
        &self,
        dispatcher: Arc<D>,
    ) -> Result<NotificationOrchestrator<D>, ConfigError>
    where
        D: MessageDispatcher,
    {
        Ok(NotificationOrchestrator::new(
            self.evaluator(),
            ChannelResolver::new(self.channel_directory()?),
            self.renderer(),
            dispatcher,
        ))
    }
}

/// Loads configuration from `path` (or [`DEFAULT_CONFIG_FILE`]) with
/// environment overrides.
///
/// A missing file is not an error; defaults and environment apply.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] when a source does not match the schema.
pub fn load_config(path: Option<&Path>) -> Result<TaskboardConfig, ConfigError> {
    let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    Ok(Figment::new()
        .merge(Serialized::defaults(TaskboardConfig::default()))
        .merge(Toml::file(file))
        .merge(env_provider())
        .extract()?)
}

/// Loads configuration from a TOML string without environment overrides.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] when the content does not match the schema.
pub fn load_config_from_str(toml: &str) -> Result<TaskboardConfig, ConfigError> {
    Ok(Figment::new()
        .merge(Serialized::defaults(TaskboardConfig::default()))
        .merge(Toml::string(toml))
        .extract()?)
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}
