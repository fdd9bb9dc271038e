//! Notification channel resolution.
//!
//! A [`ChannelDirectory`] maps channel keys to webhook endpoints and names an
//! optional default. [`ChannelResolver`] picks the endpoint for a project:
//! the project's own key first, then the default, otherwise nothing.

use crate::board::domain::{ChannelKey, Project, TaskDomainError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Validated absolute `http`/`https` webhook URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelEndpoint(Url);

impl ChannelEndpoint {
    /// Parses and validates an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError::InvalidEndpoint`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn parse(key: &str, value: &str) -> Result<Self, ChannelConfigError> {
        let url = Url::parse(value.trim()).map_err(|err| ChannelConfigError::InvalidEndpoint {
            key: key.to_owned(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(ChannelConfigError::InvalidEndpoint {
                key: key.to_owned(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Returns the URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }

    /// Returns the URL with query string removed, for logging.
    ///
    /// Webhook URLs commonly carry signatures in their query string.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut url = self.0.clone();
        url.set_query(None);
        url.to_string()
    }
}

impl fmt::Display for ChannelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Errors raised while building a channel directory.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelConfigError {
    /// A channel key is malformed.
    #[error(transparent)]
    InvalidKey(#[from] TaskDomainError),

    /// An endpoint URL is malformed.
    #[error("invalid endpoint for channel '{key}': {reason}")]
    InvalidEndpoint {
        /// Channel key whose URL failed validation.
        key: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The default channel names no configured channel.
    #[error("default channel '{0}' is not configured")]
    UnknownDefaultChannel(String),
}

/// Explicit mapping from channel keys to endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDirectory {
    endpoints: BTreeMap<ChannelKey, ChannelEndpoint>,
    default_key: Option<ChannelKey>,
}

impl ChannelDirectory {
    /// Creates an empty directory; every project resolves to `None`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from raw key/URL pairs and an optional default key.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError`] when a key or URL is malformed or the
    /// default key names no channel.
    pub fn from_raw<'a>(
        channels: impl IntoIterator<Item = (&'a str, &'a str)>,
        default_key: Option<&str>,
    ) -> Result<Self, ChannelConfigError> {
        let mut directory = Self::new();
        for (raw_key, raw_url) in channels {
            let key = ChannelKey::new(raw_key)?;
            let endpoint = ChannelEndpoint::parse(key.as_str(), raw_url)?;
            directory.endpoints.insert(key, endpoint);
        }
        if let Some(raw_default) = default_key {
            directory = directory.with_default(ChannelKey::new(raw_default)?)?;
        }
        Ok(directory)
    }

    /// Registers an endpoint under `key`, replacing any previous entry.
    #[must_use]
    pub fn with_channel(mut self, key: ChannelKey, endpoint: ChannelEndpoint) -> Self {
        self.endpoints.insert(key, endpoint);
        self
    }

    /// Designates the default channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelConfigError::UnknownDefaultChannel`] when `key` has no
    /// registered endpoint.
    pub fn with_default(mut self, key: ChannelKey) -> Result<Self, ChannelConfigError> {
        if !self.endpoints.contains_key(&key) {
            return Err(ChannelConfigError::UnknownDefaultChannel(key.to_string()));
        }
        self.default_key = Some(key);
        Ok(self)
    }

    /// Returns the endpoint registered under `key`.
    #[must_use]
    pub fn get(&self, key: &ChannelKey) -> Option<&ChannelEndpoint> {
        self.endpoints.get(key)
    }

    /// Returns the default key and endpoint, if configured.
    #[must_use]
    pub fn default_channel(&self) -> Option<(&ChannelKey, &ChannelEndpoint)> {
        let key = self.default_key.as_ref()?;
        self.endpoints.get(key).map(|endpoint| (key, endpoint))
    }

    /// Returns the number of registered channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns whether no channel is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Endpoint chosen for a project, with the key it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    /// Key the endpoint is registered under.
    pub key: ChannelKey,
    /// Endpoint to post to.
    pub endpoint: ChannelEndpoint,
    /// Whether the default channel was used.
    pub is_default: bool,
}

/// Resolves the outbound channel for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelResolver {
    directory: ChannelDirectory,
}

impl ChannelResolver {
    /// Creates a resolver over the given directory.
    #[must_use]
    pub const fn new(directory: ChannelDirectory) -> Self {
        Self { directory }
    }

    /// Returns the underlying directory.
    #[must_use]
    pub const fn directory(&self) -> &ChannelDirectory {
        &self.directory
    }

    /// Picks the endpoint for `project`.
    ///
    /// Returns `None` when neither the project's key nor a default channel
    /// resolves; callers skip notification in that case.
    #[must_use]
    pub fn resolve(&self, project: &Project) -> Option<ResolvedChannel> {
        if let Some(key) = project.channel_key() {
            if let Some(endpoint) = self.directory.get(key) {
                return Some(ResolvedChannel {
                    key: key.clone(),
                    endpoint: endpoint.clone(),
                    is_default: false,
                });
            }
            debug!(
                project_id = %project.id(),
                channel_key = %key,
                "project channel key is not configured, falling back to default"
            );
        }
        self.directory
            .default_channel()
            .map(|(key, endpoint)| ResolvedChannel {
                key: key.clone(),
                endpoint: endpoint.clone(),
                is_default: true,
            })
    }
}
