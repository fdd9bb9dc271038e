//! Project aggregate.

use super::{ChannelKey, PersonHandle, ProjectId, TaskDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A board project owning a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    #[serde(rename = "projectManager")]
    manager: Option<PersonHandle>,
    channel_key: Option<ChannelKey>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: String,
    /// Persisted manager handle, if any.
    pub manager: Option<PersonHandle>,
    /// Persisted channel resolution key, if any.
    pub channel_key: Option<ChannelKey>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProjectName`] when the name is blank.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyProjectName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            manager: None,
            channel_key: None,
            created_at: clock.utc(),
        })
    }

    /// Sets the project manager.
    #[must_use]
    pub fn with_manager(mut self, manager: PersonHandle) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Sets the channel resolution key.
    #[must_use]
    pub fn with_channel_key(mut self, channel_key: ChannelKey) -> Self {
        self.channel_key = Some(channel_key);
        self
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            manager: data.manager,
            channel_key: data.channel_key,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project manager, if one is configured.
    #[must_use]
    pub const fn manager(&self) -> Option<&PersonHandle> {
        self.manager.as_ref()
    }

    /// Returns the channel resolution key, if one is configured.
    #[must_use]
    pub const fn channel_key(&self) -> Option<&ChannelKey> {
        self.channel_key.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the project manager.
    pub fn assign_manager(&mut self, manager: PersonHandle) {
        self.manager = Some(manager);
    }
}
