//! Identity of the workload being provisioned

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one workspace instance for the duration of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeIdentity {
    workspace_id: String,
    owner: String,
    env_name: String,
}

impl RuntimeIdentity {
    /// Create a new runtime identity
    #[must_use]
    pub fn new(
        workspace_id: impl Into<String>,
        owner: impl Into<String>,
        env_name: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            owner: owner.into(),
            env_name: env_name.into(),
        }
    }

    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn env_name(&self) -> &str {
        &self.env_name
    }
}

impl fmt::Display for RuntimeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.workspace_id, self.env_name, self.owner)
    }
}
