//! Platform-neutral description of a workspace's runtime

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build the machine key for a container of a pod (`"<pod>/<container>"`)
#[must_use]
pub fn machine_name(pod: &str, container: &str) -> String {
    format!("{pod}/{container}")
}

/// Desired runtime of a workspace, independent of any target platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEnvironment {
    /// Machines keyed by `"<pod>/<container>"`
    #[serde(default)]
    pub machines: BTreeMap<String, MachineConfig>,
}

impl WorkspaceEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a machine
    #[must_use]
    pub fn with_machine(mut self, name: impl Into<String>, machine: MachineConfig) -> Self {
        self.machines.insert(name.into(), machine);
        self
    }

    /// Machine declared for a container of a pod
    #[must_use]
    pub fn machine(&self, pod: &str, container: &str) -> Option<&MachineConfig> {
        self.machines.get(&machine_name(pod, container))
    }
}

/// One machine of the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerConfig>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub volumes: BTreeMap<String, VolumeConfig>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl MachineConfig {
    #[must_use]
    pub fn with_server(mut self, name: impl Into<String>, server: ServerConfig) -> Self {
        self.servers.insert(name.into(), server);
        self
    }

    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_volume(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.volumes
            .insert(name.into(), VolumeConfig { path: path.into() });
        self
    }
}

/// A server exposed by a machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port with optional transport, e.g. `"8080/tcp"` or `"4403"`
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(port: impl Into<String>, protocol: Option<&str>) -> Self {
        Self {
            port: port.into(),
            protocol: protocol.map(str::to_string),
            ..Self::default()
        }
    }
}

/// A volume a machine wants persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Mount path inside the container
    pub path: String,
}
