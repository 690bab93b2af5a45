//! Platform-specific objects accumulated by the provisioning stages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target objects a container platform needs to run a workspace.
///
/// Every map is keyed by the object's original name, which stays stable even
/// when a stage gives the object a generated `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureEnvironment {
    #[serde(default)]
    pub pods: BTreeMap<String, Pod>,
    #[serde(default)]
    pub services: BTreeMap<String, Service>,
    #[serde(default)]
    pub routes: BTreeMap<String, Route>,
    #[serde(default)]
    pub storage_claims: BTreeMap<String, StorageClaim>,
    /// Ordered log of non-fatal notices raised while provisioning
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl InfrastructureEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pod, keyed by its current name
    #[must_use]
    pub fn with_pod(mut self, pod: Pod) -> Self {
        self.pods.insert(pod.name.clone(), pod);
        self
    }

    /// Find a pod by its (possibly generated) name
    #[must_use]
    pub fn pod_by_name(&self, name: &str) -> Option<&Pod> {
        self.pods.values().find(|pod| pod.name == name)
    }

    pub fn add_warning(&mut self, code: u32, message: impl Into<String>) {
        self.warnings.push(Warning {
            code,
            message: message.into(),
        });
    }
}

/// Compute unit: a group of containers scheduled together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub volumes: Vec<PodVolume>,
}

impl Pod {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    #[must_use]
    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub ports: Vec<ContainerPort>,
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
}

impl Container {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn env_var(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    /// Overwrite a variable in place, or append it when absent
    pub fn set_env(&mut self, name: &str, value: &str) {
        match self.env.iter_mut().find(|var| var.name == name) {
            Some(var) => value.clone_into(&mut var.value),
            None => self.env.push(EnvVar {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPort {
    pub port: u16,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    pub sub_path: String,
}

/// Pod-level volume backed by a storage claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodVolume {
    pub name: String,
    pub claim_name: String,
}

/// Restart semantics of a pod's containers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    #[default]
    Always,
    OnFailure,
    Never,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::OnFailure => write!(f, "OnFailure"),
            Self::Never => write!(f, "Never"),
        }
    }
}

/// Cluster-internal endpoint for the servers of one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Key of the pod this service fronts
    pub pod: String,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub ports: Vec<ServicePort>,
    /// Servers exposed through this service, keyed by server name
    #[serde(default)]
    pub servers: BTreeMap<String, crate::ServerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: String,
    pub port: u16,
    pub protocol: String,
}

/// Externally reachable endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub host: String,
    pub service: String,
    pub target_port: u16,
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouteTls>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTls {
    pub termination: TlsTermination,
    /// Plain-HTTP requests are redirected to the secure endpoint
    pub insecure_redirect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsTermination {
    Edge,
}

/// Persistent storage requested for the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageClaim {
    pub name: String,
    pub quantity: String,
    pub access_mode: AccessMode,
    /// Names of the pods mounting this claim
    #[serde(default)]
    pub mounted_by: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    #[default]
    ReadWriteOnce,
    ReadWriteMany,
    ReadOnlyMany,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadWriteOnce => write!(f, "ReadWriteOnce"),
            Self::ReadWriteMany => write!(f, "ReadWriteMany"),
            Self::ReadOnlyMany => write!(f, "ReadOnlyMany"),
        }
    }
}

/// Non-fatal notice surfaced to whoever started the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: u32,
    pub message: String,
}
