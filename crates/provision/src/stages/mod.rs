//! Concrete provisioning stages, in their default deployed order

pub mod env_vars;
pub mod pod_labels;
pub mod restart_policy;
pub mod servers;
pub mod storage_claims;
pub mod tls_routes;
pub mod unique_names;

pub use env_vars::EnvVarsStage;
pub use pod_labels::PodLabelsStage;
pub use restart_policy::RestartPolicyStage;
pub use servers::ServersStage;
pub use storage_claims::StorageClaimStage;
pub use tls_routes::TlsRoutesStage;
pub use unique_names::UniqueNamesStage;

/// Name the object had before a stage generated a unique one
pub const ORIGINAL_NAME_LABEL: &str = "infraprov.original_name";

/// Current (generated) name of the pod
pub const POD_NAME_LABEL: &str = "infraprov.pod.name";

pub const WORKSPACE_ID_LABEL: &str = "infraprov.workspace_id";

/// Warning code raised when a pod's restart policy is overridden
pub const RESTART_POLICY_REWRITTEN: u32 = 4104;
