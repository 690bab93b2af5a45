//! Identifying labels on every pod

use infraprov_config::StageKind;
use infraprov_errors::InfrastructureError;
use infraprov_types::{InfrastructureEnvironment, RuntimeIdentity, StagePhase, WorkspaceEnvironment};

use super::{POD_NAME_LABEL, WORKSPACE_ID_LABEL};
use crate::stage::ProvisioningStage;

/// Labels pods with their current name and the owning workspace
#[derive(Debug, Default, Clone, Copy)]
pub struct PodLabelsStage;

impl ProvisioningStage for PodLabelsStage {
    fn name(&self) -> &str {
        StageKind::PodLabels.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Augmentation
    }

    fn provision(
        &self,
        _env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        for pod in target.pods.values_mut() {
            pod.labels
                .insert(POD_NAME_LABEL.to_string(), pod.name.clone());
            pod.labels.insert(
                WORKSPACE_ID_LABEL.to_string(),
                identity.workspace_id().to_string(),
            );
        }
        Ok(())
    }
}
