//! Back declared volumes with one persistent storage claim

use std::collections::btree_map::Entry;

use infraprov_config::{StageKind, StorageConfig};
use infraprov_errors::InfrastructureError;
use infraprov_types::{
    machine_name, InfrastructureEnvironment, PodVolume, RuntimeIdentity, StagePhase, StorageClaim,
    VolumeMount, WorkspaceEnvironment,
};

use crate::stage::ProvisioningStage;

/// Mounts every declared volume from a shared workspace claim.
///
/// Volumes land in the claim under `<workspace_id>/<machine>/<volume>`. The
/// claim records the pods mounting it by their current name, so this stage
/// runs after unique naming. It also runs after the restart-policy rewrite,
/// which may shape the claims a pod needs.
#[derive(Debug, Clone)]
pub struct StorageClaimStage {
    config: StorageConfig,
}

impl StorageClaimStage {
    #[must_use]
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl Default for StorageClaimStage {
    fn default() -> Self {
        Self::new(StorageConfig::default())
    }
}

impl ProvisioningStage for StorageClaimStage {
    fn name(&self) -> &str {
        StageKind::StorageClaims.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Augmentation
    }

    fn provision(
        &self,
        env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        if !self.config.enabled {
            tracing::debug!("persistent storage disabled");
            return Ok(());
        }

        let claim_name = &self.config.claim_name;
        let InfrastructureEnvironment {
            pods,
            storage_claims,
            ..
        } = target;

        for (pod_key, pod) in pods.iter_mut() {
            let mut mounted = false;

            for container in &mut pod.containers {
                let Some(machine) = env.machine(pod_key, &container.name) else {
                    continue;
                };
                let machine_key = machine_name(pod_key, &container.name);

                for (volume_name, volume) in &machine.volumes {
                    mounted = true;
                    if container
                        .volume_mounts
                        .iter()
                        .any(|m| m.mount_path == volume.path)
                    {
                        continue;
                    }
                    container.volume_mounts.push(VolumeMount {
                        name: claim_name.clone(),
                        mount_path: volume.path.clone(),
                        sub_path: format!(
                            "{}/{machine_key}/{volume_name}",
                            identity.workspace_id()
                        ),
                    });
                }
            }

            if !mounted {
                continue;
            }

            if !pod.volumes.iter().any(|v| &v.claim_name == claim_name) {
                pod.volumes.push(PodVolume {
                    name: claim_name.clone(),
                    claim_name: claim_name.clone(),
                });
            }

            let claim = match storage_claims.entry(claim_name.clone()) {
                Entry::Vacant(entry) => entry.insert(StorageClaim {
                    name: claim_name.clone(),
                    quantity: self.config.quantity.clone(),
                    access_mode: self.config.access_mode,
                    mounted_by: Vec::new(),
                }),
                Entry::Occupied(entry) => {
                    let claim = entry.into_mut();
                    if claim.access_mode != self.config.access_mode {
                        return Err(InfrastructureError::new(format!(
                            "storage claim '{claim_name}' already exists with access mode {} instead of {}",
                            claim.access_mode, self.config.access_mode
                        )));
                    }
                    claim
                }
            };

            if !claim.mounted_by.contains(&pod.name) {
                claim.mounted_by.push(pod.name.clone());
            }
        }

        Ok(())
    }
}
