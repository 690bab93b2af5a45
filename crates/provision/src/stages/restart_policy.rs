//! Enforce the configured restart policy on every pod

use infraprov_config::StageKind;
use infraprov_errors::InfrastructureError;
use infraprov_types::{
    InfrastructureEnvironment, RestartPolicy, RuntimeIdentity, StagePhase, WorkspaceEnvironment,
};

use super::RESTART_POLICY_REWRITTEN;
use crate::once::OneShot;
use crate::stage::ProvisioningStage;

/// Rewrites pod restart policies.
///
/// Every rewritten pod adds a warning to the environment. The first rewrite
/// in the process is also logged at `warn`; later ones only at `debug`.
#[derive(Debug)]
pub struct RestartPolicyStage {
    policy: RestartPolicy,
    first_rewrite: OneShot,
}

impl RestartPolicyStage {
    #[must_use]
    pub fn new(policy: RestartPolicy) -> Self {
        Self {
            policy,
            first_rewrite: OneShot::new(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> RestartPolicy {
        self.policy
    }
}

impl Default for RestartPolicyStage {
    fn default() -> Self {
        Self::new(RestartPolicy::Never)
    }
}

impl ProvisioningStage for RestartPolicyStage {
    fn name(&self) -> &str {
        StageKind::RestartPolicy.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Augmentation
    }

    fn provision(
        &self,
        _env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        _identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        let InfrastructureEnvironment { pods, warnings, .. } = target;

        for pod in pods.values_mut() {
            if pod.restart_policy == self.policy {
                continue;
            }

            let previous = std::mem::replace(&mut pod.restart_policy, self.policy);
            if self.first_rewrite.fire() {
                tracing::warn!(
                    pod = %pod.name,
                    from = %previous,
                    to = %self.policy,
                    "overriding pod restart policy; further overrides are logged at debug"
                );
            } else {
                tracing::debug!(pod = %pod.name, from = %previous, to = %self.policy, "restart policy overridden");
            }

            warnings.push(infraprov_types::Warning {
                code: RESTART_POLICY_REWRITTEN,
                message: format!(
                    "Restart policy '{previous}' for pod '{}' is rewritten with '{}'",
                    pod.name, self.policy
                ),
            });
        }

        Ok(())
    }
}
