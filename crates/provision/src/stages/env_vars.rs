//! Translate machine environment variables into container env entries

use infraprov_config::StageKind;
use infraprov_errors::InfrastructureError;
use infraprov_types::{InfrastructureEnvironment, RuntimeIdentity, StagePhase, WorkspaceEnvironment};

use crate::stage::ProvisioningStage;

/// Copies each machine's env vars onto its container.
///
/// A variable the container already defines takes the machine's value in
/// place; new ones are appended.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvVarsStage;

impl ProvisioningStage for EnvVarsStage {
    fn name(&self) -> &str {
        StageKind::EnvVars.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Translation
    }

    fn provision(
        &self,
        env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        _identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        for (pod_key, pod) in &mut target.pods {
            for container in &mut pod.containers {
                let Some(machine) = env.machine(pod_key, &container.name) else {
                    continue;
                };
                for (name, value) in &machine.env {
                    container.set_env(name, value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{dev_pod, identity};
    use infraprov_types::{machine_name, MachineConfig};

    #[test]
    fn machine_values_win_and_order_is_kept() {
        let env = WorkspaceEnvironment::new().with_machine(
            machine_name("dev", "tooling"),
            MachineConfig::default()
                .with_env("JAVA_OPTS", "-Xmx1g")
                .with_env("HOME", "/home/user"),
        );
        let mut target = dev_pod();
        target.pods.get_mut("dev").unwrap().containers[0].set_env("HOME", "/root");

        EnvVarsStage.provision(&env, &mut target, &identity()).unwrap();

        let container = &target.pods["dev"].containers[0];
        let names: Vec<_> = container.env.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["HOME", "JAVA_OPTS"]);
        assert_eq!(container.env_var("HOME"), Some("/home/user"));
    }
}
