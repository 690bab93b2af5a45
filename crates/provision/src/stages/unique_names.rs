//! Give every pod a workspace-unique generated name

use std::collections::BTreeSet;
use std::sync::Arc;

use infraprov_config::StageKind;
use infraprov_errors::InfrastructureError;
use infraprov_types::{InfrastructureEnvironment, RuntimeIdentity, StagePhase, WorkspaceEnvironment};

use super::ORIGINAL_NAME_LABEL;
use crate::naming::NameGenerator;
use crate::stage::ProvisioningStage;

/// Candidates drawn per pod before giving up
const MAX_ATTEMPTS: usize = 5;

/// Renames pods to `<workspace_id>.<generated>`.
///
/// The name a pod had before is kept in the `infraprov.original_name` label.
/// Stages that refer to pods by name must run after this one.
#[derive(Clone)]
pub struct UniqueNamesStage {
    names: Arc<dyn NameGenerator>,
}

impl UniqueNamesStage {
    #[must_use]
    pub fn new(names: Arc<dyn NameGenerator>) -> Self {
        Self { names }
    }

    fn unique_name(
        &self,
        prefix: &str,
        taken: &BTreeSet<String>,
    ) -> Result<String, InfrastructureError> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = self.names.generate(prefix)?;
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "generated name already taken");
        }
        Err(InfrastructureError::new(format!(
            "could not generate a unique name with prefix '{prefix}' after {MAX_ATTEMPTS} attempts"
        )))
    }
}

impl ProvisioningStage for UniqueNamesStage {
    fn name(&self) -> &str {
        StageKind::UniqueNames.as_str()
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
        let prefix = format!("{}.", identity.workspace_id());
        let mut taken: BTreeSet<String> = target.pods.values().map(|pod| pod.name.clone()).collect();

        for pod in target.pods.values_mut() {
            let name = self.unique_name(&prefix, &taken)?;
            taken.insert(name.clone());

            let original = std::mem::replace(&mut pod.name, name);
            tracing::debug!(original = %original, generated = %pod.name, "pod renamed");
            pod.labels
                .entry(ORIGINAL_NAME_LABEL.to_string())
                .or_insert(original);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{dev_pod, identity};
    use infraprov_types::Pod;

    struct Fixed(&'static str);

    impl NameGenerator for Fixed {
        fn generate(&self, prefix: &str) -> Result<String, InfrastructureError> {
            Ok(format!("{prefix}{}", self.0))
        }
    }

    struct Unavailable;

    impl NameGenerator for Unavailable {
        fn generate(&self, _prefix: &str) -> Result<String, InfrastructureError> {
            Err(InfrastructureError::new("name service unavailable"))
        }
    }

    #[test]
    fn renames_and_records_original() {
        let stage = UniqueNamesStage::new(Arc::new(Fixed("k3x9")));
        let mut target = dev_pod();

        stage
            .provision(&WorkspaceEnvironment::new(), &mut target, &identity())
            .unwrap();

        let pod = &target.pods["dev"];
        assert_eq!(pod.name, "ws1.k3x9");
        assert_eq!(pod.label(ORIGINAL_NAME_LABEL), Some("dev"));
    }

    #[test]
    fn collision_exhausts_attempts() {
        let stage = UniqueNamesStage::new(Arc::new(Fixed("same")));
        let mut target = dev_pod().with_pod(Pod::new("db"));

        let err = stage
            .provision(&WorkspaceEnvironment::new(), &mut target, &identity())
            .unwrap_err();
        assert!(err.message().contains("after 5 attempts"));
        // the first pod keeps its new name, nothing is rolled back
        assert_eq!(target.pods["db"].name, "ws1.same");
    }

    #[test]
    fn generator_failure_propagates() {
        let stage = UniqueNamesStage::new(Arc::new(Unavailable));
        let mut target = dev_pod();

        let err = stage
            .provision(&WorkspaceEnvironment::new(), &mut target, &identity())
            .unwrap_err();
        assert_eq!(err.message(), "name service unavailable");
        assert_eq!(target.pods["dev"].name, "dev");
    }
}
