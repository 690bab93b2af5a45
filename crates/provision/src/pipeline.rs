//! Pipeline orchestrator
//!
//! Runs a fixed list of stages, in order, against one provisioning request
//! and stops at the first failure. Nothing is retried and nothing written by
//! the stages that did run is undone.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use infraprov_errors::InfrastructureError;
use infraprov_types::{InfrastructureEnvironment, RuntimeIdentity, StagePhase, WorkspaceEnvironment};
use tracing::{debug, info, info_span, warn};

use crate::stage::ProvisioningStage;

/// Ordered, immutable list of provisioning stages.
///
/// Holds no per-run data, so one instance can be shared (for example behind
/// an `Arc`) by concurrent provisioning runs.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn ProvisioningStage>>,
}

impl Pipeline {
    /// Create a pipeline from stages already in their deployed order
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn ProvisioningStage>>) -> Self {
        Self { stages }
    }

    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run every stage, in order, against `target`.
    ///
    /// On success each stage ran exactly once. On failure the stages before
    /// the failing one have run and their changes stay in `target`; no later
    /// stage runs.
    ///
    /// # Errors
    ///
    /// Returns the failing stage's `InfrastructureError` unchanged.
    pub fn provision(
        &self,
        env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        let span = info_span!(
            "provision",
            workspace_id = identity.workspace_id(),
            owner = identity.owner(),
            env_name = identity.env_name(),
        );
        let _entered = span.enter();

        let total = self.stages.len();
        for (index, stage) in self.stages.iter().enumerate() {
            let started = Instant::now();
            debug!(
                stage = stage.name(),
                phase = %stage.phase(),
                position = index + 1,
                total,
                "running stage"
            );

            if let Err(err) = stage.provision(env, target, identity) {
                warn!(
                    stage = stage.name(),
                    error = %err,
                    skipped = total - index - 1,
                    "stage failed"
                );
                return Err(err);
            }

            debug!(
                stage = stage.name(),
                elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                "stage finished"
            );
        }

        info!(stages = total, "environment provisioned");
        Ok(())
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Stages in execution order
    #[must_use]
    pub fn stages(&self) -> &[Arc<dyn ProvisioningStage>] {
        &self.stages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

/// Assembles a [`Pipeline`] stage by stage, in execution order
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn ProvisioningStage>>,
}

impl PipelineBuilder {
    /// Append a stage owned by this pipeline
    #[must_use]
    pub fn stage<S>(self, stage: S) -> Self
    where
        S: ProvisioningStage + 'static,
    {
        self.shared_stage(Arc::new(stage))
    }

    /// Append a stage instance that may also be used by other pipelines
    #[must_use]
    pub fn shared_stage(mut self, stage: Arc<dyn ProvisioningStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Freeze the stage list.
    ///
    /// The order is kept exactly as given. A translation stage placed after
    /// an augmentation stage is reported but not corrected.
    #[must_use]
    pub fn build(self) -> Pipeline {
        let mut augmentation: Option<&str> = None;
        for stage in &self.stages {
            match stage.phase() {
                StagePhase::Augmentation => augmentation = Some(stage.name()),
                StagePhase::Translation => {
                    if let Some(earlier) = augmentation {
                        warn!(
                            stage = stage.name(),
                            after = earlier,
                            "translation stage configured after an augmentation stage"
                        );
                    }
                }
            }
        }

        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, StagePhase);

    impl ProvisioningStage for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn phase(&self) -> StagePhase {
            self.1
        }

        fn provision(
            &self,
            _env: &WorkspaceEnvironment,
            target: &mut InfrastructureEnvironment,
            _identity: &RuntimeIdentity,
        ) -> Result<(), InfrastructureError> {
            target.add_warning(0, self.0);
            Ok(())
        }
    }

    #[test]
    fn builder_keeps_given_order() {
        let pipeline = Pipeline::builder()
            .stage(Named("late", StagePhase::Augmentation))
            .stage(Named("early", StagePhase::Translation))
            .build();

        assert_eq!(pipeline.stage_names().collect::<Vec<_>>(), ["late", "early"]);
        assert_eq!(format!("{pipeline:?}"), r#"["late", "early"]"#);
    }

    #[test]
    fn shared_stage_is_the_same_instance() {
        let stage: Arc<dyn ProvisioningStage> = Arc::new(Named("one", StagePhase::Translation));
        let first = Pipeline::builder().shared_stage(Arc::clone(&stage)).build();
        let second = Pipeline::new(vec![Arc::clone(&stage)]);

        assert!(Arc::ptr_eq(&first.stages()[0], &second.stages()[0]));
        assert_eq!(Arc::strong_count(&stage), 3);
    }

    #[test]
    fn default_pipeline_is_empty() {
        let pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
    }
}
