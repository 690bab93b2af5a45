//! Assemble the deployed pipeline from configuration

use std::sync::Arc;

use infraprov_config::{Config, StageKind};
use infraprov_errors::Error;

use crate::naming::{NameGenerator, RandomNameGenerator};
use crate::pipeline::Pipeline;
use crate::stage::ProvisioningStage;
use crate::stages::{
    EnvVarsStage, PodLabelsStage, RestartPolicyStage, ServersStage, StorageClaimStage,
    TlsRoutesStage, UniqueNamesStage,
};

/// Build the stage for one configured kind
#[must_use]
pub fn stage_for(
    kind: StageKind,
    config: &Config,
    names: &Arc<dyn NameGenerator>,
) -> Arc<dyn ProvisioningStage> {
    match kind {
        StageKind::Servers => Arc::new(ServersStage),
        StageKind::EnvVars => Arc::new(EnvVarsStage),
        StageKind::UniqueNames => Arc::new(UniqueNamesStage::new(Arc::clone(names))),
        StageKind::PodLabels => Arc::new(PodLabelsStage),
        StageKind::RestartPolicy => Arc::new(RestartPolicyStage::new(config.restart.policy)),
        StageKind::StorageClaims => Arc::new(StorageClaimStage::new(config.storage.clone())),
        StageKind::TlsRoutes => Arc::new(TlsRoutesStage::new(config.routes.clone())),
    }
}

/// Build the pipeline in the order `[pipeline].stages` lists
///
/// # Errors
///
/// Returns a configuration error if the stage order breaks a dependency
/// between stages.
pub fn pipeline_from_config(
    config: &Config,
    names: Arc<dyn NameGenerator>,
) -> Result<Pipeline, Error> {
    config.pipeline.validate()?;

    let pipeline = config
        .pipeline
        .stages
        .iter()
        .fold(Pipeline::builder(), |builder, &kind| {
            builder.shared_stage(stage_for(kind, config, &names))
        })
        .build();

    tracing::debug!(stages = ?pipeline, "pipeline assembled");
    Ok(pipeline)
}

/// Pipeline from configuration with random name generation
///
/// # Errors
///
/// Returns a configuration error if the stage order is unsound.
pub fn default_pipeline(config: &Config) -> Result<Pipeline, Error> {
    pipeline_from_config(
        config,
        Arc::new(RandomNameGenerator::new(config.naming.suffix_length)),
    )
}
