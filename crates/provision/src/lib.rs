#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Provisioning pipeline for infraprov
//!
//! Converts a platform-neutral [`WorkspaceEnvironment`] into the objects a
//! container platform needs, by running an ordered list of
//! [`ProvisioningStage`]s against one caller-owned
//! [`InfrastructureEnvironment`].
//!
//! Stages come in two phases. Translation stages map what the workspace
//! already declares ([`ServersStage`], [`EnvVarsStage`]); augmentation stages
//! add platform-only concerns ([`UniqueNamesStage`], [`PodLabelsStage`],
//! [`RestartPolicyStage`], [`StorageClaimStage`], [`TlsRoutesStage`]).
//! The [`Pipeline`] runs them in the order it was built with and stops at the
//! first failure. Order is a configuration decision, see
//! [`registry::pipeline_from_config`].
//!
//! [`WorkspaceEnvironment`]: infraprov_types::WorkspaceEnvironment
//! [`InfrastructureEnvironment`]: infraprov_types::InfrastructureEnvironment

pub mod naming;
pub mod once;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod stages;

pub use naming::{NameGenerator, RandomNameGenerator};
pub use once::{OneShot, OneShotState};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use registry::{default_pipeline, pipeline_from_config};
pub use stage::ProvisioningStage;
pub use stages::{
    EnvVarsStage, PodLabelsStage, RestartPolicyStage, ServersStage, StorageClaimStage,
    TlsRoutesStage, UniqueNamesStage,
};
