#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the infraprov provisioner
//!
//! This crate holds the three values every provisioning run revolves around:
//! the caller's [`RuntimeIdentity`], the platform-neutral
//! [`WorkspaceEnvironment`] and the platform-specific
//! [`InfrastructureEnvironment`] that stages write into.

pub mod identity;
pub mod infrastructure;
pub mod workspace;

// Re-export commonly used types
pub use identity::RuntimeIdentity;
pub use infrastructure::{
    AccessMode, Container, ContainerPort, EnvVar, InfrastructureEnvironment, Pod, PodVolume,
    RestartPolicy, Route, RouteTls, Service, ServicePort, StorageClaim, TlsTermination,
    VolumeMount, Warning,
};
pub use workspace::{machine_name, MachineConfig, ServerConfig, VolumeConfig, WorkspaceEnvironment};

use serde::{Deserialize, Serialize};

/// Phase a provisioning stage belongs to.
///
/// Translation stages map what the workspace environment already declares;
/// augmentation stages add platform-only concerns on top of that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePhase {
    Translation,
    Augmentation,
}

impl std::fmt::Display for StagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Translation => write!(f, "translation"),
            Self::Augmentation => write!(f, "augmentation"),
        }
    }
}
