//! Stage order of the deployed pipeline
//!
//! The orchestrator runs stages in whatever order it is handed. Keeping that
//! order sound is a configuration concern, so the rules live here and are
//! checked once when the configuration is loaded.

use infraprov_errors::ConfigError;
use infraprov_types::StagePhase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages known to the provisioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Servers,
    EnvVars,
    UniqueNames,
    PodLabels,
    RestartPolicy,
    StorageClaims,
    TlsRoutes,
}

/// `(stage, must run after)` pairs
const DEPENDENCIES: &[(StageKind, StageKind)] = &[
    (StageKind::PodLabels, StageKind::UniqueNames),
    (StageKind::StorageClaims, StageKind::UniqueNames),
    (StageKind::StorageClaims, StageKind::RestartPolicy),
    (StageKind::TlsRoutes, StageKind::UniqueNames),
    (StageKind::TlsRoutes, StageKind::Servers),
];

impl StageKind {
    /// Every stage in the default deployed order
    pub const ALL: [StageKind; 7] = [
        StageKind::Servers,
        StageKind::EnvVars,
        StageKind::UniqueNames,
        StageKind::PodLabels,
        StageKind::RestartPolicy,
        StageKind::StorageClaims,
        StageKind::TlsRoutes,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::EnvVars => "env_vars",
            Self::UniqueNames => "unique_names",
            Self::PodLabels => "pod_labels",
            Self::RestartPolicy => "restart_policy",
            Self::StorageClaims => "storage_claims",
            Self::TlsRoutes => "tls_routes",
        }
    }

    #[must_use]
    pub fn phase(self) -> StagePhase {
        match self {
            Self::Servers | Self::EnvVars => StagePhase::Translation,
            Self::UniqueNames
            | Self::PodLabels
            | Self::RestartPolicy
            | Self::StorageClaims
            | Self::TlsRoutes => StagePhase::Augmentation,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered stage list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_stages")]
    pub stages: Vec<StageKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

fn default_stages() -> Vec<StageKind> {
    StageKind::ALL.to_vec()
}

impl PipelineConfig {
    /// Check the configured order against the stage dependencies
    ///
    /// A dependency only applies when both stages are listed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateStage` if a stage is listed twice and
    /// `ConfigError::StageOrder` if a stage precedes one it depends on or a
    /// translation stage follows an augmentation stage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, stage) in self.stages.iter().enumerate() {
            if self.stages[..index].contains(stage) {
                return Err(ConfigError::DuplicateStage {
                    stage: stage.to_string(),
                });
            }
        }

        for &(stage, after) in DEPENDENCIES {
            if let (Some(stage_at), Some(after_at)) = (self.position(stage), self.position(after))
            {
                if stage_at < after_at {
                    return Err(ConfigError::StageOrder {
                        stage: stage.to_string(),
                        after: after.to_string(),
                    });
                }
            }
        }

        let mut last_augmentation = None;
        for &stage in &self.stages {
            match stage.phase() {
                StagePhase::Augmentation => last_augmentation = Some(stage),
                StagePhase::Translation => {
                    if let Some(augmentation) = last_augmentation {
                        return Err(ConfigError::StageOrder {
                            stage: augmentation.to_string(),
                            after: stage.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn position(&self, kind: StageKind) -> Option<usize> {
        self.stages.iter().position(|&stage| stage == kind)
    }
}
