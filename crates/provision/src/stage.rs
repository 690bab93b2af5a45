//! The contract every provisioning stage implements

use infraprov_errors::InfrastructureError;
use infraprov_types::{InfrastructureEnvironment, RuntimeIdentity, StagePhase, WorkspaceEnvironment};

/// One transformation or augmentation step of the pipeline.
///
/// A single instance serves every provisioning run of the process, possibly
/// from several threads at once. Implementations therefore keep no per-run
/// state; anything they do hold must be immutable or internally synchronized.
///
/// A stage may rely on every stage configured before it having completed, and
/// must not assume anything about the stages after it.
pub trait ProvisioningStage: Send + Sync {
    /// Name used in logs and stage listings
    fn name(&self) -> &str;

    /// Phase the stage belongs to
    fn phase(&self) -> StagePhase;

    /// Apply the stage to `target`.
    ///
    /// `env` is read-only. Objects written by earlier stages are refined,
    /// never dropped.
    ///
    /// # Errors
    ///
    /// Returns an `InfrastructureError` when the stage cannot complete. The
    /// pipeline returns it to the caller as is.
    fn provision(
        &self,
        env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError>;
}
