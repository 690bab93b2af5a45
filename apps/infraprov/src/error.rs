//! CLI error handling

use std::fmt;
use std::path::PathBuf;

use infraprov_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration, provisioning or file error
    Provision(infraprov_errors::Error),
    /// Input document could not be decoded
    Input { path: PathBuf, error: serde_json::Error },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Provision(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Input { path, error } => {
                write!(f, "Invalid input in {}: {error}", path.display())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Provision(e) => Some(e),
            CliError::Input { error, .. } => Some(error),
        }
    }
}

impl From<infraprov_errors::Error> for CliError {
    fn from(e: infraprov_errors::Error) -> Self {
        CliError::Provision(e)
    }
}

impl From<infraprov_errors::InfrastructureError> for CliError {
    fn from(e: infraprov_errors::InfrastructureError) -> Self {
        CliError::Provision(e.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Provision(e.into())
    }
}
