//! The single failure kind produced by provisioning stages

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::UserFacingError;

type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Failure raised by a provisioning stage.
///
/// The pipeline hands it back to the caller untouched, so whatever a stage
/// puts in here is exactly what the caller sees.
#[derive(Clone)]
pub struct InfrastructureError {
    message: String,
    cause: Option<Cause>,
}

impl InfrastructureError {
    /// Create an error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error wrapping an underlying cause
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Human-readable description of the failure
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying cause, if the stage supplied one
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Debug for InfrastructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfrastructureError")
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .finish()
    }
}

impl fmt::Display for InfrastructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for InfrastructureError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Equal messages and the very same cause object (or no cause on either side).
impl PartialEq for InfrastructureError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && match (&self.cause, &other.cause) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl UserFacingError for InfrastructureError {
    fn user_message(&self) -> Cow<'_, str> {
        match &self.cause {
            Some(cause) => Cow::Owned(format!("{}: {cause}", self.message)),
            None => Cow::Borrowed(&self.message),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("The workspace was not started. Fix the environment definition and start it again.")
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("infrastructure.provision_failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = InfrastructureError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert!(err.cause().is_none());
        assert!(StdError::source(&err).is_none());
    }

    #[test]
    fn source_exposes_cause() {
        let parse = "80x".parse::<u16>().unwrap_err();
        let err = InfrastructureError::with_cause("bad port", parse.clone());
        assert_eq!(err.message(), "bad port");
        assert_eq!(
            StdError::source(&err).map(ToString::to_string),
            Some(parse.to_string())
        );
        assert_eq!(err.user_message(), format!("bad port: {parse}"));
    }

    #[test]
    fn clones_share_the_cause() {
        let err = InfrastructureError::with_cause("io", std::io::Error::other("disk"));
        let cloned = err.clone();
        assert_eq!(err, cloned);

        let rebuilt = InfrastructureError::with_cause("io", std::io::Error::other("disk"));
        assert_ne!(err, rebuilt);
    }
}
