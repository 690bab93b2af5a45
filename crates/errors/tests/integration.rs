//! Integration tests for error types

#[cfg(test)]
mod tests {
    use infraprov_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = InfrastructureError::new("no such pod").into();
        assert!(matches!(err, Error::Infrastructure(_)));

        let err: Error = ConfigError::DuplicateStage {
            stage: "servers".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::StageOrder {
            stage: "tls_routes".into(),
            after: "unique_names".into(),
        };
        assert_eq!(
            err.to_string(),
            "stage 'tls_routes' must run after 'unique_names'"
        );
    }

    #[test]
    fn test_infrastructure_errors_are_not_retryable() {
        let err: Error = InfrastructureError::new("boom").into();
        assert!(!err.is_retryable());
        assert_eq!(err.user_code(), Some("infrastructure.provision_failed"));
        assert_eq!(err.user_message(), "boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                path: None,
                ..
            }
        ));
    }
}
