//! Integration tests for config

#[cfg(test)]
mod tests {
    use infraprov_config::*;
    use infraprov_errors::{ConfigError, Error};
    use infraprov_types::{AccessMode, RestartPolicy};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        "INFRAPROV_RESTART_POLICY",
        "INFRAPROV_STORAGE_ENABLED",
        "INFRAPROV_ROUTE_DOMAIN",
        "INFRAPROV_ROUTE_TLS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[pipeline]
stages = ["servers", "unique_names", "tls_routes"]

[restart]
policy = "on_failure"

[storage]
enabled = false
access_mode = "read_write_many"

[routes]
domain = "apps.example.com"
tls_enabled = false
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(
            config.pipeline.stages,
            [
                StageKind::Servers,
                StageKind::UniqueNames,
                StageKind::TlsRoutes
            ]
        );
        assert_eq!(config.restart.policy, RestartPolicy::OnFailure);
        assert!(!config.storage.enabled);
        assert_eq!(config.storage.access_mode, AccessMode::ReadWriteMany);
        assert_eq!(config.storage.claim_name, "claim-infraprov-workspace");
        assert_eq!(config.routes.domain, "apps.example.com");
        assert!(!config.routes.tls_enabled);
        assert_eq!(config.naming.suffix_length, 8);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_unsound_stage_order_fails_to_load() {
        let err = Config::from_toml(
            r#"
[pipeline]
stages = ["tls_routes", "servers", "unique_names"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::StageOrder { .. })));
    }

    #[test]
    fn test_unknown_stage_is_a_parse_error() {
        let err = Config::from_toml(
            r#"
[pipeline]
stages = ["memory_limits"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let rendered = Config::default().to_toml().unwrap();
        let parsed = Config::from_toml(&rendered).unwrap();
        assert_eq!(parsed.pipeline, PipelineConfig::default());
        assert_eq!(parsed.restart.policy, RestartPolicy::Never);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("INFRAPROV_RESTART_POLICY", "always");
        std::env::set_var("INFRAPROV_STORAGE_ENABLED", "no");
        std::env::set_var("INFRAPROV_ROUTE_DOMAIN", "ws.internal");
        std::env::set_var("INFRAPROV_ROUTE_TLS", "0");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.restart.policy, RestartPolicy::Always);
        assert!(!config.storage.enabled);
        assert_eq!(config.routes.domain, "ws.internal");
        assert!(!config.routes.tls_enabled);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("INFRAPROV_RESTART_POLICY", "sometimes");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));

        clear_env();
    }
}
