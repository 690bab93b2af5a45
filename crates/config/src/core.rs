//! Per-stage configuration sections

use infraprov_types::{AccessMode, RestartPolicy};
use serde::{Deserialize, Serialize};

/// Unique name generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_suffix_length")]
    pub suffix_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            suffix_length: default_suffix_length(),
        }
    }
}

/// Restart policy enforced on every pod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartConfig {
    #[serde(default = "default_restart_policy")]
    pub policy: RestartPolicy,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            policy: default_restart_policy(),
        }
    }
}

/// Persistent storage claim shared by the workspace's volumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,
    #[serde(default = "default_claim_name")]
    pub claim_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    #[serde(default)]
    pub access_mode: AccessMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            claim_name: default_claim_name(),
            quantity: default_quantity(),
            access_mode: AccessMode::ReadWriteOnce,
        }
    }
}

/// Externally routable endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_tls_enabled")]
    pub tls_enabled: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            tls_enabled: default_tls_enabled(),
        }
    }
}

// Default value functions for serde
fn default_suffix_length() -> usize {
    8
}

fn default_restart_policy() -> RestartPolicy {
    RestartPolicy::Never
}

fn default_storage_enabled() -> bool {
    true
}

fn default_claim_name() -> String {
    "claim-infraprov-workspace".to_string()
}

fn default_quantity() -> String {
    "10Gi".to_string()
}

fn default_domain() -> String {
    "127.0.0.1.nip.io".to_string()
}

fn default_tls_enabled() -> bool {
    true
}
