//! Externally routable endpoints for translated servers

use infraprov_config::{RouteConfig, StageKind};
use infraprov_errors::InfrastructureError;
use infraprov_types::{
    InfrastructureEnvironment, Route, RouteTls, RuntimeIdentity, StagePhase, TlsTermination,
    WorkspaceEnvironment,
};

use super::servers::parse_port;
use crate::stage::ProvisioningStage;

/// Adds one route per server of every service.
///
/// Routes are named after the pod's generated name and served under the
/// configured domain. With TLS on, they terminate at the edge, redirect
/// plain HTTP, and the server entries switch to `https`/`wss`.
#[derive(Debug, Clone)]
pub struct TlsRoutesStage {
    config: RouteConfig,
}

impl TlsRoutesStage {
    #[must_use]
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }
}

impl Default for TlsRoutesStage {
    fn default() -> Self {
        Self::new(RouteConfig::default())
    }
}

impl ProvisioningStage for TlsRoutesStage {
    fn name(&self) -> &str {
        StageKind::TlsRoutes.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Augmentation
    }

    fn provision(
        &self,
        _env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        _identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        let InfrastructureEnvironment {
            pods,
            services,
            routes,
            ..
        } = target;

        for (service_key, service) in services.iter_mut() {
            let pod = pods.get(&service.pod).ok_or_else(|| {
                InfrastructureError::new(format!(
                    "service '{service_key}' refers to unknown pod '{}'",
                    service.pod
                ))
            })?;
            let host_label = pod.name.replace('.', "-");

            for (server_name, server) in &mut service.servers {
                let (port, _) = parse_port(server_name, &server.port)?;
                let route_name = format!("{}-{server_name}", pod.name);

                routes.entry(route_name.clone()).or_insert_with(|| Route {
                    name: route_name,
                    host: format!("{server_name}-{host_label}.{}", self.config.domain),
                    service: service.name.clone(),
                    target_port: port,
                    server: server_name.clone(),
                    tls: self.config.tls_enabled.then_some(RouteTls {
                        termination: TlsTermination::Edge,
                        insecure_redirect: true,
                    }),
                });

                if self.config.tls_enabled {
                    if let Some(secure) = server.protocol.as_deref().and_then(secure_protocol) {
                        server.protocol = Some(secure.to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

fn secure_protocol(protocol: &str) -> Option<&'static str> {
    match protocol {
        "http" => Some("https"),
        "ws" => Some("wss"),
        _ => None,
    }
}
