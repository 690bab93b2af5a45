//! Translate declared servers into container ports and services

use infraprov_config::StageKind;
use infraprov_errors::InfrastructureError;
use infraprov_types::{
    ContainerPort, InfrastructureEnvironment, RuntimeIdentity, Service, ServicePort, StagePhase,
    WorkspaceEnvironment,
};

use super::ORIGINAL_NAME_LABEL;
use crate::stage::ProvisioningStage;

/// Exposes every server a machine declares.
///
/// Each container with servers gets its ports opened and one service named
/// `<pod>-<container>` selecting the pod by its original name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServersStage;

impl ProvisioningStage for ServersStage {
    fn name(&self) -> &str {
        StageKind::Servers.as_str()
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Translation
    }

    fn provision(
        &self,
        env: &WorkspaceEnvironment,
        target: &mut InfrastructureEnvironment,
        _identity: &RuntimeIdentity,
    ) -> Result<(), InfrastructureError> {
        let InfrastructureEnvironment { pods, services, .. } = target;

        for (pod_key, pod) in pods.iter_mut() {
            for container in &mut pod.containers {
                let Some(machine) = env.machine(pod_key, &container.name) else {
                    continue;
                };
                if machine.servers.is_empty() {
                    continue;
                }

                let mut ports: Vec<ServicePort> = Vec::new();
                for (server_name, server) in &machine.servers {
                    let (port, protocol) = parse_port(server_name, &server.port)?;

                    if !container
                        .ports
                        .iter()
                        .any(|p| p.port == port && p.protocol == protocol)
                    {
                        container.ports.push(ContainerPort {
                            port,
                            protocol: protocol.clone(),
                        });
                    }
                    if !ports.iter().any(|p| p.port == port && p.protocol == protocol) {
                        ports.push(ServicePort {
                            name: server_name.clone(),
                            port,
                            protocol,
                        });
                    }
                }

                let selector_value = pod
                    .labels
                    .entry(ORIGINAL_NAME_LABEL.to_string())
                    .or_insert_with(|| pod_key.clone())
                    .clone();

                let service_name = format!("{pod_key}-{}", container.name);
                let service = services
                    .entry(service_name.clone())
                    .or_insert_with(|| Service {
                        name: service_name,
                        pod: pod_key.clone(),
                        selector: [(ORIGINAL_NAME_LABEL.to_string(), selector_value)]
                            .into_iter()
                            .collect(),
                        ports: Vec::new(),
                        servers: std::collections::BTreeMap::new(),
                    });

                for port in ports {
                    if !service
                        .ports
                        .iter()
                        .any(|p| p.port == port.port && p.protocol == port.protocol)
                    {
                        service.ports.push(port);
                    }
                }
                for (server_name, server) in &machine.servers {
                    service
                        .servers
                        .entry(server_name.clone())
                        .or_insert_with(|| server.clone());
                }

                tracing::debug!(
                    pod = %pod_key,
                    container = %container.name,
                    servers = machine.servers.len(),
                    "servers exposed"
                );
            }
        }

        Ok(())
    }
}

/// Split `"8080/tcp"` into port and transport; transport defaults to `tcp`
pub(crate) fn parse_port(server: &str, raw: &str) -> Result<(u16, String), InfrastructureError> {
    let (port, protocol) = match raw.split_once('/') {
        Some((port, protocol)) => (port.trim(), protocol.trim().to_ascii_lowercase()),
        None => (raw.trim(), "tcp".to_string()),
    };

    let port: u16 = port.parse().map_err(|e| {
        InfrastructureError::with_cause(
            format!("server '{server}' declares invalid port '{raw}'"),
            e,
        )
    })?;
    if port == 0 {
        return Err(InfrastructureError::new(format!(
            "server '{server}' declares port 0"
        )));
    }
    if protocol.is_empty() {
        return Err(InfrastructureError::new(format!(
            "server '{server}' declares an empty transport in '{raw}'"
        )));
    }

    Ok((port, protocol))
}
