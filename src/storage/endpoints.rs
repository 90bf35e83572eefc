// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolving reachable endpoints for a service based on how it is exposed

use crate::constants::endpoints::MAX_NODE_ADDRESSES;
use crate::error::{Result, TenantStoreError};
use crate::kubernetes::ClusterGateway;
use crate::types::{ResolvedEndpoint, ServiceExposure};
use k8s_openapi::api::core::v1::{Node, Service};
use kube::ResourceExt;
use tracing::{debug, instrument};

/// Accepted service port names, compared case-insensitively
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortFilter {
    names: &'static [&'static str],
}

impl PortFilter {
    /// Ports of the object store front end
    pub const OBJECT_STORE: PortFilter = PortFilter::new(&["http", "https"]);
    /// Ports of the ingress gateway that routes to functions
    pub const INGRESS_GATEWAY: PortFilter = PortFilter::new(&["http2", "https"]);

    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn matches(&self, port_name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(port_name))
    }
}

/// Resolve every endpoint exposed by the services matching `selector` in
/// `namespace`. Fails with `NoEndpoint` when nothing is reachable.
#[instrument(skip(gateway))]
pub async fn resolve_endpoints<G: ClusterGateway>(
    gateway: &G,
    namespace: &str,
    selector: &str,
    ports: &PortFilter,
) -> Result<Vec<ResolvedEndpoint>> {
    let services = gateway.list_services(namespace, selector).await?;
    // Listed lazily, at most once per call
    let mut node_addresses: Option<Vec<String>> = None;
    let mut endpoints = Vec::new();

    for service in &services {
        let Some(exposure) = ServiceExposure::of(service) else {
            debug!("Service {} has an unsupported type, skipping", service.name_any());
            continue;
        };

        let addresses = match exposure {
            ServiceExposure::ClusterIP => cluster_ip_addresses(service),
            ServiceExposure::NodePort => {
                if node_addresses.is_none() {
                    let nodes = gateway.list_nodes().await?;
                    node_addresses = Some(ready_node_addresses(&nodes, MAX_NODE_ADDRESSES));
                }
                node_addresses.clone().unwrap_or_default()
            }
            ServiceExposure::LoadBalancer => load_balancer_addresses(service),
        };

        if addresses.is_empty() {
            debug!("Service {} ({:?}) has no reachable address", service.name_any(), exposure);
            continue;
        }

        endpoints.extend(service_endpoints(service, exposure, &addresses, ports));
    }

    if endpoints.is_empty() {
        return Err(TenantStoreError::NoEndpoint(format!(
            "no service matching '{}' in namespace {} exposes a reachable port",
            selector, namespace
        )));
    }

    debug!("Resolved endpoints: {:?}", endpoints);
    Ok(endpoints)
}

fn service_endpoints(
    service: &Service,
    exposure: ServiceExposure,
    addresses: &[String],
    ports: &PortFilter,
) -> Vec<ResolvedEndpoint> {
    let service_ports = service.spec.as_ref().and_then(|s| s.ports.as_ref());

    service_ports
        .into_iter()
        .flatten()
        .filter_map(|port| {
            let name = port.name.as_deref().filter(|name| ports.matches(name))?;
            let number = exposure.port_for(port)?;
            Some(ResolvedEndpoint {
                protocol: name.to_string(),
                addresses: addresses
                    .iter()
                    .map(|address| format!("{}:{}", address, number))
                    .collect(),
            })
        })
        .collect()
}

fn cluster_ip_addresses(service: &Service) -> Vec<String> {
    service
        .spec
        .as_ref()
        .and_then(|s| s.cluster_ip.clone())
        .filter(|ip| !ip.is_empty() && ip != "None")
        .into_iter()
        .collect()
}

fn load_balancer_addresses(service: &Service) -> Vec<String> {
    service
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .into_iter()
        .flatten()
        .filter_map(|ingress| ingress.ip.clone().or_else(|| ingress.hostname.clone()))
        .filter(|address| !address.is_empty())
        .collect()
}

/// A node is ready when its most recent condition is `Ready=True`
pub fn is_node_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.last())
        .is_some_and(|c| c.type_ == "Ready" && c.status == "True")
}

/// Collect up to `limit` external IP or hostname addresses from ready nodes
pub fn ready_node_addresses(nodes: &[Node], limit: usize) -> Vec<String> {
    nodes
        .iter()
        .filter(|node| {
            let ready = is_node_ready(node);
            if !ready {
                debug!("Node {} is not ready, skipping", node.name_any());
            }
            ready
        })
        .filter_map(|node| node.status.as_ref()?.addresses.as_ref())
        .flatten()
        .filter(|a| a.type_ == "ExternalIP" || a.type_ == "Hostname")
        .filter(|a| !a.address.is_empty())
        .map(|a| a.address.clone())
        .take(limit)
        .collect()
}
