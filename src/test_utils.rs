// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and cluster resources.

use crate::error::{Result, TenantStoreError};
use crate::kubernetes::{ClusterGateway, CreateOutcome};
use crate::storage::ObjectStoreApi;
use crate::types::{CephObjectStoreUser, StoreCredentials};
use http::{Request, Response};
use k8s_openapi::api::core::v1::{
    LoadBalancerIngress, LoadBalancerStatus, Node, NodeAddress, NodeCondition, NodeStatus, Secret,
    Service, ServicePort, ServiceSpec, ServiceStatus,
};
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::error::ErrorResponse;
use kube::{Client, ResourceExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service as TowerService;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Prefix match for sub-resources of a registered path
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl TowerService<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("resource", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a list JSON response of the given kind
pub fn list_json(kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": kind,
        "metadata": {"resourceVersion": "1"},
        "items": items
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 already exists response
pub fn already_exists_json(resource: &str, name: &str) -> String {
    status_json(409, "AlreadyExists", &format!("{} \"{}\" already exists", resource, name))
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

fn api_error(code: u16, reason: &str) -> TenantStoreError {
    TenantStoreError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("injected {}", reason),
        reason: reason.to_string(),
        code,
    }))
}

/// Secret as Rook writes it for an object store user
pub fn credentials_secret(access_key: &str, secret_key: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some("rook-ceph-object-user-store-a-alice".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([
            ("AccessKey".to_string(), ByteString(access_key.as_bytes().to_vec())),
            ("SecretKey".to_string(), ByteString(secret_key.as_bytes().to_vec())),
        ])),
        ..Default::default()
    }
}

/// Node with the given conditions (oldest first) and one external IP
pub fn make_node(name: &str, conditions: &[(&str, &str)], external_ip: &str) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        status: Some(NodeStatus {
            conditions: Some(
                conditions
                    .iter()
                    .map(|(type_, status)| NodeCondition {
                        type_: type_.to_string(),
                        status: status.to_string(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            addresses: Some(vec![
                NodeAddress {
                    type_: "InternalIP".to_string(),
                    address: "192.168.0.1".to_string(),
                },
                NodeAddress {
                    type_: "ExternalIP".to_string(),
                    address: external_ip.to_string(),
                },
            ]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Service of `type_` with `(name, port, node_port)` ports and load balancer ingress IPs
pub fn make_service(
    name: &str,
    type_: &str,
    cluster_ip: Option<&str>,
    ports: &[(&str, i32, Option<i32>)],
    ingress_ips: &[&str],
) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some(type_.to_string()),
            cluster_ip: cluster_ip.map(str::to_string),
            ports: Some(
                ports
                    .iter()
                    .map(|(name, port, node_port)| ServicePort {
                        name: Some(name.to_string()),
                        port: *port,
                        node_port: *node_port,
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        status: Some(ServiceStatus {
            load_balancer: Some(LoadBalancerStatus {
                ingress: Some(
                    ingress_ips
                        .iter()
                        .map(|ip| LoadBalancerIngress {
                            ip: Some(ip.to_string()),
                            ..Default::default()
                        })
                        .collect(),
                ),
            }),
            ..Default::default()
        }),
    }
}

#[derive(Default)]
struct GatewayState {
    users: Vec<CephObjectStoreUser>,
    secret_lists: usize,
    node_lists: usize,
    last_secret_selector: Option<String>,
    last_service_selector: Option<String>,
}

/// In-memory [`ClusterGateway`] with scripted resources and failures
#[derive(Default)]
pub struct FakeGateway {
    nodes: Vec<Node>,
    services: Vec<Service>,
    /// Secrets appear once this many lists have returned nothing
    secrets_after: usize,
    secrets: Vec<Secret>,
    fail_creates: bool,
    fail_secret_lists: bool,
    fail_service_lists: bool,
    hang_secret_lists: bool,
    state: Mutex<GatewayState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_secrets_after(mut self, empty_lists: usize, secrets: Vec<Secret>) -> Self {
        self.secrets_after = empty_lists;
        self.secrets = secrets;
        self
    }

    pub fn fail_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub fn fail_secret_lists(mut self) -> Self {
        self.fail_secret_lists = true;
        self
    }

    pub fn fail_service_lists(mut self) -> Self {
        self.fail_service_lists = true;
        self
    }

    pub fn hang_secret_lists(mut self) -> Self {
        self.hang_secret_lists = true;
        self
    }

    pub fn created_users(&self) -> Vec<CephObjectStoreUser> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn secret_lists(&self) -> usize {
        self.state.lock().unwrap().secret_lists
    }

    pub fn node_lists(&self) -> usize {
        self.state.lock().unwrap().node_lists
    }

    pub fn last_secret_selector(&self) -> Option<String> {
        self.state.lock().unwrap().last_secret_selector.clone()
    }

    pub fn last_service_selector(&self) -> Option<String> {
        self.state.lock().unwrap().last_service_selector.clone()
    }
}

impl ClusterGateway for FakeGateway {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.state.lock().unwrap().node_lists += 1;
        Ok(self.nodes.clone())
    }

    async fn list_services(&self, _namespace: &str, selector: &str) -> Result<Vec<Service>> {
        self.state.lock().unwrap().last_service_selector = Some(selector.to_string());
        if self.fail_service_lists {
            return Err(api_error(500, "InternalError"));
        }
        Ok(self.services.clone())
    }

    async fn list_secrets(&self, _namespace: &str, selector: &str) -> Result<Vec<Secret>> {
        let lists = {
            let mut state = self.state.lock().unwrap();
            state.secret_lists += 1;
            state.last_secret_selector = Some(selector.to_string());
            state.secret_lists
        };
        if self.hang_secret_lists {
            std::future::pending::<()>().await;
        }
        if self.fail_secret_lists {
            return Err(api_error(500, "InternalError"));
        }
        if lists > self.secrets_after {
            Ok(self.secrets.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn create_object_store_user(&self, user: &CephObjectStoreUser) -> Result<CreateOutcome> {
        if self.fail_creates {
            return Err(api_error(403, "Forbidden"));
        }
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.name_any() == user.name_any()) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        state.users.push(user.clone());
        Ok(CreateOutcome::Created)
    }
}

/// In-memory [`ObjectStoreApi`] recording every bucket creation
#[derive(Default)]
pub struct FakeObjectStore {
    failing: Vec<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject bucket creation through `endpoint`
    pub fn failing_on(mut self, endpoint: &str) -> Self {
        self.failing.push(endpoint.to_string());
        self
    }

    /// `(endpoint, bucket)` of every create call, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ObjectStoreApi for FakeObjectStore {
    async fn create_bucket(&self, endpoint: &str, _credentials: &StoreCredentials, bucket: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), bucket.to_string()));
        if self.failing.iter().any(|e| e == endpoint) {
            return Err(TenantStoreError::ProvisioningError("HTTP 503: SlowDown".to_string()));
        }
        Ok(())
    }
}
