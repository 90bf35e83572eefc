// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::secret_keys;
use k8s_openapi::api::core::v1::{Secret, Service, ServicePort};
use serde::Serialize;
use std::fmt;

/// Access credentials for the object store
#[derive(Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl StoreCredentials {
    /// Read credentials from a secret. Returns `None` unless both keys are
    /// present, non-empty and valid UTF-8.
    pub fn from_secret(secret: &Secret) -> Option<Self> {
        let data = secret.data.as_ref()?;
        let read = |key: &str| {
            data.get(key)
                .and_then(|v| String::from_utf8(v.0.clone()).ok())
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            access_key: read(secret_keys::ACCESS_KEY)?,
            secret_key: read(secret_keys::SECRET_KEY)?,
        })
    }
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// How a service is exposed outside the cluster network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceExposure {
    ClusterIP,
    NodePort,
    LoadBalancer,
}

impl ServiceExposure {
    /// Exposure of a service, `None` for types that have no resolvable address
    /// (such as ExternalName).
    pub fn of(service: &Service) -> Option<Self> {
        let type_ = service.spec.as_ref().and_then(|s| s.type_.as_deref());
        match type_ {
            None | Some("ClusterIP") => Some(Self::ClusterIP),
            Some("NodePort") => Some(Self::NodePort),
            Some("LoadBalancer") => Some(Self::LoadBalancer),
            Some(_) => None,
        }
    }

    /// Port number reachable for this exposure
    pub fn port_for(&self, port: &ServicePort) -> Option<i32> {
        match self {
            Self::ClusterIP => Some(port.port),
            Self::NodePort => port.node_port,
            Self::LoadBalancer => port.node_port.or(Some(port.port)),
        }
    }
}

/// A protocol and the `address:port` strings it is reachable on
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedEndpoint {
    pub protocol: String,
    #[serde(rename = "endpoints")]
    pub addresses: Vec<String>,
}

impl ResolvedEndpoint {
    /// URL scheme to reach this endpoint with
    pub fn scheme(&self) -> &'static str {
        if self.protocol.eq_ignore_ascii_case("https") {
            "https"
        } else {
            "http"
        }
    }
}
