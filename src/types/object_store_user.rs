// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::labels;
use crate::types::tenant::TenantId;
use kube::{api::ObjectMeta, CustomResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rook object store user. Rook's controller answers it with a credentials secret.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "ceph.rook.io", version = "v1", kind = "CephObjectStoreUser")]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStoreUserSpec {
    /// Name of the object store the user belongs to
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CephObjectStoreUser {
    /// Build the object store user requested for a tenant
    pub fn for_tenant(tenant: &TenantId, namespace: &str, store: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(tenant.to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(BTreeMap::from([(
                    labels::TENANT.to_string(),
                    tenant.to_string(),
                )])),
                ..Default::default()
            },
            spec: ObjectStoreUserSpec {
                store: store.to_string(),
                display_name: Some(format!("Tenant store user {}", tenant)),
            },
        }
    }
}
