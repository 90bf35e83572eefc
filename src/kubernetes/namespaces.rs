// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tenant namespace and secret management

use crate::constants::labels;
use crate::error::{is_already_exists, Result, TenantStoreError};
use k8s_openapi::api::core::v1::{Namespace, Secret};
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

fn tenant_labels(tenant: &str) -> Option<BTreeMap<String, String>> {
    Some(BTreeMap::from([(labels::TENANT.to_string(), tenant.to_string())]))
}

/// Maximum length of a DNS-1123 label
const MAX_NAMESPACE_LEN: usize = 63;

/// Check that `name` is a valid namespace name (a DNS-1123 label)
pub fn validate_namespace_name(name: &str) -> Result<()> {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let valid = !name.is_empty()
        && name.len() <= MAX_NAMESPACE_LEN
        && name.chars().all(|c| alnum(c) || c == '-')
        && name.starts_with(alnum)
        && name.ends_with(alnum);

    if !valid {
        return Err(TenantStoreError::InvalidRequest(format!(
            "namespace name '{}' must be at most {} lowercase alphanumerics or '-', starting and ending with an alphanumeric",
            name, MAX_NAMESPACE_LEN
        )));
    }
    Ok(())
}

/// Ensure a namespace labelled for `tenant` exists, create if it doesn't
#[instrument(skip(client))]
pub async fn ensure_tenant_namespace(client: &Client, namespace: &str, tenant: &str) -> Result<()> {
    validate_namespace_name(namespace)?;
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Creating namespace {}", namespace);
            let ns = Namespace {
                metadata: ObjectMeta {
                    name: Some(namespace.to_string()),
                    labels: tenant_labels(tenant),
                    ..Default::default()
                },
                ..Default::default()
            };
            match namespaces.create(&PostParams::default(), &ns).await {
                Ok(_) => info!("Namespace {} created successfully", namespace),
                Err(e) if is_already_exists(&e) => debug!("Namespace {} created concurrently", namespace),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
        Err(e) => Err(TenantStoreError::NamespaceError(format!(
            "Failed to check/create namespace {}: {}",
            namespace, e
        ))),
    }
}

/// Store a single key/value pair for `tenant` as a secret; an existing secret is left untouched
#[instrument(skip(client, value))]
pub async fn ensure_tenant_secret(
    client: &Client,
    namespace: &str,
    tenant: &str,
    secret_name: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(secret_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: tenant_labels(tenant),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            key.to_string(),
            ByteString(value.as_bytes().to_vec()),
        )])),
        ..Default::default()
    };

    match secrets.create(&PostParams::default(), &secret).await {
        Ok(_) => {
            info!("Secret {}/{} created", namespace, secret_name);
            Ok(())
        }
        Err(e) if is_already_exists(&e) => {
            debug!("Secret {}/{} already exists", namespace, secret_name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
