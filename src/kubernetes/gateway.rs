// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read/list/create access to cluster resources used by storage provisioning

use crate::error::{is_already_exists, Result};
use crate::types::CephObjectStoreUser;
use k8s_openapi::api::core::v1::{Node, Secret, Service};
use kube::{
    api::{ListParams, PostParams},
    Api, Client, ResourceExt,
};
use std::future::Future;
use tracing::{debug, instrument};

/// Result of an idempotent create
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// The cluster resource operations storage provisioning depends on.
pub trait ClusterGateway: Send + Sync {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>>> + Send;

    fn list_services(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Service>>> + Send;

    fn list_secrets(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Secret>>> + Send;

    /// Create an object store user; an existing user is reported, not failed.
    fn create_object_store_user(
        &self,
        user: &CephObjectStoreUser,
    ) -> impl Future<Output = Result<CreateOutcome>> + Send;
}

/// [`ClusterGateway`] backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
}

impl KubeGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ClusterGateway for KubeGateway {
    #[instrument(skip(self))]
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        Ok(nodes.list(&ListParams::default()).await?.items)
    }

    #[instrument(skip(self))]
    async fn list_services(&self, namespace: &str, selector: &str) -> Result<Vec<Service>> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list = services.list(&ListParams::default().labels(selector)).await?;
        debug!("Found {} services matching '{}'", list.items.len(), selector);
        Ok(list.items)
    }

    #[instrument(skip(self))]
    async fn list_secrets(&self, namespace: &str, selector: &str) -> Result<Vec<Secret>> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(secrets.list(&ListParams::default().labels(selector)).await?.items)
    }

    #[instrument(skip(self, user), fields(user = %user.name_any()))]
    async fn create_object_store_user(&self, user: &CephObjectStoreUser) -> Result<CreateOutcome> {
        let namespace = user.namespace().unwrap_or_default();
        let users: Api<CephObjectStoreUser> = Api::namespaced(self.client.clone(), &namespace);

        match users.create(&PostParams::default(), user).await {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(e) if is_already_exists(&e) => Ok(CreateOutcome::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }
}
