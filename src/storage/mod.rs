// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-tenant object storage provisioning.
//!
//! A provisioning run requests an object store user, waits for its
//! credentials secret, resolves the object store endpoints and creates the
//! tenant bucket. Each stage aborts the run on error; nothing created by an
//! earlier stage is rolled back.

pub mod bucket;
pub mod credentials;
pub mod endpoints;

pub use bucket::{provision_bucket, ObjectStoreApi, ProvisionedBucket, S3ObjectStore};
pub use credentials::{await_credentials, request_credentials, PollSettings};
pub use endpoints::{resolve_endpoints, PortFilter};

use crate::config::Config;
use crate::constants::labels;
use crate::error::Result;
use crate::kubernetes::ClusterGateway;
use crate::types::{ResolvedEndpoint, StoreCredentials, TenantId};
use futures::future::{BoxFuture, FutureExt};
use tracing::{info, instrument};

/// Where the object store lives and how long to wait for credentials
#[derive(Clone, Debug)]
pub struct StoreSettings {
    pub namespace: String,
    pub store_name: String,
    pub store_label_key: String,
    pub poll: PollSettings,
}

impl StoreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            namespace: config.store_namespace.clone(),
            store_name: config.store_name.clone(),
            store_label_key: config.store_label_key.clone(),
            poll: PollSettings {
                interval: config.credential_poll_interval,
                timeout: config.credential_timeout,
                request_timeout: config.request_timeout,
            },
        }
    }

    /// Selects the object store's front-end services
    pub fn store_selector(&self) -> String {
        format!("{}={}", self.store_label_key, self.store_name)
    }

    /// Selects the credentials secret of `tenant`
    pub fn credentials_selector(&self, tenant: &TenantId) -> String {
        format!("{},{}={}", self.store_selector(), labels::USER, tenant)
    }
}

/// Everything a tenant needs to use its bucket
#[derive(Clone, Debug)]
pub struct ProvisionedStorage {
    pub bucket: ProvisionedBucket,
    pub endpoints: Vec<ResolvedEndpoint>,
    pub credentials: StoreCredentials,
}

pub struct StorageProvisioner<G, S> {
    gateway: G,
    object_store: S,
    settings: StoreSettings,
}

impl<G: ClusterGateway, S: ObjectStoreApi> StorageProvisioner<G, S> {
    pub fn new(gateway: G, object_store: S, settings: StoreSettings) -> Self {
        Self {
            gateway,
            object_store,
            settings,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run every provisioning stage for `tenant`
    pub fn provision<'a>(&'a self, tenant: &'a TenantId) -> BoxFuture<'a, Result<ProvisionedStorage>> {
        self.run(tenant).boxed()
    }

    #[instrument(skip(self), fields(store = %self.settings.store_name))]
    async fn run(&self, tenant: &TenantId) -> Result<ProvisionedStorage> {
        let settings = &self.settings;

        request_credentials(&self.gateway, tenant, &settings.namespace, &settings.store_name).await?;

        let credentials = await_credentials(
            &self.gateway,
            &settings.namespace,
            &settings.credentials_selector(tenant),
            &settings.poll,
        )
        .await?;

        let endpoints = resolve_endpoints(
            &self.gateway,
            &settings.namespace,
            &settings.store_selector(),
            &PortFilter::OBJECT_STORE,
        )
        .await?;

        let bucket = provision_bucket(&self.object_store, tenant, &credentials, &endpoints).await?;
        info!("Provisioned storage for tenant {}", tenant);

        Ok(ProvisionedStorage {
            bucket,
            endpoints,
            credentials,
        })
    }
}
