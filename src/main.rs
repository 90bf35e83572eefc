// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use tenantstore::api::{routes, serve, AppState};
use tenantstore::config::Config;
use tenantstore::kubernetes::{create_client, wait_for_object_store_user_crd};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting tenantstore");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: store={}/{}, credential_timeout={:?}",
        config.store_namespace, config.store_name, config.credential_timeout
    );

    let client = create_client(&config).await?;
    info!("Connected to Kubernetes cluster");

    // Storage provisioning needs Rook's CephObjectStoreUser CRD
    info!("Waiting for CephObjectStoreUser CRD to become available...");
    wait_for_object_store_user_crd(&client).await?;

    let state = Arc::new(AppState::from_config(client, &config));
    serve(config.listen_addr, routes(state)).await
}
