// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const ROOK_GROUP: &str = "ceph.rook.io";
const OBJECT_STORE_USER_KIND: &str = "CephObjectStoreUser";

/// Wait for the CephObjectStoreUser CRD to become available in the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_object_store_user_crd(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match check_object_store_user_crd_exists(client).await {
            Ok(true) => {
                info!("{} CRD ({}/v1) is available", OBJECT_STORE_USER_KIND, ROOK_GROUP);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "{} CRD ({}/v1) not yet available, waiting {} seconds...",
                    OBJECT_STORE_USER_KIND, ROOK_GROUP, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for {} CRD: {}, retrying in {} seconds...",
                    OBJECT_STORE_USER_KIND, e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

async fn check_object_store_user_crd_exists(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[ROOK_GROUP])
        .run()
        .await?;

    let found = discovery
        .groups()
        .filter(|group| group.name() == ROOK_GROUP)
        .flat_map(|group| group.recommended_resources())
        .any(|(ar, _)| ar.kind == OBJECT_STORE_USER_KIND && ar.version == "v1");
    Ok(found)
}
