// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Requesting object store credentials and waiting for them to materialize

use crate::error::{Result, TenantStoreError};
use crate::kubernetes::{ClusterGateway, CreateOutcome};
use crate::types::{CephObjectStoreUser, StoreCredentials, TenantId};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Cadence and bounds of the credential wait
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    /// Bound on a single secret listing
    pub request_timeout: Duration,
}

impl PollSettings {
    /// Upper bound on the number of poll iterations: one immediate poll plus
    /// one per elapsed interval until the deadline.
    pub fn max_polls(&self) -> u64 {
        let interval = self.interval.as_nanos().max(1);
        let ticks = self.timeout.as_nanos().div_ceil(interval);
        u64::try_from(ticks).unwrap_or(u64::MAX).saturating_add(1)
    }
}

/// Ask the backend to create credentials for `tenant`. Does not wait for them.
#[instrument(skip(gateway))]
pub async fn request_credentials<G: ClusterGateway>(
    gateway: &G,
    tenant: &TenantId,
    namespace: &str,
    store: &str,
) -> Result<()> {
    let user = CephObjectStoreUser::for_tenant(tenant, namespace, store);

    match gateway.create_object_store_user(&user).await? {
        CreateOutcome::Created => info!("Requested object store user {}/{}", namespace, tenant),
        CreateOutcome::AlreadyExists => {
            debug!("Object store user {}/{} already exists", namespace, tenant)
        }
    }
    Ok(())
}

/// Poll for a secret matching `selector` until it carries both keys or the
/// deadline passes. No list call is issued once the deadline has passed.
#[instrument(skip(gateway, poll))]
pub async fn await_credentials<G: ClusterGateway>(
    gateway: &G,
    namespace: &str,
    selector: &str,
    poll: &PollSettings,
) -> Result<StoreCredentials> {
    let deadline = Instant::now() + poll.timeout;
    let mut ticker = time::interval(poll.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    for attempt in 1..=poll.max_polls() {
        ticker.tick().await;

        let now = Instant::now();
        if now >= deadline {
            break;
        }

        let budget = (deadline - now).min(poll.request_timeout);
        let secrets = match time::timeout(budget, gateway.list_secrets(namespace, selector)).await {
            Ok(listed) => listed?,
            Err(_) if Instant::now() >= deadline => break,
            Err(_) => {
                return Err(TenantStoreError::RequestTimeout(format!(
                    "listing secrets '{}' in namespace {} took longer than {:?}",
                    selector, namespace, poll.request_timeout
                )))
            }
        };

        if let Some(credentials) = secrets.iter().find_map(StoreCredentials::from_secret) {
            info!("Credentials available after {} poll(s)", attempt);
            return Ok(credentials);
        }
        debug!(attempt, candidates = secrets.len(), "Credentials not available yet");
    }

    Err(TenantStoreError::CredentialsNotReady(format!(
        "no secret matching '{}' in namespace {} carried credentials within {:?}",
        selector, namespace, poll.timeout
    )))
}
