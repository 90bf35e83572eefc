// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bucket creation against an S3-compatible object store

use crate::error::{Result, TenantStoreError};
use crate::types::{ResolvedEndpoint, StoreCredentials, TenantId};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::bucket_ops::BucketConfiguration;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Bucket-level operations of an S3-compatible store
pub trait ObjectStoreApi: Send + Sync {
    /// Create `bucket` through `endpoint` (a `scheme://host:port` URL).
    fn create_bucket(
        &self,
        endpoint: &str,
        credentials: &StoreCredentials,
        bucket: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Where a tenant bucket was created
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProvisionedBucket {
    pub name: String,
    pub endpoint: String,
}

/// Create the tenant bucket on the first candidate address that accepts it.
///
/// Candidates are tried in order: endpoints as resolved, addresses within
/// each. When every candidate fails, the error names each attempt.
#[instrument(skip(store, credentials, endpoints))]
pub async fn provision_bucket<S: ObjectStoreApi>(
    store: &S,
    tenant: &TenantId,
    credentials: &StoreCredentials,
    endpoints: &[ResolvedEndpoint],
) -> Result<ProvisionedBucket> {
    let bucket = tenant.as_str();
    let mut failures = Vec::new();

    // Boxed as `dyn Iterator + Send` so the closure types do not leak into
    // the future and break its higher-ranked `Send` bound
    let candidates: Box<dyn Iterator<Item = String> + Send + '_> =
        Box::new(endpoints.iter().flat_map(|endpoint| {
            endpoint
                .addresses
                .iter()
                .map(move |address| format!("{}://{}", endpoint.scheme(), address))
        }));

    for url in candidates {
        match store.create_bucket(&url, credentials, bucket).await {
            Ok(()) => {
                info!("Created bucket {} via {}", bucket, url);
                return Ok(ProvisionedBucket {
                    name: bucket.to_string(),
                    endpoint: url,
                });
            }
            Err(e) => {
                warn!("Creating bucket {} via {} failed: {}", bucket, url, e);
                failures.push(format!("{}: {}", url, e));
            }
        }
    }

    if failures.is_empty() {
        return Err(TenantStoreError::NoEndpoint(format!(
            "no candidate address to create bucket {}",
            bucket
        )));
    }
    Err(TenantStoreError::ProvisioningError(format!(
        "bucket {} could not be created: {}",
        bucket,
        failures.join("; ")
    )))
}

/// [`ObjectStoreApi`] speaking S3 with path-style addressing
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    region: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl S3ObjectStore {
    pub fn new(region: impl Into<String>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            region: region.into(),
            max_retries,
            retry_delay,
        }
    }
}

enum Attempt {
    Done,
    Rejected(String),
    Transport(String),
}

/// Classify an S3 response status; `BucketAlreadyOwnedByYou` is success.
fn classify_status(code: u16, body: &str) -> Attempt {
    if (200..300).contains(&code) || (code == 409 && body.contains("BucketAlreadyOwnedByYou")) {
        Attempt::Done
    } else {
        Attempt::Rejected(format!("HTTP {}: {}", code, body.trim()))
    }
}

impl ObjectStoreApi for S3ObjectStore {
    async fn create_bucket(&self, endpoint: &str, credentials: &StoreCredentials, bucket: &str) -> Result<()> {
        let region = Region::Custom {
            region: self.region.clone(),
            endpoint: endpoint.to_string(),
        };
        let creds = Credentials::new(
            Some(&credentials.access_key),
            Some(&credentials.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| TenantStoreError::ProvisioningError(format!("invalid credentials: {}", e)))?;

        retry_transport(self.max_retries, self.retry_delay, endpoint, || async {
            match Bucket::create_with_path_style(
                bucket,
                region.clone(),
                creds.clone(),
                BucketConfiguration::default(),
            )
            .await
            {
                Ok(response) => classify_status(response.response_code, &response.response_text),
                Err(S3Error::HttpFailWithBody(code, body)) => classify_status(code, &body),
                Err(e) => Attempt::Transport(e.to_string()),
            }
        })
        .await
    }
}

/// Run `attempt` until it completes or is rejected. Transport failures are
/// retried up to `max_retries` times, `retry_delay` apart.
async fn retry_transport<F, Fut>(
    max_retries: u32,
    retry_delay: Duration,
    endpoint: &str,
    mut attempt: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt().await {
            Attempt::Done => return Ok(()),
            Attempt::Rejected(reason) => return Err(TenantStoreError::ProvisioningError(reason)),
            Attempt::Transport(e) if attempts <= max_retries => {
                warn!(attempt = attempts, "S3 request to {} failed: {}, retrying", endpoint, e);
                sleep(retry_delay).await;
            }
            Attempt::Transport(e) => {
                return Err(TenantStoreError::ProvisioningError(format!(
                    "S3 request failed after {} attempt(s): {}",
                    attempts, e
                )))
            }
        }
    }
}
