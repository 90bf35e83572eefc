// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the Rook object store tenants get buckets in
    pub store_name: String,
    /// Namespace the Rook cluster (and its object store) lives in
    pub store_namespace: String,
    /// Label key that ties services and secrets to the object store
    pub store_label_key: String,
    pub credential_poll_interval: Duration,
    pub credential_timeout: Duration,
    /// Upper bound for a single Kubernetes API call
    pub request_timeout: Duration,
    pub s3_region: String,
    pub s3_max_retries: u32,
    pub s3_retry_delay: Duration,
    pub gateway_namespace: String,
    pub gateway_selector: String,
    pub listen_addr: SocketAddr,
    /// Explicit kubeconfig; in-cluster or inferred config is used when unset
    pub kubeconfig_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_name = lookup("STORE_NAME").context("STORE_NAME environment variable not set")?;
        if store_name.is_empty() {
            bail!("STORE_NAME must not be empty");
        }

        let poll_ms: u64 = parse_or(&lookup, "CREDENTIAL_POLL_INTERVAL_MS", defaults::CREDENTIAL_POLL_INTERVAL_MS)?;
        let timeout_secs: u64 = parse_or(&lookup, "CREDENTIAL_TIMEOUT_SECS", defaults::CREDENTIAL_TIMEOUT_SECS)?;
        if poll_ms == 0 || timeout_secs == 0 {
            bail!("CREDENTIAL_POLL_INTERVAL_MS and CREDENTIAL_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            store_name,
            store_namespace: lookup("STORE_NAMESPACE").unwrap_or_else(|| defaults::STORE_NAMESPACE.to_string()),
            store_label_key: lookup("STORE_LABEL_KEY").unwrap_or_else(|| defaults::STORE_LABEL_KEY.to_string()),
            credential_poll_interval: Duration::from_millis(poll_ms),
            credential_timeout: Duration::from_secs(timeout_secs),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults::REQUEST_TIMEOUT_SECS)?),
            s3_region: lookup("S3_REGION").unwrap_or_else(|| defaults::S3_REGION.to_string()),
            s3_max_retries: parse_or(&lookup, "S3_MAX_RETRIES", defaults::S3_MAX_RETRIES)?,
            s3_retry_delay: Duration::from_millis(defaults::S3_RETRY_DELAY_MS),
            gateway_namespace: lookup("GATEWAY_NAMESPACE").unwrap_or_else(|| defaults::GATEWAY_NAMESPACE.to_string()),
            gateway_selector: lookup("GATEWAY_SELECTOR").unwrap_or_else(|| defaults::GATEWAY_SELECTOR.to_string()),
            listen_addr: parse_or(&lookup, "LISTEN_ADDR", defaults::LISTEN_ADDR.parse::<SocketAddr>()?)?,
            kubeconfig_path: lookup("KUBECONFIG_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
