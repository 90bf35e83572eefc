// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and kubeconfig utilities

use crate::config::Config;
use crate::error::{Result, TenantStoreError};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config as KConfig,
};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Create the Kubernetes client, bounding every request by `request_timeout`
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let mut client_config = match &config.kubeconfig_path {
        Some(path) => config_from_kubeconfig_file(path).await?,
        None => KConfig::infer()
            .await
            .map_err(|e| TenantStoreError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };
    apply_timeouts(&mut client_config, config.request_timeout);

    info!("Connecting to Kubernetes API at {}", client_config.cluster_url);
    Client::try_from(client_config)
        .map_err(|e| TenantStoreError::KubeconfigError(format!("Failed to create client: {}", e)))
}

fn apply_timeouts(client_config: &mut KConfig, timeout: Duration) {
    client_config.connect_timeout = Some(timeout);
    client_config.read_timeout = Some(timeout);
    client_config.write_timeout = Some(timeout);
}

async fn config_from_kubeconfig_file(path: &Path) -> Result<KConfig> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        TenantStoreError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    config_from_kubeconfig(&raw).await
}

/// Build a client config from a kubeconfig document
async fn config_from_kubeconfig(kubeconfig: &str) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| TenantStoreError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| TenantStoreError::KubeconfigError(format!("Failed to create config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: test
clusters:
- name: test
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
contexts:
- name: test
  context:
    cluster: test
    user: test
users:
- name: test
  user:
    token: abc
"#;

    #[tokio::test]
    async fn test_config_from_kubeconfig() {
        let config = config_from_kubeconfig(KUBECONFIG).await.unwrap();
        assert_eq!(config.cluster_url.host(), Some("127.0.0.1"));
        assert_eq!(config.cluster_url.port_u16(), Some(6443));
    }

    #[tokio::test]
    async fn test_config_from_invalid_kubeconfig() {
        let err = config_from_kubeconfig("clusters: [").await.unwrap_err();
        assert!(matches!(err, TenantStoreError::KubeconfigError(_)));
    }

    #[tokio::test]
    async fn test_apply_timeouts() {
        let mut config = config_from_kubeconfig(KUBECONFIG).await.unwrap();
        apply_timeouts(&mut config, Duration::from_secs(7));

        assert_eq!(config.read_timeout, Some(Duration::from_secs(7)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(7)));
        assert_eq!(config.write_timeout, Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_missing_kubeconfig_file() {
        let err = config_from_kubeconfig_file(Path::new("/nonexistent/kubeconfig"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/kubeconfig"));
    }
}
