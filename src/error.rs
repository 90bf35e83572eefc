// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenantStoreError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Kubernetes request timed out: {0}")]
    RequestTimeout(String),

    #[error("Credentials not ready: {0}")]
    CredentialsNotReady(String),

    #[error("No reachable endpoint: {0}")]
    NoEndpoint(String),

    #[error("Bucket provisioning failed: {0}")]
    ProvisioningError(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Function deployment failed: {0}")]
    FunctionError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, TenantStoreError>;

/// Check whether a Kubernetes error reports that the object already exists
pub fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_is_already_exists() {
        assert!(is_already_exists(&api_error(409, "AlreadyExists")));
    }

    #[test]
    fn test_conflict_is_not_already_exists() {
        assert!(!is_already_exists(&api_error(409, "Conflict")));
        assert!(!is_already_exists(&api_error(404, "NotFound")));
    }
}
