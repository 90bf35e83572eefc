// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes label keys used by tenantstore
pub mod labels {
    /// Marks every resource created on behalf of a tenant
    pub const TENANT: &str = "tenantstore.io/tenant";
    /// Label Rook puts on object-store-user secrets
    pub const USER: &str = "user";
}

/// The operator name used for server-side apply
pub const OPERATOR_NAME: &str = "tenantstore";

/// Keys Rook writes into an object-store-user secret
pub mod secret_keys {
    pub const ACCESS_KEY: &str = "AccessKey";
    pub const SECRET_KEY: &str = "SecretKey";
}

/// Endpoint resolution limits
pub mod endpoints {
    /// Maximum node addresses collected for a NodePort service
    pub const MAX_NODE_ADDRESSES: usize = 3;
}

/// Defaults for environment configuration
pub mod defaults {
    pub const STORE_NAMESPACE: &str = "rook-ceph";
    pub const STORE_LABEL_KEY: &str = "store";
    pub const CREDENTIAL_POLL_INTERVAL_MS: u64 = 500;
    pub const CREDENTIAL_TIMEOUT_SECS: u64 = 30;
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
    pub const S3_REGION: &str = "us-east-1";
    pub const S3_MAX_RETRIES: u32 = 5;
    pub const S3_RETRY_DELAY_MS: u64 = 200;
    pub const GATEWAY_NAMESPACE: &str = "istio-system";
    pub const GATEWAY_SELECTOR: &str = "istio=ingressgateway";
    pub const LISTEN_ADDR: &str = "0.0.0.0:8080";
    pub const NAMESPACE_PREFIX: &str = "tenant";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
