// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, CRD discovery and resource access.

pub mod client;
pub mod crd;
pub mod gateway;
pub mod namespaces;

pub use client::create_client;
pub use crd::wait_for_object_store_user_crd;
pub use gateway::{ClusterGateway, CreateOutcome, KubeGateway};
pub use namespaces::{ensure_tenant_namespace, ensure_tenant_secret, validate_namespace_name};
