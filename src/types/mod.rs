// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource and value types shared across the crate.

pub mod knative;
pub mod object_store_user;
pub mod store;
pub mod tenant;

pub use knative::KnativeService;
pub use object_store_user::CephObjectStoreUser;
pub use store::{ResolvedEndpoint, ServiceExposure, StoreCredentials};
pub use tenant::TenantId;
