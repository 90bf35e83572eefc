// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, TenantStoreError};
use std::fmt;

/// Bounds shared by S3 bucket names and Kubernetes object names
const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 63;

/// Identity of a tenant, used as object-store-user name and bucket name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Validate a tenant name. It must be usable both as a Kubernetes object
    /// name and as an S3 bucket name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TenantStoreError::InvalidRequest(
                "tenant name must not be empty".to_string(),
            ));
        }
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.len()) {
            return Err(TenantStoreError::InvalidRequest(format!(
                "tenant name '{}' must be between {} and {} characters",
                name, MIN_NAME_LEN, MAX_NAME_LEN
            )));
        }

        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
        let alnum = |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !valid_chars || !alnum(name.chars().next()) || !alnum(name.chars().last()) {
            return Err(TenantStoreError::InvalidRequest(format!(
                "tenant name '{}' must consist of lowercase alphanumerics, '-' or '.', and start and end with an alphanumeric",
                name
            )));
        }
        if name.contains("..") {
            return Err(TenantStoreError::InvalidRequest(format!(
                "tenant name '{}' must not contain adjacent periods",
                name
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
