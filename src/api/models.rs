// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request and response bodies of the HTTP API

use crate::storage::ProvisionedStorage;
use crate::types::ResolvedEndpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: String,
    #[serde(default)]
    pub docker_id: Option<String>,
    #[serde(default)]
    pub docker_password: Option<String>,
    #[serde(default)]
    pub github_id: Option<String>,
    #[serde(default)]
    pub github_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    /// Namespace created for the user
    pub user_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorageRequest {
    pub user_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateStorageResponse {
    pub bucket: String,
    #[serde(rename = "s3endpoints")]
    pub endpoints: Vec<EndpointBody>,
    #[serde(rename = "s3access")]
    pub access_key: String,
    #[serde(rename = "s3secret")]
    pub secret_key: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointBody {
    pub protocol: String,
    pub endpoints: Vec<String>,
}

impl From<ResolvedEndpoint> for EndpointBody {
    fn from(endpoint: ResolvedEndpoint) -> Self {
        Self {
            protocol: endpoint.protocol,
            endpoints: endpoint.addresses,
        }
    }
}

impl From<ProvisionedStorage> for CreateStorageResponse {
    fn from(storage: ProvisionedStorage) -> Self {
        Self {
            bucket: storage.bucket.name,
            endpoints: storage.endpoints.into_iter().map(EndpointBody::from).collect(),
            access_key: storage.credentials.access_key,
            secret_key: storage.credentials.secret_key,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionRequest {
    /// Namespace returned by `POST /users`
    pub user_name: String,
    pub function_name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
