// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP API for tenant onboarding, storage provisioning and functions.

pub mod models;

use crate::config::Config;
use crate::constants::defaults;
use crate::error::TenantStoreError;
use crate::functions::{self, GatewaySettings};
use crate::kubernetes::{ensure_tenant_namespace, ensure_tenant_secret, ClusterGateway, KubeGateway};
use crate::storage::{ObjectStoreApi, S3ObjectStore, StorageProvisioner, StoreSettings};
use crate::types::TenantId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use kube::Client;
use models::{
    CreateFunctionRequest, CreateStorageRequest, CreateStorageResponse, CreateUserRequest,
    CreateUserResponse, ErrorResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

const DOCKER_SECRET: &str = "docker";
const GITHUB_SECRET: &str = "github";

/// Shared state of the HTTP handlers
pub struct AppState<G, S> {
    pub client: Client,
    pub provisioner: StorageProvisioner<G, S>,
    pub gateway_settings: GatewaySettings,
}

impl AppState<KubeGateway, S3ObjectStore> {
    pub fn from_config(client: Client, config: &Config) -> Self {
        let object_store = S3ObjectStore::new(
            config.s3_region.clone(),
            config.s3_max_retries,
            config.s3_retry_delay,
        );
        Self {
            provisioner: StorageProvisioner::new(
                KubeGateway::new(client.clone()),
                object_store,
                StoreSettings::from_config(config),
            ),
            client,
            gateway_settings: GatewaySettings {
                namespace: config.gateway_namespace.clone(),
                selector: config.gateway_selector.clone(),
            },
        }
    }
}

impl IntoResponse for TenantStoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            TenantStoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

type ApiResult<T> = std::result::Result<(StatusCode, Json<T>), TenantStoreError>;

/// Build the router over the given state
pub fn routes<G, S>(state: Arc<AppState<G, S>>) -> Router
where
    G: ClusterGateway + 'static,
    S: ObjectStoreApi + 'static,
{
    Router::new()
        .route("/", get(|| async { "tenantstore" }))
        .route("/healthz", get(|| async { "ok" }))
        .route("/users", post(create_user::<G, S>))
        .route("/storage", post(create_storage::<G, S>))
        .route("/functions", post(create_function::<G, S>))
        .route("/functions/{namespace}/{name}", get(get_function::<G, S>))
        .with_state(state)
}

/// Serve the API on `addr` until the server fails
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP API started");
    axum::serve(listener, app).await?;
    Ok(())
}

fn tenant_namespace(user_name: &str) -> String {
    format!(
        "{}-{}-{}-ns",
        defaults::NAMESPACE_PREFIX,
        user_name.to_lowercase(),
        uuid::Uuid::new_v4()
    )
}

/// Handle `POST /users`: create the tenant namespace and registry/repository secrets
async fn create_user<G, S>(
    State(state): State<Arc<AppState<G, S>>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<CreateUserResponse>
where
    G: ClusterGateway + 'static,
    S: ObjectStoreApi + 'static,
{
    let tenant = TenantId::new(req.user_name.to_lowercase())?;
    let namespace = tenant_namespace(tenant.as_str());

    ensure_tenant_namespace(&state.client, &namespace, tenant.as_str()).await?;

    let secrets = [
        (DOCKER_SECRET, &req.docker_id, &req.docker_password),
        (GITHUB_SECRET, &req.github_id, &req.github_password),
    ];
    for (secret_name, id, password) in secrets {
        if let (Some(id), Some(password)) = (id, password) {
            if !id.is_empty() && !password.is_empty() {
                ensure_tenant_secret(&state.client, &namespace, tenant.as_str(), secret_name, id, password)
                    .await?;
            }
        }
    }

    info!("Created user namespace {}", namespace);
    Ok((StatusCode::CREATED, Json(CreateUserResponse { user_name: namespace })))
}

/// Handle `POST /storage`: provision credentials and a bucket for the tenant
async fn create_storage<G, S>(
    State(state): State<Arc<AppState<G, S>>>,
    Json(req): Json<CreateStorageRequest>,
) -> ApiResult<CreateStorageResponse>
where
    G: ClusterGateway + 'static,
    S: ObjectStoreApi + 'static,
{
    let tenant = TenantId::new(req.user_name)?;

    let storage = state.provisioner.provision(&tenant).await.map_err(|e| {
        warn!("Failed to provision storage for {}: {}", tenant, e);
        e
    })?;

    info!("Created bucket {}", storage.bucket.name);
    Ok((StatusCode::CREATED, Json(CreateStorageResponse::from(storage))))
}

/// Handle `POST /functions`: deploy a function from a container image
async fn create_function<G, S>(
    State(state): State<Arc<AppState<G, S>>>,
    Json(req): Json<CreateFunctionRequest>,
) -> ApiResult<serde_json::Value>
where
    G: ClusterGateway + 'static,
    S: ObjectStoreApi + 'static,
{
    let Some(image) = req.image.as_deref() else {
        return Err(TenantStoreError::InvalidRequest(
            "container image is missing".to_string(),
        ));
    };

    functions::deploy_image(&state.client, &req.user_name, &req.function_name, image).await?;

    info!("Created function {}", req.function_name);
    Ok((StatusCode::CREATED, Json(serde_json::json!({}))))
}

/// Handle `GET /functions/{namespace}/{name}`
async fn get_function<G, S>(
    State(state): State<Arc<AppState<G, S>>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<functions::FunctionView>
where
    G: ClusterGateway + 'static,
    S: ObjectStoreApi + 'static,
{
    let view = functions::describe(
        state.provisioner.gateway(),
        &state.client,
        &state.gateway_settings,
        &namespace,
        &name,
    )
    .await?;

    Ok((StatusCode::OK, Json(view)))
}
