// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Serverless functions running as Knative services in tenant namespaces

use crate::constants::OPERATOR_NAME;
use crate::error::{Result, TenantStoreError};
use crate::kubernetes::ClusterGateway;
use crate::storage::{resolve_endpoints, PortFilter};
use crate::types::{KnativeService, ResolvedEndpoint};
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{info, instrument};

/// Where the ingress gateway routing to functions can be found
#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub namespace: String,
    pub selector: String,
}

/// How a deployed function can be reached
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionView {
    pub endpoints: Vec<ResolvedEndpoint>,
    /// Host to send in requests so the gateway routes them to the function
    pub authority: String,
}

/// Deploy (or update) a function running `image`
#[instrument(skip(client))]
pub async fn deploy_image(client: &Client, namespace: &str, name: &str, image: &str) -> Result<()> {
    if name.is_empty() || image.is_empty() {
        return Err(TenantStoreError::InvalidRequest(
            "container image or function name is missing".to_string(),
        ));
    }

    let services: Api<KnativeService> = Api::namespaced(client.clone(), namespace);
    let service = KnativeService::from_image(namespace, name, image);

    let pp = PatchParams::apply(OPERATOR_NAME).force();
    services.patch(name, &pp, &Patch::Apply(&service)).await?;

    info!("Deployed function {}/{} from image {}", namespace, name, image);
    Ok(())
}

/// Resolve the gateway endpoints and routing authority of a function
pub fn describe<'a, G: ClusterGateway>(
    gateway: &'a G,
    client: &'a Client,
    settings: &'a GatewaySettings,
    namespace: &'a str,
    name: &'a str,
) -> BoxFuture<'a, Result<FunctionView>> {
    describe_function(gateway, client, settings, namespace, name).boxed()
}

#[instrument(skip(gateway, client, settings))]
async fn describe_function<G: ClusterGateway>(
    gateway: &G,
    client: &Client,
    settings: &GatewaySettings,
    namespace: &str,
    name: &str,
) -> Result<FunctionView> {
    if name.is_empty() {
        return Err(TenantStoreError::InvalidRequest("function name is missing".to_string()));
    }

    let services: Api<KnativeService> = Api::namespaced(client.clone(), namespace);
    let (endpoints, service) = futures::try_join!(
        resolve_endpoints(
            gateway,
            &settings.namespace,
            &settings.selector,
            &PortFilter::INGRESS_GATEWAY,
        ),
        async { services.get(name).await.map_err(TenantStoreError::from) },
    )?;

    let authority = service.authority().ok_or_else(|| {
        TenantStoreError::FunctionError(format!(
            "function {}/{} has no URL assigned yet",
            namespace, name
        ))
    })?;

    Ok(FunctionView {
        endpoints,
        authority,
    })
}
