// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::{api::ObjectMeta, CustomResource};
use serde::{Deserialize, Serialize};

/// Knative Serving service; only the fields tenantstore reads or writes are modelled.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "serving.knative.dev", version = "v1", kind = "Service")]
#[kube(namespaced)]
#[kube(status = "KnativeServiceStatus")]
#[serde(rename_all = "camelCase")]
pub struct KnativeServiceSpec {
    pub template: RevisionTemplate,
}

/// The derive names the resource after its kind; alias it apart from the core `Service`.
pub type KnativeService = Service;

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTemplate {
    pub spec: RevisionSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSpec {
    pub containers: Vec<FunctionContainer>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionContainer {
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KnativeServiceStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl KnativeService {
    /// Build a service running a single container image
    pub fn from_image(namespace: &str, name: &str, image: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: KnativeServiceSpec {
                template: RevisionTemplate {
                    spec: RevisionSpec {
                        containers: vec![FunctionContainer {
                            image: image.to_string(),
                        }],
                    },
                },
            },
            status: None,
        }
    }

    /// Host part of the URL Knative assigned to this service
    pub fn authority(&self) -> Option<String> {
        let raw = self.status.as_ref()?.url.as_ref()?;
        let parsed = url::Url::parse(raw).ok()?;
        parsed.host_str().map(str::to_string)
    }
}
