// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoding of recipe documents into typed Kubernetes objects.

use crate::infrastructure::constants::*;
use crate::shared::error::{Result, ValidationError, WorkspaceError};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A kind-tagged object read from a recipe.
#[derive(Debug, Clone)]
pub enum RuntimeObject {
    Pod(Pod),
    Deployment(Deployment),
    Service(Service),
    Ingress(Ingress),
    PersistentVolumeClaim(PersistentVolumeClaim),
    Secret(Secret),
    ConfigMap(ConfigMap),
    /// A document of an unsupported kind, or one missing its kind or metadata.
    Unrecognized {
        kind: Option<String>,
        metadata: Option<ObjectMeta>,
    },
}

impl RuntimeObject {
    pub fn kind(&self) -> Option<String> {
        let kind = match self {
            Self::Pod(_) => Pod::kind(&()),
            Self::Deployment(_) => Deployment::kind(&()),
            Self::Service(_) => Service::kind(&()),
            Self::Ingress(_) => Ingress::kind(&()),
            Self::PersistentVolumeClaim(_) => PersistentVolumeClaim::kind(&()),
            Self::Secret(_) => Secret::kind(&()),
            Self::ConfigMap(_) => ConfigMap::kind(&()),
            Self::Unrecognized { kind, .. } => return kind.clone(),
        };
        Some(kind.into_owned())
    }

    pub fn metadata(&self) -> Option<&ObjectMeta> {
        match self {
            Self::Pod(o) => Some(o.meta()),
            Self::Deployment(o) => Some(o.meta()),
            Self::Service(o) => Some(o.meta()),
            Self::Ingress(o) => Some(o.meta()),
            Self::PersistentVolumeClaim(o) => Some(o.meta()),
            Self::Secret(o) => Some(o.meta()),
            Self::ConfigMap(o) => Some(o.meta()),
            Self::Unrecognized { metadata, .. } => metadata.as_ref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata().and_then(|m| m.name.as_deref())
    }
}

/// Turns recipe content into runtime objects.
pub trait ObjectLoader {
    fn load(&self, content_type: &str, content: &str) -> Result<Vec<RuntimeObject>>;
}

/// Reads multi-document YAML (and therefore JSON) recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlObjectLoader;

impl ObjectLoader for YamlObjectLoader {
    fn load(&self, _content_type: &str, content: &str) -> Result<Vec<RuntimeObject>> {
        let mut objects = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|e| parse_failure(&e.to_string()))?;
            collect_objects(value, &mut objects)?;
        }
        Ok(objects)
    }
}

pub fn is_supported_content_type(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES.contains(&content_type)
}

pub fn ensure_supported_content_type(content_type: &str) -> Result<()> {
    if is_supported_content_type(content_type) {
        return Ok(());
    }
    Err(ValidationError::UnsupportedContentType {
        content_type: content_type.to_string(),
        supported: SUPPORTED_CONTENT_TYPES.join(", "),
    }
    .into())
}

fn collect_objects(value: Value, objects: &mut Vec<RuntimeObject>) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value.get("kind").and_then(Value::as_str).map(str::to_string);
    let has_metadata = value.get("metadata").is_some_and(|m| !m.is_null());

    let object = match kind.as_deref() {
        Some(KIND_LIST) => {
            let items = match value {
                Value::Object(mut map) => map.remove("items"),
                _ => None,
            };
            if let Some(Value::Array(items)) = items {
                for item in items {
                    collect_objects(item, objects)?;
                }
            }
            return Ok(());
        }
        Some(_) if !has_metadata => RuntimeObject::Unrecognized {
            kind: kind.clone(),
            metadata: None,
        },
        Some(KIND_POD) => RuntimeObject::Pod(decode(value)?),
        Some(KIND_DEPLOYMENT) => RuntimeObject::Deployment(decode(value)?),
        Some(KIND_SERVICE) => RuntimeObject::Service(decode(value)?),
        Some(KIND_INGRESS) => RuntimeObject::Ingress(decode(value)?),
        Some(KIND_PVC) => RuntimeObject::PersistentVolumeClaim(decode(value)?),
        Some(KIND_SECRET) => RuntimeObject::Secret(decode(value)?),
        Some(KIND_CONFIG_MAP) => RuntimeObject::ConfigMap(decode(value)?),
        _ => {
            let metadata = match value.get("metadata") {
                Some(m) if !m.is_null() => Some(decode::<ObjectMeta>(m.clone())?),
                _ => None,
            };
            RuntimeObject::Unrecognized {
                kind: kind.clone(),
                metadata,
            }
        }
    };

    objects.push(object);
    Ok(())
}

fn decode<K: DeserializeOwned>(value: Value) -> Result<K> {
    serde_json::from_value(value).map_err(|e| parse_failure(&e.to_string()))
}

/// Keeps only the first line of the decoder message, without its location.
fn parse_failure(message: &str) -> WorkspaceError {
    let first_line = message.lines().next().unwrap_or_default();
    let cause = first_line
        .split(" at [")
        .next()
        .unwrap_or(first_line)
        .trim();
    WorkspaceError::loader_failure(format!("Could not parse recipe: {}", cause))
}
