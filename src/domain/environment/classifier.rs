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

//! Sorts loaded recipe objects into typed collections.

use crate::domain::environment::model::Warning;
use crate::infrastructure::constants::{
    INGRESSES_IGNORED_WARNING_CODE, INGRESSES_IGNORED_WARNING_MESSAGE,
};
use crate::infrastructure::kubernetes::RuntimeObject;
use crate::shared::error::{Result, ValidationError};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::Resource;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ClassifiedRecipe {
    pub pods: BTreeMap<String, Pod>,
    pub deployments: BTreeMap<String, Deployment>,
    pub services: BTreeMap<String, Service>,
    pub persistent_volume_claims: BTreeMap<String, PersistentVolumeClaim>,
    pub secrets: BTreeMap<String, Secret>,
    pub config_maps: BTreeMap<String, ConfigMap>,
    pub warnings: Vec<Warning>,
}

impl ClassifiedRecipe {
    pub fn workload_count(&self) -> usize {
        self.pods.len() + self.deployments.len()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeClassifier;

impl RecipeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, objects: Vec<RuntimeObject>) -> Result<ClassifiedRecipe> {
        let mut recipe = ClassifiedRecipe::default();
        let mut ingresses: BTreeMap<String, Ingress> = BTreeMap::new();

        for object in objects {
            let kind = object.kind().ok_or(ValidationError::MissingKind)?;
            let name = object
                .name()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::missing_metadata(&kind))?;

            match object {
                RuntimeObject::Pod(o) => insert_unique(&mut recipe.pods, name, o)?,
                RuntimeObject::Deployment(o) => insert_unique(&mut recipe.deployments, name, o)?,
                RuntimeObject::Service(o) => insert_unique(&mut recipe.services, name, o)?,
                RuntimeObject::Ingress(o) => insert_unique(&mut ingresses, name, o)?,
                RuntimeObject::PersistentVolumeClaim(o) => {
                    insert_unique(&mut recipe.persistent_volume_claims, name, o)?
                }
                RuntimeObject::Secret(o) => insert_unique(&mut recipe.secrets, name, o)?,
                RuntimeObject::ConfigMap(o) => insert_unique(&mut recipe.config_maps, name, o)?,
                RuntimeObject::Unrecognized { .. } => {
                    return Err(ValidationError::UnknownKind { kind, name }.into());
                }
            }
        }

        // pods and deployments share the pod data namespace
        if let Some(name) = recipe
            .pods
            .keys()
            .find(|name| recipe.deployments.contains_key(*name))
        {
            return Err(ValidationError::duplicate_name("workload", name.clone()).into());
        }

        if !ingresses.is_empty() {
            warn!("Ignoring {} ingresses found in recipe", ingresses.len());
            recipe.warnings.push(Warning::new(
                INGRESSES_IGNORED_WARNING_CODE,
                INGRESSES_IGNORED_WARNING_MESSAGE,
            ));
        }

        debug!(
            "Classified recipe: {} pods, {} deployments, {} services, {} PVCs, {} secrets, {} config maps",
            recipe.pods.len(),
            recipe.deployments.len(),
            recipe.services.len(),
            recipe.persistent_volume_claims.len(),
            recipe.secrets.len(),
            recipe.config_maps.len()
        );

        Ok(recipe)
    }
}

fn insert_unique<K>(map: &mut BTreeMap<String, K>, name: String, object: K) -> Result<()>
where
    K: Resource<DynamicType = ()>,
{
    if map.contains_key(&name) {
        return Err(ValidationError::duplicate_name(K::kind(&()), name).into());
    }
    map.insert(name, object);
    Ok(())
}
