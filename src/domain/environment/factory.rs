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

//! Recipe to validated environment: load, classify, merge, build, validate.

use crate::domain::environment::classifier::RecipeClassifier;
use crate::domain::environment::machines::provision_machines;
use crate::domain::environment::model::{
    collect_pods_data, InternalEnvironment, KubernetesEnvironment,
};
use crate::domain::environment::validator::KubernetesEnvironmentValidator;
use crate::infrastructure::kubernetes::loader::ensure_supported_content_type;
use crate::infrastructure::kubernetes::resources::pod::PodMerger;
use crate::infrastructure::kubernetes::{ObjectLoader, YamlObjectLoader};
use crate::shared::error::Result;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct KubernetesEnvironmentFactory<L = YamlObjectLoader> {
    loader: L,
    classifier: RecipeClassifier,
    merger: PodMerger,
    validator: KubernetesEnvironmentValidator,
}

impl Default for KubernetesEnvironmentFactory<YamlObjectLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl KubernetesEnvironmentFactory<YamlObjectLoader> {
    pub fn new() -> Self {
        Self::with_loader(YamlObjectLoader)
    }
}

impl<L: ObjectLoader> KubernetesEnvironmentFactory<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            classifier: RecipeClassifier::new(),
            merger: PodMerger::default(),
            validator: KubernetesEnvironmentValidator::new(),
        }
    }

    pub fn with_merger(mut self, merger: PodMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Builds the environment described by `base.recipe`, inheriting the
    /// machines, commands, warnings and attributes of `base`.
    pub fn create(&self, mut base: InternalEnvironment) -> Result<KubernetesEnvironment> {
        ensure_supported_content_type(&base.recipe.content_type)?;

        let objects = self
            .loader
            .load(&base.recipe.content_type, &base.recipe.content)?;
        debug!("Loaded {} objects from recipe", objects.len());

        let recipe = self.classifier.classify(objects)?;
        base.warnings.extend(recipe.warnings.iter().cloned());

        let (pods, deployments) = if recipe.workload_count() > 1 {
            let sources: Vec<_> = collect_pods_data(&recipe.pods, &recipe.deployments)
                .into_values()
                .collect();
            let merged = self.merger.merge(&sources)?;
            info!(
                "Merged {} workloads into deployment '{}'",
                sources.len(),
                self.merger.deployment_name()
            );
            (
                BTreeMap::new(),
                BTreeMap::from([(self.merger.deployment_name().to_string(), merged)]),
            )
        } else {
            (recipe.pods, recipe.deployments)
        };

        let mut env = KubernetesEnvironment::builder()
            .with_base(base)
            .with_pods(pods)
            .with_deployments(deployments)
            .with_services(recipe.services)
            .with_persistent_volume_claims(recipe.persistent_volume_claims)
            .with_secrets(recipe.secrets)
            .with_config_maps(recipe.config_maps)
            .build();

        self.validator.validate(&env)?;
        provision_machines(&mut env);

        info!(
            "Created environment with {} pods, {} deployments and {} machines",
            env.pods().len(),
            env.deployments().len(),
            env.machines().len()
        );
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::model::InternalRecipe;
    use crate::infrastructure::constants::CONTENT_TYPE_YAML;
    use crate::infrastructure::kubernetes::RuntimeObject;
    use crate::shared::error::{ValidationError, WorkspaceError};

    struct FailingLoader;

    impl ObjectLoader for FailingLoader {
        fn load(&self, _content_type: &str, _content: &str) -> Result<Vec<RuntimeObject>> {
            Err(WorkspaceError::loader_failure("schema registry unreachable"))
        }
    }

    fn base(content_type: &str, content: &str) -> InternalEnvironment {
        InternalEnvironment {
            recipe: InternalRecipe::new(content_type, content),
            ..Default::default()
        }
    }

    #[test]
    fn test_unsupported_content_type_is_rejected_before_loading() {
        let factory = KubernetesEnvironmentFactory::with_loader(FailingLoader);
        let err = factory.create(base("text/plain", "")).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::UnsupportedContentType { .. })
        ));
    }

    #[test]
    fn test_loader_failure_is_propagated() {
        let factory = KubernetesEnvironmentFactory::with_loader(FailingLoader);
        let err = factory.create(base(CONTENT_TYPE_YAML, "")).unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[test]
    fn test_empty_recipe_has_no_workloads() {
        let err = KubernetesEnvironmentFactory::new()
            .create(base(CONTENT_TYPE_YAML, ""))
            .unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::NoWorkloads));
    }

    #[test]
    fn test_custom_deployment_name() {
        let recipe = r#"
kind: Pod
apiVersion: v1
metadata:
  name: a
spec:
  containers: [{name: main, image: busybox}]
---
kind: Pod
apiVersion: v1
metadata:
  name: b
spec:
  containers: [{name: main, image: busybox}]
"#;
        let env = KubernetesEnvironmentFactory::new()
            .with_merger(PodMerger::new("merged"))
            .create(base(CONTENT_TYPE_YAML, recipe))
            .unwrap();
        assert!(env.deployments().contains_key("merged"));
        assert_eq!(env.pods_data()["merged"].name(), Some("merged"));
    }
}
