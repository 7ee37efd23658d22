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

//! The assembled runtime environment of a workspace.

use crate::domain::config::{Command, MachineConfig};
use crate::infrastructure::kubernetes::resources::pod::{PodData, PodRole};
use crate::shared::error::{Result, ValidationError};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalRecipe {
    pub content_type: String,
    pub content: String,
}

impl InternalRecipe {
    pub fn new(content_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content: content.into(),
        }
    }
}

/// Non-fatal problem found while assembling an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: i32,
    pub message: String,
}

impl Warning {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// What a workspace declares independently of its recipe objects.
#[derive(Debug, Clone, Default)]
pub struct InternalEnvironment {
    pub recipe: InternalRecipe,
    pub machines: BTreeMap<String, MachineConfig>,
    pub commands: Vec<Command>,
    pub warnings: Vec<Warning>,
    pub attributes: BTreeMap<String, String>,
}

/// Runtime environment made of Kubernetes objects.
///
/// Every pod and deployment has an entry in the pod data map under the same
/// name; injectable pods are added there too, with [`PodRole::Injectable`].
#[derive(Debug, Clone, Default)]
pub struct KubernetesEnvironment {
    base: InternalEnvironment,
    pods: BTreeMap<String, Pod>,
    deployments: BTreeMap<String, Deployment>,
    pods_data: BTreeMap<String, PodData>,
    services: BTreeMap<String, Service>,
    ingresses: BTreeMap<String, Ingress>,
    persistent_volume_claims: BTreeMap<String, PersistentVolumeClaim>,
    secrets: BTreeMap<String, Secret>,
    config_maps: BTreeMap<String, ConfigMap>,
    injectable_pods: BTreeMap<String, BTreeMap<String, Pod>>,
}

impl KubernetesEnvironment {
    pub fn builder() -> KubernetesEnvironmentBuilder {
        KubernetesEnvironmentBuilder::new()
    }

    pub fn recipe(&self) -> &InternalRecipe {
        &self.base.recipe
    }

    pub fn machines(&self) -> &BTreeMap<String, MachineConfig> {
        &self.base.machines
    }

    pub fn machines_mut(&mut self) -> &mut BTreeMap<String, MachineConfig> {
        &mut self.base.machines
    }

    pub fn commands(&self) -> &[Command] {
        &self.base.commands
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.base.warnings
    }

    pub fn add_warning(&mut self, warning: Warning) {
        self.base.warnings.push(warning);
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.base.attributes
    }

    pub fn pods(&self) -> &BTreeMap<String, Pod> {
        &self.pods
    }

    pub fn deployments(&self) -> &BTreeMap<String, Deployment> {
        &self.deployments
    }

    pub fn pods_data(&self) -> &BTreeMap<String, PodData> {
        &self.pods_data
    }

    pub fn pod_data_mut(&mut self, name: &str) -> Option<&mut PodData> {
        self.pods_data.get_mut(name)
    }

    pub fn services(&self) -> &BTreeMap<String, Service> {
        &self.services
    }

    pub fn ingresses(&self) -> &BTreeMap<String, Ingress> {
        &self.ingresses
    }

    pub fn persistent_volume_claims(&self) -> &BTreeMap<String, PersistentVolumeClaim> {
        &self.persistent_volume_claims
    }

    pub fn secrets(&self) -> &BTreeMap<String, Secret> {
        &self.secrets
    }

    pub fn config_maps(&self) -> &BTreeMap<String, ConfigMap> {
        &self.config_maps
    }

    /// Injectable pods keyed by the machine that requires them, then by pod name.
    pub fn injectable_pods(&self) -> &BTreeMap<String, BTreeMap<String, Pod>> {
        &self.injectable_pods
    }

    /// Adds a pod synthesized after the environment was built.
    pub fn add_pod(&mut self, pod: Pod) -> Result<()> {
        let name = pod_name(&pod)?;
        self.pods_data.insert(name.clone(), PodData::from_pod(&pod));
        self.pods.insert(name, pod);
        Ok(())
    }

    /// Records a pod to be merged into the deployment of `machine_name` later.
    pub fn add_injectable_pod(&mut self, machine_name: impl Into<String>, pod: Pod) -> Result<()> {
        let name = pod_name(&pod)?;
        self.pods_data.insert(name.clone(), PodData::injectable(&pod));
        self.injectable_pods
            .entry(machine_name.into())
            .or_default()
            .insert(name, pod);
        Ok(())
    }

    pub fn ordinary_pods_data(&self) -> impl Iterator<Item = (&String, &PodData)> {
        self.pods_data
            .iter()
            .filter(|(_, data)| data.role() == PodRole::Ordinary)
    }
}

fn pod_name(pod: &Pod) -> Result<String> {
    pod.metadata
        .name
        .clone()
        .ok_or_else(|| ValidationError::missing_metadata("Pod").into())
}

/// Pod data for every bare pod and every deployment's pod template.
pub fn collect_pods_data(
    pods: &BTreeMap<String, Pod>,
    deployments: &BTreeMap<String, Deployment>,
) -> BTreeMap<String, PodData> {
    let mut pods_data = BTreeMap::new();
    for (name, pod) in pods {
        pods_data.insert(name.clone(), PodData::from_pod(pod));
    }
    for (name, deployment) in deployments {
        pods_data.insert(name.clone(), PodData::from_deployment(deployment));
    }
    pods_data
}

#[derive(Debug, Default)]
pub struct KubernetesEnvironmentBuilder {
    base: Option<InternalEnvironment>,
    pods: BTreeMap<String, Pod>,
    deployments: BTreeMap<String, Deployment>,
    services: BTreeMap<String, Service>,
    ingresses: BTreeMap<String, Ingress>,
    persistent_volume_claims: BTreeMap<String, PersistentVolumeClaim>,
    secrets: BTreeMap<String, Secret>,
    config_maps: BTreeMap<String, ConfigMap>,
    attributes: BTreeMap<String, String>,
}

impl KubernetesEnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: InternalEnvironment) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_pods(mut self, pods: BTreeMap<String, Pod>) -> Self {
        self.pods = pods;
        self
    }

    pub fn with_deployments(mut self, deployments: BTreeMap<String, Deployment>) -> Self {
        self.deployments = deployments;
        self
    }

    pub fn with_services(mut self, services: BTreeMap<String, Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_ingresses(mut self, ingresses: BTreeMap<String, Ingress>) -> Self {
        self.ingresses = ingresses;
        self
    }

    pub fn with_persistent_volume_claims(
        mut self,
        pvcs: BTreeMap<String, PersistentVolumeClaim>,
    ) -> Self {
        self.persistent_volume_claims = pvcs;
        self
    }

    pub fn with_secrets(mut self, secrets: BTreeMap<String, Secret>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_config_maps(mut self, config_maps: BTreeMap<String, ConfigMap>) -> Self {
        self.config_maps = config_maps;
        self
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn build(self) -> KubernetesEnvironment {
        let mut base = self.base.unwrap_or_default();
        base.attributes.extend(self.attributes);

        KubernetesEnvironment {
            base,
            pods_data: collect_pods_data(&self.pods, &self.deployments),
            pods: self.pods,
            deployments: self.deployments,
            services: self.services,
            ingresses: self.ingresses,
            persistent_volume_claims: self.persistent_volume_claims,
            secrets: self.secrets,
            config_maps: self.config_maps,
            injectable_pods: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DeploymentSpec;
    use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pod(name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "main".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn deployment(name: &str) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    metadata: None,
                    spec: Some(PodSpec::default()),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_wraps_pods_and_deployments() {
        let env = KubernetesEnvironment::builder()
            .with_pods(BTreeMap::from([("pod1".to_string(), pod("pod1"))]))
            .with_deployments(BTreeMap::from([("web".to_string(), deployment("web"))]))
            .build();

        assert_eq!(env.pods_data().len(), 2);
        assert_eq!(env.pods_data()["pod1"], PodData::from_pod(&pod("pod1")));
        assert_eq!(env.pods_data()["web"].name(), Some("web"));
    }

    #[test]
    fn test_base_environment_is_inherited() {
        let base = InternalEnvironment {
            machines: BTreeMap::from([("pod1/main".to_string(), MachineConfig::default())]),
            warnings: vec![Warning::new(1, "inherited")],
            attributes: BTreeMap::from([("a".to_string(), "1".to_string())]),
            ..Default::default()
        };
        let env = KubernetesEnvironment::builder()
            .with_base(base)
            .with_attributes(BTreeMap::from([("b".to_string(), "2".to_string())]))
            .build();

        assert!(env.machines().contains_key("pod1/main"));
        assert_eq!(env.warnings().len(), 1);
        assert_eq!(env.attributes().len(), 2);
    }

    #[test]
    fn test_add_pod_refreshes_pod_data() {
        let mut env = KubernetesEnvironment::builder().build();
        env.add_pod(pod("extra")).unwrap();
        assert!(env.pods().contains_key("extra"));
        assert_eq!(env.pods_data()["extra"].role(), PodRole::Ordinary);

        let nameless = Pod::default();
        assert!(env.add_pod(nameless).is_err());
    }

    #[test]
    fn test_add_injectable_pod() {
        let mut env = KubernetesEnvironment::builder()
            .with_pods(BTreeMap::from([("pod1".to_string(), pod("pod1"))]))
            .build();
        env.add_injectable_pod("pod1/main", pod("proxy")).unwrap();

        assert!(env.injectable_pods()["pod1/main"].contains_key("proxy"));
        assert_eq!(env.pods_data()["proxy"].role(), PodRole::Injectable);
        assert!(!env.pods().contains_key("proxy"));
        assert_eq!(env.ordinary_pods_data().count(), 1);
    }
}
