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

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// How a pod participates in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PodRole {
    #[default]
    Ordinary,
    /// Merged into another machine's deployment by a later provisioning stage.
    Injectable,
}

/// Normalized view over the pod template of a pod-like workload.
///
/// Bare pods and deployments both reduce to this shape, so the merger and
/// the validators never need to know where a template came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodData {
    spec: Option<PodSpec>,
    metadata: Option<ObjectMeta>,
    role: PodRole,
}

impl PodData {
    pub fn new(spec: Option<PodSpec>, metadata: Option<ObjectMeta>, role: PodRole) -> Self {
        Self {
            spec,
            metadata,
            role,
        }
    }

    pub fn from_pod(pod: &Pod) -> Self {
        Self::new(pod.spec.clone(), Some(pod.metadata.clone()), PodRole::Ordinary)
    }

    /// Wraps the deployment's pod template. A template without a name takes
    /// the deployment's name.
    pub fn from_deployment(deployment: &Deployment) -> Self {
        let template = deployment.spec.as_ref().map(|s| &s.template);

        let mut metadata = template
            .and_then(|t| t.metadata.clone())
            .unwrap_or_default();
        if metadata.name.is_none() {
            metadata.name = deployment.metadata.name.clone();
        }

        Self::new(
            template.and_then(|t| t.spec.clone()),
            Some(metadata),
            PodRole::Ordinary,
        )
    }

    pub fn injectable(pod: &Pod) -> Self {
        Self {
            role: PodRole::Injectable,
            ..Self::from_pod(pod)
        }
    }

    pub fn spec(&self) -> Option<&PodSpec> {
        self.spec.as_ref()
    }

    pub fn spec_mut(&mut self) -> Option<&mut PodSpec> {
        self.spec.as_mut()
    }

    pub fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }

    pub fn metadata_mut(&mut self) -> Option<&mut ObjectMeta> {
        self.metadata.as_mut()
    }

    pub fn role(&self) -> PodRole {
        self.role
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.name.as_deref())
    }

    /// Containers followed by init containers.
    pub fn all_containers(&self) -> impl Iterator<Item = &Container> {
        self.spec.iter().flat_map(|spec| {
            spec.containers
                .iter()
                .chain(spec.init_containers.iter().flatten())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DeploymentSpec;
    use k8s_openapi::api::core::v1::PodTemplateSpec;

    fn deployment(name: &str, template_name: Option<&str>) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        name: template_name.map(str::to_string),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec::default()),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_deployment_template_inherits_name() {
        let data = PodData::from_deployment(&deployment("web", None));
        assert_eq!(data.name(), Some("web"));
        assert!(data.spec().is_some());
    }

    #[test]
    fn test_deployment_template_keeps_own_name() {
        let data = PodData::from_deployment(&deployment("web", Some("web-template")));
        assert_eq!(data.name(), Some("web-template"));
    }

    #[test]
    fn test_deployment_without_template_metadata() {
        let mut d = deployment("web", None);
        if let Some(spec) = d.spec.as_mut() {
            spec.template.metadata = None;
        }
        let data = PodData::from_deployment(&d);
        assert_eq!(data.name(), Some("web"));
    }

    #[test]
    fn test_all_containers_includes_init_containers() {
        let pod = Pod {
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "main".to_string(),
                    ..Default::default()
                }],
                init_containers: Some(vec![Container {
                    name: "setup".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let data = PodData::injectable(&pod);
        let names: Vec<_> = data.all_containers().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["main", "setup"]);
        assert_eq!(data.role(), PodRole::Injectable);
    }
}
