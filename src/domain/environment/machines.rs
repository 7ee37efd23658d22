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

use crate::domain::config::parse_memory_quantity;
use crate::domain::environment::model::KubernetesEnvironment;
use crate::infrastructure::constants::{
    MEMORY_LIMIT_ATTRIBUTE, MEMORY_REQUEST_ATTRIBUTE, RESOURCE_MEMORY,
};
use crate::infrastructure::kubernetes::resources::pod::machine_name;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;
use tracing::warn;

/// Gives every container of an ordinary pod a machine config and fills in
/// memory attributes the config does not already set.
pub fn provision_machines(env: &mut KubernetesEnvironment) {
    let mut found = Vec::new();
    for (_, pod_data) in env.ordinary_pods_data() {
        let Some(meta) = pod_data.metadata() else {
            continue;
        };
        for container in pod_data.all_containers() {
            found.push((
                machine_name(meta, container),
                memory_bytes(container, Resources::Limits),
                memory_bytes(container, Resources::Requests),
            ));
        }
    }

    let machines = env.machines_mut();
    for (name, limit, request) in found {
        let config = machines.entry(name).or_default();
        if let Some(limit) = limit {
            config
                .attributes
                .entry(MEMORY_LIMIT_ATTRIBUTE.to_string())
                .or_insert_with(|| limit.to_string());
        }
        if let Some(request) = request {
            config
                .attributes
                .entry(MEMORY_REQUEST_ATTRIBUTE.to_string())
                .or_insert_with(|| request.to_string());
        }
    }
}

#[derive(Clone, Copy)]
enum Resources {
    Limits,
    Requests,
}

fn memory_bytes(container: &Container, which: Resources) -> Option<u64> {
    let resources = container.resources.as_ref()?;
    let quantities: &BTreeMap<String, Quantity> = match which {
        Resources::Limits => resources.limits.as_ref()?,
        Resources::Requests => resources.requests.as_ref()?,
    };
    let quantity = quantities.get(RESOURCE_MEMORY)?;

    match parse_memory_quantity(&quantity.0) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Ignoring memory of container '{}': {}", container.name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::MachineConfig;
    use crate::domain::environment::model::InternalEnvironment;
    use k8s_openapi::api::core::v1::{Pod, PodSpec, ResourceRequirements};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn container(name: &str, limit: Option<&str>, request: Option<&str>) -> Container {
        let memory = |q: Option<&str>| {
            q.map(|q| BTreeMap::from([(RESOURCE_MEMORY.to_string(), Quantity(q.to_string()))]))
        };
        Container {
            name: name.to_string(),
            resources: Some(ResourceRequirements {
                limits: memory(limit),
                requests: memory(request),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn env(containers: Vec<Container>, machines: BTreeMap<String, MachineConfig>) -> KubernetesEnvironment {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("pod1".to_string()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers,
                ..Default::default()
            }),
            ..Default::default()
        };
        KubernetesEnvironment::builder()
            .with_base(InternalEnvironment {
                machines,
                ..Default::default()
            })
            .with_pods(BTreeMap::from([("pod1".to_string(), pod)]))
            .build()
    }

    #[test]
    fn test_undeclared_containers_get_machines() {
        let mut env = env(
            vec![container("main", Some("512Mi"), Some("256Mi")), container("db", None, None)],
            BTreeMap::new(),
        );
        provision_machines(&mut env);

        let main = &env.machines()["pod1/main"];
        assert_eq!(
            main.attributes.get(MEMORY_LIMIT_ATTRIBUTE),
            Some(&(512u64 * 1024 * 1024).to_string())
        );
        assert_eq!(
            main.attributes.get(MEMORY_REQUEST_ATTRIBUTE),
            Some(&(256u64 * 1024 * 1024).to_string())
        );
        assert!(env.machines()["pod1/db"].attributes.is_empty());
    }

    #[test]
    fn test_declared_attributes_win() {
        let declared = MachineConfig::default().with_attribute(MEMORY_LIMIT_ATTRIBUTE, "1024");
        let mut env = env(
            vec![container("main", Some("1Gi"), None)],
            BTreeMap::from([("pod1/main".to_string(), declared)]),
        );
        provision_machines(&mut env);
        assert_eq!(
            env.machines()["pod1/main"].attributes.get(MEMORY_LIMIT_ATTRIBUTE),
            Some(&"1024".to_string())
        );
    }

    #[test]
    fn test_unparseable_quantity_is_skipped() {
        let mut env = env(vec![container("main", Some("lots"), None)], BTreeMap::new());
        provision_machines(&mut env);
        assert!(env.machines()["pod1/main"].attributes.is_empty());
    }
}
