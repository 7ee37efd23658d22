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

use crate::domain::environment::model::KubernetesEnvironment;
use crate::infrastructure::kubernetes::resources::pod::{machine_name, PodData};
use crate::shared::error::{Result, ValidationError};
use std::collections::{BTreeMap, HashSet};

/// Checks the pods of an environment: structure, declared machines and
/// volume references.
#[derive(Debug, Default, Clone, Copy)]
pub struct PodsValidator;

impl PodsValidator {
    pub fn validate(&self, env: &KubernetesEnvironment) -> Result<()> {
        let mut containers_per_machine: BTreeMap<String, usize> = BTreeMap::new();

        for (key, pod_data) in env.pods_data() {
            let meta = pod_data
                .metadata()
                .ok_or(ValidationError::MissingPodMetadata)?;
            if pod_data.spec().is_none() {
                return Err(ValidationError::MissingPodSpec {
                    pod: meta.name.clone().unwrap_or_else(|| key.clone()),
                }
                .into());
            }

            for container in pod_data.all_containers() {
                *containers_per_machine
                    .entry(machine_name(meta, container))
                    .or_default() += 1;
            }
        }

        let missing_machines: Vec<String> = env
            .machines()
            .keys()
            .filter(|name| !containers_per_machine.contains_key(*name))
            .cloned()
            .collect();
        if !missing_machines.is_empty() {
            return Err(ValidationError::MissingMachine {
                machines: missing_machines,
            }
            .into());
        }

        // a declared machine backs exactly one container
        if let Some(name) = env
            .machines()
            .keys()
            .find(|name| containers_per_machine.get(*name).is_some_and(|n| *n > 1))
        {
            return Err(ValidationError::AmbiguousMachine {
                machine: name.clone(),
            }
            .into());
        }

        for (key, pod_data) in env.pods_data() {
            validate_pod_volumes(env, key, pod_data)?;
        }

        Ok(())
    }
}

fn validate_pod_volumes(env: &KubernetesEnvironment, key: &str, pod_data: &PodData) -> Result<()> {
    let pod_name = pod_data.name().unwrap_or(key);
    let mut volume_names = HashSet::new();

    for volume in pod_data.spec().and_then(|s| s.volumes.as_ref()).into_iter().flatten() {
        volume_names.insert(volume.name.as_str());

        if let Some(pvc) = &volume.persistent_volume_claim {
            if !env.persistent_volume_claims().contains_key(&pvc.claim_name) {
                return Err(ValidationError::UnknownPvc {
                    pod: pod_name.to_string(),
                    volume: volume.name.clone(),
                    claim: pvc.claim_name.clone(),
                }
                .into());
            }
        }
    }

    for container in pod_data.all_containers() {
        for mount in container.volume_mounts.iter().flatten() {
            if !volume_names.contains(mount.name.as_str()) {
                return Err(ValidationError::UnknownVolumeMount {
                    container: container.name.clone(),
                    pod: pod_name.to_string(),
                    volume: mount.name.clone(),
                }
                .into());
            }
        }
    }

    Ok(())
}

/// Top-level check run on every assembled environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct KubernetesEnvironmentValidator {
    pods_validator: PodsValidator,
}

impl KubernetesEnvironmentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, env: &KubernetesEnvironment) -> Result<()> {
        if env.pods().is_empty() && env.deployments().is_empty() {
            return Err(ValidationError::NoWorkloads.into());
        }

        self.pods_validator.validate(env)
    }
}
