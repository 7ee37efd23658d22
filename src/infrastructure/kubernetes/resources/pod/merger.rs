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

//! Combines several pod templates into the template of one deployment.
//!
//! Labels, annotations, node selectors and the remaining optional pod spec
//! fields are last-writer-wins. Tolerations are concatenated and the other
//! list fields keep every distinct entry. Security context and service
//! accounts are first-writer-wins and any later, different value is a
//! conflict.

use crate::infrastructure::constants::{
    DEFAULT_DEPLOYMENT_NAME, DEPLOYMENT_NAME_LABEL, PROJECTS_VOLUME_NAME,
};
use crate::infrastructure::kubernetes::resources::pod::names::{
    claim_unique_name, machine_name, machine_name_annotations,
};
use crate::infrastructure::kubernetes::resources::pod::template::PodData;
use crate::shared::error::{Result, ValidationError};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, EphemeralContainer, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

macro_rules! overwrite_when_set {
    ($base:expr, $source:expr, $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $base.$field = $source.$field.clone();
            }
        )+
    };
}

pub struct PodMerger {
    deployment_name: String,
}

impl Default for PodMerger {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYMENT_NAME)
    }
}

impl PodMerger {
    pub fn new(deployment_name: impl Into<String>) -> Self {
        Self {
            deployment_name: deployment_name.into(),
        }
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    /// Merges `sources` in order into a single deployment. The inputs are
    /// left untouched; renamed containers only exist in the result.
    pub fn merge(&self, sources: &[PodData]) -> Result<Deployment> {
        let mut base_meta = ObjectMeta::default();
        let mut base_spec = PodSpec::default();
        let mut container_names = HashSet::new();
        let mut init_container_names = HashSet::new();
        let mut ephemeral_container_names = HashSet::new();
        let mut volume_names = HashSet::new();

        for source in sources {
            let meta = source
                .metadata()
                .ok_or(ValidationError::MissingPodMetadata)?;
            let spec = source.spec().ok_or_else(|| ValidationError::MissingPodSpec {
                pod: meta.name.clone().unwrap_or_default(),
            })?;

            merge_map(&mut base_meta.labels, &meta.labels);
            merge_map(&mut base_meta.annotations, &meta.annotations);

            for container in &spec.containers {
                let (renamed, machine) = rename_container(meta, container, &mut container_names);
                merge_map(
                    &mut base_meta.annotations,
                    &Some(machine_name_annotations(&renamed.name, &machine)),
                );
                base_spec.containers.push(renamed);
            }

            for container in spec.init_containers.iter().flatten() {
                let (renamed, machine) =
                    rename_container(meta, container, &mut init_container_names);
                merge_map(
                    &mut base_meta.annotations,
                    &Some(machine_name_annotations(&renamed.name, &machine)),
                );
                base_spec
                    .init_containers
                    .get_or_insert_with(Vec::new)
                    .push(renamed);
            }

            for container in spec.ephemeral_containers.iter().flatten() {
                let name = claim_unique_name(&container.name, &mut ephemeral_container_names);
                base_spec
                    .ephemeral_containers
                    .get_or_insert_with(Vec::new)
                    .push(EphemeralContainer {
                        name,
                        ..container.clone()
                    });
            }

            for volume in spec.volumes.iter().flatten() {
                if !volume_names.insert(volume.name.clone()) {
                    if volume.name == PROJECTS_VOLUME_NAME {
                        debug!("Skipping repeated shared volume '{}'", volume.name);
                        continue;
                    }
                    return Err(ValidationError::DuplicateVolume {
                        name: volume.name.clone(),
                    }
                    .into());
                }
                base_spec
                    .volumes
                    .get_or_insert_with(Vec::new)
                    .push(volume.clone());
            }

            append_unique(&mut base_spec.image_pull_secrets, &spec.image_pull_secrets);
            append_unique(&mut base_spec.host_aliases, &spec.host_aliases);
            append_unique(&mut base_spec.resource_claims, &spec.resource_claims);
            append_unique(&mut base_spec.readiness_gates, &spec.readiness_gates);
            append_unique(&mut base_spec.scheduling_gates, &spec.scheduling_gates);
            append_unique(
                &mut base_spec.topology_spread_constraints,
                &spec.topology_spread_constraints,
            );

            base_spec.termination_grace_period_seconds = max_grace_period(
                base_spec.termination_grace_period_seconds,
                spec.termination_grace_period_seconds,
            );

            merge_first_or_equal(
                &mut base_spec.security_context,
                &spec.security_context,
                "securityContext",
            )?;
            merge_first_or_equal(
                &mut base_spec.service_account,
                &spec.service_account,
                "serviceAccount",
            )?;
            merge_first_or_equal(
                &mut base_spec.service_account_name,
                &spec.service_account_name,
                "serviceAccountName",
            )?;

            merge_map(&mut base_spec.node_selector, &spec.node_selector);

            overwrite_when_set!(
                base_spec,
                spec,
                active_deadline_seconds,
                affinity,
                automount_service_account_token,
                dns_config,
                dns_policy,
                enable_service_links,
                host_ipc,
                host_network,
                host_pid,
                host_users,
                hostname,
                node_name,
                os,
                overhead,
                preemption_policy,
                priority,
                priority_class_name,
                restart_policy,
                runtime_class_name,
                scheduler_name,
                set_hostname_as_fqdn,
                share_process_namespace,
                subdomain,
            );

            if let Some(tolerations) = &spec.tolerations {
                base_spec
                    .tolerations
                    .get_or_insert_with(Vec::new)
                    .extend(tolerations.iter().cloned());
            }
        }

        let mut match_labels = BTreeMap::new();
        match_labels.insert(
            DEPLOYMENT_NAME_LABEL.to_string(),
            self.deployment_name.clone(),
        );
        base_meta
            .labels
            .get_or_insert_with(BTreeMap::new)
            .extend(match_labels.clone());

        debug!(
            "Merged {} pod templates into deployment '{}' with {} containers",
            sources.len(),
            self.deployment_name,
            base_spec.containers.len()
        );

        Ok(Deployment {
            metadata: ObjectMeta {
                name: Some(self.deployment_name.clone()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                selector: LabelSelector {
                    match_labels: Some(match_labels),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(base_meta),
                    spec: Some(base_spec),
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

/// Returns a copy of `container` carrying a name not yet in `taken`, plus
/// the machine name of the original container.
fn rename_container(
    pod_meta: &ObjectMeta,
    container: &Container,
    taken: &mut HashSet<String>,
) -> (Container, String) {
    let machine = machine_name(pod_meta, container);
    let name = claim_unique_name(&container.name, taken);
    if name != container.name {
        debug!(
            "Container '{}' of machine '{}' renamed to '{}'",
            container.name, machine, name
        );
    }
    let renamed = Container {
        name,
        ..container.clone()
    };
    (renamed, machine)
}

fn merge_map(base: &mut Option<BTreeMap<String, String>>, source: &Option<BTreeMap<String, String>>) {
    if let Some(source) = source {
        base.get_or_insert_with(BTreeMap::new)
            .extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

fn append_unique<T: PartialEq + Clone>(base: &mut Option<Vec<T>>, source: &Option<Vec<T>>) {
    for item in source.iter().flatten() {
        let items = base.get_or_insert_with(Vec::new);
        if !items.contains(item) {
            items.push(item.clone());
        }
    }
}

fn merge_first_or_equal<T: PartialEq + Clone>(
    base: &mut Option<T>,
    source: &Option<T>,
    field: &str,
) -> Result<()> {
    match (base.as_ref(), source) {
        (_, None) => Ok(()),
        (None, Some(value)) => {
            *base = Some(value.clone());
            Ok(())
        }
        (Some(current), Some(value)) if current == value => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::conflicting(field).into()),
    }
}

fn max_grace_period(base: Option<i64>, source: Option<i64>) -> Option<i64> {
    match (base, source) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
