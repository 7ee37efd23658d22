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

use crate::infrastructure::constants::{
    CONTAINER_NAME_SUFFIX_LEN, MACHINE_NAME_ANNOTATION_PREFIX, MACHINE_NAME_ANNOTATION_SUFFIX,
};
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

pub fn machine_name_annotation(container_name: &str) -> String {
    format!(
        "{}{}{}",
        MACHINE_NAME_ANNOTATION_PREFIX, container_name, MACHINE_NAME_ANNOTATION_SUFFIX
    )
}

pub fn machine_name_annotations(
    container_name: &str,
    machine_name: &str,
) -> BTreeMap<String, String> {
    let mut annotations = BTreeMap::new();
    annotations.insert(
        machine_name_annotation(container_name),
        machine_name.to_string(),
    );
    annotations
}

/// Machine name of a container: the recorded annotation if the pod carries
/// one, otherwise `<pod>/<container>`.
pub fn machine_name(pod_meta: &ObjectMeta, container: &Container) -> String {
    if let Some(recorded) = pod_meta
        .annotations
        .as_ref()
        .and_then(|a| a.get(&machine_name_annotation(&container.name)))
    {
        return recorded.clone();
    }

    format!(
        "{}/{}",
        pod_meta.name.as_deref().unwrap_or_default(),
        container.name
    )
}

pub(crate) fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Returns `name` if it is free, otherwise `<name>-<suffix>` re-drawn until
/// it is. The chosen name is recorded in `taken`.
pub fn claim_unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}-{}", name, random_suffix(CONTAINER_NAME_SUFFIX_LEN));
    }
    candidate
}
