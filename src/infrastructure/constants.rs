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

/// Merged deployment
pub const DEFAULT_DEPLOYMENT_NAME: &str = "workspace";
pub const DEPLOYMENT_NAME_LABEL: &str = "deployment";

/// Volume shared by every pod of a workspace; repeats are deduplicated on merge
pub const PROJECTS_VOLUME_NAME: &str = "projects-volume";

/// Machine name annotation: `<prefix><container name><suffix>`
pub const MACHINE_NAME_ANNOTATION_PREFIX: &str = "workspace.kube/container.";
pub const MACHINE_NAME_ANNOTATION_SUFFIX: &str = ".machine-name";

/// Length of the random suffix appended to colliding container names
pub const CONTAINER_NAME_SUFFIX_LEN: usize = 4;

/// Object kinds
pub const KIND_POD: &str = "Pod";
pub const KIND_DEPLOYMENT: &str = "Deployment";
pub const KIND_SERVICE: &str = "Service";
pub const KIND_INGRESS: &str = "Ingress";
pub const KIND_PVC: &str = "PersistentVolumeClaim";
pub const KIND_SECRET: &str = "Secret";
pub const KIND_CONFIG_MAP: &str = "ConfigMap";
pub const KIND_LIST: &str = "List";

/// Recipe content types
pub const CONTENT_TYPE_YAML: &str = "application/x-yaml";
pub const CONTENT_TYPE_TEXT_YAML: &str = "text/yaml";
pub const CONTENT_TYPE_TEXT_X_YAML: &str = "text/x-yaml";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT_JSON: &str = "text/json";
pub const SUPPORTED_CONTENT_TYPES: [&str; 5] = [
    CONTENT_TYPE_YAML,
    CONTENT_TYPE_TEXT_YAML,
    CONTENT_TYPE_TEXT_X_YAML,
    CONTENT_TYPE_JSON,
    CONTENT_TYPE_TEXT_JSON,
];

/// Warnings
pub const INGRESSES_IGNORED_WARNING_CODE: i32 = 4100;
pub const INGRESSES_IGNORED_WARNING_MESSAGE: &str =
    "Ingresses specified in the recipe are ignored. To expose ports please define servers in machine configuration.";

/// Machine attributes
pub const MEMORY_LIMIT_ATTRIBUTE: &str = "memoryLimitBytes";
pub const MEMORY_REQUEST_ATTRIBUTE: &str = "memoryRequestBytes";
pub const RESOURCE_MEMORY: &str = "memory";
