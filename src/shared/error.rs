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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The recipe could not be decoded. Not caused by the recipe author.
    #[error("Recipe loading error: {0}")]
    LoaderFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Problems with the recipe or the assembled environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Environment contains object without specified kind field")]
    MissingKind,

    #[error("{kind} metadata and name must not be null")]
    MissingMetadata { kind: String },

    #[error("Environment can not contain two '{kind}' objects with the same name '{name}'")]
    DuplicateName { kind: String, name: String },

    #[error("Found unknown object type in recipe -- name: '{name}', kind: '{kind}'")]
    UnknownKind { kind: String, name: String },

    #[error(
        "Provided environment recipe content type '{content_type}' is not supported. Supported values are: {supported}"
    )]
    UnsupportedContentType {
        content_type: String,
        supported: String,
    },

    #[error("Pods have to have volumes with unique names but there are multiple volumes with the name '{name}'")]
    DuplicateVolume { name: String },

    #[error("Pods have to have the same {field} but they have different values")]
    ConflictingPodProperty { field: String },

    #[error("Environment should contain at least 1 pod or deployment")]
    NoWorkloads,

    #[error("Environment contains pod without metadata")]
    MissingPodMetadata,

    #[error("Pod '{pod}' is missing spec")]
    MissingPodSpec { pod: String },

    #[error("Environment contains machines that are missing in recipe: {}", .machines.join(", "))]
    MissingMachine { machines: Vec<String> },

    #[error("Machine '{machine}' matches more than one container in recipe")]
    AmbiguousMachine { machine: String },

    #[error("Pod '{pod}' contains volume '{volume}' with PVC sources that references missing PVC '{claim}'")]
    UnknownPvc {
        pod: String,
        volume: String,
        claim: String,
    },

    #[error("Container '{container}' in pod '{pod}' contains volume mount that references missing volume '{volume}'")]
    UnknownVolumeMount {
        container: String,
        pod: String,
        volume: String,
    },
}

impl WorkspaceError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn loader_failure(context: impl Into<String>) -> Self {
        Self::LoaderFailure(context.into())
    }

    /// True for failures the recipe author cannot fix by editing the recipe.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::LoaderFailure(_) | Self::Io(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl ValidationError {
    pub fn missing_metadata(kind: impl Into<String>) -> Self {
        Self::MissingMetadata { kind: kind.into() }
    }

    pub fn duplicate_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn conflicting(field: impl Into<String>) -> Self {
        Self::ConflictingPodProperty {
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_machine_lists_all_names() {
        let err = ValidationError::MissingMachine {
            machines: vec!["pod1/db".to_string(), "pod2/web".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Environment contains machines that are missing in recipe: pod1/db, pod2/web"
        );
    }

    #[test]
    fn test_loader_failure_is_infrastructure() {
        assert!(WorkspaceError::loader_failure("boom").is_infrastructure());
        let validation: WorkspaceError = ValidationError::NoWorkloads.into();
        assert!(!validation.is_infrastructure());
        assert_eq!(validation.as_validation(), Some(&ValidationError::NoWorkloads));
    }
}
