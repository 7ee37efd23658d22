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

//! Workspace configuration: declared machines, commands and the recipe location

use crate::domain::environment::{InternalEnvironment, InternalRecipe};
use crate::shared::error::{Result, WorkspaceError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::read_to_string;

/// Per-machine settings declared by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub attributes: BTreeMap<String, String>,
    pub env: BTreeMap<String, String>,
}

impl MachineConfig {
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    pub name: String,
    pub command_line: String,
    #[serde(rename = "type")]
    pub command_type: String,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeConf {
    pub content_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub machines: BTreeMap<String, MachineConfig>,
    pub commands: Vec<Command>,
    pub recipe: Option<RecipeConf>,
}

impl WorkspaceConfig {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> anyhow::Result<Self> {
        let content = read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.as_ref(), e))?;

        let conf = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;

        Ok(conf)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Machines named on the command line that the file does not declare get
    /// an empty config.
    pub fn declare_machines<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.machines.entry(name.into()).or_default();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.machines.keys().find(|name| name.trim().is_empty()) {
            return Err(WorkspaceError::config_error(format!(
                "Invalid machine name: '{}'",
                name
            )));
        }

        if let Some(command) = self.commands.iter().find(|c| c.name.trim().is_empty()) {
            return Err(WorkspaceError::config_error(format!(
                "Command '{}' has no name",
                command.command_line
            )));
        }

        Ok(())
    }

    /// Base environment for a recipe with the given content.
    pub fn into_environment(self, recipe: InternalRecipe) -> InternalEnvironment {
        InternalEnvironment {
            recipe,
            machines: self.machines,
            commands: self.commands,
            ..Default::default()
        }
    }
}
