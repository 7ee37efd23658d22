//! Environment check command

use crate::cli::display::TableRenderer;
use crate::domain::config::WorkspaceConfig;
use crate::domain::environment::{InternalRecipe, KubernetesEnvironmentFactory};
use crate::infrastructure::constants::{CONTENT_TYPE_JSON, CONTENT_TYPE_YAML};
use clap::Parser;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {
    /// Recipe file (YAML or JSON)
    /// If not provided, uses recipe.location from the config file
    #[arg(long, short = 'r', value_name = "PATH")]
    pub recipe: Option<String>,

    /// Workspace configuration file (TOML) declaring machines and commands
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config_file: Option<String>,

    /// Recipe content type
    /// If not specified, uses recipe.content_type from the config file or the file extension
    #[arg(long)]
    pub content_type: Option<String>,

    /// Declared machine name (<pod>/<container>), may be repeated
    #[arg(long = "machine", short = 'm', value_name = "NAME")]
    pub machines: Vec<String>,
}

impl CheckCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let mut conf = match &self.config_file {
            Some(path) => WorkspaceConfig::from(path)?,
            None => WorkspaceConfig::default(),
        };
        conf.declare_machines(self.machines.iter().cloned());
        conf.validate()?;

        let recipe_conf = conf.recipe.clone().unwrap_or_default();

        // Priority: command line > config file
        let recipe_path = self
            .recipe
            .clone()
            .or(recipe_conf.location)
            .ok_or_else(|| anyhow::anyhow!("recipe is required (use --recipe)"))?;

        let content_type = self
            .content_type
            .clone()
            .or(recipe_conf.content_type)
            .unwrap_or_else(|| content_type_for(&recipe_path).to_string());

        let content = std::fs::read_to_string(&recipe_path)
            .map_err(|e| anyhow::anyhow!("Failed to read recipe {}: {}", recipe_path, e))?;
        debug!("Checking recipe {} as {}", recipe_path, content_type);

        let declared: BTreeSet<String> = conf.machines.keys().cloned().collect();
        let base = conf.into_environment(InternalRecipe::new(content_type, content));

        let renderer = TableRenderer::new();
        match KubernetesEnvironmentFactory::new().create(base) {
            Ok(env) => {
                println!("{}", renderer.render_environment(&env, &declared));
                Ok(())
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    renderer.render_failure(&e.to_string(), e.is_infrastructure())
                );
                Err(e.into())
            }
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("json") => CONTENT_TYPE_JSON,
        _ => CONTENT_TYPE_YAML,
    }
}
