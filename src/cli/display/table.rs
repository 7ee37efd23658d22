//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::environment::KubernetesEnvironment;
use crate::infrastructure::constants::MEMORY_LIMIT_ATTRIBUTE;
use crate::infrastructure::kubernetes::resources::pod::{machine_name, PodRole};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use std::collections::BTreeSet;

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the containers of an environment, one row per container.
    /// `declared` holds the machine names the user configured.
    pub fn render_environment(
        &self,
        env: &KubernetesEnvironment,
        declared: &BTreeSet<String>,
    ) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("POD").set_alignment(CellAlignment::Left),
                Cell::new("ROLE").set_alignment(CellAlignment::Center),
                Cell::new("CONTAINER").set_alignment(CellAlignment::Left),
                Cell::new("MACHINE").set_alignment(CellAlignment::Left),
                Cell::new("MEMORY LIMIT").set_alignment(CellAlignment::Right),
            ]);

        for (key, pod_data) in env.pods_data() {
            let Some(meta) = pod_data.metadata() else {
                continue;
            };
            let role = match pod_data.role() {
                PodRole::Ordinary => "ordinary",
                PodRole::Injectable => "injectable",
            };

            for container in pod_data.all_containers() {
                let machine = machine_name(meta, container);
                let memory = env
                    .machines()
                    .get(&machine)
                    .and_then(|m| m.attributes.get(MEMORY_LIMIT_ATTRIBUTE))
                    .cloned()
                    .unwrap_or_else(|| "-".to_string());
                let machine_color = self.theme.get_machine_color(declared.contains(&machine));

                table.add_row(vec![
                    Cell::new(key),
                    Cell::new(role).fg(self.theme.get_role_color(pod_data.role())),
                    Cell::new(&container.name),
                    Cell::new(machine).fg(machine_color),
                    Cell::new(memory).set_alignment(CellAlignment::Right),
                ]);
            }
        }

        let warnings = env.warnings().len();
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Workspace Environment {} ─╮\n",
            format!(
                "[{} pods, {} deployments, {} services, {} PVCs, {} secrets, {} config maps]",
                env.pods().len(),
                env.deployments().len(),
                env.services().len(),
                env.persistent_volume_claims().len(),
                env.secrets().len(),
                env.config_maps().len()
            )
            .bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        for warning in env.warnings() {
            output.push_str(&format!(
                "{} [{}] {}\n",
                StatusIcon::WARNING.yellow(),
                warning.code,
                warning.message
            ));
        }

        output.push_str(&format!(
            "{} {}\n",
            StatusIcon::get_check_icon(true, warnings),
            StatusIcon::get_check_text(true, warnings)
        ));

        output
    }

    /// Render a failed check
    pub fn render_failure(&self, error: &str, infrastructure: bool) -> String {
        let kind = if infrastructure {
            "Infrastructure error"
        } else {
            "Recipe error"
        };
        format!(
            "{} {}\n  {}: {}\n",
            StatusIcon::get_check_icon(false, 0).red(),
            StatusIcon::get_check_text(false, 0).red(),
            kind,
            error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::{InternalEnvironment, Warning};
    use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn env() -> KubernetesEnvironment {
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("pod1".to_string()),
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
        };
        KubernetesEnvironment::builder()
            .with_base(InternalEnvironment {
                warnings: vec![Warning::new(4100, "ingresses ignored")],
                ..Default::default()
            })
            .with_pods(BTreeMap::from([("pod1".to_string(), pod)]))
            .build()
    }

    #[test]
    fn test_render_environment() {
        let renderer = TableRenderer::new();
        let output = renderer.render_environment(&env(), &BTreeSet::new());
        assert!(output.contains("pod1"));
        assert!(output.contains("pod1/main"));
        assert!(output.contains("ordinary"));
        assert!(output.contains("4100"));
    }

    #[test]
    fn test_render_failure() {
        let renderer = TableRenderer::new();
        let output = renderer.render_failure("Environment should contain at least 1 pod or deployment", false);
        assert!(output.contains("Recipe error"));
        assert!(output.contains("at least 1 pod"));
    }
}
