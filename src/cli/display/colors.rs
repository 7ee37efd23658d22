//! Color theme for CLI output

use crate::infrastructure::kubernetes::resources::pod::PodRole;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn get_role_color(&self, role: PodRole) -> TableColor {
        match role {
            PodRole::Ordinary => self.info,
            PodRole::Injectable => self.muted,
        }
    }

    /// Declared machines are shown as healthy, provisioned ones as muted
    pub fn get_machine_color(&self, declared: bool) -> TableColor {
        if declared {
            self.success
        } else {
            self.muted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_role_and_machine_colors() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_role_color(PodRole::Ordinary), TableColor::Cyan);
        assert_eq!(theme.get_role_color(PodRole::Injectable), TableColor::DarkGrey);
        assert_eq!(theme.get_machine_color(true), TableColor::Green);
        assert_eq!(theme.get_machine_color(false), TableColor::DarkGrey);
    }
}
