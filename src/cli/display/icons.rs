//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    /// Icon for the outcome of an environment check
    pub fn get_check_icon(valid: bool, warnings: usize) -> &'static str {
        if !valid {
            Self::ERROR
        } else if warnings > 0 {
            Self::WARNING
        } else {
            Self::SUCCESS
        }
    }

    pub fn get_check_text(valid: bool, warnings: usize) -> &'static str {
        if !valid {
            "Invalid"
        } else if warnings > 0 {
            "Valid with warnings"
        } else {
            "Valid"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_check_icon() {
        assert_eq!(StatusIcon::get_check_icon(true, 0), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_check_icon(true, 2), StatusIcon::WARNING);
        assert_eq!(StatusIcon::get_check_icon(false, 0), StatusIcon::ERROR);
    }

    #[test]
    fn test_get_check_text() {
        assert_eq!(StatusIcon::get_check_text(true, 0), "Valid");
        assert_eq!(StatusIcon::get_check_text(true, 1), "Valid with warnings");
        assert_eq!(StatusIcon::get_check_text(false, 1), "Invalid");
    }
}
