//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from validating a project.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the reference querier.
    pub querier: PathBuf,
    /// Path to the config file, `None` when defaults were used.
    pub config_path: Option<PathBuf>,
    /// Names of the checked engines.
    pub engines: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.querier.display()));
        let config = match &self.config_path {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        };
        out.key_value("Config", &config);
        out.key_value("Engines", &self.engines.join(", "));
    }
}
