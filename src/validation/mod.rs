//! Validation for atlas configs.
//!
//! Runs a suite of checks against a parsed config before any pixel work
//! and reports errors and warnings. Used by `atlasgen validate` and at the
//! start of every atlas run; errors abort the run.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::atlas::AtlasConfig;
use crate::output::Printer;

/// Run all validation checks against the config.
pub fn validate_config(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_grids(config));
    result.merge(checks::check_background_grid(config));
    result.merge(checks::check_source_keys(config));
    result.merge(checks::check_style_values(config));
    result.merge(checks::check_cells(config));
    result.merge(checks::check_preset_refs(config));

    result
}

/// Print diagnostics as status lines.
pub fn print_diagnostics(printer: &Printer, result: &ValidationResult) {
    for d in result.iter() {
        let line = format!("[{}] {}", d.code, d.message);
        match d.severity {
            Severity::Error => printer.error("error", &line),
            Severity::Warning => printer.warning("warning", &line),
        }
        if let Some(help) = &d.help {
            printer.info("help", help);
        }
    }
}
