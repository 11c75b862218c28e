//! Validate command implementation.
//!
//! Checks atlas configs without loading any source sheet.

use std::path::PathBuf;

use clap::Args;

use crate::atlas::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::{print_diagnostics, validate_config};

/// Validate atlas configs without rendering
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Config files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let printer = Printer::new();
    let mut errors = 0;
    let mut warnings = 0;

    for file in &args.files {
        printer.status("Checking", &display_path(file));
        let config = AtlasConfig::load(file)?;
        let result = validate_config(&config);
        print_diagnostics(&printer, &result);
        errors += result.error_count();
        warnings += result.warning_count();
    }

    if errors > 0 {
        return Err(AtlasError::Config {
            message: format!(
                "validation failed with {} and {}",
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
            help: None,
        });
    }

    printer.status(
        "Finished",
        &format!(
            "{} checked, {}",
            plural(args.files.len(), "config", "configs"),
            plural(warnings, "warning", "warnings")
        ),
    );
    Ok(())
}
