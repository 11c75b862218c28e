//! Build command implementation.
//!
//! Runs one atlas generation per config file and writes the atlas.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::atlas::{
    report_json, write_report_json, AtlasConfig, AtlasRun, CellStatus, FileSink, RunReport,
};
use crate::discovery::{find_configs, DirLoader};
use crate::error::{AtlasError, Result};
use crate::output::{display_path, plural, Printer};

/// Generate atlases from config files
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Atlas config files (atlas.yaml, *.atlas.json, ...)
    pub configs: Vec<PathBuf>,

    /// Also build every atlas config found under this directory
    #[arg(long, value_name = "DIR")]
    pub all: Option<PathBuf>,

    /// Print each run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Write each run report next to its atlas as <output>.report.json
    #[arg(long, conflicts_with = "no_write")]
    pub report: bool,

    /// Composite everything but do not write the atlas
    #[arg(long)]
    pub no_write: bool,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let printer = Printer::new();
    let configs = collect_configs(&args)?;

    if configs.len() == 1 {
        return build_one(&configs[0], &args, &printer).map(|_| ());
    }

    let mut failed = 0;
    for path in &configs {
        if let Err(e) = build_one(path, &args, &printer) {
            printer.error("Failed", &format!("{}: {}", display_path(path), e));
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(AtlasError::Build {
            message: format!(
                "{} of {} failed",
                failed,
                plural(configs.len(), "atlas", "atlases")
            ),
            help: None,
        });
    }
    Ok(())
}

fn collect_configs(args: &BuildArgs) -> Result<Vec<PathBuf>> {
    let mut configs = args.configs.clone();
    if let Some(root) = &args.all {
        configs.extend(find_configs(root));
    }

    if configs.is_empty() {
        return Err(AtlasError::Build {
            message: "no atlas configs to build".to_string(),
            help: Some("Pass config files or use --all <dir>".to_string()),
        });
    }
    Ok(configs)
}

/// Run every stage for one config.
fn build_one(path: &Path, args: &BuildArgs, printer: &Printer) -> Result<RunReport> {
    let config = AtlasConfig::load(path)?;
    printer.status(
        "Building",
        &format!("{} {}", config.name, printer.dim(&format!("({})", display_path(path)))),
    );

    let loader = DirLoader::for_config(&config);
    let composited = AtlasRun::new(&config)?
        .load_sources(&loader)?
        .resolve()
        .composite()?;

    for (key, source) in &composited.report().sources {
        printer.info("Loaded", &format!("{} from {}", key, source.location));
    }
    print_cells(printer, composited.report());

    let report = if args.no_write {
        composited.into_parts().1
    } else {
        let report = composited.persist(&mut FileSink::for_config(&config))?;
        if let Some(output) = &report.output {
            printer.status("Wrote", &printer.cyan(&display_path(output)));
            if args.report {
                let report_path = output.with_extension("report.json");
                write_report_json(&report, &report_path)?;
                printer.status("Wrote", &printer.cyan(&display_path(&report_path)));
            }
        }
        report
    };

    if args.json {
        println!("{}", report_json(&report)?);
    }

    printer.status(
        "Finished",
        &format!(
            "{}: {} placed, {} empty, {} skipped, {} with overrides",
            config.name,
            report.composited_count(),
            report.empty_count(),
            report.failed_count(),
            report.overridden_count()
        ),
    );
    Ok(report)
}

fn print_cells(printer: &Printer, report: &RunReport) {
    for cell in &report.cells {
        let at = cell
            .frame
            .map(|f| format!("({}, {})", f.x, f.y))
            .unwrap_or_else(|| cell.destination.to_string());
        match &cell.status {
            CellStatus::Composited => {
                let tint = match (&cell.preset, &cell.tint) {
                    (Some(preset), _) => preset.clone(),
                    (None, Some(label)) => label.clone(),
                    (None, None) => "-".to_string(),
                };
                let provenance = cell.provenance();
                printer.status(
                    "Placed",
                    &format!("{} @ {} tint={} {}", cell.name, at, tint, printer.dim(&provenance)),
                );
            }
            CellStatus::Empty => printer.info("Empty", &format!("{} @ {}", cell.name, at)),
            CellStatus::Failed { stage, error } => printer.warning(
                "Skipped",
                &format!("{} ({}): {}", cell.name, stage, error),
            ),
        }
    }
}
