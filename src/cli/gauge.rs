//! Gauge command implementation.
//!
//! Resizes a stacked gauge sheet to one or more target sizes, keeping every
//! layer's frame pixels crisp.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{AtlasError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{load_sheet, scale_gauge, sized_file_name, write_sheet, GaugeLayout, Sheet};

/// Resize a layered gauge sheet
#[derive(Args, Debug)]
pub struct GaugeArgs {
    /// Gauge sheet to resize
    pub source: PathBuf,

    /// Target size as WxH (e.g. 120x64); repeat for several outputs
    #[arg(long = "size", short, required = true)]
    pub sizes: Vec<String>,

    /// Layer table (YAML or JSON); defaults to background/fill/lines/lines_fill
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Output directory (default: next to the source)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: GaugeArgs) -> Result<()> {
    let printer = Printer::new();

    let layout = match &args.layout {
        Some(path) => GaugeLayout::load(path)?,
        None => GaugeLayout::standard(),
    };
    let sizes = args
        .sizes
        .iter()
        .map(|s| parse_size(s))
        .collect::<Result<Vec<_>>>()?;

    let source = load_sheet(&args.source)?;
    printer.status(
        "Loaded",
        &format!(
            "{} ({}x{}, {})",
            display_path(&args.source),
            source.width(),
            source.height(),
            plural(layout.layers.len(), "layer", "layers")
        ),
    );

    let out_dir = args
        .output
        .clone()
        .or_else(|| args.source.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    for (width, height) in sizes {
        let path = out_dir.join(output_name(&args.source, width, height != source.height()));
        let scaled = scale_gauge(&source.to_region(), &layout, width, height)?;
        write_sheet(&Sheet::from_region(path.display().to_string(), scaled), &path)?;
        printer.status(
            "Wrote",
            &format!("{}x{} {}", width, height, printer.cyan(&display_path(&path))),
        );
    }

    Ok(())
}

fn output_name(source: &Path, width: u32, tall: bool) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gauge".to_string());
    let ext = source
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    sized_file_name(&stem, width, tall, &ext)
}

/// Parse a "WxH" size string.
fn parse_size(s: &str) -> Result<(u32, u32)> {
    let parse_error = || AtlasError::Parse {
        message: format!("Invalid size '{}': expected WxH (e.g. 120x64)", s),
        help: Some("Use the format WxH, for example: 120x64, 150x32".to_string()),
    };

    let (w, h) = s.split_once(['x', 'X']).ok_or_else(parse_error)?;
    let w: u32 = w.trim().parse().map_err(|_| parse_error())?;
    let h: u32 = h.trim().parse().map_err(|_| parse_error())?;

    if w == 0 || h == 0 {
        return Err(AtlasError::Parse {
            message: format!("Size must be non-zero, got {}x{}", w, h),
            help: None,
        });
    }
    Ok((w, h))
}
