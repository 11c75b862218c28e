//! atlasgen - grid atlas compositing engine
//!
//! Cuts cells out of grid-packed source sheets, recolours grayscale art
//! through luminance gradient ramps, fits it into destination cells and
//! composites it over background cells to build UI texture atlases. Also
//! resizes stacked gauge strips without blurring their frame pixels.

pub mod atlas;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod render;
pub mod types;
pub mod validation;

pub use atlas::{
    run_atlas, write_report_json, AtlasConfig, AtlasRun, AtlasSink, CellDecl, CellReport,
    CellStatus, FileSink, MemorySink, RunReport, RunStage, StyleResolver,
};
pub use discovery::{find_configs, DirLoader, MemoryLoader, SheetLoader};
pub use error::{AtlasError, Result};
pub use render::{
    apply_tint, apply_tone, composite_over, fit_region, load_sheet, scale_axis, scale_gauge,
    scale_strip, tint_region, write_sheet, GaugeLayout, Region, Sheet,
};
pub use types::{
    Axis, CellAddress, CellStyle, Colour, ColorRamp, FitMode, GridSpec, Interpolation,
    RampDirection, Rect, StripSpec, StyleOverrides, StyleSource, Tint, Tone,
};
pub use validation::{validate_config, Diagnostic, Severity, ValidationResult};
