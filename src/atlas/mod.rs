//! Atlas assembly: configs, style resolution, the run state machine and
//! its report.

mod assembler;
mod config;
mod report;
mod resolve;

pub use assembler::{
    run_atlas, AtlasRun, AtlasSink, CompositedRun, FileSink, LoadedRun, MemorySink, ResolvedRun,
};
pub use config::{read_document, AtlasConfig, CellDecl, SourceRef};
pub use report::{
    report_json, write_report_json, CellReport, CellStatus, FieldSource, RunReport, RunStage,
    SourceReport,
};
pub use resolve::{ResolvedCell, StyleResolver};
