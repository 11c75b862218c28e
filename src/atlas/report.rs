//! Per-run report: what happened to every cell, and where its style came from.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AtlasError, Result};
use crate::types::{CellAddress, CellStyle, Rect, StyleSource};

/// Stage an atlas run has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Idle,
    SourcesLoaded,
    CellsResolved,
    Composited,
    Persisted,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::SourcesLoaded => "sources loaded",
            RunStage::CellsResolved => "cells resolved",
            RunStage::Composited => "composited",
            RunStage::Persisted => "persisted",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CellStatus {
    Composited,
    /// Nothing visible to place; the cell holds only its background.
    Empty,
    /// The cell was skipped and left transparent.
    Failed { stage: RunStage, error: String },
}

impl CellStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, CellStatus::Failed { .. })
    }
}

/// Which layer supplied one style field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSource {
    pub field: &'static str,
    pub source: StyleSource,
}

/// Report entry for one declared cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub name: String,
    pub destination: CellAddress,
    /// Pixel rectangle in the atlas; absent when the address is invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
    /// Style fields the cell set itself.
    pub overridden: Vec<&'static str>,
    pub sources: Vec<FieldSource>,
    #[serde(flatten)]
    pub status: CellStatus,
}

impl CellReport {
    pub(crate) fn new(name: &str, destination: CellAddress, frame: Option<Rect>) -> Self {
        Self {
            name: name.to_string(),
            destination,
            frame,
            preset: None,
            tint: None,
            overridden: Vec::new(),
            sources: Vec::new(),
            status: CellStatus::Composited,
        }
    }

    pub(crate) fn record_style(&mut self, style: &CellStyle) {
        self.preset = style.preset.clone();
        self.tint = Some(style.tint.value.label());
        self.sources = style
            .field_sources()
            .into_iter()
            .map(|(field, source)| FieldSource { field, source })
            .collect();
    }

    pub(crate) fn fail(&mut self, stage: RunStage, error: &AtlasError) {
        self.status = CellStatus::Failed {
            stage,
            error: error.to_string(),
        };
    }

    /// Compact provenance tag, e.g. `tint:p fit_size:o`, for non-builtin fields.
    pub fn provenance(&self) -> String {
        self.sources
            .iter()
            .filter(|s| s.source != StyleSource::Builtin)
            .map(|s| format!("{}:{}", s.field, s.source.letter()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A loaded source sheet and where it was found.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub file: PathBuf,
    pub location: String,
    pub size: [u32; 2],
}

/// Summary of one atlas run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub atlas: String,
    pub size: [u32; 2],
    pub stage: RunStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub sources: BTreeMap<String, SourceReport>,
    pub cells: Vec<CellReport>,
}

impl RunReport {
    pub fn new(atlas: &str, size: [u32; 2]) -> Self {
        Self {
            atlas: atlas.to_string(),
            size,
            stage: RunStage::Idle,
            output: None,
            sources: BTreeMap::new(),
            cells: Vec::new(),
        }
    }

    pub fn cell(&self, name: &str) -> Option<&CellReport> {
        self.cells.iter().find(|c| c.name == name)
    }

    pub fn composited_count(&self) -> usize {
        self.count(|s| matches!(s, CellStatus::Composited))
    }

    pub fn empty_count(&self) -> usize {
        self.count(|s| matches!(s, CellStatus::Empty))
    }

    pub fn failed_count(&self) -> usize {
        self.count(CellStatus::is_failed)
    }

    /// Cells that set at least one style field themselves.
    pub fn overridden_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.overridden.is_empty()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CellReport> {
        self.cells.iter().filter(|c| c.status.is_failed())
    }

    fn count(&self, pred: impl Fn(&CellStatus) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(&c.status)).count()
    }
}

/// Write a run report as pretty-printed JSON.
pub fn write_report_json(report: &RunReport, path: &Path) -> Result<()> {
    let json = report_json(report)?;
    fs::write(path, json).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write run report: {}", e),
    })?;
    Ok(())
}

/// Render a run report as pretty-printed JSON.
pub fn report_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| AtlasError::Build {
        message: format!("Failed to serialize run report: {}", e),
        help: None,
    })
}
