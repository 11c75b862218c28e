//! Atlas run state machine.
//!
//! A run moves through `Idle -> SourcesLoaded -> CellsResolved -> Composited
//! -> Persisted`, each stage its own type, so stages can only be taken in
//! order. Failing to load a declared source ends the run, as does a fatal
//! error while compositing (see [`AtlasError::is_fatal`]); cell-scoped
//! failures are recorded in the report and that cell stays transparent.
//!
//! ```ignore
//! let report = AtlasRun::new(&config)?
//!     .load_sources(&DirLoader::for_config(&config))?
//!     .resolve()
//!     .composite()?
//!     .persist(&mut FileSink::for_config(&config))?;
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::discovery::SheetLoader;
use crate::error::{AtlasError, Result};
use crate::render::{
    apply_tint, apply_tone, composite_over, fit_region, write_sheet, Fitted, Region, Sheet,
};
use crate::types::CellStyle;
use crate::validation::validate_config;

use super::report::{CellReport, CellStatus, RunReport, RunStage, SourceReport};
use super::resolve::{ResolvedCell, StyleResolver};
use super::{AtlasConfig, CellDecl};

/// Destination for a finished atlas.
pub trait AtlasSink {
    /// Store the atlas, returning where it went if that is a file.
    fn persist(&mut self, atlas: &Sheet) -> Result<Option<PathBuf>>;
}

/// Writes the atlas to an image file; format follows the extension.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write to the config's `output` path.
    pub fn for_config(config: &AtlasConfig) -> Self {
        Self::new(config.output_path())
    }
}

impl AtlasSink for FileSink {
    fn persist(&mut self, atlas: &Sheet) -> Result<Option<PathBuf>> {
        write_sheet(atlas, &self.path)?;
        Ok(Some(self.path.clone()))
    }
}

/// Keeps the atlas in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub atlas: Option<Sheet>,
}

impl AtlasSink for MemorySink {
    fn persist(&mut self, atlas: &Sheet) -> Result<Option<PathBuf>> {
        self.atlas = Some(atlas.clone());
        Ok(None)
    }
}

/// A validated run that has not touched any pixels yet.
#[derive(Debug)]
pub struct AtlasRun<'c> {
    config: &'c AtlasConfig,
    report: RunReport,
}

impl<'c> AtlasRun<'c> {
    /// Validate `config`; errors abort before any source is loaded.
    pub fn new(config: &'c AtlasConfig) -> Result<Self> {
        if let Some(err) = validate_config(config).into_error() {
            return Err(err);
        }
        Ok(Self {
            config,
            report: RunReport::new(&config.name, config.size),
        })
    }

    pub fn stage(&self) -> RunStage {
        RunStage::Idle
    }

    /// Load every declared source. A source found nowhere is fatal.
    pub fn load_sources(self, loader: &dyn SheetLoader) -> Result<LoadedRun<'c>> {
        let config = self.config;
        let mut report = self.report;
        let mut sheets = HashMap::new();

        for (key, file) in &config.sources {
            let loaded = loader
                .load(file)?
                .ok_or_else(|| AtlasError::MissingSource {
                    name: file.display().to_string(),
                })?;

            report.sources.insert(
                key.clone(),
                SourceReport {
                    file: file.clone(),
                    location: loaded.location,
                    size: [loaded.sheet.width(), loaded.sheet.height()],
                },
            );
            sheets.insert(key.as_str(), loaded.sheet);
        }

        report.stage = RunStage::SourcesLoaded;
        Ok(LoadedRun {
            config,
            sheets,
            report,
        })
    }
}

/// Every source sheet is in memory.
#[derive(Debug)]
pub struct LoadedRun<'c> {
    config: &'c AtlasConfig,
    sheets: HashMap<&'c str, Sheet>,
    report: RunReport,
}

impl<'c> LoadedRun<'c> {
    pub fn stage(&self) -> RunStage {
        RunStage::SourcesLoaded
    }

    pub fn sheet(&self, key: &str) -> Option<&Sheet> {
        self.sheets.get(key)
    }

    /// Resolve each cell's style. Unknown presets fail only their cell.
    pub fn resolve(self) -> ResolvedRun<'c> {
        let config = self.config;
        let cells = StyleResolver::new(config).resolve_all(&config.cells);
        let mut report = self.report;
        report.stage = RunStage::CellsResolved;

        ResolvedRun {
            config,
            sheets: self.sheets,
            cells,
            report,
        }
    }
}

/// Every cell has a style or a recorded resolution failure.
#[derive(Debug)]
pub struct ResolvedRun<'c> {
    config: &'c AtlasConfig,
    sheets: HashMap<&'c str, Sheet>,
    cells: Vec<ResolvedCell<'c>>,
    report: RunReport,
}

impl<'c> ResolvedRun<'c> {
    pub fn stage(&self) -> RunStage {
        RunStage::CellsResolved
    }

    pub fn cells(&self) -> &[ResolvedCell<'c>] {
        &self.cells
    }

    /// Render every resolved cell into a fresh transparent atlas.
    ///
    /// Cell-scoped errors are recorded against their cell; any other error
    /// aborts the run.
    pub fn composite(self) -> Result<CompositedRun> {
        let config = self.config;
        let [width, height] = config.size;
        let mut atlas = Sheet::new(config.name.clone(), width, height);
        let mut entries = Vec::with_capacity(self.cells.len());

        for cell in &self.cells {
            let decl = cell.decl;
            let frame = config.output_grid.rect_of(decl.destination).ok();
            let mut entry = CellReport::new(&decl.name, decl.destination, frame);
            entry.overridden = cell.overridden_fields();

            match &cell.style {
                Err(e) => entry.fail(RunStage::CellsResolved, e),
                Ok(style) => {
                    entry.record_style(style);
                    match self.place_cell(&mut atlas, decl, style) {
                        Ok(true) => entry.status = CellStatus::Empty,
                        Ok(false) => {}
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => entry.fail(RunStage::Composited, &e),
                    }
                }
            }
            entries.push(entry);
        }

        let mut report = self.report;
        report.cells = entries;
        report.stage = RunStage::Composited;
        Ok(CompositedRun { atlas, report })
    }

    /// Render one cell and paste it; returns whether it had no foreground.
    fn place_cell(&self, atlas: &mut Sheet, decl: &CellDecl, style: &CellStyle) -> Result<bool> {
        let (region, empty) = self.render_cell(decl, style)?;
        let rect = self.config.output_grid.rect_of(decl.destination)?;
        atlas.paste(&region, rect.x, rect.y)?;
        Ok(empty)
    }

    /// Crop, tone, tint, fit (border-preserving when the style has a strip),
    /// then composite over the background cell.
    pub fn render_cell(&self, decl: &CellDecl, style: &CellStyle) -> Result<(Region, bool)> {
        let config = self.config;
        let cell_size = config.cell_size();

        let fitted = match &decl.source {
            Some(source) => {
                let sheet = self.sheet(config.sheet_key(source))?;
                let rect = config.source_grid.rect_of(source.address())?;
                let mut item = sheet.crop(rect)?;
                if let Some(tone) = &style.tone.value {
                    item = apply_tone(&item, tone);
                }
                let tinted = apply_tint(&item, &style.tint.value);
                fit_region(
                    &tinted,
                    cell_size,
                    style.fit_size.value,
                    style.offset_x.value,
                    style.offset_y.value,
                    style.fit_mode.value,
                    style.strip.value.as_ref(),
                )?
            }
            None => Fitted {
                region: Region::transparent(cell_size, cell_size),
                is_empty: true,
            },
        };

        let background = match &config.background {
            Some(key) => {
                let rect = config.background_grid().rect_of(style.background.value)?;
                self.sheet(key)?.crop(rect)?
            }
            None => Region::transparent(cell_size, cell_size),
        };

        let region = composite_over(&fitted.region, &background, style.opacity.value)?;
        Ok((region, fitted.is_empty))
    }

    fn sheet(&self, key: &str) -> Result<&Sheet> {
        self.sheets.get(key).ok_or_else(|| AtlasError::MissingSource {
            name: key.to_string(),
        })
    }
}

/// The atlas is fully composited in memory.
#[derive(Debug)]
pub struct CompositedRun {
    atlas: Sheet,
    report: RunReport,
}

impl CompositedRun {
    pub fn stage(&self) -> RunStage {
        RunStage::Composited
    }

    pub fn atlas(&self) -> &Sheet {
        &self.atlas
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Take the atlas and report without persisting.
    pub fn into_parts(self) -> (Sheet, RunReport) {
        (self.atlas, self.report)
    }

    /// Hand the atlas to `sink` exactly once.
    pub fn persist(self, sink: &mut dyn AtlasSink) -> Result<RunReport> {
        let mut report = self.report;
        report.output = sink.persist(&self.atlas)?;
        report.stage = RunStage::Persisted;
        Ok(report)
    }
}

/// Run every stage for `config` and persist the atlas.
pub fn run_atlas(
    config: &AtlasConfig,
    loader: &dyn SheetLoader,
    sink: &mut dyn AtlasSink,
) -> Result<RunReport> {
    AtlasRun::new(config)?
        .load_sources(loader)?
        .resolve()
        .composite()?
        .persist(sink)
}
