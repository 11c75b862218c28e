//! Atlas configuration (`atlas.yaml` / `atlas.json`).
//!
//! One config describes one atlas run: the source sheets, the grids used to
//! address them, a table of named tint presets, the base style layer and the
//! list of output cells.
//!
//! # Example
//!
//! ```yaml
//! name: gold-slots
//! output: item_slots_thorne01.tga
//! size: [256, 256]
//! sources:
//!   items: thorne_item01.tga
//!   buttons: thorne_buttons01.tga
//! foreground: items
//! background: buttons
//! source_grid: { cell_size: 40 }
//! background_grid: { cell_size: 40, sep_x: 2, sep_y: 2 }
//! output_grid: { cell_size: 40 }
//! search: [../.Master]
//! presets:
//!   gold: { top: "#DEBE5C", bottom: "#483712" }
//! defaults:
//!   preset: gold
//!   fit_size: 34
//! cells:
//!   - name: helm
//!     source: { row: 1, col: 1 }
//!     destination: { row: 1, col: 1 }
//!     fit_mode: visible
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::types::{CellAddress, GridSpec, StyleOverrides, Tint};

/// Where a cell's foreground art comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source key; defaults to the config's `foreground` sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub row: u32,
    pub col: u32,
}

impl SourceRef {
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

/// One declared output cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDecl {
    pub name: String,
    /// Foreground cell; `None` leaves only the background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
    pub destination: CellAddress,
    #[serde(flatten)]
    pub style: StyleOverrides,
}

/// Configuration of one atlas-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Output file, relative to the config directory.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Output atlas size as `[width, height]`.
    #[serde(default = "default_size")]
    pub size: [u32; 2],

    /// Source key -> image file.
    pub sources: BTreeMap<String, PathBuf>,

    /// Source key used for cells that do not name one.
    #[serde(default = "default_foreground")]
    pub foreground: String,

    /// Source key of the background sheet, if cells sit on backgrounds.
    #[serde(default)]
    pub background: Option<String>,

    pub source_grid: GridSpec,

    /// Grid of the background sheet; defaults to `output_grid`.
    #[serde(default)]
    pub background_grid: Option<GridSpec>,

    pub output_grid: GridSpec,

    #[serde(default)]
    pub presets: BTreeMap<String, Tint>,

    /// Base style layer shared by every cell.
    #[serde(default)]
    pub defaults: StyleOverrides,

    #[serde(default)]
    pub cells: Vec<CellDecl>,

    /// Extra directories searched for source files, in order.
    #[serde(default)]
    pub search: Vec<PathBuf>,

    /// Directory relative paths resolve against; set when loading.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_name() -> String {
    "atlas".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("atlas.png")
}

fn default_size() -> [u32; 2] {
    [256, 256]
}

fn default_foreground() -> String {
    "items".to_string()
}

impl AtlasConfig {
    /// Load a config file; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = read_document(path)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse a config from YAML.
    pub fn parse_yaml(content: &str) -> Result<Self> {
        parse_yaml(content)
    }

    /// Parse a config from JSON.
    pub fn parse_json(content: &str) -> Result<Self> {
        parse_json(content)
    }

    /// Grid of the background sheet.
    pub fn background_grid(&self) -> GridSpec {
        self.background_grid.unwrap_or(self.output_grid)
    }

    /// Output cell edge length.
    pub fn cell_size(&self) -> u32 {
        self.output_grid.cell_size
    }

    /// Resolve a config-relative path.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Absolute output path.
    pub fn output_path(&self) -> PathBuf {
        self.resolve_path(&self.output)
    }

    /// Directories to search for sources: the config directory, then `search`.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.base_dir.clone()];
        dirs.extend(self.search.iter().map(|d| self.resolve_path(d)));
        dirs
    }

    /// Source key a cell reads its foreground from.
    pub fn sheet_key<'a>(&'a self, source: &'a SourceRef) -> &'a str {
        source.sheet.as_deref().unwrap_or(&self.foreground)
    }
}

/// Read a YAML or JSON document, chosen by extension (`.json` is JSON,
/// anything else YAML).
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read config: {}", e),
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(&content)
    } else {
        parse_yaml(&content)
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| AtlasError::Parse {
        message: format!("Invalid config: {}", e),
        help: Some("Check the YAML syntax and field names".to_string()),
    })
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| AtlasError::Parse {
        message: format!("Invalid config: {}", e),
        help: Some("Check the JSON syntax and field names".to_string()),
    })
}
