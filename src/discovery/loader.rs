//! Source sheet loaders.
//!
//! The assembler never touches the filesystem itself; it asks a
//! [`SheetLoader`] for each file named in the `sources` table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::atlas::AtlasConfig;
use crate::error::Result;
use crate::render::{load_sheet, Sheet};

/// A decoded sheet plus a description of where it was found.
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub sheet: Sheet,
    pub location: String,
}

/// Supplies decoded source sheets by file name.
pub trait SheetLoader {
    /// Look up `file`. `Ok(None)` means it exists nowhere this loader looks;
    /// `Err` means it was found but could not be decoded.
    fn load(&self, file: &Path) -> Result<Option<LoadedSheet>>;
}

/// Loads image files from an ordered list of directories.
///
/// The first directory that contains the file wins, so a variant directory
/// listed before a shared master directory shadows it.
#[derive(Debug, Clone, Default)]
pub struct DirLoader {
    dirs: Vec<PathBuf>,
}

impl DirLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Search the config directory, then its `search` directories.
    pub fn for_config(config: &AtlasConfig) -> Self {
        Self::new(config.search_dirs())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn candidates(&self, file: &Path) -> Vec<PathBuf> {
        if file.is_absolute() {
            vec![file.to_path_buf()]
        } else {
            self.dirs.iter().map(|d| d.join(file)).collect()
        }
    }
}

impl SheetLoader for DirLoader {
    fn load(&self, file: &Path) -> Result<Option<LoadedSheet>> {
        for candidate in self.candidates(file) {
            if candidate.is_file() {
                let sheet = load_sheet(&candidate)?;
                return Ok(Some(LoadedSheet {
                    sheet,
                    location: candidate.display().to_string(),
                }));
            }
        }
        Ok(None)
    }
}

/// Serves sheets that are already decoded, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sheets: HashMap<PathBuf, Sheet>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<PathBuf>, sheet: Sheet) {
        self.sheets.insert(file.into(), sheet);
    }

    pub fn with(mut self, file: impl Into<PathBuf>, sheet: Sheet) -> Self {
        self.insert(file, sheet);
        self
    }
}

impl SheetLoader for MemoryLoader {
    fn load(&self, file: &Path) -> Result<Option<LoadedSheet>> {
        Ok(self.sheets.get(file).map(|sheet| LoadedSheet {
            sheet: sheet.clone(),
            location: "memory".to_string(),
        }))
    }
}
