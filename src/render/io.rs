//! Reading and writing sheets as image files.
//!
//! The format follows the file extension; any format the `image` crate
//! decodes can be loaded, and everything is converted to 8-bit RGBA.

use std::path::Path;

use crate::error::{AtlasError, Result};

use super::Sheet;

/// Decode an image file into an RGBA sheet named after the file.
pub fn load_sheet(path: &Path) -> Result<Sheet> {
    let img = image::open(path).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Sheet::from_image(name, img.to_rgba8()))
}

/// Write a sheet to `path` in one go.
pub fn write_sheet(sheet: &Sheet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AtlasError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    sheet.image().save(path).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write image: {}", e),
    })?;

    Ok(())
}
