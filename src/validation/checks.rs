//! Validation checks for atlas configs.
//!
//! Each check takes an `&AtlasConfig` and returns a `ValidationResult`.

use std::collections::{HashMap, HashSet};

use crate::atlas::AtlasConfig;
use crate::types::{GridSpec, StyleOverrides};

use super::warning::{Diagnostic, ValidationResult};

/// Every grid needs a positive cell size.
pub fn check_grids(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut grids: Vec<(&str, GridSpec)> = vec![
        ("source_grid", config.source_grid),
        ("output_grid", config.output_grid),
    ];
    if let Some(grid) = config.background_grid {
        grids.push(("background_grid", grid));
    }

    for (name, grid) in grids {
        if grid.validate().is_err() {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::grid",
                    format!("{} has a cell_size of 0", name),
                )
                .with_help("Set cell_size to the pixel edge length of one cell")
                .about(name),
            );
        }
    }

    let [w, h] = config.size;
    if w == 0 || h == 0 {
        result.push(Diagnostic::error(
            "atlasgen::validate::size",
            format!("atlas size {}x{} is empty", w, h),
        ));
    }

    result
}

/// Background cells are composited 1:1 under output cells.
pub fn check_background_grid(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    if config.background.is_none() {
        return result;
    }

    let bg = config.background_grid().cell_size;
    let out = config.output_grid.cell_size;
    if bg != out {
        result.push(
            Diagnostic::error(
                "atlasgen::validate::background-grid",
                format!(
                    "background cells are {}px but output cells are {}px",
                    bg, out
                ),
            )
            .with_help("Give background_grid the same cell_size as output_grid"),
        );
    }

    result
}

/// Source keys used by the config must be declared in `sources`.
pub fn check_source_keys(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let declared = || {
        let keys: Vec<&str> = config.sources.keys().map(String::as_str).collect();
        format!("Declared sources: {}", keys.join(", "))
    };

    if let Some(key) = &config.background {
        if !config.sources.contains_key(key) {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::unknown-source",
                    format!("background source '{}' is not declared", key),
                )
                .with_help(declared()),
            );
        }
    }

    let mut reported = HashSet::new();
    for cell in &config.cells {
        let Some(source) = &cell.source else {
            continue;
        };
        let key = config.sheet_key(source);
        if !config.sources.contains_key(key) && reported.insert(key) {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::unknown-source",
                    format!("cell '{}' reads from undeclared source '{}'", cell.name, key),
                )
                .with_help(declared())
                .about(&cell.name),
            );
        }
    }

    result
}

/// Opacity, fit size and tone values must be in range.
pub fn check_style_values(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_layer(&mut result, "defaults", &config.defaults, config.cell_size());
    for cell in &config.cells {
        check_layer(&mut result, &cell.name, &cell.style, config.cell_size());
    }

    result
}

fn check_layer(result: &mut ValidationResult, subject: &str, layer: &StyleOverrides, cell_size: u32) {
    if let Some(opacity) = layer.opacity {
        if !(0.0..=1.0).contains(&opacity) {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::opacity",
                    format!("'{}' has opacity {} outside 0..1", subject, opacity),
                )
                .about(subject),
            );
        }
    }

    match layer.fit_size {
        Some(0) => result.push(
            Diagnostic::error(
                "atlasgen::validate::fit-size",
                format!("'{}' has a fit_size of 0", subject),
            )
            .about(subject),
        ),
        Some(size) if size > cell_size => result.push(
            Diagnostic::warning(
                "atlasgen::validate::fit-size",
                format!(
                    "'{}' fit_size {} exceeds the {}px cell and will be clamped",
                    subject, size, cell_size
                ),
            )
            .about(subject),
        ),
        _ => {}
    }

    if let Some(tone) = layer.tone {
        if tone.contrast < 0.0 || tone.brightness < 0.0 {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::tone",
                    format!("'{}' has a negative tone contrast or brightness", subject),
                )
                .about(subject),
            );
        }
    }
}

/// Cell names must be unique; destinations should be.
pub fn check_cells(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut names = HashSet::new();
    let mut destinations: HashMap<_, &str> = HashMap::new();
    let [width, height] = config.size;

    for cell in &config.cells {
        if !names.insert(cell.name.as_str()) {
            result.push(
                Diagnostic::error(
                    "atlasgen::validate::duplicate-name",
                    format!("cell name '{}' is used more than once", cell.name),
                )
                .about(&cell.name),
            );
        }

        if let Some(first) = destinations.insert(cell.destination, &cell.name) {
            result.push(
                Diagnostic::warning(
                    "atlasgen::validate::duplicate-destination",
                    format!(
                        "cells '{}' and '{}' both target {}",
                        first, cell.name, cell.destination
                    ),
                )
                .with_help("The later cell overwrites the earlier one")
                .about(&cell.name),
            );
        }

        match config.output_grid.rect_of(cell.destination) {
            Ok(rect) if !rect.fits_within(width, height) => result.push(
                Diagnostic::error(
                    "atlasgen::validate::destination",
                    format!(
                        "cell '{}' at {} ({}) lies outside the {}x{} atlas",
                        cell.name, cell.destination, rect, width, height
                    ),
                )
                .about(&cell.name),
            ),
            Ok(_) => {}
            Err(e) => result.push(
                Diagnostic::error("atlasgen::validate::destination", e.to_string())
                    .about(&cell.name),
            ),
        }

        if let Some(source) = &cell.source {
            if source.address().to_zero_based().is_err() {
                result.push(
                    Diagnostic::error(
                        "atlasgen::validate::source-cell",
                        format!("cell '{}' has a source address that is not 1-based", cell.name),
                    )
                    .about(&cell.name),
                );
            }
        }
    }

    result
}

/// Preset references that resolve to nothing.
///
/// Only a warning: the affected cells fail on their own during the run.
pub fn check_preset_refs(config: &AtlasConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    let layers = std::iter::once(("defaults", &config.defaults))
        .chain(config.cells.iter().map(|c| (c.name.as_str(), &c.style)));

    for (subject, layer) in layers {
        if let Some(preset) = &layer.preset {
            if !config.presets.contains_key(preset) {
                result.push(
                    Diagnostic::warning(
                        "atlasgen::validate::unknown-preset",
                        format!("'{}' uses undefined preset '{}'", subject, preset),
                    )
                    .with_help("The cell will be skipped and left transparent")
                    .about(subject),
                );
            }
        }
    }

    result
}
