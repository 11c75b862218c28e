//! Style resolution: built-ins, then `defaults`, then presets, then the
//! cell's own fields.

use std::collections::BTreeMap;

use crate::error::{AtlasError, Result};
use crate::types::{CellStyle, Sourced, StyleOverrides, StyleSource, Tint};

use super::{AtlasConfig, CellDecl};

/// A declared cell paired with its resolved style, or the reason it has none.
#[derive(Debug)]
pub struct ResolvedCell<'c> {
    pub decl: &'c CellDecl,
    pub style: Result<CellStyle>,
}

impl ResolvedCell<'_> {
    /// Fields the cell sets itself.
    pub fn overridden_fields(&self) -> Vec<&'static str> {
        self.decl.style.set_fields()
    }
}

/// Resolves cell styles against one config's presets and defaults.
pub struct StyleResolver<'c> {
    presets: &'c BTreeMap<String, Tint>,
    defaults: &'c StyleOverrides,
}

impl<'c> StyleResolver<'c> {
    pub fn new(config: &'c AtlasConfig) -> Self {
        Self {
            presets: &config.presets,
            defaults: &config.defaults,
        }
    }

    /// Resolve the style of one cell.
    ///
    /// Fails with [`AtlasError::UnknownPreset`] when the cell, or the
    /// defaults it inherits, name a preset that does not exist.
    pub fn resolve(&self, decl: &CellDecl) -> Result<CellStyle> {
        let mut style = CellStyle::builtin();
        self.apply(&mut style, self.defaults, StyleSource::Default)?;
        self.apply(&mut style, &decl.style, StyleSource::Override)?;
        Ok(style)
    }

    fn apply(&self, style: &mut CellStyle, layer: &StyleOverrides, source: StyleSource) -> Result<()> {
        style.layer_fields(layer, source);

        if let Some(name) = &layer.preset {
            let tint = self.preset(name)?;
            style.tint = Sourced::new(tint.clone(), StyleSource::Preset);
            style.preset = Some(name.clone());
        }
        if let Some(tint) = &layer.tint {
            style.tint = Sourced::new(tint.clone(), source);
        }
        Ok(())
    }

    fn preset(&self, name: &str) -> Result<&'c Tint> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            AtlasError::UnknownPreset {
                name: name.to_string(),
                help: Some(if known.is_empty() {
                    "No presets are defined in this config".to_string()
                } else {
                    format!("Available presets: {}", known.join(", "))
                }),
            }
        })
    }

    /// Resolve every cell of `config` in declaration order.
    pub fn resolve_all(&self, cells: &'c [CellDecl]) -> Vec<ResolvedCell<'c>> {
        cells
            .iter()
            .map(|decl| ResolvedCell {
                decl,
                style: self.resolve(decl),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, ColorRamp, FitMode, RampDirection};

    fn config(yaml: &str) -> AtlasConfig {
        let base = r##"
sources: { items: items.png }
source_grid: { cell_size: 8 }
output_grid: { cell_size: 8 }
presets:
  gold: { top: "#DEBE5C", bottom: "#483712" }
  silver: { top: "#FFFFFF", middle: "#A0A0A0", bottom: "#404040" }
"##;
        AtlasConfig::parse_yaml(&format!("{}{}", base, yaml)).unwrap()
    }

    #[test]
    fn test_builtin_when_nothing_set() {
        let config = config("cells: [{ name: a, destination: { row: 1, col: 1 } }]");
        let style = StyleResolver::new(&config).resolve(&config.cells[0]).unwrap();
        assert_eq!(style, CellStyle::builtin());
    }

    #[test]
    fn test_precedence() {
        let config = config(
            r##"
defaults:
  preset: gold
  fit_size: 30
  opacity: 0.8
cells:
  - name: a
    destination: { row: 1, col: 1 }
  - name: b
    destination: { row: 1, col: 2 }
    preset: silver
    fit_size: 20
  - name: c
    destination: { row: 1, col: 3 }
    preset: silver
    tint: { top: "#FF0000", bottom: "#000000" }
    fit_mode: visible
"##,
        );
        let resolver = StyleResolver::new(&config);

        let a = resolver.resolve(&config.cells[0]).unwrap();
        assert_eq!(a.preset.as_deref(), Some("gold"));
        assert_eq!(a.tint.source, StyleSource::Preset);
        assert_eq!(a.fit_size, Sourced::new(30, StyleSource::Default));
        assert_eq!(a.opacity, Sourced::new(0.8, StyleSource::Default));
        assert_eq!(a.offset_y.source, StyleSource::Builtin);

        let b = resolver.resolve(&config.cells[1]).unwrap();
        assert_eq!(b.preset.as_deref(), Some("silver"));
        assert_eq!(b.tint.value, config.presets["silver"]);
        assert_eq!(b.fit_size, Sourced::new(20, StyleSource::Override));

        let c = resolver.resolve(&config.cells[2]).unwrap();
        assert_eq!(c.tint.source, StyleSource::Override);
        assert_eq!(
            c.tint.value,
            Tint::Ramp(ColorRamp::two_stop(
                Colour::rgb(255, 0, 0),
                Colour::BLACK,
                RampDirection::Vertical
            ))
        );
        assert_eq!(c.fit_mode, Sourced::new(FitMode::Visible, StyleSource::Override));
        assert_eq!(c.fit_size, Sourced::new(30, StyleSource::Default));
    }

    #[test]
    fn test_defaults_inline_tint_is_default_source() {
        let config = config(
            "defaults: { tint: direct }\ncells: [{ name: a, destination: { row: 1, col: 1 } }]",
        );
        let style = StyleResolver::new(&config).resolve(&config.cells[0]).unwrap();
        assert_eq!(style.tint, Sourced::new(Tint::Direct, StyleSource::Default));
        assert!(style.preset.is_none());
    }

    #[test]
    fn test_unknown_preset_fails_only_that_cell() {
        let config = config(
            r#"
cells:
  - { name: ok, destination: { row: 1, col: 1 }, preset: gold }
  - { name: bad, destination: { row: 1, col: 2 }, preset: bronze }
"#,
        );
        let resolved = StyleResolver::new(&config).resolve_all(&config.cells);
        assert!(resolved[0].style.is_ok());
        match &resolved[1].style {
            Err(AtlasError::UnknownPreset { name, help }) => {
                assert_eq!(name, "bronze");
                assert!(help.as_deref().unwrap().contains("gold, silver"));
            }
            other => panic!("expected UnknownPreset, got {:?}", other),
        }
        assert_eq!(resolved[1].overridden_fields(), vec!["preset"]);
    }
}
