use miette::Diagnostic;
use thiserror::Error;

/// Main error type for atlasgen operations
#[derive(Error, Diagnostic, Debug)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    #[diagnostic(code(atlasgen::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(atlasgen::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(atlasgen::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(atlasgen::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Source sheet not found: {name}")]
    #[diagnostic(
        code(atlasgen::source),
        help("Check the `sources` table and the `search` directories")
    )]
    MissingSource { name: String },

    #[error("Rectangle {x},{y} {w}x{h} lies outside sheet '{sheet}' ({sheet_w}x{sheet_h})")]
    #[diagnostic(code(atlasgen::bounds))]
    OutOfBounds {
        sheet: String,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        sheet_w: u32,
        sheet_h: u32,
    },

    #[error("Cell at row {row}, column {col} lies beyond any addressable pixel")]
    #[diagnostic(
        code(atlasgen::bounds),
        help("Grid addresses are multiplied by the cell pitch and must stay within a sheet")
    )]
    CellOverflow { row: u64, col: u64 },

    #[error("Border of {border}px leaves no interior: {message}")]
    #[diagnostic(
        code(atlasgen::strip),
        help("Each scaled length must be greater than twice the border width")
    )]
    NoInterior {
        border: u32,
        message: String,
    },

    #[error("Unknown style preset: {name}")]
    #[diagnostic(code(atlasgen::preset))]
    UnknownPreset {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Composite error: {message}")]
    #[diagnostic(code(atlasgen::composite))]
    Composite { message: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(atlasgen::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl AtlasError {
    /// Whether this error aborts a whole atlas run rather than a single cell.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AtlasError::OutOfBounds { .. }
                | AtlasError::CellOverflow { .. }
                | AtlasError::UnknownPreset { .. }
                | AtlasError::Composite { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_scoped_errors_are_not_fatal() {
        let err = AtlasError::UnknownPreset {
            name: "gold".to_string(),
            help: None,
        };
        assert!(!err.is_fatal());

        let err = AtlasError::MissingSource {
            name: "items.tga".to_string(),
        };
        assert!(err.is_fatal());

        assert!(!AtlasError::CellOverflow { row: 1 << 40, col: 1 }.is_fatal());
        let err = AtlasError::NoInterior {
            border: 1,
            message: "target length 2 is too short".to_string(),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_source_names_file() {
        let err = AtlasError::MissingSource {
            name: "thorne_item01.tga".to_string(),
        };
        assert!(err.to_string().contains("thorne_item01.tga"));
    }
}
