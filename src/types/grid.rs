//! Grid addressing for packed texture sheets.
//!
//! Atlases pack square cells in rows and columns, optionally separated by
//! a fixed gutter and offset from the sheet origin. Configs address cells
//! 1-based; everything below works 0-based.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// A pixel rectangle inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.w as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.h as u64
    }

    /// Whether the rectangle fits inside a `width` x `height` sheet.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Whether two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.w, self.h)
    }
}

/// Layout of a grid-packed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Edge length of each square cell.
    pub cell_size: u32,
    /// Horizontal gutter between cells.
    #[serde(default)]
    pub sep_x: u32,
    /// Vertical gutter between cells.
    #[serde(default)]
    pub sep_y: u32,
    #[serde(default)]
    pub origin_x: u32,
    #[serde(default)]
    pub origin_y: u32,
}

impl GridSpec {
    /// A gutter-free grid starting at the sheet origin.
    pub const fn uniform(cell_size: u32) -> Self {
        Self {
            cell_size,
            sep_x: 0,
            sep_y: 0,
            origin_x: 0,
            origin_y: 0,
        }
    }

    pub fn with_separators(mut self, sep_x: u32, sep_y: u32) -> Self {
        self.sep_x = sep_x;
        self.sep_y = sep_y;
        self
    }

    pub fn with_origin(mut self, origin_x: u32, origin_y: u32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    /// Check the grid invariants.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(AtlasError::Config {
                message: "grid cell_size must be greater than zero".to_string(),
                help: None,
            });
        }
        Ok(())
    }

    /// Pixel rectangle of the 0-based cell at (`row`, `col`).
    ///
    /// No bounds checking against a sheet happens here; extracting the
    /// rectangle is where out-of-range cells fail. Only addresses whose pixel
    /// position cannot be represented at all are rejected.
    pub fn cell_rect(&self, row: u32, col: u32) -> Result<Rect> {
        let x = self.offset_of(col, self.origin_x, self.sep_x);
        let y = self.offset_of(row, self.origin_y, self.sep_y);
        match (x, y) {
            (Some(x), Some(y)) => Ok(Rect::new(x, y, self.cell_size, self.cell_size)),
            _ => Err(AtlasError::CellOverflow {
                row: row as u64 + 1,
                col: col as u64 + 1,
            }),
        }
    }

    fn offset_of(&self, index: u32, origin: u32, sep: u32) -> Option<u32> {
        let pitch = self.cell_size as u64 + sep as u64;
        let offset = (index as u64).checked_mul(pitch)?.checked_add(origin as u64)?;
        u32::try_from(offset).ok()
    }

    /// Pixel rectangle of a 1-based cell address.
    pub fn rect_of(&self, address: CellAddress) -> Result<Rect> {
        let (row, col) = address.to_zero_based()?;
        self.cell_rect(row, col)
    }
}

/// A 1-based (row, column) cell address as written in configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert to 0-based (row, col).
    pub fn to_zero_based(self) -> Result<(u32, u32)> {
        if self.row == 0 || self.col == 0 {
            return Err(AtlasError::Config {
                message: format!("cell address {} is not 1-based", self),
                help: Some("Rows and columns start at 1".to_string()),
            });
        }
        Ok((self.row - 1, self.col - 1))
    }
}

impl Default for CellAddress {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rect_uniform() {
        let grid = GridSpec::uniform(40);
        assert_eq!(grid.cell_rect(0, 0).unwrap(), Rect::new(0, 0, 40, 40));
        assert_eq!(grid.cell_rect(1, 2).unwrap(), Rect::new(80, 40, 40, 40));
    }

    #[test]
    fn test_cell_rect_with_separators_and_origin() {
        let grid = GridSpec::uniform(40).with_separators(2, 3).with_origin(5, 7);
        assert_eq!(grid.cell_rect(0, 0).unwrap(), Rect::new(5, 7, 40, 40));
        assert_eq!(grid.cell_rect(2, 1).unwrap(), Rect::new(5 + 42, 7 + 2 * 43, 40, 40));
    }

    #[test]
    fn test_cell_rects_never_overlap() {
        let grids = [
            GridSpec::uniform(1),
            GridSpec::uniform(7).with_separators(2, 0),
            GridSpec::uniform(40).with_separators(0, 5).with_origin(3, 1),
        ];
        for grid in grids {
            let mut rects = Vec::new();
            for row in 0..5 {
                for col in 0..5 {
                    rects.push(grid.cell_rect(row, col).unwrap());
                }
            }
            for i in 0..rects.len() {
                for j in (i + 1)..rects.len() {
                    assert!(
                        !rects[i].intersects(&rects[j]),
                        "{:?} and {:?} overlap",
                        rects[i],
                        rects[j]
                    );
                }
            }
        }
    }

    #[test]
    fn test_rect_of_one_based() {
        let grid = GridSpec::uniform(10);
        assert_eq!(
            grid.rect_of(CellAddress::new(1, 1)).unwrap(),
            Rect::new(0, 0, 10, 10)
        );
        assert_eq!(
            grid.rect_of(CellAddress::new(2, 3)).unwrap(),
            Rect::new(20, 10, 10, 10)
        );
        assert!(grid.rect_of(CellAddress::new(0, 1)).is_err());
    }

    #[test]
    fn test_validate_zero_cell() {
        assert!(GridSpec::uniform(0).validate().is_err());
        assert!(GridSpec::uniform(1).validate().is_ok());
    }

    #[test]
    fn test_fits_within() {
        assert!(Rect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!Rect::new(1, 0, 10, 10).fits_within(10, 10));
    }

    #[test]
    fn test_cell_rect_near_the_limit() {
        let grid = GridSpec::uniform(8);
        let last = u32::MAX / 8;
        assert_eq!(
            grid.cell_rect(last, 0).unwrap(),
            Rect::new(0, last * 8, 8, 8)
        );
        // 2^29 * 8 is exactly 2^32 and must not wrap to row 0.
        assert!(matches!(
            grid.cell_rect(1 << 29, 0),
            Err(AtlasError::CellOverflow { row, col: 1 }) if row == (1 << 29) + 1
        ));
        assert!(grid.cell_rect(599_999_999, 0).is_err());
        assert!(grid.cell_rect(0, u32::MAX).is_err());
    }

    #[test]
    fn test_rect_of_huge_address_fails() {
        let grid = GridSpec::uniform(u32::MAX).with_separators(u32::MAX, 0).with_origin(7, 0);
        assert!(grid.rect_of(CellAddress::new(1, 1)).is_ok());
        assert!(grid.rect_of(CellAddress::new(1, 2)).is_err());
        assert!(grid.rect_of(CellAddress::new(u32::MAX, u32::MAX)).is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let grid: GridSpec = serde_yaml::from_str("cell_size: 40\nsep_x: 2").unwrap();
        assert_eq!(grid, GridSpec::uniform(40).with_separators(2, 0));
    }
}
