//! Core domain types for atlasgen.
//!
//! This module contains the value types shared by the render stages and the
//! atlas assembler:
//! - `Colour` - RGBA colour values
//! - `GridSpec` / `CellAddress` / `Rect` - grid addressing
//! - `StripSpec` / `Interpolation` - border-preserving scaling parameters
//! - `ColorRamp` / `Tint` - luminance tinting
//! - `CellStyle` / `StyleOverrides` - layered per-cell styling

mod colour;
mod grid;
mod ramp;
mod strip;
mod style;

pub use colour::Colour;
pub use grid::{CellAddress, GridSpec, Rect};
pub use ramp::{ColorRamp, RampDirection, RampStop, Tint};
pub use strip::{Axis, Interpolation, StripSpec};
pub use style::{
    CellStyle, FitMode, Sourced, StyleOverrides, StyleSource, Tone, ToneMode,
};
