//! Rendering module for atlasgen.
//!
//! The pixel stages of the pipeline, leaves first: border-preserving
//! scaling, tone preparation, luminance tinting, fitting and compositing.
//! Every stage takes regions by reference and returns new ones.

mod composite;
mod gauge;
mod io;
mod region;
mod scale;
mod tint;
mod tone;

pub use composite::{composite_over, fit_region, Fitted};
pub use gauge::{scale_gauge, sized_file_name, GaugeLayer, GaugeLayout};
pub use io::{load_sheet, write_sheet};
pub use region::{Region, Sheet};
pub use scale::{resample, scale_axis, scale_strip};
pub use tint::{apply_tint, tint_region};
pub use tone::apply_tone;
