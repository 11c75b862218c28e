//! Finding atlas configs and loading their source sheets.
//!
//! # Example
//!
//! ```ignore
//! use atlasgen::discovery::{find_configs, DirLoader};
//!
//! for path in find_configs(Path::new("./ui")) {
//!     let config = AtlasConfig::load(&path)?;
//!     let loader = DirLoader::for_config(&config);
//!     // ...
//! }
//! ```

mod loader;
mod scanner;

pub use loader::{DirLoader, LoadedSheet, MemoryLoader, SheetLoader};
pub use scanner::{find_configs, is_atlas_config};
