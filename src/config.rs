//! Configuration loader and schema types.
//!
//! This module exposes the settings that shape the library scan, initial
//! playback flags, the skin panel and logging, plus helpers to locate and
//! load them from disk.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
