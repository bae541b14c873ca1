//! Schema module - Descriptor records and playback configuration.

mod config;
mod descriptor;
mod spec;

pub use config::*;
pub use descriptor::*;
pub use spec::*;
