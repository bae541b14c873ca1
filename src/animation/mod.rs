//! Animation groups and their two playback drivers.
//!
//! Every descriptor targeting the same texture joins one [`AnimationGroup`].
//! A group is played either live, redrawing a single working texture each
//! tick it changes, or baked, precomputing its whole cycle into distinct
//! frames at load time.
//!
//! # Frame identities
//!
//! ```text
//! Live:  <namespace>:<target path>-anim          (one identity, pixels change)
//! Baked: <namespace>:<target path>.anim<n>       (n = tick first shown)
//! ```

mod bakery;
mod group;
mod library;
mod live;
mod player;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use bakery::{BakeConfig, BakeStats, Bakery};
pub use group::{Animation, AnimationGroup, LoadError, load_texture};
pub use library::{AnimationLibrary, GroupPlayback, SharedLibrary};
pub use live::{LIVE_SUFFIX, LiveTexture};
pub use player::{BakedAnimation, BakedFrame, FrameIterator, FrameRef};
pub use source::{DESCRIPTOR_EXTENSION, DirectorySource, MemorySource, ResourceSource};
