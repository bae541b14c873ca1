//! Texanim - Tile-strip texture animation compiler and player.
//!
//! This crate animates static textures by cycling rectangular regions
//! through tiles of a vertical strip image, optionally cross-blending
//! consecutive tiles, as described by properties-style descriptor files.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Descriptor records, descriptor decoding and playback configuration
//! - `compute`: Timelines, phase cursors and pixel compositing
//! - `animation`: Groups per target texture, the live and bake drivers, and the library
//!
//! # Example
//!
//! ```rust,no_run
//! use texanim::{
//!     animation::{AnimationLibrary, DirectorySource},
//!     schema::{PlayerConfig, ResourceId},
//! };
//!
//! let source = DirectorySource::new("resourcepacks/water");
//! let mut library = AnimationLibrary::load(&source, &PlayerConfig::default()).unwrap();
//!
//! let target = ResourceId::parse("minecraft:textures/block/water_still.png").unwrap();
//! for tick in 0..100 {
//!     library.tick();
//!     for (id, image) in library.take_uploads() {
//!         println!("upload {} ({}x{})", id, image.width, image.height);
//!     }
//!     println!("tick {}: {:?}", tick, library.lookup(&target, tick));
//! }
//! ```

pub mod animation;
pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use animation::{AnimationLibrary, FrameRef, SharedLibrary};
pub use compute::{Phase, PhaseCursor, TextureBuffer, Timeline};
pub use schema::{AnimationSpec, PlaybackMode, PlayerConfig, ResourceId};
