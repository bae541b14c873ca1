//! Compute module - Timelines, playheads and pixel compositing.

mod buffer;
mod compositor;
mod cursor;
mod timeline;

pub use buffer::*;
pub use compositor::*;
pub use cursor::*;
pub use timeline::*;
