//! Frame sources for the live-inference pipeline.
//!
//! A source yields a finite, forward-only sequence of `Frame`s with
//! zero-based, monotonic indices. `FrameIn` decodes from disk (a folder of
//! numbered images, an animated GIF, or a single still) on a blocking worker
//! thread; `VecSource` serves frames already in memory.

pub mod error;
pub mod frame;
pub mod framein;
pub mod memory;

pub use error::VideoError;
pub use frame::{Frame, FrameSource};
pub use framein::{FrameIn, SourceConfig};
pub use memory::VecSource;
