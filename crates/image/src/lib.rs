//! 8-bit image handling for the live-inference pipeline.
//!
//! Wraps the `image` crate: decoding files into HWC `Image`s, encoding
//! rendered output, and the few pixel operations the pipeline needs
//! (resize, channel expansion, alpha blending).

mod codec;
pub mod error;
mod image;
mod ops;

pub use codec::*;
pub use error::ImageError;
pub use image::Image;
pub use ops::*;
