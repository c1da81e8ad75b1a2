//! Shared building blocks for the live-inference workspace: the plain
//! `Tensor<T>` container passed between stages, and the `log` backends.

pub mod logging;
pub use logging::*;

mod tensor;
pub use tensor::*;

// Re-exported so downstream crates can name `base::log::Level` etc.
pub use log;
