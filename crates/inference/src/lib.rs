//! Boundary to the inference runtime.
//!
//! An `Engine` is a model compiled once for one device. Each pipeline slot
//! owns an `InferRequest` created from it, and submits one `Blob` at a time.

pub mod cache;
pub mod device;
pub mod engine;
pub mod error;
pub mod fnengine;
pub mod tensorinfo;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use {
    cache::CacheKey,
    device::{Device, select_device},
    engine::{Engine, InferRequest},
    error::InferError,
    fnengine::FnEngine,
    tensorinfo::{Blob, Layout, Precision, TensorInfo},
};

#[cfg(feature = "onnx")]
pub use onnx::{OnnxEngine, OnnxOptions};
