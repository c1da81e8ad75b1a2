//! Ordered, bounded-concurrency live inference.
//!
//! Frames come from a `video::FrameSource`, are preprocessed into the
//! engine's declared input, run on up to N concurrent requests, and are
//! handed to a `Renderer` strictly in frame order.

pub mod config;
pub mod error;
pub mod postprocess;
pub mod preprocess;
pub mod render;
pub mod reorder;
pub mod scheduler;
pub mod throughput;

pub use {
    config::{ErrorPolicy, PipelineConfig},
    error::{FailureKind, PipelineError, PreprocessError, RenderError},
    postprocess::{PostprocessMode, Postprocessor, voc_palette},
    preprocess::{ChannelOrder, Normalize, Preprocessor},
    render::{CollectRenderer, FolderRenderer, OutputFormat, Renderer},
    reorder::{ReorderBuffer, ReorderError},
    scheduler::{RunSummary, Scheduler},
    throughput::{ThroughputMeter, ThroughputReport},
};
