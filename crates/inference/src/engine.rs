use {
    crate::{Blob, Device, InferError, TensorInfo},
    base::Tensor,
};

/// A model compiled once for one device.
///
/// Shared across every request of a run; the engine itself is never used to
/// infer directly.
pub trait Engine: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn device(&self) -> &Device;

    /// Input the model expects, known before anything is submitted.
    fn input(&self) -> &TensorInfo;

    /// Output declaration, if the engine knows it up front.
    fn output(&self) -> Option<&TensorInfo> {
        None
    }

    /// New execution context. A pipeline creates one per slot.
    fn create_request(&self) -> Result<Box<dyn InferRequest>, InferError>;
}

/// One slot's execution context: at most one submission at a time.
pub trait InferRequest: Send + 'static {
    /// Runs the model on `input`, blocking the calling thread.
    fn infer(&mut self, input: Blob) -> Result<Tensor<f32>, InferError>;
}
