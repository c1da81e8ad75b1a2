use {
    crate::VideoError,
    image::Image,
    std::{future::Future, sync::Arc},
};

/// One input image with its fixed position in the sequence.
///
/// Pixels are shared, never mutated: the preprocessor reads them and the
/// renderer may blend output over them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub image: Arc<Image>,
}

impl Frame {
    pub fn new(index: u64, image: Image) -> Self {
        Self {
            index,
            image: Arc::new(image),
        }
    }
}

/// A lazy, finite, forward-only sequence of frames.
///
/// `Ok(None)` means the sequence is exhausted; that is normal termination,
/// not an error. A `VideoError::Decode` consumes its index, so the next call
/// continues with the following frame. Sources are not restartable: open a
/// fresh one to replay.
pub trait FrameSource {
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Frame>, VideoError>> + Send;

    /// Total number of frames, when known up front.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}
