use {
    crate::ReorderError,
    image::ImageError,
    inference::InferError,
    std::fmt,
    video::VideoError,
};

/// Classes of per-frame failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The frame's bytes could not be decoded.
    Decode,
    /// The preprocessor could not coerce the frame into the model input.
    ShapeMismatch,
    /// The engine rejected, failed or panicked on the request, including
    /// engine-side shape checks.
    Inference,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Decode => write!(f, "DecodeError"),
            FailureKind::ShapeMismatch => write!(f, "ShapeMismatch"),
            FailureKind::Inference => write!(f, "InferenceFailure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessError {
    ShapeMismatch(String),
    Image(ImageError),
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessError::ShapeMismatch(msg) => write!(f, "shape mismatch: {msg}"),
            PreprocessError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for PreprocessError {}

impl From<ImageError> for PreprocessError {
    fn from(err: ImageError) -> Self {
        PreprocessError::Image(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The output tensor cannot be read as an image.
    Shape(String),
    Image(ImageError),
    Io(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Shape(msg) => write!(f, "output shape error: {msg}"),
            RenderError::Image(err) => write!(f, "image error: {err}"),
            RenderError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ImageError> for RenderError {
    fn from(err: ImageError) -> Self {
        RenderError::Image(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Config(String),
    /// The engine could not provide execution contexts.
    Engine(InferError),
    /// The source failed as a whole, not at one frame.
    Source(VideoError),
    /// A frame failed and the policy is fail-fast.
    Frame {
        index: u64,
        kind: FailureKind,
        message: String,
    },
    Render { index: u64, error: RenderError },
    Ordering(ReorderError),
    Cancelled,
}

impl PipelineError {
    /// Index of the frame the run stopped at, if it stopped at one.
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            PipelineError::Frame { index, .. } | PipelineError::Render { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "configuration error: {msg}"),
            PipelineError::Engine(err) => write!(f, "engine error: {err}"),
            PipelineError::Source(err) => write!(f, "source error: {err}"),
            PipelineError::Frame {
                index,
                kind,
                message,
            } => write!(f, "{kind} at frame {index}: {message}"),
            PipelineError::Render { index, error } => {
                write!(f, "render failed at frame {index}: {error}")
            }
            PipelineError::Ordering(err) => write!(f, "ordering error: {err}"),
            PipelineError::Cancelled => write!(f, "run cancelled"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<InferError> for PipelineError {
    fn from(err: InferError) -> Self {
        PipelineError::Engine(err)
    }
}

impl From<ReorderError> for PipelineError {
    fn from(err: ReorderError) -> Self {
        PipelineError::Ordering(err)
    }
}
