use {crate::Device, std::fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum InferError {
    Io(String),
    ModelLoad(String),
    Backend(String),
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    DeviceUnavailable(Device),
    Runtime(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Backend(msg) => write!(f, "backend error: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected:?}, got {got:?}")
            }
            InferError::DeviceUnavailable(device) => write!(f, "device unavailable: {device}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<base::TensorError> for InferError {
    fn from(err: base::TensorError) -> Self {
        match err {
            base::TensorError::ShapeMismatch { expected, got } => InferError::ShapeMismatch {
                expected: vec![expected],
                got: vec![got],
            },
            other => InferError::Runtime(other.to_string()),
        }
    }
}
