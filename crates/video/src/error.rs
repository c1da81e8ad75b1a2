use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    Io(String),
    /// The frame at `index` could not be decoded. The index is consumed.
    Decode { index: u64, message: String },
    /// The path holds no frames.
    Empty(String),
    Channel(String),
}

impl VideoError {
    /// Index of the frame the error belongs to, if any.
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            VideoError::Decode { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Io(msg) => write!(f, "io error: {msg}"),
            VideoError::Decode { index, message } => {
                write!(f, "decode error at frame {index}: {message}")
            }
            VideoError::Empty(msg) => write!(f, "no frames: {msg}"),
            VideoError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Io(err.to_string())
    }
}
