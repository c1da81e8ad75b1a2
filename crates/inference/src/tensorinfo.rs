use {
    crate::InferError,
    base::Tensor,
    serde::Deserialize,
    std::fmt,
};

/// Element type a model expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    F32,
    U8,
}

/// Memory order of a rank-4 image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// batch, channels, height, width
    Nchw,
    /// batch, height, width, channels
    Nhwc,
}

/// Declared shape and type of a model input or output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TensorInfo {
    pub name: String,
    pub shape: Vec<usize>,
    pub precision: Precision,
    pub layout: Layout,
}

impl TensorInfo {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, precision: Precision, layout: Layout) -> Self {
        Self {
            name: name.into(),
            shape,
            precision,
            layout,
        }
    }

    /// Batch-1 image tensor of the given size.
    pub fn image(
        name: impl Into<String>,
        height: usize,
        width: usize,
        channels: usize,
        layout: Layout,
        precision: Precision,
    ) -> Self {
        let shape = match layout {
            Layout::Nchw => vec![1, channels, height, width],
            Layout::Nhwc => vec![1, height, width, channels],
        };
        Self::new(name, shape, precision, layout)
    }

    /// `(height, width, channels)` of a rank-4 shape, per the layout.
    pub fn image_dims(&self) -> Option<(usize, usize, usize)> {
        let [_, a, b, c] = <[usize; 4]>::try_from(self.shape.as_slice()).ok()?;
        Some(match self.layout {
            Layout::Nchw => (b, c, a),
            Layout::Nhwc => (a, b, c),
        })
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

impl fmt::Display for TensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?} {:?}",
            self.name, self.shape, self.precision, self.layout
        )
    }
}

/// Preprocessed input, ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Blob {
    F32(Tensor<f32>),
    U8(Tensor<u8>),
}

impl Blob {
    pub fn shape(&self) -> &[usize] {
        match self {
            Blob::F32(tensor) => &tensor.shape,
            Blob::U8(tensor) => &tensor.shape,
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            Blob::F32(_) => Precision::F32,
            Blob::U8(_) => Precision::U8,
        }
    }

    /// Fails with `ShapeMismatch` unless shape and precision match `info`.
    pub fn check(&self, info: &TensorInfo) -> Result<(), InferError> {
        if self.shape() != info.shape.as_slice() {
            return Err(InferError::ShapeMismatch {
                expected: info.shape.clone(),
                got: self.shape().to_vec(),
            });
        }
        if self.precision() != info.precision {
            return Err(InferError::Runtime(format!(
                "input {} expects {:?}, got {:?}",
                info.name,
                info.precision,
                self.precision()
            )));
        }
        Ok(())
    }

    /// The blob as `f32`, converting `U8` elements by value.
    pub fn into_f32(self) -> Tensor<f32> {
        match self {
            Blob::F32(tensor) => tensor,
            Blob::U8(tensor) => tensor.map(|&v| v as f32),
        }
    }
}
