use {crate::ImageError, base::Tensor};

/// An 8-bit image in HWC layout: `[height, width, channels]`.
///
/// Channels are 1 (gray), 3 (RGB) or 4 (RGBA).
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    tensor: Tensor<u8>,
}

impl Image {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        Self::from_tensor(Tensor::new(vec![height, width, channels], data)?)
    }

    pub fn from_tensor(tensor: Tensor<u8>) -> Result<Self, ImageError> {
        let [_, _, channels] = tensor.dims::<3>()?;
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ImageError::Shape(format!(
                "unsupported channel count: {channels}"
            )));
        }
        Ok(Self { tensor })
    }

    /// A single-colour RGB image.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let data = rgb.iter().copied().cycle().take(width * height * 3).collect();
        Self {
            tensor: Tensor {
                shape: vec![height, width, 3],
                data,
            },
        }
    }

    // caller guarantees data.len() == width * height * 3
    pub(crate) fn rgb_unchecked(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * 3);
        Self {
            tensor: Tensor {
                shape: vec![height, width, 3],
                data,
            },
        }
    }

    pub fn height(&self) -> usize {
        self.tensor.shape[0]
    }

    pub fn width(&self) -> usize {
        self.tensor.shape[1]
    }

    pub fn channels(&self) -> usize {
        self.tensor.shape[2]
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.tensor.data
    }

    pub fn tensor(&self) -> &Tensor<u8> {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor<u8> {
        self.tensor
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let c = self.channels();
        let start = (y * self.width() + x) * c;
        &self.tensor.data[start..start + c]
    }
}
