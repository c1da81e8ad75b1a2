use {
    crate::PreprocessError,
    base::Tensor,
    image::{Filter, Image, resize, to_rgb},
    inference::{Blob, Layout, Precision, TensorInfo},
    serde::Deserialize,
    video::Frame,
};

/// Per-channel normalization applied to `F32` inputs:
/// `(value * scale - mean[c]) / std[c]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Normalize {
    pub scale: f32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalize {
    /// Maps [0, 255] to [0, 1].
    pub fn unit() -> Self {
        Self {
            scale: 1.0 / 255.0,
            mean: [0.0; 3],
            std: [1.0; 3],
        }
    }

    /// ImageNet statistics on [0, 1] values.
    pub fn imagenet() -> Self {
        Self {
            scale: 1.0 / 255.0,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }

    fn apply(&self, value: u8, channel: usize) -> f32 {
        (value as f32 * self.scale - self.mean[channel]) / self.std[channel]
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::unit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Turns frames into the blob an engine declares as its input.
///
/// Stateless: the same frame always gives a bit-identical blob, and the
/// frame is only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    target: TensorInfo,
    height: usize,
    width: usize,
    channels: usize,
    normalize: Option<Normalize>,
    order: ChannelOrder,
}

impl Preprocessor {
    /// Fails with `ShapeMismatch` unless `target` is a batch-1, rank-4 image
    /// shape with 1 or 3 channels.
    pub fn new(target: TensorInfo) -> Result<Self, PreprocessError> {
        let Some((height, width, channels)) = target.image_dims() else {
            return Err(PreprocessError::ShapeMismatch(format!(
                "input {} is not a rank-4 image shape",
                target
            )));
        };
        if target.shape[0] != 1 || height == 0 || width == 0 {
            return Err(PreprocessError::ShapeMismatch(format!(
                "input {} needs batch 1 and non-zero height and width",
                target
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(PreprocessError::ShapeMismatch(format!(
                "input {} has {} channels, only 1 or 3 are supported",
                target, channels
            )));
        }
        Ok(Self {
            target,
            height,
            width,
            channels,
            normalize: None,
            order: ChannelOrder::Rgb,
        })
    }

    /// Ignored for `U8` inputs, which always get the raw pixel values.
    pub fn with_normalize(mut self, normalize: Normalize) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn target(&self) -> &TensorInfo {
        &self.target
    }

    // frame pixels in the model's channel count, at the model's size
    fn fit(&self, frame: &Frame) -> Result<Image, PreprocessError> {
        let image = &*frame.image;
        if image.width() == 0 || image.height() == 0 {
            return Err(PreprocessError::ShapeMismatch(format!(
                "frame {} is {}x{}",
                frame.index,
                image.width(),
                image.height()
            )));
        }
        let converted;
        let image = match (self.channels, image.channels()) {
            (3, 3) | (1, 1) => image,
            (3, _) => {
                converted = to_rgb(image);
                &converted
            }
            (_, channels) => {
                return Err(PreprocessError::ShapeMismatch(format!(
                    "frame {} has {} channels, model expects {}",
                    frame.index, channels, self.channels
                )));
            }
        };
        Ok(resize(image, self.width, self.height, Filter::Triangle)?)
    }

    pub fn prepare(&self, frame: &Frame) -> Result<Blob, PreprocessError> {
        let image = self.fit(frame)?;
        let (h, w, c) = (self.height, self.width, self.channels);
        let pixels = image.data();
        let swap = self.order == ChannelOrder::Bgr && c == 3;

        // source offset of the value written at (y, x, channel)
        let source = move |y: usize, x: usize, ch: usize| {
            let ch = if swap { 2 - ch } else { ch };
            (y * w + x) * c + ch
        };
        let mut offsets = Vec::with_capacity(h * w * c);
        match self.target.layout {
            Layout::Nchw => {
                for ch in 0..c {
                    for y in 0..h {
                        for x in 0..w {
                            offsets.push(source(y, x, ch));
                        }
                    }
                }
            }
            Layout::Nhwc => {
                for y in 0..h {
                    for x in 0..w {
                        for ch in 0..c {
                            offsets.push(source(y, x, ch));
                        }
                    }
                }
            }
        }
        let layout = self.target.layout;
        let channel_at = move |position: usize| match layout {
            Layout::Nchw => position / (h * w),
            Layout::Nhwc => position % c,
        };

        let shape = self.target.shape.clone();
        let blob = match self.target.precision {
            Precision::U8 => Blob::U8(Tensor {
                shape,
                data: offsets.iter().map(|&i| pixels[i]).collect(),
            }),
            Precision::F32 => Blob::F32(Tensor {
                shape,
                data: match &self.normalize {
                    Some(n) => offsets
                        .iter()
                        .enumerate()
                        .map(|(position, &i)| n.apply(pixels[i], channel_at(position)))
                        .collect(),
                    None => offsets.iter().map(|&i| pixels[i] as f32).collect(),
                },
            }),
        };
        Ok(blob)
    }
}
