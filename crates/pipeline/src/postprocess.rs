use {
    crate::RenderError,
    base::Tensor,
    image::{Filter, Image, blend, resize},
    inference::Layout,
    serde::Deserialize,
    video::Frame,
};

/// How a raw output tensor becomes a picture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PostprocessMode {
    /// The output is an image (super-resolution, style transfer). Values are
    /// multiplied by `scale` and clipped to [0, 255]; use 255 for [0, 1]
    /// outputs.
    Image { scale: f32 },
    /// Single-channel probabilities in [0, 1], resized to the frame. With
    /// `alpha`, blended over the frame; otherwise rendered as gray.
    Heatmap { alpha: Option<f32> },
    /// Per-pixel class scores. The argmax class is coloured from the palette
    /// and blended over the frame.
    Segmentation { alpha: f32 },
}

impl Default for PostprocessMode {
    fn default() -> Self {
        PostprocessMode::Image { scale: 1.0 }
    }
}

/// Pascal VOC colour map: class 0 black, then well-separated colours.
pub fn voc_palette(classes: usize) -> Vec<[u8; 3]> {
    (0..classes)
        .map(|class| {
            let mut rgb = [0u8; 3];
            let mut label = class;
            for bit in (0..8).rev() {
                for (channel, value) in rgb.iter_mut().enumerate() {
                    *value |= (((label >> channel) & 1) as u8) << bit;
                }
                label >>= 3;
            }
            rgb
        })
        .collect()
}

// output tensor as planes: channels x height x width
struct Planes {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Planes {
    fn from_tensor(output: &Tensor<f32>, layout: Layout) -> Result<Self, RenderError> {
        let (channels, height, width) = match (output.shape.as_slice(), layout) {
            (&[1, c, h, w], Layout::Nchw) | (&[c, h, w], Layout::Nchw) => (c, h, w),
            (&[1, h, w, c], Layout::Nhwc) | (&[h, w, c], Layout::Nhwc) => (c, h, w),
            (&[h, w], _) => (1, h, w),
            (shape, _) => {
                return Err(RenderError::Shape(format!(
                    "cannot read output {shape:?} as a {layout:?} image"
                )));
            }
        };
        if channels * height * width != output.data.len() || height == 0 || width == 0 {
            return Err(RenderError::Shape(format!(
                "output {:?} holds {} values",
                output.shape,
                output.data.len()
            )));
        }
        let data = match layout {
            Layout::Nhwc if channels > 1 => {
                let mut planar = vec![0.0; output.data.len()];
                for (i, &v) in output.data.iter().enumerate() {
                    planar[(i % channels) * height * width + i / channels] = v;
                }
                planar
            }
            _ => output.data.clone(),
        };
        Ok(Self {
            channels,
            height,
            width,
            data,
        })
    }

    fn plane(&self, channel: usize) -> &[f32] {
        let size = self.height * self.width;
        &self.data[channel * size..(channel + 1) * size]
    }
}

fn to_u8(value: f32) -> u8 {
    // NaN lands on 0
    value.round().clamp(0.0, 255.0) as u8
}

/// Converts engine output into the image a renderer shows or stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Postprocessor {
    mode: PostprocessMode,
    layout: Layout,
    palette: Vec<[u8; 3]>,
}

impl Postprocessor {
    pub fn new(mode: PostprocessMode, layout: Layout) -> Self {
        Self {
            mode,
            layout,
            palette: voc_palette(256),
        }
    }

    /// Colours for segmentation classes; class `k` uses `palette[k % len]`.
    pub fn with_palette(mut self, palette: Vec<[u8; 3]>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    pub fn mode(&self) -> &PostprocessMode {
        &self.mode
    }

    pub fn apply(&self, frame: &Frame, output: &Tensor<f32>) -> Result<Image, RenderError> {
        let planes = Planes::from_tensor(output, self.layout)?;
        match &self.mode {
            PostprocessMode::Image { scale } => self.image(&planes, *scale),
            PostprocessMode::Heatmap { alpha } => self.heatmap(frame, &planes, *alpha),
            PostprocessMode::Segmentation { alpha } => self.segmentation(frame, &planes, *alpha),
        }
    }

    fn image(&self, planes: &Planes, scale: f32) -> Result<Image, RenderError> {
        let data = match planes.channels {
            1 => planes.data.iter().map(|&v| to_u8(v * scale)).collect(),
            3 => {
                let (r, g, b) = (planes.plane(0), planes.plane(1), planes.plane(2));
                (0..planes.height * planes.width)
                    .flat_map(|i| [r[i], g[i], b[i]])
                    .map(|v| to_u8(v * scale))
                    .collect()
            }
            channels => {
                return Err(RenderError::Shape(format!(
                    "image output needs 1 or 3 channels, got {channels}"
                )));
            }
        };
        Ok(Image::new(planes.width, planes.height, planes.channels, data)?)
    }

    fn heatmap(&self, frame: &Frame, planes: &Planes, alpha: Option<f32>) -> Result<Image, RenderError> {
        if planes.channels != 1 {
            return Err(RenderError::Shape(format!(
                "heatmap output needs 1 channel, got {}",
                planes.channels
            )));
        }
        let data = planes.data.iter().map(|&p| to_u8(p * 255.0)).collect();
        let heat = Image::new(planes.width, planes.height, 1, data)?;
        let heat = resize(&heat, frame.image.width(), frame.image.height(), Filter::Triangle)?;
        match alpha {
            Some(alpha) => Ok(blend(&frame.image, &heat, alpha)?),
            None => Ok(heat),
        }
    }

    fn segmentation(&self, frame: &Frame, planes: &Planes, alpha: f32) -> Result<Image, RenderError> {
        let size = planes.height * planes.width;
        let classes: Vec<usize> = if planes.channels == 1 {
            // single logit map: foreground above 0.5
            planes.data.iter().map(|&p| usize::from(p > 0.5)).collect()
        } else {
            (0..size)
                .map(|i| {
                    (0..planes.channels)
                        .map(|c| planes.data[c * size + i])
                        .enumerate()
                        .fold((0, f32::NEG_INFINITY), |best, (c, v)| if v > best.1 { (c, v) } else { best })
                        .0
                })
                .collect()
        };
        let data = classes
            .iter()
            .flat_map(|&class| self.palette[class % self.palette.len()])
            .collect();
        let mask = Image::new(planes.width, planes.height, 3, data)?;
        let mask = resize(&mask, frame.image.width(), frame.image.height(), Filter::Nearest)?;
        Ok(blend(&frame.image, &mask, alpha)?)
    }
}
