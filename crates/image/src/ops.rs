use {
    crate::{Image, ImageError, codec::to_dynamic},
    crates_image::{DynamicImage, imageops::FilterType},
};

/// Resampling filter for `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Keeps exact values, used for class masks.
    Nearest,
    /// Bilinear, used for model inputs and heatmaps.
    Triangle,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
        }
    }
}

/// Resizes to exactly `width` x `height`, keeping the channel count.
pub fn resize(image: &Image, width: usize, height: usize, filter: Filter) -> Result<Image, ImageError> {
    if image.is_empty() || width == 0 || height == 0 {
        return Err(ImageError::Shape(format!(
            "cannot resize {}x{} to {width}x{height}",
            image.width(),
            image.height()
        )));
    }
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }
    let (w, h, filter) = (width as u32, height as u32, FilterType::from(filter));
    let channels = image.channels();
    let data = match to_dynamic(image)? {
        DynamicImage::ImageLuma8(buf) => crates_image::imageops::resize(&buf, w, h, filter).into_raw(),
        DynamicImage::ImageRgb8(buf) => crates_image::imageops::resize(&buf, w, h, filter).into_raw(),
        other => crates_image::imageops::resize(&other.to_rgba8(), w, h, filter).into_raw(),
    };
    Image::new(width, height, channels, data)
}

/// Expands gray to RGB and strips alpha; RGB passes through.
pub fn to_rgb(image: &Image) -> Image {
    let data = match image.channels() {
        3 => return image.clone(),
        1 => image.data().iter().flat_map(|&v| [v, v, v]).collect(),
        _ => image
            .data()
            .chunks_exact(4)
            .flat_map(|c| [c[0], c[1], c[2]])
            .collect(),
    };
    Image::rgb_unchecked(image.width(), image.height(), data)
}

/// `base * (1 - alpha) + overlay * alpha`, per channel, both RGB.
///
/// `alpha` is clamped to [0, 1]. The images must have the same size.
pub fn blend(base: &Image, overlay: &Image, alpha: f32) -> Result<Image, ImageError> {
    if base.width() != overlay.width() || base.height() != overlay.height() {
        return Err(ImageError::Shape(format!(
            "blend size mismatch: {}x{} vs {}x{}",
            base.width(),
            base.height(),
            overlay.width(),
            overlay.height()
        )));
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let (base, overlay) = (to_rgb(base), to_rgb(overlay));
    let data = base
        .data()
        .iter()
        .zip(overlay.data())
        .map(|(&b, &o)| (b as f32 * (1.0 - alpha) + o as f32 * alpha).round().clamp(0.0, 255.0) as u8)
        .collect();
    Image::new(base.width(), base.height(), 3, data)
}
