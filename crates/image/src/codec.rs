use {
    crate::{Image, ImageError},
    crates_image::{AnimationDecoder, DynamicImage, ImageEncoder, ImageFormat},
    std::{fs::File, io::BufReader, path::Path},
};

fn from_dynamic(img: DynamicImage) -> Result<Image, ImageError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    match img {
        DynamicImage::ImageLuma8(buf) => Image::new(width, height, 1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => Image::new(width, height, 3, buf.into_raw()),
        // everything else is flattened to 8-bit RGB, alpha is dropped
        other => Image::new(width, height, 3, other.to_rgb8().into_raw()),
    }
}

pub(crate) fn to_dynamic(image: &Image) -> Result<DynamicImage, ImageError> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    let data = image.data().to_vec();
    let invalid = || ImageError::Shape(format!("buffer does not match {width}x{height}"));
    Ok(match image.channels() {
        1 => DynamicImage::ImageLuma8(
            crates_image::GrayImage::from_raw(width, height, data).ok_or_else(invalid)?,
        ),
        3 => DynamicImage::ImageRgb8(
            crates_image::RgbImage::from_raw(width, height, data).ok_or_else(invalid)?,
        ),
        _ => DynamicImage::ImageRgba8(
            crates_image::RgbaImage::from_raw(width, height, data).ok_or_else(invalid)?,
        ),
    })
}

/// Decodes an encoded image (format sniffed from the bytes).
///
/// Gray images stay single-channel, all other layouts become RGB.
pub fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    from_dynamic(crates_image::load_from_memory(data)?)
}

pub fn load_image(path: impl AsRef<Path>) -> Result<Image, ImageError> {
    let data = std::fs::read(path)?;
    decode_image(&data)
}

/// Frames of an animated GIF, decoded lazily as RGB images.
///
/// The iterator borrows nothing but is not `Send`; create it on the thread
/// that consumes it.
pub fn gif_frames(
    path: impl AsRef<Path>,
) -> Result<Box<dyn Iterator<Item = Result<Image, ImageError>>>, ImageError> {
    let reader = BufReader::new(File::open(path)?);
    let decoder = crates_image::codecs::gif::GifDecoder::new(reader)?;
    Ok(Box::new(decoder.into_frames().map(|frame| {
        let buffer = frame?.into_buffer();
        from_dynamic(DynamicImage::ImageRgba8(buffer))
    })))
}

pub fn encode_png(image: &Image) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    to_dynamic(image)?
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encodes as JPEG (quality 1-100). Alpha is stripped.
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    let (data, color) = match image.channels() {
        1 => (image.data().to_vec(), crates_image::ExtendedColorType::L8),
        3 => (image.data().to_vec(), crates_image::ExtendedColorType::Rgb8),
        _ => (
            image
                .data()
                .chunks_exact(4)
                .flat_map(|c| [c[0], c[1], c[2]])
                .collect(),
            crates_image::ExtendedColorType::Rgb8,
        ),
    };
    let mut buffer = Vec::new();
    crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&data, width, height, color)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Writes `image` to `path`; the extension picks PNG or JPEG.
pub fn save_image(image: &Image, path: impl AsRef<Path>) -> Result<(), ImageError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let bytes = match extension.as_deref() {
        Some("jpg") | Some("jpeg") => encode_jpeg(image, 90)?,
        Some("png") => encode_png(image)?,
        other => {
            return Err(ImageError::Encode(format!(
                "unsupported output extension: {other:?}"
            )));
        }
    };
    std::fs::write(path, bytes)?;
    Ok(())
}

/// True for file names the decoder understands.
pub fn is_supported_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_ascii_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff" | "webp" | "gif"
            )
        })
        .unwrap_or(false)
}
