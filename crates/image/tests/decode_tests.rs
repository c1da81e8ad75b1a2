use crates_image::ImageEncoder;
use image::{ImageError, decode_image, is_supported_extension, load_image};

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    let img = crates_image::RgbImage::from_fn(width, height, |x, y| {
        let val = ((x + y) * 16 % 256) as u8;
        crates_image::Rgb([val, val, val])
    });
    crates_image::codecs::jpeg::JpegEncoder::new(&mut buffer)
        .encode_image(&img)
        .unwrap();
    buffer
}

fn png_rgba_bytes() -> Vec<u8> {
    let mut buffer = Vec::new();
    let img = crates_image::RgbaImage::from_fn(2, 2, |x, _| crates_image::Rgba([x as u8 * 100, 0, 0, 128]));
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 2, 2, crates_image::ExtendedColorType::Rgba8)
        .unwrap();
    buffer
}

#[test]
fn test_decode_jpeg_rgb() {
    let image = decode_image(&jpeg_bytes(16, 8)).unwrap();
    assert_eq!((image.width(), image.height(), image.channels()), (16, 8, 3));
    assert_eq!(image.tensor().shape, vec![8, 16, 3]);
}

#[test]
fn test_decode_png_rgba_drops_alpha() {
    let image = decode_image(&png_rgba_bytes()).unwrap();
    assert_eq!(image.channels(), 3);
    assert_eq!(image.pixel(1, 0), &[100, 0, 0]);
}

#[test]
fn test_decode_gray_stays_single_channel() {
    let mut buffer = Vec::new();
    let img = crates_image::GrayImage::from_fn(4, 4, |x, _| crates_image::Luma([x as u8]));
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 4, 4, crates_image::ExtendedColorType::L8)
        .unwrap();
    let image = decode_image(&buffer).unwrap();
    assert_eq!(image.channels(), 1);
    assert_eq!(image.pixel(3, 2), &[3]);
}

#[test]
fn test_decode_garbage_is_decode_error() {
    let result = decode_image(b"definitely not an image");
    assert!(matches!(result, Err(ImageError::Decode(_))));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = load_image("/nonexistent/frame_0001.jpg");
    assert!(matches!(result, Err(ImageError::Io(_))));
}

#[test]
fn test_supported_extensions() {
    assert!(is_supported_extension("frames/0001.JPG"));
    assert!(is_supported_extension("clip.gif"));
    assert!(!is_supported_extension("notes.txt"));
    assert!(!is_supported_extension("no_extension"));
}

#[test]
fn test_gif_frames_in_order() {
    use crates_image::codecs::gif::GifEncoder;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.gif");
    {
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = GifEncoder::new(file);
        for shade in [0u8, 120, 240] {
            let buffer = crates_image::RgbaImage::from_pixel(4, 2, crates_image::Rgba([shade, shade, shade, 255]));
            encoder.encode_frame(crates_image::Frame::new(buffer)).unwrap();
        }
    }

    let frames: Vec<_> = image::gif_frames(&path).unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f.width() == 4 && f.height() == 2 && f.channels() == 3));
    // palette quantisation keeps pure grays
    assert!(frames[0].pixel(0, 0)[0] < frames[2].pixel(0, 0)[0]);
}
