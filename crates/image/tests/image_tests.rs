use image::{Filter, Image, ImageError, blend, resize, to_rgb};

#[test]
fn test_image_new_rgb() {
    let image = Image::new(2, 3, 3, (0..18).collect()).unwrap();
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 3);
    assert_eq!(image.channels(), 3);
    assert_eq!(image.tensor().shape, vec![3, 2, 3]);
    assert_eq!(image.pixel(1, 0), &[3, 4, 5]);
}

#[test]
fn test_image_new_wrong_length() {
    let result = Image::new(2, 2, 3, vec![0; 11]);
    assert!(matches!(result, Err(ImageError::Tensor(_))));
}

#[test]
fn test_image_rejects_two_channels() {
    let result = Image::new(1, 1, 2, vec![0; 2]);
    assert!(matches!(result, Err(ImageError::Shape(_))));
}

#[test]
fn test_filled() {
    let image = Image::filled(3, 2, [10, 20, 30]);
    assert_eq!(image.data().len(), 18);
    assert_eq!(image.pixel(2, 1), &[10, 20, 30]);
}

#[test]
fn test_resize_changes_dims_and_keeps_channels() {
    let image = Image::filled(8, 4, [200, 100, 50]);
    let resized = resize(&image, 4, 2, Filter::Triangle).unwrap();
    assert_eq!((resized.width(), resized.height(), resized.channels()), (4, 2, 3));
    // a flat colour survives any filter
    assert_eq!(resized.pixel(3, 1), &[200, 100, 50]);
}

#[test]
fn test_resize_nearest_gray() {
    let image = Image::new(2, 1, 1, vec![0, 255]).unwrap();
    let resized = resize(&image, 4, 1, Filter::Nearest).unwrap();
    assert_eq!(resized.data(), &[0, 0, 255, 255]);
}

#[test]
fn test_resize_zero_target_fails() {
    let image = Image::filled(2, 2, [0, 0, 0]);
    assert!(matches!(resize(&image, 0, 2, Filter::Nearest), Err(ImageError::Shape(_))));
}

#[test]
fn test_to_rgb_from_gray_and_rgba() {
    let gray = Image::new(1, 1, 1, vec![7]).unwrap();
    assert_eq!(to_rgb(&gray).data(), &[7, 7, 7]);

    let rgba = Image::new(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(to_rgb(&rgba).data(), &[1, 2, 3]);
}

#[test]
fn test_blend_half() {
    let black = Image::filled(1, 1, [0, 0, 0]);
    let white = Image::filled(1, 1, [255, 255, 255]);
    let mixed = blend(&black, &white, 0.5).unwrap();
    assert_eq!(mixed.data(), &[128, 128, 128]);
}

#[test]
fn test_blend_alpha_is_clamped() {
    let black = Image::filled(1, 1, [0, 0, 0]);
    let red = Image::filled(1, 1, [255, 0, 0]);
    assert_eq!(blend(&black, &red, 3.0).unwrap().data(), &[255, 0, 0]);
    assert_eq!(blend(&black, &red, -1.0).unwrap().data(), &[0, 0, 0]);
}

#[test]
fn test_blend_size_mismatch() {
    let a = Image::filled(2, 2, [0, 0, 0]);
    let b = Image::filled(1, 2, [0, 0, 0]);
    assert!(matches!(blend(&a, &b, 0.5), Err(ImageError::Shape(_))));
}
