use {
    base::Tensor,
    image::Image,
    inference::Layout,
    pipeline::{CollectRenderer, FolderRenderer, OutputFormat, PostprocessMode, Postprocessor, Renderer},
    video::Frame,
};

fn passthrough() -> Postprocessor {
    Postprocessor::new(PostprocessMode::Image { scale: 1.0 }, Layout::Nchw)
}

fn output(value: f32) -> Tensor<f32> {
    Tensor::new(vec![1, 3, 2, 2], vec![value; 12]).unwrap()
}

#[test]
fn test_folder_renderer_names_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let mut renderer = FolderRenderer::new(&out, passthrough(), OutputFormat::Png).unwrap();

    let frame = Frame::new(12, Image::filled(2, 2, [0, 0, 0]));
    renderer.render(&frame, output(200.0)).unwrap();

    let path = out.join("000012.png");
    assert_eq!(renderer.path_for(12), path);
    assert_eq!(renderer.written(), 1);
    let image = image::load_image(&path).unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert!(image.data().iter().all(|&v| v == 200));
}

#[test]
fn test_folder_renderer_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = FolderRenderer::new(dir.path(), passthrough(), OutputFormat::Jpeg).unwrap();
    let frame = Frame::new(3, Image::filled(2, 2, [0, 0, 0]));
    renderer.render(&frame, output(90.0)).unwrap();
    assert!(dir.path().join("000003.jpg").is_file());
}

#[test]
fn test_collect_renderer() {
    let mut renderer = CollectRenderer::new(passthrough());
    for index in 0..3 {
        let frame = Frame::new(index, Image::filled(2, 2, [0, 0, 0]));
        renderer.render(&frame, output(index as f32)).unwrap();
    }
    let images = renderer.into_images();
    let indices: Vec<u64> = images.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(images[2].1.data()[0], 2);
}

#[test]
fn test_postprocess_error_surfaces() {
    let mut renderer = CollectRenderer::new(passthrough());
    let frame = Frame::new(0, Image::filled(1, 1, [0, 0, 0]));
    let bad = Tensor::new(vec![5], vec![0.0; 5]).unwrap();
    assert!(renderer.render(&frame, bad).is_err());
    assert!(renderer.images().is_empty());
}
