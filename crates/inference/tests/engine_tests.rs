use {
    base::Tensor,
    inference::{Blob, Device, Engine, FnEngine, InferError, Layout, Precision, TensorInfo},
};

fn input() -> TensorInfo {
    TensorInfo::image("x", 2, 3, 3, Layout::Nchw, Precision::F32)
}

fn sum_engine() -> FnEngine {
    FnEngine::new(input(), |blob| {
        let tensor = blob.into_f32();
        let sum: f32 = tensor.data.iter().sum();
        Ok(Tensor::new(vec![1], vec![sum])?)
    })
}

#[test]
fn test_tensor_info_image_dims() {
    let nchw = TensorInfo::image("x", 4, 5, 3, Layout::Nchw, Precision::F32);
    assert_eq!(nchw.shape, vec![1, 3, 4, 5]);
    assert_eq!(nchw.image_dims(), Some((4, 5, 3)));
    assert_eq!(nchw.element_count(), 60);

    let nhwc = TensorInfo::image("x", 4, 5, 1, Layout::Nhwc, Precision::U8);
    assert_eq!(nhwc.shape, vec![1, 4, 5, 1]);
    assert_eq!(nhwc.image_dims(), Some((4, 5, 1)));

    let flat = TensorInfo::new("x", vec![10], Precision::F32, Layout::Nchw);
    assert_eq!(flat.image_dims(), None);
}

#[test]
fn test_tensor_info_deserialize() {
    let info: TensorInfo = serde_json::from_str(
        r#"{"name":"images","shape":[1,3,224,224],"precision":"f32","layout":"nchw"}"#,
    )
    .unwrap();
    assert_eq!(info, TensorInfo::image("images", 224, 224, 3, Layout::Nchw, Precision::F32));
}

#[test]
fn test_fn_engine_infers() {
    let engine = sum_engine().with_name("sum");
    assert_eq!(engine.name(), "sum");
    assert_eq!(engine.device(), &Device::Cpu);
    assert_eq!(engine.input(), &input());
    assert!(engine.output().is_none());

    let mut request = engine.create_request().unwrap();
    let blob = Blob::F32(Tensor::new(vec![1, 3, 2, 3], vec![1.0; 18]).unwrap());
    let out = request.infer(blob).unwrap();
    assert_eq!(out.data, vec![18.0]);
}

#[test]
fn test_fn_engine_rejects_wrong_shape() {
    let engine = sum_engine();
    let mut request = engine.create_request().unwrap();
    let blob = Blob::F32(Tensor::new(vec![1, 3, 3, 2], vec![0.0; 18]).unwrap());
    assert_eq!(
        request.infer(blob),
        Err(InferError::ShapeMismatch {
            expected: vec![1, 3, 2, 3],
            got: vec![1, 3, 3, 2],
        })
    );
}

#[test]
fn test_fn_engine_rejects_wrong_precision() {
    let engine = sum_engine();
    let mut request = engine.create_request().unwrap();
    let blob = Blob::U8(Tensor::new(vec![1, 3, 2, 3], vec![0; 18]).unwrap());
    assert!(matches!(request.infer(blob), Err(InferError::Runtime(_))));
}

#[test]
fn test_requests_are_independent() {
    let engine = sum_engine().with_device(Device::Cuda { device_id: 0 });
    let mut a = engine.create_request().unwrap();
    let mut b = engine.create_request().unwrap();
    let ones = Blob::F32(Tensor::new(vec![1, 3, 2, 3], vec![1.0; 18]).unwrap());
    let twos = Blob::F32(Tensor::new(vec![1, 3, 2, 3], vec![2.0; 18]).unwrap());
    assert_eq!(b.infer(twos).unwrap().data, vec![36.0]);
    assert_eq!(a.infer(ones).unwrap().data, vec![18.0]);
}

#[test]
fn test_blob_into_f32() {
    let blob = Blob::U8(Tensor::new(vec![2], vec![3, 255]).unwrap());
    assert_eq!(blob.precision(), Precision::U8);
    assert_eq!(blob.into_f32().data, vec![3.0, 255.0]);
}
