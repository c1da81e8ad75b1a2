#![cfg(feature = "onnx")]

use {
    base::Tensor,
    inference::{
        Device, InferError, Layout, OnnxEngine, OnnxOptions, Precision, TensorInfo,
        onnx::{ndarray_to_tensor, tensor_to_ndarray},
    },
};

#[test]
fn test_tensor_to_ndarray_conversion() {
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let array = tensor_to_ndarray(tensor).unwrap();
    assert_eq!(array.shape(), &[2, 3]);
    assert_eq!(array[[1, 2]], 6.0);
}

#[test]
fn test_u8_tensor_to_ndarray() {
    let tensor = Tensor::new(vec![1, 2, 2, 1], vec![0u8, 64, 128, 255]).unwrap();
    let array = tensor_to_ndarray(tensor).unwrap();
    assert_eq!(array.shape(), &[1, 2, 2, 1]);
    assert_eq!(array[[0, 1, 0, 0]], 128);
}

#[test]
fn test_ndarray_to_tensor_conversion() {
    let array =
        ndarray::ArrayD::<f32>::from_shape_vec(vec![3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
    let tensor = ndarray_to_tensor(array.view()).unwrap();
    assert_eq!(tensor.shape, vec![3, 2]);
    assert_eq!(tensor.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn test_cpu_always_available() {
    assert!(OnnxEngine::is_device_available(&Device::Cpu));
}

#[test]
fn test_missing_model_fails_to_load() {
    let input = TensorInfo::image("x", 8, 8, 3, Layout::Nchw, Precision::F32);
    let result = OnnxEngine::load("/no/such/model.onnx", Device::Cpu, input, OnnxOptions::default());
    assert!(matches!(result, Err(InferError::ModelLoad(_))));
}
