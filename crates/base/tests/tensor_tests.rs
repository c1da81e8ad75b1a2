use base::{Tensor, TensorError, element_count};

#[test]
fn test_tensor_new_valid() {
    let tensor = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(tensor.shape, vec![2, 3]);
    assert_eq!(tensor.len(), 6);
    assert_eq!(tensor.ndim(), 2);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = Tensor::<f32>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_zeros() {
    let tensor = Tensor::<u8>::zeros(vec![1, 3, 2, 2]).unwrap();
    assert_eq!(tensor.data, vec![0; 12]);
}

#[test]
fn test_empty_dimension_gives_empty_tensor() {
    let tensor = Tensor::<f32>::new(vec![0, 4, 3], vec![]).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(element_count(&[0, 4, 3]).unwrap(), 0);
}

#[test]
fn test_dims_known_rank() {
    let tensor = Tensor::new(vec![1, 3, 4, 5], vec![0.0f32; 60]).unwrap();
    let [n, c, h, w] = tensor.dims::<4>().unwrap();
    assert_eq!((n, c, h, w), (1, 3, 4, 5));
}

#[test]
fn test_dims_wrong_rank() {
    let tensor = Tensor::new(vec![4, 5], vec![0.0f32; 20]).unwrap();
    assert_eq!(
        tensor.dims::<4>().unwrap_err(),
        TensorError::Rank {
            expected: 4,
            got: 2
        }
    );
}

#[test]
fn test_map_keeps_shape() {
    let tensor = Tensor::new(vec![2, 2], vec![1u8, 2, 3, 4]).unwrap();
    let mapped = tensor.map(|&v| v as f32 * 0.5);
    assert_eq!(mapped.shape, vec![2, 2]);
    assert_eq!(mapped.data, vec![0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn test_error_display() {
    let err = TensorError::ShapeMismatch {
        expected: 6,
        got: 3,
    };
    assert!(err.to_string().contains("expected 6"));
}
