use inference::{Device, InferError, select_device};

#[test]
fn test_parse_devices() {
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("CPU".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("gpu".parse::<Device>().unwrap(), Device::Cuda { device_id: 0 });
    assert_eq!("cuda:1".parse::<Device>().unwrap(), Device::Cuda { device_id: 1 });
    assert_eq!(
        "tensorrt:0".parse::<Device>().unwrap(),
        Device::TensorRt {
            device_id: 0,
            fp16: false
        }
    );
    assert_eq!(
        "tensorrt:2:fp16".parse::<Device>().unwrap(),
        Device::TensorRt {
            device_id: 2,
            fp16: true
        }
    );
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("npu".parse::<Device>().is_err());
    assert!("cuda:x".parse::<Device>().is_err());
    assert!("tensorrt:0:int4".parse::<Device>().is_err());
    assert!("cuda:0:fp16".parse::<Device>().is_err());
}

#[test]
fn test_device_display_and_key() {
    assert_eq!(Device::Cpu.to_string(), "CPU");
    assert_eq!(Device::Cuda { device_id: 1 }.to_string(), "CUDA(device_id=1)");
    assert_eq!(Device::Cpu.key(), "cpu");
    assert_eq!(
        Device::TensorRt {
            device_id: 0,
            fp16: true
        }
        .key(),
        "trt0fp16"
    );
}

#[test]
fn test_device_deserialize() {
    let device: Device = serde_json::from_str("\"cuda:3\"").unwrap();
    assert_eq!(device, Device::Cuda { device_id: 3 });
    assert!(serde_json::from_str::<Device>("\"quantum\"").is_err());
}

#[test]
fn test_select_requested_when_available() {
    let gpu = Device::Cuda { device_id: 0 };
    let device = select_device(&gpu, Some(&Device::Cpu), |_| true).unwrap();
    assert_eq!(device, gpu);
}

#[test]
fn test_select_falls_back_explicitly() {
    let gpu = Device::Cuda { device_id: 0 };
    let device = select_device(&gpu, Some(&Device::Cpu), |d| *d == Device::Cpu).unwrap();
    assert_eq!(device, Device::Cpu);
}

#[test]
fn test_select_without_fallback_fails() {
    let gpu = Device::Cuda { device_id: 0 };
    let result = select_device(&gpu, None, |d| *d == Device::Cpu);
    assert_eq!(result, Err(InferError::DeviceUnavailable(gpu)));
}

#[test]
fn test_select_unavailable_fallback_fails() {
    let gpu = Device::Cuda { device_id: 0 };
    let trt = Device::TensorRt {
        device_id: 0,
        fp16: false,
    };
    let result = select_device(&trt, Some(&gpu), |_| false);
    assert_eq!(result, Err(InferError::DeviceUnavailable(trt)));
}
