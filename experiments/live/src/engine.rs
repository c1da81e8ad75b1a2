use {
    crate::config::RunConfig,
    inference::{Device, FnEngine, InferError, select_device},
};

/// Without a model the pipeline still runs end to end: the preprocessed
/// input comes straight back as the output. Runs on the CPU only.
pub fn identity_engine(config: &RunConfig) -> Result<FnEngine, InferError> {
    let device = select_device(&config.device, config.fallback_device.as_ref(), |device| {
        *device == Device::Cpu
    })?;
    let input = config.model_input.clone();
    let mut output = input.clone();
    output.name = "output".to_string();
    output.precision = inference::Precision::F32;
    Ok(FnEngine::new(input, |blob| Ok(blob.into_f32()))
        .with_name("identity")
        .with_device(device)
        .with_output(output))
}

#[cfg(feature = "onnx")]
pub fn onnx_engine(
    config: &RunConfig,
    model: &std::path::Path,
) -> Result<inference::OnnxEngine, InferError> {
    use inference::{OnnxEngine, OnnxOptions};
    let device = select_device(
        &config.device,
        config.fallback_device.as_ref(),
        OnnxEngine::is_device_available,
    )?;
    log::info!("compiling {} for {}", model.display(), device);
    let options = OnnxOptions {
        cache_dir: config.cache_dir.clone(),
        ..OnnxOptions::default()
    };
    OnnxEngine::load(model, device, config.model_input.clone(), options)
}

#[cfg(test)]
mod tests {
    use {super::*, inference::Engine};

    #[test]
    fn test_identity_on_cpu() {
        let engine = identity_engine(&RunConfig::default()).unwrap();
        assert_eq!(engine.name(), "identity");
        assert_eq!(engine.device(), &Device::Cpu);
    }

    #[test]
    fn test_identity_needs_cpu() {
        let mut config = RunConfig {
            device: Device::Cuda { device_id: 0 },
            ..RunConfig::default()
        };
        assert_eq!(
            identity_engine(&config).err(),
            Some(InferError::DeviceUnavailable(Device::Cuda { device_id: 0 }))
        );
        config.fallback_device = Some(Device::Cpu);
        assert_eq!(identity_engine(&config).unwrap().device(), &Device::Cpu);
    }
}
