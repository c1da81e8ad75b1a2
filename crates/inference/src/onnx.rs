use {
    crate::{Blob, CacheKey, Device, Engine, InferError, InferRequest, TensorInfo},
    base::Tensor,
    ndarray::ArrayD,
    ort::{
        session::{Session, builder::GraphOptimizationLevel, builder::SessionBuilder},
        value::TensorRef,
    },
    std::{
        path::{Path, PathBuf},
        sync::{Arc, Mutex},
    },
};

fn backend(e: impl std::fmt::Display) -> InferError {
    InferError::Backend(e.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnnxOptions {
    /// Graph optimization level, 0 (off) to 3 (all).
    pub optimization_level: u8,
    pub intra_threads: Option<usize>,
    /// Where compiled graphs are kept between runs.
    pub cache_dir: Option<PathBuf>,
}

impl Default for OnnxOptions {
    fn default() -> Self {
        Self {
            optimization_level: 3,
            intra_threads: None,
            cache_dir: None,
        }
    }
}

impl OnnxOptions {
    /// Everything that changes the compiled graph, for the cache key.
    fn fingerprint(&self) -> String {
        format!("opt{};threads{:?}", self.optimization_level, self.intra_threads)
    }

    fn level(&self) -> GraphOptimizationLevel {
        match self.optimization_level {
            0 => GraphOptimizationLevel::Disable,
            1 => GraphOptimizationLevel::Level1,
            2 => GraphOptimizationLevel::Level2,
            _ => GraphOptimizationLevel::Level3,
        }
    }
}

/// ONNX Runtime engine. The model is compiled once in `load`; every request
/// runs on that one session.
pub struct OnnxEngine {
    name: String,
    device: Device,
    input: TensorInfo,
    output: Option<TensorInfo>,
    session: Arc<Mutex<Session>>,
}

impl OnnxEngine {
    /// Whether this build can run on `device` on this machine.
    pub fn is_device_available(device: &Device) -> bool {
        match device {
            Device::Cpu => true,
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
                CUDAExecutionProvider::default()
                    .with_device_id(*device_id)
                    .is_available()
                    .unwrap_or(false)
            }
            #[cfg(feature = "tensorrt")]
            Device::TensorRt { device_id, .. } => {
                use ort::execution_providers::{ExecutionProvider, TensorRTExecutionProvider};
                TensorRTExecutionProvider::default()
                    .with_device_id(*device_id)
                    .is_available()
                    .unwrap_or(false)
            }
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    fn with_device(builder: SessionBuilder, device: &Device) -> Result<SessionBuilder, InferError> {
        match device {
            Device::Cpu => Ok(builder),
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::CUDAExecutionProvider;
                builder
                    .with_execution_providers([CUDAExecutionProvider::default()
                        .with_device_id(*device_id)
                        .build()
                        .error_on_failure()])
                    .map_err(|_| InferError::DeviceUnavailable(device.clone()))
            }
            #[cfg(feature = "tensorrt")]
            Device::TensorRt { device_id, fp16 } => {
                use ort::execution_providers::TensorRTExecutionProvider;
                builder
                    .with_execution_providers([TensorRTExecutionProvider::default()
                        .with_device_id(*device_id)
                        .with_fp16(*fp16)
                        .build()
                        .error_on_failure()])
                    .map_err(|_| InferError::DeviceUnavailable(device.clone()))
            }
            #[allow(unreachable_patterns)]
            _ => Err(InferError::DeviceUnavailable(device.clone())),
        }
    }

    /// Compiles `model_path` for `device`.
    ///
    /// With a cache directory, the optimized graph is written to
    /// `<cache_dir>/<key>.onnx` on first load and read back from there on
    /// later loads.
    pub fn load(
        model_path: impl AsRef<Path>,
        device: Device,
        input: TensorInfo,
        options: OnnxOptions,
    ) -> Result<Self, InferError> {
        let model_path = model_path.as_ref();
        if !model_path.is_file() {
            return Err(InferError::ModelLoad(format!(
                "{} does not exist",
                model_path.display()
            )));
        }

        let cached = match &options.cache_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Some(CacheKey::new(model_path, &device, &options.fingerprint())?.path_in(dir))
            }
            None => None,
        };

        let mut builder = Session::builder().map_err(backend)?;
        if let Some(threads) = options.intra_threads {
            builder = builder.with_intra_threads(threads).map_err(backend)?;
        }
        builder = Self::with_device(builder, &device)?;

        let session = match cached {
            Some(cached) if cached.is_file() => {
                log::info!("loading compiled model {}", cached.display());
                builder
                    .with_optimization_level(GraphOptimizationLevel::Disable)
                    .map_err(backend)?
                    .commit_from_file(&cached)
            }
            Some(cached) => {
                log::info!(
                    "compiling {} for {}, caching to {}",
                    model_path.display(),
                    device,
                    cached.display()
                );
                builder
                    .with_optimization_level(options.level())
                    .map_err(backend)?
                    .with_optimized_model_path(&cached)
                    .map_err(backend)?
                    .commit_from_file(model_path)
            }
            None => {
                log::info!("compiling {} for {}", model_path.display(), device);
                builder
                    .with_optimization_level(options.level())
                    .map_err(backend)?
                    .commit_from_file(model_path)
            }
        }
        .map_err(|e| InferError::ModelLoad(format!("{}: {}", model_path.display(), e)))?;

        let name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        Ok(Self {
            name,
            device,
            input,
            output: None,
            session: Arc::new(Mutex::new(session)),
        })
    }

    pub fn with_output(mut self, output: TensorInfo) -> Self {
        self.output = Some(output);
        self
    }
}

impl Engine for OnnxEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn input(&self) -> &TensorInfo {
        &self.input
    }

    fn output(&self) -> Option<&TensorInfo> {
        self.output.as_ref()
    }

    fn create_request(&self) -> Result<Box<dyn InferRequest>, InferError> {
        Ok(Box::new(OnnxRequest {
            input: self.input.clone(),
            session: Arc::clone(&self.session),
        }))
    }
}

struct OnnxRequest {
    input: TensorInfo,
    session: Arc<Mutex<Session>>,
}

impl InferRequest for OnnxRequest {
    fn infer(&mut self, input: Blob) -> Result<Tensor<f32>, InferError> {
        input.check(&self.input)?;
        let mut session = self
            .session
            .lock()
            .map_err(|_| InferError::Runtime("session lock poisoned".to_string()))?;
        // outputs borrow the session, so each arm extracts before returning
        match input {
            Blob::F32(tensor) => {
                let array = tensor_to_ndarray(tensor)?;
                let tensor_ref = TensorRef::from_array_view(array.view()).map_err(backend)?;
                let outputs = session.run(ort::inputs![tensor_ref]).map_err(backend)?;
                ndarray_to_tensor(outputs[0].try_extract_array::<f32>().map_err(backend)?)
            }
            Blob::U8(tensor) => {
                let array = tensor_to_ndarray(tensor)?;
                let tensor_ref = TensorRef::from_array_view(array.view()).map_err(backend)?;
                let outputs = session.run(ort::inputs![tensor_ref]).map_err(backend)?;
                ndarray_to_tensor(outputs[0].try_extract_array::<f32>().map_err(backend)?)
            }
        }
    }
}

/// `Tensor` to `ndarray`, as ort takes its inputs.
pub fn tensor_to_ndarray<T>(tensor: Tensor<T>) -> Result<ArrayD<T>, InferError> {
    ArrayD::from_shape_vec(tensor.shape, tensor.data).map_err(backend)
}

pub fn ndarray_to_tensor(array: ndarray::ArrayViewD<'_, f32>) -> Result<Tensor<f32>, InferError> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
