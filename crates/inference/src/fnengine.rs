use {
    crate::{Blob, Device, Engine, InferError, InferRequest, TensorInfo},
    base::Tensor,
    std::sync::Arc,
};

type InferFn = dyn Fn(Blob) -> Result<Tensor<f32>, InferError> + Send + Sync;

/// Engine backed by a closure.
///
/// For runtimes that have no engine of their own here, and for driving a
/// pipeline without a model. Every request shares the closure and checks the
/// blob against `input` before calling it.
#[derive(Clone)]
pub struct FnEngine {
    name: String,
    device: Device,
    input: TensorInfo,
    output: Option<TensorInfo>,
    func: Arc<InferFn>,
}

impl FnEngine {
    pub fn new(
        input: TensorInfo,
        func: impl Fn(Blob) -> Result<Tensor<f32>, InferError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: "fn".to_string(),
            device: Device::Cpu,
            input,
            output: None,
            func: Arc::new(func),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_output(mut self, output: TensorInfo) -> Self {
        self.output = Some(output);
        self
    }
}

impl Engine for FnEngine {
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
        Ok(Box::new(FnRequest {
            input: self.input.clone(),
            func: Arc::clone(&self.func),
        }))
    }
}

struct FnRequest {
    input: TensorInfo,
    func: Arc<InferFn>,
}

impl InferRequest for FnRequest {
    fn infer(&mut self, input: Blob) -> Result<Tensor<f32>, InferError> {
        input.check(&self.input)?;
        (self.func)(input)
    }
}
