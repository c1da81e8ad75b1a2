use {
    crate::InferError,
    serde::Deserialize,
    std::{fmt, str::FromStr},
};

/// Execution target for a compiled model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Device {
    Cpu,
    Cuda { device_id: i32 },
    TensorRt { device_id: i32, fp16: bool },
}

impl Device {
    /// Short file-name-safe form, used in cache keys.
    pub fn key(&self) -> String {
        match self {
            Device::Cpu => "cpu".to_string(),
            Device::Cuda { device_id } => format!("cuda{device_id}"),
            Device::TensorRt { device_id, fp16 } => {
                format!("trt{device_id}{}", if *fp16 { "fp16" } else { "" })
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "CPU"),
            Device::Cuda { device_id } => write!(f, "CUDA(device_id={device_id})"),
            Device::TensorRt { device_id, fp16 } => {
                write!(f, "TensorRT(device_id={device_id}, fp16={fp16})")
            }
        }
    }
}

impl FromStr for Device {
    type Err = String;

    /// Accepts `cpu`, `gpu`, `cuda`, `cuda:<id>`, `tensorrt`, `tensorrt:<id>`
    /// and `tensorrt:<id>:fp16` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut parts = lower.split(':');
        let kind = parts.next().unwrap_or_default();
        let device_id = match parts.next() {
            None | Some("") => 0,
            Some(id) => id
                .parse::<i32>()
                .map_err(|_| format!("invalid device id in {s:?}"))?,
        };
        let device = match kind {
            "cpu" if device_id == 0 => Device::Cpu,
            "gpu" | "cuda" => Device::Cuda { device_id },
            "tensorrt" | "trt" => {
                let fp16 = match parts.next() {
                    None => false,
                    Some("fp16") => true,
                    Some("fp32") => false,
                    Some(other) => return Err(format!("invalid TensorRT precision {other:?}")),
                };
                Device::TensorRt { device_id, fp16 }
            }
            _ => return Err(format!("unknown device {s:?}")),
        };
        if parts.next().is_some() {
            return Err(format!("unexpected trailing fields in {s:?}"));
        }
        Ok(device)
    }
}

impl TryFrom<String> for Device {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Resolves the device a model is compiled for.
///
/// Returns `requested` when `is_available` accepts it, otherwise the explicit
/// `fallback` if there is one and it is available. Never picks a device that
/// was not asked for.
pub fn select_device(
    requested: &Device,
    fallback: Option<&Device>,
    is_available: impl Fn(&Device) -> bool,
) -> Result<Device, InferError> {
    if is_available(requested) {
        return Ok(requested.clone());
    }
    match fallback {
        Some(fallback) if is_available(fallback) => {
            log::warn!("{} is not available, falling back to {}", requested, fallback);
            Ok(fallback.clone())
        }
        Some(fallback) => {
            log::error!("neither {} nor fallback {} is available", requested, fallback);
            Err(InferError::DeviceUnavailable(requested.clone()))
        }
        None => Err(InferError::DeviceUnavailable(requested.clone())),
    }
}
