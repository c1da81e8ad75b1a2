use {
    crate::{Device, InferError},
    std::{
        fmt,
        path::{Path, PathBuf},
        time::UNIX_EPOCH,
    },
};

/// Name of a compiled model in the on-disk cache.
///
/// Derived from the model file (stem, byte length, modification time), the
/// device and the compile options, so any change to one of them misses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(model_path: impl AsRef<Path>, device: &Device, options: &str) -> Result<Self, InferError> {
        let model_path = model_path.as_ref();
        let metadata = std::fs::metadata(model_path)
            .map_err(|e| InferError::Io(format!("{}: {}", model_path.display(), e)))?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let stem: String = model_path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Ok(Self(format!(
            "{}-{:x}-{:x}-{}-{:016x}",
            stem,
            metadata.len(),
            modified,
            device.key(),
            fnv1a(options.as_bytes()),
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<cache_dir>/<key>.onnx`
    pub fn path_in(&self, cache_dir: impl AsRef<Path>) -> PathBuf {
        cache_dir.as_ref().join(format!("{}.onnx", self.0))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// FNV-1a, keys must not change between builds
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
