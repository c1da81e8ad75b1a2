use {
    clap::{Parser, ValueEnum},
    inference::Device,
    std::path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Image,
    Heatmap,
    Segmentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Nchw,
    Nhwc,
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (h, w) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected HEIGHTxWIDTH, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<usize>().map_err(|e| format!("{v:?}: {e}"));
    Ok((parse(h)?, parse(w)?))
}

/// Runs a model over a folder of frames, a GIF or a single image, and
/// writes the rendered results in frame order.
///
/// Settings come from the JSON config file, then LIVE_MODEL_PATH and
/// LIVE_DEVICE, then these flags; later sources win.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSON run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// ONNX model; without one the identity engine echoes its input
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// cpu, gpu, cuda:N, tensorrt:N or tensorrt:N:fp16
    #[arg(short, long)]
    pub device: Option<Device>,

    /// Device to use when the requested one is missing
    #[arg(long)]
    pub fallback_device: Option<Device>,

    /// Frame folder, animated GIF or still image
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for rendered frames
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Concurrent inference requests
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Drop failing frames instead of aborting
    #[arg(long)]
    pub skip_errors: bool,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Overlay opacity for heatmap and segmentation modes
    #[arg(long)]
    pub alpha: Option<f32>,

    /// Output multiplier for image mode (255 for [0, 1] outputs)
    #[arg(long)]
    pub scale: Option<f32>,

    /// Model input size as HEIGHTxWIDTH
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(usize, usize)>,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Per-channel mean on [0, 1] values, e.g. 0.485,0.456,0.406
    #[arg(long, value_delimiter = ',')]
    pub mean: Option<Vec<f32>>,

    /// Per-channel std on [0, 1] values, e.g. 0.229,0.224,0.225
    #[arg(long, value_delimiter = ',')]
    pub std: Option<Vec<f32>>,

    /// Feed channels to the model as BGR
    #[arg(long)]
    pub bgr: bool,

    /// Keep compiled models here between runs
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Log to day-rolling files in this directory instead of stdout
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("480x640"), Ok((480, 640)));
        assert_eq!(parse_size("32X32"), Ok((32, 32)));
        assert!(parse_size("480").is_err());
        assert!(parse_size("ax1").is_err());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "live", "-i", "frames", "-d", "cuda:1", "-j", "4", "--mean", "0.5,0.5,0.5",
            "--size", "64x48", "--skip-errors",
        ])
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("frames")));
        assert_eq!(args.device, Some(Device::Cuda { device_id: 1 }));
        assert_eq!(args.jobs, Some(4));
        assert_eq!(args.mean, Some(vec![0.5, 0.5, 0.5]));
        assert_eq!(args.size, Some((64, 48)));
        assert!(args.skip_errors);
        assert!(Args::try_parse_from(["live", "-d", "abacus"]).is_err());
    }
}
