use {
    crate::args::{Args, FormatArg, LayoutArg, ModeArg},
    anyhow::{Context, anyhow, bail},
    inference::{Device, Layout, Precision, TensorInfo},
    pipeline::{ChannelOrder, ErrorPolicy, Normalize, OutputFormat, PipelineConfig, PostprocessMode},
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

pub const MODEL_PATH_VAR: &str = "LIVE_MODEL_PATH";
pub const DEVICE_VAR: &str = "LIVE_DEVICE";

/// Everything one run needs. Loaded from JSON, then overridden by the
/// environment, then by command line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub model: Option<PathBuf>,
    pub device: Device,
    pub fallback_device: Option<Device>,
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub pipeline: PipelineConfig,
    pub postprocess: PostprocessMode,
    pub model_input: TensorInfo,
    pub normalize: Option<Normalize>,
    pub channel_order: ChannelOrder,
    pub cache_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: None,
            device: Device::Cpu,
            fallback_device: None,
            input: None,
            output: PathBuf::from("out"),
            format: OutputFormat::default(),
            pipeline: PipelineConfig::default(),
            postprocess: PostprocessMode::default(),
            model_input: TensorInfo::image("input", 224, 224, 3, Layout::Nchw, Precision::F32),
            normalize: None,
            channel_order: ChannelOrder::default(),
            cache_dir: None,
            log_dir: None,
        }
    }
}

impl RunConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// File (if any), then process environment, then flags.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.apply_args(args)?;
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(model) = lookup(MODEL_PATH_VAR).filter(|v| !v.is_empty()) {
            self.model = Some(PathBuf::from(model));
        }
        if let Some(device) = lookup(DEVICE_VAR).filter(|v| !v.is_empty()) {
            self.device = device
                .parse()
                .map_err(|e| anyhow!("{DEVICE_VAR}={device}: {e}"))?;
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: &Args) -> anyhow::Result<()> {
        if let Some(model) = &args.model {
            self.model = Some(model.clone());
        }
        if let Some(device) = &args.device {
            self.device = device.clone();
        }
        if let Some(fallback) = &args.fallback_device {
            self.fallback_device = Some(fallback.clone());
        }
        if let Some(input) = &args.input {
            self.input = Some(input.clone());
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if let Some(format) = args.format {
            self.format = match format {
                FormatArg::Png => OutputFormat::Png,
                FormatArg::Jpeg => OutputFormat::Jpeg,
            };
        }
        if let Some(jobs) = args.jobs {
            self.pipeline.max_in_flight = jobs;
        }
        if args.skip_errors {
            self.pipeline.error_policy = ErrorPolicy::SkipAndContinue;
        }
        self.apply_postprocess_args(args);
        self.apply_model_input_args(args);
        if args.mean.is_some() || args.std.is_some() {
            let mut normalize = self.normalize.clone().unwrap_or_else(Normalize::unit);
            if let Some(mean) = &args.mean {
                normalize.mean = triple(mean, "--mean")?;
            }
            if let Some(std) = &args.std {
                normalize.std = triple(std, "--std")?;
            }
            self.normalize = Some(normalize);
        }
        if args.bgr {
            self.channel_order = ChannelOrder::Bgr;
        }
        if let Some(dir) = &args.cache_dir {
            self.cache_dir = Some(dir.clone());
        }
        if let Some(dir) = &args.log_dir {
            self.log_dir = Some(dir.clone());
        }
        Ok(())
    }

    // --alpha and --scale only adjust the mode they belong to
    fn apply_postprocess_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.postprocess = match mode {
                ModeArg::Image => PostprocessMode::Image { scale: 1.0 },
                ModeArg::Heatmap => PostprocessMode::Heatmap { alpha: None },
                ModeArg::Segmentation => PostprocessMode::Segmentation { alpha: 0.5 },
            };
        }
        match &mut self.postprocess {
            PostprocessMode::Image { scale } => {
                if let Some(value) = args.scale {
                    *scale = value;
                }
            }
            PostprocessMode::Heatmap { alpha } => {
                if args.alpha.is_some() {
                    *alpha = args.alpha;
                }
            }
            PostprocessMode::Segmentation { alpha } => {
                if let Some(value) = args.alpha {
                    *alpha = value;
                }
            }
        }
    }

    fn apply_model_input_args(&mut self, args: &Args) {
        if args.size.is_none() && args.layout.is_none() {
            return;
        }
        let current = &self.model_input;
        let (height, width, channels) = current.image_dims().unwrap_or((224, 224, 3));
        let (height, width) = args.size.unwrap_or((height, width));
        let layout = match args.layout {
            Some(LayoutArg::Nchw) => Layout::Nchw,
            Some(LayoutArg::Nhwc) => Layout::Nhwc,
            None => current.layout,
        };
        self.model_input = TensorInfo::image(
            current.name.clone(),
            height,
            width,
            channels,
            layout,
            current.precision,
        );
    }

    pub fn input(&self) -> anyhow::Result<&Path> {
        match &self.input {
            Some(input) => Ok(input),
            None => bail!("no input given; pass --input or set \"input\" in the config"),
        }
    }
}

fn triple(values: &[f32], flag: &str) -> anyhow::Result<[f32; 3]> {
    match values {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => bail!("{flag} takes three comma-separated values"),
    }
}
