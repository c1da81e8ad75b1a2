use {
    crate::{Postprocessor, RenderError},
    base::Tensor,
    image::Image,
    serde::Deserialize,
    std::path::{Path, PathBuf},
    video::Frame,
};

/// Consumer of results, called once per delivered frame in index order.
///
/// Calls never overlap; the scheduler makes them from a single task.
pub trait Renderer {
    fn render(&mut self, frame: &Frame, output: Tensor<f32>) -> Result<(), RenderError>;
}

impl<F> Renderer for F
where
    F: FnMut(&Frame, Tensor<f32>) -> Result<(), RenderError>,
{
    fn render(&mut self, frame: &Frame, output: Tensor<f32>) -> Result<(), RenderError> {
        self(frame, output)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Writes each rendered frame to `<dir>/<index:06>.<ext>`.
pub struct FolderRenderer {
    dir: PathBuf,
    format: OutputFormat,
    postprocessor: Postprocessor,
    written: u64,
}

impl FolderRenderer {
    /// Creates `dir` if needed.
    pub fn new(
        dir: impl AsRef<Path>,
        postprocessor: Postprocessor,
        format: OutputFormat,
    ) -> Result<Self, RenderError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            format,
            postprocessor,
            written: 0,
        })
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir
            .join(format!("{:06}.{}", index, self.format.extension()))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Renderer for FolderRenderer {
    fn render(&mut self, frame: &Frame, output: Tensor<f32>) -> Result<(), RenderError> {
        let image = self.postprocessor.apply(frame, &output)?;
        let path = self.path_for(frame.index);
        image::save_image(&image, &path)?;
        log::debug!("wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}

/// Keeps rendered images in memory, in delivery order.
pub struct CollectRenderer {
    postprocessor: Postprocessor,
    images: Vec<(u64, Image)>,
}

impl CollectRenderer {
    pub fn new(postprocessor: Postprocessor) -> Self {
        Self {
            postprocessor,
            images: Vec::new(),
        }
    }

    pub fn images(&self) -> &[(u64, Image)] {
        &self.images
    }

    pub fn into_images(self) -> Vec<(u64, Image)> {
        self.images
    }
}

impl Renderer for CollectRenderer {
    fn render(&mut self, frame: &Frame, output: Tensor<f32>) -> Result<(), RenderError> {
        let image = self.postprocessor.apply(frame, &output)?;
        self.images.push((frame.index, image));
        Ok(())
    }
}
