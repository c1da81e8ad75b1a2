use {super::FrameReader, image::Image, std::path::{Path, PathBuf}};

pub(crate) struct StillReader {
    path: Option<PathBuf>,
}

impl StillReader {
    pub fn open(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
        }
    }
}

impl FrameReader for StillReader {
    fn len_hint(&self) -> Option<usize> {
        Some(1)
    }

    fn blocking_read(&mut self) -> Option<Result<Image, String>> {
        let path = self.path.take()?;
        Some(image::load_image(&path).map_err(|e| format!("{}: {}", path.display(), e)))
    }
}
