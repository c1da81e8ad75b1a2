use {super::FrameReader, crate::VideoError, image::Image, std::path::Path};

pub(crate) struct GifReader {
    frames: Box<dyn Iterator<Item = Result<Image, image::ImageError>>>,
    failed: bool,
}

impl GifReader {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let frames = image::gif_frames(path)
            .map_err(|e| VideoError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            frames,
            failed: false,
        })
    }
}

impl FrameReader for GifReader {
    fn len_hint(&self) -> Option<usize> {
        None
    }

    fn blocking_read(&mut self) -> Option<Result<Image, String>> {
        // a broken GIF stream cannot resync, so end after the first error
        if self.failed {
            return None;
        }
        let result = self.frames.next()?;
        if result.is_err() {
            self.failed = true;
        }
        Some(result.map_err(|e| e.to_string()))
    }
}
