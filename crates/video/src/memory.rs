use {
    crate::{Frame, FrameSource, VideoError},
    image::Image,
    std::collections::VecDeque,
};

/// Frames held in memory. Entries given as `Err` surface as decode errors
/// at their position.
pub struct VecSource {
    items: VecDeque<Result<Image, String>>,
    next_index: u64,
    total: usize,
}

impl VecSource {
    pub fn new(images: Vec<Image>) -> Self {
        Self::from_items(images.into_iter().map(Ok).collect())
    }

    pub fn from_items(items: Vec<Result<Image, String>>) -> Self {
        Self {
            total: items.len(),
            items: items.into(),
            next_index: 0,
        }
    }
}

impl FrameSource for VecSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        let Some(item) = self.items.pop_front() else {
            return Ok(None);
        };
        let index = self.next_index;
        self.next_index += 1;
        match item {
            Ok(image) => Ok(Some(Frame::new(index, image))),
            Err(message) => Err(VideoError::Decode { index, message }),
        }
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}
