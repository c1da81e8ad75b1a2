use {
    crate::{Frame, FrameSource, VideoError},
    futures_core::Stream,
    image::Image,
    std::{
        path::{Path, PathBuf},
        pin::Pin,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        task::{Context, Poll},
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

mod folder;
pub use folder::{list_frames, natural_cmp};

mod gif;
mod still;

// capacity of the frame channel; bounds how far decoding runs ahead
const CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// Directory of numbered still images, read in natural order.
    Folder(PathBuf),
    /// Animated GIF, one frame per animation frame.
    Gif(PathBuf),
    /// A single image, yielded once as frame 0.
    Still(PathBuf),
}

impl SourceConfig {
    /// Picks the source kind from what `path` is.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let path = path.as_ref();
        if path.is_dir() {
            return Ok(SourceConfig::Folder(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(VideoError::Io(format!("{} does not exist", path.display())));
        }
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("gif"))
            .unwrap_or(false);
        if is_gif {
            Ok(SourceConfig::Gif(path.to_path_buf()))
        } else if image::is_supported_extension(path) {
            Ok(SourceConfig::Still(path.to_path_buf()))
        } else {
            Err(VideoError::Io(format!(
                "{} is not a supported image or video",
                path.display()
            )))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceConfig::Folder(path) | SourceConfig::Gif(path) | SourceConfig::Still(path) => path,
        }
    }
}

/// Produces decoded images one at a time on the worker thread.
///
/// Readers are built on the thread that drives them, so they need not be
/// `Send`.
pub(crate) trait FrameReader {
    fn len_hint(&self) -> Option<usize>;
    /// `None` at end of sequence, `Some(Err)` for a frame that failed to decode.
    fn blocking_read(&mut self) -> Option<Result<Image, String>>;
}

fn create_reader(config: &SourceConfig) -> Result<Box<dyn FrameReader>, VideoError> {
    match config {
        SourceConfig::Folder(dir) => Ok(Box::new(folder::FolderReader::open(dir)?)),
        SourceConfig::Gif(path) => Ok(Box::new(gif::GifReader::open(path)?)),
        SourceConfig::Still(path) => Ok(Box::new(still::StillReader::open(path))),
    }
}

/// Frame source decoding from disk on a blocking worker thread.
pub struct FrameIn {
    receiver: mpsc::Receiver<Result<Frame, VideoError>>,
    cancel: Arc<AtomicBool>,
    len_hint: Option<usize>,
    config: SourceConfig,
    join_handle: Option<JoinHandle<()>>,
}

impl FrameIn {
    async fn spawn_worker(
        sender: mpsc::Sender<Result<Frame, VideoError>>,
        config: SourceConfig,
        cancel: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, Option<usize>), VideoError> {
        let (init_tx, init_rx) = oneshot::channel::<Result<Option<usize>, VideoError>>();

        let join_handle = spawn_blocking(move || {
            let mut reader = match create_reader(&config) {
                Ok(reader) => {
                    let _ = init_tx.send(Ok(reader.len_hint()));
                    reader
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            };

            let mut index = 0u64;
            while !cancel.load(Ordering::Relaxed) {
                let Some(result) = reader.blocking_read() else {
                    log::debug!("frame worker: end of {} after {} frames", config.path().display(), index);
                    return;
                };
                let item = match result {
                    Ok(image) => Ok(Frame::new(index, image)),
                    Err(message) => {
                        log::warn!("frame worker: frame {} failed to decode: {}", index, message);
                        Err(VideoError::Decode { index, message })
                    }
                };
                index += 1;
                if sender.blocking_send(item).is_err() {
                    // receiver dropped, nobody wants the rest
                    return;
                }
            }
            log::debug!("frame worker: cancelled at frame {}", index);
        });

        let len_hint = init_rx
            .await
            .map_err(|_| VideoError::Channel("frame worker died during init".to_string()))??;

        Ok((join_handle, len_hint))
    }

    pub async fn open(config: SourceConfig) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let (join_handle, len_hint) =
            Self::spawn_worker(sender, config.clone(), Arc::clone(&cancel)).await?;
        log::info!("opened {:?} ({:?} frames)", config, len_hint);
        Ok(Self {
            receiver,
            cancel,
            len_hint,
            config,
            join_handle: Some(join_handle),
        })
    }

    /// Opens whatever `path` points at, see `SourceConfig::from_path`.
    pub async fn open_path(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        Self::open(SourceConfig::from_path(path)?).await
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Next frame, `Ok(None)` once the source is exhausted.
    pub async fn recv(&mut self) -> Result<Option<Frame>, VideoError> {
        self.receiver.recv().await.transpose()
    }
}

impl FrameSource for FrameIn {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        self.recv().await
    }

    fn len_hint(&self) -> Option<usize> {
        self.len_hint
    }
}

impl Stream for FrameIn {
    type Item = Result<Frame, VideoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for FrameIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // a worker parked in blocking_send wakes up when the receiver closes
        self.receiver.close();
        self.join_handle.take();
    }
}
