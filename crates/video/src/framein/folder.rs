use {
    super::FrameReader,
    crate::VideoError,
    std::{
        cmp::Ordering,
        collections::VecDeque,
        path::{Path, PathBuf},
    },
};

/// Compares file names so that embedded numbers order by value:
/// `frame2.png` before `frame10.png`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let a_len = a.iter().take_while(|c| c.is_ascii_digit()).count();
                let b_len = b.iter().take_while(|c| c.is_ascii_digit()).count();
                let (a_run, b_run) = (&a[..a_len], &b[..b_len]);
                let a_trim = trim_zeros(a_run);
                let b_trim = trim_zeros(b_run);
                let order = a_trim
                    .len()
                    .cmp(&b_trim.len())
                    .then_with(|| a_trim.cmp(b_trim))
                    // equal values: fewer leading zeros first
                    .then_with(|| a_len.cmp(&b_len));
                if order != Ordering::Equal {
                    return order;
                }
                a = &a[a_len..];
                b = &b[b_len..];
            }
            (Some(x), Some(y)) => {
                let order = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()).then(x.cmp(y));
                if order != Ordering::Equal {
                    return order;
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&c| c == b'0').count();
    &digits[zeros..]
}

/// Supported image files directly inside `dir`, in natural name order.
pub fn list_frames(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, VideoError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && image::is_supported_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| {
        let a = a.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let b = b.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        natural_cmp(a, b)
    });
    Ok(paths)
}

pub(crate) struct FolderReader {
    paths: VecDeque<PathBuf>,
    total: usize,
}

impl FolderReader {
    pub fn open(dir: &Path) -> Result<Self, VideoError> {
        let paths = list_frames(dir)?;
        if paths.is_empty() {
            return Err(VideoError::Empty(format!(
                "no supported images in {}",
                dir.display()
            )));
        }
        Ok(Self {
            total: paths.len(),
            paths: paths.into(),
        })
    }
}

impl FrameReader for FolderReader {
    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }

    fn blocking_read(&mut self) -> Option<Result<image::Image, String>> {
        let path = self.paths.pop_front()?;
        Some(image::load_image(&path).map_err(|e| format!("{}: {}", path.display(), e)))
    }
}
