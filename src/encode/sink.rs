use std::path::{Path, PathBuf};

use crate::encode::export::{EncodeFormat, encode_bitmap};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Where a delivered strip ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Written to a file.
    Saved(PathBuf),
    /// Kept in memory at this index of the sink's payloads.
    Held(usize),
}

/// Export collaborator consuming finished strips.
pub trait StripSink {
    fn deliver(&mut self, strip: &Bitmap) -> PhotoboothResult<Delivery>;
}

/// Writes strips into a directory as `photostrip_<timestamp>.<ext>`, never replacing a file.
#[derive(Clone, Debug)]
pub struct LibrarySink {
    dir: PathBuf,
    format: EncodeFormat,
}

impl LibrarySink {
    pub fn new(dir: impl Into<PathBuf>, format: EncodeFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_new(&self, stamp: &str, bytes: &[u8]) -> PhotoboothResult<PathBuf> {
        use std::io::Write as _;

        let ext = self.format.extension();
        for n in 0u32.. {
            let name = if n == 0 {
                format!("photostrip_{stamp}.{ext}")
            } else {
                format!("photostrip_{stamp}_{n}.{ext}")
            };
            let path = self.dir.join(name);
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(mut f) => {
                    f.write_all(bytes)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(PhotoboothError::render("no free file name for strip"))
    }
}

impl StripSink for LibrarySink {
    fn deliver(&mut self, strip: &Bitmap) -> PhotoboothResult<Delivery> {
        let bytes = encode_bitmap(strip, self.format)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            PhotoboothError::config(format!(
                "create library dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = self.write_new(&stamp, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "strip saved");
        Ok(Delivery::Saved(path))
    }
}

/// Keeps encoded strips in memory; the share path and tests use it.
#[derive(Debug)]
pub struct InMemorySink {
    format: EncodeFormat,
    payloads: Vec<Vec<u8>>,
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new(EncodeFormat::default())
    }
}

impl InMemorySink {
    pub fn new(format: EncodeFormat) -> Self {
        Self {
            format,
            payloads: Vec::new(),
        }
    }

    pub fn format(&self) -> EncodeFormat {
        self.format
    }

    /// Encoded strips in delivery order.
    pub fn payloads(&self) -> &[Vec<u8>] {
        &self.payloads
    }
}

impl StripSink for InMemorySink {
    fn deliver(&mut self, strip: &Bitmap) -> PhotoboothResult<Delivery> {
        let bytes = encode_bitmap(strip, self.format)?;
        self.payloads.push(bytes);
        Ok(Delivery::Held(self.payloads.len() - 1))
    }
}
