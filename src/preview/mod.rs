//! Preview resources for uploaded files.
//!
//! A preview handle is the session's reference to displayable data for the
//! uploaded file. The session acquires one handle per upload and releases it
//! on reset or when a new upload replaces it.
//!
//! # Provider contract
//!
//! * [`PreviewProvider::acquire`] may fail (missing file, permission denied);
//!   the error is returned to the caller untouched.
//! * [`PreviewProvider::release`] is idempotent: releasing an unknown or
//!   already-released handle is a no-op that returns `false`.
//!
//! # Blocking
//!
//! `acquire` reads, hashes and decodes the whole file on the calling thread.
//! In the dashboard that is the event loop, so the screen does not redraw
//! until it returns. [`MAX_PREVIEW_BYTES`] bounds that stall; larger studies
//! are rejected with [`PreviewError::TooLarge`] rather than freezing the UI.
//!
//! # Example
//!
//! ```
//! use axiom_intake::intake::IntakeFile;
//! use axiom_intake::preview::{FilePreviewProvider, PreviewProvider};
//!
//! let mut provider = FilePreviewProvider::new();
//! let file = IntakeFile::from_bytes("scan.jpg", b"not really a jpeg".to_vec());
//!
//! let handle = provider.acquire(&file).unwrap();
//! assert_eq!(provider.get(handle).unwrap().size(), 17);
//!
//! assert!(provider.release(handle));
//! assert!(!provider.release(handle));
//! ```

pub mod thumbnail;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::intake::{IntakeFile, IntakeSource};
pub use thumbnail::Thumbnail;

/// Largest file accepted for preview (32 MiB).
pub const MAX_PREVIEW_BYTES: u64 = 32 * 1024 * 1024;

/// Errors that can occur while acquiring a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// File was not found.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File exceeds the preview size limit.
    #[error("file too large for preview: {path} ({size})")]
    TooLarge { path: PathBuf, size: ByteSize },

    /// An I/O error occurred.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Opaque reference to a live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    /// Numeric id, for logging.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Displayable data bound to one uploaded file.
#[derive(Debug, Clone)]
pub struct Preview {
    name: String,
    size: u64,
    digest: String,
    format: Option<String>,
    dimensions: Option<(u32, u32)>,
    thumbnail: Option<Thumbnail>,
}

impl Preview {
    /// Build a preview from raw bytes. Undecodable images still yield a preview.
    #[must_use]
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = format!("{:x}", hasher.finalize());

        let format = image::guess_format(bytes)
            .ok()
            .and_then(|f| f.extensions_str().first().map(|e| e.to_uppercase()));

        let (dimensions, thumbnail) = match image::load_from_memory(bytes) {
            Ok(img) => (
                Some((img.width(), img.height())),
                Some(Thumbnail::from_image(&img)),
            ),
            Err(e) => {
                log::debug!("No thumbnail for '{}': {}", name, e);
                (None, None)
            }
        };

        Self {
            name: name.to_string(),
            size: bytes.len() as u64,
            digest,
            format,
            dimensions,
            thumbnail,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hex SHA-256 of the file contents.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Detected image format, upper-case (e.g. `PNG`).
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Decoded pixel dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    #[must_use]
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// One-line description: format, size and dimensions.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![
            self.format.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            ByteSize::b(self.size).to_string(),
        ];
        if let Some((w, h)) = self.dimensions {
            parts.push(format!("{w} x {h}"));
        }
        parts.join(" | ")
    }
}

/// Acquires and releases preview handles.
pub trait PreviewProvider {
    /// Produce a preview for `file`.
    ///
    /// # Errors
    ///
    /// Returns a [`PreviewError`] when the file's bytes cannot be obtained.
    fn acquire(&mut self, file: &IntakeFile) -> Result<PreviewHandle, PreviewError>;

    /// Release a handle. Returns `true` if it was live.
    fn release(&mut self, handle: PreviewHandle) -> bool;

    /// Look up a live preview.
    fn get(&self, handle: PreviewHandle) -> Option<&Preview>;

    /// Number of live handles.
    fn live_count(&self) -> usize;
}

/// Provider that reads file bytes from disk (or memory) and keeps previews in a map.
#[derive(Debug, Default)]
pub struct FilePreviewProvider {
    next_id: u64,
    live: HashMap<u64, Preview>,
    max_bytes: Option<u64>,
}

impl FilePreviewProvider {
    /// Create a provider with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            live: HashMap::new(),
            max_bytes: Some(MAX_PREVIEW_BYTES),
        }
    }

    /// Override the size limit (`None` disables it).
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn read_path(&self, path: &Path) -> Result<Vec<u8>, PreviewError> {
        let metadata = fs::metadata(path).map_err(|e| map_io_error(path, e))?;
        if let Some(limit) = self.max_bytes {
            if metadata.len() > limit {
                return Err(PreviewError::TooLarge {
                    path: path.to_path_buf(),
                    size: ByteSize::b(metadata.len()),
                });
            }
        }
        fs::read(path).map_err(|e| map_io_error(path, e))
    }
}

impl PreviewProvider for FilePreviewProvider {
    fn acquire(&mut self, file: &IntakeFile) -> Result<PreviewHandle, PreviewError> {
        let preview = match &file.source {
            IntakeSource::Path(path) => {
                let bytes = self.read_path(path)?;
                Preview::from_bytes(&file.name, &bytes)
            }
            IntakeSource::Bytes(bytes) => Preview::from_bytes(&file.name, bytes),
        };

        let handle = PreviewHandle(self.next_id.max(1));
        self.next_id = handle.0 + 1;
        log::debug!(
            "Acquired preview #{} for '{}' ({})",
            handle.0,
            file.name,
            preview.summary()
        );
        self.live.insert(handle.0, preview);
        Ok(handle)
    }

    fn release(&mut self, handle: PreviewHandle) -> bool {
        let released = self.live.remove(&handle.0).is_some();
        if released {
            log::debug!("Released preview #{}", handle.0);
        } else {
            log::trace!("Preview #{} already released", handle.0);
        }
        released
    }

    fn get(&self, handle: PreviewHandle) -> Option<&Preview> {
        self.live.get(&handle.0)
    }

    fn live_count(&self) -> usize {
        self.live.len()
    }
}

fn map_io_error(path: &Path, e: io::Error) -> PreviewError {
    match e.kind() {
        io::ErrorKind::NotFound => PreviewError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => PreviewError::PermissionDenied(path.to_path_buf()),
        _ => PreviewError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}
