//! Media asset types: persisted images and staged local payloads.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use image::ImageFormat;
use mediastage_net::UploadFile;

use super::preview::{PreviewLease, PreviewRegistry};
use crate::constants::UNKNOWN_MIME;

/// Whether an image already lives on the server or only in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Stored by the server under a stable identifier
    Persisted,
    /// Held locally, waiting for the upload at submit time
    Staged,
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Persisted => "persisted",
            Lifecycle::Staged => "staged",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file the user picked, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    /// Filename shown to the user and forwarded to the server
    pub name: String,
    /// Declared MIME type
    pub mime: String,
    /// File contents
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Read a file from disk, declaring its MIME type from the extension.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| "unnamed".to_string());

        Ok(Self {
            name,
            mime: mime_for_path(path).to_string(),
            bytes: bytes.into(),
        })
    }
}

/// MIME type implied by a path's extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// Bytes of a staged image together with its preview reference.
///
/// Both are released together: dropping the payload drops its share of the
/// preview lease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalPayload {
    name: String,
    mime: String,
    bytes: Bytes,
    preview: PreviewLease,
}

impl LocalPayload {
    /// Wrap an already validated file, acquiring a preview for it.
    pub fn stage(file: SelectedFile, registry: &PreviewRegistry) -> Self {
        let preview = registry.acquire(&file.name);
        Self {
            name: file.name,
            mime: file.mime,
            bytes: file.bytes,
            preview,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn preview(&self) -> &PreviewLease {
        &self.preview
    }

    /// The multipart part this payload is uploaded as.
    pub fn to_upload_file(&self) -> UploadFile {
        UploadFile::new(self.name.clone(), self.mime.clone(), self.bytes.clone())
    }
}

/// One image of a product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaAsset {
    /// Known to the server under `remote_id` (URL or path)
    Persisted { remote_id: String },
    /// Only held locally
    Staged(LocalPayload),
}

impl MediaAsset {
    pub fn persisted(remote_id: impl Into<String>) -> Self {
        MediaAsset::Persisted {
            remote_id: remote_id.into(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            MediaAsset::Persisted { .. } => Lifecycle::Persisted,
            MediaAsset::Staged(_) => Lifecycle::Staged,
        }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            MediaAsset::Persisted { remote_id } => Some(remote_id),
            MediaAsset::Staged(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&LocalPayload> {
        match self {
            MediaAsset::Persisted { .. } => None,
            MediaAsset::Staged(payload) => Some(payload),
        }
    }

    /// What a UI shows for this image: the remote id or the preview reference.
    pub fn display_reference(&self) -> &str {
        match self {
            MediaAsset::Persisted { remote_id } => remote_id,
            MediaAsset::Staged(payload) => payload.preview().reference(),
        }
    }
}
