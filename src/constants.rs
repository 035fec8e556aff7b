//! Global constants for the media pipeline

/// Largest file accepted when staging an image (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// MIME prefix a selected file must declare to be staged.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Fallback MIME type for files whose extension is not recognised.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Upload endpoint of a locally running product API.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:8000/api/products/upload-images";

/// Scheme prefix of preview references handed out by the registry.
pub const PREVIEW_SCHEME: &str = "blob:mediastage";
