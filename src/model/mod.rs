//! Data models for staged product media.

mod asset;
mod bucket;
mod preview;
mod product;

pub use asset::{Lifecycle, LocalPayload, MediaAsset, SelectedFile, mime_for_path};
pub use bucket::{Bucket, BucketId, Slot};
pub use preview::{PreviewLease, PreviewRegistry};
pub use product::{ColorVariant, ProductRecord, ProductVariants};
