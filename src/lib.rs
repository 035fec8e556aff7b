//! Mediastage - staged product media
//!
//! Manages the images of a product being edited: a main image, a gallery and
//! one image list per color variant. Newly selected files are held locally
//! until submit, when they are uploaded bucket by bucket and merged into the
//! product record.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod model;
pub mod state;
pub mod submit;
pub mod upload;

#[cfg(test)]
mod test_util;

pub use config::{ConfigError, LogLevel, MediaConfig, OrphanPolicy};
pub use editor::MediaEditor;
pub use error::MediaError;
pub use model::{
    BucketId, ColorVariant, Lifecycle, MediaAsset, PreviewRegistry, ProductRecord, SelectedFile,
    Slot,
};
pub use state::{BucketStore, DragController, DragState, DropOutcome};
pub use submit::{ProductSaver, SaveError, SubmissionCoordinator, SubmitError, SubmitPhase};
pub use upload::{UploadPipeline, UploadReport};

pub use mediastage_net::{HttpUploader, MediaUploader, UploadError};
