//! Submission of an edited product: validation, upload, assembly and save.

mod assemble;
mod coordinator;

use async_trait::async_trait;
use thiserror::Error;

use mediastage_net::UploadError;

use crate::error::MediaError;
use crate::model::{BucketId, ProductRecord};

pub use assemble::assemble;
pub use coordinator::{SubmissionCoordinator, SubmitPhase};

/// Receives the assembled product record. Persisting it is up to the caller.
#[async_trait]
pub trait ProductSaver: Send + Sync {
    async fn save(&self, record: ProductRecord) -> Result<(), SaveError>;
}

/// Failure reported by a [`ProductSaver`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to save product: {message}")]
pub struct SaveError {
    pub message: String,
}

impl SaveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a submission did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The product has no main image
    #[error("A main image is required")]
    MissingMainImage,

    /// The record and the store cannot be combined
    #[error(transparent)]
    Media(#[from] MediaError),

    /// A bucket failed to upload; nothing was saved
    #[error("Failed to upload images for {bucket}: {source}")]
    Upload {
        /// The bucket whose batch failed
        bucket: BucketId,
        /// Error returned by the uploader
        source: UploadError,
        /// Identifiers uploaded by earlier buckets of the same attempt
        orphaned: Vec<String>,
    },

    /// Upload succeeded but the save collaborator failed
    #[error(transparent)]
    Save(#[from] SaveError),
}

impl SubmitError {
    /// Identifiers left on the server by a failed attempt.
    pub fn orphaned(&self) -> &[String] {
        match self {
            SubmitError::Upload { orphaned, .. } => orphaned,
            _ => &[],
        }
    }
}
