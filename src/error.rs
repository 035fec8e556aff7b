//! Error types for media editing operations.

use thiserror::Error;

use crate::model::{BucketId, Lifecycle};

/// Errors raised by the bucket store, promotion and assembly.
///
/// Validation variants are user-facing: they reject a whole batch of selected
/// files and leave the store untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// A selected file exceeds the configured size ceiling
    #[error("'{name}' is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge {
        /// Filename of the rejected file
        name: String,
        /// Size of the file in bytes
        size: u64,
        /// Configured ceiling in bytes
        limit: u64,
    },

    /// A selected file does not declare an image MIME type
    #[error("'{name}' is not an image (type '{mime}')")]
    NotAnImage {
        /// Filename of the rejected file
        name: String,
        /// The declared MIME type
        mime: String,
    },

    /// No files were selected
    #[error("No files selected")]
    EmptyBatch,

    /// A color bucket index with no matching color variant
    #[error("Unknown image bucket: {bucket}")]
    UnknownBucket {
        /// The bucket that was addressed
        bucket: BucketId,
    },

    /// A position past the end of a bucket's sub-order
    #[error("No {lifecycle} image at position {index} in {bucket}")]
    IndexOutOfRange {
        /// The bucket that was addressed
        bucket: BucketId,
        /// The sub-order that was addressed
        lifecycle: Lifecycle,
        /// The requested position
        index: usize,
    },

    /// The product's color list and the color buckets disagree
    #[error("Product has {record} color variants but {buckets} color image lists")]
    ColorCountMismatch {
        /// Colors in the product record
        record: usize,
        /// Color buckets in the store
        buckets: usize,
    },
}

impl MediaError {
    /// Create an out-of-range error.
    pub fn out_of_range(bucket: BucketId, lifecycle: Lifecycle, index: usize) -> Self {
        Self::IndexOutOfRange {
            bucket,
            lifecycle,
            index,
        }
    }

    /// Whether this error comes from validating selected files.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MediaError::FileTooLarge { .. } | MediaError::NotAnImage { .. } | MediaError::EmptyBatch
        )
    }
}
