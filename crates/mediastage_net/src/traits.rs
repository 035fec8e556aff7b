use async_trait::async_trait;

use crate::error::UploadResult;
use crate::types::{UploadBatch, UploadResponse};

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Submit one batch and return the identifiers the server assigned.
    async fn upload(&self, batch: UploadBatch) -> UploadResult<UploadResponse>;

    /// Ask the server to drop identifiers that will never be referenced.
    ///
    /// Uploaders without a way to delete treat this as a no-op.
    async fn discard(&self, _urls: &[String]) -> UploadResult<()> {
        Ok(())
    }
}
