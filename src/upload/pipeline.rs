//! Bucket-by-bucket upload of staged images.
//!
//! Phases run in a fixed order (main, gallery, then colors ascending), each
//! awaited before the next starts. The first failing phase stops the run.

use mediastage_net::{MediaUploader, UploadBatch, UploadError};

use crate::model::{BucketId, MediaAsset};
use crate::state::BucketStore;

/// Result of one successful phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub bucket: BucketId,
    /// Payloads sent in the batch
    pub submitted: usize,
    /// Identifiers merged into the bucket, in payload order
    pub urls: Vec<String>,
}

/// Phases completed by a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub phases: Vec<PhaseOutcome>,
}

impl UploadReport {
    /// Every identifier the server assigned during the run.
    pub fn uploaded_ids(&self) -> Vec<String> {
        self.phases
            .iter()
            .flat_map(|phase| phase.urls.iter().cloned())
            .collect()
    }

    pub fn uploaded_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.urls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// A phase failed; `completed` lists the phases that succeeded before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineFailure {
    pub bucket: BucketId,
    pub source: UploadError,
    pub completed: UploadReport,
}

/// Uploads the staged images of a store through a [`MediaUploader`].
pub struct UploadPipeline<'a, U: MediaUploader + ?Sized> {
    uploader: &'a U,
}

impl<'a, U: MediaUploader + ?Sized> UploadPipeline<'a, U> {
    pub fn new(uploader: &'a U) -> Self {
        Self { uploader }
    }

    /// Upload every bucket with staged images.
    ///
    /// On success each bucket's staged images are replaced by persisted ones
    /// appended after its existing persisted images, and their previews are
    /// dropped. On failure the failing bucket and every later one are left as
    /// they were; earlier buckets have already been converted.
    pub async fn run(&self, store: &mut BucketStore) -> Result<UploadReport, PipelineFailure> {
        let mut report = UploadReport::default();

        for bucket in store.upload_order() {
            let batch = match Self::batch_for(store, bucket) {
                Some(batch) => batch,
                None => continue,
            };
            let submitted = batch.len();
            log::info!(
                "⬆️ Uploading {} image(s) for {} ({} bytes)",
                submitted,
                bucket,
                batch.total_bytes()
            );

            let response = match self.uploader.upload(batch).await {
                Ok(response) => response,
                Err(source) => {
                    log::error!("❌ Upload for {} failed: {}", bucket, source);
                    return Err(PipelineFailure {
                        bucket,
                        source,
                        completed: report,
                    });
                }
            };

            let urls = Self::merge(store, bucket, submitted, response.urls);
            report.phases.push(PhaseOutcome {
                bucket,
                submitted,
                urls,
            });
        }

        log::info!(
            "✅ Upload finished: {} image(s) in {} phase(s)",
            report.uploaded_count(),
            report.phases.len()
        );
        Ok(report)
    }

    fn batch_for(store: &BucketStore, bucket: BucketId) -> Option<UploadBatch> {
        let source = store.bucket(bucket).ok()?;
        if source.staged_len() == 0 {
            return None;
        }
        let mut batch = UploadBatch::new(bucket.to_string());
        for payload in source.staged() {
            batch.push(payload.to_upload_file());
        }
        Some(batch)
    }

    /// Replace the bucket's staged images with the returned identifiers.
    fn merge(
        store: &mut BucketStore,
        bucket: BucketId,
        submitted: usize,
        mut urls: Vec<String>,
    ) -> Vec<String> {
        if urls.is_empty() {
            log::warn!(
                "Upload for {} returned no identifiers, {} staged image(s) dropped",
                bucket,
                submitted
            );
        } else if urls.len() != submitted {
            log::warn!(
                "Upload for {} returned {} identifier(s) for {} image(s)",
                bucket,
                urls.len(),
                submitted
            );
            urls.truncate(submitted);
        }

        let Ok(target) = store.bucket_mut(bucket) else {
            return Vec::new();
        };
        let consumed = target.take_staged();
        for url in &urls {
            target.push(MediaAsset::persisted(url.clone()));
        }
        log::debug!(
            "Merged {} identifier(s) into {}, released {} preview(s)",
            urls.len(),
            bucket,
            consumed.len()
        );
        urls
    }
}
