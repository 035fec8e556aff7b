//! The single entry point for submitting an edited product.

use mediastage_net::MediaUploader;

use super::{ProductSaver, SubmitError, assemble};
use crate::config::OrphanPolicy;
use crate::model::ProductRecord;
use crate::state::BucketStore;
use crate::upload::{PipelineFailure, UploadPipeline, UploadReport};

/// Where a submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Editing,
    Validating,
    Uploading,
    Assembling,
    Done,
    Failed,
}

impl SubmitPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SubmitPhase::Editing => "editing",
            SubmitPhase::Validating => "validating",
            SubmitPhase::Uploading => "uploading",
            SubmitPhase::Assembling => "assembling",
            SubmitPhase::Done => "done",
            SubmitPhase::Failed => "failed",
        }
    }
}

/// Runs validation, upload, assembly and save for one product.
#[derive(Debug, Default)]
pub struct SubmissionCoordinator {
    phase: SubmitPhase,
    orphan_policy: OrphanPolicy,
}

impl SubmissionCoordinator {
    pub fn new(orphan_policy: OrphanPolicy) -> Self {
        Self {
            phase: SubmitPhase::Editing,
            orphan_policy,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        self.orphan_policy
    }

    fn enter(&mut self, phase: SubmitPhase) {
        log::debug!("Submission {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
    }

    /// Submit the product.
    ///
    /// The upload runs against a snapshot of `store`. Only when every bucket
    /// uploaded does the snapshot replace `store` and the assembled record get
    /// written to `record` and handed to `saver`. After any failure the
    /// coordinator is back in [`SubmitPhase::Editing`] so the user can retry.
    pub async fn submit<U, S>(
        &mut self,
        store: &mut BucketStore,
        record: &mut ProductRecord,
        uploader: &U,
        saver: &S,
    ) -> Result<UploadReport, SubmitError>
    where
        U: MediaUploader + ?Sized,
        S: ProductSaver + ?Sized,
    {
        self.enter(SubmitPhase::Validating);
        if !store.has_main() {
            log::warn!("Submission rejected: no main image");
            self.enter(SubmitPhase::Editing);
            return Err(SubmitError::MissingMainImage);
        }
        if record.variants.colors.len() != store.color_count() {
            let err = crate::error::MediaError::ColorCountMismatch {
                record: record.variants.colors.len(),
                buckets: store.color_count(),
            };
            log::warn!("Submission rejected: {}", err);
            self.enter(SubmitPhase::Editing);
            return Err(err.into());
        }

        self.enter(SubmitPhase::Uploading);
        let mut snapshot = store.clone();
        let report = match UploadPipeline::new(uploader).run(&mut snapshot).await {
            Ok(report) => report,
            Err(failure) => {
                drop(snapshot);
                let err = self.fail(failure, uploader).await;
                return Err(err);
            }
        };

        self.enter(SubmitPhase::Assembling);
        *store = snapshot;
        let mut assembled = record.clone();
        if let Err(err) = assemble(store, &mut assembled) {
            self.enter(SubmitPhase::Editing);
            return Err(err.into());
        }
        *record = assembled.clone();

        if let Err(err) = saver.save(assembled).await {
            log::error!("❌ {}", err);
            self.enter(SubmitPhase::Editing);
            return Err(err.into());
        }

        self.enter(SubmitPhase::Done);
        log::info!(
            "✅ Submitted product with {} new image(s)",
            report.uploaded_count()
        );
        Ok(report)
    }

    async fn fail<U>(&mut self, failure: PipelineFailure, uploader: &U) -> SubmitError
    where
        U: MediaUploader + ?Sized,
    {
        self.enter(SubmitPhase::Failed);
        let orphaned = failure.completed.uploaded_ids();

        if !orphaned.is_empty() {
            match self.orphan_policy {
                OrphanPolicy::Discard => {
                    log::info!("🗑️ Discarding {} orphaned upload(s)", orphaned.len());
                    if let Err(e) = uploader.discard(&orphaned).await {
                        log::warn!("Failed to discard orphaned uploads: {}", e);
                    }
                }
                OrphanPolicy::Retain => {
                    log::warn!(
                        "{} upload(s) from this attempt are orphaned: {:?}",
                        orphaned.len(),
                        orphaned
                    );
                }
            }
        }

        self.enter(SubmitPhase::Editing);
        SubmitError::Upload {
            bucket: failure.bucket,
            source: failure.source,
            orphaned,
        }
    }
}
