//! The product media editor.
//!
//! [`MediaEditor`] is what an editing surface talks to: it owns the product
//! record, its images, the drag gesture and the submission state. Dropping or
//! closing the editor releases every preview it still holds.

use mediastage_net::MediaUploader;

use crate::config::MediaConfig;
use crate::error::MediaError;
use crate::model::{BucketId, ColorVariant, Lifecycle, PreviewRegistry, ProductRecord, SelectedFile, Slot};
use crate::state::{BucketStore, DragController, DropOutcome};
use crate::submit::{ProductSaver, SubmissionCoordinator, SubmitError, SubmitPhase};
use crate::upload::UploadReport;

pub struct MediaEditor {
    record: ProductRecord,
    store: BucketStore,
    drag: DragController,
    coordinator: SubmissionCoordinator,
    config: MediaConfig,
}

impl MediaEditor {
    /// Editor for a new product with no images.
    pub fn new(config: MediaConfig) -> Self {
        Self::load(ProductRecord::default(), config)
    }

    /// Editor for an existing product; all of its images start persisted.
    pub fn load(record: ProductRecord, config: MediaConfig) -> Self {
        let store = BucketStore::from_record(
            &record,
            PreviewRegistry::new(),
            config.limits.max_file_size,
        );
        log::info!(
            "📝 Editing {}",
            record.name().unwrap_or("new product")
        );
        Self {
            record,
            store,
            drag: DragController::new(),
            coordinator: SubmissionCoordinator::new(config.orphan_policy),
            config,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn record(&self) -> &ProductRecord {
        &self.record
    }

    pub fn store(&self) -> &BucketStore {
        &self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    pub fn phase(&self) -> SubmitPhase {
        self.coordinator.phase()
    }

    /// Preview references currently held by this editor.
    pub fn live_previews(&self) -> usize {
        self.store.registry().live_count()
    }

    // ========================================================================
    // Images
    // ========================================================================

    pub fn add_files(
        &mut self,
        target: BucketId,
        files: Vec<SelectedFile>,
    ) -> Result<Vec<Slot>, MediaError> {
        self.store.add_staged(target, files)
    }

    pub fn remove(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        index: usize,
    ) -> Result<(), MediaError> {
        self.drag.on_drag_end();
        self.store.remove(bucket, lifecycle, index)
    }

    /// Delete the main image, refilling the slot from the gallery.
    pub fn remove_main(&mut self) -> Result<(), MediaError> {
        self.drag.on_drag_end();
        self.store.remove_main_with_backfill()
    }

    pub fn reorder(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        from: usize,
        to: usize,
    ) -> Result<(), MediaError> {
        self.drag.on_drag_end();
        self.store.reorder(bucket, lifecycle, from, to)
    }

    pub fn promote(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        index: usize,
    ) -> Result<(), MediaError> {
        self.drag.on_drag_end();
        self.store.promote(bucket, lifecycle, index)
    }

    // ========================================================================
    // Colors
    // ========================================================================

    /// Add a color variant with an empty image list.
    pub fn add_color(&mut self, color: ColorVariant) -> BucketId {
        log::debug!("🎨 Added color '{}'", color.name);
        self.record.variants.colors.push(color);
        self.store.add_color()
    }

    /// Remove a color variant together with its images.
    pub fn remove_color(&mut self, index: usize) -> Result<ColorVariant, MediaError> {
        if index >= self.record.variants.colors.len() {
            return Err(MediaError::UnknownBucket {
                bucket: BucketId::Color(index),
            });
        }
        self.drag.on_drag_end();
        self.store.remove_color(index)?;
        Ok(self.record.variants.colors.remove(index))
    }

    // ========================================================================
    // Drag and drop
    // ========================================================================

    pub fn drag_start(&mut self, source: Slot) {
        self.drag.on_drag_start(source);
    }

    pub fn drag_over(&mut self, slot: Slot) {
        self.drag.on_drag_over(slot);
    }

    pub fn drag_leave(&mut self) {
        self.drag.on_drag_leave();
    }

    pub fn drop_on(&mut self, target: Slot) -> Result<DropOutcome, MediaError> {
        self.drag.on_drop(target, &mut self.store)
    }

    pub fn drag_end(&mut self) {
        self.drag.on_drag_end();
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Upload staged images and hand the assembled record to `saver`.
    pub async fn submit<U, S>(&mut self, uploader: &U, saver: &S) -> Result<UploadReport, SubmitError>
    where
        U: MediaUploader + ?Sized,
        S: ProductSaver + ?Sized,
    {
        self.drag.on_drag_end();
        self.coordinator
            .submit(&mut self.store, &mut self.record, uploader, saver)
            .await
    }

    /// Tear the editor down, returning the product record.
    ///
    /// Every preview still held is released.
    pub fn close(mut self) -> ProductRecord {
        let released = self.store.clear();
        if released > 0 {
            log::info!("Closed editor, released {} unsaved image(s)", released);
        }
        self.record
    }
}
