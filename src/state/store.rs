//! The bucket store: every image of the product being edited.

use crate::constants::IMAGE_MIME_PREFIX;
use crate::error::MediaError;
use crate::model::{
    Bucket, BucketId, Lifecycle, LocalPayload, MediaAsset, PreviewRegistry, ProductRecord,
    SelectedFile, Slot,
};

/// Check a batch of selected files against the size ceiling and the image
/// MIME rule. Stops at the first violation.
pub fn validate_batch(files: &[SelectedFile], max_file_size: u64) -> Result<(), MediaError> {
    if files.is_empty() {
        return Err(MediaError::EmptyBatch);
    }

    for file in files {
        if file.size() > max_file_size {
            return Err(MediaError::FileTooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit: max_file_size,
            });
        }
        if !file.mime.starts_with(IMAGE_MIME_PREFIX) {
            return Err(MediaError::NotAnImage {
                name: file.name.clone(),
                mime: file.mime.clone(),
            });
        }
    }

    Ok(())
}

/// Main slot, gallery and per-color image lists of one product.
///
/// Cloning is cheap: payload bytes and preview leases are shared, so a clone
/// works as a snapshot that can be consumed without touching the original.
#[derive(Clone, Debug)]
pub struct BucketStore {
    main: Bucket,
    gallery: Bucket,
    colors: Vec<Bucket>,
    registry: PreviewRegistry,
    max_file_size: u64,
}

impl BucketStore {
    /// Create an empty store for a new product.
    pub fn new(registry: PreviewRegistry, max_file_size: u64) -> Self {
        Self {
            main: Bucket::new(),
            gallery: Bucket::new(),
            colors: Vec::new(),
            registry,
            max_file_size,
        }
    }

    /// Create a store holding the persisted images of an existing product.
    pub fn from_record(record: &ProductRecord, registry: PreviewRegistry, max_file_size: u64) -> Self {
        let colors: Vec<Bucket> = record
            .variants
            .colors
            .iter()
            .map(|color| Bucket::from_remote_ids(color.images.iter().cloned()))
            .collect();

        log::debug!(
            "Loaded media: main={}, gallery={}, {} color list(s)",
            record.image.is_some(),
            record.images.len(),
            colors.len()
        );

        Self {
            main: Bucket::from_remote_ids(record.image.iter().cloned()),
            gallery: Bucket::from_remote_ids(record.images.iter().cloned()),
            colors,
            registry,
            max_file_size,
        }
    }

    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    pub fn bucket(&self, id: BucketId) -> Result<&Bucket, MediaError> {
        match id {
            BucketId::Main => Ok(&self.main),
            BucketId::Gallery => Ok(&self.gallery),
            BucketId::Color(index) => self
                .colors
                .get(index)
                .ok_or(MediaError::UnknownBucket { bucket: id }),
        }
    }

    pub(crate) fn bucket_mut(&mut self, id: BucketId) -> Result<&mut Bucket, MediaError> {
        match id {
            BucketId::Main => Ok(&mut self.main),
            BucketId::Gallery => Ok(&mut self.gallery),
            BucketId::Color(index) => self
                .colors
                .get_mut(index)
                .ok_or(MediaError::UnknownBucket { bucket: id }),
        }
    }

    /// The main image, persisted or staged.
    pub fn main(&self) -> Option<&MediaAsset> {
        self.main.first()
    }

    pub fn has_main(&self) -> bool {
        !self.main.is_empty()
    }

    pub fn gallery(&self) -> &Bucket {
        &self.gallery
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Bucket identities in upload order: main, gallery, then colors ascending.
    pub fn upload_order(&self) -> Vec<BucketId> {
        [BucketId::Main, BucketId::Gallery]
            .into_iter()
            .chain((0..self.colors.len()).map(BucketId::Color))
            .collect()
    }

    /// Assets of a bucket in the order they are submitted.
    pub fn submission_order(&self, id: BucketId) -> Result<Vec<&MediaAsset>, MediaError> {
        Ok(self.bucket(id)?.iter().collect())
    }

    /// Staged assets across all buckets.
    pub fn staged_count(&self) -> usize {
        self.all_buckets().map(Bucket::staged_len).sum()
    }

    /// Assets across all buckets.
    pub fn total_count(&self) -> usize {
        self.all_buckets().map(Bucket::len).sum()
    }

    fn all_buckets(&self) -> impl Iterator<Item = &Bucket> {
        [&self.main, &self.gallery].into_iter().chain(self.colors.iter())
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Validate and stage a batch of selected files.
    ///
    /// The whole batch is rejected on the first invalid file. Files aimed at the
    /// main slot or the gallery fill an empty main slot first and go to the
    /// gallery otherwise. Returns where each file landed, in selection order.
    pub fn add_staged(
        &mut self,
        target: BucketId,
        files: Vec<SelectedFile>,
    ) -> Result<Vec<Slot>, MediaError> {
        validate_batch(&files, self.max_file_size)?;
        // Resolve color targets before anything is staged.
        self.bucket(target)?;

        let count = files.len();
        let mut slots = Vec::with_capacity(count);
        for file in files {
            let destination = match target {
                BucketId::Main | BucketId::Gallery if !self.has_main() => BucketId::Main,
                BucketId::Main | BucketId::Gallery => BucketId::Gallery,
                BucketId::Color(_) => target,
            };
            let payload = LocalPayload::stage(file, &self.registry);
            let bucket = self.bucket_mut(destination)?;
            bucket.push(MediaAsset::Staged(payload));
            slots.push(Slot::staged(destination, bucket.staged_len() - 1));
        }

        log::info!("📎 Staged {} image(s) for {}", count, target);
        Ok(slots)
    }

    /// Delete the asset at a position. A staged asset's preview is released.
    pub fn remove(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        index: usize,
    ) -> Result<(), MediaError> {
        let removed = self
            .bucket_mut(bucket)?
            .take(lifecycle, index)
            .ok_or_else(|| MediaError::out_of_range(bucket, lifecycle, index))?;
        log::debug!("Removed {} image {} from {}", lifecycle, index, bucket);
        drop(removed);
        Ok(())
    }

    /// Move an asset within one sub-order of one bucket.
    pub fn reorder(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        from: usize,
        to: usize,
    ) -> Result<(), MediaError> {
        let target = self.bucket_mut(bucket)?;
        let len = target.len_of(lifecycle);
        if from >= len {
            return Err(MediaError::out_of_range(bucket, lifecycle, from));
        }
        if to >= len {
            return Err(MediaError::out_of_range(bucket, lifecycle, to));
        }
        if from != to {
            target.move_within(lifecycle, from, to);
            log::debug!("↕️ Reordered {} {} image {} -> {}", bucket, lifecycle, from, to);
        }
        Ok(())
    }

    /// Delete the main image and refill the slot from the head of the gallery
    /// sub-order with the same lifecycle, if there is one.
    pub fn remove_main_with_backfill(&mut self) -> Result<(), MediaError> {
        let removed = self
            .main
            .take(Lifecycle::Persisted, 0)
            .or_else(|| self.main.take(Lifecycle::Staged, 0))
            .ok_or_else(|| MediaError::out_of_range(BucketId::Main, Lifecycle::Persisted, 0))?;

        let lifecycle = removed.lifecycle();
        drop(removed);

        if let Some(next) = self.gallery.take(lifecycle, 0) {
            log::debug!("Main image removed, promoted next {} gallery image", lifecycle);
            self.main.push(next);
        }
        Ok(())
    }

    /// Add an empty image list for a newly added color variant.
    pub fn add_color(&mut self) -> BucketId {
        self.colors.push(Bucket::new());
        BucketId::Color(self.colors.len() - 1)
    }

    /// Drop the image list of a removed color variant.
    ///
    /// Lists of later colors shift down by one so each stays bound to its
    /// variant.
    pub fn remove_color(&mut self, index: usize) -> Result<(), MediaError> {
        if index >= self.colors.len() {
            return Err(MediaError::UnknownBucket {
                bucket: BucketId::Color(index),
            });
        }
        let removed = self.colors.remove(index);
        log::debug!(
            "Removed color #{} with {} image(s)",
            index,
            removed.len()
        );
        Ok(())
    }

    /// Drop every asset, releasing all previews this store holds.
    ///
    /// Returns the number of staged assets that were released.
    pub fn clear(&mut self) -> usize {
        let staged = self.staged_count();
        self.main.clear();
        self.gallery.clear();
        self.colors.clear();
        staged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_FILE_SIZE;
    use crate::test_util::{labels, png, store_with_colors};

    fn empty_store() -> BucketStore {
        BucketStore::new(PreviewRegistry::new(), DEFAULT_MAX_FILE_SIZE)
    }

    #[test]
    fn test_first_file_becomes_main() {
        let mut store = empty_store();
        let slots = store
            .add_staged(BucketId::Gallery, vec![png("a.png"), png("b.png"), png("c.png")])
            .unwrap();

        assert_eq!(
            slots,
            vec![
                Slot::staged(BucketId::Main, 0),
                Slot::staged(BucketId::Gallery, 0),
                Slot::staged(BucketId::Gallery, 1),
            ]
        );
        assert_eq!(labels(&store, BucketId::Main), vec!["a.png"]);
        assert_eq!(labels(&store, BucketId::Gallery), vec!["b.png", "c.png"]);
        assert_eq!(store.registry().live_count(), 3);
    }

    #[test]
    fn test_main_target_with_existing_main_goes_to_gallery() {
        let mut record = ProductRecord::default();
        record.image = Some("/uploads/main.jpg".to_string());
        let mut store = BucketStore::from_record(&record, PreviewRegistry::new(), DEFAULT_MAX_FILE_SIZE);

        store.add_staged(BucketId::Main, vec![png("new.png")]).unwrap();

        assert_eq!(labels(&store, BucketId::Main), vec!["/uploads/main.jpg"]);
        assert_eq!(labels(&store, BucketId::Gallery), vec!["new.png"]);
    }

    #[test]
    fn test_color_target_never_diverts() {
        let mut store = store_with_colors(2);
        store
            .add_staged(BucketId::Color(1), vec![png("red1.png"), png("red2.png")])
            .unwrap();

        assert!(!store.has_main());
        assert_eq!(labels(&store, BucketId::Color(1)), vec!["red1.png", "red2.png"]);
        assert!(labels(&store, BucketId::Color(0)).is_empty());
    }

    #[test]
    fn test_invalid_batch_is_rejected_whole() {
        let mut store = empty_store();
        let files = vec![
            png("ok.png"),
            SelectedFile::new("notes.pdf", "application/pdf", vec![0u8; 4]),
        ];

        let err = store.add_staged(BucketId::Gallery, files).unwrap_err();

        assert!(matches!(err, MediaError::NotAnImage { ref name, .. } if name == "notes.pdf"));
        assert!(err.is_validation());
        assert_eq!(store.total_count(), 0);
        assert_eq!(store.registry().live_count(), 0);
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let mut store = BucketStore::new(PreviewRegistry::new(), 8);
        let err = store
            .add_staged(BucketId::Gallery, vec![png("big.png")])
            .unwrap_err();

        assert_eq!(
            err,
            MediaError::FileTooLarge {
                name: "big.png".to_string(),
                size: 16,
                limit: 8
            }
        );
    }

    #[test]
    fn test_file_at_limit_is_accepted() {
        let mut store = BucketStore::new(PreviewRegistry::new(), 16);
        assert!(store.add_staged(BucketId::Gallery, vec![png("edge.png")]).is_ok());
    }

    #[test]
    fn test_unknown_color_target() {
        let mut store = store_with_colors(1);
        let err = store.add_staged(BucketId::Color(3), vec![png("x.png")]).unwrap_err();
        assert_eq!(
            err,
            MediaError::UnknownBucket {
                bucket: BucketId::Color(3)
            }
        );
        assert_eq!(store.registry().live_count(), 0);
    }

    #[test]
    fn test_remove_releases_preview() {
        let mut store = empty_store();
        store
            .add_staged(BucketId::Gallery, vec![png("a.png"), png("b.png")])
            .unwrap();
        assert_eq!(store.registry().live_count(), 2);

        store.remove(BucketId::Gallery, Lifecycle::Staged, 0).unwrap();

        assert!(labels(&store, BucketId::Gallery).is_empty());
        assert_eq!(store.registry().live_count(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut store = empty_store();
        let err = store
            .remove(BucketId::Gallery, Lifecycle::Persisted, 0)
            .unwrap_err();
        assert_eq!(
            err,
            MediaError::out_of_range(BucketId::Gallery, Lifecycle::Persisted, 0)
        );
    }

    #[test]
    fn test_reorder_keeps_persisted_first() {
        let mut record = ProductRecord::default();
        record.image = Some("m".to_string());
        record.images = vec!["p1".to_string(), "p2".to_string()];
        let mut store = BucketStore::from_record(&record, PreviewRegistry::new(), DEFAULT_MAX_FILE_SIZE);
        store
            .add_staged(BucketId::Gallery, vec![png("s1.png"), png("s2.png")])
            .unwrap();

        store.reorder(BucketId::Gallery, Lifecycle::Staged, 0, 1).unwrap();
        store.reorder(BucketId::Gallery, Lifecycle::Persisted, 1, 0).unwrap();

        assert_eq!(
            labels(&store, BucketId::Gallery),
            vec!["p2", "p1", "s2.png", "s1.png"]
        );
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let mut store = empty_store();
        store
            .add_staged(BucketId::Gallery, vec![png("m.png"), png("a.png")])
            .unwrap();

        let err = store
            .reorder(BucketId::Gallery, Lifecycle::Staged, 0, 1)
            .unwrap_err();
        assert_eq!(
            err,
            MediaError::out_of_range(BucketId::Gallery, Lifecycle::Staged, 1)
        );
    }

    #[test]
    fn test_remove_main_backfills_same_lifecycle() {
        let mut store = empty_store();
        store
            .add_staged(BucketId::Gallery, vec![png("m.png"), png("g1.png"), png("g2.png")])
            .unwrap();

        store.remove_main_with_backfill().unwrap();

        assert_eq!(labels(&store, BucketId::Main), vec!["g1.png"]);
        assert_eq!(labels(&store, BucketId::Gallery), vec!["g2.png"]);
        assert_eq!(store.registry().live_count(), 2);
    }

    #[test]
    fn test_remove_persisted_main_ignores_staged_gallery() {
        let mut record = ProductRecord::default();
        record.image = Some("m".to_string());
        let mut store = BucketStore::from_record(&record, PreviewRegistry::new(), DEFAULT_MAX_FILE_SIZE);
        store.add_staged(BucketId::Gallery, vec![png("g.png")]).unwrap();

        store.remove_main_with_backfill().unwrap();

        assert!(!store.has_main());
        assert_eq!(labels(&store, BucketId::Gallery), vec!["g.png"]);
    }

    #[test]
    fn test_remove_color_shifts_later_lists() {
        let mut store = store_with_colors(3);
        store.add_staged(BucketId::Color(0), vec![png("c0.png")]).unwrap();
        store.add_staged(BucketId::Color(2), vec![png("c2.png")]).unwrap();

        store.remove_color(1).unwrap();

        assert_eq!(store.color_count(), 2);
        assert_eq!(labels(&store, BucketId::Color(0)), vec!["c0.png"]);
        assert_eq!(labels(&store, BucketId::Color(1)), vec!["c2.png"]);
        assert!(store.remove_color(5).is_err());
    }

    #[test]
    fn test_upload_order() {
        let store = store_with_colors(2);
        assert_eq!(
            store.upload_order(),
            vec![
                BucketId::Main,
                BucketId::Gallery,
                BucketId::Color(0),
                BucketId::Color(1)
            ]
        );
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut store = store_with_colors(1);
        store
            .add_staged(BucketId::Gallery, vec![png("a.png"), png("b.png")])
            .unwrap();
        store.add_staged(BucketId::Color(0), vec![png("c.png")]).unwrap();

        assert_eq!(store.clear(), 3);
        assert_eq!(store.registry().live_count(), 0);
        assert_eq!(store.total_count(), 0);
    }
}
