//! Promotion of an image into the main slot.

use super::store::BucketStore;
use crate::error::MediaError;
use crate::model::{BucketId, Lifecycle};

impl BucketStore {
    /// Make the asset at a position the main image.
    ///
    /// The previous main image, if any, moves to the head of the gallery
    /// sub-order matching its own lifecycle. Promoting the main image itself
    /// does nothing.
    pub fn promote(
        &mut self,
        bucket: BucketId,
        lifecycle: Lifecycle,
        index: usize,
    ) -> Result<(), MediaError> {
        if bucket == BucketId::Main {
            return match self.bucket(bucket)?.get(lifecycle, index) {
                Some(_) => Ok(()),
                None => Err(MediaError::out_of_range(bucket, lifecycle, index)),
            };
        }

        let promoted = self
            .bucket_mut(bucket)?
            .take(lifecycle, index)
            .ok_or_else(|| MediaError::out_of_range(bucket, lifecycle, index))?;

        let main = self.bucket_mut(BucketId::Main)?;
        let previous = main
            .take(Lifecycle::Persisted, 0)
            .or_else(|| main.take(Lifecycle::Staged, 0));
        main.push(promoted);

        if let Some(previous) = previous {
            log::debug!(
                "⭐ Promoted {} image {} from {}, previous {} main moved to gallery",
                lifecycle,
                index,
                bucket,
                previous.lifecycle()
            );
            self.bucket_mut(BucketId::Gallery)?.push_front(previous);
        } else {
            log::debug!("⭐ Promoted {} image {} from {}", lifecycle, index, bucket);
        }
        Ok(())
    }
}
