use crate::error::MediaError;
use crate::model::{BucketId, ProductRecord};
use crate::state::BucketStore;

/// Write the store's persisted identifiers into the record's media fields.
///
/// Only persisted assets are written, in submission order. The record must
/// have one color variant per color bucket.
pub fn assemble(store: &BucketStore, record: &mut ProductRecord) -> Result<(), MediaError> {
    let colors = record.variants.colors.len();
    if colors != store.color_count() {
        return Err(MediaError::ColorCountMismatch {
            record: colors,
            buckets: store.color_count(),
        });
    }

    record.image = store.main().and_then(|a| a.remote_id()).map(str::to_string);
    record.images = ids_of(store, BucketId::Gallery)?;
    for (index, color) in record.variants.colors.iter_mut().enumerate() {
        color.images = ids_of(store, BucketId::Color(index))?;
    }
    Ok(())
}

fn ids_of(store: &BucketStore, bucket: BucketId) -> Result<Vec<String>, MediaError> {
    Ok(store
        .bucket(bucket)?
        .remote_ids()
        .map(str::to_string)
        .collect())
}
