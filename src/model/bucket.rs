//! Image buckets: the main slot, the gallery and one list per color variant.

use std::fmt;

use super::asset::{Lifecycle, LocalPayload, MediaAsset};

/// Identity of an image collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketId {
    /// The single main image
    Main,
    /// The product gallery
    Gallery,
    /// Images of the color variant at this index
    Color(usize),
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketId::Main => f.write_str("main"),
            BucketId::Gallery => f.write_str("gallery"),
            BucketId::Color(index) => write!(f, "color #{}", index),
        }
    }
}

/// A position inside one sub-order of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub bucket: BucketId,
    pub lifecycle: Lifecycle,
    pub index: usize,
}

impl Slot {
    pub fn new(bucket: BucketId, lifecycle: Lifecycle, index: usize) -> Self {
        Self {
            bucket,
            lifecycle,
            index,
        }
    }

    pub fn persisted(bucket: BucketId, index: usize) -> Self {
        Self::new(bucket, Lifecycle::Persisted, index)
    }

    pub fn staged(bucket: BucketId, index: usize) -> Self {
        Self::new(bucket, Lifecycle::Staged, index)
    }
}

/// An ordered image list with a lifecycle tag per position.
///
/// Persisted assets always form a prefix and staged assets the suffix, so the
/// stored order is the submission order. Positions are addressed per
/// sub-order: `(Staged, 0)` is the first staged asset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bucket {
    assets: Vec<MediaAsset>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bucket holding only persisted identifiers, in order.
    pub fn from_remote_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: ids.into_iter().map(MediaAsset::persisted).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn persisted_len(&self) -> usize {
        self.assets
            .iter()
            .take_while(|a| a.lifecycle() == Lifecycle::Persisted)
            .count()
    }

    pub fn staged_len(&self) -> usize {
        self.assets.len() - self.persisted_len()
    }

    /// Length of one sub-order.
    pub fn len_of(&self, lifecycle: Lifecycle) -> usize {
        match lifecycle {
            Lifecycle::Persisted => self.persisted_len(),
            Lifecycle::Staged => self.staged_len(),
        }
    }

    /// Offset of a sub-order inside the flat list.
    fn offset(&self, lifecycle: Lifecycle) -> usize {
        match lifecycle {
            Lifecycle::Persisted => 0,
            Lifecycle::Staged => self.persisted_len(),
        }
    }

    fn position(&self, lifecycle: Lifecycle, index: usize) -> Option<usize> {
        (index < self.len_of(lifecycle)).then(|| self.offset(lifecycle) + index)
    }

    pub fn get(&self, lifecycle: Lifecycle, index: usize) -> Option<&MediaAsset> {
        self.position(lifecycle, index)
            .and_then(|pos| self.assets.get(pos))
    }

    /// First asset in submission order.
    pub fn first(&self) -> Option<&MediaAsset> {
        self.assets.first()
    }

    /// All assets in submission order (persisted first, then staged).
    pub fn iter(&self) -> impl Iterator<Item = &MediaAsset> {
        self.assets.iter()
    }

    pub fn remote_ids(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().filter_map(MediaAsset::remote_id)
    }

    pub fn staged(&self) -> impl Iterator<Item = &LocalPayload> {
        self.assets.iter().filter_map(MediaAsset::payload)
    }

    /// Append to the end of the asset's own sub-order.
    pub fn push(&mut self, asset: MediaAsset) {
        let at = match asset.lifecycle() {
            Lifecycle::Persisted => self.persisted_len(),
            Lifecycle::Staged => self.assets.len(),
        };
        self.assets.insert(at, asset);
    }

    /// Insert at the head of the asset's own sub-order.
    pub fn push_front(&mut self, asset: MediaAsset) {
        let at = self.offset(asset.lifecycle());
        self.assets.insert(at, asset);
    }

    /// Remove and return the asset at a sub-order position.
    pub fn take(&mut self, lifecycle: Lifecycle, index: usize) -> Option<MediaAsset> {
        let pos = self.position(lifecycle, index)?;
        Some(self.assets.remove(pos))
    }

    /// Move an asset within its sub-order. Returns false if either index is
    /// out of range.
    pub fn move_within(&mut self, lifecycle: Lifecycle, from: usize, to: usize) -> bool {
        let (Some(from_pos), Some(to_pos)) = (
            self.position(lifecycle, from),
            self.position(lifecycle, to),
        ) else {
            return false;
        };
        let asset = self.assets.remove(from_pos);
        self.assets.insert(to_pos, asset);
        true
    }

    /// Remove every staged asset, returning them in order.
    pub fn take_staged(&mut self) -> Vec<LocalPayload> {
        let offset = self.persisted_len();
        self.assets
            .drain(offset..)
            .filter_map(|asset| match asset {
                MediaAsset::Staged(payload) => Some(payload),
                MediaAsset::Persisted { .. } => None,
            })
            .collect()
    }

    /// Remove every asset.
    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PreviewRegistry, SelectedFile};

    fn staged(registry: &PreviewRegistry, name: &str) -> MediaAsset {
        MediaAsset::Staged(LocalPayload::stage(
            SelectedFile::new(name, "image/png", vec![0u8; 4]),
            registry,
        ))
    }

    fn names(bucket: &Bucket) -> Vec<String> {
        bucket
            .iter()
            .map(|a| match a {
                MediaAsset::Persisted { remote_id } => remote_id.clone(),
                MediaAsset::Staged(p) => p.name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_push_keeps_persisted_prefix() {
        let registry = PreviewRegistry::new();
        let mut bucket = Bucket::new();
        bucket.push(staged(&registry, "s1.png"));
        bucket.push(MediaAsset::persisted("p1"));
        bucket.push(staged(&registry, "s2.png"));
        bucket.push(MediaAsset::persisted("p2"));

        assert_eq!(names(&bucket), vec!["p1", "p2", "s1.png", "s2.png"]);
        assert_eq!(bucket.persisted_len(), 2);
        assert_eq!(bucket.staged_len(), 2);
    }

    #[test]
    fn test_push_front_per_sub_order() {
        let registry = PreviewRegistry::new();
        let mut bucket = Bucket::from_remote_ids(["p1", "p2"]);
        bucket.push(staged(&registry, "s1.png"));
        bucket.push_front(staged(&registry, "s0.png"));
        bucket.push_front(MediaAsset::persisted("p0"));

        assert_eq!(names(&bucket), vec!["p0", "p1", "p2", "s0.png", "s1.png"]);
    }

    #[test]
    fn test_sub_order_addressing() {
        let registry = PreviewRegistry::new();
        let mut bucket = Bucket::from_remote_ids(["p1", "p2"]);
        bucket.push(staged(&registry, "s1.png"));

        assert_eq!(bucket.get(Lifecycle::Persisted, 1).and_then(|a| a.remote_id()), Some("p2"));
        assert_eq!(
            bucket.get(Lifecycle::Staged, 0).and_then(|a| a.payload()).map(|p| p.name()),
            Some("s1.png")
        );
        assert!(bucket.get(Lifecycle::Persisted, 2).is_none());
        assert!(bucket.get(Lifecycle::Staged, 1).is_none());
    }

    #[test]
    fn test_move_within_stays_in_sub_order() {
        let registry = PreviewRegistry::new();
        let mut bucket = Bucket::from_remote_ids(["p1", "p2", "p3"]);
        bucket.push(staged(&registry, "s1.png"));
        bucket.push(staged(&registry, "s2.png"));

        assert!(bucket.move_within(Lifecycle::Persisted, 0, 2));
        assert!(bucket.move_within(Lifecycle::Staged, 1, 0));
        assert_eq!(names(&bucket), vec!["p2", "p3", "p1", "s2.png", "s1.png"]);

        assert!(!bucket.move_within(Lifecycle::Staged, 0, 2));
        assert_eq!(names(&bucket), vec!["p2", "p3", "p1", "s2.png", "s1.png"]);
    }

    #[test]
    fn test_take_staged_drains_suffix() {
        let registry = PreviewRegistry::new();
        let mut bucket = Bucket::from_remote_ids(["p1"]);
        bucket.push(staged(&registry, "s1.png"));
        bucket.push(staged(&registry, "s2.png"));

        let taken = bucket.take_staged();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].name(), "s1.png");
        assert_eq!(names(&bucket), vec!["p1"]);

        drop(taken);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_bucket_display() {
        assert_eq!(BucketId::Main.to_string(), "main");
        assert_eq!(BucketId::Gallery.to_string(), "gallery");
        assert_eq!(BucketId::Color(2).to_string(), "color #2");
    }
}
