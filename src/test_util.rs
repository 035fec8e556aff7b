//! Shared helpers for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mediastage_net::{MediaUploader, UploadBatch, UploadError, UploadResponse, UploadResult};
use parking_lot::Mutex;

use crate::constants::DEFAULT_MAX_FILE_SIZE;
use crate::model::{BucketId, ColorVariant, MediaAsset, PreviewRegistry, ProductRecord, SelectedFile};
use crate::state::BucketStore;

pub fn png(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", vec![0u8; 16])
}

pub fn record_with_colors(colors: usize) -> ProductRecord {
    let mut record = ProductRecord::default();
    for i in 0..colors {
        record
            .variants
            .colors
            .push(ColorVariant::new(&format!("Color {}", i), "#000000"));
    }
    record
}

pub fn store_with_colors(colors: usize) -> BucketStore {
    BucketStore::from_record(
        &record_with_colors(colors),
        PreviewRegistry::new(),
        DEFAULT_MAX_FILE_SIZE,
    )
}

/// Remote ids and staged filenames of a bucket, in submission order.
pub fn labels(store: &BucketStore, id: BucketId) -> Vec<String> {
    store
        .submission_order(id)
        .unwrap()
        .into_iter()
        .map(|a| match a {
            MediaAsset::Persisted { remote_id } => remote_id.clone(),
            MediaAsset::Staged(p) => p.name().to_string(),
        })
        .collect()
}

/// In-memory uploader answering `/cdn/<n>-<filename>` for every file.
#[derive(Default)]
pub struct FakeUploader {
    /// Fail the batch with this 1-based call number
    pub fail_on_call: Option<usize>,
    calls: AtomicUsize,
    pub batches: Mutex<Vec<(String, Vec<String>)>>,
    pub discarded: Mutex<Vec<String>>,
}

impl FakeUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn labels(&self) -> Vec<String> {
        self.batches.lock().iter().map(|(l, _)| l.clone()).collect()
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, batch: UploadBatch) -> UploadResult<UploadResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let names: Vec<String> = batch.files.iter().map(|f| f.name.clone()).collect();
        self.batches.lock().push((batch.label.clone(), names.clone()));

        if self.fail_on_call == Some(call) {
            return Err(UploadError::http_status(500, "http://fake/upload", None));
        }

        Ok(UploadResponse {
            urls: names
                .iter()
                .map(|name| format!("/cdn/{}-{}", call, name))
                .collect(),
        })
    }

    async fn discard(&self, urls: &[String]) -> UploadResult<()> {
        self.discarded.lock().extend(urls.iter().cloned());
        Ok(())
    }
}
