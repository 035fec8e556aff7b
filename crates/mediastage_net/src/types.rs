use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

/// Multipart field name the product API expects every payload under.
pub const DEFAULT_FIELD_NAME: &str = "files";

/// One binary payload of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    /// Original filename, forwarded as the part's filename
    pub name: String,
    /// Declared MIME type, forwarded as the part's content type
    pub mime: String,
    /// Raw file contents
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }
}

/// Payloads submitted together in one request, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadBatch {
    /// Human-readable origin of the batch ("main", "gallery", "color #2")
    pub label: String,
    pub files: Vec<UploadFile>,
}

impl UploadBatch {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            files: Vec::new(),
        }
    }

    pub fn push(&mut self, file: UploadFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total payload size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes.len()).sum()
    }
}

/// Response of the upload endpoint.
///
/// `urls[i]` is the identifier assigned to the i-th submitted payload. A missing
/// list deserializes as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Where and how [`HttpUploader`](crate::HttpUploader) sends batches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    /// Upload endpoint (`POST`, multipart)
    pub endpoint: Url,
    /// Optional endpoint accepting `DELETE` with `{ "urls": [...] }`
    pub discard_endpoint: Option<Url>,
    /// Multipart field name for each payload
    pub field_name: String,
}

impl UploadOptions {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            discard_endpoint: None,
            field_name: DEFAULT_FIELD_NAME.to_string(),
        }
    }

    pub fn with_discard_endpoint(mut self, url: Url) -> Self {
        self.discard_endpoint = Some(url);
        self
    }

    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_urls_is_empty() {
        let response: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(response.urls.is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"urls":["/uploads/a.jpg"],"count":1}"#).unwrap();
        assert_eq!(response.urls, vec!["/uploads/a.jpg".to_string()]);
    }

    #[test]
    fn test_batch_total_bytes() {
        let mut batch = UploadBatch::new("gallery");
        batch.push(UploadFile::new("a.png", "image/png", vec![0u8; 3]));
        batch.push(UploadFile::new("b.png", "image/png", vec![0u8; 5]));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.total_bytes(), 8);
    }

    #[test]
    fn test_options_default_field_name() {
        let options = UploadOptions::new(Url::parse("http://localhost/upload").unwrap());
        assert_eq!(options.field_name, "files");
        assert!(options.discard_endpoint.is_none());
    }
}
