use async_trait::async_trait;
use reqwest::{
    Body, Client,
    multipart::{Form, Part},
};
use serde::Serialize;

use crate::{
    error::{UploadError, UploadResult},
    traits::MediaUploader,
    types::{UploadBatch, UploadOptions, UploadResponse},
};

#[derive(Serialize)]
struct DiscardRequest<'a> {
    urls: &'a [String],
}

/// [`MediaUploader`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpUploader {
    inner: Client,
    options: UploadOptions,
}

impl HttpUploader {
    /// # Errors
    ///
    /// Returns [`UploadError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(options: UploadOptions) -> UploadResult<Self> {
        let inner = Client::builder().build()?;
        Ok(Self { inner, options })
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    fn build_form(&self, batch: UploadBatch) -> UploadResult<Form> {
        let mut form = Form::new();
        for file in batch.files {
            let length = file.bytes.len() as u64;
            let part = Part::stream_with_length(Body::from(file.bytes), length)
                .file_name(file.name.clone())
                .mime_str(&file.mime)
                .map_err(|e| UploadError::InvalidPart {
                    name: file.name,
                    message: e.to_string(),
                })?;
            form = form.part(self.options.field_name.clone(), part);
        }
        Ok(form)
    }

    async fn ensure_success(resp: reqwest::Response) -> UploadResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let url = resp.url().to_string();
        let body = resp.text().await.ok().filter(|b| !b.is_empty());
        Err(UploadError::http_status(status.as_u16(), url, body))
    }
}

#[async_trait]
impl MediaUploader for HttpUploader {
    async fn upload(&self, batch: UploadBatch) -> UploadResult<UploadResponse> {
        log::debug!(
            "⬆️ Uploading {} file(s) ({} bytes) for {}",
            batch.len(),
            batch.total_bytes(),
            batch.label
        );

        let form = self.build_form(batch)?;
        let resp = self
            .inner
            .post(self.options.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let resp = Self::ensure_success(resp).await?;

        let body = resp.bytes().await?;
        serde_json::from_slice::<UploadResponse>(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))
    }

    async fn discard(&self, urls: &[String]) -> UploadResult<()> {
        let Some(endpoint) = self.options.discard_endpoint.clone() else {
            log::warn!(
                "No discard endpoint configured, {} uploaded image(s) stay on the server",
                urls.len()
            );
            return Ok(());
        };
        if urls.is_empty() {
            return Ok(());
        }

        let resp = self
            .inner
            .delete(endpoint)
            .json(&DiscardRequest { urls })
            .send()
            .await?;
        Self::ensure_success(resp).await?;
        log::info!("🗑️ Discarded {} orphaned upload(s)", urls.len());
        Ok(())
    }
}
