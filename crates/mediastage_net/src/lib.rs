//! Upload endpoint contract for staged product media.
//!
//! The [`MediaUploader`] trait is the seam between the in-process media pipeline
//! and the remote image store. [`HttpUploader`] implements it over HTTP by posting
//! every batch as one `multipart/form-data` request and reading back
//! `{ "urls": [...] }`.

#![forbid(unsafe_code)]

mod client;
mod error;
mod traits;
mod types;

pub use crate::{
    client::HttpUploader,
    error::{UploadError, UploadResult},
    traits::MediaUploader,
    types::{DEFAULT_FIELD_NAME, UploadBatch, UploadFile, UploadOptions, UploadResponse},
};
