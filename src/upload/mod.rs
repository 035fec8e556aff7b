//! Turning staged images into persisted ones at submit time.

mod pipeline;

pub use pipeline::{PhaseOutcome, PipelineFailure, UploadPipeline, UploadReport};
