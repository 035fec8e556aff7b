//! Editing state: the bucket store and the operations acting on it.

mod drag;
mod promotion;
mod store;

pub use drag::{DragController, DragState, DropOutcome, commit};
pub use store::{BucketStore, validate_batch};
