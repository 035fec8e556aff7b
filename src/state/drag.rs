//! Drag-and-drop reordering.
//!
//! A drag only ever reorders within one sub-order of one bucket. Drops across
//! buckets (including between two color lists) or across lifecycles are
//! ignored, which keeps persisted images ahead of staged ones without any
//! reconciliation.

use super::store::BucketStore;
use crate::error::MediaError;
use crate::model::Slot;

/// State of the drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: Slot,
        /// Slot under the pointer, for visual feedback only
        hover: Option<Slot>,
    },
}

/// What a drop did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The asset moved within its sub-order
    Reordered { from: usize, to: usize },
    /// Dropped on its own position
    Unchanged,
    /// Source and target belong to different buckets
    CrossBucket,
    /// Source and target have different lifecycles
    CrossLifecycle,
    /// Drop without a drag in progress
    NotDragging,
}

impl DropOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, DropOutcome::Reordered { .. })
    }
}

/// Apply a drop of `source` onto `target`.
pub fn commit(
    store: &mut BucketStore,
    source: Slot,
    target: Slot,
) -> Result<DropOutcome, MediaError> {
    if source.bucket != target.bucket {
        log::debug!("Ignored drop from {} onto {}", source.bucket, target.bucket);
        return Ok(DropOutcome::CrossBucket);
    }
    if source.lifecycle != target.lifecycle {
        log::debug!(
            "Ignored drop of {} image onto {} position in {}",
            source.lifecycle,
            target.lifecycle,
            source.bucket
        );
        return Ok(DropOutcome::CrossLifecycle);
    }

    store.reorder(source.bucket, source.lifecycle, source.index, target.index)?;
    if source.index == target.index {
        Ok(DropOutcome::Unchanged)
    } else {
        Ok(DropOutcome::Reordered {
            from: source.index,
            to: target.index,
        })
    }
}

/// Tracks one drag gesture at a time.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn source(&self) -> Option<Slot> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    pub fn hover(&self) -> Option<Slot> {
        match self.state {
            DragState::Dragging { hover, .. } => hover,
            DragState::Idle => None,
        }
    }

    /// Begin dragging the asset at `source`. Replaces any unfinished drag.
    pub fn on_drag_start(&mut self, source: Slot) {
        log::trace!("Drag start at {:?}", source);
        self.state = DragState::Dragging {
            source,
            hover: None,
        };
    }

    pub fn on_drag_over(&mut self, slot: Slot) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = Some(slot);
        }
    }

    pub fn on_drag_leave(&mut self) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = None;
        }
    }

    /// Drop onto `target`. The controller is idle afterwards whatever the
    /// outcome, including when the reorder fails.
    pub fn on_drop(
        &mut self,
        target: Slot,
        store: &mut BucketStore,
    ) -> Result<DropOutcome, MediaError> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Ok(DropOutcome::NotDragging),
            DragState::Dragging { source, .. } => commit(store, source, target),
        }
    }

    /// End the gesture without a drop.
    pub fn on_drag_end(&mut self) {
        self.state = DragState::Idle;
    }
}
