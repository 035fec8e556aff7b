//! Displayable references for locally held image payloads.
//!
//! A staged image is shown through a preview reference (the `blob:` URL of a
//! browser, a texture handle in a native shell). These references are a finite
//! resource, so the registry tracks which ones are still live and every
//! [`PreviewLease`] gives its reference back when the last holder drops it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::constants::PREVIEW_SCHEME;

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: AtomicU64,
    live: Mutex<BTreeSet<u64>>,
}

/// Issues preview references and keeps count of the ones still held.
#[derive(Clone, Debug, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a reference for a payload named `name`.
    ///
    /// The reference stays live until every clone of the returned lease is gone.
    pub fn acquire(&self, name: &str) -> PreviewLease {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.live.lock().insert(id);
        let reference = format!("{}/{}/{}", PREVIEW_SCHEME, id, name);
        log::trace!("Preview acquired: {}", reference);

        PreviewLease {
            inner: Arc::new(LeaseInner {
                id,
                reference,
                registry: Arc::downgrade(&self.inner),
            }),
        }
    }

    /// Number of references acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.live.lock().len()
    }

    /// Check whether the reference behind `lease` is still live.
    pub fn is_live(&self, lease: &PreviewLease) -> bool {
        self.inner.live.lock().contains(&lease.inner.id)
    }
}

struct LeaseInner {
    id: u64,
    reference: String,
    registry: Weak<RegistryInner>,
}

impl Drop for LeaseInner {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.live.lock().remove(&self.id);
            log::trace!("Preview released: {}", self.reference);
        }
    }
}

/// Shared handle on one preview reference.
///
/// Clones share the reference; it is released exactly once, when the last clone
/// is dropped or consumed by [`PreviewLease::release`].
#[derive(Clone)]
pub struct PreviewLease {
    inner: Arc<LeaseInner>,
}

impl PreviewLease {
    /// The displayable reference string.
    pub fn reference(&self) -> &str {
        &self.inner.reference
    }

    /// Give up this holder's share of the reference.
    pub fn release(self) {
        drop(self);
    }

    /// Number of holders currently sharing the reference.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl PartialEq for PreviewLease {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for PreviewLease {}

impl fmt::Debug for PreviewLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewLease")
            .field(&self.inner.reference)
            .finish()
    }
}
