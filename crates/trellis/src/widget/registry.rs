//! At-most-one-open coordination between combobox instances.
//!
//! Every uncontrolled open goes through an [`OpenDropdownRegistry`]: opening
//! one combobox first closes whichever other combobox currently holds the
//! claim. The registry is an explicit, injectable object rather than a
//! process global, so tests (and hosts with independent widget trees) can
//! instantiate a fresh one per scope; sharing a single `Arc` across all
//! instances of an application restores the process-wide rule.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A unique identifier for a combobox controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboId(u64);

impl ComboId {
    /// Allocate the next instance id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The recorded holder: the instance id plus the procedure that performs its
/// full close transition. The procedure captures only weak handles to the
/// controller's shared state, so a torn-down holder closes as a no-op.
struct Holder {
    id: ComboId,
    close: Box<dyn Fn() + Send>,
}

/// Records which combobox instance currently has its dropdown open.
///
/// Pure bookkeeping: the only side effect is running the previous holder's
/// close procedure when a new instance claims the registry. That cascade is
/// synchronous and non-reentrant - the previous entry is removed before its
/// close procedure runs, so a `release` from inside the cascade is an
/// idempotent no-op, and closing never re-triggers an open.
#[derive(Default)]
pub struct OpenDropdownRegistry {
    holder: Mutex<Option<Holder>>,
}

impl OpenDropdownRegistry {
    /// Create a registry with no holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as the instance with the open dropdown.
    ///
    /// If a different instance currently holds the claim, its close
    /// procedure is invoked first, synchronously, before `id` is recorded.
    /// Claiming again as the current holder just replaces the stored close
    /// procedure.
    pub fn claim(&self, id: ComboId, close: Box<dyn Fn() + Send>) {
        let previous = {
            let mut holder = self.holder.lock();
            match holder.as_mut() {
                Some(entry) if entry.id == id => {
                    entry.close = close;
                    return;
                }
                _ => holder.take(),
            }
        };

        if let Some(previous) = previous {
            tracing::trace!(
                target: "trellis::registry",
                previous = ?previous.id,
                claimant = ?id,
                "closing previous holder"
            );
            (previous.close)();
        }

        *self.holder.lock() = Some(Holder { id, close });
        tracing::trace!(target: "trellis::registry", ?id, "claim recorded");
    }

    /// Clear the holder, but only if `id` is the current holder.
    ///
    /// Releasing when not the holder is an idempotent no-op.
    pub fn release(&self, id: ComboId) {
        let mut holder = self.holder.lock();
        if holder.as_ref().is_some_and(|entry| entry.id == id) {
            *holder = None;
            tracing::trace!(target: "trellis::registry", ?id, "claim released");
        }
    }

    /// The instance currently holding the claim, if any.
    pub fn holder(&self) -> Option<ComboId> {
        self.holder.lock().as_ref().map(|entry| entry.id)
    }
}

static_assertions::assert_impl_all!(OpenDropdownRegistry: Send, Sync);
