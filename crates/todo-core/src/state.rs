//! Shared busy-state types surfaced to the UI.

use std::sync::atomic::{AtomicU32, Ordering};

/// Category of list operation, used to disable conflicting controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BusyCategory {
    Fetching,
    Adding,
    Deleting,
    Updating,
}

/// Snapshot of which operation categories are in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct BusyFlags {
    pub fetching: bool,
    pub adding: bool,
    pub deleting: bool,
    pub updating: bool,
}

/// In-flight counters per category.
///
/// Concurrent calls of the same category are allowed; the category reads as
/// busy until the last one settles.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    fetching: AtomicU32,
    adding: AtomicU32,
    deleting: AtomicU32,
    updating: AtomicU32,
}

impl InFlight {
    const fn slot(&self, category: BusyCategory) -> &AtomicU32 {
        match category {
            BusyCategory::Fetching => &self.fetching,
            BusyCategory::Adding => &self.adding,
            BusyCategory::Deleting => &self.deleting,
            BusyCategory::Updating => &self.updating,
        }
    }

    /// Mark `category` busy until the returned guard is dropped.
    pub(crate) fn enter(&self, category: BusyCategory) -> InFlightGuard<'_> {
        self.slot(category).fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            counters: self,
            category,
        }
    }

    fn leave(&self, category: BusyCategory) {
        let _ = self
            .slot(category)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            });
    }

    pub(crate) fn flags(&self) -> BusyFlags {
        let busy = |category| self.slot(category).load(Ordering::SeqCst) > 0;
        BusyFlags {
            fetching: busy(BusyCategory::Fetching),
            adding: busy(BusyCategory::Adding),
            deleting: busy(BusyCategory::Deleting),
            updating: busy(BusyCategory::Updating),
        }
    }
}

/// Ends one in-flight call on drop, including when its future is cancelled
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    counters: &'a InFlight,
    category: BusyCategory,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counters.leave(self.category);
    }
}

impl BusyFlags {
    #[must_use]
    pub const fn is_busy(&self, category: BusyCategory) -> bool {
        match category {
            BusyCategory::Fetching => self.fetching,
            BusyCategory::Adding => self.adding,
            BusyCategory::Deleting => self.deleting,
            BusyCategory::Updating => self.updating,
        }
    }
}
