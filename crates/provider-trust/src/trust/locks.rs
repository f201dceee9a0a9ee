use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::ProfileId;

/// Per-profile mutual exclusion for load → compute → write pipelines.
///
/// Slots are created on demand and dropped once no caller holds or waits on them.
#[derive(Debug, Default)]
pub(crate) struct ProfileLocks {
    slots: Mutex<HashMap<ProfileId, Arc<Mutex<()>>>>,
}

impl ProfileLocks {
    pub(crate) fn with_profile<T>(&self, id: &ProfileId, work: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(id.clone()).or_default())
        };

        let release = SlotRelease {
            locks: self,
            id,
            slot,
        };
        let _held = release.slot.lock().unwrap_or_else(PoisonError::into_inner);
        work()
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Drops the profile's slot from the map on scope exit, unwinding included, once no other
/// caller holds or waits on it.
struct SlotRelease<'a> {
    locks: &'a ProfileLocks,
    id: &'a ProfileId,
    slot: Arc<Mutex<()>>,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        let mut slots = self
            .locks
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Only the map and this caller still reference the slot.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(self.id);
        }
    }
}
