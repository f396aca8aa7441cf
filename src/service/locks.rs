use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::PeriodKey;

/// One mutex per period, created on first use and dropped once idle.
#[derive(Debug, Default)]
pub(crate) struct PeriodLocks {
    locks: Mutex<HashMap<PeriodKey, Arc<Mutex<()>>>>,
}

impl PeriodLocks {
    /// Run `f` while holding the lock for `key`.
    pub(crate) fn with<R>(&self, key: &PeriodKey, f: impl FnOnce() -> R) -> R {
        let lock = Arc::clone(self.locks.lock().entry(key.clone()).or_default());
        let result = {
            let _guard = lock.lock();
            f()
        };

        // Handles are only cloned under the map lock, so a count of two
        // (map + ours) means no caller is waiting on this period.
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
        result
    }
}
