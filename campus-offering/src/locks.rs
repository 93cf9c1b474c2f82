//! Per-instructor critical sections
//!
//! The availability check reads existing schedules and then writes. Holding
//! the lock for a (semester registration, faculty) pair across both keeps two
//! requests for the same instructor from passing the check together.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type Key = (Uuid, Uuid);

#[derive(Default)]
pub struct ScheduleLocks {
    slots: Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>,
}

impl ScheduleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an instructor's schedule
    pub async fn acquire(&self, semester_registration: Uuid, faculty: Uuid) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Drop slots nobody holds or waits on
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots
                .entry((semester_registration, faculty))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        slot.lock_owned().await
    }

    /// Number of slots currently tracked
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
