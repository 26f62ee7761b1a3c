use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::domain::{SlotKey, TimeSlot, Travel, TravelDetails, TravelId, VolunteerId};

/// Failures raised by the store collaborator. The engine surfaces these as
/// a single "operation failed" outcome and never retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A travel document together with its primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRecord {
    pub id: TravelId,
    #[serde(flatten)]
    pub travel: Travel,
}

/// Partial-field merge for a travel document. `None` leaves a field as-is;
/// writes are last-write-wins with no conditional check.
#[derive(Debug, Clone, Default)]
pub struct TravelPatch {
    pub details: Option<TravelDetails>,
    pub volunteers: Option<Vec<VolunteerId>>,
    pub archived: Option<bool>,
    pub is_locked: Option<bool>,
}

impl TravelPatch {
    pub fn apply(self, travel: &mut Travel) {
        if let Some(details) = self.details {
            travel.details = details;
        }
        if let Some(volunteers) = self.volunteers {
            travel.volunteers = volunteers;
        }
        if let Some(archived) = self.archived {
            travel.archived = archived;
        }
        if let Some(is_locked) = self.is_locked {
            travel.is_locked = is_locked;
        }
    }
}

/// Storage abstraction so the allocation engine can be exercised in
/// isolation. All operations are fallible; change notification is a
/// restartable stream of full snapshots, never incremental diffs.
pub trait RosterStore: Send + Sync {
    fn time_slots(&self) -> Result<Vec<TimeSlot>, StoreError>;
    fn find_time_slot(&self, key: &SlotKey) -> Result<Option<TimeSlot>, StoreError>;
    fn insert_time_slot(&self, slot: TimeSlot) -> Result<(), StoreError>;
    /// Find-then-update through the compound key; `Err(NotFound)` when the
    /// document vanished between read and write.
    fn update_time_slot(&self, key: &SlotKey, slot: TimeSlot) -> Result<(), StoreError>;

    fn travels(&self) -> Result<Vec<TravelRecord>, StoreError>;
    fn travel(&self, id: &TravelId) -> Result<Option<Travel>, StoreError>;
    fn insert_travel(&self, travel: Travel) -> Result<TravelId, StoreError>;
    fn merge_travel(&self, id: &TravelId, patch: TravelPatch) -> Result<(), StoreError>;
    fn delete_travel(&self, id: &TravelId) -> Result<(), StoreError>;

    fn slot_limit(&self) -> Result<Option<u32>, StoreError>;
    fn set_slot_limit(&self, limit: u32) -> Result<(), StoreError>;

    fn subscribe_time_slots(&self) -> watch::Receiver<Vec<TimeSlot>>;
    fn subscribe_travels(&self) -> watch::Receiver<Vec<TravelRecord>>;
}

struct Inner {
    slots: Vec<TimeSlot>,
    travels: BTreeMap<TravelId, Travel>,
    slot_limit: Option<u32>,
    next_travel: u64,
}

/// In-memory store used by the binary and the tests. The mutex keeps the
/// store's own structures consistent; it does not close the read-check-write
/// race between engine calls, so writes stay last-write-wins like the
/// non-transactional backend this models.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    slot_stream: watch::Sender<Vec<TimeSlot>>,
    travel_stream: watch::Sender<Vec<TravelRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (slot_stream, _) = watch::channel(Vec::new());
        let (travel_stream, _) = watch::channel(Vec::new());
        Self {
            inner: Mutex::new(Inner {
                slots: Vec::new(),
                travels: BTreeMap::new(),
                slot_limit: None,
                next_travel: 1,
            }),
            slot_stream,
            travel_stream,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("state mutex poisoned".to_string()))
    }

    fn publish(&self, inner: &Inner) {
        self.slot_stream.send_replace(inner.slots.clone());
        self.travel_stream.send_replace(travel_records(inner));
    }
}

fn travel_records(inner: &Inner) -> Vec<TravelRecord> {
    inner
        .travels
        .iter()
        .map(|(id, travel)| TravelRecord {
            id: id.clone(),
            travel: travel.clone(),
        })
        .collect()
}

impl RosterStore for MemoryStore {
    fn time_slots(&self) -> Result<Vec<TimeSlot>, StoreError> {
        Ok(self.lock()?.slots.clone())
    }

    fn find_time_slot(&self, key: &SlotKey) -> Result<Option<TimeSlot>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.slots.iter().find(|slot| slot.key() == *key).cloned())
    }

    fn insert_time_slot(&self, slot: TimeSlot) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.slots.push(slot);
        self.publish(&inner);
        Ok(())
    }

    fn update_time_slot(&self, key: &SlotKey, slot: TimeSlot) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let position = inner
            .slots
            .iter()
            .position(|existing| existing.key() == *key)
            .ok_or(StoreError::NotFound)?;
        inner.slots[position] = slot;
        self.publish(&inner);
        Ok(())
    }

    fn travels(&self) -> Result<Vec<TravelRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(travel_records(&inner))
    }

    fn travel(&self, id: &TravelId) -> Result<Option<Travel>, StoreError> {
        Ok(self.lock()?.travels.get(id).cloned())
    }

    fn insert_travel(&self, travel: Travel) -> Result<TravelId, StoreError> {
        let mut inner = self.lock()?;
        let id = TravelId(format!("travel-{:06}", inner.next_travel));
        inner.next_travel += 1;
        inner.travels.insert(id.clone(), travel);
        self.publish(&inner);
        Ok(id)
    }

    fn merge_travel(&self, id: &TravelId, patch: TravelPatch) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let travel = inner.travels.get_mut(id).ok_or(StoreError::NotFound)?;
        patch.apply(travel);
        self.publish(&inner);
        Ok(())
    }

    fn delete_travel(&self, id: &TravelId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.travels.remove(id).ok_or(StoreError::NotFound)?;
        self.publish(&inner);
        Ok(())
    }

    fn slot_limit(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.lock()?.slot_limit)
    }

    fn set_slot_limit(&self, limit: u32) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.slot_limit = Some(limit);
        Ok(())
    }

    fn subscribe_time_slots(&self) -> watch::Receiver<Vec<TimeSlot>> {
        self.slot_stream.subscribe()
    }

    fn subscribe_travels(&self) -> watch::Receiver<Vec<TravelRecord>> {
        self.travel_stream.subscribe()
    }
}
