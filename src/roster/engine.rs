use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::domain::{
    Actor, SlotKey, TimeSlot, Travel, TravelDetails, TravelId, ValidationError, VolunteerId,
};
use super::policy::{self, PolicyDenied, SlotAction};
use super::ranking;
use super::repository::{RosterStore, StoreError, TravelPatch};
use super::status;
use super::view::{self, SlotDayView, TravelView};

/// Failure taxonomy for engine operations. Policy and validation failures
/// are pure and precede any write; `NotFound`/`Store` originate from the
/// asynchronous collaborator and leave the authoritative document unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Denied(#[from] PolicyDenied),
    #[error("document not found")]
    NotFound,
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RosterError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

/// Whether a travel toggle added or removed the volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Joined,
    Left,
}

/// Orchestrates the policies, ranker, and status machine over the store.
///
/// Every operation recomputes from the latest snapshot the store hands
/// back; nothing authoritative is cached across calls, so the engine stays
/// re-entrant against repeated full-snapshot delivery.
pub struct AllocationEngine<S> {
    store: Arc<S>,
}

impl<S> AllocationEngine<S>
where
    S: RosterStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Register the actor in a time slot: per-user limit first, then
    /// capacity/same-date rules, then the find-then-update write.
    pub fn register_slot(&self, actor: &Actor, key: &SlotKey) -> Result<TimeSlot, RosterError> {
        let slots = self.store.time_slots()?;
        let slot = slots
            .iter()
            .find(|slot| slot.key() == *key)
            .cloned()
            .ok_or(RosterError::NotFound)?;

        let limit = self.store.slot_limit()?.unwrap_or(0);
        let current = user_slot_count(&slots, &actor.id);
        if !policy::can_register(limit, current, actor.role) {
            return Err(PolicyDenied::LimitReached { limit }.into());
        }

        let same_date: Vec<TimeSlot> = slots
            .iter()
            .filter(|other| other.date == slot.date)
            .cloned()
            .collect();
        policy::can_toggle_slot(&slot, &actor.id, &same_date, SlotAction::Register)?;

        let mut updated = slot;
        updated.slots_used += 1;
        updated.volunteers.push(actor.id.clone());
        self.store.update_time_slot(key, updated.clone())?;
        info!(volunteer = %actor.id, date = %updated.date, "registered for extra-duty window");
        Ok(updated)
    }

    pub fn unregister_slot(&self, actor: &Actor, key: &SlotKey) -> Result<TimeSlot, RosterError> {
        let slot = self
            .store
            .find_time_slot(key)?
            .ok_or(RosterError::NotFound)?;
        policy::can_toggle_slot(&slot, &actor.id, &[], SlotAction::Unregister)?;

        let mut updated = slot;
        updated.slots_used = updated.slots_used.saturating_sub(1);
        updated.volunteers.retain(|v| v != &actor.id);
        self.store.update_time_slot(key, updated.clone())?;
        info!(volunteer = %actor.id, date = %updated.date, "left extra-duty window");
        Ok(updated)
    }

    /// Toggle travel membership by primary key. No capacity check at write
    /// time; oversubscription is resolved at display time by the ranker.
    pub fn toggle_travel_volunteer(
        &self,
        actor: &Actor,
        id: &TravelId,
    ) -> Result<ToggleOutcome, RosterError> {
        let travel = self.store.travel(id)?.ok_or(RosterError::NotFound)?;
        let mut volunteers = travel.volunteers.clone();

        let outcome = if travel.contains(&actor.id) {
            volunteers.retain(|v| v != &actor.id);
            ToggleOutcome::Left
        } else {
            volunteers.push(actor.id.clone());
            ToggleOutcome::Joined
        };

        self.store.merge_travel(
            id,
            TravelPatch {
                volunteers: Some(volunteers),
                ..TravelPatch::default()
            },
        )?;
        info!(volunteer = %actor.id, travel = %id.0, ?outcome, "travel volunteer toggled");
        Ok(outcome)
    }

    pub fn create_travel(
        &self,
        actor: &Actor,
        details: TravelDetails,
    ) -> Result<TravelId, RosterError> {
        policy::ensure_admin(actor.role)?;
        details.validate()?;
        let id = self.store.insert_travel(Travel::new(details))?;
        info!(travel = %id.0, "travel created");
        Ok(id)
    }

    /// Replace the editable fields of an open travel.
    pub fn update_travel(
        &self,
        actor: &Actor,
        id: &TravelId,
        details: TravelDetails,
        today: NaiveDate,
    ) -> Result<(), RosterError> {
        policy::ensure_admin(actor.role)?;
        details.validate()?;
        self.ensure_travel_open(id, today)?;
        self.store.merge_travel(
            id,
            TravelPatch {
                details: Some(details),
                ..TravelPatch::default()
            },
        )?;
        Ok(())
    }

    pub fn set_archived(
        &self,
        actor: &Actor,
        id: &TravelId,
        archived: bool,
        today: NaiveDate,
    ) -> Result<(), RosterError> {
        policy::ensure_admin(actor.role)?;
        self.ensure_travel_open(id, today)?;
        self.store.merge_travel(
            id,
            TravelPatch {
                archived: Some(archived),
                ..TravelPatch::default()
            },
        )?;
        Ok(())
    }

    /// Lock ("process diária") or unlock ("reopen slots") a travel roster.
    /// Both directions are legal only while the travel is still open. The
    /// flag only narrows the displayed roster to the selected volunteers;
    /// the stored list is untouched.
    pub fn set_locked(
        &self,
        actor: &Actor,
        id: &TravelId,
        locked: bool,
        today: NaiveDate,
    ) -> Result<(), RosterError> {
        policy::ensure_admin(actor.role)?;
        self.ensure_travel_open(id, today)?;
        self.store.merge_travel(
            id,
            TravelPatch {
                is_locked: Some(locked),
                ..TravelPatch::default()
            },
        )?;
        info!(travel = %id.0, locked, "travel lock changed");
        Ok(())
    }

    /// Delete is legal in any status.
    pub fn delete_travel(&self, actor: &Actor, id: &TravelId) -> Result<(), RosterError> {
        policy::ensure_admin(actor.role)?;
        self.store.delete_travel(id)?;
        info!(travel = %id.0, "travel deleted");
        Ok(())
    }

    pub fn slot_limit(&self) -> Result<u32, RosterError> {
        Ok(self.store.slot_limit()?.unwrap_or(0))
    }

    pub fn set_slot_limit(&self, actor: &Actor, value: i64) -> Result<(), RosterError> {
        policy::ensure_admin(actor.role)?;
        let limit =
            u32::try_from(value).map_err(|_| ValidationError::InvalidLimit(value))?;
        self.store.set_slot_limit(limit)?;
        info!(limit, "per-user slot limit updated");
        Ok(())
    }

    /// Historical travel load per volunteer: only travels already underway
    /// or completed count; future travels do not.
    pub fn history_counts(
        &self,
        today: NaiveDate,
    ) -> Result<BTreeMap<VolunteerId, u32>, RosterError> {
        let mut counts = BTreeMap::new();
        for record in self.store.travels()? {
            if !record.travel.counts_toward_history(today) {
                continue;
            }
            for volunteer in &record.travel.volunteers {
                *counts.entry(volunteer.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Ranked display projections for every travel, newest first. Locked
    /// travels expose only their selected volunteers.
    pub fn travel_views(&self, today: NaiveDate) -> Result<Vec<TravelView>, RosterError> {
        let counts = self.history_counts(today)?;
        let mut records = self.store.travels()?;
        records.sort_by(|a, b| b.travel.details.start_date.cmp(&a.travel.details.start_date));
        Ok(records
            .iter()
            .map(|record| view::travel_view(record, &counts, today))
            .collect())
    }

    /// The fairness ordering for one travel, unfiltered by the lock flag.
    pub fn ranked_volunteers(
        &self,
        id: &TravelId,
        today: NaiveDate,
    ) -> Result<Vec<ranking::RankedVolunteer>, RosterError> {
        let travel = self.store.travel(id)?.ok_or(RosterError::NotFound)?;
        let counts = self.history_counts(today)?;
        Ok(ranking::rank_volunteers(
            &travel.volunteers,
            &counts,
            travel.details.slots,
        ))
    }

    /// Slots grouped by date for display, ordered by date.
    pub fn grouped_slots(&self) -> Result<Vec<SlotDayView>, RosterError> {
        let slots = self.store.time_slots()?;
        Ok(view::group_slots_by_date(&slots))
    }

    pub fn user_slot_count(&self, volunteer: &VolunteerId) -> Result<u32, RosterError> {
        Ok(user_slot_count(&self.store.time_slots()?, volunteer))
    }

    fn ensure_travel_open(&self, id: &TravelId, today: NaiveDate) -> Result<(), RosterError> {
        let travel = self.store.travel(id)?.ok_or(RosterError::NotFound)?;
        status::ensure_open(travel.status(today))?;
        Ok(())
    }
}

fn user_slot_count(slots: &[TimeSlot], volunteer: &VolunteerId) -> u32 {
    slots.iter().filter(|slot| slot.contains(volunteer)).count() as u32
}
