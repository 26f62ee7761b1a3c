use chrono::NaiveDate;

use super::domain::{ActorRole, TimeSlot, VolunteerId};
use super::status::TravelStatus;

/// Why a requested mutation was refused. Pure and synchronous; always
/// surfaced to the actor before any write is attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyDenied {
    #[error("already registered in another window on {0}")]
    AlreadyRegisteredOnDate(NaiveDate),
    #[error("no slots remaining in this window")]
    SlotFull,
    #[error("per-user slot limit of {limit} reached")]
    LimitReached { limit: u32 },
    #[error("volunteer is not registered in this window")]
    NotRegistered,
    #[error("trainees may not volunteer for extra-duty windows")]
    TraineeNotEligible,
    #[error("administrator role required")]
    AdminRequired,
    #[error("travel is {0} and no longer accepts this action")]
    TravelNotOpen(TravelStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Register,
    Unregister,
}

/// Capacity and same-date rules for a single time-slot toggle, evaluated
/// against a point-in-time snapshot of every slot sharing the target date.
///
/// The snapshot may be stale relative to other clients; two concurrent
/// registrations can both pass here and both land (last-write-wins store,
/// no transaction).
pub fn can_toggle_slot(
    slot: &TimeSlot,
    volunteer: &VolunteerId,
    slots_same_date: &[TimeSlot],
    action: SlotAction,
) -> Result<(), PolicyDenied> {
    match action {
        SlotAction::Unregister => {
            if slot.contains(volunteer) {
                Ok(())
            } else {
                Err(PolicyDenied::NotRegistered)
            }
        }
        SlotAction::Register => {
            if volunteer.is_trainee() {
                return Err(PolicyDenied::TraineeNotEligible);
            }
            let registered_on_date = slots_same_date
                .iter()
                .any(|other| other.contains(volunteer))
                || slot.contains(volunteer);
            if registered_on_date {
                return Err(PolicyDenied::AlreadyRegisteredOnDate(slot.date));
            }
            if !slot.contains(volunteer) && slot.is_full() {
                return Err(PolicyDenied::SlotFull);
            }
            Ok(())
        }
    }
}

/// Per-user global limit check. Admins bypass; a missing limit is treated
/// as 0, so no member registrations are allowed until an admin sets one.
pub fn can_register(global_limit: u32, current_count: u32, role: ActorRole) -> bool {
    role == ActorRole::Admin || current_count < global_limit
}

pub fn ensure_admin(role: ActorRole) -> Result<(), PolicyDenied> {
    if role == ActorRole::Admin {
        Ok(())
    } else {
        Err(PolicyDenied::AdminRequired)
    }
}
