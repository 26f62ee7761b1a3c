//! Volunteer-slot allocation and fairness ranking for a duty roster.
//!
//! Members volunteer for dated extra-duty windows under capacity and
//! per-user limits, and for multi-day travel assignments where capacity is
//! resolved at display time by ranking volunteers on historical travel load
//! with seniority as the tie-break. Admin actions (edit, archive, lock,
//! delete) are gated by the travel's time-derived lifecycle status.

pub mod domain;
pub mod engine;
pub mod policy;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod seed;
pub mod status;
pub mod view;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, ActorRole, SlotKey, TimeSlot, Travel, TravelDetails, TravelId, ValidationError,
    VolunteerId,
};
pub use engine::{AllocationEngine, RosterError, ToggleOutcome};
pub use policy::{PolicyDenied, SlotAction};
pub use ranking::RankedVolunteer;
pub use repository::{MemoryStore, RosterStore, StoreError, TravelPatch, TravelRecord};
pub use router::roster_router;
pub use seed::SeedError;
pub use status::TravelStatus;
pub use view::{SlotDayView, TravelSummaryView, TravelView};
