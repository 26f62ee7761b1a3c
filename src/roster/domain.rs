use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ranking;
use super::status::{self, TravelStatus};

/// Volunteer identity as supplied by the session layer: `"{rank} {war name}"`.
///
/// The string is treated as an opaque unique key everywhere except here;
/// splitting it into rank label and war name happens once, on this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolunteerId(pub String);

impl VolunteerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Rank label portion of the display name (see [`ranking::rank_label`]).
    pub fn rank_label(&self) -> &str {
        ranking::rank_label(&self.0)
    }

    pub fn rank_weight(&self) -> u8 {
        ranking::rank_weight(self.rank_label())
    }

    /// Remainder of the display name after the rank label.
    pub fn war_name(&self) -> &str {
        self.0[self.rank_label().len()..].trim_start()
    }

    pub fn is_trainee(&self) -> bool {
        self.rank_label() == ranking::TRAINEE_RANK
    }
}

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit actor capability passed into every policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    Member,
}

/// The acting volunteer plus their capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: VolunteerId,
    pub role: ActorRole,
}

impl Actor {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: VolunteerId::new(id),
            role: ActorRole::Admin,
        }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: VolunteerId::new(id),
            role: ActorRole::Member,
        }
    }
}

/// Compound lookup key for time-slot documents. Slot writes go through
/// find-then-update on these three fields, not through a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: NaiveDate,
    #[serde(with = "wire_time")]
    pub start_time: NaiveTime,
    #[serde(with = "wire_time")]
    pub end_time: NaiveTime,
}

/// A single dated duty window with fixed total capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    #[serde(with = "wire_time")]
    pub start_time: NaiveTime,
    #[serde(with = "wire_time")]
    pub end_time: NaiveTime,
    pub total_slots: u32,
    #[serde(default)]
    pub slots_used: u32,
    #[serde(default)]
    pub volunteers: Vec<VolunteerId>,
}

impl TimeSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn contains(&self, volunteer: &VolunteerId) -> bool {
        self.volunteers.iter().any(|v| v == volunteer)
    }

    pub fn is_full(&self) -> bool {
        self.slots_used == self.total_slots
    }

    pub fn remaining(&self) -> u32 {
        self.total_slots.saturating_sub(self.slots_used)
    }
}

/// Identifier wrapper for travel documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelId(pub String);

/// Admin-editable portion of a travel document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDetails {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slots: u32,
    pub destination: String,
    #[serde(default)]
    pub daily_allowance: Option<f64>,
    #[serde(default)]
    pub daily_rate: Option<f64>,
    #[serde(default)]
    pub half_last_day: bool,
}

impl TravelDetails {
    /// Diária count: calendar days inclusive, minus half a day when the
    /// last day only counts half.
    pub fn day_count(&self) -> f64 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        days as f64 - if self.half_last_day { 0.5 } else { 0.0 }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.slots == 0 {
            return Err(ValidationError::NoCapacity);
        }
        let day_count = self.day_count();
        if day_count < 0.5 {
            return Err(ValidationError::InvalidDayCount(day_count));
        }
        Ok(())
    }
}

/// A multi-day assignment with a capacity and per-day allowance.
///
/// Registering twice unregisters; uniqueness of `volunteers` is enforced by
/// that toggle semantics rather than by the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    #[serde(flatten)]
    pub details: TravelDetails,
    #[serde(default)]
    pub volunteers: Vec<VolunteerId>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl Travel {
    pub fn new(details: TravelDetails) -> Self {
        Self {
            details,
            volunteers: Vec::new(),
            archived: false,
            is_locked: false,
        }
    }

    pub fn status(&self, today: NaiveDate) -> TravelStatus {
        status::travel_status(self.details.start_date, self.details.end_date, today)
    }

    pub fn day_count(&self) -> f64 {
        self.details.day_count()
    }

    pub fn contains(&self, volunteer: &VolunteerId) -> bool {
        self.volunteers.iter().any(|v| v == volunteer)
    }

    /// Travels already underway or completed count toward fairness history.
    pub fn counts_toward_history(&self, today: NaiveDate) -> bool {
        self.details.start_date <= today
    }
}

/// Synchronous input validation surfaced before any write is attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("end date {end} precedes start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("travel must cover at least half a day, got {0}")]
    InvalidDayCount(f64),
    #[error("travel must offer at least one slot")]
    NoCapacity,
    #[error("slot limit must be a non-negative integer, got {0}")]
    InvalidLimit(i64),
}

/// Wire format for slot times: serialized as `HH:MM:SS`, accepted as either
/// `HH:MM` or `HH:MM:SS`.
pub(crate) mod wire_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM or HH:MM:SS"))
        })
    }
}
