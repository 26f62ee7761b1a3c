use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::policy::PolicyDenied;

/// Time-derived lifecycle stage of a travel. Never persisted; recomputed
/// from the date range and "today" on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelStatus {
    Open,
    InTransit,
    Closed,
}

impl TravelStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TravelStatus::Open => "open",
            TravelStatus::InTransit => "in_transit",
            TravelStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TravelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn travel_status(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> TravelStatus {
    if today < start {
        TravelStatus::Open
    } else if today <= end {
        TravelStatus::InTransit
    } else {
        TravelStatus::Closed
    }
}

/// Mutating admin actions (edit, archive, lock, unlock) are legal only
/// while the travel is still open; delete stays legal in any status.
pub fn ensure_open(status: TravelStatus) -> Result<(), PolicyDenied> {
    if status == TravelStatus::Open {
        Ok(())
    } else {
        Err(PolicyDenied::TravelNotOpen(status))
    }
}
