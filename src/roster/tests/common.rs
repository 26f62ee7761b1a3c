use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::roster::domain::{TimeSlot, TravelDetails, VolunteerId};
use crate::roster::engine::AllocationEngine;
use crate::roster::repository::MemoryStore;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn slot(on: NaiveDate, start_hour: u32, end_hour: u32, total: u32) -> TimeSlot {
    TimeSlot {
        date: on,
        start_time: time(start_hour, 0),
        end_time: time(end_hour, 0),
        total_slots: total,
        slots_used: 0,
        volunteers: Vec::new(),
    }
}

pub(super) fn details(
    start: NaiveDate,
    end: NaiveDate,
    slots: u32,
    destination: &str,
) -> TravelDetails {
    TravelDetails {
        start_date: start,
        end_date: end,
        slots,
        destination: destination.to_string(),
        daily_allowance: None,
        daily_rate: None,
        half_last_day: false,
    }
}

pub(super) fn volunteer(name: &str) -> VolunteerId {
    VolunteerId::new(name)
}

pub(super) fn engine() -> (Arc<MemoryStore>, AllocationEngine<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = AllocationEngine::new(store.clone());
    (store, engine)
}
