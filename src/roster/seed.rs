use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{wire_time, TimeSlot};
use super::repository::{RosterStore, StoreError};

/// Failures while seeding time slots from a CSV roster export.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct SlotRow {
    #[serde(rename = "date")]
    date: String,
    #[serde(rename = "start_time")]
    start_time: String,
    #[serde(rename = "end_time")]
    end_time: String,
    #[serde(rename = "total_slots")]
    total_slots: u32,
}

impl SlotRow {
    fn into_slot(self, row: usize) -> Result<TimeSlot, SeedError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|err| {
            SeedError::Row {
                row,
                message: format!("invalid date '{}' ({err})", self.date),
            }
        })?;
        let start_time = wire_time::parse(self.start_time.trim()).ok_or_else(|| SeedError::Row {
            row,
            message: format!("invalid start time '{}'", self.start_time),
        })?;
        let end_time = wire_time::parse(self.end_time.trim()).ok_or_else(|| SeedError::Row {
            row,
            message: format!("invalid end time '{}'", self.end_time),
        })?;
        if self.total_slots == 0 {
            return Err(SeedError::Row {
                row,
                message: "total_slots must be at least 1".to_string(),
            });
        }

        Ok(TimeSlot {
            date,
            start_time,
            end_time,
            total_slots: self.total_slots,
            slots_used: 0,
            volunteers: Vec::new(),
        })
    }
}

/// Parse a seeding CSV with headers `date,start_time,end_time,total_slots`.
pub fn parse_slots<R: Read>(reader: R) -> Result<Vec<TimeSlot>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut slots = Vec::new();
    for (index, record) in csv_reader.deserialize::<SlotRow>().enumerate() {
        let row = record?;
        slots.push(row.into_slot(index + 1)?);
    }
    Ok(slots)
}

/// Insert parsed slots into the store, returning how many were written.
pub fn seed_store<S: RosterStore>(store: &S, slots: Vec<TimeSlot>) -> Result<usize, StoreError> {
    let count = slots.len();
    for slot in slots {
        store.insert_time_slot(slot)?;
    }
    Ok(count)
}
