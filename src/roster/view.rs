use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use super::domain::{TimeSlot, TravelId, VolunteerId};
use super::ranking::{self, RankedVolunteer};
use super::repository::TravelRecord;
use super::status::TravelStatus;

/// One ranked volunteer as rendered on a travel card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntryView {
    #[serde(flatten)]
    pub ranked: RankedVolunteer,
    pub count_label: String,
}

/// Display projection of a travel: derived status, diária arithmetic, and
/// the ranked volunteer list (narrowed to the selected subset when locked).
#[derive(Debug, Clone, Serialize)]
pub struct TravelView {
    pub id: TravelId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slots: u32,
    pub status: TravelStatus,
    pub locked: bool,
    pub archived: bool,
    pub day_count: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowance_total: Option<f64>,
    /// Collapsed card, present only once the travel is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TravelSummaryView>,
    pub volunteers: Vec<RosterEntryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelSummaryView {
    pub id: TravelId,
    pub destination: String,
    pub start_date: NaiveDate,
    pub day_count: f64,
}

pub fn travel_view(
    record: &TravelRecord,
    history_counts: &BTreeMap<VolunteerId, u32>,
    today: NaiveDate,
) -> TravelView {
    let travel = &record.travel;
    let details = &travel.details;

    let mut ranked = ranking::rank_volunteers(&travel.volunteers, history_counts, details.slots);
    if travel.is_locked {
        ranked.retain(|entry| entry.selected);
    }
    let volunteers = ranked
        .into_iter()
        .map(|entry| RosterEntryView {
            count_label: ranking::travel_count_label(entry.travel_count),
            ranked: entry,
        })
        .collect();

    let day_count = details.day_count();
    let allowance_total = details.daily_rate.map(|rate| day_count * rate);

    let status = travel.status(today);
    let summary = (status == TravelStatus::Closed).then(|| TravelSummaryView {
        id: record.id.clone(),
        destination: details.destination.clone(),
        start_date: details.start_date,
        day_count,
    });

    TravelView {
        id: record.id.clone(),
        destination: details.destination.clone(),
        start_date: details.start_date,
        end_date: details.end_date,
        slots: details.slots,
        status,
        locked: travel.is_locked,
        archived: travel.archived,
        day_count,
        allowance_total,
        summary,
        volunteers,
    }
}

/// One day's worth of duty windows.
#[derive(Debug, Clone, Serialize)]
pub struct SlotDayView {
    pub date: NaiveDate,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub total_slots: u32,
    pub slots_used: u32,
    pub remaining: u32,
    pub volunteers: Vec<VolunteerId>,
}

pub fn group_slots_by_date(slots: &[TimeSlot]) -> Vec<SlotDayView> {
    let mut grouped: BTreeMap<NaiveDate, Vec<SlotView>> = BTreeMap::new();
    for slot in slots {
        grouped.entry(slot.date).or_default().push(SlotView {
            start_time: slot.start_time.format("%H:%M").to_string(),
            end_time: slot.end_time.format("%H:%M").to_string(),
            duration: duration_label(slot.start_time, slot.end_time),
            total_slots: slot.total_slots,
            slots_used: slot.slots_used,
            remaining: slot.remaining(),
            volunteers: slot.volunteers.clone(),
        });
    }
    grouped
        .into_iter()
        .map(|(date, slots)| SlotDayView { date, slots })
        .collect()
}

/// Compact duration between the window bounds, e.g. `6h`, `30min`,
/// `6h30min`. An end time at or before the start wraps to the next day.
pub fn duration_label(start: NaiveTime, end: NaiveTime) -> String {
    let (start_hour, start_minute) = (start.hour() as i32, start.minute() as i32);
    let (mut end_hour, end_minute) = (end.hour() as i32, end.minute() as i32);
    if end_hour < start_hour || (end_hour == 0 && start_hour > 0) {
        end_hour += 24;
    }

    let mut hours = end_hour - start_hour;
    let mut minutes = end_minute - start_minute;
    if minutes < 0 {
        hours -= 1;
        minutes += 60;
    }

    let mut label = String::new();
    if hours > 0 {
        label.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        label.push_str(&format!("{minutes}min"));
    }
    label
}
