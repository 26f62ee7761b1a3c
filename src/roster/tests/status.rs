use super::common::*;
use crate::roster::domain::ValidationError;
use crate::roster::policy::PolicyDenied;
use crate::roster::status::{ensure_open, travel_status, TravelStatus};

#[test]
fn status_tracks_calendar_position() {
    let start = date(2024, 6, 10);
    let end = date(2024, 6, 12);

    assert_eq!(travel_status(start, end, date(2024, 6, 9)), TravelStatus::Open);
    assert_eq!(
        travel_status(start, end, date(2024, 6, 10)),
        TravelStatus::InTransit
    );
    assert_eq!(
        travel_status(start, end, date(2024, 6, 12)),
        TravelStatus::InTransit
    );
    assert_eq!(
        travel_status(start, end, date(2024, 6, 13)),
        TravelStatus::Closed
    );
}

#[test]
fn single_day_travel_is_in_transit_on_its_day() {
    let day = date(2024, 6, 10);
    assert_eq!(travel_status(day, day, day), TravelStatus::InTransit);
}

#[test]
fn only_open_travels_accept_admin_mutation() {
    assert_eq!(ensure_open(TravelStatus::Open), Ok(()));
    assert_eq!(
        ensure_open(TravelStatus::InTransit),
        Err(PolicyDenied::TravelNotOpen(TravelStatus::InTransit))
    );
    assert_eq!(
        ensure_open(TravelStatus::Closed),
        Err(PolicyDenied::TravelNotOpen(TravelStatus::Closed))
    );
}

#[test]
fn status_labels_are_stable() {
    assert_eq!(TravelStatus::Open.label(), "open");
    assert_eq!(TravelStatus::InTransit.label(), "in_transit");
    assert_eq!(TravelStatus::Closed.label(), "closed");
}

#[test]
fn day_count_covers_full_and_half_last_day() {
    let base = details(date(2024, 1, 1), date(2024, 1, 3), 2, "Capital");
    assert_eq!(base.day_count(), 3.0);

    let mut half = base.clone();
    half.half_last_day = true;
    assert_eq!(half.day_count(), 2.5);
}

#[test]
fn single_half_day_is_the_floor() {
    let mut single = details(date(2024, 1, 1), date(2024, 1, 1), 2, "Capital");
    single.half_last_day = true;
    assert_eq!(single.day_count(), 0.5);
    assert_eq!(single.validate(), Ok(()));
}

#[test]
fn validation_rejects_inverted_ranges_and_zero_capacity() {
    let inverted = details(date(2024, 1, 3), date(2024, 1, 1), 2, "Capital");
    assert_eq!(
        inverted.validate(),
        Err(ValidationError::InvalidDateRange {
            start: date(2024, 1, 3),
            end: date(2024, 1, 1),
        })
    );

    let empty = details(date(2024, 1, 1), date(2024, 1, 3), 0, "Capital");
    assert_eq!(empty.validate(), Err(ValidationError::NoCapacity));
}
