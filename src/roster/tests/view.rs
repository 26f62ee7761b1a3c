use std::collections::BTreeMap;

use super::common::*;
use crate::roster::domain::{Travel, TravelId};
use crate::roster::repository::TravelRecord;
use crate::roster::status::TravelStatus;
use crate::roster::view::{duration_label, group_slots_by_date, travel_view};

fn record(travel: Travel) -> TravelRecord {
    TravelRecord {
        id: TravelId("travel-000001".to_string()),
        travel,
    }
}

#[test]
fn duration_labels_match_the_roster_card() {
    assert_eq!(duration_label(time(8, 0), time(14, 0)), "6h");
    assert_eq!(duration_label(time(8, 0), time(8, 30)), "30min");
    assert_eq!(duration_label(time(7, 30), time(14, 0)), "6h30min");
    assert_eq!(duration_label(time(23, 0), time(1, 0)), "2h");
    assert_eq!(duration_label(time(18, 0), time(0, 0)), "6h");
}

#[test]
fn slots_group_by_date_in_order() {
    let later = slot(date(2024, 6, 11), 8, 14, 2);
    let mut earlier = slot(date(2024, 6, 10), 14, 20, 3);
    earlier.volunteers.push(volunteer("Sd PM Silva"));
    earlier.slots_used = 1;

    let days = group_slots_by_date(&[later, earlier]);

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(2024, 6, 10));
    assert_eq!(days[0].slots[0].remaining, 2);
    assert_eq!(days[0].slots[0].duration, "6h");
    assert_eq!(days[1].date, date(2024, 6, 11));
}

#[test]
fn allowance_total_comes_from_the_daily_rate() {
    let mut d = details(date(2024, 1, 1), date(2024, 1, 3), 2, "Capital");
    d.daily_rate = Some(200.0);
    let view = travel_view(&record(Travel::new(d)), &BTreeMap::new(), date(2024, 1, 1));
    assert_eq!(view.day_count, 3.0);
    assert_eq!(view.allowance_total, Some(600.0));

    let mut half = details(date(2024, 1, 1), date(2024, 1, 3), 2, "Capital");
    half.daily_rate = Some(200.0);
    half.half_last_day = true;
    let view = travel_view(
        &record(Travel::new(half)),
        &BTreeMap::new(),
        date(2024, 1, 1),
    );
    assert_eq!(view.day_count, 2.5);
    assert_eq!(view.allowance_total, Some(500.0));
}

#[test]
fn stored_allowance_alone_sets_no_total() {
    let mut d = details(date(2024, 1, 1), date(2024, 1, 2), 2, "Capital");
    d.daily_allowance = Some(380.0);
    let view = travel_view(&record(Travel::new(d)), &BTreeMap::new(), date(2024, 1, 1));
    assert_eq!(view.allowance_total, None);
}

#[test]
fn view_carries_status_and_count_labels() {
    let mut travel = Travel::new(details(date(2024, 6, 10), date(2024, 6, 12), 2, "Capital"));
    travel.volunteers.push(volunteer("Sd PM Silva"));

    let mut counts = BTreeMap::new();
    counts.insert(volunteer("Sd PM Silva"), 1);

    let view = travel_view(&record(travel), &counts, date(2024, 6, 11));
    assert_eq!(view.status, TravelStatus::InTransit);
    assert_eq!(view.volunteers[0].count_label, "1 viagem");
    assert_eq!(view.volunteers[0].ranked.travel_count, 1);
}

#[test]
fn closed_cards_carry_a_summary() {
    let travel = Travel::new(details(date(2024, 6, 10), date(2024, 6, 12), 2, "Capital"));
    let view = travel_view(&record(travel), &BTreeMap::new(), date(2024, 6, 20));
    assert_eq!(view.status, TravelStatus::Closed);

    let summary = view.summary.expect("closed travels are summarized");
    assert_eq!(summary.destination, "Capital");
    assert_eq!(summary.start_date, date(2024, 6, 10));
    assert_eq!(summary.day_count, 3.0);
}

#[test]
fn open_cards_have_no_summary() {
    let travel = Travel::new(details(date(2024, 6, 10), date(2024, 6, 12), 2, "Capital"));
    let view = travel_view(&record(travel), &BTreeMap::new(), date(2024, 6, 1));
    assert_eq!(view.status, TravelStatus::Open);
    assert!(view.summary.is_none());
}
