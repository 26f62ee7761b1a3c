use std::collections::BTreeMap;

use super::common::*;
use crate::roster::ranking::{
    rank_label, rank_volunteers, rank_weight, travel_count_label, TRAINEE_RANK,
};

fn history(entries: &[(&str, u32)]) -> BTreeMap<crate::roster::domain::VolunteerId, u32> {
    entries
        .iter()
        .map(|(name, count)| (volunteer(name), *count))
        .collect()
}

#[test]
fn least_traveled_go_first_regardless_of_rank() {
    let volunteers = vec![
        volunteer("Sd PM Silva"),
        volunteer("Cel PM Souza"),
        volunteer("Cb PM Lima"),
    ];
    let counts = history(&[("Sd PM Silva", 2), ("Cel PM Souza", 0), ("Cb PM Lima", 1)]);

    let ranked = rank_volunteers(&volunteers, &counts, 2);

    assert_eq!(ranked[0].name, volunteer("Cel PM Souza"));
    assert_eq!(ranked[0].travel_count, 0);
    assert_eq!(ranked[1].name, volunteer("Cb PM Lima"));
    assert_eq!(ranked[1].travel_count, 1);
    assert_eq!(ranked[2].name, volunteer("Sd PM Silva"));
    assert_eq!(ranked[2].travel_count, 2);

    assert!(ranked[0].selected);
    assert!(ranked[1].selected);
    assert!(!ranked[2].selected);
}

#[test]
fn seniority_breaks_ties_on_equal_load() {
    let volunteers = vec![
        volunteer("Sd PM Silva"),
        volunteer("Cel PM Souza"),
        volunteer("Maj PM Lima"),
    ];
    let counts = history(&[
        ("Sd PM Silva", 1),
        ("Cel PM Souza", 1),
        ("Maj PM Lima", 1),
    ]);

    let ranked = rank_volunteers(&volunteers, &counts, 1);

    assert_eq!(ranked[0].name, volunteer("Cel PM Souza"));
    assert_eq!(ranked[1].name, volunteer("Maj PM Lima"));
    assert_eq!(ranked[2].name, volunteer("Sd PM Silva"));
    assert!(ranked[0].selected);
    assert!(!ranked[1].selected);
}

#[test]
fn full_ties_keep_registration_order() {
    let volunteers = vec![
        volunteer("Sd PM Primeiro"),
        volunteer("Sd PM Segundo"),
        volunteer("Sd PM Terceiro"),
    ];
    let counts = history(&[]);

    let ranked = rank_volunteers(&volunteers, &counts, 2);

    assert_eq!(ranked[0].name, volunteer("Sd PM Primeiro"));
    assert_eq!(ranked[1].name, volunteer("Sd PM Segundo"));
    assert_eq!(ranked[2].name, volunteer("Sd PM Terceiro"));
}

#[test]
fn missing_history_counts_as_zero() {
    let volunteers = vec![volunteer("Cb PM Lima"), volunteer("Sd PM Silva")];
    let counts = history(&[("Cb PM Lima", 3)]);

    let ranked = rank_volunteers(&volunteers, &counts, 1);

    assert_eq!(ranked[0].name, volunteer("Sd PM Silva"));
    assert_eq!(ranked[0].travel_count, 0);
}

#[test]
fn multi_token_rank_labels_resolve_by_longest_prefix() {
    assert_eq!(rank_label("Ten Cel PM Souza"), "Ten Cel PM");
    assert_eq!(rank_label("Cel PM Souza"), "Cel PM");
    assert_eq!(rank_label("1° Sgt PM Dias"), "1° Sgt PM");
    assert_eq!(rank_weight(rank_label("Ten Cel PM Souza")), 11);
}

#[test]
fn unknown_rank_falls_back_to_first_token_with_zero_weight() {
    assert_eq!(rank_label("Visitante Silva"), "Visitante");
    assert_eq!(rank_weight("Visitante"), 0);
}

#[test]
fn volunteer_id_splits_once() {
    let id = volunteer("2° Sgt PM Rocha");
    assert_eq!(id.rank_label(), "2° Sgt PM");
    assert_eq!(id.war_name(), "Rocha");
    assert_eq!(id.rank_weight(), 4);
    assert!(!id.is_trainee());
    assert!(volunteer("Estágio Nunes").is_trainee());
    assert_eq!(volunteer("Estágio Nunes").rank_label(), TRAINEE_RANK);
}

#[test]
fn count_labels_are_pluralized() {
    assert_eq!(travel_count_label(0), "0 viagens");
    assert_eq!(travel_count_label(1), "1 viagem");
    assert_eq!(travel_count_label(4), "4 viagens");
}
