use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::VolunteerId;

/// Trainees carry this rank label and are excluded from extra-duty windows.
pub const TRAINEE_RANK: &str = "Estágio";

/// Seniority weights per rank label. Unknown labels weigh 0.
const RANK_WEIGHTS: [(&str, u8); 13] = [
    ("Cel PM", 12),
    ("Ten Cel PM", 11),
    ("Maj PM", 10),
    ("Cap PM", 9),
    ("1° Ten PM", 8),
    ("2° Ten PM", 7),
    ("Sub Ten PM", 6),
    ("1° Sgt PM", 5),
    ("2° Sgt PM", 4),
    ("3° Sgt PM", 3),
    ("Cb PM", 2),
    ("Sd PM", 1),
    (TRAINEE_RANK, 0),
];

pub fn rank_weight(label: &str) -> u8 {
    RANK_WEIGHTS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, weight)| *weight)
        .unwrap_or(0)
}

/// Rank label of a display name: the longest known rank that prefixes the
/// name at a word boundary, falling back to the first whitespace token
/// (which then weighs 0).
pub fn rank_label(display_name: &str) -> &str {
    let mut best: Option<&'static str> = None;
    for (known, _) in RANK_WEIGHTS {
        let at_boundary = display_name
            .strip_prefix(known)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '));
        if at_boundary && best.map_or(true, |current| known.len() > current.len()) {
            best = Some(known);
        }
    }

    match best {
        Some(label) => label,
        None => display_name
            .split_whitespace()
            .next()
            .unwrap_or(display_name),
    }
}

/// One row of the fairness ordering for a travel's volunteer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVolunteer {
    pub name: VolunteerId,
    pub rank_label: String,
    pub travel_count: u32,
    pub rank_weight: u8,
    pub selected: bool,
}

/// Order volunteers fairness-first and mark the top `capacity` as selected.
///
/// Ascending by historical travel count, ties broken by descending rank
/// weight; remaining ties keep registration order (the sort is stable), so
/// identical inputs always produce identical output.
pub fn rank_volunteers(
    volunteers: &[VolunteerId],
    history_counts: &BTreeMap<VolunteerId, u32>,
    capacity: u32,
) -> Vec<RankedVolunteer> {
    let mut ranked: Vec<RankedVolunteer> = volunteers
        .iter()
        .map(|volunteer| RankedVolunteer {
            name: volunteer.clone(),
            rank_label: volunteer.rank_label().to_string(),
            travel_count: history_counts.get(volunteer).copied().unwrap_or(0),
            rank_weight: volunteer.rank_weight(),
            selected: false,
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.travel_count
            .cmp(&b.travel_count)
            .then(b.rank_weight.cmp(&a.rank_weight))
    });

    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.selected = index < capacity as usize;
    }

    ranked
}

/// Pluralized travel-count label shown next to each ranked volunteer.
pub fn travel_count_label(count: u32) -> String {
    if count == 1 {
        "1 viagem".to_string()
    } else {
        format!("{count} viagens")
    }
}
