use std::collections::HashMap;

use crate::models::{Exercise, RiskTier, Routine};

/// Rest and transition padding added to every exercise when estimating the
/// routine length.
const TRANSITION_SECONDS: u32 = 15;

/// How many exercises a day calls for. Critical shares the high bucket; the
/// difference between the two is the program title, not the workload.
pub fn exercise_count(tier: RiskTier) -> usize {
    match tier {
        RiskTier::Low => 3,
        RiskTier::Moderate => 4,
        RiskTier::High | RiskTier::Critical => 6,
    }
}

pub fn routine_title(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "Maintenance",
        RiskTier::Moderate => "Posture Correction",
        RiskTier::High | RiskTier::Critical => "Full Corrective Program",
    }
}

/// Build today's routine. Selection is cyclic over the catalog, offset by the
/// streak day, so the set rotates day to day yet stays reproducible for a
/// given streak state. A catalog shorter than the target count repeats
/// entries.
pub fn build_routine(tier: RiskTier, current_streak: i32, catalog: &[Exercise]) -> Routine {
    let day = current_streak.max(0) as u32 + 1;
    let title = routine_title(tier).to_string();

    if catalog.is_empty() {
        return Routine {
            day,
            title,
            focus_area: "full".to_string(),
            estimated_minutes: 0,
            exercises: Vec::new(),
        };
    }

    let count = exercise_count(tier);
    let exercises: Vec<Exercise> = (0..count)
        .map(|offset| catalog[(day as usize + offset) % catalog.len()].clone())
        .collect();

    let total_seconds: u32 = exercises
        .iter()
        .map(|exercise| exercise.duration_seconds + TRANSITION_SECONDS)
        .sum();
    let estimated_minutes = total_seconds.div_ceil(60);

    Routine {
        day,
        title,
        focus_area: focus_area(&exercises),
        estimated_minutes,
        exercises,
    }
}

/// Most frequent target area among the selected exercises; ties fall to the
/// area that appears first in the selection.
fn focus_area(exercises: &[Exercise]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for exercise in exercises {
        *counts.entry(exercise.target_area.as_str()).or_insert(0) += 1;
    }

    let mut best = "full";
    let mut best_count = 0;
    for exercise in exercises {
        let area = exercise.target_area.as_str();
        if counts[area] > best_count {
            best = area;
            best_count = counts[area];
        }
    }
    best.to_string()
}
