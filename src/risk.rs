use std::collections::BTreeMap;

use crate::models::{RiskFactor, RiskInput, RiskResult, RiskTier};

// Per-factor point tables. These are data, not control flow: scoring walks
// the table for each answered question and sums the matches. Negative values
// are protective factors.

pub const AGE_POINTS: &[(&str, i32)] = &[
    ("Under 25", 0),
    ("25-40", 5),
    ("41-55", 10),
    ("56-64", 15),
    ("65+", 20),
];

pub const GENDER_POINTS: &[(&str, i32)] = &[
    ("Male", 0),
    ("Female", 5),
    ("Other", 3),
    ("Prefer not to say", 3),
];

pub const OCCUPATION_POINTS: &[(&str, i32)] = &[
    ("Desk job (8+ hrs sitting)", 25),
    ("Desk job (4-8 hrs sitting)", 15),
    ("Standing work", 10),
    ("Physical labor (heavy lifting)", 20),
    ("Mixed / active", 5),
];

pub const WEIGHTLIFTING_POINTS: &[(&str, i32)] = &[
    ("No", 0),
    ("Yes, with a coach or proper form", 5),
    ("Yes, self-taught", 15),
];

pub const EXERCISE_POINTS: &[(&str, i32)] = &[
    ("Daily", -10),
    ("3-5 times a week", -5),
    ("1-2 times a week", 5),
    ("Rarely", 12),
    ("Never", 20),
];

pub const PAIN_POINTS: &[(&str, i32)] = &[
    ("None", 0),
    ("Occasional", 10),
    ("Frequent", 20),
    ("Chronic", 35),
];

pub const POSTURE_POINTS: &[(&str, i32)] = &[
    ("I sit up straight", -5),
    ("I slouch sometimes", 8),
    ("I slouch constantly", 15),
];

pub const SLEEP_POINTS: &[(&str, i32)] = &[
    ("Back", 0),
    ("Side", 5),
    ("Varies", 5),
    ("Stomach", 10),
];

/// Table lookup. Missing or unrecognized answers contribute zero.
fn lookup(table: &[(&str, i32)], answer: Option<&str>) -> i32 {
    let Some(answer) = answer else { return 0 };
    table
        .iter()
        .find(|(option, _)| *option == answer)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn factor_points(input: &RiskInput, factor: RiskFactor) -> i32 {
    match factor {
        RiskFactor::Pain => lookup(PAIN_POINTS, input.pain_level.as_deref()),
        RiskFactor::Occupation => lookup(OCCUPATION_POINTS, input.occupation_type.as_deref()),
        RiskFactor::ExerciseFrequency => {
            lookup(EXERCISE_POINTS, input.exercise_frequency.as_deref())
        }
        RiskFactor::Posture => lookup(POSTURE_POINTS, input.posture_awareness.as_deref()),
        RiskFactor::Age => lookup(AGE_POINTS, input.age_group.as_deref()),
        RiskFactor::Weightlifting => lookup(WEIGHTLIFTING_POINTS, input.weightlifting.as_deref()),
        RiskFactor::Sleep => lookup(SLEEP_POINTS, input.sleep_position.as_deref()),
        RiskFactor::Gender => lookup(GENDER_POINTS, input.gender.as_deref()),
    }
}

/// Score the questionnaire. Pure and deterministic: identical input yields an
/// identical result, breakdown included.
pub fn calculate_spine_risk(input: &RiskInput) -> RiskResult {
    let mut breakdown = BTreeMap::new();
    for factor in RiskFactor::ALL {
        breakdown.insert(factor, factor_points(input, factor));
    }

    let raw: i32 = breakdown.values().sum();
    let score = raw.clamp(0, 100);
    let tier = RiskTier::from_score(score);
    let primary_reason = primary_reason(input, &breakdown);

    RiskResult {
        score,
        tier,
        primary_reason,
        breakdown,
    }
}

/// Name the single largest positive contributor. Ties fall to the factor
/// declared first in `RiskFactor::ALL` (pain outranks occupation, and so on).
fn primary_reason(input: &RiskInput, breakdown: &BTreeMap<RiskFactor, i32>) -> String {
    let mut positive: Vec<(RiskFactor, i32)> = breakdown
        .iter()
        .filter(|(_, points)| **points > 0)
        .map(|(factor, points)| (*factor, *points))
        .collect();

    // BTreeMap iteration is already in priority order; the stable sort keeps
    // that order among equal contributions.
    positive.sort_by_key(|(_, points)| std::cmp::Reverse(*points));

    match positive.first() {
        Some((factor, points)) => format!(
            "Your biggest risk factor is {} ({points} points).",
            reason_phrase(*factor, input)
        ),
        None => "No significant risk factors identified.".to_string(),
    }
}

fn reason_phrase(factor: RiskFactor, input: &RiskInput) -> String {
    match factor {
        RiskFactor::Pain => match input.pain_level.as_deref() {
            Some("Chronic") => "chronic back pain".to_string(),
            Some("Frequent") => "frequent back pain".to_string(),
            _ => "occasional back pain".to_string(),
        },
        RiskFactor::Occupation => match input.occupation_type.as_deref() {
            Some("Physical labor (heavy lifting)") => "heavy lifting at work".to_string(),
            Some("Standing work") => "long hours standing at work".to_string(),
            _ => "prolonged sitting at work".to_string(),
        },
        RiskFactor::ExerciseFrequency => "lack of regular exercise".to_string(),
        RiskFactor::Posture => "slouching posture habits".to_string(),
        RiskFactor::Age => "age-related spine wear".to_string(),
        RiskFactor::Weightlifting => "weightlifting without guidance".to_string(),
        RiskFactor::Sleep => "stomach sleeping".to_string(),
        RiskFactor::Gender => "demographic factors".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_input() -> RiskInput {
        RiskInput {
            age_group: Some("65+".to_string()),
            gender: Some("Female".to_string()),
            occupation_type: Some("Desk job (8+ hrs sitting)".to_string()),
            weightlifting: Some("No".to_string()),
            exercise_frequency: Some("Never".to_string()),
            pain_level: Some("Chronic".to_string()),
            posture_awareness: Some("I slouch constantly".to_string()),
            sleep_position: Some("Stomach".to_string()),
        }
    }

    #[test]
    fn worst_case_clamps_to_critical() {
        let result = calculate_spine_risk(&full_input());

        // Raw contributions sum to 130 and clamp to 100.
        let raw: i32 = result.breakdown.values().sum();
        assert_eq!(raw, 130);
        assert_eq!(result.score, 100);
        assert_eq!(result.tier, RiskTier::Critical);
        assert!(result.primary_reason.contains("chronic back pain"));
        assert!(result.primary_reason.contains("35"));
    }

    #[test]
    fn breakdown_matches_tables_for_worst_case() {
        let result = calculate_spine_risk(&full_input());
        assert_eq!(result.breakdown[&RiskFactor::Age], 20);
        assert_eq!(result.breakdown[&RiskFactor::Gender], 5);
        assert_eq!(result.breakdown[&RiskFactor::Occupation], 25);
        assert_eq!(result.breakdown[&RiskFactor::Weightlifting], 0);
        assert_eq!(result.breakdown[&RiskFactor::ExerciseFrequency], 20);
        assert_eq!(result.breakdown[&RiskFactor::Pain], 35);
        assert_eq!(result.breakdown[&RiskFactor::Posture], 15);
        assert_eq!(result.breakdown[&RiskFactor::Sleep], 10);
    }

    #[test]
    fn tier_bands_are_exact_at_the_edges() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(30), RiskTier::Low);
        assert_eq!(RiskTier::from_score(31), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(60), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(61), RiskTier::High);
        assert_eq!(RiskTier::from_score(85), RiskTier::High);
        assert_eq!(RiskTier::from_score(86), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(100), RiskTier::Critical);
    }

    #[test]
    fn missing_answers_contribute_zero() {
        let result = calculate_spine_risk(&RiskInput::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, RiskTier::Low);
        assert!(result.breakdown.values().all(|points| *points == 0));
        assert_eq!(
            result.primary_reason,
            "No significant risk factors identified."
        );
    }

    #[test]
    fn unrecognized_option_contributes_zero() {
        let input = RiskInput {
            pain_level: Some("Unbearable".to_string()),
            ..RiskInput::default()
        };
        let result = calculate_spine_risk(&input);
        assert_eq!(result.breakdown[&RiskFactor::Pain], 0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn protective_answers_clamp_at_zero() {
        let input = RiskInput {
            exercise_frequency: Some("Daily".to_string()),
            posture_awareness: Some("I sit up straight".to_string()),
            ..RiskInput::default()
        };
        let result = calculate_spine_risk(&input);
        assert_eq!(result.breakdown[&RiskFactor::ExerciseFrequency], -10);
        assert_eq!(result.breakdown[&RiskFactor::Posture], -5);
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, RiskTier::Low);
    }

    #[test]
    fn equal_contributions_break_ties_by_priority() {
        // Age 65+ and exercise "Never" both contribute 20; exercise frequency
        // is declared earlier and must win.
        let input = RiskInput {
            age_group: Some("65+".to_string()),
            exercise_frequency: Some("Never".to_string()),
            ..RiskInput::default()
        };
        let result = calculate_spine_risk(&input);
        assert!(result.primary_reason.contains("lack of regular exercise"));
    }

    #[test]
    fn scoring_is_referentially_transparent() {
        let input = full_input();
        let first = calculate_spine_risk(&input);
        let second = calculate_spine_risk(&input);
        assert_eq!(first, second);
    }

    fn option_from(table: &'static [(&'static str, i32)]) -> impl Strategy<Value = Option<String>> {
        let options: Vec<Option<String>> = std::iter::once(None)
            .chain(table.iter().map(|(option, _)| Some(option.to_string())))
            .collect();
        proptest::sample::select(options)
    }

    proptest! {
        #[test]
        fn any_valid_input_scores_in_range(
            age_group in option_from(AGE_POINTS),
            gender in option_from(GENDER_POINTS),
            occupation_type in option_from(OCCUPATION_POINTS),
            weightlifting in option_from(WEIGHTLIFTING_POINTS),
            exercise_frequency in option_from(EXERCISE_POINTS),
            pain_level in option_from(PAIN_POINTS),
            posture_awareness in option_from(POSTURE_POINTS),
            sleep_position in option_from(SLEEP_POINTS),
        ) {
            let input = RiskInput {
                age_group,
                gender,
                occupation_type,
                weightlifting,
                exercise_frequency,
                pain_level,
                posture_awareness,
                sleep_position,
            };

            let result = calculate_spine_risk(&input);
            prop_assert!((0..=100).contains(&result.score));
            prop_assert_eq!(result.tier, RiskTier::from_score(result.score));
            prop_assert_eq!(result.breakdown.len(), 8);
            prop_assert_eq!(calculate_spine_risk(&input), result);
        }
    }
}
