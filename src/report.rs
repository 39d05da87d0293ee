use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{RiskFactor, RiskResult, Routine, UserStreak};

/// Markdown hand-off report: assessment breakdown, today's routine, and the
/// streak summary for one user.
pub fn build_report(
    display_name: &str,
    assessed_on: NaiveDate,
    result: &RiskResult,
    routine: &Routine,
    streak: &UserStreak,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Spine Care Report: {display_name}");
    let _ = writeln!(
        output,
        "Risk assessed on {} — score {}/100, {} tier.",
        assessed_on, result.score, result.tier
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Breakdown");

    for factor in RiskFactor::ALL {
        let points = result.breakdown.get(&factor).copied().unwrap_or(0);
        let _ = writeln!(output, "- {}: {:+} points", factor.label(), points);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{}", result.primary_reason);

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Today's Routine: {} (day {})",
        routine.title, routine.day
    );
    let _ = writeln!(
        output,
        "Focus area: {}. Estimated {} minutes.",
        routine.focus_area, routine.estimated_minutes
    );

    if routine.exercises.is_empty() {
        let _ = writeln!(output, "No exercises available.");
    } else {
        for exercise in routine.exercises.iter() {
            let reps = exercise.reps.as_deref().unwrap_or("at your own pace");
            let _ = writeln!(
                output,
                "- {} ({}, {}s, {}): {}",
                exercise.name,
                exercise.target_area.as_str(),
                exercise.duration_seconds,
                reps,
                exercise.what_it_does
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Streak");
    let _ = writeln!(
        output,
        "Current streak {} days (longest {}). {} points lifetime, {} this week.",
        streak.current_streak, streak.longest_streak, streak.total_points, streak.weekly_points
    );
    match streak.last_activity {
        Some(date) => {
            let _ = writeln!(output, "Last completed routine: {date}.");
        }
        None => {
            let _ = writeln!(output, "No routine completed yet.");
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::local_baseline;
    use crate::models::{RiskInput, RiskTier};
    use crate::risk::calculate_spine_risk;
    use crate::routine::build_routine;
    use uuid::Uuid;

    #[test]
    fn report_contains_every_section() {
        let input = RiskInput {
            pain_level: Some("Chronic".to_string()),
            occupation_type: Some("Desk job (8+ hrs sitting)".to_string()),
            ..RiskInput::default()
        };
        let result = calculate_spine_risk(&input);
        let catalog = local_baseline();
        let routine = build_routine(result.tier, 3, &catalog);
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let streak = UserStreak::new(Uuid::new_v4(), today);

        let report = build_report("Maya Lindqvist", today, &result, &routine, &streak);

        assert!(report.contains("# Spine Care Report: Maya Lindqvist"));
        assert!(report.contains("## Risk Breakdown"));
        assert!(report.contains("chronic back pain"));
        assert!(report.contains("## Today's Routine"));
        assert!(report.contains("## Streak"));
        assert!(report.contains("No routine completed yet."));
    }

    #[test]
    fn breakdown_lines_show_signed_points() {
        let input = RiskInput {
            exercise_frequency: Some("Daily".to_string()),
            ..RiskInput::default()
        };
        let result = calculate_spine_risk(&input);
        assert_eq!(result.tier, RiskTier::Low);

        let routine = build_routine(result.tier, 0, &local_baseline());
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let streak = UserStreak::new(Uuid::new_v4(), today);

        let report = build_report("Tomas Rivera", today, &result, &routine, &streak);
        assert!(report.contains("- exercise frequency: -10 points"));
    }
}
