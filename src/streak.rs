use chrono::{Datelike, NaiveDate};

use crate::models::UserStreak;

/// Flat bonus awarded once per calendar day for completing the routine.
pub const DAILY_COMPLETION_BONUS: i64 = 100;

/// Whether the completion guard would fire for `today`.
pub fn has_completed_today(streak: &UserStreak, today: NaiveDate) -> bool {
    streak.last_activity == Some(today)
}

/// Apply a routine-completion event. Returns `None` when today is already
/// recorded, so a duplicate event within the same calendar day changes
/// nothing. The caller persists the returned snapshot separately.
pub fn complete_today(streak: &UserStreak, today: NaiveDate) -> Option<UserStreak> {
    if has_completed_today(streak, today) {
        return None;
    }

    let mut next = roll_week(streak, today);

    let continued = match streak.last_activity {
        Some(last) => today.pred_opt() == Some(last),
        None => false,
    };
    next.current_streak = if continued {
        streak.current_streak + 1
    } else {
        // A broken streak restarts at 1, never 0: today itself counts.
        1
    };
    next.longest_streak = next.longest_streak.max(next.current_streak);
    next.last_activity = Some(today);
    next.total_points += DAILY_COMPLETION_BONUS;
    next.weekly_points += DAILY_COMPLETION_BONUS;

    Some(next)
}

/// Award ad-hoc points. Streak counters and the last-activity date are left
/// alone; only the point totals move.
pub fn add_points(streak: &UserStreak, today: NaiveDate, amount: i64) -> UserStreak {
    let mut next = roll_week(streak, today);
    next.total_points += amount;
    next.weekly_points += amount;
    next
}

/// Reset the weekly tally when today falls in a different ISO week than the
/// stored one. The weekly top-3 bonus itself lives with the leaderboard
/// service, not here.
fn roll_week(streak: &UserStreak, today: NaiveDate) -> UserStreak {
    let mut next = streak.clone();
    let week = today.iso_week();
    if (next.week_number, next.week_year) != (week.week() as i32, week.year()) {
        next.weekly_points = 0;
        next.week_number = week.week() as i32;
        next.week_year = week.year();
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn streak_with_activity(last: Option<NaiveDate>, current: i32, longest: i32) -> UserStreak {
        let mut streak = UserStreak::new(Uuid::new_v4(), date(2026, 3, 10));
        streak.last_activity = last;
        streak.current_streak = current;
        streak.longest_streak = longest;
        streak
    }

    #[test]
    fn continues_from_yesterday() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(date(2026, 3, 9)), 4, 6);

        let next = complete_today(&streak, today).unwrap();
        assert_eq!(next.current_streak, 5);
        assert_eq!(next.longest_streak, 6);
        assert_eq!(next.last_activity, Some(today));
        assert_eq!(next.total_points, DAILY_COMPLETION_BONUS);
    }

    #[test]
    fn resets_to_one_after_a_gap() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(date(2026, 3, 7)), 9, 9);

        let next = complete_today(&streak, today).unwrap();
        assert_eq!(next.current_streak, 1);
        // Longest never decreases.
        assert_eq!(next.longest_streak, 9);
    }

    #[test]
    fn first_completion_starts_at_one() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(None, 0, 0);

        let next = complete_today(&streak, today).unwrap();
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 1);
    }

    #[test]
    fn longest_tracks_a_new_record() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(date(2026, 3, 9)), 9, 9);

        let next = complete_today(&streak, today).unwrap();
        assert_eq!(next.current_streak, 10);
        assert_eq!(next.longest_streak, 10);
    }

    #[test]
    fn same_day_completion_is_a_no_op() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(today), 3, 3);

        assert!(complete_today(&streak, today).is_none());
    }

    #[test]
    fn guard_limits_duplicate_events_to_one_mutation() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(date(2026, 3, 9)), 2, 2);

        let after_first = complete_today(&streak, today).unwrap();
        assert!(complete_today(&after_first, today).is_none());
        assert_eq!(after_first.current_streak, 3);
        assert_eq!(after_first.total_points, DAILY_COMPLETION_BONUS);
    }

    #[test]
    fn add_points_leaves_streak_counters_alone() {
        let today = date(2026, 3, 10);
        let streak = streak_with_activity(Some(date(2026, 3, 8)), 2, 5);

        let next = add_points(&streak, today, 80);
        assert_eq!(next.total_points, 80);
        assert_eq!(next.weekly_points, 80);
        assert_eq!(next.current_streak, 2);
        assert_eq!(next.longest_streak, 5);
        assert_eq!(next.last_activity, Some(date(2026, 3, 8)));
    }

    #[test]
    fn weekly_points_reset_across_an_iso_week_boundary() {
        // 2026-03-08 is a Sunday; 2026-03-09 starts ISO week 11.
        let mut streak = streak_with_activity(Some(date(2026, 3, 8)), 1, 1);
        streak.weekly_points = 340;
        streak.week_number = 10;
        streak.week_year = 2026;

        let next = complete_today(&streak, date(2026, 3, 9)).unwrap();
        assert_eq!(next.weekly_points, DAILY_COMPLETION_BONUS);
        assert_eq!(next.week_number, 11);
        assert_eq!(next.week_year, 2026);
    }

    #[test]
    fn weekly_points_accumulate_within_a_week() {
        let mut streak = streak_with_activity(Some(date(2026, 3, 9)), 1, 1);
        streak.weekly_points = 100;
        streak.total_points = 100;
        streak.week_number = 11;
        streak.week_year = 2026;

        let next = add_points(&streak, date(2026, 3, 10), 44);
        assert_eq!(next.weekly_points, 144);
        assert_eq!(next.total_points, 144);
    }
}
