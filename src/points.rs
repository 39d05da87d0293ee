/// Point value for a 1-based catalog position. Three fixed tiers; anything
/// outside them scores the base 20.
pub fn points_for_position(position: u32) -> i64 {
    match position {
        1 | 2 | 7 | 8 | 10 | 12 => 25,
        6 | 11 => 22,
        _ => 20,
    }
}

/// Sum over a set of positions. Order-independent; repeated positions each
/// score on their own, since a short catalog can legitimately repeat an
/// exercise within one routine.
pub fn total_points(positions: &[u32]) -> i64 {
    positions
        .iter()
        .map(|position| points_for_position(*position))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tier_sums() {
        assert_eq!(total_points(&[1, 2, 7, 8, 10, 12]), 150);
        assert_eq!(total_points(&[3, 4, 5, 9]), 80);
        assert_eq!(total_points(&[6, 11]), 44);
        assert_eq!(total_points(&[]), 0);
    }

    #[test]
    fn unknown_positions_default_to_base_value() {
        assert_eq!(points_for_position(99), 20);
        assert_eq!(points_for_position(0), 20);
    }

    #[test]
    fn duplicates_score_independently() {
        assert_eq!(total_points(&[1, 1, 1]), 75);
        assert_eq!(total_points(&[6, 6]), 44);
    }

    #[test]
    fn order_does_not_matter() {
        assert_eq!(total_points(&[12, 1, 8]), total_points(&[8, 12, 1]));
    }
}
