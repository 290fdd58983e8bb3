use super::MatchResult;

/// Keep results at or above `threshold`, best first, at most `max_results`.
///
/// The sort is stable, so equal scores keep catalog insertion order.
pub fn select_matches(
    mut scored: Vec<MatchResult>,
    threshold: f32,
    max_results: usize,
) -> Vec<MatchResult> {
    scored.retain(|result| result.score >= threshold);
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(max_results);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: i64, score: f32) -> MatchResult {
        MatchResult {
            id,
            title: format!("track {id}"),
            artist: "artist".into(),
            score,
            file_path: None,
        }
    }

    fn ids(results: &[MatchResult]) -> Vec<i64> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn keeps_scores_above_threshold_in_descending_order() {
        let scored = vec![result(1, 0.91), result(2, 0.40), result(3, 0.78)];
        assert_eq!(ids(&select_matches(scored, 0.65, 5)), vec![1, 3]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let scored = vec![result(1, 0.65), result(2, 0.6499)];
        assert_eq!(ids(&select_matches(scored, 0.65, 5)), vec![1]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let scored = vec![result(4, 0.7), result(2, 0.9), result(9, 0.7), result(1, 0.7)];
        assert_eq!(ids(&select_matches(scored, 0.0, 10)), vec![2, 4, 9, 1]);
    }

    #[test]
    fn cap_keeps_the_best() {
        let scored = (1..=8).map(|id| result(id, id as f32 / 10.0)).collect();
        assert_eq!(ids(&select_matches(scored, 0.0, 3)), vec![8, 7, 6]);
    }

    #[test]
    fn raising_threshold_never_grows_the_result() {
        let scored: Vec<MatchResult> = [0.2, 0.95, 0.5, 0.66, 0.8, 0.66, 0.1]
            .iter()
            .enumerate()
            .map(|(i, &s)| result(i as i64, s))
            .collect();
        let mut previous = usize::MAX;
        for step in 0..=20 {
            let threshold = step as f32 / 20.0;
            let count = select_matches(scored.clone(), threshold, 5).len();
            assert!(count <= previous, "threshold {threshold}");
            previous = count;
        }
    }
}
