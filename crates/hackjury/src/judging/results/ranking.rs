use std::cmp::Ordering;

use super::super::domain::Criterion;
use super::RankedResult;

/// Descending desirability: total, prioritized criterion sums, perfect marks,
/// then the more consistent jury spread.
pub(super) fn compare(a: &RankedResult, b: &RankedResult, prioritized: &[&Criterion]) -> Ordering {
    descending(a.total_score, b.total_score)
        .then_with(|| {
            prioritized
                .iter()
                .map(|criterion| {
                    let a_score = a.criterion_score(&criterion.id);
                    let b_score = b.criterion_score(&criterion.id);
                    descending(a_score, b_score)
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.perfect_scores_count.cmp(&a.perfect_scores_count))
        .then_with(|| descending(b.standard_deviation, a.standard_deviation))
}

// Signed zeros compare equal; NaN never reaches here from well-typed input.
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Stable sort followed by 1-based positional ranks.
pub(super) fn rank(results: &mut [RankedResult], prioritized: &[&Criterion]) {
    results.sort_by(|a, b| compare(a, b, prioritized));
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index + 1;
    }
}
