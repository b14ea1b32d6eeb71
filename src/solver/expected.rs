//! Expected-remaining scoring
//!
//! A guess partitions the candidates by the verdict each would produce. The
//! expected number of candidates left after playing it is `Σ p·size` over
//! those partitions; lower is better.

use crate::core::{VerdictSequence, Word};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Expected candidates remaining after `guess`
///
/// `sample` is the subset actually evaluated and `total` the size of the
/// full candidate set, so bucket sizes are scaled back up when the candidates
/// were sampled.
///
/// # Examples
/// ```
/// use wordle_race::core::Word;
/// use wordle_race::solver::expected_remaining;
///
/// let candidates = [Word::new("irate").unwrap(), Word::new("crate").unwrap()];
/// let refs: Vec<&Word> = candidates.iter().collect();
///
/// // IRATE tells the two apart, so exactly one candidate remains
/// let guess = Word::new("irate").unwrap();
/// assert!((expected_remaining(&guess, &refs, 2) - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn expected_remaining(guess: &Word, sample: &[&Word], total: usize) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }

    let mut buckets: FxHashMap<VerdictSequence, usize> = FxHashMap::default();
    for &candidate in sample {
        *buckets
            .entry(VerdictSequence::score(guess, candidate))
            .or_insert(0) += 1;
    }

    let m = sample.len() as f64;
    let scale = total as f64 / m;
    buckets
        .values()
        .map(|&count| {
            let count = count as f64;
            (count / m) * (count * scale)
        })
        .sum()
}

/// Pick the pool word with the lowest expected remaining
///
/// Ties prefer a word that could itself be the secret, then alphabetical order
/// so the choice is stable across runs. Returns `None` for an empty pool.
#[must_use]
pub fn select_best_guess<'a>(
    pool: &[&'a Word],
    sample: &[&Word],
    total: usize,
    candidates: &FxHashSet<&Word>,
) -> Option<(&'a Word, f64)> {
    pool.par_iter()
        .map(|&guess| (guess, expected_remaining(guess, sample, total)))
        .min_by(|(a, score_a), (b, score_b)| {
            score_a
                .total_cmp(score_b)
                .then_with(|| candidates.contains(b).cmp(&candidates.contains(a)))
                .then_with(|| a.text().cmp(b.text()))
        })
}
