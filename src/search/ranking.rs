/// Ranking and selection of scored songs
///
/// Steps:
/// 1. Stable sort by relevance, descending
/// 2. Keep the top `pool` songs
/// 3. Weighted random permutation without replacement (weight = max(0.01, relevance))
/// 4. Partition by category, keeping the shuffled order
/// 5. Truncate each partition to `max_results`
///
/// The random source is injected so tests (and `search.shuffle_seed`) can pin
/// the permutation; production draws a fresh OS-seeded generator per request.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::relevance::Category;
use super::ScoredSong;

/// Songs entering the weighted shuffle unless configured otherwise.
pub const DEFAULT_SHUFFLE_POOL: usize = 40;

/// Smallest selection weight, so even floor-relevance songs can surface.
const MIN_WEIGHT: f64 = 0.01;

/// Final, categorized result lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResults {
    pub results_main: Vec<ScoredSong>,
    pub results_secondary: Vec<ScoredSong>,
}

/// Random permutation biased by `weight`, drawn without replacement.
///
/// Each draw picks from the remaining items with probability proportional to
/// their weight. If the weights cannot form a distribution (non-finite or
/// non-positive total) the input order is returned unchanged.
pub fn weighted_shuffle<T, R>(items: Vec<T>, weight: impl Fn(&T) -> f64, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<(f64, T)> = items.into_iter().map(|item| (weight(&item), item)).collect();

    let total: f64 = pool.iter().map(|(w, _)| *w).sum();
    if !total.is_finite() || total <= 0.0 || pool.iter().any(|(w, _)| *w < 0.0) {
        tracing::debug!(total, "Degenerate shuffle weights, keeping input order");
        return pool.into_iter().map(|(_, item)| item).collect();
    }

    let mut shuffled = Vec::with_capacity(pool.len());
    while !pool.is_empty() {
        let remaining: f64 = pool.iter().map(|(w, _)| *w).sum();
        let target = rng.random::<f64>() * remaining;

        let mut cumulative = 0.0;
        let mut picked = pool.len() - 1;
        for (i, (w, _)) in pool.iter().enumerate() {
            cumulative += w;
            if target < cumulative {
                picked = i;
                break;
            }
        }
        let (_, item) = pool.remove(picked);
        shuffled.push(item);
    }
    shuffled
}

/// Sort, shuffle, partition and truncate scored songs.
pub fn rank_and_select<R>(
    mut songs: Vec<ScoredSong>,
    pool: usize,
    max_results: usize,
    rng: &mut R,
) -> RankedResults
where
    R: Rng + ?Sized,
{
    if songs.is_empty() {
        return RankedResults::default();
    }

    // Vec::sort_by is stable: equal relevance keeps the incoming order
    songs.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(std::cmp::Ordering::Equal));
    songs.truncate(pool);

    let mixed = weighted_shuffle(songs, |s| s.relevance.max(MIN_WEIGHT), rng);

    let (mut results_main, mut results_secondary): (Vec<_>, Vec<_>) =
        mixed.into_iter().partition(|s| s.category == Category::Main);
    results_main.truncate(max_results);
    results_secondary.truncate(max_results);

    RankedResults {
        results_main,
        results_secondary,
    }
}
