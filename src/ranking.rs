// 🏆 Top-N ranking
//
// Metrics are computed exactly once per candidate (decorate, sort, strip),
// so expensive metrics such as total earnings are never recomputed inside
// the comparator. The sort is stable: candidates with equal metrics keep
// their input order.

use std::cmp::Ordering;

use crate::error::Result;

/// Up to `n` candidates, highest metric first
pub fn top_n<T, M, F>(candidates: impl IntoIterator<Item = T>, metric: F, n: usize) -> Result<Vec<T>>
where
    M: PartialOrd,
    F: FnMut(&T) -> Result<M>,
{
    Ok(top_n_scored(candidates, metric, n)?
        .into_iter()
        .map(|(candidate, _)| candidate)
        .collect())
}

/// Ranked candidates together with their metric
pub fn top_n_scored<T, M, F>(
    candidates: impl IntoIterator<Item = T>,
    mut metric: F,
    n: usize,
) -> Result<Vec<(T, M)>>
where
    M: PartialOrd,
    F: FnMut(&T) -> Result<M>,
{
    let mut scored = Vec::new();
    for candidate in candidates {
        let value = metric(&candidate)?;
        scored.push((candidate, value));
    }

    scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    scored.truncate(n);
    Ok(scored)
}
