// 📊 Aggregation primitives - group, reduce, select extrema
//
// Every marketplace aggregation is one of these primitives applied to a
// collection with a grouping closure and a metric closure. Closures return
// Result because computing a key usually means following foreign keys, and a
// dangling key must abort the aggregation instead of being skipped.
//
// Groups are kept in BTreeMaps, so iteration (and therefore tie-breaking in
// `argmax`) is by ascending group key.

use std::collections::BTreeMap;
use std::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::Result;

// ============================================================================
// MEAN ACCUMULATOR
// ============================================================================

/// Running sum and count, in fixed point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    pub sum: Decimal,
    pub count: usize,
}

impl Mean {
    pub fn push(&mut self, value: Decimal) {
        self.sum += value;
        self.count += 1;
    }

    /// None for an empty group (undefined, not zero)
    pub fn value(&self) -> Option<Decimal> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / Decimal::from(self.count))
        }
    }

    /// Zero for an empty collection
    pub fn value_or_zero(&self) -> Decimal {
        self.value().unwrap_or(Decimal::ZERO)
    }
}

impl FromIterator<Decimal> for Mean {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        let mut mean = Mean::default();
        for value in iter {
            mean.push(value);
        }
        mean
    }
}

/// Average of a collection; `0` when it is empty
pub fn average(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().collect::<Mean>().value_or_zero()
}

/// Display form of an average (ratings are reported as floats)
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// ============================================================================
// GROUPING
// ============================================================================

/// Number of items per group
pub fn group_count<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Result<BTreeMap<K, usize>>
where
    K: Ord,
    F: FnMut(&T) -> Result<K>,
{
    let mut groups = BTreeMap::new();
    for item in items {
        *groups.entry(key(&item)?).or_insert(0) += 1;
    }
    Ok(groups)
}

/// Sum of a value per group
pub fn group_sum<T, K, V, F>(items: impl IntoIterator<Item = T>, mut key_value: F) -> Result<BTreeMap<K, V>>
where
    K: Ord,
    V: Add<Output = V> + Default + Copy,
    F: FnMut(&T) -> Result<(K, V)>,
{
    let mut groups: BTreeMap<K, V> = BTreeMap::new();
    for item in items {
        let (group, value) = key_value(&item)?;
        let total = groups.entry(group).or_default();
        *total = *total + value;
    }
    Ok(groups)
}

/// Average of a value per group. Only groups with members appear.
pub fn group_average<T, K, F>(
    items: impl IntoIterator<Item = T>,
    mut key_value: F,
) -> Result<BTreeMap<K, Decimal>>
where
    K: Ord,
    F: FnMut(&T) -> Result<(K, Decimal)>,
{
    let mut groups: BTreeMap<K, Mean> = BTreeMap::new();
    for item in items {
        let (group, value) = key_value(&item)?;
        groups.entry(group).or_default().push(value);
    }
    Ok(groups
        .into_iter()
        .filter_map(|(group, mean)| mean.value().map(|avg| (group, avg)))
        .collect())
}

// ============================================================================
// EXTREMA
// ============================================================================

/// Candidate with the strictly greatest metric.
///
/// On ties the first candidate in iteration order wins; None when empty.
pub fn argmax<T, M, F>(candidates: impl IntoIterator<Item = T>, mut metric: F) -> Option<T>
where
    M: PartialOrd,
    F: FnMut(&T) -> M,
{
    let mut best: Option<(T, M)> = None;
    for candidate in candidates {
        let value = metric(&candidate);
        let replace = match &best {
            None => true,
            Some((_, current)) => value > *current,
        };
        if replace {
            best = Some((candidate, value));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Fallible metric variant of `argmax`
pub fn try_argmax<T, M, F>(candidates: impl IntoIterator<Item = T>, mut metric: F) -> Result<Option<T>>
where
    M: PartialOrd,
    F: FnMut(&T) -> Result<M>,
{
    let mut best: Option<(T, M)> = None;
    for candidate in candidates {
        let value = metric(&candidate)?;
        let replace = match &best {
            None => true,
            Some((_, current)) => value > *current,
        };
        if replace {
            best = Some((candidate, value));
        }
    }
    Ok(best.map(|(candidate, _)| candidate))
}

/// Key of the largest group value
pub fn argmax_group<K: Copy, V: PartialOrd + Copy>(groups: &BTreeMap<K, V>) -> Option<K> {
    argmax(groups.iter(), |(_, value)| **value).map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(average(Vec::<Decimal>::new()), Decimal::ZERO);
        assert_eq!(Mean::default().value(), None);
    }

    #[test]
    fn test_average_keeps_fixed_point() {
        let prices = vec![Decimal::new(40000, 2), Decimal::new(60000, 2)];
        assert_eq!(average(prices), Decimal::new(500, 0));

        let ratings = vec![Decimal::from(5), Decimal::from(4), Decimal::from(5)];
        let avg = to_f64(average(ratings));
        assert!((avg - 4.6667).abs() < 0.001);
    }

    #[test]
    fn test_group_count() {
        let words = vec!["apple", "avocado", "banana", "blueberry", "cherry"];
        let groups = group_count(words, |w| Ok(w.chars().next().unwrap())).unwrap();

        assert_eq!(groups.get(&'a'), Some(&2));
        assert_eq!(groups.get(&'b'), Some(&2));
        assert_eq!(groups.get(&'c'), Some(&1));
    }

    #[test]
    fn test_group_sum_and_average() {
        let rows = vec![(1, 10), (1, 20), (2, 5)];

        let sums = group_sum(rows.iter(), |(k, v)| Ok((*k, Decimal::from(*v)))).unwrap();
        assert_eq!(sums[&1], Decimal::from(30));
        assert_eq!(sums[&2], Decimal::from(5));

        let avgs = group_average(rows.iter(), |(k, v)| Ok((*k, Decimal::from(*v)))).unwrap();
        assert_eq!(avgs[&1], Decimal::from(15));
        assert_eq!(avgs.len(), 2);
    }

    #[test]
    fn test_grouping_propagates_errors() {
        let result = group_count(vec![1, 2, 3], |n| {
            if *n == 2 {
                Err(crate::AnalyticsError::invariant("thing", 2, "broken"))
            } else {
                Ok(*n)
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(Vec::<i32>::new(), |n| *n), None);
        assert_eq!(argmax(vec![3, 9, 4], |n| *n), Some(9));

        // Ties keep the first candidate
        let tied = vec![("a", 2), ("b", 5), ("c", 5)];
        assert_eq!(argmax(tied, |(_, v)| *v), Some(("b", 5)));
    }

    #[test]
    fn test_argmax_group_and_try_argmax() {
        let mut groups = BTreeMap::new();
        groups.insert(10, 3usize);
        groups.insert(20, 7usize);
        groups.insert(30, 7usize);
        assert_eq!(argmax_group(&groups), Some(20));
        assert_eq!(argmax_group(&BTreeMap::<i64, usize>::new()), None);

        let best = try_argmax(vec![1, 2, 3], |n| Ok(-(*n))).unwrap();
        assert_eq!(best, Some(1));
    }
}
