//! Grouped aggregation shared across pipeline stages
//!
//! Every aggregate in the ΔΔCt pipeline follows the same shape: build a
//! key -> mean index once over a filtered subset of rows, then broadcast it
//! back onto every row whose key matches (a left join). Missing values are
//! skipped when averaging; a group with no values at all has a missing mean.

use std::collections::HashMap;
use std::hash::Hash;

use rayon::prelude::*;

/// Running mean that ignores missing values
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    n: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> Option<f64> {
        if self.n == 0 {
            None
        } else {
            Some(self.sum / self.n as f64)
        }
    }
}

/// Mean of the present values, `None` if there are none
pub fn mean_ignoring_missing<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut acc = MeanAccumulator::default();
    for v in values {
        acc.push(v);
    }
    acc.mean()
}

/// Index of per-group means
#[derive(Debug, Clone)]
pub struct GroupMeans<K> {
    means: HashMap<K, Option<f64>>,
}

impl<K: Eq + Hash> GroupMeans<K> {
    /// Build from (key, value) pairs; keys seen only with missing values map to `None`
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
    {
        let mut groups: HashMap<K, MeanAccumulator> = HashMap::new();
        for (key, value) in pairs {
            groups.entry(key).or_default().push(value);
        }
        let means = groups.into_iter().map(|(k, acc)| (k, acc.mean())).collect();
        Self { means }
    }

    /// `None` if the key has no group; `Some(None)` if the group mean is missing
    pub fn get(&self, key: &K) -> Option<Option<f64>> {
        self.means.get(key).copied()
    }

    pub fn n_groups(&self) -> usize {
        self.means.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Option<f64>)> {
        self.means.iter()
    }
}

/// Result of broadcasting a group index onto rows
#[derive(Debug)]
pub struct Broadcast<T, K> {
    pub rows: Vec<T>,
    /// Keys with no group in the index, with the number of rows carrying each
    pub unmatched: HashMap<K, usize>,
}

/// Left-join `index` onto `rows` by `key_of`, writing each row's group mean
/// (or `None`) through `assign`. Row order is preserved.
pub fn broadcast_join<T, K, KF, AF>(
    rows: Vec<T>,
    index: &GroupMeans<K>,
    key_of: KF,
    assign: AF,
) -> Broadcast<T, K>
where
    T: Send,
    K: Eq + Hash + Send + Sync,
    KF: Fn(&T) -> K + Sync + Send,
    AF: Fn(&mut T, Option<f64>) + Sync + Send,
{
    let joined: Vec<(T, Option<K>)> = rows
        .into_par_iter()
        .map(|mut row| {
            let key = key_of(&row);
            match index.get(&key) {
                Some(mean) => {
                    assign(&mut row, mean);
                    (row, None)
                }
                None => {
                    assign(&mut row, None);
                    (row, Some(key))
                }
            }
        })
        .collect();

    let mut unmatched: HashMap<K, usize> = HashMap::new();
    let mut out = Vec::with_capacity(joined.len());
    for (row, miss) in joined {
        if let Some(key) = miss {
            *unmatched.entry(key).or_insert(0) += 1;
        }
        out.push(row);
    }

    Broadcast { rows: out, unmatched }
}

/// Subtract two optional values; missing if either side is missing
pub fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    }
}
