// Group-by aggregation with match-weighted rate metrics.
//
// Count metrics (aces) are summed. Rate metrics (percentages, ratings, the
// win/loss index) are averaged with `sum(v * w) / sum(w)`, never simply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a metric merges across rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    /// Totals such as aces: summed.
    Count,
    /// Percentages and indices: weighted by match count.
    Rate,
}

/// One output row of `aggregate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregated<K> {
    pub key: K,
    pub value: f64,
    /// Sum of the input weights of the group.
    pub weight: f64,
    /// Number of input rows merged into this group.
    pub rows: usize,
}

/// Round half away from zero to the given number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Weighted mean of `(value, weight)` pairs.
///
/// Returns `None` when the total weight is zero.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (weighted_sum, total_weight) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(ws, tw), (v, w)| (ws + v * w, tw + w));
    if total_weight == 0.0 {
        None
    } else {
        Some(weighted_sum / total_weight)
    }
}

/// Group rows by key, preserving input order inside each group. Groups come
/// out in ascending key order.
pub fn group_by<'a, R, K, F>(rows: &'a [R], key: F) -> BTreeMap<K, Vec<&'a R>>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a R>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Collapse `rows` to one row per key.
///
/// `Count` metrics sum the values; `Rate` metrics take the weighted mean
/// rounded to `decimals`. Rate groups with zero total weight are dropped.
pub fn aggregate<R, K, FK, FV, FW>(
    rows: &[R],
    key: FK,
    value: FV,
    weight: FW,
    kind: MetricKind,
    decimals: u32,
) -> Vec<Aggregated<K>>
where
    K: Ord + Clone + std::fmt::Debug,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> f64,
    FW: Fn(&R) -> f64,
{
    let mut out = Vec::new();
    for (k, group) in group_by(rows, key) {
        let total_weight: f64 = group.iter().map(|r| weight(*r)).sum();
        let merged = match kind {
            MetricKind::Count => Some(group.iter().map(|r| value(*r)).sum::<f64>()),
            MetricKind::Rate => {
                weighted_mean(group.iter().map(|r| (value(*r), weight(*r))))
                    .map(|v| round_to(v, decimals))
            }
        };
        match merged {
            Some(v) => out.push(Aggregated {
                key: k,
                value: v,
                weight: total_weight,
                rows: group.len(),
            }),
            None => debug!("dropping group {:?}: zero total weight", k),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
