// Top-N selection over scored rows.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, MetricKind};

// ---------------------------------------------------------------------------
// TopN
// ---------------------------------------------------------------------------

/// How many rows a ranked chart keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopN {
    All,
    Top(usize),
}

impl TopN {
    pub fn limit(self) -> Option<usize> {
        match self {
            TopN::All => None,
            TopN::Top(n) => Some(n),
        }
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopN::All => write!(f, "All"),
            TopN::Top(n) => write!(f, "Top {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized top-N option `{0}`")]
pub struct ParseTopNError(String);

impl FromStr for TopN {
    type Err = ParseTopNError;

    /// Parses `All` or `Top <n>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(TopN::All);
        }
        let mut parts = trimmed.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(word), Some(n), None) if word.eq_ignore_ascii_case("top") => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(TopN::Top)
                .ok_or_else(|| ParseTopNError(s.to_string())),
            _ => Err(ParseTopNError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Keep the `n` highest-scoring rows, best first.
///
/// The sort is stable, so tied rows keep their input order. `TopN::All`
/// returns `rows` unchanged, order included; callers that want a ranked
/// full list sort with `sort_descending` themselves.
pub fn top_n<R, F>(mut rows: Vec<R>, n: TopN, score: F) -> Vec<R>
where
    F: Fn(&R) -> f64,
{
    let Some(limit) = n.limit() else {
        return rows;
    };
    sort_descending(&mut rows, score);
    rows.truncate(limit);
    rows
}

/// Stable sort by descending score.
pub fn sort_descending<R, F>(rows: &mut [R], score: F)
where
    F: Fn(&R) -> f64,
{
    rows.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

/// Keep every row of the `n` best entities, where an entity's score is the
/// aggregate of its rows.
///
/// Rows are first aggregated per entity (`Count` sums, `Rate` is
/// weight-averaged), the aggregates are ranked, and the original rows of the
/// winners are returned in their input order. `TopN::All` returns `rows`
/// unchanged.
pub fn top_entities<R, K, FK, FV, FW>(
    rows: Vec<R>,
    n: TopN,
    entity: FK,
    value: FV,
    weight: FW,
    kind: MetricKind,
) -> Vec<R>
where
    K: Ord + Clone + std::fmt::Debug,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> f64,
    FW: Fn(&R) -> f64,
{
    if n == TopN::All || rows.is_empty() {
        return rows;
    }
    let scores = aggregate(&rows, &entity, value, weight, kind, 2);
    let winners: BTreeSet<K> = top_n(scores, n, |a| a.value)
        .into_iter()
        .map(|a| a.key)
        .collect();
    rows.into_iter()
        .filter(|r| winners.contains(&entity(r)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
