// Multi-select filter state with an "all" sentinel.
//
// Every sentinel-bearing dimension (surface, country, category, ...) holds a
// `Selection`. The only way to change it is `Selection::reconcile`, which
// keeps the sentinel mutually exclusive with concrete labels.

use serde::{Deserialize, Serialize};

/// Raw token meaning "no narrowing applied for this dimension". Source tables
/// use the same token for their pooled rows.
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How a dimension treats a selection that names every concrete option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollapsePolicy {
    /// Only an explicit pick of the sentinel collapses to `{ALL}`.
    ExplicitOnly,
    /// Selecting every concrete option is treated as selecting `ALL`.
    CollapseWhenComplete,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Ordered set of selected raw labels for one dimension.
///
/// Never empty and never mixes `ALL` with a concrete label once
/// `reconcile` has returned. Deserialized label lists go through
/// `Selection::of`, so a stored state cannot break that either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSelection")]
pub struct Selection {
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct StoredSelection {
    labels: Vec<String>,
}

impl From<StoredSelection> for Selection {
    fn from(stored: StoredSelection) -> Self {
        Selection::of(stored.labels)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::all()
    }
}

impl Selection {
    /// The `{ALL}` selection.
    pub fn all() -> Self {
        Selection {
            labels: vec![ALL.to_string()],
        }
    }

    /// Build a selection from concrete labels, resetting to `{ALL}` when the
    /// result would violate the invariant.
    pub fn of<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Selection::all();
        let requested = labels.into_iter().map(Into::into).collect();
        selection.reconcile(requested, &[], CollapsePolicy::ExplicitOnly);
        selection
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_all(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == ALL
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// True when more than one concrete label is selected, which is the
    /// trigger for aggregation.
    pub fn is_multi(&self) -> bool {
        !self.is_all() && self.labels.len() > 1
    }

    /// Concrete labels, or `None` for the `{ALL}` selection.
    pub fn concrete(&self) -> Option<&[String]> {
        if self.is_all() {
            None
        } else {
            Some(&self.labels)
        }
    }

    /// Whether a row with the given dimension value passes this filter.
    ///
    /// `{ALL}` keeps only the pooled rows (value `all`); a concrete selection
    /// keeps rows whose value is one of the labels.
    pub fn matches(&self, value: &str) -> bool {
        self.contains(value)
    }

    /// The selection that results from the user clicking `label`: remove it
    /// when present, otherwise append it.
    pub fn toggled(&self, label: &str) -> Vec<String> {
        if self.contains(label) {
            self.labels.iter().filter(|l| *l != label).cloned().collect()
        } else {
            let mut next = self.labels.clone();
            next.push(label.to_string());
            next
        }
    }

    /// Replace this selection with `requested`, corrected so the sentinel
    /// invariant holds. `universe` lists every valid option of the dimension
    /// (it may include `ALL`).
    ///
    /// Returns the corrected selection, which is `self`.
    pub fn reconcile(
        &mut self,
        requested: Vec<String>,
        universe: &[String],
        policy: CollapsePolicy,
    ) -> &Selection {
        let had_all = self.contains(ALL);
        let has_all = requested.iter().any(|l| l == ALL);
        let mut requested = dedup(requested);

        if has_all && requested.len() > 1 {
            if !had_all {
                // Sentinel was the newest click: it wins.
                requested = vec![ALL.to_string()];
            } else {
                requested.retain(|l| l != ALL);
            }
        } else if policy == CollapsePolicy::CollapseWhenComplete
            && requested.len() > 1
            && names_every_concrete(&requested, universe)
        {
            requested = vec![ALL.to_string()];
        } else if requested.is_empty() {
            requested = vec![ALL.to_string()];
        }

        self.labels = requested;
        self
    }
}

fn dedup(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

fn names_every_concrete(requested: &[String], universe: &[String]) -> bool {
    let concrete: Vec<&String> = universe.iter().filter(|l| *l != ALL).collect();
    if concrete.is_empty() || requested.iter().any(|l| l == ALL) {
        return false;
    }
    concrete.len() == requested.len() && concrete.iter().all(|c| requested.contains(c))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
