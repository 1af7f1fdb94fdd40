// Property-based tests for the filter reconciler, the weighted aggregator and
// top-N selection.

use atp_core::aggregate::{aggregate, MetricKind};
use atp_core::filter::{CollapsePolicy, Selection, ALL};
use atp_core::ranking::{top_n, TopN};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Helpers
// =============================================================================

fn universe(concrete: usize) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain((0..concrete).map(|i| format!("opt{i}")))
        .collect()
}

fn policy_strategy() -> impl Strategy<Value = CollapsePolicy> {
    prop_oneof![
        Just(CollapsePolicy::ExplicitOnly),
        Just(CollapsePolicy::CollapseWhenComplete),
    ]
}

/// `None` clears the selection; `Some(i)` toggles option `i`.
fn ops_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    vec(prop_oneof![1 => Just(None), 6 => (0usize..8).prop_map(Some)], 0..40)
}

fn assert_invariant(sel: &Selection) -> Result<(), TestCaseError> {
    let labels = sel.labels();
    prop_assert!(!labels.is_empty(), "selection is empty");
    prop_assert!(
        !(labels.iter().any(|l| l == ALL) && labels.len() > 1),
        "sentinel mixed with concrete labels: {:?}",
        labels
    );
    let mut seen = labels.to_vec();
    seen.sort();
    seen.dedup();
    prop_assert_eq!(seen.len(), labels.len(), "duplicate labels: {:?}", labels);
    Ok(())
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Any sequence of toggles and clears keeps the selection non-empty and
    /// never mixes the sentinel with a concrete label.
    #[test]
    fn reconcile_preserves_sentinel_invariant(
        concrete in 1usize..7,
        policy in policy_strategy(),
        ops in ops_strategy(),
    ) {
        let u = universe(concrete);
        let mut sel = Selection::all();
        for op in ops {
            let requested = match op {
                Some(i) => sel.toggled(&u[i % u.len()]),
                None => Vec::new(),
            };
            sel.reconcile(requested, &u, policy);
            assert_invariant(&sel)?;
        }
    }

    /// Arbitrary (even invalid) requests are corrected in one step.
    #[test]
    fn reconcile_corrects_arbitrary_requests(
        concrete in 1usize..7,
        policy in policy_strategy(),
        start in vec(0usize..8, 0..5),
        request in vec(0usize..8, 0..10),
    ) {
        let u = universe(concrete);
        let mut sel = Selection::all();
        sel.reconcile(start.iter().map(|i| u[i % u.len()].clone()).collect(), &u, policy);
        assert_invariant(&sel)?;
        sel.reconcile(request.iter().map(|i| u[i % u.len()].clone()).collect(), &u, policy);
        assert_invariant(&sel)?;
    }

    /// Picking every concrete option one at a time collapses to the sentinel.
    #[test]
    fn selecting_every_option_collapses(concrete in 2usize..8) {
        let u = universe(concrete);
        let mut sel = Selection::all();
        for label in u.iter().filter(|l| *l != ALL) {
            let requested = sel.toggled(label);
            sel.reconcile(requested, &u, CollapsePolicy::CollapseWhenComplete);
        }
        prop_assert!(sel.is_all(), "ended at {:?}", sel.labels());
    }

    /// Group weights add up to the input weights of that group.
    #[test]
    fn aggregated_weights_sum_per_group(
        rows in vec((0u8..5, 0u32..1000, 1u32..200), 1..60),
        rate in any::<bool>(),
    ) {
        let kind = if rate { MetricKind::Rate } else { MetricKind::Count };
        let out = aggregate(
            &rows,
            |r| r.0,
            |r| f64::from(r.1),
            |r| f64::from(r.2),
            kind,
            2,
        );

        let mut expected: BTreeMap<u8, f64> = BTreeMap::new();
        for r in &rows {
            *expected.entry(r.0).or_default() += f64::from(r.2);
        }
        prop_assert_eq!(out.len(), expected.len());
        for a in &out {
            prop_assert!((a.weight - expected[&a.key]).abs() < 1e-6);
        }
        let total_in: f64 = rows.iter().map(|r| f64::from(r.2)).sum();
        let total_out: f64 = out.iter().map(|a| a.weight).sum();
        prop_assert!((total_in - total_out).abs() < 1e-6);
    }

    /// Two equally weighted rows give the simple mean.
    #[test]
    fn equal_weights_give_mean(a in 0u32..100, b in 0u32..100, w in 1u32..100) {
        let rows = [(f64::from(a), f64::from(w)), (f64::from(b), f64::from(w))];
        let out = aggregate(&rows, |_| 0u8, |r| r.0, |r| r.1, MetricKind::Rate, 2);
        let mean = (f64::from(a) + f64::from(b)) / 2.0;
        prop_assert!((out[0].value - mean).abs() < 0.005 + 1e-9);
    }

    /// With unequal weights the result leans toward the heavier row.
    #[test]
    fn heavier_row_pulls_the_mean(
        light in 0u32..100,
        heavy in 0u32..100,
        w_light in 1u32..50,
        extra in 1u32..50,
    ) {
        let w_heavy = w_light + extra;
        let rows = [
            (f64::from(light), f64::from(w_light)),
            (f64::from(heavy), f64::from(w_heavy)),
        ];
        let out = aggregate(&rows, |_| 0u8, |r| r.0, |r| r.1, MetricKind::Rate, 2);
        let v = out[0].value;
        let (lo, hi) = (light.min(heavy) as f64, light.max(heavy) as f64);
        prop_assert!(v >= lo - 0.005 && v <= hi + 0.005);
        prop_assert!((v - f64::from(heavy)).abs() <= (v - f64::from(light)).abs() + 0.01);
    }

    /// Top-N keeps the N best scores, sorted, and drops nothing better.
    #[test]
    fn top_n_keeps_best_scores(scores in vec(0u32..1000, 0..40), n in 1usize..20) {
        let rows: Vec<(usize, f64)> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| (i, f64::from(*s)))
            .collect();
        let kept = top_n(rows.clone(), TopN::Top(n), |r| r.1);

        prop_assert_eq!(kept.len(), n.min(rows.len()));
        prop_assert!(kept.windows(2).all(|w| w[0].1 >= w[1].1));
        if let Some(worst_kept) = kept.last() {
            for r in rows.iter().filter(|r| !kept.contains(r)) {
                prop_assert!(r.1 <= worst_kept.1);
            }
        }
    }
}
