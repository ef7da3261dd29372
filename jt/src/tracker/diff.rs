//! Change detection between successive checkpoint snapshots
//!
//! `total` is the only field that decides whether progress happened. The
//! other counters move around without net progress (an in-progress
//! checkpoint turning into a failed one changes two of them but not
//! `total`), so gating on them would produce spurious notifications.
//! A decreasing `total` is still a change: the upstream counter is not
//! guaranteed to be monotonic.

use tracing::debug;

use crate::domain::ProgressSnapshot;

/// Result of comparing a fetched snapshot against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First successful fetch of the session; becomes the baseline silently
    EstablishBaseline(ProgressSnapshot),
    /// `total` did not move
    Unchanged,
    /// `total` moved; becomes the baseline and is emitted in full
    Changed(ProgressSnapshot),
}

/// Compare `current` against `baseline`
pub fn evaluate(baseline: Option<&ProgressSnapshot>, current: ProgressSnapshot) -> Outcome {
    let Some(baseline) = baseline else {
        debug!(total = current.total, "evaluate: no baseline yet");
        return Outcome::EstablishBaseline(current);
    };

    if baseline.total_differs(&current) {
        debug!(old_total = baseline.total, new_total = current.total, "evaluate: total changed");
        Outcome::Changed(current)
    } else {
        Outcome::Unchanged
    }
}

/// Last accepted snapshot of a tracking session
///
/// Owned by the session's tick loop and never shared.
#[derive(Debug, Default)]
pub struct Baseline {
    current: Option<ProgressSnapshot>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ProgressSnapshot> {
        self.current.as_ref()
    }

    /// Evaluate `snapshot` and apply the outcome to the baseline
    pub fn observe(&mut self, snapshot: ProgressSnapshot) -> Outcome {
        let outcome = evaluate(self.current(), snapshot);
        self.accept(&outcome);
        outcome
    }

    /// Apply an outcome produced by [`evaluate`]
    pub fn accept(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::EstablishBaseline(snapshot) | Outcome::Changed(snapshot) => {
                self.current = Some(*snapshot);
            }
            Outcome::Unchanged => {}
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snap(completed: u64, total: u64) -> ProgressSnapshot {
        ProgressSnapshot::new(completed, 5, 6, 7, total)
    }

    #[test]
    fn test_first_snapshot_establishes_baseline() {
        let outcome = evaluate(None, snap(0, 0));
        assert_eq!(outcome, Outcome::EstablishBaseline(snap(0, 0)));
    }

    #[test]
    fn test_same_total_is_unchanged() {
        let baseline = snap(0, 3);
        // completed moved but total did not
        let current = ProgressSnapshot::new(2, 1, 0, 0, 3);
        assert_eq!(evaluate(Some(&baseline), current), Outcome::Unchanged);
    }

    #[test]
    fn test_total_increase_is_changed() {
        let baseline = snap(0, 0);
        assert_eq!(evaluate(Some(&baseline), snap(1, 1)), Outcome::Changed(snap(1, 1)));
    }

    #[test]
    fn test_total_regression_is_changed() {
        let baseline = snap(4, 4);
        assert_eq!(evaluate(Some(&baseline), snap(0, 0)), Outcome::Changed(snap(0, 0)));
    }

    #[test]
    fn test_baseline_observe_sequence() {
        let mut baseline = Baseline::new();
        assert!(baseline.current().is_none());

        assert_eq!(baseline.observe(snap(0, 0)), Outcome::EstablishBaseline(snap(0, 0)));
        assert_eq!(baseline.current(), Some(&snap(0, 0)));

        assert_eq!(baseline.observe(snap(0, 0)), Outcome::Unchanged);
        assert_eq!(baseline.observe(snap(1, 1)), Outcome::Changed(snap(1, 1)));
        assert_eq!(baseline.current(), Some(&snap(1, 1)));

        // No duplicate after the change has been reported
        assert_eq!(baseline.observe(snap(1, 1)), Outcome::Unchanged);
        assert_eq!(baseline.observe(ProgressSnapshot::new(0, 2, 0, 0, 1)), Outcome::Unchanged);
        assert_eq!(baseline.current(), Some(&snap(1, 1)));
    }

    #[test]
    fn test_unchanged_does_not_overwrite_other_fields() {
        let mut baseline = Baseline::new();
        baseline.observe(ProgressSnapshot::new(1, 0, 0, 0, 1));
        baseline.observe(ProgressSnapshot::new(0, 1, 0, 0, 1));
        assert_eq!(baseline.current(), Some(&ProgressSnapshot::new(1, 0, 0, 0, 1)));
    }

    #[test]
    fn test_clear_forgets_baseline() {
        let mut baseline = Baseline::new();
        baseline.observe(snap(3, 3));
        baseline.clear();
        assert_eq!(baseline.observe(snap(3, 3)), Outcome::EstablishBaseline(snap(3, 3)));
    }

    fn any_snapshot() -> impl Strategy<Value = ProgressSnapshot> {
        (0u64..50, 0u64..50, 0u64..50, 0u64..50, 0u64..8)
            .prop_map(|(c, f, i, r, t)| ProgressSnapshot::new(c, f, i, r, t))
    }

    proptest! {
        #[test]
        fn prop_changed_iff_total_differs(a in any_snapshot(), b in any_snapshot()) {
            let outcome = evaluate(Some(&a), b);
            if a.total != b.total {
                prop_assert_eq!(outcome, Outcome::Changed(b));
            } else {
                prop_assert_eq!(outcome, Outcome::Unchanged);
            }
        }

        #[test]
        fn prop_emissions_match_total_transitions(seq in proptest::collection::vec(any_snapshot(), 1..40)) {
            let mut baseline = Baseline::new();
            let mut emitted = Vec::new();
            for s in &seq {
                if let Outcome::Changed(changed) = baseline.observe(*s) {
                    emitted.push(changed);
                }
            }

            // Expected: every snapshot whose total differs from the last accepted total
            let mut expected = Vec::new();
            let mut last_total = seq[0].total;
            for s in &seq[1..] {
                if s.total != last_total {
                    expected.push(*s);
                    last_total = s.total;
                }
            }
            prop_assert_eq!(emitted, expected);
        }
    }
}
