//! Pause-duration reconciliation.
//!
//! After speech has been synthesized its real length is known. If the
//! voice runs short of the target session length, the remaining time is
//! spread evenly over the pauses. Speech is never compressed.

/// Tolerance under which a reconciled pause counts as unchanged.
const UNCHANGED_EPSILON: f64 = 1e-3;

/// Outcome of reconciling pause durations against a target length.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Final pause durations in script order.
    pub pauses: Vec<f64>,
    /// Seconds the session will fall short of its target.
    pub shortfall: f64,
}

impl Reconciliation {
    /// Positions (among pauses) whose duration differs from `declared`.
    pub fn changed(&self, declared: &[f64]) -> Vec<usize> {
        self.pauses
            .iter()
            .zip(declared)
            .enumerate()
            .filter(|(_, (new, old))| (*new - *old).abs() > UNCHANGED_EPSILON)
            .map(|(position, _)| position)
            .collect()
    }
}

/// Redistribute slack between measured speech and `target_total` over the pauses.
pub fn reconcile_pauses(speech_actual: &[f64], declared_pauses: &[f64], target_total: f64) -> Reconciliation {
    let speech_total: f64 = speech_actual.iter().sum();

    if speech_total >= target_total {
        return Reconciliation {
            pauses: declared_pauses.to_vec(),
            shortfall: 0.0,
        };
    }

    let remaining = target_total - speech_total;
    if declared_pauses.is_empty() {
        return Reconciliation {
            pauses: Vec::new(),
            shortfall: remaining,
        };
    }

    let each = remaining / declared_pauses.len() as f64;
    Reconciliation {
        pauses: vec![each; declared_pauses.len()],
        shortfall: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack_is_split_evenly() {
        let result = reconcile_pauses(&[60.0, 40.0], &[10.0, 90.0], 150.0);
        assert_eq!(result.pauses, vec![25.0, 25.0]);
        assert_eq!(result.shortfall, 0.0);
        assert_eq!(result.changed(&[10.0, 90.0]), vec![0, 1]);
    }

    #[test]
    fn test_long_speech_leaves_pauses_untouched() {
        let result = reconcile_pauses(&[200.0], &[30.0, 45.0], 150.0);
        assert_eq!(result.pauses, vec![30.0, 45.0]);
        assert!(result.changed(&[30.0, 45.0]).is_empty());
    }

    #[test]
    fn test_exact_fit_leaves_pauses_untouched() {
        let result = reconcile_pauses(&[150.0], &[20.0], 150.0);
        assert_eq!(result.pauses, vec![20.0]);
    }

    #[test]
    fn test_no_pauses_records_shortfall() {
        let result = reconcile_pauses(&[100.0], &[], 150.0);
        assert!(result.pauses.is_empty());
        assert_eq!(result.shortfall, 50.0);
    }

    #[test]
    fn test_matching_declared_pause_is_unchanged() {
        let result = reconcile_pauses(&[90.0], &[60.0], 150.0);
        assert_eq!(result.pauses, vec![60.0]);
        assert!(result.changed(&[60.0]).is_empty());
    }
}
