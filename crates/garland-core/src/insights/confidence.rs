//! Confidence estimation for holiday insights
//!
//! A coarse usability signal, not a statistical test: enough samples with
//! consistent percent-changes reads as "high", enough samples with scattered
//! changes as "medium", and anything thinner as "low".

use crate::models::Confidence;

/// Variance cutoff between "high" and "medium" for 3+ samples.
/// Product heuristic; changing it changes every cached confidence label.
const VARIANCE_THRESHOLD: f64 = 0.1;

/// Label the confidence of a set of historical percent-changes
///
/// Uses population variance (divide by n, not n-1).
pub fn estimate_confidence(sample_count: usize, pct_changes: &[f64]) -> Confidence {
    if sample_count >= 3 {
        let n = sample_count as f64;
        let mean = pct_changes.iter().sum::<f64>() / n;
        let variance = pct_changes.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        if variance <= VARIANCE_THRESHOLD {
            return Confidence::High;
        }
        return Confidence::Medium;
    }
    if sample_count >= 2 {
        return Confidence::Medium;
    }
    Confidence::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_changes_are_high() {
        // Population variance of these is ~0.00007
        let changes = [0.10, 0.12, 0.11];
        assert_eq!(estimate_confidence(3, &changes), Confidence::High);
    }

    #[test]
    fn test_scattered_changes_are_medium() {
        // Population variance here exceeds the 0.1 cutoff
        let changes = [0.05, 0.40, -0.10];
        assert_eq!(estimate_confidence(3, &changes), Confidence::Medium);
    }

    #[test]
    fn test_two_samples_are_medium_regardless_of_spread() {
        assert_eq!(estimate_confidence(2, &[0.9, -0.9]), Confidence::Medium);
        assert_eq!(estimate_confidence(2, &[0.1, 0.1]), Confidence::Medium);
    }

    #[test]
    fn test_thin_history_is_low() {
        assert_eq!(estimate_confidence(1, &[0.5]), Confidence::Low);
        assert_eq!(estimate_confidence(0, &[]), Confidence::Low);
    }

    #[test]
    fn test_changes_either_side_of_the_cutoff() {
        // Population variance 0.06 -> high
        assert_eq!(
            estimate_confidence(3, &[0.0, 0.3, 0.6]),
            Confidence::High
        );
        // Population variance ~0.107 -> medium
        assert_eq!(
            estimate_confidence(3, &[0.0, 0.4, 0.8]),
            Confidence::Medium
        );
    }
}
