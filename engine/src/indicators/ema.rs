// Exponentially weighted mean used to smooth RSI gains and losses.

/// Exponentially weighted mean with adjusted weights: the value at `t` is
/// `sum((1-alpha)^i * x[t-i]) / sum((1-alpha)^i)` over the observations seen
/// so far. Missing values contribute nothing but still age older weights.
/// Positions with fewer than `min_periods` observations are `None`.
pub fn ewm_mean(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let decay = 1.0 - alpha;
    let mut results = Vec::with_capacity(values.len());
    let mut weighted: Option<f64> = None;
    let mut old_weight = 1.0;
    let mut observations = 0usize;

    for value in values {
        if value.is_some() {
            observations += 1;
        }
        weighted = match (weighted, *value) {
            (Some(prev), Some(current)) => {
                old_weight *= decay;
                let next = (old_weight * prev + current) / (old_weight + 1.0);
                old_weight += 1.0;
                Some(next)
            }
            (Some(prev), None) => {
                old_weight *= decay;
                Some(prev)
            }
            (None, current) => current,
        };
        results.push(if observations >= min_periods.max(1) { weighted } else { None });
    }
    results
}

/// Smoothing factor for a center of mass: `alpha = 1 / (1 + com)`.
pub fn alpha_from_com(com: f64) -> f64 {
    1.0 / (1.0 + com)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_ewm_matches_closed_form() {
        // alpha = 0.5: weights 1, 0.5, 0.25 from newest to oldest
        let values = vec![Some(1.0), Some(0.0), Some(2.0)];
        let results = ewm_mean(&values, 0.5, 1);
        assert!(close(results[0], 1.0));
        assert!(close(results[1], 0.5 / 1.5));
        assert!(close(results[2], 2.25 / 1.75));
    }

    #[test]
    fn test_ewm_min_periods() {
        let values = vec![None, Some(1.0), Some(1.0), Some(1.0)];
        let results = ewm_mean(&values, 0.5, 3);
        assert_eq!(results[..3], [None, None, None]);
        assert!(close(results[3], 1.0));
    }

    #[test]
    fn test_ewm_missing_value_ages_weights() {
        // The gap still decays the first observation: (4 + 0.25 * 0) / (1 + 0.25)
        let values = vec![Some(0.0), None, Some(4.0)];
        let results = ewm_mean(&values, 0.5, 1);
        assert!(close(results[1], 0.0));
        assert!(close(results[2], 4.0 / 1.25));
    }

    #[test]
    fn test_alpha_from_com() {
        assert!((alpha_from_com(13.0) - 1.0 / 14.0).abs() < 1e-12);
    }
}
