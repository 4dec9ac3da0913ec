// Least-squares trendline fitting

/// One metric reading at a position in the date-ascending entry sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedSample {
    pub position: usize,
    pub value: f64,
}

impl IndexedSample {
    pub fn new(position: usize, value: f64) -> Self {
        Self { position, value }
    }
}

/// A fitted line `value = slope * position + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
}

impl Trendline {
    pub fn value_at(&self, position: usize) -> f64 {
        self.slope * position as f64 + self.intercept
    }
}

/// Ordinary least-squares fit over the samples.
///
/// Fewer than two samples gives a flat line at the single value (or 0 when
/// empty). When every position is the same the line is flat at the mean.
/// Samples are summed in position order so any permutation of the same
/// input produces the same result.
pub fn fit_trend(samples: &[IndexedSample]) -> Trendline {
    let n = samples.len();
    if n < 2 {
        return Trendline {
            slope: 0.0,
            intercept: samples.first().map(|s| s.value).unwrap_or(0.0),
        };
    }

    let mut ordered = samples.to_vec();
    ordered.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.value.total_cmp(&b.value))
    });

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for sample in &ordered {
        let x = sample.position as f64;
        sum_x += x;
        sum_y += sample.value;
        sum_xy += x * sample.value;
        sum_xx += x * x;
    }

    let n = n as f64;
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Trendline {
            slope: 0.0,
            intercept: sum_y / n,
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Trendline { slope, intercept }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(pairs: &[(usize, f64)]) -> Vec<IndexedSample> {
        pairs.iter().map(|&(p, v)| IndexedSample::new(p, v)).collect()
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(fit_trend(&[]), Trendline { slope: 0.0, intercept: 0.0 });
        assert_eq!(
            fit_trend(&samples(&[(4, 82.5)])),
            Trendline { slope: 0.0, intercept: 82.5 }
        );
    }

    #[test]
    fn test_perfect_line() {
        let fit = fit_trend(&samples(&[(0, 1.0), (1, 2.0), (2, 3.0)]));
        assert_eq!(fit.slope, 1.0);
        assert_eq!(fit.intercept, 1.0);
        assert_eq!(fit.value_at(5), 6.0);
    }

    #[test]
    fn test_constant_values_are_flat() {
        let fit = fit_trend(&samples(&[(0, 5.0), (1, 5.0), (2, 5.0), (3, 5.0)]));
        assert_eq!(fit, Trendline { slope: 0.0, intercept: 5.0 });

        let sparse = fit_trend(&samples(&[(1, 22.0), (4, 22.0), (9, 22.0)]));
        assert_eq!(sparse.slope, 0.0);
        assert_eq!(sparse.intercept, 22.0);
    }

    #[test]
    fn test_identical_positions_use_mean() {
        let fit = fit_trend(&samples(&[(2, 10.0), (2, 20.0), (2, 30.0)]));
        assert_eq!(fit, Trendline { slope: 0.0, intercept: 20.0 });
    }

    #[test]
    fn test_order_invariance() {
        let forward = samples(&[(0, 80.1), (1, 79.7), (3, 79.9), (6, 78.4), (7, 78.8)]);
        let mut shuffled = forward.clone();
        shuffled.reverse();
        shuffled.swap(1, 3);

        assert_eq!(fit_trend(&forward), fit_trend(&shuffled));
    }

    #[test]
    fn test_noisy_fit() {
        // y = 2x + 1 with symmetric noise
        let fit = fit_trend(&samples(&[(0, 1.5), (1, 2.5), (2, 5.5), (3, 6.5)]));
        assert!((fit.slope - 1.8).abs() < 1e-12);
        assert!((fit.intercept - 1.3).abs() < 1e-12);
    }
}
