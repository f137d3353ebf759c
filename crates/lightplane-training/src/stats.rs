//! Summary statistics for populations and simulation runs.

use serde::Serialize;

/// Descriptive statistics of a set of `f32` samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Middle value; the mean of the two middle values for even counts.
    pub median: f32,
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or `0.0` when every sample is (nearly) equal.
    ///
    /// Tracks how much a gene has converged across a population regardless
    /// of its range.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics of unsorted samples, or `None` if there are none.
    ///
    /// ```
    /// use lightplane_training::stats::DescriptiveStats;
    ///
    /// let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 4.0);
    /// assert_eq!(stats.mean, 2.5);
    /// assert_eq!(stats.median, 2.5);
    /// assert!(DescriptiveStats::new(Vec::new()).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics of samples already sorted ascending.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f32]) -> Option<Self> {
        debug_assert!(sorted.is_sorted_by(|a, b| a <= b));

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let count = sorted.len();
        let n = count as f32;
        let mean = sorted.iter().sum::<f32>() / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            f32::midpoint(sorted[mid - 1], sorted[mid])
        } else {
            sorted[mid]
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        let std_dev = variance.sqrt();
        let range = max - min;
        let normalized_std_dev = if range <= mean.abs() * f32::EPSILON {
            0.0
        } else {
            std_dev / range
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
            normalized_std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_odd_count_median_is_middle() {
        let stats = DescriptiveStats::new([5.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.median - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_constant_samples_have_zero_spread() {
        let stats = DescriptiveStats::new([0.7; 5]).unwrap();
        assert!(stats.std_dev.abs() < 1e-6);
        assert!(stats.normalized_std_dev.abs() < f32::EPSILON);
    }

    #[test]
    fn test_std_dev_and_normalized() {
        // population std dev of [0, 2, 4] is sqrt(8/3)
        let stats = DescriptiveStats::new([0.0, 2.0, 4.0]).unwrap();
        let expected = (8.0_f32 / 3.0).sqrt();
        assert!((stats.std_dev - expected).abs() < 1e-5);
        assert!((stats.normalized_std_dev - expected / 4.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn test_summary_stays_within_sample_range(
            samples in prop::collection::vec(-1000_i16..1000, 1..50),
        ) {
            let values = samples.iter().map(|v| f32::from(*v)).collect::<Vec<_>>();
            let stats = DescriptiveStats::new(values.iter().copied()).unwrap();
            prop_assert_eq!(stats.count, values.len());
            prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
            prop_assert!(stats.mean >= stats.min - 1e-3 && stats.mean <= stats.max + 1e-3);
            prop_assert!((0.0..=0.5 + 1e-4).contains(&stats.normalized_std_dev));
        }
    }
}
