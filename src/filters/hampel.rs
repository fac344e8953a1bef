use super::YawFilter;
use std::collections::VecDeque;

/// Scale factor turning a median absolute deviation into a standard deviation estimate
const MAD_SCALE: f64 = 1.4826;

/// Hampel filter for outlier removal
pub struct HampelFilter {
    window_size: usize,
    threshold: f64,
    buffer: VecDeque<f64>,
}

impl HampelFilter {
    /// Create a new Hampel filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is not odd or is zero, or if threshold is negative
    #[must_use]
    pub fn new(window_size: usize, threshold: f64) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Window size must be odd, got {}", window_size);
        assert!(threshold >= 0.0, "Threshold must be non-negative, got {}", threshold);
        Self {
            window_size,
            threshold,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn median(sorted: &[f64]) -> f64 {
        let len = sorted.len();
        if len % 2 == 0 {
            (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
        } else {
            sorted[len / 2]
        }
    }

    fn hampel(values: &VecDeque<f64>, new_value: f64, threshold: f64) -> f64 {
        if values.is_empty() {
            return new_value;
        }

        let mut sorted: Vec<f64> = values.iter().copied().collect();
        sorted.push(new_value);
        sorted.sort_by(f64::total_cmp);
        let median = Self::median(&sorted);

        let mut deviations: Vec<f64> = sorted.iter().map(|&x| (x - median).abs()).collect();
        deviations.sort_by(f64::total_cmp);
        let sigma = MAD_SCALE * Self::median(&deviations);

        if (new_value - median).abs() > threshold * sigma {
            median
        } else {
            new_value
        }
    }
}

impl YawFilter for HampelFilter {
    fn apply(&mut self, yaw: f64) -> f64 {
        let filtered = Self::hampel(&self.buffer, yaw, self.threshold);

        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(filtered);

        filtered
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "HampelFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hampel_filter_normal() {
        let mut filter = HampelFilter::new(5, 3.0);

        // Normal values should pass through
        for val in [10.0, 11.0, 10.5, 11.5, 10.2] {
            assert!((filter.apply(val) - val).abs() < 0.1);
        }
    }

    #[test]
    fn test_hampel_filter_outlier() {
        let mut filter = HampelFilter::new(5, 3.0);

        filter.apply(-2.0);
        filter.apply(-1.0);
        filter.apply(-1.5);
        filter.apply(-0.5);

        // A spurious profile reading is replaced with something near the median
        assert!(filter.apply(-45.0) > -5.0);
    }
}
