use super::YawFilter;

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// Create a new exponential filter
    ///
    /// # Panics
    ///
    /// Panics unless `alpha` is in (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }
}

impl YawFilter for ExponentialFilter {
    fn apply(&mut self, yaw: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => self.alpha * yaw + (1.0 - self.alpha) * last,
            None => yaw,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value passes through
        assert_eq!(filter.apply(10.0), 10.0);

        // Second value is smoothed
        assert_eq!(filter.apply(20.0), 15.0); // 0.5 * 20 + 0.5 * 10
    }

    #[test]
    fn test_alpha_bounds() {
        // High alpha = less smoothing
        let mut filter1 = ExponentialFilter::new(0.9);
        filter1.apply(10.0);
        assert!((filter1.apply(20.0) - 19.0).abs() < 0.001);

        // Low alpha = more smoothing
        let mut filter2 = ExponentialFilter::new(0.1);
        filter2.apply(10.0);
        assert!((filter2.apply(20.0) - 11.0).abs() < 0.001);
    }
}
