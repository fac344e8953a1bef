use super::YawFilter;
use std::collections::VecDeque;

/// Median filter
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MedianFilter {
    /// Create a new median filter over `window_size` samples
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn calculate_median(values: &VecDeque<f64>) -> f64 {
        let mut sorted: Vec<f64> = values.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);

        let len = sorted.len();
        if len == 0 {
            0.0
        } else if len % 2 == 0 {
            (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
        } else {
            sorted[len / 2]
        }
    }
}

impl YawFilter for MedianFilter {
    fn apply(&mut self, yaw: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(yaw);

        Self::calculate_median(&self.buffer)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MedianFilter"
    }
}
