//! Head stillness detection from the yaw stream.
//!
//! Used as an optional gate in front of the classifier so a capture is only
//! taken once the head has settled, not while it is sweeping through the
//! accept region.

use std::collections::VecDeque;

/// Motion state after the latest sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Not enough samples yet to judge
    Settling,
    /// Yaw spread exceeds the threshold
    Moving,
    /// Yaw spread is within the threshold
    Still,
}

/// Movement detector using a sliding standard deviation
pub struct MovementDetector {
    window_size: usize,
    movement_threshold: f64,
    yaw_history: VecDeque<f64>,
}

impl MovementDetector {
    /// Create a new movement detector
    #[must_use]
    pub fn new(window_size: usize, movement_threshold: f64) -> Self {
        Self {
            window_size,
            movement_threshold,
            yaw_history: VecDeque::with_capacity(window_size),
        }
    }

    /// Feed a yaw sample and classify the current motion
    pub fn update(&mut self, yaw: f64) -> Motion {
        if self.window_size == 0 {
            return Motion::Settling;
        }
        if self.yaw_history.len() >= self.window_size {
            self.yaw_history.pop_front();
        }
        self.yaw_history.push_back(yaw);

        match self.get_stats() {
            None => Motion::Settling,
            Some(stats) if !stats.std_dev.is_finite() || stats.std_dev > self.movement_threshold => Motion::Moving,
            Some(_) => Motion::Still,
        }
    }

    /// Statistics over the current window, once it is full
    #[must_use]
    pub fn get_stats(&self) -> Option<Statistics> {
        if self.window_size == 0 || self.yaw_history.len() < self.window_size {
            return None;
        }
        Some(Self::calculate_stats(&self.yaw_history))
    }

    /// Reset the detector
    pub fn reset(&mut self) {
        self.yaw_history.clear();
    }

    #[allow(clippy::cast_precision_loss)]
    fn calculate_stats(data: &VecDeque<f64>) -> Statistics {
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Statistics {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            range: max - min,
        }
    }
}

/// Statistical summary of a data window
#[derive(Debug, Clone, Copy)]
pub struct Statistics {
    /// Mean value of the data
    pub mean: f64,
    /// Standard deviation of the data
    pub std_dev: f64,
    /// Minimum value in the window
    pub min: f64,
    /// Maximum value in the window
    pub max: f64,
    /// Range (max - min) of the data
    pub range: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settling_until_window_full() {
        let mut detector = MovementDetector::new(3, 1.0);
        assert_eq!(detector.update(0.0), Motion::Settling);
        assert_eq!(detector.update(0.1), Motion::Settling);
        assert_eq!(detector.update(0.2), Motion::Still);
    }

    #[test]
    fn test_sweeping_head_is_moving() {
        let mut detector = MovementDetector::new(3, 1.0);
        detector.update(0.0);
        detector.update(-10.0);
        assert_eq!(detector.update(-20.0), Motion::Moving);

        // settles again once the window only holds the new pose
        detector.update(-20.0);
        detector.update(-20.0);
        assert_eq!(detector.update(-20.0), Motion::Still);
    }

    #[test]
    fn test_non_finite_sample_is_moving() {
        let mut detector = MovementDetector::new(3, 1.0);
        detector.update(f64::NAN);
        detector.update(0.0);
        assert_eq!(detector.update(0.0), Motion::Moving);

        // clears once the sample leaves the window
        assert_eq!(detector.update(0.0), Motion::Still);

        detector.update(f64::INFINITY);
        assert_eq!(detector.update(0.0), Motion::Moving);
    }

    #[test]
    fn test_zero_window_never_settles() {
        let mut detector = MovementDetector::new(0, 1.0);
        assert_eq!(detector.update(1.0), Motion::Settling);
        assert!(detector.get_stats().is_none());
    }

    #[test]
    fn test_statistics_calculation() {
        let data = VecDeque::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);

        let stats = MovementDetector::calculate_stats(&data);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.range, 4.0);
        assert!((stats.std_dev - 1.4142135623730951).abs() < 1e-10);
    }
}
