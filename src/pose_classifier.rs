//! Yaw-based alignment verdicts.
//!
//! Yaw is negative when the head turns left and positive when it turns right,
//! matching the mirrored front-camera convention. A centered head accepts the
//! closed interval `[-threshold, threshold]`; the turned orientations need the
//! yaw strictly beyond it, so a reading sitting exactly on the threshold can
//! only ever satisfy `Center`.

use crate::{constants::DEFAULT_YAW_THRESHOLD_DEGREES, orientation::Orientation, Error, Result};

/// Outcome of comparing a yaw reading against a target orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The head matches the target orientation
    Accept,
    /// The head does not match
    Reject,
}

impl Verdict {
    /// Whether this verdict accepts the reading
    #[must_use]
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

/// Classify `yaw_degrees` against `target` using the default 15° threshold
#[must_use]
pub fn classify(target: Orientation, yaw_degrees: f64) -> Verdict {
    classify_with_threshold(target, yaw_degrees, DEFAULT_YAW_THRESHOLD_DEGREES)
}

/// Classify `yaw_degrees` against `target` using an explicit threshold
///
/// NaN never matches any interval and is always rejected.
#[must_use]
pub fn classify_with_threshold(target: Orientation, yaw_degrees: f64, threshold: f64) -> Verdict {
    let accepted = match target {
        Orientation::Center => (-threshold..=threshold).contains(&yaw_degrees),
        Orientation::Left => yaw_degrees < -threshold,
        Orientation::Right => yaw_degrees > threshold,
    };

    if accepted {
        Verdict::Accept
    } else {
        Verdict::Reject
    }
}

/// Pose classifier with a configured threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseClassifier {
    threshold_degrees: f64,
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self {
            threshold_degrees: DEFAULT_YAW_THRESHOLD_DEGREES,
        }
    }
}

impl PoseClassifier {
    /// Create a classifier with a custom threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not finite or not positive
    pub fn new(threshold_degrees: f64) -> Result<Self> {
        if !threshold_degrees.is_finite() || threshold_degrees <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Yaw threshold must be finite and positive, got {threshold_degrees}"
            )));
        }
        Ok(Self { threshold_degrees })
    }

    /// Configured threshold in degrees
    #[must_use]
    pub fn threshold_degrees(&self) -> f64 {
        self.threshold_degrees
    }

    /// Classify a yaw reading against `target`
    #[must_use]
    pub fn classify(&self, target: Orientation, yaw_degrees: f64) -> Verdict {
        classify_with_threshold(target, yaw_degrees, self.threshold_degrees)
    }
}
