//! Configuration management for the capture pipeline

use crate::{
    constants::{
        DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_FILTER_WINDOW, DEFAULT_HAMPEL_THRESHOLD, DEFAULT_STILLNESS_STD_DEV,
        DEFAULT_STILLNESS_WINDOW, DEFAULT_YAW_THRESHOLD_DEGREES,
    },
    filters::{build_filter, FilterParams, YawFilter},
    movement_detector::MovementDetector,
    normalizer::FrameNormalizer,
    pose_classifier::PoseClassifier,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capture configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Yaw classification
    pub classifier: ClassifierConfig,

    /// Yaw smoothing before classification
    pub filter: FilterConfig,

    /// Optional stillness gate
    pub stillness: StillnessConfig,

    /// Frame normalization
    pub normalizer: NormalizerConfig,
}

/// Yaw classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Degrees of yaw separating centered from turned
    pub threshold_degrees: f64,
}

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter type (none, moving_average, median, exponential, hampel; aliases as in `create_filter`)
    pub kind: String,

    /// Window size for window-based filters
    pub window: usize,

    /// Exponential filter alpha value
    pub alpha: f64,

    /// Hampel filter threshold
    pub hampel_threshold: f64,
}

/// Stillness gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StillnessConfig {
    /// Hold acceptance until the head is still
    pub enabled: bool,

    /// Number of yaw samples to judge stillness over
    pub window_size: usize,

    /// Maximum yaw standard deviation, in degrees, that counts as still
    pub std_dev_threshold: f64,
}

/// Frame normalization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Mirror captures horizontally after rotating them upright
    pub mirror: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold_degrees: DEFAULT_YAW_THRESHOLD_DEGREES,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "none".to_string(),
            window: DEFAULT_FILTER_WINDOW,
            alpha: DEFAULT_EXPONENTIAL_ALPHA,
            hampel_threshold: DEFAULT_HAMPEL_THRESHOLD,
        }
    }
}

impl Default for StillnessConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_size: DEFAULT_STILLNESS_WINDOW,
            std_dev_threshold: DEFAULT_STILLNESS_STD_DEV,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the pose classifier
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is invalid
    pub fn create_classifier(&self) -> Result<PoseClassifier> {
        PoseClassifier::new(self.classifier.threshold_degrees)
    }

    /// Build the yaw filter
    ///
    /// # Errors
    ///
    /// Returns `FilterError` for unknown kinds or invalid parameters
    pub fn create_filter(&self) -> Result<Box<dyn YawFilter>> {
        build_filter(
            &self.filter.kind,
            &FilterParams {
                window: self.filter.window,
                alpha: self.filter.alpha,
                hampel_threshold: self.filter.hampel_threshold,
            },
        )
    }

    /// Build the stillness gate, if enabled
    #[must_use]
    pub fn create_stillness_gate(&self) -> Option<MovementDetector> {
        self.stillness
            .enabled
            .then(|| MovementDetector::new(self.stillness.window_size, self.stillness.std_dev_threshold))
    }

    /// Build the frame normalizer
    #[must_use]
    pub fn create_normalizer(&self) -> FrameNormalizer {
        FrameNormalizer::new(self.normalizer.mirror)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classifier.threshold_degrees;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Yaw threshold must be finite and positive, got {threshold}"
            )));
        }

        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid filter settings: {e}")))?;

        if self.stillness.enabled {
            if self.stillness.window_size == 0 {
                return Err(Error::ConfigError(
                    "Stillness window size must be greater than 0".to_string(),
                ));
            }
            if !self.stillness.std_dev_threshold.is_finite() || self.stillness.std_dev_threshold < 0.0 {
                return Err(Error::ConfigError(
                    "Stillness threshold must be finite and non-negative".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Capture Configuration

# Yaw classification
classifier:
  threshold_degrees: 15.0

# Yaw smoothing (none, moving_average, median, exponential, hampel)
filter:
  kind: "none"
  window: 5
  alpha: 0.5
  hampel_threshold: 3.0

# Hold captures until the head stops moving
stillness:
  enabled: false
  window_size: 5
  std_dev_threshold: 2.0

# Frame normalization
normalizer:
  mirror: false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.create_stillness_gate().is_none());
        assert_eq!(config.create_filter().unwrap().name(), "NoFilter");
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.threshold_degrees, 15.0);
        assert_eq!(config.filter.window, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("filter:\n  kind: median\n  window: 3\n").unwrap();
        assert_eq!(config.filter.kind, "median");
        assert_eq!(config.filter.alpha, DEFAULT_EXPONENTIAL_ALPHA);
        assert_eq!(config.classifier.threshold_degrees, DEFAULT_YAW_THRESHOLD_DEGREES);
        assert_eq!(config.create_filter().unwrap().name(), "MedianFilter");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::default();
        config.classifier.threshold_degrees = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.kind = "kalman".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.kind = "hampel".to_string();
        config.filter.window = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stillness.enabled = true;
        config.stillness.window_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_aliases_match_descriptions() {
        for kind in ["nofilter", "movingaverage", "MovingAverage", "Median"] {
            let mut config = Config::default();
            config.filter.kind = kind.to_string();
            assert!(config.validate().is_ok(), "{kind}");
            assert!(crate::filters::create_filter(kind).is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml("classifier: [1, 2"),
            Err(Error::ConfigError(_))
        ));
    }
}
