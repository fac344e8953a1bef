//! Yaw smoothing filters.
//!
//! Per-frame yaw from a landmark detector jitters by a few degrees, which can
//! make a head resting near the threshold flip between accept and reject.
//! These filters smooth the yaw stream before classification.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

/// Hampel filter for robust outlier detection and smoothing
pub mod hampel;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_FILTER_WINDOW, DEFAULT_HAMPEL_THRESHOLD, DEFAULT_HAMPEL_WINDOW},
    Error, Result,
};

/// Trait for all yaw filters
pub trait YawFilter: Send + Sync {
    /// Feed one yaw sample and get the smoothed value
    fn apply(&mut self, yaw: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl YawFilter for NoFilter {
    fn apply(&mut self, yaw: f64) -> f64 {
        yaw
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Settings shared by every filter kind; each kind reads the ones it needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Window size for window-based filters
    pub window: usize,
    /// Exponential filter alpha
    pub alpha: f64,
    /// Hampel outlier threshold
    pub hampel_threshold: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_FILTER_WINDOW,
            alpha: DEFAULT_EXPONENTIAL_ALPHA,
            hampel_threshold: DEFAULT_HAMPEL_THRESHOLD,
        }
    }
}

/// Canonical filter kind for a name or alias
fn canonical_kind(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "none" | "nofilter" => Some("none"),
        "moving_average" | "movingaverage" => Some("moving_average"),
        "median" => Some("median"),
        "exponential" => Some("exponential"),
        "hampel" => Some("hampel"),
        _ => None,
    }
}

/// Build a filter of `kind` (any accepted name or alias) from `params`
///
/// # Errors
///
/// Returns `FilterError` for unknown kinds or out-of-range parameters
pub fn build_filter(kind: &str, params: &FilterParams) -> Result<Box<dyn YawFilter>> {
    match canonical_kind(kind) {
        Some("none") => Ok(Box::new(NoFilter)),
        Some("moving_average") => build_moving_average(params.window),
        Some("median") => build_median(params.window),
        Some("exponential") => build_exponential(params.alpha),
        Some("hampel") => build_hampel(params.window, params.hampel_threshold),
        _ => Err(Error::FilterError(format!("Unknown filter type: {kind}"))),
    }
}

/// Create a yaw filter from a `name[:param[:param]]` description
///
/// Recognised forms: `none`, `moving_average[:window]`, `median[:window]`,
/// `exponential[:alpha]`, `hampel[:window[:threshold]]`.
///
/// # Errors
///
/// Returns `FilterError` for unknown names, malformed or out-of-range parameters
pub fn create_filter(description: &str) -> Result<Box<dyn YawFilter>> {
    let mut parts = description.split(':');
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.map(str::trim).collect();

    let kind = canonical_kind(name)
        .ok_or_else(|| Error::FilterError(format!("Unknown filter type: {description}")))?;
    let mut params = FilterParams {
        window: if kind == "hampel" { DEFAULT_HAMPEL_WINDOW } else { DEFAULT_FILTER_WINDOW },
        ..FilterParams::default()
    };
    match kind {
        "none" => expect_params(kind, &args, 0)?,
        "exponential" => {
            expect_params(kind, &args, 1)?;
            params.alpha = parse_param(&args, 0, params.alpha)?;
        }
        "hampel" => {
            expect_params(kind, &args, 2)?;
            params.window = parse_param(&args, 0, params.window)?;
            params.hampel_threshold = parse_param(&args, 1, params.hampel_threshold)?;
        }
        _ => {
            expect_params(kind, &args, 1)?;
            params.window = parse_param(&args, 0, params.window)?;
        }
    }
    build_filter(kind, &params)
}

/// Validated moving average constructor
///
/// # Errors
///
/// Returns `FilterError` if the window is zero
pub fn build_moving_average(window: usize) -> Result<Box<dyn YawFilter>> {
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
}

/// Validated median constructor
///
/// # Errors
///
/// Returns `FilterError` if the window is zero
pub fn build_median(window: usize) -> Result<Box<dyn YawFilter>> {
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(Box::new(median::MedianFilter::new(window)))
}

/// Validated exponential constructor
///
/// # Errors
///
/// Returns `FilterError` unless alpha is in (0, 1]
pub fn build_exponential(alpha: f64) -> Result<Box<dyn YawFilter>> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
    }
    Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
}

/// Validated Hampel constructor
///
/// # Errors
///
/// Returns `FilterError` if the window is zero or even, or the threshold is negative
pub fn build_hampel(window: usize, threshold: f64) -> Result<Box<dyn YawFilter>> {
    if window == 0 || window % 2 == 0 {
        return Err(Error::FilterError(format!(
            "Window size must be odd and greater than 0, got {window}"
        )));
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(Error::FilterError(format!(
            "Threshold must be non-negative, got {threshold}"
        )));
    }
    Ok(Box::new(hampel::HampelFilter::new(window, threshold)))
}

fn expect_params(name: &str, params: &[&str], max: usize) -> Result<()> {
    if params.len() > max {
        return Err(Error::FilterError(format!(
            "Filter {name} takes at most {max} parameters, got {}",
            params.len()
        )));
    }
    Ok(())
}

fn parse_param<T: std::str::FromStr>(params: &[&str], index: usize, default: T) -> Result<T> {
    match params.get(index) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid filter parameter: {raw}"))),
    }
}
