//! Constants used throughout the capture pipeline

/// Yaw threshold separating a centered head from a turned one, in degrees
pub const DEFAULT_YAW_THRESHOLD_DEGREES: f64 = 15.0;

/// Number of orientations a session must capture
pub const ORIENTATION_COUNT: usize = 3;

/// Instruction shown while waiting for a centered face
pub const INSTRUCTION_CENTER: &str = "Keep your head straight";

/// Instruction shown while waiting for a left turn
pub const INSTRUCTION_LEFT: &str = "Turn your face to the left";

/// Instruction shown while waiting for a right turn
pub const INSTRUCTION_RIGHT: &str = "Turn your face to the right";

/// Instruction shown once every orientation is captured
pub const INSTRUCTION_COMPLETE: &str = "Face capture complete";

/// Default filter parameters
pub const DEFAULT_FILTER_WINDOW: usize = 5;
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_HAMPEL_WINDOW: usize = 5;
pub const DEFAULT_HAMPEL_THRESHOLD: f64 = 3.0;

/// Stillness gate defaults
pub const DEFAULT_STILLNESS_WINDOW: usize = 5;
pub const DEFAULT_STILLNESS_STD_DEV: f64 = 2.0;

/// Fully transparent RGBA pixel written outside the circular mask
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Bytes per RGBA8 pixel
pub const RGBA_CHANNELS: usize = 4;

/// Bytes per RGB8 pixel
pub const RGB_CHANNELS: usize = 3;
