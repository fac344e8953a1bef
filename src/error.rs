//! Error types for the face capture library.

use crate::orientation::Orientation;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Raw frame buffer is empty, zero-sized or inconsistent with its metadata
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// An image was already recorded for this orientation
    #[error("Duplicate capture for orientation {0}")]
    DuplicateCapture(Orientation),

    /// Face detection oracle reported an error
    #[error("Face oracle failure: {0}")]
    OracleFailure(String),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Frame was submitted after the pipeline shut down
    #[error("Frame pipeline is closed")]
    PipelineClosed,

    /// Frame analysis worker thread panicked
    #[error("Frame analysis worker panicked")]
    WorkerPanicked,
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
