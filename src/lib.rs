//! Three-orientation face capture.
//!
//! This library drives a guided face capture: the user holds their head
//! straight, then turns left, then turns right, and one upright circular
//! portrait is kept for each pose. It provides:
//! - A pure yaw classifier with the centered/turned threshold rules
//! - A strictly advancing capture state machine
//! - Frame normalization (rotate upright, crop to a circle)
//! - A write-once capture store
//! - A background frame pipeline that keeps all of the above race-free
//!
//! The face detector is an external collaborator behind [`oracle::FaceOracle`].
//!
//! # Examples
//!
//! ## Driving the state machine directly
//!
//! ```
//! use face_capture::{
//!     capture_state::{CaptureState, PoseReading},
//!     orientation::Orientation,
//!     pose_classifier::PoseClassifier,
//! };
//!
//! let classifier = PoseClassifier::default();
//! let mut state = CaptureState::new();
//!
//! // Turned too far for a centered capture
//! assert!(state.apply(&classifier, &PoseReading::face(20.0)).is_none());
//!
//! let transition = state.apply(&classifier, &PoseReading::face(0.0)).unwrap();
//! assert_eq!(transition.completed, Orientation::Center);
//! assert_eq!(state.current_target(), Some(Orientation::Left));
//! ```
//!
//! ## Running a session through the pipeline
//!
//! ```
//! use face_capture::{
//!     config::Config,
//!     frame::{RawFrame, Rotation},
//!     oracle::ScriptedOracle,
//!     pipeline::FramePipeline,
//!     session::CaptureSession,
//! };
//! use image::RgbaImage;
//! use std::sync::Arc;
//!
//! # fn main() -> face_capture::Result<()> {
//! let session = Arc::new(CaptureSession::new(&Config::default())?);
//! session.start_session();
//!
//! let oracle = Arc::new(ScriptedOracle::from_sequence([Some(0.0), Some(-30.0), Some(30.0)]));
//! let pipeline = FramePipeline::spawn(Arc::clone(&session), oracle)?;
//!
//! for sequence in 0..3 {
//!     let frame = RawFrame::from_rgba(sequence, RgbaImage::new(64, 48), Rotation::Deg90);
//!     pipeline.submit(frame)?;
//!     pipeline.wait_idle();
//! }
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.finished);
//! assert_eq!(snapshot.instruction_text, "Face capture complete");
//! pipeline.shutdown()?;
//! # Ok(())
//! # }
//! ```

/// Head orientations and their capture order
pub mod orientation;

/// Yaw classification against a target orientation
pub mod pose_classifier;

/// Capture state machine
pub mod capture_state;

/// Raw camera frames and pixel format conversion
pub mod frame;

/// Upright circular frame normalization
pub mod normalizer;

/// Write-once per-orientation capture storage
pub mod capture_store;

/// Face detection oracle interface
pub mod oracle;

/// Yaw smoothing filters
pub mod filters;

/// Head stillness detection
pub mod movement_detector;

/// Session state shared with observers
pub mod session;

/// Background frame analysis
pub mod pipeline;

/// Scripted session replays
pub mod replay;

/// Error types and result handling
pub mod error;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
