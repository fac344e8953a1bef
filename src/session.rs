//! Capture session shared between the analysis worker and observers.
//!
//! All mutable session data lives in one [`SessionCore`] behind a single
//! mutex. The worker decides under the lock, normalizes outside it, then
//! re-checks and commits under the lock again, so two frames accepted for the
//! same target can never both be recorded. Observers only ever see immutable
//! [`SessionSnapshot`]s or [`SessionEvent`]s.

use crate::{
    capture_state::{CaptureState, PoseReading, Transition},
    capture_store::CaptureStore,
    config::Config,
    constants::ORIENTATION_COUNT,
    filters::YawFilter,
    frame::RawFrame,
    movement_detector::{MovementDetector, Motion},
    normalizer::{CapturedImage, FrameNormalizer},
    oracle::{read_pose, FaceOracle},
    orientation::Orientation,
    pose_classifier::PoseClassifier,
    Error, Result,
};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::{
    mpsc::{channel, Receiver, Sender},
    Arc,
};

/// Change notification for observers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new session began and all captures were cleared
    SessionStarted {
        /// Identifier of the new session
        session_id: u64,
    },
    /// Face presence changed
    FaceDetected(bool),
    /// An orientation was captured
    FrameAccepted {
        /// Orientation just captured
        orientation: Orientation,
        /// Instruction to show next
        instruction: &'static str,
        /// The stored capture
        image: Arc<CapturedImage>,
    },
    /// All three orientations are captured
    Finished,
}

/// Immutable view of the session for rendering
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Identifier of the current session
    pub session_id: u64,
    /// Incremented on every observable change
    pub revision: u64,
    /// Instruction for the user
    pub instruction_text: &'static str,
    /// Orientation being waited for, `None` once finished
    pub current_target: Option<Orientation>,
    /// Which orientations are captured, indexed by ordinal
    pub captured: [bool; ORIENTATION_COUNT],
    /// Whether the last analysed frame contained a face
    pub face_detected: bool,
    /// Captured images, indexed by ordinal
    pub images: [Option<Arc<CapturedImage>>; ORIENTATION_COUNT],
    /// Whether the session is complete
    pub finished: bool,
}

impl SessionSnapshot {
    /// Whether `orientation` has been captured
    #[must_use]
    pub fn is_captured(&self, orientation: Orientation) -> bool {
        self.captured[orientation.ordinal()]
    }

    /// Capture for `orientation`, if any
    #[must_use]
    pub fn image(&self, orientation: Orientation) -> Option<&Arc<CapturedImage>> {
        self.images[orientation.ordinal()].as_ref()
    }
}

/// What happened to one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Session already finished; the oracle was not called
    SkippedFinished,
    /// Oracle found no face or failed
    NoFace,
    /// Face found but the stillness gate is holding
    Held,
    /// Face found but the yaw does not match the target
    Rejected,
    /// Frame was captured for this orientation
    Accepted(Orientation),
    /// Frame was accepted but could not be normalized
    Dropped,
    /// Another frame completed this orientation first
    Stale(Orientation),
    /// Store already held this orientation
    Duplicate(Orientation),
}

/// Accepted reading waiting for its normalized image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Orientation the reading satisfied
    pub orientation: Orientation,
    /// Session the decision was taken in
    pub session_id: u64,
    /// Yaw that was classified, after smoothing
    pub yaw_degrees: f64,
}

/// Decision for one reading, before any image work
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Session already finished
    Finished,
    /// No face in the reading
    NoFace,
    /// Stillness gate is holding
    Held,
    /// Yaw rejected for the current target
    Rejected,
    /// Yaw accepted for the current target
    Accept(Candidate),
}

struct SessionCore {
    session_id: u64,
    revision: u64,
    state: CaptureState,
    store: CaptureStore,
    face_detected: bool,
    filter: Box<dyn YawFilter>,
    gate: Option<MovementDetector>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionCore {
    fn notify(&mut self, event: &SessionEvent) {
        self.revision += 1;
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn reset_smoothing(&mut self) {
        self.filter.reset();
        if let Some(gate) = &mut self.gate {
            gate.reset();
        }
    }
}

/// One three-orientation capture session
pub struct CaptureSession {
    core: Mutex<SessionCore>,
    classifier: PoseClassifier,
    normalizer: FrameNormalizer,
}

impl CaptureSession {
    /// Create a session from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            core: Mutex::new(SessionCore {
                session_id: 0,
                revision: 0,
                state: CaptureState::new(),
                store: CaptureStore::new(),
                face_detected: false,
                filter: config.create_filter()?,
                gate: config.create_stillness_gate(),
                subscribers: Vec::new(),
            }),
            classifier: config.create_classifier()?,
            normalizer: config.create_normalizer(),
        })
    }

    /// Clear all captures and start over from `Center`
    pub fn start_session(&self) {
        let mut core = self.core.lock();
        core.session_id += 1;
        core.state = CaptureState::new();
        core.store.reset();
        core.face_detected = false;
        core.reset_smoothing();
        let session_id = core.session_id;
        core.notify(&SessionEvent::SessionStarted { session_id });
        info!("Started capture session {}", session_id);
    }

    /// Register for change notifications
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = channel();
        self.core.lock().subscribers.push(tx);
        rx
    }

    /// Current observable state
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let core = self.core.lock();
        SessionSnapshot {
            session_id: core.session_id,
            revision: core.revision,
            instruction_text: core.state.instruction(),
            current_target: core.state.current_target(),
            captured: core.store.captured_flags(),
            face_detected: core.face_detected,
            images: core.store.slots(),
            finished: core.state.is_finished(),
        }
    }

    /// Whether all orientations are captured
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.core.lock().state.is_finished()
    }

    /// Record a reading and decide whether it completes the current target
    ///
    /// Updates the face indicator, smoothing filter and stillness gate. Never
    /// changes the capture state itself; see [`CaptureSession::commit`].
    pub fn observe(&self, reading: &PoseReading) -> Observation {
        let mut core = self.core.lock();
        if core.state.is_finished() {
            return Observation::Finished;
        }

        if core.face_detected != reading.face_present {
            core.face_detected = reading.face_present;
            core.notify(&SessionEvent::FaceDetected(reading.face_present));
        }
        if !reading.face_present {
            core.reset_smoothing();
            return Observation::NoFace;
        }
        // kept out of the filter and gate so smoothing history stays finite
        if !reading.yaw_degrees.is_finite() {
            debug!("Rejecting non-finite yaw {}", reading.yaw_degrees);
            return Observation::Rejected;
        }

        let yaw_degrees = core.filter.apply(reading.yaw_degrees);
        if let Some(gate) = &mut core.gate {
            let motion = gate.update(reading.yaw_degrees);
            if motion != Motion::Still {
                debug!("Holding capture, head motion {:?}", motion);
                return Observation::Held;
            }
        }

        let smoothed = PoseReading::face(yaw_degrees);
        match core.state.evaluate(&self.classifier, &smoothed) {
            Some(orientation) => Observation::Accept(Candidate {
                orientation,
                session_id: core.session_id,
                yaw_degrees,
            }),
            None => {
                debug!(
                    "Yaw {:.1}° (raw {:.1}°) rejected for {:?}",
                    yaw_degrees,
                    reading.yaw_degrees,
                    core.state.current_target()
                );
                Observation::Rejected
            }
        }
    }

    /// Store `image` and advance if `candidate` is still current
    ///
    /// Returns `Ok(None)` when another frame already completed the orientation
    /// or the session was restarted in the meantime.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCapture` if the store already holds the orientation
    pub fn commit(&self, candidate: &Candidate, image: CapturedImage) -> Result<Option<Transition>> {
        let mut core = self.core.lock();
        let orientation = candidate.orientation;
        if core.session_id != candidate.session_id || core.state.current_target() != Some(orientation) {
            return Ok(None);
        }

        let image = core.store.record(orientation, image)?;
        let transition = core.state.commit(orientation).ok_or(Error::DuplicateCapture(orientation))?;
        core.reset_smoothing();

        info!(
            "Captured {} (yaw {:.1}°, frame {})",
            orientation,
            candidate.yaw_degrees,
            image.source_sequence()
        );
        core.notify(&SessionEvent::FrameAccepted {
            orientation,
            instruction: transition.instruction,
            image,
        });
        if transition.is_finished() {
            info!("Face capture complete");
            core.notify(&SessionEvent::Finished);
        }
        Ok(Some(transition))
    }

    /// Run one frame through detect, classify, normalize and store
    ///
    /// The frame is consumed and released exactly once on every path.
    pub fn process_frame(&self, frame: RawFrame, oracle: &dyn FaceOracle) -> FrameOutcome {
        if self.is_finished() {
            return FrameOutcome::SkippedFinished;
        }

        let reading = read_pose(oracle, &frame);
        let candidate = match self.observe(&reading) {
            Observation::Finished => return FrameOutcome::SkippedFinished,
            Observation::NoFace => return FrameOutcome::NoFace,
            Observation::Held => return FrameOutcome::Held,
            Observation::Rejected => {
                debug!("Frame {} rejected", frame.sequence());
                return FrameOutcome::Rejected;
            }
            Observation::Accept(candidate) => candidate,
        };

        let normalized = self.normalizer.normalize(&frame);
        let sequence = frame.sequence();
        frame.release();

        let image = match normalized {
            Ok(image) => image,
            Err(e) => {
                warn!("Dropping frame {}: {}", sequence, e);
                return FrameOutcome::Dropped;
            }
        };

        match self.commit(&candidate, image) {
            Ok(Some(transition)) => FrameOutcome::Accepted(transition.completed),
            Ok(None) => {
                debug!("Frame {} lost the race for {}", sequence, candidate.orientation);
                FrameOutcome::Stale(candidate.orientation)
            }
            Err(e) => {
                error!("Capture invariant violated on frame {}: {}", sequence, e);
                FrameOutcome::Duplicate(candidate.orientation)
            }
        }
    }
}
