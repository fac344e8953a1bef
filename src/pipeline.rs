//! Frame pipeline coordinator.
//!
//! The capture surface hands frames to [`FramePipeline::submit`], which never
//! waits on analysis. A single worker thread takes frames from a one-slot
//! queue and runs them through the session one at a time. A frame that
//! arrives while another is still waiting replaces it; the superseded frame
//! is released immediately.

use crate::{
    frame::RawFrame,
    oracle::FaceOracle,
    session::{CaptureSession, FrameOutcome},
    Error, Result,
};
use log::{debug, error, info};
use parking_lot::{Condvar, Mutex};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

/// Frame counters since the pipeline started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames handed to `submit`
    pub submitted: u64,
    /// Frames replaced by a newer frame before analysis
    pub superseded: u64,
    /// Frames the worker finished with
    pub processed: u64,
    /// Frames that produced a capture
    pub accepted: u64,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    superseded: AtomicU64,
    processed: AtomicU64,
    accepted: AtomicU64,
}

#[derive(Default)]
struct Slot {
    pending: Option<RawFrame>,
    busy: bool,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    frame_ready: Condvar,
    idle: Condvar,
    counters: Counters,
}

/// Background analysis of camera frames for one capture session
pub struct FramePipeline {
    session: Arc<CaptureSession>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl FramePipeline {
    /// Start the analysis worker
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned
    pub fn spawn(session: Arc<CaptureSession>, oracle: Arc<dyn FaceOracle>) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker = {
            let shared = Arc::clone(&shared);
            let session = Arc::clone(&session);
            thread::Builder::new()
                .name("frame-analysis".to_string())
                .spawn(move || run_worker(&shared, &session, oracle.as_ref()))?
        };
        info!("Frame analysis worker started");

        Ok(Self {
            session,
            shared,
            worker: Some(worker),
        })
    }

    /// Session this pipeline feeds
    #[must_use]
    pub fn session(&self) -> &Arc<CaptureSession> {
        &self.session
    }

    /// Queue a frame for analysis without waiting
    ///
    /// # Errors
    ///
    /// Returns `PipelineClosed` after shutdown; the frame is released
    pub fn submit(&self, frame: RawFrame) -> Result<()> {
        let superseded = {
            let mut slot = self.shared.slot.lock();
            if slot.closed {
                return Err(Error::PipelineClosed);
            }
            self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
            let previous = slot.pending.replace(frame);
            self.shared.frame_ready.notify_one();
            previous
        };

        if let Some(old) = superseded {
            self.shared.counters.superseded.fetch_add(1, Ordering::Relaxed);
            debug!("Frame {} superseded before analysis", old.sequence());
            old.release();
        }
        Ok(())
    }

    /// Block until no frame is waiting or being analysed
    pub fn wait_idle(&self) {
        let mut slot = self.shared.slot.lock();
        while slot.pending.is_some() || slot.busy {
            self.shared.idle.wait(&mut slot);
        }
    }

    /// Current frame counters
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        let counters = &self.shared.counters;
        PipelineStats {
            submitted: counters.submitted.load(Ordering::Relaxed),
            superseded: counters.superseded.load(Ordering::Relaxed),
            processed: counters.processed.load(Ordering::Relaxed),
            accepted: counters.accepted.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting frames, finish the waiting one and join the worker
    ///
    /// # Errors
    ///
    /// Returns `WorkerPanicked` if the worker thread panicked
    pub fn shutdown(mut self) -> Result<()> {
        self.close_and_join()
    }

    fn close_and_join(&mut self) -> Result<()> {
        {
            let mut slot = self.shared.slot.lock();
            slot.closed = true;
            self.shared.frame_ready.notify_all();
        }
        match self.worker.take() {
            Some(handle) => {
                handle.join().map_err(|_| Error::WorkerPanicked)?;
                info!("Frame analysis worker stopped");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        if let Err(e) = self.close_and_join() {
            error!("Frame pipeline shutdown failed: {}", e);
        }
    }
}

fn run_worker(shared: &Shared, session: &CaptureSession, oracle: &dyn FaceOracle) {
    loop {
        let frame = {
            let mut slot = shared.slot.lock();
            loop {
                if let Some(frame) = slot.pending.take() {
                    slot.busy = true;
                    break frame;
                }
                if slot.closed {
                    shared.idle.notify_all();
                    return;
                }
                shared.frame_ready.wait(&mut slot);
            }
        };

        let sequence = frame.sequence();
        let outcome = session.process_frame(frame, oracle);
        debug!("Frame {} -> {:?}", sequence, outcome);

        shared.counters.processed.fetch_add(1, Ordering::Relaxed);
        if matches!(outcome, FrameOutcome::Accepted(_)) {
            shared.counters.accepted.fetch_add(1, Ordering::Relaxed);
        }

        let mut slot = shared.slot.lock();
        slot.busy = false;
        shared.idle.notify_all();
    }
}
