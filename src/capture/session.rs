//! Time-bounded, single-use capture session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{CaptureWindow, FrameSource};
use crate::domain::FrameBuffer;
use crate::error::CaptureError;

/// Lifecycle of a [`CaptureSession`]. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

/// Owns a frame source and collects its frames for one capture window.
///
/// While running, a single producer thread owns the [`FrameBuffer`]. It is
/// handed back through the thread's join on [`stop`](Self::stop), so every
/// frame appended before the producer exits is visible to the caller.
pub struct CaptureSession<S: FrameSource + 'static> {
    state: SessionState,
    interface: String,
    source: Option<S>,
    running: Arc<AtomicBool>,
    producer: Option<JoinHandle<FrameBuffer>>,
}

impl<S: FrameSource + 'static> CaptureSession<S> {
    /// Create an idle session that takes ownership of an opened source.
    pub fn new(source: S) -> Self {
        Self {
            state: SessionState::Idle,
            interface: source.interface_name().to_string(),
            source: Some(source),
            running: Arc::new(AtomicBool::new(false)),
            producer: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn interface_name(&self) -> &str {
        &self.interface
    }

    /// Begin delivering frames into a fresh buffer on a background thread.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.expect_state(SessionState::Idle)?;

        let mut source = self.source.take().ok_or(CaptureError::InvalidState {
            expected: SessionState::Idle,
            actual: self.state,
        })?;

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name(format!("capture-{}", self.interface))
            .spawn(move || {
                let mut buffer = FrameBuffer::new();
                while running.load(Ordering::Acquire) {
                    if let Some(data) = source.next_frame() {
                        buffer.push(data);
                    }
                }
                tracing::debug!(
                    "Producer on {} exiting with {} frames",
                    source.interface_name(),
                    buffer.len()
                );
                buffer
            });

        let handle = match handle {
            Ok(h) => h,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                self.state = SessionState::Stopped;
                return Err(CaptureError::Spawn(e));
            }
        };

        self.producer = Some(handle);
        self.state = SessionState::Running;
        tracing::info!("Capture started on {}", self.interface);
        Ok(())
    }

    /// Block the caller for the whole window while frames keep arriving.
    ///
    /// The wait cannot be interrupted.
    pub fn run_for(&self, window: CaptureWindow) -> Result<(), CaptureError> {
        self.expect_state(SessionState::Running)?;

        tracing::debug!("Capturing for {:?}", window.duration());
        thread::sleep(window.duration());
        Ok(())
    }

    /// Halt delivery and return the frozen buffer.
    pub fn stop(&mut self) -> Result<FrameBuffer, CaptureError> {
        self.expect_state(SessionState::Running)?;

        self.running.store(false, Ordering::Release);
        self.state = SessionState::Stopped;

        let producer = self.producer.take().ok_or(CaptureError::ProducerPanicked)?;
        let buffer = producer.join().map_err(|_| CaptureError::ProducerPanicked)?;

        tracing::info!(
            "Capture stopped on {}: {} frames",
            self.interface,
            buffer.len()
        );
        Ok(buffer)
    }

    /// Start, wait out the window, and stop.
    pub fn capture(&mut self, window: CaptureWindow) -> Result<FrameBuffer, CaptureError> {
        self.start()?;
        self.run_for(window)?;
        self.stop()
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), CaptureError> {
        if self.state != expected {
            return Err(CaptureError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

impl<S: FrameSource + 'static> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        // Don't leave a producer spinning on the device.
        self.running.store(false, Ordering::Release);
        if let Some(producer) = self.producer.take() {
            let _ = producer.join();
        }
    }
}
