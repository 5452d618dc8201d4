//! Packet capture abstraction.
//!
//! This module defines the `FrameSource` trait, a pnet-based
//! implementation, and the time-bounded `CaptureSession` that drives it.

mod pnet_capture;
mod session;
mod window;

pub use pnet_capture::PnetSource;
pub use session::{CaptureSession, SessionState};
pub use window::{CaptureWindow, DEFAULT_CAPTURE_SECS};

/// An opened capture device that yields raw link-layer frames.
///
/// Implementations own the device handle. Dropping the source closes it.
pub trait FrameSource: Send {
    /// Wait for the next frame.
    ///
    /// Returns `None` if nothing arrived within the source's read timeout,
    /// which lets the caller check for a stop request between reads.
    fn next_frame(&mut self) -> Option<Vec<u8>>;

    /// Get the name of the interface being captured.
    fn interface_name(&self) -> &str;
}
