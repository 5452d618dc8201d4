//! Wirefish - time-boxed live capture of Ethernet/IPv4/TCP headers.
//!
//! A [`CaptureSession`](capture::CaptureSession) collects frames for a fixed
//! window, a [`FrameDecoder`](decoder::FrameDecoder) classifies each one, and
//! a [`ReportBuilder`](reporter::ReportBuilder) turns the outcomes into a table.

pub mod capture;
pub mod config;
pub mod decoder;
pub mod domain;
pub mod error;
pub mod reporter;

use capture::{CaptureSession, CaptureWindow, FrameSource};
use decoder::FrameDecoder;
use domain::FrameBuffer;
use error::CaptureError;
use reporter::{Report, ReportBuilder};

/// Decode a stopped session's frames in capture order and tabulate them.
pub fn decode_and_report(frames: &FrameBuffer) -> Report {
    let report = ReportBuilder::build(FrameDecoder::new().decode_all(frames));

    tracing::info!(
        "Decoded {} frames: {} rows, {} unprocessed",
        frames.len(),
        report.rows().len(),
        report.unprocessed()
    );
    report
}

/// Capture from `source` for `window`, then decode and report.
pub fn run_capture<S: FrameSource + 'static>(
    source: S,
    window: CaptureWindow,
) -> Result<Report, CaptureError> {
    let mut session = CaptureSession::new(source);
    let frames = session.capture(window)?;
    Ok(decode_and_report(&frames))
}
