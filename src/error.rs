//! Error types for the capture pipeline.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::capture::SessionState;

/// Errors raised while validating user input.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised while opening a device or driving a capture session.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Cannot find device with address: {0}")]
    DeviceNotFound(Ipv4Addr),

    #[error("Cannot open device {name}: {reason}")]
    DeviceOpenFailed { name: String, reason: String },

    #[error("Insufficient permissions to capture on {0} (try running as root)")]
    InsufficientPermissions(String),

    #[error("Capture session is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("Failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Capture thread panicked")]
    ProducerPanicked,
}

/// Reasons a frame could not be decoded down to the network layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{layer} header too short: expected {expected} bytes, got {actual}")]
    Truncated {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Not an IPv4 frame (ethertype {0:#06x})")]
    NotIpv4(u16),

    #[error("Invalid IPv4 version {0}")]
    BadIpVersion(u8),

    #[error("Invalid IPv4 header length {0}")]
    BadIpHeaderLength(usize),
}
