//! Captured frames and the buffer that collects them.

use std::time::SystemTime;

/// A link-layer frame as it came off the wire.
///
/// Frames are immutable once appended to a [`FrameBuffer`].
#[derive(Debug, Clone)]
pub struct RawFrame {
    seq: u64,
    timestamp: Option<SystemTime>,
    data: Vec<u8>,
}

impl RawFrame {
    /// Create a frame with an explicit sequence number.
    pub fn new(seq: u64, data: Vec<u8>, timestamp: Option<SystemTime>) -> Self {
        Self {
            seq,
            timestamp,
            data,
        }
    }

    /// Position of the frame in capture order, starting at 0.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// When the frame was received, if known.
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    /// The raw frame bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Append-only, insertion-ordered store of captured frames.
///
/// The buffer assigns sequence numbers itself so capture order cannot be
/// broken by the caller.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frames: Vec<RawFrame>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame stamped with the current wall-clock time.
    pub fn push(&mut self, data: Vec<u8>) {
        self.push_at(data, Some(SystemTime::now()));
    }

    /// Append a frame with the given timestamp.
    pub fn push_at(&mut self, data: Vec<u8>, timestamp: Option<SystemTime>) {
        let seq = self.frames.len() as u64;
        self.frames.push(RawFrame::new(seq, data, timestamp));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in capture order.
    pub fn frames(&self) -> &[RawFrame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawFrame> {
        self.frames.iter()
    }
}

impl IntoIterator for FrameBuffer {
    type Item = RawFrame;
    type IntoIter = std::vec::IntoIter<RawFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameBuffer {
    type Item = &'a RawFrame;
    type IntoIter = std::slice::Iter<'a, RawFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
