//! Domain models for captured frames and their decoded headers.
//!
//! These types carry no capture or rendering concerns.

mod frame;
mod record;

pub use frame::{FrameBuffer, RawFrame};
pub use record::{DecodeOutcome, DecodedRecord, LayerPresence};
