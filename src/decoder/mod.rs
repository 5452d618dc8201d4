//! Frame decoding module.
//!
//! Turns raw link-layer frames into classified header records.

mod frame_decoder;

pub use frame_decoder::FrameDecoder;
