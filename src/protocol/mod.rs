//! Protocol module - wire format and the bounded frame buffer.
//!
//! This module implements the binary control-channel frames:
//! - PAIR / DUMP frame encoding
//! - Fixed-capacity frame buffer with reset and read-cursor semantics

mod frame_buffer;
mod wire_format;

pub use frame_buffer::{FrameBuffer, FRAME_CAPACITY};
pub use wire_format::{
    encode_dump, encode_pair, pair_frame_size, MIN_FRAME_SIZE, PAIR_OVERHEAD, TAG_DUMP, TAG_PAIR,
};
