//! Wire format encoding.
//!
//! Two frame layouts, all integers little-endian:
//! ```text
//! PAIR  ┌───────┬────────────┬───────────┬─────────────┬─────────────┬───────────────┐
//!       │ tag=1 │ sequence   │ key_len   │ key         │ value_len   │ value         │
//!       │ 1 B   │ u32 LE     │ u8        │ key_len B   │ u16 LE      │ value_len B   │
//!       └───────┴────────────┴───────────┴─────────────┴─────────────┴───────────────┘
//! DUMP  ┌───────┐
//!       │ tag=2 │
//!       │ 1 B   │
//!       └───────┘
//! ```
//! Constraints: `1 <= key_len <= 64`, `value_len <= 1024`.
//!
//! Encoding is pure: the destination [`FrameBuffer`] is reset to the exact
//! frame size and every field is written at a computed offset. Decoding is
//! the parser's job (see [`crate::parser`]), which owns the sequence check.

use super::frame_buffer::FrameBuffer;
use crate::error::{Result, SlotwireError};
use crate::store::{MAX_KEY_SIZE, MAX_VALUE_SIZE};

/// Frame tag for a key/value upsert.
pub const TAG_PAIR: u8 = 1;

/// Frame tag for a bare dump request.
pub const TAG_DUMP: u8 = 2;

/// Fixed bytes of a PAIR frame around the key and value:
/// tag + sequence + key_len + value_len.
pub const PAIR_OVERHEAD: usize = 1 + 4 + 1 + 2;

/// Minimum bytes a PAIR frame must carry: tag + sequence + key_len.
/// Guards the parser's fixed-field reads against underflow.
pub const MIN_FRAME_SIZE: usize = 1 + 4 + 1;

/// Exact encoded size of a PAIR frame for the given key and value.
pub fn pair_frame_size(key: &[u8], value: &[u8]) -> usize {
    PAIR_OVERHEAD + key.len() + value.len()
}

/// Serialize a (sequence, key, value) triple as a PAIR frame into `out`.
///
/// Validates the key and value before touching the buffer; a rejected
/// encode leaves `out` unchanged. Fails with `InsufficientBytes` if the
/// computed frame size exceeds the buffer capacity.
///
/// # Panics
///
/// Panics if the bytes written do not add up to the computed frame size.
/// That is a codec bug, not a recoverable condition.
pub fn encode_pair(sequence: u32, key: &[u8], value: &[u8], out: &mut FrameBuffer) -> Result<()> {
    if key.is_empty() {
        return Err(SlotwireError::BlankKey);
    }
    if key.len() > MAX_KEY_SIZE {
        return Err(SlotwireError::KeyTooBig);
    }
    if value.len() > MAX_VALUE_SIZE {
        return Err(SlotwireError::ValueTooBig);
    }

    let size = pair_frame_size(key, value);
    out.reset(size)?;

    let buf = out.as_mut_slice();
    let mut i = 0;
    buf[i] = TAG_PAIR;
    i += 1;
    buf[i..i + 4].copy_from_slice(&sequence.to_le_bytes());
    i += 4;
    buf[i] = key.len() as u8;
    i += 1;
    buf[i..i + key.len()].copy_from_slice(key);
    i += key.len();
    buf[i..i + 2].copy_from_slice(&(value.len() as u16).to_le_bytes());
    i += 2;
    buf[i..i + value.len()].copy_from_slice(value);
    i += value.len();

    assert_eq!(i, size, "pair frame size accounting is broken");
    Ok(())
}

/// Serialize a bare DUMP request into `out`: a single tag byte.
pub fn encode_dump(out: &mut FrameBuffer) -> Result<()> {
    out.reset(1)?;
    out.as_mut_slice()[0] = TAG_DUMP;
    Ok(())
}
