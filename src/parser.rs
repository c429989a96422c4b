//! Frame parsing and dispatch.
//!
//! [`parse`] decodes one inbound frame, enforces the monotonically advancing
//! sequence counter to reject replayed or reordered frames, applies accepted
//! pairs to the store, and dispatches to a caller-supplied [`Handler`].
//!
//! Validating the sequence before any mutation guarantees a replayed frame
//! never corrupts the store; bounds-checking every field before reading it
//! guarantees a truncated frame cannot read past the logical buffer size.

use bytes::Bytes;

use crate::error::{Result, SlotwireError};
use crate::protocol::{FrameBuffer, MIN_FRAME_SIZE, TAG_DUMP, TAG_PAIR};
use crate::store::{SlotStore, MAX_KEY_SIZE};

/// Dispatch target for decoded frames.
///
/// `key` and `value` borrow the frame and are valid only for the duration
/// of the call; implementations must copy them if retained.
pub trait Handler {
    /// A key/value pair was accepted and written to the store.
    fn on_pair(&mut self, frame: &FrameBuffer, key: &[u8], value: &[u8]) -> Result<()>;

    /// The peer asked for a dump of the store.
    fn on_dump(&mut self) -> Result<()>;
}

/// A decoded key/value pair, copied out of the frame.
///
/// Never aliases the frame buffer's storage after return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: Bytes,
    pub value: Bytes,
}

/// Decode one inbound frame and dispatch it.
///
/// The store's sequence counter plays the receiver role here ("next
/// expected sequence"): it advances by one on every call, before any
/// validation, whether or not the frame is accepted. Resynchronizing after
/// a `VersionMismatch` is the caller's responsibility.
///
/// Returns `Some(Pair)` for an accepted PAIR frame, `None` for DUMP.
pub fn parse(
    store: &mut SlotStore,
    handler: &mut dyn Handler,
    frame: &FrameBuffer,
) -> Result<Option<Pair>> {
    let expected = store.advance_sequence();

    let data = frame.as_slice();
    if data.is_empty() {
        return Err(SlotwireError::InsufficientBytes {
            needed: 1,
            available: 0,
        });
    }

    match data[0] {
        TAG_PAIR => {
            // Guards the fixed-width sequence and key_len reads below.
            if data.len() < MIN_FRAME_SIZE {
                return Err(SlotwireError::InsufficientBytes {
                    needed: MIN_FRAME_SIZE,
                    available: data.len(),
                });
            }
            let mut i = 1;
            let b = take(data, i, 4)?;
            let found = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
            i += 4;
            if found != expected {
                tracing::warn!(
                    "Rejecting frame: sequence mismatch, expected {}, got {}",
                    expected,
                    found
                );
                return Err(SlotwireError::VersionMismatch { expected, found });
            }

            let key_len = take(data, i, 1)?[0] as usize;
            i += 1;
            if key_len > MAX_KEY_SIZE {
                return Err(SlotwireError::KeyTooBig);
            }
            let key = take(data, i, key_len)?;
            i += key_len;

            let b = take(data, i, 2)?;
            let value_len = u16::from_le_bytes([b[0], b[1]]) as usize;
            i += 2;
            let value = take(data, i, value_len)?;

            // The counter already advanced for this frame; the store write
            // must not advance it again.
            store.apply(key, value)?;
            handler.on_pair(frame, key, value)?;

            tracing::debug!("Applied pair frame, sequence {}", found);
            Ok(Some(Pair {
                key: Bytes::copy_from_slice(key),
                value: Bytes::copy_from_slice(value),
            }))
        }
        TAG_DUMP => {
            handler.on_dump()?;
            Ok(None)
        }
        tag => {
            tracing::warn!("Unknown command tag {}", tag);
            Err(SlotwireError::UnknownCommand(tag))
        }
    }
}

/// Bounds-checked read of `n` bytes at offset `at`.
fn take(data: &[u8], at: usize, n: usize) -> Result<&[u8]> {
    data.get(at..at + n).ok_or(SlotwireError::InsufficientBytes {
        needed: n,
        available: data.len().saturating_sub(at),
    })
}
