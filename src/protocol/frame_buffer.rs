//! Bounded frame buffer.
//!
//! An owned, fixed-capacity byte region with a logical size and a read
//! cursor: the unit of data handed to the codec and the parser. One buffer
//! is typically reused across many encode/decode cycles; [`FrameBuffer::reset`]
//! truncates the logical view and rewinds the cursor, so stale bytes beyond
//! the new size are unreachable through the public surface even though the
//! backing storage is not zeroed.
//!
//! Not safe for concurrent use: the design assumes exactly one outstanding
//! encode or decode at a time per buffer.

use std::io;

use crate::error::{Result, SlotwireError};

/// Fixed capacity of every frame buffer, in bytes.
pub const FRAME_CAPACITY: usize = 4 * 1024;

/// Fixed-capacity byte buffer with a logical size and read cursor.
pub struct FrameBuffer {
    buf: [u8; FRAME_CAPACITY],
    size: usize,
    read_index: usize,
}

impl FrameBuffer {
    /// Create an empty buffer (logical size zero).
    pub fn new() -> Self {
        Self {
            buf: [0; FRAME_CAPACITY],
            size: 0,
            read_index: 0,
        }
    }

    /// Truncate the logical view to `size` bytes and rewind the read cursor.
    ///
    /// Fails with `InsufficientBytes` if `size` exceeds [`FRAME_CAPACITY`].
    pub fn reset(&mut self, size: usize) -> Result<()> {
        if size > FRAME_CAPACITY {
            return Err(SlotwireError::InsufficientBytes {
                needed: size,
                available: FRAME_CAPACITY,
            });
        }
        self.size = size;
        self.read_index = 0;
        Ok(())
    }

    /// Copy `data` in and reset the logical view to its length.
    ///
    /// Transport-ingress convenience for feeding received bytes to the
    /// parser.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.reset(data.len())?;
        self.buf[..data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Logical size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total capacity ([`FRAME_CAPACITY`]).
    pub fn capacity(&self) -> usize {
        FRAME_CAPACITY
    }

    /// The logical window: bytes `0..size`.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    /// Mutable logical window, for the codec to write into after a reset.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..self.size]
    }

    /// Logical bytes not yet drained through [`io::Read`].
    pub fn remaining(&self) -> usize {
        self.size - self.read_index
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Read for FrameBuffer {
    /// Drain up to `out.len()` of the remaining logical bytes.
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.remaining());
        out[..n].copy_from_slice(&self.buf[self.read_index..self.read_index + n]);
        self.read_index += n;
        Ok(n)
    }
}
