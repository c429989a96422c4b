//! # slotwire
//!
//! Minimal control-channel primitive for two cooperating parties — a
//! controller ("mothership") and a remote agent ("bot") — exchanging status
//! fields and commands over an external transport.
//!
//! Three pieces:
//!
//! - **Slotted store** ([`SlotStore`]): a fixed-capacity open-addressing
//!   key/value table over a flat byte arena, owning the sequence counter.
//! - **Wire codec** ([`protocol`]): serializes a (sequence, key, value)
//!   triple or a bare dump request into a bounded [`FrameBuffer`].
//! - **Parser** ([`parse`]): decodes inbound frames, rejects stale or
//!   replayed sequences, mutates the store, and dispatches to a
//!   caller-supplied [`Handler`].
//!
//! ## Data flow
//!
//! - Outbound: application → [`SlotStore::put`] → [`protocol::encode_pair`]
//!   → [`FrameBuffer`] → transport
//! - Inbound: transport → [`FrameBuffer`] → [`parse`] → store mutation +
//!   handler dispatch
//!
//! Both paths share the store's sequence counter; that counter orders
//! frames but does not authenticate them. Everything is synchronous and
//! single-threaded per store and buffer.
//!
//! ## Example
//!
//! ```
//! use slotwire::{parse, protocol, FrameBuffer, Handler, Result, SlotStore};
//!
//! struct Counter(usize);
//!
//! impl Handler for Counter {
//!     fn on_pair(&mut self, _frame: &FrameBuffer, _key: &[u8], _value: &[u8]) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//!     fn on_dump(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut agent = SlotStore::new(16);
//! let mut frame = FrameBuffer::new();
//! protocol::encode_pair(1, b"bot_pubkey_v1", b"pk", &mut frame)?;
//!
//! let mut handler = Counter(0);
//! parse(&mut agent, &mut handler, &frame)?;
//!
//! assert_eq!(handler.0, 1);
//! assert_eq!(agent.get(b"bot_pubkey_v1").as_deref(), Some(&b"pk"[..]));
//! # Ok::<(), slotwire::SlotwireError>(())
//! ```

pub mod command;
pub mod error;
pub mod parser;
pub mod protocol;
pub mod store;

pub use error::{Result, SlotwireError};
pub use parser::{parse, Handler, Pair};
pub use protocol::FrameBuffer;
pub use store::SlotStore;
