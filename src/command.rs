//! Command helpers and reserved key names.
//!
//! Commands ride the ordinary PAIR path: a reserved key with a one-byte
//! value, recorded in the local store and serialized in the same step so
//! the outbound frame and the local view never diverge.
//!
//! The key names here are opaque to this crate; their meaning belongs to
//! the controller and agent exchanging them.

use crate::error::Result;
use crate::protocol::{encode_pair, FrameBuffer};
use crate::store::SlotStore;

/// Command code carried as the key of a PAIR frame.
/// A separate space from the frame tags in [`crate::protocol`].
pub const CMD_SHUTDOWN: u8 = 1;

/// Agent-published instruction slot.
pub const STATUSKEY_INSTRUCTION: &[u8] = b"bot_instruction_v1";
/// Agent-published public key.
pub const STATUSKEY_BOT_PUBKEY: &[u8] = b"bot_pubkey_v1";
/// Agent-published balance.
pub const STATUSKEY_BOT_LAMPORTS: &[u8] = b"bot_lamports_v1";
/// Controller-to-agent command slot.
pub const SETTINGS_COMMAND: &[u8] = b"mothership_cmd_v1";
/// Controller liveness probe slot.
pub const SETTINGS_PING: &[u8] = b"mothership_ping_v1";

/// Check whether a decoded key is the agent's public-key slot.
pub fn is_bot_pubkey(key: &[u8]) -> bool {
    key == STATUSKEY_BOT_PUBKEY
}

/// Check whether a decoded key is the agent's balance slot.
pub fn is_bot_lamports(key: &[u8]) -> bool {
    key == STATUSKEY_BOT_LAMPORTS
}

/// Record `key`/`value` locally and serialize the matching PAIR frame.
///
/// The frame embeds the store's post-put sequence, so the peer's expected
/// counter stays in lockstep when every published frame is delivered in
/// order.
pub fn publish(
    store: &mut SlotStore,
    key: &[u8],
    value: &[u8],
    out: &mut FrameBuffer,
) -> Result<()> {
    store.put(key, value)?;
    encode_pair(store.sequence(), key, value, out)
}

/// Instruct the agent to shut down and return its funds to the controller.
pub fn shutdown(store: &mut SlotStore, out: &mut FrameBuffer) -> Result<()> {
    publish(store, &[CMD_SHUTDOWN], &[0], out)
}

/// Probe the agent for liveness.
pub fn ping(store: &mut SlotStore, out: &mut FrameBuffer) -> Result<()> {
    publish(store, SETTINGS_PING, &[0], out)
}
