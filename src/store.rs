//! Slotted key/value store.
//!
//! A fixed-capacity open-addressing table over a flat byte arena. Each slot
//! is exactly [`ENTRY_SIZE`] bytes:
//!
//! ```text
//! ┌──────────────────┬───────────┬────────────────────┐
//! │ key              │ value_len │ value              │
//! │ 64 B zero-padded │ u32 LE    │ 1024 B zero-padded │
//! └──────────────────┴───────────┴────────────────────┘
//! ```
//!
//! An all-zero key region marks an empty slot. Slot selection is a 32-bit
//! FNV-1a hash of the key modulo capacity, linear-probed forward with wrap
//! to the first empty or matching slot. The table is never resized and
//! entries are never deleted.
//!
//! The store also owns the sequence counter used by the anti-replay check:
//! the counter advances by one on every successful [`SlotStore::put`]
//! (sender role, "next outgoing sequence") and on every
//! [`parse`](crate::parse) call (receiver role, "next expected sequence").

use bytes::Bytes;

use crate::error::{Result, SlotwireError};

/// Maximum key length in bytes.
pub const MAX_KEY_SIZE: usize = 64;

/// Maximum value length in bytes.
pub const MAX_VALUE_SIZE: usize = 1024;

/// Size of one slot in the arena (1092 bytes).
pub const ENTRY_SIZE: usize = MAX_KEY_SIZE + 4 + MAX_VALUE_SIZE;

/// Outcome of a linear probe for a key.
enum Probe {
    /// Slot holding this exact key.
    Occupied(usize),
    /// First empty slot on the probe path.
    Vacant(usize),
    /// Every slot is occupied by a different key.
    Full,
}

/// Fixed-capacity key/value store backed by a flat byte arena.
///
/// Strictly single-threaded: no operation suspends or blocks, and callers
/// sharing a store across logical senders must serialize access themselves.
pub struct SlotStore {
    sequence: u32,
    arena: Vec<u8>,
    slots: usize,
}

impl SlotStore {
    /// Allocate a store with `slots` fixed-size slots.
    ///
    /// # Panics
    ///
    /// Panics if `slots` is zero.
    pub fn new(slots: usize) -> Self {
        assert!(slots > 0, "slot count must be non-zero");
        Self {
            sequence: 0,
            arena: vec![0u8; slots * ENTRY_SIZE],
            slots,
        }
    }

    /// Number of slots, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.slots
    }

    /// Current sequence counter value.
    ///
    /// After a successful [`put`](Self::put) this is the sequence to embed
    /// in the matching outbound frame.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Advance the sequence counter by one and return the new value.
    pub(crate) fn advance_sequence(&mut self) -> u32 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    /// Insert or overwrite a key/value pair.
    ///
    /// Validation precedes every mutation: a rejected `put` leaves both the
    /// arena and the sequence counter untouched. Fails with `StoreFull`
    /// when probing exhausts every slot without finding the key or an
    /// empty slot.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        validate(key, value)?;
        let slot = self.slot_for(key)?;
        self.advance_sequence();
        self.write_entry(slot, key, value);
        Ok(())
    }

    /// Apply a decoded entry without advancing the sequence counter.
    ///
    /// Used by the parser: the receiver's counter already advanced once for
    /// the frame, so the store write must not advance it again.
    pub(crate) fn apply(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        validate(key, value)?;
        let slot = self.slot_for(key)?;
        self.write_entry(slot, key, value);
        Ok(())
    }

    /// Look up a value by key, copying it out of the arena.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        match self.probe(key) {
            Probe::Occupied(slot) => Some(Bytes::copy_from_slice(self.entry_value(slot))),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Visit every occupied slot in slot-index order.
    ///
    /// Stops at the first error the visitor returns. Slot-index order is
    /// deterministic for a given insert history but is not insertion order.
    pub fn iterate<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        for slot in 0..self.slots {
            let key = self.stored_key(slot);
            if key.is_empty() {
                continue;
            }
            visit(key, self.entry_value(slot))?;
        }
        Ok(())
    }

    fn slot_for(&self, key: &[u8]) -> Result<usize> {
        match self.probe(key) {
            Probe::Occupied(slot) | Probe::Vacant(slot) => Ok(slot),
            Probe::Full => Err(SlotwireError::StoreFull),
        }
    }

    /// Linear probe from the hashed start slot, wrapping once around.
    fn probe(&self, key: &[u8]) -> Probe {
        let start = fnv1a(key) as usize % self.slots;
        for i in 0..self.slots {
            let slot = (start + i) % self.slots;
            let stored = self.stored_key(slot);
            if stored.is_empty() {
                return Probe::Vacant(slot);
            }
            if stored == key {
                return Probe::Occupied(slot);
            }
        }
        Probe::Full
    }

    /// Stored key of a slot with trailing zero padding stripped.
    fn stored_key(&self, slot: usize) -> &[u8] {
        let offset = slot * ENTRY_SIZE;
        let region = &self.arena[offset..offset + MAX_KEY_SIZE];
        let len = region.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &region[..len]
    }

    fn entry_value(&self, slot: usize) -> &[u8] {
        let offset = slot * ENTRY_SIZE + MAX_KEY_SIZE;
        let len = u32::from_le_bytes([
            self.arena[offset],
            self.arena[offset + 1],
            self.arena[offset + 2],
            self.arena[offset + 3],
        ]) as usize;
        &self.arena[offset + 4..offset + 4 + len]
    }

    fn write_entry(&mut self, slot: usize, key: &[u8], value: &[u8]) {
        let offset = slot * ENTRY_SIZE;
        let entry = &mut self.arena[offset..offset + ENTRY_SIZE];

        entry[..MAX_KEY_SIZE].fill(0);
        entry[..key.len()].copy_from_slice(key);

        entry[MAX_KEY_SIZE..MAX_KEY_SIZE + 4]
            .copy_from_slice(&(value.len() as u32).to_le_bytes());

        entry[MAX_KEY_SIZE + 4..].fill(0);
        entry[MAX_KEY_SIZE + 4..MAX_KEY_SIZE + 4 + value.len()].copy_from_slice(value);
    }
}

/// Size checks shared by `put` and the parser's apply path.
fn validate(key: &[u8], value: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(SlotwireError::BlankKey);
    }
    if key.len() > MAX_KEY_SIZE {
        return Err(SlotwireError::KeyTooBig);
    }
    if value.len() > MAX_VALUE_SIZE {
        return Err(SlotwireError::ValueTooBig);
    }
    Ok(())
}

/// 32-bit FNV-1a over the raw key bytes.
///
/// Must stay deterministic: slot placement for equal keys on an empty table
/// is part of the store's observable behavior.
fn fnv1a(data: &[u8]) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for &b in data {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_roundtrip() {
        let mut store = SlotStore::new(100);
        assert_eq!(store.capacity(), 100);
        let pairs = [("key1", "value1"), ("key2", "value2"), ("key3", "value3")];

        for (k, v) in pairs {
            store.put(k.as_bytes(), v.as_bytes()).unwrap();
        }
        for (k, v) in pairs {
            assert_eq!(store.get(k.as_bytes()).as_deref(), Some(v.as_bytes()));
        }
    }

    #[test]
    fn test_get_missing_key() {
        let mut store = SlotStore::new(8);
        store.put(b"present", b"yes").unwrap();
        assert!(store.get(b"absent").is_none());
    }

    #[test]
    fn test_get_blank_key() {
        let mut store = SlotStore::new(8);
        store.put(b"key", b"value").unwrap();
        // A blank key must never match an empty slot's zeroed key region.
        assert!(store.get(b"").is_none());
    }

    #[test]
    fn test_overwrite_existing_key() {
        let mut store = SlotStore::new(8);
        store.put(b"key", b"first").unwrap();
        store.put(b"key", b"second").unwrap();

        assert_eq!(store.get(b"key").as_deref(), Some(&b"second"[..]));

        let mut count = 0;
        store
            .iterate(|_, _| {
                count += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_key_too_big_rejected() {
        let mut store = SlotStore::new(8);
        let key = [0xAA; MAX_KEY_SIZE + 1];

        assert_eq!(store.put(&key, b"v"), Err(SlotwireError::KeyTooBig));
        assert_eq!(store.sequence(), 0);
        assert!(store.get(&key).is_none());
    }

    #[test]
    fn test_value_too_big_rejected() {
        let mut store = SlotStore::new(8);
        let value = [0xBB; MAX_VALUE_SIZE + 1];

        assert_eq!(store.put(b"key", &value), Err(SlotwireError::ValueTooBig));
        assert_eq!(store.sequence(), 0);
        assert!(store.get(b"key").is_none());
    }

    #[test]
    fn test_blank_key_rejected() {
        let mut store = SlotStore::new(8);
        assert_eq!(store.put(b"", b"value"), Err(SlotwireError::BlankKey));
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn test_max_sizes_accepted() {
        let mut store = SlotStore::new(8);
        let key = [0x11; MAX_KEY_SIZE];
        let value = [0x22; MAX_VALUE_SIZE];

        store.put(&key, &value).unwrap();
        assert_eq!(store.get(&key).as_deref(), Some(&value[..]));
    }

    #[test]
    fn test_empty_value_roundtrip() {
        let mut store = SlotStore::new(8);
        store.put(b"key", b"").unwrap();
        assert_eq!(store.get(b"key").as_deref(), Some(&b""[..]));
    }

    #[test]
    fn test_store_full() {
        let mut store = SlotStore::new(2);
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();

        assert_eq!(store.put(b"c", b"3"), Err(SlotwireError::StoreFull));

        // Existing entries stay intact and remain writable.
        assert_eq!(store.get(b"a").as_deref(), Some(&b"1"[..]));
        store.put(b"b", b"22").unwrap();
        assert_eq!(store.get(b"b").as_deref(), Some(&b"22"[..]));
        assert!(store.get(b"c").is_none());
    }

    #[test]
    fn test_sequence_advances_per_put() {
        let mut store = SlotStore::new(8);
        assert_eq!(store.sequence(), 0);

        store.put(b"a", b"1").unwrap();
        assert_eq!(store.sequence(), 1);

        store.put(b"b", b"2").unwrap();
        assert_eq!(store.sequence(), 2);

        // Failed puts do not advance the counter.
        let big = [0u8; MAX_VALUE_SIZE + 1];
        assert!(store.put(b"c", &big).is_err());
        assert_eq!(store.sequence(), 2);
    }

    #[test]
    fn test_iterate_visits_occupied_slots_only() {
        let mut store = SlotStore::new(16);
        store.put(b"key1", b"value1").unwrap();
        store.put(b"key2", b"value2").unwrap();

        let mut seen = Vec::new();
        store
            .iterate(|k, v| {
                seen.push((k.to_vec(), v.to_vec()));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&(b"key1".to_vec(), b"value1".to_vec())));
        assert!(seen.contains(&(b"key2".to_vec(), b"value2".to_vec())));
    }

    #[test]
    fn test_iterate_short_circuits() {
        let mut store = SlotStore::new(16);
        store.put(b"key1", b"value1").unwrap();
        store.put(b"key2", b"value2").unwrap();

        let mut visits = 0;
        let result = store.iterate(|_, _| {
            visits += 1;
            Err(SlotwireError::Handler("stop".to_string()))
        });

        assert_eq!(result, Err(SlotwireError::Handler("stop".to_string())));
        assert_eq!(visits, 1);
    }

    #[test]
    fn test_slot_placement_deterministic() {
        let inserts = [("alpha", "1"), ("beta", "2"), ("gamma", "3")];

        let mut order_a = Vec::new();
        let mut order_b = Vec::new();
        for order in [&mut order_a, &mut order_b] {
            let mut store = SlotStore::new(8);
            for (k, v) in inserts {
                store.put(k.as_bytes(), v.as_bytes()).unwrap();
            }
            store
                .iterate(|k, _| {
                    order.push(k.to_vec());
                    Ok(())
                })
                .unwrap();
        }

        assert_eq!(order_a, order_b);
    }

    #[test]
    fn test_stale_value_bytes_unreachable() {
        let mut store = SlotStore::new(8);
        store.put(b"key", b"a longer value").unwrap();
        store.put(b"key", b"s").unwrap();
        assert_eq!(store.get(b"key").as_deref(), Some(&b"s"[..]));
    }

    #[test]
    #[should_panic(expected = "slot count must be non-zero")]
    fn test_zero_capacity_panics() {
        let _ = SlotStore::new(0);
    }
}
