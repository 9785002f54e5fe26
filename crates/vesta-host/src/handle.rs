//! Index/generation arena over raw native handles.
//!
//! The control layer never holds a [`RawHandle`] directly; it holds a
//! [`HandleKey`] into a [`HandleTable`]. Removing an entry bumps the slot
//! generation, so a key that outlives its element misses the table instead
//! of silently resolving to a recycled handle.

/// Opaque native handle owned by the engine (a pointer on the other side).
pub type RawHandle = u64;

/// Key into a [`HandleTable`]: slot index plus the generation the slot had
/// when the entry was inserted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandleKey {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    raw: Option<RawHandle>,
}

/// Arena of live native handles with free-slot reuse.
///
/// Freed slots go on a LIFO free list and are reused before the table
/// grows, so the table length is bounded by the peak number of live
/// entries rather than by the total ever inserted.
#[derive(Debug, Default)]
pub struct HandleTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `raw` and returns its key, reusing a freed slot if one exists.
    pub fn insert(&mut self, raw: RawHandle) -> HandleKey {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.raw = Some(raw);
            HandleKey { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, raw: Some(raw) });
            HandleKey { index, generation: 0 }
        }
    }

    /// Resolves `key` to its raw handle, or `None` if the entry was removed.
    pub fn get(&self, key: HandleKey) -> Option<RawHandle> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.raw)
    }

    /// Removes the entry for `key`, invalidating the key and every copy of
    /// it. Returns the raw handle, or `None` if the key was already stale.
    pub fn remove(&mut self, key: HandleKey) -> Option<RawHandle> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let raw = slot.raw.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        Some(raw)
    }

    pub fn contains(&self, key: HandleKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── insert / get ──────────────────────────────────────────────────────

    #[test]
    fn insert_then_get() {
        let mut table = HandleTable::new();
        let key = table.insert(0xAB);
        assert_eq!(table.get(key), Some(0xAB));
        assert!(table.contains(key));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_entries_get_distinct_keys() {
        let mut table = HandleTable::new();
        let a = table.insert(1);
        let b = table.insert(2);
        assert_ne!(a, b);
        assert_eq!(table.get(a), Some(1));
        assert_eq!(table.get(b), Some(2));
    }

    // ── remove ────────────────────────────────────────────────────────────

    #[test]
    fn remove_invalidates_key() {
        let mut table = HandleTable::new();
        let key = table.insert(7);
        assert_eq!(table.remove(key), Some(7));
        assert_eq!(table.get(key), None);
        assert!(table.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut table = HandleTable::new();
        let key = table.insert(7);
        assert_eq!(table.remove(key), Some(7));
        assert_eq!(table.remove(key), None);
        assert_eq!(table.len(), 0);
    }

    // ── slot reuse ────────────────────────────────────────────────────────

    #[test]
    fn freed_slot_is_reused_before_growth() {
        let mut table = HandleTable::new();
        let a = table.insert(1);
        let _b = table.insert(2);
        table.remove(a);
        let c = table.insert(3);
        // Same physical slot, new generation: the table did not grow.
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(c), Some(3));
    }

    #[test]
    fn stale_key_misses_recycled_slot() {
        let mut table = HandleTable::new();
        let a = table.insert(1);
        table.remove(a);
        let b = table.insert(2);
        // `a` and `b` share a slot index but differ in generation.
        assert_eq!(table.get(a), None);
        assert_eq!(table.get(b), Some(2));
        assert_ne!(a, b);
    }

    #[test]
    fn free_list_is_lifo() {
        let mut table = HandleTable::new();
        let keys: Vec<_> = (0..4).map(|i| table.insert(i)).collect();
        table.remove(keys[1]);
        table.remove(keys[3]);
        let first = table.insert(10);
        let second = table.insert(11);
        // Most recently freed slot (index 3) comes back first.
        assert_eq!(first.index, 3);
        assert_eq!(second.index, 1);
        assert_eq!(table.get(first), Some(10));
        assert_eq!(table.get(second), Some(11));
        assert_eq!(table.len(), 4);
    }
}
