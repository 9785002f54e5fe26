//! Per-frame update scheduler: a dense, slot-recycling callback list.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::Application;

/// Callback invoked once per frame tick with the frame delta in seconds.
pub(crate) type FrameCallback = Rc<RefCell<dyn FnMut(&Application, f64)>>;

/// Ordered sequence of per-frame callbacks with spare-slot recycling.
///
/// A released slot is nulled in place (never spliced out, so indices held
/// by live elements stay valid) and pushed on a LIFO spares stack. Spares
/// are always reused before the queue grows, bounding the queue length by
/// the peak number of concurrent registrations.
#[derive(Default)]
pub(crate) struct ProcessQueue {
    slots: Vec<Option<FrameCallback>>,
    spares: Vec<usize>,
}

impl ProcessQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `callback`, reusing the most recently freed slot when one is
    /// available. Returns the slot index now owned by the caller.
    pub fn acquire(&mut self, callback: FrameCallback) -> usize {
        match self.spares.pop() {
            Some(slot) => {
                debug_assert!(self.slots[slot].is_none(), "spare slot still occupied");
                self.slots[slot] = Some(callback);
                slot
            }
            None => {
                self.slots.push(Some(callback));
                self.slots.len() - 1
            }
        }
    }

    /// Overwrites the callback in an owned slot in place.
    pub fn replace(&mut self, slot: usize, callback: FrameCallback) {
        debug_assert!(self.slots[slot].is_some(), "replace on a vacant slot");
        self.slots[slot] = Some(callback);
    }

    /// Frees an owned slot: nulls it in place and makes it a spare.
    pub fn release(&mut self, slot: usize) {
        debug_assert!(self.slots[slot].is_some(), "release on a vacant slot");
        self.slots[slot] = None;
        self.spares.push(slot);
    }

    /// The callback at `slot`, or `None` for a vacant slot.
    pub fn get(&self, slot: usize) -> Option<FrameCallback> {
        self.slots.get(slot).and_then(|s| s.clone())
    }

    /// Queue length including vacant slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn spare_count(&self) -> usize {
        self.spares.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> FrameCallback {
        Rc::new(RefCell::new(|_: &Application, _: f64| {}))
    }

    // ── acquire / release ─────────────────────────────────────────────────

    #[test]
    fn acquire_appends_when_no_spares() {
        let mut queue = ProcessQueue::new();
        assert_eq!(queue.acquire(noop()), 0);
        assert_eq!(queue.acquire(noop()), 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn release_nulls_in_place() {
        let mut queue = ProcessQueue::new();
        let slot = queue.acquire(noop());
        queue.acquire(noop());
        queue.release(slot);
        assert!(queue.get(slot).is_none());
        // Length is unchanged: indices of the remaining slot stay valid.
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.spare_count(), 1);
    }

    #[test]
    fn spares_are_reused_lifo() {
        let mut queue = ProcessQueue::new();
        let slots: Vec<_> = (0..3).map(|_| queue.acquire(noop())).collect();
        queue.release(slots[0]);
        queue.release(slots[2]);
        assert_eq!(queue.acquire(noop()), 2);
        assert_eq!(queue.acquire(noop()), 0);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.spare_count(), 0);
    }

    // ── growth bound ──────────────────────────────────────────────────────

    #[test]
    fn queue_is_bounded_by_peak_registrations() {
        // Register N, release M < N, register K: length must never exceed
        // max(N, N - M + K) and freed slots must be reused first.
        let (n, m, k) = (5, 3, 4);
        let mut queue = ProcessQueue::new();
        let slots: Vec<_> = (0..n).map(|_| queue.acquire(noop())).collect();
        for slot in slots.iter().take(m) {
            queue.release(*slot);
        }
        for _ in 0..k {
            queue.acquire(noop());
        }
        assert_eq!(queue.len(), usize::max(n, n - m + k));
        assert_eq!(queue.spare_count(), 0);
    }

    #[test]
    fn replace_overwrites_without_allocating() {
        let mut queue = ProcessQueue::new();
        let slot = queue.acquire(noop());
        queue.replace(slot, noop());
        assert_eq!(queue.len(), 1);
        assert!(queue.get(slot).is_some());
    }
}
