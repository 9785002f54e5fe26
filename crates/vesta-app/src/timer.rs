//! Id-keyed timer registry driven by elapsed frame time.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::app::Application;

/// Identifier returned by [`Application::add_timer`]. Monotonically
/// increasing from 1 and never reused, so a stale id cannot alias a newer
/// timer.
///
/// [`Application::add_timer`]: crate::Application::add_timer
pub type TimerId = u64;

/// One-shot vs. recurring behavior.
///
/// The discriminants are the engine's native timer codes (`setInterval` /
/// `setTimeout` on the scripting side).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimerKind {
    Repeating = 0,
    OneShot = 1,
}

pub(crate) type TimerCallback = Rc<RefCell<dyn FnMut(&Application)>>;

pub(crate) struct Timer {
    pub kind: TimerKind,
    pub callback: TimerCallback,
    /// Firing interval in seconds.
    pub interval: f64,
    /// Time accumulated toward the next fire, in seconds. Always less than
    /// `interval` immediately after a tick has been processed.
    pub elapsed: f64,
}

/// Registry of live timers, keyed by allocation order.
///
/// Ids are monotonic, so iterating the map visits timers in insertion
/// order — the firing order contract for a single tick.
pub(crate) struct TimerRegistry {
    timers: BTreeMap<TimerId, Timer>,
    next_id: TimerId,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self { timers: BTreeMap::new(), next_id: 0 }
    }

    /// Registers a timer. `interval_ms` is converted to seconds here, once.
    pub fn insert(&mut self, kind: TimerKind, callback: TimerCallback, interval_ms: f64) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.timers.insert(
            id,
            Timer { kind, callback, interval: interval_ms * 0.001, elapsed: 0.0 },
        );
        id
    }

    /// Removes a timer. Unknown ids are a no-op.
    pub fn remove(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.get_mut(&id)
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Advances every registered timer by `delta` seconds and returns the
    /// ids that have reached their interval, in insertion order. The caller
    /// fires them; a due timer removed before its turn must not fire.
    pub fn advance(&mut self, delta: f64) -> Vec<TimerId> {
        let mut due = Vec::new();
        for (&id, timer) in &mut self.timers {
            timer.elapsed += delta;
            if timer.elapsed >= timer.interval {
                due.push(id);
            }
        }
        due
    }
}
