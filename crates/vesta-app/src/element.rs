use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vesta_host::{ElementProps, HandleKey};

use crate::app::Application;

/// A retained scene node backed by an opaque native handle.
///
/// The engine owns the actual node (and the parent/child tree); an
/// `Element` is the control-layer view of it: an arena key plus the one
/// piece of local bookkeeping this layer must track, the per-frame update
/// slot. Elements attach to a parent at construction or via [`add`] and die
/// via [`release`], which consumes the value and invalidates the key —
/// copies of the key held elsewhere panic on use afterwards.
///
/// [`add`]: Element::add
/// [`release`]: Element::release
pub struct Element {
    key: HandleKey,
    update_slot: Cell<Option<usize>>,
}

impl Element {
    /// Requests a new native node of `kind` tagged with `props`, attaching
    /// it under `parent` when one is given.
    pub fn new(
        app: &Application,
        kind: u32,
        props: &ElementProps,
        parent: Option<HandleKey>,
    ) -> Element {
        let key = app.create_native(kind, props);
        if let Some(parent) = parent {
            app.attach_native(parent, key);
        }
        Element { key, update_slot: Cell::new(None) }
    }

    /// Wraps a pre-existing native handle key. Only the stage element is
    /// built this way, in [`Application::load`].
    pub(crate) fn from_key(key: HandleKey) -> Element {
        Element { key, update_slot: Cell::new(None) }
    }

    /// The arena key for this node, usable as a parent reference.
    pub fn key(&self) -> HandleKey {
        self.key
    }

    /// Attaches `child` under this node.
    pub fn add(&self, app: &Application, child: &Element) {
        app.attach_native(self.key, child.key);
    }

    /// Registers (or overwrites in place) this element's per-frame update
    /// callback. Each element owns at most one scheduler slot; a freed slot
    /// is reused before the scheduler queue grows.
    pub fn set_update<F>(&self, app: &Application, callback: F)
    where
        F: FnMut(&Application, f64) + 'static,
    {
        let callback = Rc::new(RefCell::new(callback));
        match self.update_slot.get() {
            Some(slot) => app.slot_replace(slot, callback),
            None => self.update_slot.set(Some(app.slot_acquire(callback))),
        }
    }

    /// Deregisters the update callback. A no-op when none is registered.
    pub fn clear_update(&self, app: &Application) {
        if let Some(slot) = self.update_slot.take() {
            app.slot_release(slot);
        }
    }

    /// Destroys the native node. The update slot, if any, is freed, and the
    /// handle key is invalidated.
    pub fn release(self, app: &Application) {
        if let Some(slot) = self.update_slot.take() {
            app.slot_release(slot);
        }
        app.release_native(self.key);
    }
}
