use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result};

use vesta_host::{
    ElementProps, HandleKey, HandleTable, Host, HostArgs, RawHandle, Size, WindowState,
};

use crate::element::Element;
use crate::event::{Event, EventType};
use crate::queue::{FrameCallback, ProcessQueue};
use crate::timer::{TimerId, TimerKind, TimerRegistry};

/// Callback invoked with the application context and the event in flight.
type EventHandler = Rc<RefCell<dyn FnMut(&Application, &mut Event)>>;

/// Identifier returned by [`Application::add_event_listener`], used to
/// deregister the listener later.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

/// The fixed named-handler slots, one per known event type.
///
/// The `update` slot carries the frame delta instead of an event, so it has
/// its own callback shape.
#[derive(Default)]
struct NamedHandlers {
    load: Option<EventHandler>,
    before_unload: Option<EventHandler>,
    unload: Option<EventHandler>,
    key_up: Option<EventHandler>,
    key_down: Option<EventHandler>,
    update: Option<FrameCallback>,
}

impl NamedHandlers {
    fn slot_mut(&mut self, ty: EventType) -> &mut Option<EventHandler> {
        match ty {
            EventType::Load => &mut self.load,
            EventType::BeforeUnload => &mut self.before_unload,
            EventType::Unload => &mut self.unload,
            EventType::KeyUp => &mut self.key_up,
            EventType::KeyDown => &mut self.key_down,
        }
    }

    fn for_event(&self, name: &str) -> Option<EventHandler> {
        let slot = match EventType::from_name(name)? {
            EventType::Load => &self.load,
            EventType::BeforeUnload => &self.before_unload,
            EventType::Unload => &self.unload,
            EventType::KeyUp => &self.key_up,
            EventType::KeyDown => &self.key_down,
        };
        slot.clone()
    }
}

thread_local! {
    // One live coordinator per thread. The type is !Send anyway (Rc
    // callbacks), so per-thread scoping is exact.
    static LIVE: Cell<bool> = const { Cell::new(false) };
}

/// The process-wide application context.
///
/// Constructed exactly once (a second live instance is a fatal caller
/// error) and handed by reference to every callback, so listeners and
/// timers can re-enter the registration APIs without a global. All methods
/// take `&self`: the engine delivers callbacks on a single thread and every
/// internal collection lives behind a `RefCell`, with no borrow held across
/// a user callback.
///
/// The engine drives the application through three entry points:
/// [`load`] once after host init, [`update`] every frame, and
/// [`fire_event`] per input occurrence. Everything else is registration and
/// cached window state.
///
/// [`load`]: Application::load
/// [`update`]: Application::update
/// [`fire_event`]: Application::fire_event
pub struct Application {
    host: RefCell<Box<dyn Host>>,
    handles: RefCell<HandleTable>,
    stage: RefCell<Option<Element>>,

    // Cached window state, change-suppressed on write.
    title: RefCell<String>,
    window_state: Cell<WindowState>,
    size: Cell<Size>,

    // Dispatch tables.
    handlers: RefCell<NamedHandlers>,
    listeners: RefCell<HashMap<String, Vec<(ListenerId, EventHandler)>>>,
    next_listener_id: Cell<u64>,

    // Frame scheduler and timers.
    queue: RefCell<ProcessQueue>,
    timers: RefCell<TimerRegistry>,
}

impl Application {
    /// Initializes the host exactly once and captures its effective title,
    /// window state, and size as the initial cached values.
    ///
    /// # Panics
    ///
    /// Panics if a live `Application` already exists on this thread.
    pub fn new(mut host: Box<dyn Host>, args: &HostArgs) -> Result<Application> {
        LIVE.with(|live| {
            assert!(!live.get(), "Application already has a live instance");
        });
        let init = host.init(args).context("host initialization failed")?;
        LIVE.with(|live| live.set(true));
        log::debug!(
            "application initialized: \"{}\", {:?}, {}x{}",
            init.title,
            init.window_state,
            init.size.width,
            init.size.height
        );
        Ok(Application {
            host: RefCell::new(host),
            handles: RefCell::new(HandleTable::new()),
            stage: RefCell::new(None),
            title: RefCell::new(init.title),
            window_state: Cell::new(init.window_state),
            size: Cell::new(init.size),
            handlers: RefCell::new(NamedHandlers::default()),
            listeners: RefCell::new(HashMap::new()),
            next_listener_id: Cell::new(0),
            queue: RefCell::new(ProcessQueue::new()),
            timers: RefCell::new(TimerRegistry::new()),
        })
    }

    // ── Lifecycle entry points (called by the engine) ─────────────────────

    /// Adopts the engine's root node as the stage element — the only
    /// element ever built from a pre-existing handle — then dispatches a
    /// `load` event.
    pub fn load(&self, root: RawHandle) {
        let key = self.handles.borrow_mut().insert(root);
        *self.stage.borrow_mut() = Some(Element::from_key(key));
        log::debug!("stage attached");
        self.dispatch(&mut Event::new(EventType::Load.name()));
    }

    /// Frame tick. Runs, in order: the named update handler, every live
    /// scheduler slot in queue order (vacant slots skipped), then the timer
    /// registry.
    pub fn update(&self, delta: f64) {
        let own = self.handlers.borrow().update.clone();
        if let Some(handler) = own {
            (*handler.borrow_mut())(self, delta);
        }

        // Length is re-read every iteration so slots appended by a callback run
        // within the same tick; releases null in place, so indices never
        // desync.
        let mut index = 0;
        loop {
            let callback = {
                let queue = self.queue.borrow();
                if index >= queue.len() {
                    break;
                }
                queue.get(index)
            };
            if let Some(callback) = callback {
                (*callback.borrow_mut())(self, delta);
            }
            index += 1;
        }

        self.tick_timers(delta);
    }

    /// Translates a native input event code into a keyboard event and
    /// dispatches it. Returns false when a handler prevented the default
    /// action. Unknown codes are accepted unmodeled (returns true).
    pub fn fire_event(&self, code: u32, key_code: u32, key: &str, flags: u32) -> bool {
        let ty = match code {
            1 => EventType::KeyUp,
            2 => EventType::KeyDown,
            _ => {
                log::trace!("unmodeled input event code {code}");
                return true;
            }
        };
        self.dispatch(&mut Event::keyboard(ty, key_code, key, flags))
    }

    /// Routes `event` through the named handler for its type, then the
    /// listener list in insertion order. Either side can halt further
    /// listener invocation with [`Event::stop_propagation`]. Returns
    /// `!event.default_prevented()`.
    ///
    /// Listeners may register or deregister listeners and timers while the
    /// dispatch is running; the list being iterated is a snapshot, so such
    /// changes take effect from the next dispatch.
    pub fn dispatch(&self, event: &mut Event) -> bool {
        let own = self.handlers.borrow().for_event(event.name());
        if let Some(handler) = own {
            (*handler.borrow_mut())(self, event);
            if !event.bubbles() {
                return !event.default_prevented();
            }
        }

        let snapshot: Vec<EventHandler> = self
            .listeners
            .borrow()
            .get(event.name())
            .map(|list| list.iter().map(|(_, callback)| callback.clone()).collect())
            .unwrap_or_default();
        for callback in snapshot {
            (*callback.borrow_mut())(self, event);
            if !event.bubbles() {
                break;
            }
        }

        !event.default_prevented()
    }

    // ── Handler / listener registration ───────────────────────────────────

    /// Installs the single named handler for `ty`, replacing any previous
    /// one. The named handler runs before the listener list.
    pub fn set_handler<F>(&self, ty: EventType, handler: F)
    where
        F: FnMut(&Application, &mut Event) + 'static,
    {
        *self.handlers.borrow_mut().slot_mut(ty) = Some(Rc::new(RefCell::new(handler)));
    }

    pub fn clear_handler(&self, ty: EventType) {
        *self.handlers.borrow_mut().slot_mut(ty) = None;
    }

    /// Installs the named per-frame handler, which runs first in every
    /// [`update`](Application::update) tick.
    pub fn set_update_handler<F>(&self, handler: F)
    where
        F: FnMut(&Application, f64) + 'static,
    {
        self.handlers.borrow_mut().update = Some(Rc::new(RefCell::new(handler)));
    }

    pub fn clear_update_handler(&self) {
        self.handlers.borrow_mut().update = None;
    }

    /// Appends a listener for `name` (any string; the known lifecycle names
    /// plus arbitrary listener-only types). Listeners run in insertion
    /// order after the named handler.
    pub fn add_event_listener<F>(&self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: FnMut(&Application, &mut Event) + 'static,
    {
        let id = ListenerId(self.next_listener_id.get() + 1);
        self.next_listener_id.set(id.0);
        self.listeners
            .borrow_mut()
            .entry(name.into())
            .or_default()
            .push((id, Rc::new(RefCell::new(listener))));
        id
    }

    /// Removes a listener. Unknown names or ids are a no-op.
    pub fn remove_event_listener(&self, name: &str, id: ListenerId) {
        if let Some(list) = self.listeners.borrow_mut().get_mut(name) {
            list.retain(|(listener_id, _)| *listener_id != id);
        }
    }

    // ── Timers ────────────────────────────────────────────────────────────

    /// Registers a timer firing every `interval_ms` milliseconds of
    /// accumulated frame time (once, for [`TimerKind::OneShot`]).
    pub fn add_timer<F>(&self, kind: TimerKind, interval_ms: f64, callback: F) -> TimerId
    where
        F: FnMut(&Application) + 'static,
    {
        self.timers
            .borrow_mut()
            .insert(kind, Rc::new(RefCell::new(callback)), interval_ms)
    }

    /// Removes a timer. Unknown ids are a no-op.
    pub fn remove_timer(&self, id: TimerId) {
        self.timers.borrow_mut().remove(id);
    }

    fn tick_timers(&self, delta: f64) {
        // Due set computed up front (insertion order); a due timer removed
        // by an earlier callback in the same tick no longer fires.
        let due = self.timers.borrow_mut().advance(delta);
        for id in due {
            loop {
                let next = {
                    let mut timers = self.timers.borrow_mut();
                    match timers.get_mut(id) {
                        Some(timer) if timer.elapsed >= timer.interval => {
                            Some((timer.callback.clone(), timer.kind))
                        }
                        _ => None,
                    }
                };
                let Some((callback, kind)) = next else { break };
                (*callback.borrow_mut())(self);

                let mut timers = self.timers.borrow_mut();
                if kind == TimerKind::OneShot {
                    timers.remove(id);
                    break;
                }
                match timers.get_mut(id) {
                    // Wrap rather than reset, preserving the sub-interval
                    // remainder; firing repeats while a whole interval
                    // remains, so the fire count is invariant to how the
                    // elapsed time was chunked across ticks.
                    Some(timer) if timer.interval > 0.0 => timer.elapsed -= timer.interval,
                    // Non-positive interval: once per tick.
                    Some(timer) => {
                        timer.elapsed = 0.0;
                        break;
                    }
                    // The callback removed its own timer.
                    None => break,
                }
            }
        }
    }

    // ── Delegated window state ────────────────────────────────────────────

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Sets the window title. Writing the cached value issues no host call;
    /// a new value updates the cache and issues exactly one.
    pub fn set_title(&self, title: &str) {
        if *self.title.borrow() == title {
            return;
        }
        *self.title.borrow_mut() = title.to_string();
        self.host.borrow_mut().set_title(title);
    }

    pub fn window_state(&self) -> WindowState {
        self.window_state.get()
    }

    pub fn set_window_state(&self, state: WindowState) {
        if self.window_state.get() == state {
            return;
        }
        self.window_state.set(state);
        self.host.borrow_mut().set_window_state(state);
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Sets the window size; accepts `Size`, `(u32, u32)`, or `[u32; 2]`.
    pub fn set_size(&self, size: impl Into<Size>) {
        let size = size.into();
        if self.size.get() == size {
            return;
        }
        self.size.set(size);
        self.host.borrow_mut().set_size(size);
    }

    pub fn quit(&self) {
        self.host.borrow_mut().quit();
    }

    pub fn close(&self) {
        self.host.borrow_mut().close();
    }

    /// The stage (root) element's key, once [`load`](Application::load) has
    /// run, for parenting new elements.
    pub fn stage_key(&self) -> Option<HandleKey> {
        self.stage.borrow().as_ref().map(|stage| stage.key())
    }

    // ── Native bridge (used by Element) ───────────────────────────────────

    pub(crate) fn create_native(&self, kind: u32, props: &ElementProps) -> HandleKey {
        let raw = self.host.borrow_mut().create_element(kind, props);
        self.handles.borrow_mut().insert(raw)
    }

    pub(crate) fn attach_native(&self, parent: HandleKey, child: HandleKey) {
        let parent = self.raw(parent);
        let child = self.raw(child);
        self.host.borrow_mut().attach_element(parent, child);
    }

    pub(crate) fn release_native(&self, key: HandleKey) {
        let raw = self
            .handles
            .borrow_mut()
            .remove(key)
            .expect("use of a released element");
        self.host.borrow_mut().release_element(raw);
    }

    fn raw(&self, key: HandleKey) -> RawHandle {
        self.handles
            .borrow()
            .get(key)
            .expect("use of a released element")
    }

    pub(crate) fn slot_acquire(&self, callback: FrameCallback) -> usize {
        self.queue.borrow_mut().acquire(callback)
    }

    pub(crate) fn slot_replace(&self, slot: usize, callback: FrameCallback) {
        self.queue.borrow_mut().replace(slot, callback);
    }

    pub(crate) fn slot_release(&self, slot: usize) {
        self.queue.borrow_mut().release(slot);
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(false));
    }
}
