use std::fmt;

/// Event types with a dedicated named-handler slot on
/// [`Application`](crate::Application).
///
/// This is the fixed set of lifecycle/input notifications the engine
/// delivers. Arbitrary string names remain valid for listener-only use via
/// [`Application::add_event_listener`](crate::Application::add_event_listener);
/// the per-frame `update` callback carries a delta and has its own slot
/// ([`Application::set_update_handler`](crate::Application::set_update_handler)).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventType {
    Load,
    BeforeUnload,
    Unload,
    KeyUp,
    KeyDown,
}

impl EventType {
    /// The wire name of this event type, as used in listener registration.
    pub fn name(self) -> &'static str {
        match self {
            EventType::Load => "load",
            EventType::BeforeUnload => "beforeunload",
            EventType::Unload => "unload",
            EventType::KeyUp => "keyup",
            EventType::KeyDown => "keydown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "load" => Some(EventType::Load),
            "beforeunload" => Some(EventType::BeforeUnload),
            "unload" => Some(EventType::Unload),
            "keyup" => Some(EventType::KeyUp),
            "keydown" => Some(EventType::KeyDown),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyboard modifier state decoded from the engine's packed flags.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }

    fn from_flags(flags: u32) -> Self {
        Self {
            ctrl: flags & 0x02 != 0,
            shift: flags & 0x04 != 0,
            alt: flags & 0x08 != 0,
            meta: flags & 0x10 != 0,
        }
    }
}

/// Key payload carried by `keyup` / `keydown` events.
///
/// Immutable after construction; built from the single packed flags integer
/// the engine reports per key occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInfo {
    /// Platform key code.
    pub key_code: u32,
    /// Printable key value, when there is one.
    pub key: String,
    pub modifiers: Modifiers,
    /// True when the occurrence is an auto-repeat.
    pub repeat: bool,
    /// Key location (0 standard, 1 left, 2 right, 3 numpad).
    pub location: u32,
}

impl KeyInfo {
    /// Decodes the packed flags: bit 1 ctrl, bit 2 shift, bit 3 alt,
    /// bit 4 meta, bit 5 repeat, remaining high bits the location.
    /// (Bit 0 is the engine's press/release discriminator and is not
    /// represented here.)
    pub fn from_flags(key_code: u32, key: impl Into<String>, flags: u32) -> Self {
        Self {
            key_code,
            key: key.into(),
            modifiers: Modifiers::from_flags(flags),
            repeat: flags & 0x20 != 0,
            location: flags >> 6,
        }
    }
}

/// A cancelable, bubble-capable notification routed through
/// [`Application::dispatch`](crate::Application::dispatch).
///
/// Events are created fresh per occurrence and never reused across
/// dispatches. The only mutations are [`stop_propagation`] and
/// [`prevent_default`].
///
/// [`stop_propagation`]: Event::stop_propagation
/// [`prevent_default`]: Event::prevent_default
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    bubbles: bool,
    default_prevented: bool,
    key: Option<KeyInfo>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bubbles: true,
            default_prevented: false,
            key: None,
        }
    }

    /// Builds a keyboard event for `ty` (`KeyUp` or `KeyDown`) with its
    /// payload decoded from the packed `flags`.
    pub fn keyboard(ty: EventType, key_code: u32, key: impl Into<String>, flags: u32) -> Self {
        Self {
            name: ty.name().to_string(),
            bubbles: true,
            default_prevented: false,
            key: Some(KeyInfo::from_flags(key_code, key, flags)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keyboard payload, present on `keyup` / `keydown` events.
    pub fn key(&self) -> Option<&KeyInfo> {
        self.key.as_ref()
    }

    /// False once a handler has halted further listener invocation.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Halts further listener invocation for the current dispatch. Does not
    /// undo the effects of listeners already invoked.
    pub fn stop_propagation(&mut self) {
        self.bubbles = false;
    }

    /// Marks the event as defaulted; the dispatcher's return value reflects
    /// this so the engine can suppress its own default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── flag decoding ─────────────────────────────────────────────────────

    #[test]
    fn decodes_ctrl_shift() {
        let info = KeyInfo::from_flags(65, "a", 0x02 | 0x04);
        assert!(info.modifiers.ctrl);
        assert!(info.modifiers.shift);
        assert!(!info.modifiers.alt);
        assert!(!info.modifiers.meta);
        assert!(!info.repeat);
        assert_eq!(info.location, 0);
    }

    #[test]
    fn decodes_repeat_and_location() {
        // bit 5 repeat, high bits (>> 6) location.
        let info = KeyInfo::from_flags(16, "", 0x20 | (3 << 6));
        assert!(info.repeat);
        assert_eq!(info.location, 3);
        assert!(!info.modifiers.any());
    }

    #[test]
    fn press_release_bit_is_ignored() {
        let info = KeyInfo::from_flags(65, "a", 0x01);
        assert!(!info.modifiers.any());
        assert!(!info.repeat);
        assert_eq!(info.location, 0);
    }

    // ── event mutation ────────────────────────────────────────────────────

    #[test]
    fn fresh_event_bubbles_and_is_not_prevented() {
        let event = Event::new("load");
        assert_eq!(event.name(), "load");
        assert!(event.bubbles());
        assert!(!event.default_prevented());
        assert!(event.key().is_none());
    }

    #[test]
    fn stop_propagation_clears_bubbles() {
        let mut event = Event::new("keydown");
        event.stop_propagation();
        assert!(!event.bubbles());
        assert!(!event.default_prevented());
    }

    #[test]
    fn prevent_default_marks_event() {
        let mut event = Event::new("keydown");
        event.prevent_default();
        assert!(event.default_prevented());
        assert!(event.bubbles());
    }

    #[test]
    fn keyboard_event_carries_payload() {
        let event = Event::keyboard(EventType::KeyDown, 13, "Enter", 0x02);
        assert_eq!(event.name(), "keydown");
        let info = event.key().unwrap();
        assert_eq!(info.key_code, 13);
        assert_eq!(info.key, "Enter");
        assert!(info.modifiers.ctrl);
    }

    // ── event type names ──────────────────────────────────────────────────

    #[test]
    fn event_type_names_round_trip() {
        for ty in [
            EventType::Load,
            EventType::BeforeUnload,
            EventType::Unload,
            EventType::KeyUp,
            EventType::KeyDown,
        ] {
            assert_eq!(EventType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(EventType::from_name("update"), None);
        assert_eq!(EventType::from_name("resize"), None);
    }
}
