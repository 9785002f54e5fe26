//! vesta application layer — the runtime-facing control core of the engine.
//!
//! The native engine (behind [`vesta_host::Host`]) owns the window and draws
//! pixels; this crate owns everything the engine calls back into:
//!
//! - [`Application`] — explicit context object orchestrating dispatch, the
//!   timer registry, the per-frame scheduler, and cached window state.
//! - [`Element`] — a retained scene node wrapping an opaque native handle.
//! - [`Event`] — cancelable, bubble-capable notifications, with keyboard
//!   payloads decoded from the engine's packed flag integer.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use vesta_app::prelude::*;
//!
//! let app = Application::new(Box::new(engine), &HostArgs::default())?;
//! app.set_handler(EventType::Load, |app, _event| {
//!     let panel = Element::new(app, 0, &ElementProps::default(), app.stage_key());
//!     panel.set_update(app, |_app, delta| { /* per-frame work */ });
//! });
//! // The engine then drives the app:
//! //   app.load(root_handle)       once, after init
//! //   app.update(delta_seconds)   every frame
//! //   app.fire_event(code, ...)   per input occurrence
//! ```

pub mod app;
pub mod element;
pub mod event;
pub mod logging;

pub(crate) mod queue;
pub(crate) mod timer;

pub use app::{Application, ListenerId};
pub use element::Element;
pub use event::{Event, EventType, KeyInfo, Modifiers};
pub use timer::{TimerId, TimerKind};

/// Everything an application built on vesta needs.
pub mod prelude {
    pub use crate::app::{Application, ListenerId};
    pub use crate::element::Element;
    pub use crate::event::{Event, EventType, KeyInfo, Modifiers};
    pub use crate::logging::{LoggingConfig, init_logging};
    pub use crate::timer::{TimerId, TimerKind};

    // Re-export the host boundary types everyone needs.
    pub use vesta_host::{
        ElementProps, HandleKey, Host, HostArgs, HostInit, Position, RawHandle, Size, WindowState,
    };
}
