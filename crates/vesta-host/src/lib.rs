//! Host boundary for the vesta control layer.
//!
//! This crate defines the narrow interface between the control layer
//! (`vesta-app`) and the native rendering/windowing engine: the [`Host`]
//! trait, the wire-level value types it consumes, and the index/generation
//! [`HandleTable`] that makes use of a released native handle detectable
//! instead of undefined.
//!
//! It deliberately knows nothing about dispatch, timers, or scheduling —
//! those live in the layer above.

pub mod handle;
pub mod host;

pub use handle::{HandleKey, HandleTable, RawHandle};
pub use host::{ElementProps, Host, HostArgs, HostInit, Position, Size, WindowState};
