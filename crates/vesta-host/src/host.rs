use anyhow::Result;

use crate::handle::RawHandle;

/// Window presentation state mirrored from the native engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
}

/// Window or element size in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Size {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

/// Element position in physical pixels, relative to the parent.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Startup parameters forwarded to [`Host::init`].
///
/// `None` fields keep whatever default the engine was built with; the
/// engine reports the effective values back through [`HostInit`].
#[derive(Debug, Clone, Default)]
pub struct HostArgs {
    pub title: Option<String>,
    pub size: Option<Size>,
    pub window_state: Option<WindowState>,
    pub fullscreen: bool,
}

/// Effective engine state captured by the one-time [`Host::init`] call.
///
/// These become the control layer's initial cached title/state/size values.
#[derive(Debug, Clone)]
pub struct HostInit {
    pub size: Size,
    pub title: String,
    pub window_state: WindowState,
}

/// Properties applied to a newly created scene node.
///
/// Unset fields leave the engine defaults in place. `background_color` is a
/// packed `0xAARRGGBB` value, the engine's native color wire format.
#[derive(Debug, Clone, Default)]
pub struct ElementProps {
    pub size: Option<Size>,
    pub position: Option<Position>,
    pub background_color: Option<u32>,
}

/// Contract implemented by the native rendering/windowing engine.
///
/// Every call except [`init`] is fire-and-forget: the control layer never
/// relies on a return value, and failures are the engine's concern. All
/// calls are synchronous and arrive on whichever thread the engine uses to
/// deliver its own callbacks.
///
/// [`init`]: Host::init
pub trait Host {
    /// One-time engine setup. Returns the effective initial window state.
    fn init(&mut self, args: &HostArgs) -> Result<HostInit>;

    /// Allocates a new scene node. `kind` is the native element type tag
    /// (0 = plain render element).
    fn create_element(&mut self, kind: u32, props: &ElementProps) -> RawHandle;

    /// Attaches `child` under `parent` in the engine's scene tree.
    fn attach_element(&mut self, parent: RawHandle, child: RawHandle);

    /// Destroys a scene node. The handle must not be used afterwards.
    fn release_element(&mut self, handle: RawHandle);

    fn set_title(&mut self, title: &str);

    fn set_window_state(&mut self, state: WindowState);

    fn set_size(&mut self, size: Size);

    /// Requests engine shutdown.
    fn quit(&mut self);

    /// Requests that the window be closed.
    fn close(&mut self);
}
