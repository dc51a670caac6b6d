//! Window records and the pure style calculator.

use bitflags::bitflags;
use dpi::{PhysicalPosition, PhysicalSize};

use crate::cursor::CursorMode;
use crate::os::{IconHandle, MonitorId, WindowHandle};

bitflags! {
    /// Native window style bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowStyle: u32 {
        const BORDER        = 0x0080_0000;
        const DLGFRAME      = 0x0040_0000;
        /// Title bar framing.
        const CAPTION       = Self::BORDER.bits() | Self::DLGFRAME.bits();
        const CLIPCHILDREN  = 0x0200_0000;
        const CLIPSIBLINGS  = 0x0400_0000;
        const MAXIMIZEBOX   = 0x0001_0000;
        const MINIMIZEBOX   = 0x0002_0000;
        /// Borderless window.
        const POPUP         = 0x8000_0000;
        const SYSMENU       = 0x0008_0000;
        /// Resizable border.
        const THICKFRAME    = 0x0004_0000;
    }
}

bitflags! {
    /// Native extended window style bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowExStyle: u32 {
        /// Forces a taskbar entry.
        const APPWINDOW = 0x0004_0000;
        const TOPMOST   = 0x0000_0008;
    }
}

/// Identifier of a window tracked by a [`Context`].
///
/// [`Context`]: crate::context::Context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

/// A width:height ratio interactive resizing must preserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub numer: u32,
    pub denom: u32,
}

/// The window edge or corner being dragged during an interactive resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Decoration extents around the client area: how far the full window
/// rectangle extends past the client rectangle on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameExtents {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Initial configuration for [`Context::create_window`].
///
/// [`Context::create_window`]: crate::context::Context::create_window
#[derive(Debug, Clone)]
pub struct WindowAttributes {
    pub title: String,
    /// Requested client-area size.
    pub surface_size: PhysicalSize<u32>,
    pub position: PhysicalPosition<i32>,
    pub decorated: bool,
    pub resizable: bool,
    /// Keep the window above non-topmost windows.
    pub floating: bool,
    /// Create full-screen on this monitor. The monitor must be present in
    /// the registry; a stale id falls back to windowed creation.
    pub fullscreen: Option<MonitorId>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        WindowAttributes {
            title: String::new(),
            surface_size: PhysicalSize::new(800, 600),
            position: PhysicalPosition::new(0, 0),
            decorated: true,
            resizable: true,
            floating: false,
            fullscreen: None,
            aspect_ratio: None,
        }
    }
}

impl WindowAttributes {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_surface_size(mut self, size: PhysicalSize<u32>) -> Self {
        self.surface_size = size;
        self
    }

    pub fn with_position(mut self, position: PhysicalPosition<i32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_decorations(mut self, decorated: bool) -> Self {
        self.decorated = decorated;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    pub fn with_fullscreen(mut self, monitor: Option<MonitorId>) -> Self {
        self.fullscreen = monitor;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: Option<AspectRatio>) -> Self {
        self.aspect_ratio = ratio;
        self
    }
}

/// A top-level window tracked by a [`Context`].
///
/// [`Context`]: crate::context::Context
#[derive(Debug)]
pub struct Window {
    pub(crate) handle: WindowHandle,
    pub(crate) decorated: bool,
    pub(crate) resizable: bool,
    pub(crate) floating: bool,
    /// The monitor this window is full-screen on. Kept in lockstep with that
    /// monitor's owner field.
    pub(crate) monitor: Option<MonitorId>,
    pub(crate) aspect_ratio: Option<AspectRatio>,
    pub(crate) cursor: Option<IconHandle>,
    pub(crate) cursor_mode: CursorMode,
    /// (large, small) icons assigned to the window, if any.
    pub(crate) icons: Option<(IconHandle, IconHandle)>,
}

impl Window {
    pub(crate) fn new(attrs: &WindowAttributes) -> Window {
        Window {
            // The native handle is assigned once the OS window exists.
            handle: WindowHandle(0),
            decorated: attrs.decorated,
            resizable: attrs.resizable,
            floating: attrs.floating,
            monitor: attrs.fullscreen,
            aspect_ratio: attrs.aspect_ratio,
            cursor: None,
            cursor_mode: CursorMode::Normal,
            icons: None,
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn decorated(&self) -> bool {
        self.decorated
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn floating(&self) -> bool {
        self.floating
    }

    /// The monitor this window is full-screen on, if any.
    pub fn monitor(&self) -> Option<MonitorId> {
        self.monitor
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Derive the native style bits from the window's configuration.
    ///
    /// Full-screen forces a bare popup; otherwise decoration selects between
    /// caption framing and popup, and resizability only matters for
    /// decorated windows. Recomputed on every use, never cached.
    pub fn style(&self) -> WindowStyle {
        let mut style = WindowStyle::CLIPSIBLINGS | WindowStyle::CLIPCHILDREN;

        if self.monitor.is_some() {
            style |= WindowStyle::POPUP;
        } else {
            style |= WindowStyle::SYSMENU | WindowStyle::MINIMIZEBOX;
            if self.decorated {
                style |= WindowStyle::CAPTION;
                if self.resizable {
                    style |= WindowStyle::MAXIMIZEBOX | WindowStyle::THICKFRAME;
                }
            } else {
                style |= WindowStyle::POPUP;
            }
        }

        style
    }

    /// Derive the native extended style bits from the window's
    /// configuration.
    pub fn ex_style(&self) -> WindowExStyle {
        let mut style = WindowExStyle::APPWINDOW;

        if self.floating {
            style |= WindowExStyle::TOPMOST;
        }

        style
    }
}
