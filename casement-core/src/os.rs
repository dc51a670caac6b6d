//! The OS call adapter contract.
//!
//! [`OsApi`] is the synchronous foreign-call surface the rest of the crate is
//! written against. A backend crate implements it by marshalling each
//! operation to the native window manager; tests implement it with scripted
//! in-memory state. Every fallible operation reports failure as an
//! [`OsError`] carrying the native call name and error code, and no operation
//! is retried by the core.
//!
//! All handles are opaque to the core. They are only ever compared and passed
//! back to the adapter that produced them.

use dpi::{PhysicalPosition, PhysicalSize};

use crate::cursor::CursorIcon;
use crate::error::OsError;
use crate::monitor::VideoMode;
use crate::window::{WindowExStyle, WindowStyle};

/// The DPI the OS assumes when no scaling is in effect.
pub const USER_DEFAULT_SCREEN_DPI: u32 = 96;

/// Native handle identifying a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(pub u64);

/// Native handle identifying a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Native handle to an icon or cursor resource.
///
/// The two share a handle type because they share one on the systems this
/// models: a native cursor is an icon with a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle(pub u64);

/// Native handle to a bitmap resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapHandle(pub u64);

/// Native handle to a device context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DcHandle(pub u64);

/// A rectangle in virtual desktop coordinates, edges inclusive-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// A rectangle at the origin with the given client size.
    pub fn of_size(size: PhysicalSize<u32>) -> Rect {
        Rect { left: 0, top: 0, right: size.width as i32, bottom: size.height as i32 }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Optional native entry points, probed once at startup and cached by the
/// context for the life of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCapabilities {
    /// The DPI-aware variant of [`OsApi::adjust_window_rect_for_dpi`] exists.
    pub adjust_rect_for_dpi: bool,
    /// Per-window DPI queries ([`OsApi::window_dpi`]) exist.
    pub window_dpi: bool,
}

/// Static description of a connected monitor, as reported by enumeration.
#[derive(Debug, Clone)]
pub struct MonitorDesc {
    pub id: MonitorId,
    /// Human-readable display name.
    pub name: String,
    /// Top-left corner in virtual desktop coordinates.
    pub position: PhysicalPosition<i32>,
    /// Physical extents in millimeters.
    pub physical_size_mm: (u32, u32),
}

/// Descriptor for a top-down 32-bit device-independent bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DibHeader {
    pub width: i32,
    /// Negative height selects top-down row order.
    pub height: i32,
    pub bit_count: u16,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

impl DibHeader {
    /// Header for a top-down 32-bit BGRA section sized `width` x `height`.
    pub fn top_down_bgra(width: u32, height: u32) -> DibHeader {
        DibHeader {
            width: width as i32,
            height: -(height as i32),
            bit_count: 32,
            red_mask: 0x00ff_0000,
            green_mask: 0x0000_ff00,
            blue_mask: 0x0000_00ff,
            alpha_mask: 0xff00_0000,
        }
    }
}

/// Everything the OS needs to assemble an icon or cursor resource.
#[derive(Debug, Clone, Copy)]
pub struct IconSpec {
    /// `true` for an icon, `false` for a cursor.
    pub icon: bool,
    pub hotspot_x: u32,
    pub hotspot_y: u32,
    /// 1-bit mask bitmap. Owned by the OS once the icon is built.
    pub mask: BitmapHandle,
    /// 32-bit color bitmap. Owned by the OS once the icon is built.
    pub color: BitmapHandle,
}

/// How [`Context::pump_events`] retrieves messages.
///
/// [`Context::pump_events`]: crate::context::Context::pump_events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpMode {
    /// Drain pending messages without blocking; may dispatch nothing.
    Poll,
    /// Block until at least one message arrives, then drain the rest.
    Wait,
}

/// One undecoded native message, as retrieved from the thread's queue.
#[derive(Debug, Clone, Copy)]
pub struct RawMessage {
    /// Target window, if the message is addressed to one.
    pub window: Option<WindowHandle>,
    /// Native message identifier.
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

/// The synchronous OS windowing surface.
///
/// Implementations marshal each call to the native API and translate the
/// native failure convention into [`OsError`]. All calls must be made from
/// the thread that owns the native message queue; see the crate-level
/// threading contract.
pub trait OsApi {
    /// Probe which optional entry points the running OS provides.
    ///
    /// Called once per [`Context`](crate::context::Context); the result is
    /// cached rather than re-probed per call.
    fn capabilities(&self) -> OsCapabilities;

    // Monitors.

    /// Enumerate connected monitors, primary first.
    fn enumerate_monitors(&self) -> Result<Vec<MonitorDesc>, OsError>;

    /// Every video mode the monitor can be driven at, in enumeration order.
    fn video_modes(&self, monitor: MonitorId) -> Result<Vec<VideoMode>, OsError>;

    /// The mode the monitor is currently driven at.
    fn current_video_mode(&self, monitor: MonitorId) -> Result<VideoMode, OsError>;

    fn monitor_position(&self, monitor: MonitorId) -> Result<PhysicalPosition<i32>, OsError>;

    /// The monitor rectangle excluding taskbars and docked toolbars.
    fn monitor_work_area(&self, monitor: MonitorId) -> Result<Rect, OsError>;

    /// Effective DPI per axis for the monitor.
    fn monitor_dpi(&self, monitor: MonitorId) -> Result<(u32, u32), OsError>;

    // Windows.

    /// Create a native top-level window. `size` is the full window size
    /// including decoration, `position` its top-left corner.
    fn create_window(
        &self,
        title: &str,
        style: WindowStyle,
        ex_style: WindowExStyle,
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
    ) -> Result<WindowHandle, OsError>;

    fn destroy_window(&self, window: WindowHandle) -> Result<(), OsError>;

    /// Replace the window's style bits and refresh its non-client area.
    fn apply_window_style(
        &self,
        window: WindowHandle,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), OsError>;

    fn set_window_pos(
        &self,
        window: WindowHandle,
        position: PhysicalPosition<i32>,
    ) -> Result<(), OsError>;

    /// Resize the client area.
    fn set_window_size(
        &self,
        window: WindowHandle,
        size: PhysicalSize<u32>,
    ) -> Result<(), OsError>;

    fn window_client_size(&self, window: WindowHandle) -> Result<PhysicalSize<u32>, OsError>;

    /// Effective DPI of the window. Only called when
    /// [`OsCapabilities::window_dpi`] was probed as available.
    fn window_dpi(&self, window: WindowHandle) -> Result<u32, OsError>;

    // Geometry.

    /// Expand a client rectangle to the full window rectangle for the given
    /// styles at default DPI.
    fn adjust_window_rect(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), OsError>;

    /// DPI-aware variant of [`OsApi::adjust_window_rect`]. Only called when
    /// [`OsCapabilities::adjust_rect_for_dpi`] was probed as available.
    fn adjust_window_rect_for_dpi(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
        dpi: u32,
    ) -> Result<(), OsError>;

    // Icon and cursor resources.

    /// Acquire the screen device context. Must be balanced with
    /// [`OsApi::release_screen_dc`] on every path.
    fn acquire_screen_dc(&self) -> Result<DcHandle, OsError>;

    fn release_screen_dc(&self, dc: DcHandle);

    /// Create a DIB section described by `header` and copy `pixels` (already
    /// in the header's channel order) into it.
    fn create_color_bitmap(
        &self,
        dc: DcHandle,
        header: &DibHeader,
        pixels: &[u8],
    ) -> Result<BitmapHandle, OsError>;

    /// Create a 1-bit mask bitmap of the given size.
    fn create_mask_bitmap(&self, width: u32, height: u32) -> Result<BitmapHandle, OsError>;

    fn delete_bitmap(&self, bitmap: BitmapHandle);

    /// Combine mask and color bitmaps into an icon or cursor resource. On
    /// success the bitmaps are owned by the OS; on failure the caller keeps
    /// them.
    fn create_icon(&self, spec: &IconSpec) -> Result<IconHandle, OsError>;

    fn destroy_icon(&self, icon: IconHandle);

    /// Preferred sizes for (large, small) window icons.
    fn standard_icon_sizes(&self) -> (PhysicalSize<u32>, PhysicalSize<u32>);

    /// Assign or clear the window's large and small icons.
    fn set_window_icons(
        &self,
        window: WindowHandle,
        big: Option<IconHandle>,
        small: Option<IconHandle>,
    );

    /// Load one of the OS-provided cursor shapes.
    fn load_system_cursor(&self, icon: CursorIcon) -> Result<IconHandle, OsError>;

    /// Set the active cursor shape, or hide the cursor with `None`.
    fn set_cursor(&self, cursor: Option<IconHandle>);

    // Message pump.

    /// Retrieve the next pending message without blocking.
    fn poll_message(&self) -> Option<RawMessage>;

    /// Block until a message arrives and retrieve it.
    fn wait_message(&self) -> Result<RawMessage, OsError>;

    /// Forward a retrieved message to the window procedure.
    fn dispatch_message(&self, message: &RawMessage);
}
