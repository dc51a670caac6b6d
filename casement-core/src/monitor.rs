//! Monitor records, video modes, the mode catalog and the nearest-mode
//! matcher.

use std::fmt;

use dpi::PhysicalPosition;

use crate::os::MonitorId;
use crate::window::WindowId;

/// A video mode a monitor can be driven at.
///
/// Equality considers the total color depth, not how it is split between
/// channels; the per-channel split only participates in matcher scoring.
#[derive(Debug, Clone, Copy, Eq)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    pub red_bits: u32,
    pub green_bits: u32,
    pub blue_bits: u32,
    /// Refresh rate in Hz.
    pub refresh_rate: u32,
}

impl VideoMode {
    /// Total color depth across the three channels.
    pub fn color_bits(&self) -> u32 {
        self.red_bits + self.green_bits + self.blue_bits
    }

    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl PartialEq for VideoMode {
    fn eq(&self, other: &Self) -> bool {
        self.color_bits() == other.color_bits()
            && self.width == other.width
            && self.height == other.height
            && self.refresh_rate == other.refresh_rate
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ {} Hz ({} bpp)",
            self.width,
            self.height,
            self.refresh_rate,
            self.color_bits(),
        )
    }
}

/// A requested video mode with optional "don't care" fields.
///
/// Width and height are always part of the request; the matcher's size score
/// is never skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredVideoMode {
    pub width: u32,
    pub height: u32,
    pub red_bits: Option<u32>,
    pub green_bits: Option<u32>,
    pub blue_bits: Option<u32>,
    pub refresh_rate: Option<u32>,
}

impl DesiredVideoMode {
    /// Request a resolution, leaving color depth and refresh rate
    /// unconstrained.
    pub fn sized(width: u32, height: u32) -> DesiredVideoMode {
        DesiredVideoMode {
            width,
            height,
            red_bits: None,
            green_bits: None,
            blue_bits: None,
            refresh_rate: None,
        }
    }
}

/// Sort a freshly enumerated catalog: ascending by total color depth, then
/// pixel area, then width, then refresh rate. The sort is stable so modes
/// with identical keys keep their enumeration order.
pub(crate) fn sort_video_modes(modes: &mut [VideoMode]) {
    modes.sort_by(|a, b| {
        (a.color_bits(), a.area(), a.width, a.refresh_rate).cmp(&(
            b.color_bits(),
            b.area(),
            b.width,
            b.refresh_rate,
        ))
    });
}

/// Pick the catalog entry closest to `desired`.
///
/// Candidates are scored on color distance, squared size distance and
/// refresh-rate distance, minimized lexicographically in that order. An
/// unconstrained refresh rate biases toward the highest rate available. Ties
/// keep the earliest candidate.
pub fn closest_mode(modes: &[VideoMode], desired: &DesiredVideoMode) -> Option<VideoMode> {
    let mut closest = None;
    let mut least = (u64::MAX, u64::MAX, u64::MAX);

    for mode in modes {
        let mut color = 0u64;
        if let Some(bits) = desired.red_bits {
            color += u64::from(mode.red_bits.abs_diff(bits));
        }
        if let Some(bits) = desired.green_bits {
            color += u64::from(mode.green_bits.abs_diff(bits));
        }
        if let Some(bits) = desired.blue_bits {
            color += u64::from(mode.blue_bits.abs_diff(bits));
        }

        let dw = i64::from(mode.width) - i64::from(desired.width);
        let dh = i64::from(mode.height) - i64::from(desired.height);
        let size = (dw * dw + dh * dh) as u64;

        let rate = match desired.refresh_rate {
            Some(rate) => u64::from(mode.refresh_rate.abs_diff(rate)),
            None => u64::MAX - u64::from(mode.refresh_rate),
        };

        // Strictly-smaller only, so equal scores keep the earlier entry.
        if (color, size, rate) < least {
            closest = Some(*mode);
            least = (color, size, rate);
        }
    }

    closest
}

/// Split a packed bits-per-pixel value into red, green and blue sizes.
///
/// 32 is treated as 24; a remainder of one bit goes to green, a second to
/// red.
pub fn split_bpp(mut bpp: u32) -> (u32, u32, u32) {
    if bpp == 32 {
        bpp = 24;
    }

    let mut red = bpp / 3;
    let green = bpp / 3 + u32::from(bpp % 3 >= 1);
    let blue = bpp / 3;
    if bpp % 3 == 2 {
        red += 1;
    }
    (red, green, blue)
}

/// A connected display device and its cached mode catalog.
///
/// Monitors are created by enumeration at startup or by a connect event and
/// evicted by a disconnect event; both transitions go through
/// [`Context`](crate::context::Context).
#[derive(Debug)]
pub struct Monitor {
    pub(crate) id: MonitorId,
    pub(crate) name: String,
    pub(crate) position: PhysicalPosition<i32>,
    pub(crate) physical_size_mm: (u32, u32),
    pub(crate) modes: Vec<VideoMode>,
    pub(crate) current_mode: Option<VideoMode>,
    /// The window holding this monitor full-screen, if any. Kept in lockstep
    /// with that window's monitor field.
    pub(crate) window: Option<WindowId>,
}

impl Monitor {
    pub fn id(&self) -> MonitorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-left corner in virtual desktop coordinates, as of enumeration.
    pub fn position(&self) -> PhysicalPosition<i32> {
        self.position
    }

    /// Physical extents in millimeters.
    pub fn physical_size_mm(&self) -> (u32, u32) {
        self.physical_size_mm
    }

    /// The cached mode catalog. Empty until refreshed through the context.
    pub fn video_modes(&self) -> &[VideoMode] {
        &self.modes
    }

    /// The mode the monitor was driven at when last observed.
    pub fn current_video_mode(&self) -> Option<VideoMode> {
        self.current_mode
    }

    /// The window currently full-screen on this monitor.
    pub fn fullscreen_window(&self) -> Option<WindowId> {
        self.window
    }
}

/// Hot-plug transition kind, as delivered to the monitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Connected,
    Disconnected,
}

/// Where a newly connected monitor is placed in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert at index 0, making the monitor primary.
    First,
    /// Append after the existing monitors.
    Last,
}

/// Monitor hot-plug callback. Invoked synchronously on the owning thread.
pub type MonitorCallback = Box<dyn FnMut(&Monitor, MonitorEvent)>;

/// Per-channel gamma lookup tables.
#[derive(Debug, Clone, Default)]
pub struct GammaRamp {
    pub red: Vec<u16>,
    pub green: Vec<u16>,
    pub blue: Vec<u16>,
}
