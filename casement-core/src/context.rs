//! The windowing context: monitor registry, window table and event pump.

use std::marker::PhantomData;

use dpi::{PhysicalPosition, PhysicalSize};
use tracing::{debug, warn};

use crate::cursor::{CursorIcon, CursorMode};
use crate::error::{Error, NotSupportedError, OsError};
use crate::icon::{closest_image, create_native_icon, IconKind, RgbaImage};
use crate::monitor::{
    closest_mode, sort_video_modes, DesiredVideoMode, GammaRamp, Monitor, MonitorCallback,
    MonitorEvent, Placement, VideoMode,
};
use crate::os::{
    IconHandle, MonitorDesc, MonitorId, OsApi, OsCapabilities, PumpMode, Rect, WindowHandle,
    USER_DEFAULT_SCREEN_DPI,
};
use crate::window::{
    AspectRatio, FrameExtents, ResizeEdge, Window, WindowAttributes, WindowExStyle, WindowId,
    WindowStyle,
};

/// Process-wide windowing state: the monitor registry, the window table and
/// the OS call adapter they operate through.
///
/// A `Context` confines all of its state to the thread that created it,
/// which must be the thread owning the native message queue. Every
/// operation, including monitor callbacks, runs synchronously on that
/// thread; the type is neither `Send` nor `Sync`, and that confinement is
/// what makes the registry and the window table safe without locks.
pub struct Context {
    os: Box<dyn OsApi>,
    caps: OsCapabilities,
    monitors: Vec<Monitor>,
    windows: Vec<Option<Window>>,
    monitor_callback: Option<MonitorCallback>,
    initialized: bool,
    // Pins the context to its creating thread.
    _single_thread: PhantomData<*const ()>,
}

impl Context {
    /// Start the subsystem: probe the adapter's capabilities once and
    /// enumerate the connected monitors, primary first.
    pub fn new(os: Box<dyn OsApi>) -> Result<Context, Error> {
        let caps = os.capabilities();
        if !caps.adjust_rect_for_dpi {
            warn!("DPI-aware rectangle adjustment unavailable, using default-DPI metrics");
        }

        let mut monitors = Vec::new();
        for desc in os.enumerate_monitors()? {
            let current_mode = os.current_video_mode(desc.id)?;
            monitors.push(new_monitor(desc, current_mode));
        }
        debug!(count = monitors.len(), "monitors enumerated");

        Ok(Context {
            os,
            caps,
            monitors,
            windows: Vec::new(),
            monitor_callback: None,
            initialized: true,
            _single_thread: PhantomData,
        })
    }

    /// Tear the subsystem down: destroy every remaining window and clear the
    /// registry. Any later operation fails with [`Error::NotInitialized`].
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        for slot in self.windows.iter_mut() {
            if let Some(window) = slot.take() {
                if let Some((big, small)) = window.icons {
                    self.os.destroy_icon(big);
                    self.os.destroy_icon(small);
                }
                if let Err(err) = self.os.destroy_window(window.handle) {
                    warn!(window = ?window.handle, %err, "failed to destroy window at shutdown");
                }
            }
        }
        self.windows.clear();
        self.monitors.clear();
        self.monitor_callback = None;
        self.initialized = false;
        debug!("windowing context shut down");
    }

    fn ensure_initialized(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// The probed OS capabilities in effect for this context.
    pub fn capabilities(&self) -> OsCapabilities {
        self.caps
    }

    // Monitors.

    /// All connected monitors. Index 0 is the primary monitor.
    pub fn monitors(&self) -> Result<&[Monitor], Error> {
        self.ensure_initialized()?;
        Ok(&self.monitors)
    }

    /// The primary monitor, or `None` when no monitor is connected.
    pub fn primary_monitor(&self) -> Result<Option<&Monitor>, Error> {
        self.ensure_initialized()?;
        Ok(self.monitors.first())
    }

    /// Look up a monitor by its native handle.
    ///
    /// # Panics
    ///
    /// Panics if the monitor is not in the registry.
    pub fn monitor(&self, id: MonitorId) -> Result<&Monitor, Error> {
        self.ensure_initialized()?;
        Ok(self.monitor_ref(id))
    }

    fn monitor_index(&self, id: MonitorId) -> Option<usize> {
        self.monitors.iter().position(|m| m.id == id)
    }

    fn monitor_ref(&self, id: MonitorId) -> &Monitor {
        let index = self.monitor_index(id).unwrap_or_else(|| panic!("unknown monitor: {id:?}"));
        &self.monitors[index]
    }

    /// Replace the monitor hot-plug callback, returning the previous one.
    ///
    /// A single slot: registering a new callback silently replaces the old
    /// one, and that old callback is handed back to the caller.
    pub fn set_monitor_callback(
        &mut self,
        callback: Option<MonitorCallback>,
    ) -> Result<Option<MonitorCallback>, Error> {
        self.ensure_initialized()?;
        Ok(std::mem::replace(&mut self.monitor_callback, callback))
    }

    /// Record a newly connected monitor and notify the subscriber.
    ///
    /// Called from backend glue when the OS reports a display change.
    pub fn monitor_connected(
        &mut self,
        desc: MonitorDesc,
        placement: Placement,
    ) -> Result<(), Error> {
        self.ensure_initialized()?;
        let current_mode = self.os.current_video_mode(desc.id)?;
        debug!(name = %desc.name, ?placement, "monitor connected");

        let monitor = new_monitor(desc, current_mode);
        let index = match placement {
            Placement::First => {
                self.monitors.insert(0, monitor);
                0
            },
            Placement::Last => {
                self.monitors.push(monitor);
                self.monitors.len() - 1
            },
        };

        if let Some(callback) = self.monitor_callback.as_mut() {
            callback(&self.monitors[index], MonitorEvent::Connected);
        }
        Ok(())
    }

    /// Evict a disconnected monitor and notify the subscriber.
    ///
    /// Every window full-screen on the monitor is first restored to a sane
    /// windowed state: it keeps its current size, gets its windowed styles
    /// back and is moved to its frame offset so the decoration stays on
    /// screen. Unknown handles are ignored; the OS can report disconnects
    /// for displays that were never enumerated.
    pub fn monitor_disconnected(&mut self, id: MonitorId) -> Result<(), Error> {
        self.ensure_initialized()?;
        let Some(index) = self.monitor_index(id) else {
            return Ok(());
        };

        let owned: Vec<WindowId> = self
            .windows
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|w| (i, w)))
            .filter(|(_, w)| w.monitor == Some(id))
            .map(|(i, _)| WindowId(i))
            .collect();
        for window in owned {
            let size = self.os.window_client_size(self.window_ref(window).handle)?;
            self.set_window_monitor(window, None, PhysicalPosition::new(0, 0), size)?;
            let extents = self.frame_extents(window)?;
            let handle = self.window_ref(window).handle;
            self.os.set_window_pos(handle, PhysicalPosition::new(extents.left, extents.top))?;
        }

        let monitor = self.monitors.remove(index);
        debug!(name = %monitor.name, "monitor disconnected");
        if let Some(callback) = self.monitor_callback.as_mut() {
            callback(&monitor, MonitorEvent::Disconnected);
        }
        Ok(())
    }

    /// Re-query the monitor's mode catalog, replacing the cached list.
    pub fn refresh_video_modes(&mut self, id: MonitorId) -> Result<&[VideoMode], Error> {
        self.ensure_initialized()?;
        let mut modes = self.os.video_modes(id)?;
        sort_video_modes(&mut modes);
        let index = self.monitor_index(id).unwrap_or_else(|| panic!("unknown monitor: {id:?}"));
        self.monitors[index].modes = modes;
        Ok(&self.monitors[index].modes)
    }

    /// Refresh the catalog and pick the mode closest to `desired`.
    ///
    /// Returns `None` only when the monitor reports no modes at all.
    pub fn choose_video_mode(
        &mut self,
        id: MonitorId,
        desired: &DesiredVideoMode,
    ) -> Result<Option<VideoMode>, Error> {
        let modes = self.refresh_video_modes(id)?;
        Ok(closest_mode(modes, desired))
    }

    /// Re-query the mode the monitor is currently driven at.
    pub fn current_video_mode(&mut self, id: MonitorId) -> Result<VideoMode, Error> {
        self.ensure_initialized()?;
        let mode = self.os.current_video_mode(id)?;
        let index = self.monitor_index(id).unwrap_or_else(|| panic!("unknown monitor: {id:?}"));
        self.monitors[index].current_mode = Some(mode);
        Ok(mode)
    }

    /// The monitor's current position in virtual desktop coordinates.
    pub fn monitor_position(&self, id: MonitorId) -> Result<PhysicalPosition<i32>, Error> {
        self.ensure_initialized()?;
        Ok(self.os.monitor_position(id)?)
    }

    /// The monitor rectangle excluding taskbars and docked toolbars.
    pub fn monitor_work_area(&self, id: MonitorId) -> Result<Rect, Error> {
        self.ensure_initialized()?;
        Ok(self.os.monitor_work_area(id)?)
    }

    /// Content scale per axis: the monitor's DPI over the platform default.
    pub fn monitor_content_scale(&self, id: MonitorId) -> Result<(f32, f32), Error> {
        self.ensure_initialized()?;
        let (dpi_x, dpi_y) = self.os.monitor_dpi(id)?;
        let default = USER_DEFAULT_SCREEN_DPI as f32;
        Ok((dpi_x as f32 / default, dpi_y as f32 / default))
    }

    /// Gamma control is not available through this subsystem.
    pub fn set_gamma(&mut self, _monitor: MonitorId, _gamma: f32) -> Result<(), Error> {
        self.ensure_initialized()?;
        Err(NotSupportedError::new().into())
    }

    /// Gamma control is not available through this subsystem.
    pub fn gamma_ramp(&self, _monitor: MonitorId) -> Result<GammaRamp, Error> {
        self.ensure_initialized()?;
        Err(NotSupportedError::new().into())
    }

    /// Gamma control is not available through this subsystem.
    pub fn set_gamma_ramp(&mut self, _monitor: MonitorId, _ramp: &GammaRamp) -> Result<(), Error> {
        self.ensure_initialized()?;
        Err(NotSupportedError::new().into())
    }

    // Windows.

    /// Create a native window from `attrs`.
    ///
    /// The configuration is mapped to native styles, the client size is
    /// expanded to a full window rectangle for those styles, and the native
    /// window is created from the result. Full-screen creation pairs the
    /// window and its monitor before returning.
    pub fn create_window(&mut self, mut attrs: WindowAttributes) -> Result<WindowId, Error> {
        self.ensure_initialized()?;

        if let Some(monitor) = attrs.fullscreen {
            if self.monitor_index(monitor).is_none() {
                warn!(?monitor, "fullscreen monitor not in registry, creating windowed");
                attrs.fullscreen = None;
            }
        }

        let mut window = Window::new(&attrs);
        let (style, ex_style) = (window.style(), window.ex_style());

        let (position, size) = match attrs.fullscreen {
            Some(id) => {
                let monitor = self.monitor_ref(id);
                let size = match monitor.current_mode {
                    Some(mode) => PhysicalSize::new(mode.width, mode.height),
                    None => attrs.surface_size,
                };
                (monitor.position, size)
            },
            None => {
                let full = full_window_size_inner(
                    &*self.os,
                    self.caps,
                    style,
                    ex_style,
                    attrs.surface_size,
                    USER_DEFAULT_SCREEN_DPI,
                )?;
                (attrs.position, full)
            },
        };

        window.handle = self.os.create_window(&attrs.title, style, ex_style, position, size)?;
        debug!(title = %attrs.title, handle = ?window.handle, "window created");

        let id = WindowId(match self.windows.iter().position(|slot| slot.is_none()) {
            Some(free) => {
                self.windows[free] = Some(window);
                free
            },
            None => {
                self.windows.push(Some(window));
                self.windows.len() - 1
            },
        });

        if let Some(monitor) = attrs.fullscreen {
            let index = self.monitor_index(monitor).unwrap();
            self.monitors[index].window = Some(id);
        }
        Ok(id)
    }

    /// Destroy the native window and drop it from the table, releasing its
    /// monitor pairing and any icons it holds.
    pub fn destroy_window(&mut self, id: WindowId) -> Result<(), Error> {
        self.ensure_initialized()?;
        let window = self.windows[id.0].take().unwrap_or_else(|| panic!("unknown window: {id:?}"));
        if let Some(monitor) = window.monitor {
            if let Some(index) = self.monitor_index(monitor) {
                self.monitors[index].window = None;
            }
        }
        if let Some((big, small)) = window.icons {
            self.os.destroy_icon(big);
            self.os.destroy_icon(small);
        }
        self.os.destroy_window(window.handle)?;
        debug!(handle = ?window.handle, "window destroyed");
        Ok(())
    }

    /// Look up a window.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never issued by this context or the window was
    /// destroyed.
    pub fn window(&self, id: WindowId) -> Result<&Window, Error> {
        self.ensure_initialized()?;
        Ok(self.window_ref(id))
    }

    fn window_ref(&self, id: WindowId) -> &Window {
        self.windows
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .unwrap_or_else(|| panic!("unknown window: {id:?}"))
    }

    fn window_mut(&mut self, id: WindowId) -> &mut Window {
        self.windows
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .unwrap_or_else(|| panic!("unknown window: {id:?}"))
    }

    /// Move a window between full-screen and windowed placement.
    ///
    /// The window/monitor pair is updated atomically with respect to
    /// observers: by the time the native calls run, both sides already
    /// agree. Passing `None` releases the window to windowed mode at the
    /// given position and client size.
    pub fn set_window_monitor(
        &mut self,
        id: WindowId,
        monitor: Option<MonitorId>,
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
    ) -> Result<(), Error> {
        self.ensure_initialized()?;

        // Detach the old pairing, and the target monitor's old owner.
        if let Some(old) = self.window_ref(id).monitor {
            if let Some(index) = self.monitor_index(old) {
                self.monitors[index].window = None;
            }
        }
        if let Some(new) = monitor {
            let index =
                self.monitor_index(new).unwrap_or_else(|| panic!("unknown monitor: {new:?}"));
            if let Some(previous) = self.monitors[index].window.take() {
                self.window_mut(previous).monitor = None;
            }
            self.monitors[index].window = Some(id);
        }
        self.window_mut(id).monitor = monitor;

        let window = self.window_ref(id);
        let (handle, style, ex_style) = (window.handle, window.style(), window.ex_style());
        self.os.apply_window_style(handle, style, ex_style)?;
        self.os.set_window_size(handle, size)?;
        match monitor {
            Some(m) => {
                let target = self.monitor_ref(m).position;
                self.os.set_window_pos(handle, target)?;
            },
            None => self.os.set_window_pos(handle, position)?,
        }
        Ok(())
    }

    /// Update the decoration flag and refresh the native styles.
    pub fn set_decorated(&mut self, id: WindowId, decorated: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.window_mut(id).decorated = decorated;
        self.refresh_window_style(id)
    }

    /// Update the resizability flag and refresh the native styles.
    pub fn set_resizable(&mut self, id: WindowId, resizable: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.window_mut(id).resizable = resizable;
        self.refresh_window_style(id)
    }

    /// Update the always-on-top flag and refresh the native styles.
    pub fn set_floating(&mut self, id: WindowId, floating: bool) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.window_mut(id).floating = floating;
        self.refresh_window_style(id)
    }

    fn refresh_window_style(&mut self, id: WindowId) -> Result<(), Error> {
        let window = self.window_ref(id);
        let (handle, style, ex_style) = (window.handle, window.style(), window.ex_style());
        Ok(self.os.apply_window_style(handle, style, ex_style)?)
    }

    /// Constrain interactive resizing to `ratio`, or lift the constraint
    /// with `None`.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    pub fn set_aspect_ratio(
        &mut self,
        id: WindowId,
        ratio: Option<AspectRatio>,
    ) -> Result<(), Error> {
        self.ensure_initialized()?;
        if let Some(ratio) = ratio {
            assert!(ratio.denom != 0, "aspect ratio denominator must be non-zero");
        }
        self.window_mut(id).aspect_ratio = ratio;
        Ok(())
    }

    // Geometry.

    /// Expand a client-area size into the full window size for the given
    /// styles at `dpi`, using the DPI-aware adjustment when the OS provides
    /// it and the default-DPI variant otherwise.
    pub fn full_window_size(
        &self,
        style: WindowStyle,
        ex_style: WindowExStyle,
        client_size: PhysicalSize<u32>,
        dpi: u32,
    ) -> Result<PhysicalSize<u32>, Error> {
        self.ensure_initialized()?;
        Ok(full_window_size_inner(&*self.os, self.caps, style, ex_style, client_size, dpi)?)
    }

    /// The window's decoration extents: how far the full window rectangle
    /// extends past the client area on each side.
    pub fn frame_extents(&self, id: WindowId) -> Result<FrameExtents, Error> {
        self.ensure_initialized()?;
        let window = self.window_ref(id);
        let dpi = effective_window_dpi(&*self.os, self.caps, window.handle)?;

        let mut rect = Rect::default();
        adjust_rect(&*self.os, self.caps, &mut rect, window.style(), window.ex_style(), dpi)?;
        Ok(FrameExtents {
            left: -rect.left,
            top: -rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
    }

    /// Rewrite one edge of a proposed resize rectangle so the client area
    /// keeps the window's aspect ratio. No-op for unconstrained windows.
    ///
    /// `area` is the full window rectangle the user is dragging; which edge
    /// is recomputed depends on the edge being dragged, and the remaining
    /// edges are left as proposed.
    pub fn apply_aspect_ratio(
        &self,
        id: WindowId,
        edge: ResizeEdge,
        area: &mut Rect,
    ) -> Result<(), Error> {
        self.ensure_initialized()?;
        let window = self.window_ref(id);
        let Some(AspectRatio { numer, denom }) = window.aspect_ratio else {
            return Ok(());
        };
        let ratio = numer as f32 / denom as f32;

        let dpi = effective_window_dpi(&*self.os, self.caps, window.handle)?;
        let overhead = full_window_size_inner(
            &*self.os,
            self.caps,
            window.style(),
            window.ex_style(),
            PhysicalSize::new(0, 0),
            dpi,
        )?;
        let (xoff, yoff) = (overhead.width as i32, overhead.height as i32);

        match edge {
            ResizeEdge::Left
            | ResizeEdge::BottomLeft
            | ResizeEdge::Right
            | ResizeEdge::BottomRight => {
                area.bottom = area.top + yoff + ((area.width() - xoff) as f32 / ratio) as i32;
            },
            ResizeEdge::TopLeft | ResizeEdge::TopRight => {
                area.top = area.bottom - yoff - ((area.width() - xoff) as f32 / ratio) as i32;
            },
            ResizeEdge::Top | ResizeEdge::Bottom => {
                area.right = area.left + xoff + ((area.height() - yoff) as f32 * ratio) as i32;
            },
        }
        Ok(())
    }

    // Icons and cursors.

    /// Pick the best fitting candidates for the OS's large and small icon
    /// sizes, convert them to native icons and assign them to the window.
    /// An empty slice reverts the window to the default icon.
    pub fn set_window_icon(&mut self, id: WindowId, images: &[RgbaImage]) -> Result<(), Error> {
        self.ensure_initialized()?;
        let handle = self.window_ref(id).handle;

        let new_icons = if images.is_empty() {
            None
        } else {
            let (big_size, small_size) = self.os.standard_icon_sizes();
            let big_image = closest_image(images, big_size.width, big_size.height).unwrap();
            let small_image = closest_image(images, small_size.width, small_size.height).unwrap();

            let big = create_native_icon(&*self.os, big_image, 0, 0, IconKind::Icon)?;
            let small = match create_native_icon(&*self.os, small_image, 0, 0, IconKind::Icon) {
                Ok(small) => small,
                Err(err) => {
                    self.os.destroy_icon(big);
                    return Err(err.into());
                },
            };
            Some((big, small))
        };

        match new_icons {
            Some((big, small)) => self.os.set_window_icons(handle, Some(big), Some(small)),
            None => self.os.set_window_icons(handle, None, None),
        }

        let window = self.window_mut(id);
        let old = std::mem::replace(&mut window.icons, new_icons);
        if let Some((big, small)) = old {
            self.os.destroy_icon(big);
            self.os.destroy_icon(small);
        }
        Ok(())
    }

    /// Build a native cursor from an RGBA image and a hotspot.
    ///
    /// The caller owns the handle and releases it with
    /// [`Context::destroy_cursor`].
    pub fn create_cursor(
        &self,
        image: &RgbaImage,
        hotspot_x: u32,
        hotspot_y: u32,
    ) -> Result<IconHandle, Error> {
        self.ensure_initialized()?;
        Ok(create_native_icon(&*self.os, image, hotspot_x, hotspot_y, IconKind::Cursor)?)
    }

    /// Load one of the OS-provided cursor shapes.
    pub fn create_standard_cursor(&self, icon: CursorIcon) -> Result<IconHandle, Error> {
        self.ensure_initialized()?;
        Ok(self.os.load_system_cursor(icon)?)
    }

    /// Release a cursor created by this context. Windows still using it fall
    /// back to the default arrow.
    pub fn destroy_cursor(&mut self, cursor: IconHandle) -> Result<(), Error> {
        self.ensure_initialized()?;
        let using: Vec<WindowId> = self
            .windows
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_some_and(|w| w.cursor == Some(cursor)))
            .map(|(i, _)| WindowId(i))
            .collect();
        for id in using {
            self.window_mut(id).cursor = None;
            self.update_cursor_image(id)?;
        }
        self.os.destroy_icon(cursor);
        Ok(())
    }

    /// Set or clear the window's custom cursor.
    pub fn set_cursor(&mut self, id: WindowId, cursor: Option<IconHandle>) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.window_mut(id).cursor = cursor;
        self.update_cursor_image(id)
    }

    /// Change how the cursor behaves over the window's client area.
    pub fn set_cursor_mode(&mut self, id: WindowId, mode: CursorMode) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.window_mut(id).cursor_mode = mode;
        self.update_cursor_image(id)
    }

    fn update_cursor_image(&self, id: WindowId) -> Result<(), Error> {
        let window = self.window_ref(id);
        if window.cursor_mode == CursorMode::Normal {
            match window.cursor {
                Some(cursor) => self.os.set_cursor(Some(cursor)),
                None => {
                    let arrow = self.os.load_system_cursor(CursorIcon::Default)?;
                    self.os.set_cursor(Some(arrow));
                },
            }
        } else {
            self.os.set_cursor(None);
        }
        Ok(())
    }

    // Event pump.

    /// Retrieve and dispatch native messages on the calling thread.
    ///
    /// [`PumpMode::Poll`] drains whatever is pending and returns
    /// immediately, possibly without dispatching anything.
    /// [`PumpMode::Wait`] blocks until at least one message arrives, then
    /// drains the rest without blocking.
    pub fn pump_events(&mut self, mode: PumpMode) -> Result<(), Error> {
        self.ensure_initialized()?;
        if mode == PumpMode::Wait {
            let message = self.os.wait_message()?;
            self.os.dispatch_message(&message);
        }
        while let Some(message) = self.os.poll_message() {
            self.os.dispatch_message(&message);
        }
        Ok(())
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn new_monitor(desc: MonitorDesc, current_mode: VideoMode) -> Monitor {
    Monitor {
        id: desc.id,
        name: desc.name,
        position: desc.position,
        physical_size_mm: desc.physical_size_mm,
        modes: Vec::new(),
        current_mode: Some(current_mode),
        window: None,
    }
}

fn effective_window_dpi(
    os: &dyn OsApi,
    caps: OsCapabilities,
    window: WindowHandle,
) -> Result<u32, OsError> {
    if caps.window_dpi {
        os.window_dpi(window)
    } else {
        Ok(USER_DEFAULT_SCREEN_DPI)
    }
}

fn adjust_rect(
    os: &dyn OsApi,
    caps: OsCapabilities,
    rect: &mut Rect,
    style: WindowStyle,
    ex_style: WindowExStyle,
    dpi: u32,
) -> Result<(), OsError> {
    if caps.adjust_rect_for_dpi {
        os.adjust_window_rect_for_dpi(rect, style, ex_style, dpi)
    } else {
        os.adjust_window_rect(rect, style, ex_style)
    }
}

fn full_window_size_inner(
    os: &dyn OsApi,
    caps: OsCapabilities,
    style: WindowStyle,
    ex_style: WindowExStyle,
    client_size: PhysicalSize<u32>,
    dpi: u32,
) -> Result<PhysicalSize<u32>, OsError> {
    let mut rect = Rect::of_size(client_size);
    adjust_rect(os, caps, &mut rect, style, ex_style, dpi)?;
    Ok(PhysicalSize::new(rect.width() as u32, rect.height() as u32))
}
