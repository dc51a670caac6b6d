//! Scripted in-memory OS adapter for exercising the context.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use casement_core::cursor::CursorIcon;
use casement_core::dpi::{PhysicalPosition, PhysicalSize};
use casement_core::error::OsError;
use casement_core::monitor::VideoMode;
use casement_core::os::{
    BitmapHandle, DcHandle, DibHeader, IconHandle, IconSpec, MonitorDesc, MonitorId, OsApi,
    OsCapabilities, RawMessage, Rect, WindowHandle,
};
use casement_core::window::{WindowExStyle, WindowStyle};

pub fn mode(bits: u32, width: u32, height: u32, rate: u32) -> VideoMode {
    let (red_bits, green_bits, blue_bits) = casement_core::monitor::split_bpp(bits);
    VideoMode { width, height, red_bits, green_bits, blue_bits, refresh_rate: rate }
}

#[derive(Clone)]
pub struct FakeMonitor {
    pub id: MonitorId,
    pub name: String,
    pub position: PhysicalPosition<i32>,
    pub physical_size_mm: (u32, u32),
    pub modes: Vec<VideoMode>,
    pub current_mode: VideoMode,
    pub dpi: (u32, u32),
    pub work_area: Rect,
}

impl FakeMonitor {
    pub fn new(id: u64, name: &str) -> FakeMonitor {
        FakeMonitor {
            id: MonitorId(id),
            name: name.to_owned(),
            position: PhysicalPosition::new(0, 0),
            physical_size_mm: (510, 290),
            modes: vec![mode(24, 1920, 1080, 60)],
            current_mode: mode(24, 1920, 1080, 60),
            dpi: (96, 96),
            work_area: Rect { left: 0, top: 0, right: 1920, bottom: 1040 },
        }
    }

    pub fn desc(&self) -> MonitorDesc {
        MonitorDesc {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            physical_size_mm: self.physical_size_mm,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
    pub position: PhysicalPosition<i32>,
    /// Full window size the window was created with.
    pub full_size: PhysicalSize<u32>,
    /// Client-area size reported back to the core.
    pub client_size: PhysicalSize<u32>,
    pub dpi: u32,
    pub destroyed: bool,
}

pub struct FakeState {
    pub caps: OsCapabilities,
    pub monitors: Vec<FakeMonitor>,
    pub windows: Vec<FakeWindow>,
    pub adjust_calls: u32,
    pub adjust_for_dpi_calls: u32,
    pub dc_acquires: u32,
    pub dc_releases: u32,
    pub next_handle: u64,
    pub bitmaps_alive: Vec<BitmapHandle>,
    pub icons_alive: Vec<IconHandle>,
    /// Pixels handed to the most recent color-bitmap creation.
    pub color_pixels: Vec<u8>,
    /// Header width of each color bitmap created, in order.
    pub color_widths: Vec<i32>,
    pub cursor_sets: Vec<Option<IconHandle>>,
    pub system_cursors_loaded: Vec<CursorIcon>,
    pub fail_color_bitmap: bool,
    pub fail_mask_bitmap: bool,
    pub fail_create_icon: bool,
    pub messages: VecDeque<RawMessage>,
    pub dispatched: Vec<RawMessage>,
}

impl Default for FakeState {
    fn default() -> Self {
        FakeState {
            caps: OsCapabilities { adjust_rect_for_dpi: true, window_dpi: true },
            monitors: Vec::new(),
            windows: Vec::new(),
            adjust_calls: 0,
            adjust_for_dpi_calls: 0,
            dc_acquires: 0,
            dc_releases: 0,
            next_handle: 1,
            bitmaps_alive: Vec::new(),
            icons_alive: Vec::new(),
            color_pixels: Vec::new(),
            color_widths: Vec::new(),
            cursor_sets: Vec::new(),
            system_cursors_loaded: Vec::new(),
            fail_color_bitmap: false,
            fail_mask_bitmap: false,
            fail_create_icon: false,
            messages: VecDeque::new(),
            dispatched: Vec::new(),
        }
    }
}

impl FakeState {
    fn monitor(&self, id: MonitorId) -> Result<&FakeMonitor, OsError> {
        self.monitors
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| OsError::new("GetMonitorInfoW", 1461))
    }

    fn window_mut(&mut self, handle: WindowHandle) -> &mut FakeWindow {
        &mut self.windows[handle.0 as usize]
    }

    fn take_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

/// Deterministic decoration metrics: an 8px resize border, a 3px fixed
/// border, a 23px caption strip, scaled linearly with DPI.
fn adjust(rect: &mut Rect, style: WindowStyle, dpi: u32) {
    let scale = |v: i32| v * dpi as i32 / 96;
    let border = if style.contains(WindowStyle::THICKFRAME) {
        scale(8)
    } else if style.contains(WindowStyle::BORDER) {
        scale(3)
    } else {
        0
    };
    let caption = if style.contains(WindowStyle::CAPTION) { scale(23) } else { 0 };
    rect.left -= border;
    rect.right += border;
    rect.top -= border + caption;
    rect.bottom += border;
}

/// An [`OsApi`] whose state is shared with the test through an `Rc`.
#[derive(Clone)]
pub struct FakeOs(pub Rc<RefCell<FakeState>>);

impl FakeOs {
    pub fn with_monitors(monitors: Vec<FakeMonitor>) -> FakeOs {
        FakeOs(Rc::new(RefCell::new(FakeState { monitors, ..FakeState::default() })))
    }
}

impl OsApi for FakeOs {
    fn capabilities(&self) -> OsCapabilities {
        self.0.borrow().caps
    }

    fn enumerate_monitors(&self) -> Result<Vec<MonitorDesc>, OsError> {
        Ok(self.0.borrow().monitors.iter().map(FakeMonitor::desc).collect())
    }

    fn video_modes(&self, monitor: MonitorId) -> Result<Vec<VideoMode>, OsError> {
        Ok(self.0.borrow().monitor(monitor)?.modes.clone())
    }

    fn current_video_mode(&self, monitor: MonitorId) -> Result<VideoMode, OsError> {
        Ok(self.0.borrow().monitor(monitor)?.current_mode)
    }

    fn monitor_position(&self, monitor: MonitorId) -> Result<PhysicalPosition<i32>, OsError> {
        Ok(self.0.borrow().monitor(monitor)?.position)
    }

    fn monitor_work_area(&self, monitor: MonitorId) -> Result<Rect, OsError> {
        Ok(self.0.borrow().monitor(monitor)?.work_area)
    }

    fn monitor_dpi(&self, monitor: MonitorId) -> Result<(u32, u32), OsError> {
        Ok(self.0.borrow().monitor(monitor)?.dpi)
    }

    fn create_window(
        &self,
        _title: &str,
        style: WindowStyle,
        ex_style: WindowExStyle,
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
    ) -> Result<WindowHandle, OsError> {
        let mut state = self.0.borrow_mut();
        state.windows.push(FakeWindow {
            style,
            ex_style,
            position,
            full_size: size,
            client_size: size,
            dpi: 96,
            destroyed: false,
        });
        Ok(WindowHandle(state.windows.len() as u64 - 1))
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<(), OsError> {
        self.0.borrow_mut().window_mut(window).destroyed = true;
        Ok(())
    }

    fn apply_window_style(
        &self,
        window: WindowHandle,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), OsError> {
        let mut state = self.0.borrow_mut();
        let window = state.window_mut(window);
        window.style = style;
        window.ex_style = ex_style;
        Ok(())
    }

    fn set_window_pos(
        &self,
        window: WindowHandle,
        position: PhysicalPosition<i32>,
    ) -> Result<(), OsError> {
        self.0.borrow_mut().window_mut(window).position = position;
        Ok(())
    }

    fn set_window_size(
        &self,
        window: WindowHandle,
        size: PhysicalSize<u32>,
    ) -> Result<(), OsError> {
        self.0.borrow_mut().window_mut(window).client_size = size;
        Ok(())
    }

    fn window_client_size(&self, window: WindowHandle) -> Result<PhysicalSize<u32>, OsError> {
        Ok(self.0.borrow_mut().window_mut(window).client_size)
    }

    fn window_dpi(&self, window: WindowHandle) -> Result<u32, OsError> {
        Ok(self.0.borrow_mut().window_mut(window).dpi)
    }

    fn adjust_window_rect(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        _ex_style: WindowExStyle,
    ) -> Result<(), OsError> {
        self.0.borrow_mut().adjust_calls += 1;
        adjust(rect, style, 96);
        Ok(())
    }

    fn adjust_window_rect_for_dpi(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        _ex_style: WindowExStyle,
        dpi: u32,
    ) -> Result<(), OsError> {
        self.0.borrow_mut().adjust_for_dpi_calls += 1;
        adjust(rect, style, dpi);
        Ok(())
    }

    fn acquire_screen_dc(&self) -> Result<DcHandle, OsError> {
        let mut state = self.0.borrow_mut();
        state.dc_acquires += 1;
        Ok(DcHandle(state.dc_acquires as u64))
    }

    fn release_screen_dc(&self, _dc: DcHandle) {
        self.0.borrow_mut().dc_releases += 1;
    }

    fn create_color_bitmap(
        &self,
        _dc: DcHandle,
        header: &DibHeader,
        pixels: &[u8],
    ) -> Result<BitmapHandle, OsError> {
        let mut state = self.0.borrow_mut();
        if state.fail_color_bitmap {
            return Err(OsError::new("CreateDIBSection", 8));
        }
        state.color_pixels = pixels.to_vec();
        state.color_widths.push(header.width);
        let bitmap = BitmapHandle(state.take_handle());
        state.bitmaps_alive.push(bitmap);
        Ok(bitmap)
    }

    fn create_mask_bitmap(&self, _width: u32, _height: u32) -> Result<BitmapHandle, OsError> {
        let mut state = self.0.borrow_mut();
        if state.fail_mask_bitmap {
            return Err(OsError::new("CreateBitmap", 8));
        }
        let bitmap = BitmapHandle(state.take_handle());
        state.bitmaps_alive.push(bitmap);
        Ok(bitmap)
    }

    fn delete_bitmap(&self, bitmap: BitmapHandle) {
        self.0.borrow_mut().bitmaps_alive.retain(|b| *b != bitmap);
    }

    fn create_icon(&self, _spec: &IconSpec) -> Result<IconHandle, OsError> {
        let mut state = self.0.borrow_mut();
        if state.fail_create_icon {
            return Err(OsError::new("CreateIconIndirect", 1413));
        }
        let icon = IconHandle(state.take_handle());
        state.icons_alive.push(icon);
        Ok(icon)
    }

    fn destroy_icon(&self, icon: IconHandle) {
        self.0.borrow_mut().icons_alive.retain(|i| *i != icon);
    }

    fn standard_icon_sizes(&self) -> (PhysicalSize<u32>, PhysicalSize<u32>) {
        (PhysicalSize::new(32, 32), PhysicalSize::new(16, 16))
    }

    fn set_window_icons(
        &self,
        _window: WindowHandle,
        _big: Option<IconHandle>,
        _small: Option<IconHandle>,
    ) {
    }

    fn load_system_cursor(&self, icon: CursorIcon) -> Result<IconHandle, OsError> {
        let mut state = self.0.borrow_mut();
        state.system_cursors_loaded.push(icon);
        let handle = state.take_handle();
        Ok(IconHandle(handle))
    }

    fn set_cursor(&self, cursor: Option<IconHandle>) {
        self.0.borrow_mut().cursor_sets.push(cursor);
    }

    fn poll_message(&self) -> Option<RawMessage> {
        self.0.borrow_mut().messages.pop_front()
    }

    fn wait_message(&self) -> Result<RawMessage, OsError> {
        // A real queue would block; an empty scripted queue is a test bug.
        self.0.borrow_mut().messages.pop_front().ok_or_else(|| OsError::new("GetMessageW", 87))
    }

    fn dispatch_message(&self, message: &RawMessage) {
        self.0.borrow_mut().dispatched.push(*message);
    }
}
