//! Win32 implementation of the casement OS adapter contract.
//!
//! [`Win32Api`] marshals every [`OsApi`] operation to user32/gdi32 and maps
//! the native failure convention (zero return plus `GetLastError`) into
//! [`OsError`]. Optional entry points that only exist on newer Windows
//! versions (`AdjustWindowRectExForDpi`, `GetDpiForWindow`,
//! `GetDpiForMonitor`) are resolved once through `GetProcAddress` and
//! reported through [`OsApi::capabilities`].

#![cfg(windows)]

mod util;

use std::cell::Cell;
use std::ffi::c_void;
use std::sync::{LazyLock, OnceLock};
use std::{io, mem, ptr};

use casement_core::cursor::CursorIcon;
use casement_core::dpi::{PhysicalPosition, PhysicalSize};
use casement_core::error::OsError;
use casement_core::monitor::{split_bpp, VideoMode};
use casement_core::os::{
    BitmapHandle, DcHandle, DibHeader, IconHandle, IconSpec, MonitorDesc, MonitorId, OsApi,
    OsCapabilities, RawMessage, Rect, WindowHandle, USER_DEFAULT_SCREEN_DPI,
};
use casement_core::window::{WindowExStyle, WindowStyle};
use tracing::warn;
use windows_sys::Win32::Foundation::{HWND, LPARAM, RECT};
use windows_sys::Win32::Graphics::Gdi::{
    CreateBitmap, CreateDCW, DeleteDC, DeleteObject, EnumDisplayMonitors, EnumDisplaySettingsExW,
    EnumDisplaySettingsW, GetDC, GetDeviceCaps, GetMonitorInfoW, ReleaseDC, BITMAPINFO,
    BITMAPV5HEADER, BI_BITFIELDS, DEVMODEW, DIB_RGB_COLORS, ENUM_CURRENT_SETTINGS, HBITMAP, HDC,
    HMONITOR, HORZSIZE, LOGPIXELSX, LOGPIXELSY, MONITORINFO, MONITORINFOEXW, MONITORINFOF_PRIMARY,
    VERTSIZE,
};
use windows_sys::Win32::UI::HiDpi::MDT_EFFECTIVE_DPI;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, CreateIconIndirect, CreateWindowExW, DefWindowProcW, DestroyIcon,
    DestroyWindow, DispatchMessageW, GetClientRect, GetMessageW, GetSystemMetrics, LoadCursorW,
    PeekMessageW, RegisterClassExW, SendMessageW, SetCursor, SetWindowPos, TranslateMessage,
    CS_HREDRAW, CS_VREDRAW, GWL_EXSTYLE, GWL_STYLE, HICON, ICONINFO, ICON_BIG, ICON_SMALL, MSG,
    PM_REMOVE, SM_CXICON, SM_CXSMICON, SM_CYICON, SM_CYSMICON, SWP_FRAMECHANGED, SWP_NOACTIVATE,
    SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, WM_SETICON, WNDCLASSEXW,
};

use crate::util::{
    decode_wide, get_instance_handle, get_window_long, set_window_long, to_windows_cursor,
    ADJUST_WINDOW_RECT_EX_FOR_DPI, GET_DPI_FOR_MONITOR, GET_DPI_FOR_WINDOW,
};

static WINDOW_CLASS_NAME: LazyLock<Vec<u16>> = LazyLock::new(|| util::encode_wide("casement"));

fn last_os_error(op: &'static str) -> OsError {
    OsError::new(op, io::Error::last_os_error().raw_os_error().unwrap_or(0))
}

fn hmonitor(id: MonitorId) -> HMONITOR {
    id.0 as usize as HMONITOR
}

fn hwnd(window: WindowHandle) -> HWND {
    window.0 as usize as HWND
}

fn from_rect(rect: RECT) -> Rect {
    Rect { left: rect.left, top: rect.top, right: rect.right, bottom: rect.bottom }
}

fn to_rect(rect: Rect) -> RECT {
    RECT { left: rect.left, top: rect.top, right: rect.right, bottom: rect.bottom }
}

/// Fetch the extended monitor info, which carries the adapter device name
/// used by the display-settings calls.
fn monitor_info(monitor: HMONITOR) -> Result<MONITORINFOEXW, OsError> {
    let mut info: MONITORINFOEXW = unsafe { mem::zeroed() };
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    let status =
        unsafe { GetMonitorInfoW(monitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if status == 0 {
        return Err(last_os_error("GetMonitorInfoW"));
    }
    Ok(info)
}

/// Physical extents in millimeters, via a device context for the adapter.
fn physical_size_mm(adapter: &[u16; 32]) -> (u32, u32) {
    let driver = util::encode_wide("DISPLAY");
    let dc = unsafe { CreateDCW(driver.as_ptr(), adapter.as_ptr(), ptr::null(), ptr::null()) };
    if dc.is_null() {
        return (0, 0);
    }
    let size = unsafe { (GetDeviceCaps(dc, HORZSIZE) as u32, GetDeviceCaps(dc, VERTSIZE) as u32) };
    unsafe { DeleteDC(dc) };
    size
}

fn mode_from_devmode(devmode: &DEVMODEW) -> VideoMode {
    let (red_bits, green_bits, blue_bits) = split_bpp(devmode.dmBitsPerPel);
    VideoMode {
        width: devmode.dmPelsWidth,
        height: devmode.dmPelsHeight,
        red_bits,
        green_bits,
        blue_bits,
        refresh_rate: devmode.dmDisplayFrequency,
    }
}

unsafe extern "system" fn monitor_enum_proc(
    monitor: HMONITOR,
    _dc: HDC,
    _place: *mut RECT,
    data: LPARAM,
) -> i32 {
    let monitors = data as *mut Vec<HMONITOR>;
    unsafe { (*monitors).push(monitor) };
    // TRUE means continue enumeration.
    1
}

fn register_window_class() -> Result<(), OsError> {
    static CLASS: OnceLock<Result<u16, OsError>> = OnceLock::new();
    let atom = CLASS.get_or_init(|| {
        let class = WNDCLASSEXW {
            cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(DefWindowProcW),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: get_instance_handle(),
            hIcon: ptr::null_mut(),
            hCursor: ptr::null_mut(),
            hbrBackground: ptr::null_mut(),
            lpszMenuName: ptr::null(),
            lpszClassName: WINDOW_CLASS_NAME.as_ptr(),
            hIconSm: ptr::null_mut(),
        };
        let atom = unsafe { RegisterClassExW(&class) };
        if atom == 0 {
            Err(last_os_error("RegisterClassExW"))
        } else {
            Ok(atom)
        }
    });
    atom.clone().map(|_| ())
}

/// The Win32 OS call adapter.
///
/// Must be used from the thread that owns the message queue, like the
/// context built on top of it; the adapter keeps the most recently
/// retrieved `MSG` so dispatch can hand the full structure back to the OS.
pub struct Win32Api {
    last_message: Cell<MSG>,
}

impl Default for Win32Api {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Api {
    pub fn new() -> Win32Api {
        Win32Api { last_message: Cell::new(unsafe { mem::zeroed() }) }
    }

    fn raw_message(&self, msg: MSG) -> RawMessage {
        self.last_message.set(msg);
        RawMessage {
            window: if msg.hwnd.is_null() { None } else { Some(WindowHandle(msg.hwnd as u64)) },
            code: msg.message,
            wparam: msg.wParam,
            lparam: msg.lParam,
        }
    }
}

impl OsApi for Win32Api {
    fn capabilities(&self) -> OsCapabilities {
        OsCapabilities {
            adjust_rect_for_dpi: ADJUST_WINDOW_RECT_EX_FOR_DPI.is_some(),
            window_dpi: GET_DPI_FOR_WINDOW.is_some(),
        }
    }

    fn enumerate_monitors(&self) -> Result<Vec<MonitorDesc>, OsError> {
        let mut handles: Vec<HMONITOR> = Vec::new();
        let status = unsafe {
            EnumDisplayMonitors(
                ptr::null_mut(),
                ptr::null(),
                Some(monitor_enum_proc),
                &mut handles as *mut _ as LPARAM,
            )
        };
        if status == 0 {
            return Err(last_os_error("EnumDisplayMonitors"));
        }

        let mut monitors = Vec::with_capacity(handles.len());
        for handle in handles {
            let info = match monitor_info(handle) {
                Ok(info) => info,
                Err(err) => {
                    // Racing a disconnect; skip the monitor and go on.
                    warn!(%err, "skipping unreadable monitor");
                    continue;
                },
            };
            let primary = info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0;
            let desc = MonitorDesc {
                id: MonitorId(handle as u64),
                name: decode_wide(&info.szDevice).to_string_lossy().into_owned(),
                position: PhysicalPosition::new(
                    info.monitorInfo.rcMonitor.left,
                    info.monitorInfo.rcMonitor.top,
                ),
                physical_size_mm: physical_size_mm(&info.szDevice),
            };
            if primary {
                monitors.insert(0, desc);
            } else {
                monitors.push(desc);
            }
        }
        Ok(monitors)
    }

    fn video_modes(&self, monitor: MonitorId) -> Result<Vec<VideoMode>, OsError> {
        let info = monitor_info(hmonitor(monitor))?;

        let mut modes = Vec::new();
        let mut index = 0;
        loop {
            let mut devmode: DEVMODEW = unsafe { mem::zeroed() };
            devmode.dmSize = mem::size_of::<DEVMODEW>() as u16;
            let status =
                unsafe { EnumDisplaySettingsExW(info.szDevice.as_ptr(), index, &mut devmode, 0) };
            if status == 0 {
                break;
            }
            index += 1;

            // Skip modes the hardware can't actually display.
            if devmode.dmBitsPerPel < 15 {
                continue;
            }
            modes.push(mode_from_devmode(&devmode));
        }
        Ok(modes)
    }

    fn current_video_mode(&self, monitor: MonitorId) -> Result<VideoMode, OsError> {
        let info = monitor_info(hmonitor(monitor))?;
        let mut devmode: DEVMODEW = unsafe { mem::zeroed() };
        devmode.dmSize = mem::size_of::<DEVMODEW>() as u16;
        let status = unsafe {
            EnumDisplaySettingsW(info.szDevice.as_ptr(), ENUM_CURRENT_SETTINGS, &mut devmode)
        };
        if status == 0 {
            return Err(last_os_error("EnumDisplaySettingsW"));
        }
        Ok(mode_from_devmode(&devmode))
    }

    fn monitor_position(&self, monitor: MonitorId) -> Result<PhysicalPosition<i32>, OsError> {
        let info = monitor_info(hmonitor(monitor))?;
        Ok(PhysicalPosition::new(info.monitorInfo.rcMonitor.left, info.monitorInfo.rcMonitor.top))
    }

    fn monitor_work_area(&self, monitor: MonitorId) -> Result<Rect, OsError> {
        let info = monitor_info(hmonitor(monitor))?;
        Ok(from_rect(info.monitorInfo.rcWork))
    }

    fn monitor_dpi(&self, monitor: MonitorId) -> Result<(u32, u32), OsError> {
        if let Some(get_dpi_for_monitor) = *GET_DPI_FOR_MONITOR {
            let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
            let hr = unsafe {
                get_dpi_for_monitor(hmonitor(monitor), MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y)
            };
            if hr != 0 {
                return Err(OsError::new("GetDpiForMonitor", hr));
            }
            return Ok((dpi_x, dpi_y));
        }

        // Pre-8.1 fallback: one system-wide DPI.
        let dc = unsafe { GetDC(ptr::null_mut()) };
        if dc.is_null() {
            return Err(last_os_error("GetDC"));
        }
        let dpi = unsafe { (GetDeviceCaps(dc, LOGPIXELSX) as u32, GetDeviceCaps(dc, LOGPIXELSY) as u32) };
        unsafe { ReleaseDC(ptr::null_mut(), dc) };
        Ok(dpi)
    }

    fn create_window(
        &self,
        title: &str,
        style: WindowStyle,
        ex_style: WindowExStyle,
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
    ) -> Result<WindowHandle, OsError> {
        register_window_class()?;
        let title = util::encode_wide(title);
        let handle = unsafe {
            CreateWindowExW(
                ex_style.bits(),
                WINDOW_CLASS_NAME.as_ptr(),
                title.as_ptr(),
                style.bits(),
                position.x,
                position.y,
                size.width as i32,
                size.height as i32,
                ptr::null_mut(),
                ptr::null_mut(),
                get_instance_handle(),
                ptr::null(),
            )
        };
        if handle.is_null() {
            return Err(last_os_error("CreateWindowExW"));
        }
        Ok(WindowHandle(handle as u64))
    }

    fn destroy_window(&self, window: WindowHandle) -> Result<(), OsError> {
        if unsafe { DestroyWindow(hwnd(window)) } == 0 {
            return Err(last_os_error("DestroyWindow"));
        }
        Ok(())
    }

    fn apply_window_style(
        &self,
        window: WindowHandle,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), OsError> {
        unsafe {
            set_window_long(hwnd(window), GWL_STYLE, style.bits() as isize);
            set_window_long(hwnd(window), GWL_EXSTYLE, ex_style.bits() as isize);
        }
        let status = unsafe {
            SetWindowPos(
                hwnd(window),
                ptr::null_mut(),
                0,
                0,
                0,
                0,
                SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if status == 0 {
            return Err(last_os_error("SetWindowPos"));
        }
        Ok(())
    }

    fn set_window_pos(
        &self,
        window: WindowHandle,
        position: PhysicalPosition<i32>,
    ) -> Result<(), OsError> {
        let status = unsafe {
            SetWindowPos(
                hwnd(window),
                ptr::null_mut(),
                position.x,
                position.y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if status == 0 {
            return Err(last_os_error("SetWindowPos"));
        }
        Ok(())
    }

    fn set_window_size(
        &self,
        window: WindowHandle,
        size: PhysicalSize<u32>,
    ) -> Result<(), OsError> {
        let style = unsafe { get_window_long(hwnd(window), GWL_STYLE) } as u32;
        let ex_style = unsafe { get_window_long(hwnd(window), GWL_EXSTYLE) } as u32;

        let mut rect =
            RECT { left: 0, top: 0, right: size.width as i32, bottom: size.height as i32 };
        match (*ADJUST_WINDOW_RECT_EX_FOR_DPI, *GET_DPI_FOR_WINDOW) {
            (Some(adjust_for_dpi), Some(get_dpi)) => {
                let dpi = unsafe { get_dpi(hwnd(window)) };
                if unsafe { adjust_for_dpi(&mut rect, style, 0, ex_style, dpi) } == 0 {
                    return Err(last_os_error("AdjustWindowRectExForDpi"));
                }
            },
            _ => {
                if unsafe { AdjustWindowRectEx(&mut rect, style, 0, ex_style) } == 0 {
                    return Err(last_os_error("AdjustWindowRectEx"));
                }
            },
        }

        let status = unsafe {
            SetWindowPos(
                hwnd(window),
                ptr::null_mut(),
                0,
                0,
                rect.right - rect.left,
                rect.bottom - rect.top,
                SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        };
        if status == 0 {
            return Err(last_os_error("SetWindowPos"));
        }
        Ok(())
    }

    fn window_client_size(&self, window: WindowHandle) -> Result<PhysicalSize<u32>, OsError> {
        let mut rect: RECT = unsafe { mem::zeroed() };
        if unsafe { GetClientRect(hwnd(window), &mut rect) } == 0 {
            return Err(last_os_error("GetClientRect"));
        }
        Ok(PhysicalSize::new((rect.right - rect.left) as u32, (rect.bottom - rect.top) as u32))
    }

    fn window_dpi(&self, window: WindowHandle) -> Result<u32, OsError> {
        match *GET_DPI_FOR_WINDOW {
            Some(get_dpi) => Ok(unsafe { get_dpi(hwnd(window)) }),
            None => Ok(USER_DEFAULT_SCREEN_DPI),
        }
    }

    fn adjust_window_rect(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> Result<(), OsError> {
        let mut raw = to_rect(*rect);
        if unsafe { AdjustWindowRectEx(&mut raw, style.bits(), 0, ex_style.bits()) } == 0 {
            return Err(last_os_error("AdjustWindowRectEx"));
        }
        *rect = from_rect(raw);
        Ok(())
    }

    fn adjust_window_rect_for_dpi(
        &self,
        rect: &mut Rect,
        style: WindowStyle,
        ex_style: WindowExStyle,
        dpi: u32,
    ) -> Result<(), OsError> {
        let adjust_for_dpi = ADJUST_WINDOW_RECT_EX_FOR_DPI
            .expect("probed as available through OsCapabilities");
        let mut raw = to_rect(*rect);
        if unsafe { adjust_for_dpi(&mut raw, style.bits(), 0, ex_style.bits(), dpi) } == 0 {
            return Err(last_os_error("AdjustWindowRectExForDpi"));
        }
        *rect = from_rect(raw);
        Ok(())
    }

    fn acquire_screen_dc(&self) -> Result<DcHandle, OsError> {
        let dc = unsafe { GetDC(ptr::null_mut()) };
        if dc.is_null() {
            return Err(last_os_error("GetDC"));
        }
        Ok(DcHandle(dc as u64))
    }

    fn release_screen_dc(&self, dc: DcHandle) {
        unsafe { ReleaseDC(ptr::null_mut(), dc.0 as usize as HDC) };
    }

    fn create_color_bitmap(
        &self,
        dc: DcHandle,
        header: &DibHeader,
        pixels: &[u8],
    ) -> Result<BitmapHandle, OsError> {
        let mut bi: BITMAPV5HEADER = unsafe { mem::zeroed() };
        bi.bV5Size = mem::size_of::<BITMAPV5HEADER>() as u32;
        bi.bV5Width = header.width;
        bi.bV5Height = header.height;
        bi.bV5Planes = 1;
        bi.bV5BitCount = header.bit_count;
        bi.bV5Compression = BI_BITFIELDS as u32;
        bi.bV5RedMask = header.red_mask;
        bi.bV5GreenMask = header.green_mask;
        bi.bV5BlueMask = header.blue_mask;
        bi.bV5AlphaMask = header.alpha_mask;

        let mut bits: *mut c_void = ptr::null_mut();
        let bitmap = unsafe {
            windows_sys::Win32::Graphics::Gdi::CreateDIBSection(
                dc.0 as usize as HDC,
                &bi as *const BITMAPV5HEADER as *const BITMAPINFO,
                DIB_RGB_COLORS,
                &mut bits,
                ptr::null_mut(),
                0,
            )
        };
        if bitmap.is_null() {
            return Err(last_os_error("CreateDIBSection"));
        }
        unsafe { ptr::copy_nonoverlapping(pixels.as_ptr(), bits as *mut u8, pixels.len()) };
        Ok(BitmapHandle(bitmap as u64))
    }

    fn create_mask_bitmap(&self, width: u32, height: u32) -> Result<BitmapHandle, OsError> {
        let bitmap =
            unsafe { CreateBitmap(width as i32, height as i32, 1, 1, ptr::null()) };
        if bitmap.is_null() {
            return Err(last_os_error("CreateBitmap"));
        }
        Ok(BitmapHandle(bitmap as u64))
    }

    fn delete_bitmap(&self, bitmap: BitmapHandle) {
        unsafe { DeleteObject(bitmap.0 as usize as HBITMAP) };
    }

    fn create_icon(&self, spec: &IconSpec) -> Result<IconHandle, OsError> {
        let info = ICONINFO {
            fIcon: spec.icon.into(),
            xHotspot: spec.hotspot_x,
            yHotspot: spec.hotspot_y,
            hbmMask: spec.mask.0 as usize as HBITMAP,
            hbmColor: spec.color.0 as usize as HBITMAP,
        };
        let handle = unsafe { CreateIconIndirect(&info) };
        if handle.is_null() {
            return Err(last_os_error("CreateIconIndirect"));
        }
        Ok(IconHandle(handle as u64))
    }

    fn destroy_icon(&self, icon: IconHandle) {
        unsafe { DestroyIcon(icon.0 as usize as HICON) };
    }

    fn standard_icon_sizes(&self) -> (PhysicalSize<u32>, PhysicalSize<u32>) {
        unsafe {
            (
                PhysicalSize::new(
                    GetSystemMetrics(SM_CXICON) as u32,
                    GetSystemMetrics(SM_CYICON) as u32,
                ),
                PhysicalSize::new(
                    GetSystemMetrics(SM_CXSMICON) as u32,
                    GetSystemMetrics(SM_CYSMICON) as u32,
                ),
            )
        }
    }

    fn set_window_icons(
        &self,
        window: WindowHandle,
        big: Option<IconHandle>,
        small: Option<IconHandle>,
    ) {
        unsafe {
            SendMessageW(
                hwnd(window),
                WM_SETICON,
                ICON_BIG as usize,
                big.map_or(0, |icon| icon.0 as isize),
            );
            SendMessageW(
                hwnd(window),
                WM_SETICON,
                ICON_SMALL as usize,
                small.map_or(0, |icon| icon.0 as isize),
            );
        }
    }

    fn load_system_cursor(&self, icon: CursorIcon) -> Result<IconHandle, OsError> {
        let cursor = unsafe { LoadCursorW(ptr::null_mut(), to_windows_cursor(icon)) };
        if cursor.is_null() {
            return Err(last_os_error("LoadCursorW"));
        }
        Ok(IconHandle(cursor as u64))
    }

    fn set_cursor(&self, cursor: Option<IconHandle>) {
        unsafe { SetCursor(cursor.map_or(ptr::null_mut(), |c| c.0 as usize as HICON)) };
    }

    fn poll_message(&self) -> Option<RawMessage> {
        let mut msg: MSG = unsafe { mem::zeroed() };
        if unsafe { PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) } == 0 {
            return None;
        }
        Some(self.raw_message(msg))
    }

    fn wait_message(&self) -> Result<RawMessage, OsError> {
        let mut msg: MSG = unsafe { mem::zeroed() };
        // 0 is WM_QUIT, which is still a message worth delivering.
        if unsafe { GetMessageW(&mut msg, ptr::null_mut(), 0, 0) } == -1 {
            return Err(last_os_error("GetMessageW"));
        }
        Ok(self.raw_message(msg))
    }

    fn dispatch_message(&self, _message: &RawMessage) {
        // Translation and dispatch need the full MSG, which is kept from the
        // retrieval that produced `_message`.
        let msg = self.last_message.get();
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
