//! Windows platform implementation for the ruler window
//!
//! Uses a layered Win32 popup window with per-pixel alpha. The window has no
//! frame, so all move/resize handling happens in the scene.

use std::mem;
use std::ptr;

use ruler_core::{CursorIcon, InputEvent, Key, Point, PointerEvent, ResizeDirection};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS,
    DeleteDC, DeleteObject, EnumDisplayMonitors, GetDC, GetMonitorInfoW, HBITMAP, HDC, HMONITOR,
    MONITORINFOEXW, ReleaseDC, SelectObject,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, ReleaseCapture, SetCapture, VK_CONTROL};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
    HCURSOR, HTCLIENT, HWND_TOPMOST, IDC_ARROW, IDC_SIZEALL, IDC_SIZENESW, IDC_SIZENS,
    IDC_SIZENWSE, IDC_SIZEWE, LoadCursorW, MSG, PM_REMOVE, PeekMessageW, PostQuitMessage,
    RegisterClassExW, SW_SHOW, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SetCursor, SetWindowPos,
    ShowWindow, TranslateMessage, ULW_ALPHA, UpdateLayeredWindow, WM_DESTROY, WM_ERASEBKGND,
    WM_KEYDOWN, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_NCHITTEST, WM_QUIT, WNDCLASSEXW,
    WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};
use windows::core::PCWSTR;

use super::{MonitorInfo, OverlayConfig, OverlayPlatform, PlatformError, PlatformEvent};

const CLASS_NAME: &str = "ScreenRulerClass";

const VK_T: usize = 0x54;
const VK_ESCAPE: usize = 0x1B;

/// Map a virtual-key code to a ruler key
pub(crate) fn key_from_vk(vk: usize) -> Key {
    match vk {
        VK_T => Key::T,
        VK_ESCAPE => Key::Escape,
        _ => Key::Other,
    }
}

/// Signed client coordinates packed into a mouse message's lParam
pub(crate) fn lparam_point(lparam: isize) -> (i32, i32) {
    let x = (lparam & 0xFFFF) as i16 as i32;
    let y = ((lparam >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

fn system_cursor(cursor: CursorIcon) -> PCWSTR {
    use ResizeDirection::*;
    match cursor {
        CursorIcon::Default => IDC_ARROW,
        CursorIcon::Move => IDC_SIZEALL,
        CursorIcon::RowResize => IDC_SIZENS,
        CursorIcon::ColumnResize => IDC_SIZEWE,
        CursorIcon::Resize(direction) => match direction {
            N | S => IDC_SIZENS,
            E | W => IDC_SIZEWE,
            NW | SE => IDC_SIZENWSE,
            NE | SW => IDC_SIZENESW,
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Standalone Monitor Enumeration
// ─────────────────────────────────────────────────────────────────────────────

/// Callback for EnumDisplayMonitors - collects monitor info into a Vec<MonitorInfo>
unsafe extern "system" fn enum_monitors_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> windows::Win32::Foundation::BOOL {
    unsafe {
        let monitors = &mut *(lparam.0 as *mut Vec<MonitorInfo>);

        let mut info = MONITORINFOEXW::default();
        info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;

        if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
            let rc = info.monitorInfo.rcMonitor;
            let name_len = info
                .szDevice
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(info.szDevice.len());
            let device_name = String::from_utf16_lossy(&info.szDevice[..name_len]);

            monitors.push(MonitorInfo {
                id: device_name.clone(),
                name: device_name,
                x: rc.left,
                y: rc.top,
                width: (rc.right - rc.left) as u32,
                height: (rc.bottom - rc.top) as u32,
                is_primary: info.monitorInfo.dwFlags & 1 != 0,
            });
        }

        windows::Win32::Foundation::BOOL::from(true)
    }
}

pub fn get_all_monitors() -> Vec<MonitorInfo> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();
    // SAFETY: the callback only runs during this call, while `monitors` is alive
    unsafe {
        let raw_ptr = &mut monitors as *mut Vec<MonitorInfo>;
        let _ = EnumDisplayMonitors(None, None, Some(enum_monitors_callback), LPARAM(raw_ptr as isize));
    }
    tracing::debug!(count = monitors.len(), "Enumerated monitors");
    monitors
}

// ─────────────────────────────────────────────────────────────────────────────
// Windows Overlay Implementation
// ─────────────────────────────────────────────────────────────────────────────

pub struct WindowsOverlay {
    hwnd: HWND,
    hdc_mem: HDC,
    hbitmap: HBITMAP,
    /// BGRA pixels of the DIB section
    dib_bits: *mut u8,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    pixel_data: Vec<u8>,
    cursor: HCURSOR,
    button_held: bool,
}

// WindowsOverlay is not Send: the HWND and its message queue belong to the
// creating thread.

impl WindowsOverlay {
    fn register_class() -> Result<(), PlatformError> {
        unsafe {
            let class_name = wide_string(CLASS_NAME);
            let hinstance = GetModuleHandleW(None)
                .map_err(|e| PlatformError::Other(format!("GetModuleHandleW failed: {}", e)))?;

            // No class cursor: the cursor is set explicitly on every pointer move
            let wc = WNDCLASSEXW {
                cbSize: mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                lpszClassName: PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };

            if RegisterClassExW(&wc) == 0 {
                let err = std::io::Error::last_os_error();
                // ERROR_CLASS_ALREADY_EXISTS
                if err.raw_os_error() != Some(1410) {
                    return Err(PlatformError::Other(format!(
                        "RegisterClassExW failed: {}",
                        err
                    )));
                }
            }
        }
        Ok(())
    }

    fn release_dib_section(&mut self) {
        unsafe {
            if !self.hdc_mem.is_invalid() {
                let _ = DeleteDC(self.hdc_mem);
                self.hdc_mem = HDC::default();
            }
            if !self.hbitmap.is_invalid() {
                let _ = DeleteObject(self.hbitmap);
                self.hbitmap = HBITMAP::default();
            }
        }
        self.dib_bits = ptr::null_mut();
    }

    fn create_dib_section(&mut self) -> Result<(), PlatformError> {
        self.release_dib_section();
        unsafe {
            let hdc_screen = GetDC(HWND::default());

            self.hdc_mem = CreateCompatibleDC(hdc_screen);
            if self.hdc_mem.is_invalid() {
                ReleaseDC(HWND::default(), hdc_screen);
                return Err(PlatformError::BufferError(
                    "CreateCompatibleDC failed".to_string(),
                ));
            }

            let bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: self.width as i32,
                    biHeight: -(self.height as i32), // Top-down DIB
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bits: *mut std::ffi::c_void = ptr::null_mut();
            let created = CreateDIBSection(hdc_screen, &bmi, DIB_RGB_COLORS, &mut bits, None, 0);
            ReleaseDC(HWND::default(), hdc_screen);
            self.hbitmap = created.map_err(|e| {
                PlatformError::BufferError(format!("CreateDIBSection failed: {}", e))
            })?;
            self.dib_bits = bits as *mut u8;

            SelectObject(self.hdc_mem, self.hbitmap);
        }

        self.pixel_data
            .resize((self.width * self.height * 4) as usize, 0);
        Ok(())
    }

    fn update_layered_window(&mut self) {
        if self.dib_bits.is_null() {
            return;
        }
        unsafe {
            // SAFETY: the DIB section holds width * height 32-bit pixels
            let dib = std::slice::from_raw_parts_mut(
                self.dib_bits,
                (self.width * self.height * 4) as usize,
            );
            // RGBA -> BGRA
            for (src, dst) in self.pixel_data.chunks_exact(4).zip(dib.chunks_exact_mut(4)) {
                dst[0] = src[2];
                dst[1] = src[1];
                dst[2] = src[0];
                dst[3] = src[3];
            }

            let hdc_screen = GetDC(HWND::default());
            let pt_src = POINT { x: 0, y: 0 };
            let pt_dst = POINT {
                x: self.x,
                y: self.y,
            };
            let size = windows::Win32::Foundation::SIZE {
                cx: self.width as i32,
                cy: self.height as i32,
            };
            let blend = windows::Win32::Graphics::Gdi::BLENDFUNCTION {
                BlendOp: 0, // AC_SRC_OVER
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: 1, // AC_SRC_ALPHA
            };

            let _ = UpdateLayeredWindow(
                self.hwnd,
                hdc_screen,
                Some(&pt_dst),
                Some(&size),
                self.hdc_mem,
                Some(&pt_src),
                windows::Win32::Foundation::COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );

            ReleaseDC(HWND::default(), hdc_screen);
        }
    }

    fn pointer_event(msg: &MSG) -> PointerEvent {
        let (x, y) = lparam_point(msg.lParam.0);
        PointerEvent::new(
            Point::new(x as f64, y as f64),
            Point::new(msg.pt.x as f64, msg.pt.y as f64),
        )
    }

    /// Translate a queued message. Returns None for messages the ruler ignores.
    fn translate(&mut self, msg: &MSG) -> Option<PlatformEvent> {
        let input = match msg.message {
            WM_LBUTTONDOWN => {
                self.button_held = true;
                unsafe {
                    let _ = SetCapture(self.hwnd);
                }
                InputEvent::PointerPressed(Self::pointer_event(msg))
            }
            WM_LBUTTONUP => {
                self.button_held = false;
                unsafe {
                    let _ = ReleaseCapture();
                }
                InputEvent::PointerReleased(Self::pointer_event(msg))
            }
            WM_MOUSEMOVE => {
                // No class cursor, so re-apply ours on every move
                unsafe {
                    let _ = SetCursor(self.cursor);
                }
                let pointer = Self::pointer_event(msg);
                if self.button_held {
                    InputEvent::PointerDragged(pointer)
                } else {
                    InputEvent::PointerMoved(pointer)
                }
            }
            WM_KEYDOWN => {
                let ctrl = unsafe { GetKeyState(VK_CONTROL.0 as i32) } < 0;
                InputEvent::KeyPressed {
                    key: key_from_vk(msg.wParam.0),
                    ctrl,
                }
            }
            _ => return None,
        };
        Some(PlatformEvent::Input(input))
    }
}

impl OverlayPlatform for WindowsOverlay {
    fn new(config: OverlayConfig) -> Result<Self, PlatformError> {
        Self::register_class()?;

        let monitors = get_all_monitors();
        let (abs_x, abs_y) = super::initial_position(&config, &monitors);

        let hwnd = unsafe {
            let class_name = wide_string(CLASS_NAME);
            let window_name = wide_string(&config.namespace);
            let hinstance = GetModuleHandleW(None)
                .map_err(|e| PlatformError::Other(format!("GetModuleHandleW failed: {}", e)))?;

            CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
                PCWSTR(class_name.as_ptr()),
                PCWSTR(window_name.as_ptr()),
                WS_POPUP,
                abs_x,
                abs_y,
                config.width as i32,
                config.height as i32,
                None,
                None,
                hinstance,
                None,
            )
            .map_err(|e| PlatformError::Other(format!("CreateWindowExW failed: {}", e)))?
        };

        let mut overlay = Self {
            hwnd,
            hdc_mem: HDC::default(),
            hbitmap: HBITMAP::default(),
            dib_bits: ptr::null_mut(),
            width: config.width,
            height: config.height,
            x: abs_x,
            y: abs_y,
            pixel_data: vec![0u8; (config.width * config.height * 4) as usize],
            cursor: HCURSOR::default(),
            button_held: false,
        };

        overlay.create_dib_section()?;
        overlay.set_cursor(CursorIcon::Default);

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
        }
        tracing::info!(
            x = abs_x,
            y = abs_y,
            width = config.width,
            height = config.height,
            "Win32 ruler window created"
        );

        Ok(overlay)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if x == self.x && y == self.y {
            return;
        }
        self.x = x;
        self.y = y;
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                HWND_TOPMOST,
                x,
                y,
                0,
                0,
                SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        if let Err(e) = self.create_dib_section() {
            tracing::warn!(error = %e, width, height, "Failed to recreate DIB section");
        }

        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                HWND_TOPMOST,
                0,
                0,
                width as i32,
                height as i32,
                SWP_NOMOVE | SWP_NOACTIVATE,
            );
        }
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        match unsafe { LoadCursorW(None, system_cursor(cursor)) } {
            Ok(handle) => {
                self.cursor = handle;
                unsafe {
                    let _ = SetCursor(handle);
                }
            }
            Err(e) => tracing::warn!(error = %e, ?cursor, "Failed to load cursor"),
        }
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.pixel_data)
    }

    fn commit(&mut self) {
        self.update_layered_window();
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    events.push(PlatformEvent::CloseRequested);
                    break;
                }
                match self.translate(&msg) {
                    Some(event) => events.push(event),
                    None => {
                        let _ = TranslateMessage(&msg);
                        DispatchMessageW(&msg);
                    }
                }
            }
        }
        events
    }

    fn get_monitors(&self) -> Vec<MonitorInfo> {
        get_all_monitors()
    }
}

impl Drop for WindowsOverlay {
    fn drop(&mut self) {
        self.release_dib_section();
        unsafe {
            if !self.hwnd.is_invalid() {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}

/// Window procedure for the ruler window
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_NCHITTEST => LRESULT(HTCLIENT as isize),
        WM_ERASEBKGND => LRESULT(1),
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// Convert a &str to a null-terminated wide string
fn wide_string(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lparam_point_is_signed() {
        assert_eq!(lparam_point(0x0020_0010), (16, 32));
        // Captured pointer left/above the window reports negative coordinates
        assert_eq!(lparam_point(0xFFFE_FFFF), (-1, -2));
    }

    #[test]
    fn test_key_from_vk() {
        assert_eq!(key_from_vk(0x54), Key::T);
        assert_eq!(key_from_vk(0x1B), Key::Escape);
        assert_eq!(key_from_vk(0x41), Key::Other);
    }
}
