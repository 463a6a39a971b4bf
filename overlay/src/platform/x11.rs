//! X11 platform implementation for the ruler window
//!
//! Uses XCB via x11rb for a transparent, undecorated, always-on-top window.
//! Requires a compositor for transparency.

use std::collections::HashMap;
use std::fs::File;
use std::os::fd::AsFd;

use ruler_core::{CursorIcon, InputEvent, Key, Point, PointerEvent, ResizeDirection};
use rustix::fs::{MemfdFlags, memfd_create};
use rustix::mm::{MapFlags, ProtFlags, mmap};
use x11rb::atom_manager;
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::shape::{self, ConnectionExt as _};
use x11rb::protocol::shm::{self, ConnectionExt as _};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::{MonitorInfo, OverlayConfig, OverlayPlatform, PlatformError, PlatformEvent};

// Atoms needed for EWMH hints
atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        _NET_WM_NAME,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_UTILITY,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_SKIP_TASKBAR,
        _NET_WM_STATE_SKIP_PAGER,
        ATOM,
        UTF8_STRING,
    }
}

const XK_T_LOWER: u32 = 0x0074;
const XK_T_UPPER: u32 = 0x0054;
const XK_ESCAPE: u32 = 0xff1b;

/// Primary pointer button
const BUTTON_LEFT: u8 = 1;

/// Map an unshifted keysym to a ruler key
pub(crate) fn key_from_keysym(keysym: u32) -> Key {
    match keysym {
        XK_T_LOWER | XK_T_UPPER => Key::T,
        XK_ESCAPE => Key::Escape,
        _ => Key::Other,
    }
}

/// Glyph index in the standard X cursor font
pub(crate) fn cursor_glyph(cursor: CursorIcon) -> u16 {
    use ResizeDirection::*;
    match cursor {
        CursorIcon::Default => 68,      // XC_left_ptr
        CursorIcon::Move => 52,         // XC_fleur
        CursorIcon::RowResize => 116,   // XC_sb_v_double_arrow
        CursorIcon::ColumnResize => 108, // XC_sb_h_double_arrow
        CursorIcon::Resize(direction) => match direction {
            N => 138,  // XC_top_side
            S => 16,   // XC_bottom_side
            E => 96,   // XC_right_side
            W => 70,   // XC_left_side
            NE => 136, // XC_top_right_corner
            NW => 134, // XC_top_left_corner
            SE => 14,  // XC_bottom_right_corner
            SW => 12,  // XC_bottom_left_corner
        },
    }
}

/// Whether an event with `sequence` was generated before the request `request`
/// was processed. Sequence numbers are the low 16 bits and wrap.
pub(crate) fn precedes(sequence: u16, request: u16) -> bool {
    (sequence.wrapping_sub(request) as i16) < 0
}

fn other(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::Other(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Standalone Monitor Enumeration
// ─────────────────────────────────────────────────────────────────────────────

pub fn get_all_monitors() -> Vec<MonitorInfo> {
    let Ok((conn, screen_num)) = x11rb::connect(None) else {
        return Vec::new();
    };
    query_monitors(&conn, conn.setup().roots[screen_num].root)
}

fn query_monitors(conn: &RustConnection, root: Window) -> Vec<MonitorInfo> {
    let Ok(monitors) = conn.randr_get_monitors(root, true) else {
        return Vec::new();
    };
    let Ok(monitors) = monitors.reply() else {
        return Vec::new();
    };

    monitors
        .monitors
        .iter()
        .enumerate()
        .map(|(idx, mon)| {
            let name = conn
                .get_atom_name(mon.name)
                .ok()
                .and_then(|r| r.reply().ok())
                .map(|r| String::from_utf8_lossy(&r.name).to_string())
                .unwrap_or_else(|| format!("Monitor {}", idx + 1));

            MonitorInfo {
                id: name.clone(),
                name,
                x: mon.x as i32,
                y: mon.y as i32,
                width: mon.width as u32,
                height: mon.height as u32,
                is_primary: mon.primary,
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard
// ─────────────────────────────────────────────────────────────────────────────

/// Keycode to keysym table fetched once at startup
struct Keymap {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl Keymap {
    fn load(conn: &RustConnection) -> Result<Self, PlatformError> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = conn
            .get_keyboard_mapping(min, max - min + 1)
            .map_err(other)?
            .reply()
            .map_err(other)?;
        Ok(Self {
            min_keycode: min,
            per_keycode: reply.keysyms_per_keycode as usize,
            keysyms: reply.keysyms,
        })
    }

    /// First (unshifted) keysym bound to `keycode`
    fn keysym(&self, keycode: Keycode) -> Option<Keysym> {
        let index = keycode.checked_sub(self.min_keycode)? as usize * self.per_keycode;
        self.keysyms.get(index).copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// X11 Overlay Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// SHM buffer for efficient pixel transfer
struct ShmBuffer {
    seg_id: shm::Seg,
    ptr: *mut u8,
    size: usize,
}

pub struct X11Overlay {
    conn: RustConnection,
    root: Window,
    window: Window,
    gc: Gcontext,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    depth: u8,

    // Pixel buffers
    pixel_data: Vec<u8>, // RGBA from renderer
    shm_buffer: ShmBuffer,

    keymap: Keymap,
    cursor_font: Font,
    cursors: HashMap<CursorIcon, Cursor>,
    button_held: bool,
    /// Sequence number of the last resize we requested
    size_request: Option<u16>,
}

impl X11Overlay {
    /// Find a 32-bit ARGB visual for transparency
    fn find_argb_visual(screen: &Screen) -> Option<(Visualid, u8)> {
        for depth in &screen.allowed_depths {
            if depth.depth == 32 {
                for visual in &depth.visuals {
                    if visual.class == VisualClass::TRUE_COLOR {
                        return Some((visual.visual_id, depth.depth));
                    }
                }
            }
        }
        None
    }

    /// Create a shared memory buffer for efficient pixel transfer
    fn create_shm_buffer(
        conn: &RustConnection,
        width: u32,
        height: u32,
    ) -> Result<ShmBuffer, PlatformError> {
        let size = (width * height * 4) as usize;

        let fd = memfd_create(c"screen-ruler-x11-buffer", MemfdFlags::CLOEXEC)
            .map_err(|e| PlatformError::BufferError(format!("memfd_create failed: {}", e)))?;

        rustix::fs::ftruncate(&fd, size as u64)
            .map_err(|e| PlatformError::BufferError(format!("ftruncate failed: {}", e)))?;

        // SAFETY: fresh shared mapping of a memfd we own, sized above
        let ptr = unsafe {
            mmap(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                fd.as_fd(),
                0,
            )
            .map_err(|e| PlatformError::BufferError(format!("mmap failed: {}", e)))?
        };

        let seg_id = conn
            .generate_id()
            .map_err(|e| PlatformError::BufferError(e.to_string()))?;

        // x11rb shm_attach_fd takes ownership of the fd
        let file = File::from(fd);
        conn.shm_attach_fd(seg_id, file, false)
            .map_err(|e| PlatformError::BufferError(format!("shm_attach_fd failed: {}", e)))?;

        Ok(ShmBuffer {
            seg_id,
            ptr: ptr as *mut u8,
            size,
        })
    }

    fn release_shm_buffer(&self) {
        let _ = self.conn.shm_detach(self.shm_buffer.seg_id);
        // SAFETY: ptr/size come from the mmap in create_shm_buffer
        unsafe {
            rustix::mm::munmap(self.shm_buffer.ptr as *mut _, self.shm_buffer.size).ok();
        }
    }

    /// Recreate SHM buffer after resize
    fn recreate_shm_buffer(&mut self) -> Result<(), PlatformError> {
        self.release_shm_buffer();
        self.shm_buffer = Self::create_shm_buffer(&self.conn, self.width, self.height)?;
        self.pixel_data
            .resize((self.width * self.height * 4) as usize, 0);
        Ok(())
    }

    /// Set EWMH hints: title, utility type, above, no taskbar/pager entry
    fn setup_window_hints(&self, atoms: &AtomCollection, title: &str) -> Result<(), PlatformError> {
        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                atoms._NET_WM_NAME,
                atoms.UTF8_STRING,
                title.as_bytes(),
            )
            .map_err(other)?;

        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                AtomEnum::WM_CLASS,
                AtomEnum::STRING,
                format!("{title}\0{title}\0").as_bytes(),
            )
            .map_err(other)?;

        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                atoms._NET_WM_WINDOW_TYPE,
                atoms.ATOM,
                &[atoms._NET_WM_WINDOW_TYPE_UTILITY],
            )
            .map_err(other)?;

        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                atoms._NET_WM_STATE,
                atoms.ATOM,
                &[
                    atoms._NET_WM_STATE_ABOVE,
                    atoms._NET_WM_STATE_SKIP_TASKBAR,
                    atoms._NET_WM_STATE_SKIP_PAGER,
                ],
            )
            .map_err(other)?;

        Ok(())
    }

    /// Make the whole window accept input
    fn update_input_shape(&self) {
        let rect = Rectangle {
            x: 0,
            y: 0,
            width: self.width as u16,
            height: self.height as u16,
        };
        let _ = self.conn.shape_rectangles(
            shape::SO::SET,
            shape::SK::INPUT,
            ClipOrdering::UNSORTED,
            self.window,
            0,
            0,
            &[rect],
        );
    }

    /// Cursor for `icon`, created from the cursor font on first use
    fn cursor_for(&mut self, icon: CursorIcon) -> Result<Cursor, PlatformError> {
        if let Some(cursor) = self.cursors.get(&icon) {
            return Ok(*cursor);
        }
        let cursor = self.conn.generate_id().map_err(other)?;
        let glyph = cursor_glyph(icon);
        self.conn
            .create_glyph_cursor(
                cursor,
                self.cursor_font,
                self.cursor_font,
                glyph,
                glyph + 1,
                0,
                0,
                0,
                0xffff,
                0xffff,
                0xffff,
            )
            .map_err(other)?;
        self.cursors.insert(icon, cursor);
        Ok(cursor)
    }

    fn pointer_event(event_x: i16, event_y: i16, root_x: i16, root_y: i16) -> PointerEvent {
        PointerEvent::new(
            Point::new(event_x as f64, event_y as f64),
            Point::new(root_x as f64, root_y as f64),
        )
    }

    fn translate(&mut self, event: Event) -> Option<PlatformEvent> {
        let input = match event {
            Event::ButtonPress(e) if e.detail == BUTTON_LEFT => {
                self.button_held = true;
                // Override-redirect windows are never focused by the window manager
                let _ = self.conn.set_input_focus(
                    InputFocus::PARENT,
                    self.window,
                    x11rb::CURRENT_TIME,
                );
                InputEvent::PointerPressed(Self::pointer_event(
                    e.event_x, e.event_y, e.root_x, e.root_y,
                ))
            }
            Event::ButtonRelease(e) if e.detail == BUTTON_LEFT => {
                self.button_held = false;
                InputEvent::PointerReleased(Self::pointer_event(
                    e.event_x, e.event_y, e.root_x, e.root_y,
                ))
            }
            Event::MotionNotify(e) => {
                let pointer = Self::pointer_event(e.event_x, e.event_y, e.root_x, e.root_y);
                if self.button_held {
                    InputEvent::PointerDragged(pointer)
                } else {
                    InputEvent::PointerMoved(pointer)
                }
            }
            Event::KeyPress(e) => {
                let key = self
                    .keymap
                    .keysym(e.detail)
                    .map(key_from_keysym)
                    .unwrap_or(Key::Other);
                let ctrl = u16::from(e.state) & u16::from(KeyButMask::CONTROL) != 0;
                InputEvent::KeyPressed { key, ctrl }
            }
            Event::ConfigureNotify(e) if e.window == self.window => {
                // Reports a size from before our latest resize took effect
                if self.size_request.is_some_and(|req| precedes(e.sequence, req)) {
                    return None;
                }
                let (width, height) = (e.width as u32, e.height as u32);
                if width == self.width && height == self.height {
                    return None;
                }
                self.apply_size(width, height);
                InputEvent::Resized {
                    width: width as f64,
                    height: height as f64,
                }
            }
            Event::Expose(e) if e.count == 0 => return Some(PlatformEvent::Exposed),
            Event::DestroyNotify(e) if e.window == self.window => {
                return Some(PlatformEvent::CloseRequested);
            }
            _ => return None,
        };
        Some(PlatformEvent::Input(input))
    }

    /// Adopt a new size: buffers and input shape
    fn apply_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let Err(e) = self.recreate_shm_buffer() {
            tracing::warn!(error = %e, width, height, "Failed to recreate SHM buffer");
        }
        self.update_input_shape();
    }
}

impl OverlayPlatform for X11Overlay {
    fn new(config: OverlayConfig) -> Result<Self, PlatformError> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|e| PlatformError::ConnectionFailed(e.to_string()))?;

        let atoms = AtomCollection::new(&conn)
            .map_err(other)?
            .reply()
            .map_err(other)?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;

        // Check for required extensions
        conn.shape_query_version()
            .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?
            .reply()
            .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?;

        conn.shm_query_version()
            .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?
            .reply()
            .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?;

        let (visual, depth) = Self::find_argb_visual(screen)
            .ok_or_else(|| PlatformError::UnsupportedFeature("32-bit ARGB visual".into()))?;

        let colormap = conn.generate_id().map_err(other)?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, root, visual)
            .map_err(other)?;

        let monitors = query_monitors(&conn, root);
        let (abs_x, abs_y) = super::initial_position(&config, &monitors);

        let window = conn.generate_id().map_err(other)?;
        let win_aux = CreateWindowAux::new()
            .background_pixel(0)
            .border_pixel(0)
            .colormap(colormap)
            .event_mask(
                EventMask::EXPOSURE
                    | EventMask::BUTTON_PRESS
                    | EventMask::BUTTON_RELEASE
                    | EventMask::POINTER_MOTION
                    | EventMask::KEY_PRESS
                    | EventMask::STRUCTURE_NOTIFY,
            )
            .override_redirect(1);

        conn.create_window(
            depth,
            window,
            root,
            abs_x as i16,
            abs_y as i16,
            config.width as u16,
            config.height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &win_aux,
        )
        .map_err(other)?;

        let gc = conn.generate_id().map_err(other)?;
        conn.create_gc(gc, window, &CreateGCAux::new())
            .map_err(other)?;

        let cursor_font = conn.generate_id().map_err(other)?;
        conn.open_font(cursor_font, b"cursor").map_err(other)?;

        let keymap = Keymap::load(&conn)?;
        let shm_buffer = Self::create_shm_buffer(&conn, config.width, config.height)?;

        let mut overlay = Self {
            conn,
            root,
            window,
            gc,
            width: config.width,
            height: config.height,
            x: abs_x,
            y: abs_y,
            depth,
            pixel_data: vec![0u8; (config.width * config.height * 4) as usize],
            shm_buffer,
            keymap,
            cursor_font,
            cursors: HashMap::new(),
            button_held: false,
            size_request: None,
        };

        overlay.setup_window_hints(&atoms, &config.namespace)?;
        overlay.update_input_shape();
        overlay.set_cursor(CursorIcon::Default);

        overlay.conn.map_window(window).map_err(other)?;
        overlay.conn.flush().map_err(other)?;

        tracing::info!(
            x = abs_x,
            y = abs_y,
            width = config.width,
            height = config.height,
            "X11 ruler window created"
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

        let _ = self
            .conn
            .configure_window(self.window, &ConfigureWindowAux::new().x(x).y(y));
        let _ = self.conn.flush();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.apply_size(width, height);

        if let Ok(cookie) = self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().width(width).height(height),
        ) {
            self.size_request = Some(cookie.sequence_number() as u16);
        }
        let _ = self.conn.flush();
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        match self.cursor_for(cursor) {
            Ok(cursor) => {
                let _ = self.conn.change_window_attributes(
                    self.window,
                    &ChangeWindowAttributesAux::new().cursor(cursor),
                );
                let _ = self.conn.flush();
            }
            Err(e) => tracing::warn!(error = %e, ?cursor, "Failed to create cursor"),
        }
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.pixel_data)
    }

    fn commit(&mut self) {
        // SAFETY: the mapping is live and exactly `size` bytes long
        let shm_slice =
            unsafe { std::slice::from_raw_parts_mut(self.shm_buffer.ptr, self.shm_buffer.size) };

        // RGBA -> BGRA
        for (src, dst) in self.pixel_data.chunks_exact(4).zip(shm_slice.chunks_exact_mut(4)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = src[3];
        }

        let _ = self.conn.shm_put_image(
            self.window,
            self.gc,
            self.width as u16,
            self.height as u16,
            0,
            0,
            self.width as u16,
            self.height as u16,
            0,
            0,
            self.depth,
            ImageFormat::Z_PIXMAP.into(),
            false,
            self.shm_buffer.seg_id,
            0,
        );
        let _ = self.conn.flush();
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = Vec::new();
        loop {
            match self.conn.poll_for_event() {
                Ok(Some(event)) => events.extend(self.translate(event)),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "X11 connection error");
                    events.push(PlatformEvent::CloseRequested);
                    break;
                }
            }
        }
        events
    }

    fn get_monitors(&self) -> Vec<MonitorInfo> {
        query_monitors(&self.conn, self.root)
    }
}

impl Drop for X11Overlay {
    fn drop(&mut self) {
        self.release_shm_buffer();

        for cursor in self.cursors.values() {
            let _ = self.conn.free_cursor(*cursor);
        }
        let _ = self.conn.close_font(self.cursor_font);
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.flush();
    }
}
