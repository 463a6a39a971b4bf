//! Platform abstraction for the ruler window
//!
//! Backends own the native window, its pixel buffer and the event queue.
//! They translate native input into [`PlatformEvent`]s and apply geometry and
//! cursor changes; all move/resize logic lives in `ruler-core`.

use ruler_core::{CursorIcon, InputEvent};

#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11;

#[cfg(target_os = "windows")]
pub mod windows;

/// Information about a connected monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Unique identifier for this monitor (platform-specific)
    pub id: String,
    /// Human-readable name/description
    pub name: String,
    /// X position of the monitor in virtual screen space
    pub x: i32,
    /// Y position of the monitor in virtual screen space
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

impl MonitorInfo {
    /// Check if a point is within this monitor's bounds
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }

    /// Convert relative monitor coordinates to absolute screen coordinates
    pub fn to_absolute(&self, rel_x: i32, rel_y: i32) -> (i32, i32) {
        (rel_x + self.x, rel_y + self.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Virtual Screen (Multi-Monitor) Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Bounding box of the virtual screen (all monitors combined)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualScreenBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl VirtualScreenBounds {
    /// Calculate the bounding box that encompasses all monitors
    pub fn from_monitors(monitors: &[MonitorInfo]) -> Option<Self> {
        if monitors.is_empty() {
            return None;
        }

        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;

        for m in monitors {
            min_x = min_x.min(m.x);
            min_y = min_y.min(m.y);
            max_x = max_x.max(m.x + m.width as i32);
            max_y = max_y.max(m.y + m.height as i32);
        }

        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Clamp a window position to stay within the virtual screen bounds
    pub fn clamp_position(&self, x: i32, y: i32, width: u32, height: u32) -> (i32, i32) {
        let clamped_x = x.clamp(self.min_x, (self.max_x - width as i32).max(self.min_x));
        let clamped_y = y.clamp(self.min_y, (self.max_y - height as i32).max(self.min_y));
        (clamped_x, clamped_y)
    }
}

/// Find a monitor by ID, or fall back to the primary monitor
pub fn find_monitor_by_id<'a>(
    monitors: &'a [MonitorInfo],
    id: Option<&str>,
) -> Option<&'a MonitorInfo> {
    if let Some(id) = id {
        if let Some(monitor) = monitors.iter().find(|m| m.id == id) {
            return Some(monitor);
        }
        tracing::warn!(monitor = id, "Monitor not found, using primary");
    }
    monitors.iter().find(|m| m.is_primary).or(monitors.first())
}

/// Convert a relative position to absolute screen coordinates.
/// Uses the monitor_id to find the correct monitor, falling back to primary.
pub fn resolve_absolute_position(
    relative_x: i32,
    relative_y: i32,
    monitor_id: Option<&str>,
    monitors: &[MonitorInfo],
) -> (i32, i32) {
    match find_monitor_by_id(monitors, monitor_id) {
        Some(monitor) => monitor.to_absolute(relative_x, relative_y),
        // No monitor information: use the position as-is
        None => (relative_x, relative_y),
    }
}

/// Absolute start position for a new ruler window.
///
/// Only the initial placement is kept on screen; the user may drag the
/// ruler partly off screen afterwards.
pub fn initial_position(config: &OverlayConfig, monitors: &[MonitorInfo]) -> (i32, i32) {
    let (x, y) = resolve_absolute_position(
        config.x,
        config.y,
        config.target_monitor_id.as_deref(),
        monitors,
    );
    VirtualScreenBounds::from_monitors(monitors)
        .map(|bounds| bounds.clamp_position(x, y, config.width, config.height))
        .unwrap_or((x, y))
}

/// Configuration for creating the ruler window
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Initial X position, relative to the target monitor
    pub x: i32,
    /// Initial Y position, relative to the target monitor
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Window title and class name
    pub namespace: String,
    /// Monitor the position is relative to. Primary if None or not found.
    pub target_monitor_id: Option<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 401,
            height: 401,
            namespace: "screen-ruler".to_string(),
            target_monitor_id: None,
        }
    }
}

/// Errors that can occur in platform operations
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("Buffer error: {0}")]
    BufferError(String),
    #[error("Platform error: {0}")]
    Other(String),
}

/// Event reported by a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// Pointer, keyboard or size input for the scene
    Input(InputEvent),
    /// Window contents were lost and must be redrawn
    Exposed,
    /// The window was closed by the system
    CloseRequested,
}

/// Trait that all platform backends must implement
pub trait OverlayPlatform: Sized {
    /// Create and show the ruler window
    fn new(config: OverlayConfig) -> Result<Self, PlatformError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Current X position in screen coordinates
    fn x(&self) -> i32;

    /// Current Y position in screen coordinates
    fn y(&self) -> i32;

    /// Move the window. No clamping is applied.
    fn set_position(&mut self, x: i32, y: i32);

    /// Resize the window and its pixel buffer
    fn set_size(&mut self, width: u32, height: u32);

    fn set_cursor(&mut self, cursor: CursorIcon);

    /// Get mutable access to the pixel buffer (RGBA format)
    /// Returns None if buffer is not ready
    fn pixel_buffer(&mut self) -> Option<&mut [u8]>;

    /// Commit the current pixel buffer to the screen
    fn commit(&mut self);

    /// Drain pending native events (non-blocking)
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Get information about all connected monitors
    fn get_monitors(&self) -> Vec<MonitorInfo>;
}

/// Re-export the appropriate platform for the current target
#[cfg(all(unix, not(target_os = "macos")))]
pub use x11::X11Overlay as NativeOverlay;

#[cfg(target_os = "windows")]
pub use windows::WindowsOverlay as NativeOverlay;

/// Get all connected monitors without requiring an existing window
#[cfg(all(unix, not(target_os = "macos")))]
pub fn get_all_monitors() -> Vec<MonitorInfo> {
    x11::get_all_monitors()
}

#[cfg(target_os = "windows")]
pub fn get_all_monitors() -> Vec<MonitorInfo> {
    windows::get_all_monitors()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: &str, x: i32, y: i32, primary: bool) -> MonitorInfo {
        MonitorInfo {
            id: id.to_string(),
            name: id.to_string(),
            x,
            y,
            width: 1920,
            height: 1080,
            is_primary: primary,
        }
    }

    fn monitors() -> Vec<MonitorInfo> {
        vec![
            monitor("DP-1", 0, 0, false),
            monitor("HDMI-1", 1920, 0, true),
        ]
    }

    #[test]
    fn test_resolve_by_id() {
        let monitors = monitors();
        assert_eq!(
            resolve_absolute_position(100, 50, Some("DP-1"), &monitors),
            (100, 50)
        );
        assert_eq!(
            resolve_absolute_position(100, 50, Some("HDMI-1"), &monitors),
            (2020, 50)
        );
    }

    #[test]
    fn test_resolve_falls_back_to_primary() {
        let monitors = monitors();
        assert_eq!(
            resolve_absolute_position(10, 10, Some("missing"), &monitors),
            (1930, 10)
        );
        assert_eq!(resolve_absolute_position(10, 10, None, &monitors), (1930, 10));
        assert_eq!(resolve_absolute_position(10, 10, None, &[]), (10, 10));
    }

    #[test]
    fn test_initial_position_stays_on_screen() {
        let monitors = monitors();
        let config = OverlayConfig {
            x: 1800,
            y: 900,
            target_monitor_id: Some("HDMI-1".to_string()),
            ..OverlayConfig::default()
        };
        // 1920 + 1800 would put the window past the right and bottom edges
        assert_eq!(initial_position(&config, &monitors), (3840 - 401, 1080 - 401));

        let config = OverlayConfig {
            x: -500,
            y: -500,
            target_monitor_id: Some("DP-1".to_string()),
            ..OverlayConfig::default()
        };
        assert_eq!(initial_position(&config, &monitors), (0, 0));
    }

    #[test]
    fn test_virtual_bounds() {
        let bounds = VirtualScreenBounds::from_monitors(&monitors());
        assert_eq!(
            bounds,
            Some(VirtualScreenBounds {
                min_x: 0,
                min_y: 0,
                max_x: 3840,
                max_y: 1080,
            })
        );
        assert!(VirtualScreenBounds::from_monitors(&[]).is_none());
        assert!(monitors()[1].contains(1920, 0));
        assert!(!monitors()[0].contains(1920, 0));
    }
}
