//! Ruler Overlay Library
//!
//! Native window backends and software rendering for the screen ruler.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    ruler                            │
//! │                  RulerOverlay                       │
//! │       (event loop: platform <-> RulerScene)         │
//! ├─────────────────────────────────────────────────────┤
//! │                    renderer                         │
//! │            tiny-skia + cosmic-text                  │
//! │      (display list painting, text measurement)      │
//! ├─────────────────────────────────────────────────────┤
//! │                    platform/                        │
//! │                  x11, windows                       │
//! │     (OS window, pixel buffer, input, cursors)       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod platform;
pub mod renderer;
pub mod ruler;
pub mod utils;

// Re-export commonly used types
pub use error::{OverlayError, RendererError};
pub use platform::{
    MonitorInfo, NativeOverlay, OverlayConfig, OverlayPlatform, PlatformError, PlatformEvent,
    get_all_monitors,
};
pub use renderer::Renderer;
pub use ruler::RulerOverlay;
