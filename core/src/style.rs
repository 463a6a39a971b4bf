//! Colors, fonts and panel metrics for the ruler face
//!
//! Colors are straight (non-premultiplied) RGBA.

use crate::metrics::FontSpec;

pub type Rgba = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Window
// ─────────────────────────────────────────────────────────────────────────────

/// Fill covering the whole window
pub const BACKGROUND_OUTER: Rgba = [0x00, 0x00, 0x00, 0x20];
/// Fill inset by [`BACKGROUND_INSET`], drawn over the outer fill
pub const BACKGROUND_INNER: Rgba = [0xFF, 0xFF, 0x33, 0x20];
pub const BACKGROUND_INSET: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Ruler arms
// ─────────────────────────────────────────────────────────────────────────────

pub const TICK_COLOR: Rgba = [0, 0, 0, 255];
pub const TICK_WIDTH: f32 = 1.0;
/// Tick strokes are shifted by this much on both axes to land on pixel centers
pub const TICK_NUDGE: f64 = -0.5;
pub const MARKER_COLOR: Rgba = [0x55, 0x55, 0x55, 255];

// ─────────────────────────────────────────────────────────────────────────────
// Measurement lines
// ─────────────────────────────────────────────────────────────────────────────

pub const LINE_COLOR: Rgba = [255, 0, 0, 255];
pub const LINE_WIDTH: f32 = 1.0;
/// Dash pattern of secondary lines: (dash, gap)
pub const SECONDARY_DASH: (f32, f32) = (10.0, 5.0);

// ─────────────────────────────────────────────────────────────────────────────
// Readout panel
// ─────────────────────────────────────────────────────────────────────────────

pub const PANEL_BACKGROUND: Rgba = [0xCC, 0xCC, 0xCC, 0x80];
pub const PANEL_RADIUS: f32 = 5.0;
pub const PANEL_PADDING: f64 = 5.0;
/// Gap between columns and between rows
pub const PANEL_GAP: f64 = 3.0;
pub const SEPARATOR_COLOR: Rgba = [0x80, 0x80, 0x80, 255];
/// Height of the row holding the range separator
pub const SEPARATOR_HEIGHT: f64 = 3.0;

pub const READOUT_SIZE: f32 = 15.0;
pub const KEY_FONT: FontSpec = FontSpec::regular(READOUT_SIZE).bold();
pub const KEY_COLOR: Rgba = [0, 0, 0, 255];
/// W and H
pub const WINDOW_READOUT_FONT: FontSpec = FontSpec::regular(READOUT_SIZE);
pub const WINDOW_READOUT_COLOR: Rgba = [0, 0, 255, 255];
/// X and Y
pub const POSITION_READOUT_FONT: FontSpec = FontSpec::regular(READOUT_SIZE).italic();
pub const POSITION_READOUT_COLOR: Rgba = [0xA5, 0x2A, 0x2A, 255];
/// w and h
pub const EXTENT_READOUT_FONT: FontSpec = FontSpec::regular(READOUT_SIZE).italic();
pub const EXTENT_READOUT_COLOR: Rgba = [0, 0, 0, 255];
