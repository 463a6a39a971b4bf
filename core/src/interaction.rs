//! Frameless window move/resize
//!
//! The ruler window has no native decorations, so moving and resizing are
//! driven from raw pointer events. While idle, the pointer position is
//! classified into one of nine zones: a [`BORDER`] px band around the edge
//! selects a resize direction (corners win over edges), everything else moves
//! the window.
//!
//! A dimension sitting at [`MIN_DIMENSION`] only changes again once the
//! pointer has moved back past the edge being dragged.

use crate::geometry::{MIN_DIMENSION, Point, PointerEvent, WindowGeometry};

/// Width of the resize band around the window edge
pub const BORDER: f64 = 6.0;

/// Edge or corner being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeDirection {
    /// Moves the top edge
    pub fn is_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    /// Moves the bottom edge
    pub fn is_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    /// Moves the right edge
    pub fn is_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    /// Moves the left edge
    pub fn is_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }
}

/// Region of the window under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Interior,
    Border(ResizeDirection),
}

/// Pointer cursor requested by the ruler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    Resize(ResizeDirection),
    /// Over a horizontal measurement line
    RowResize,
    /// Over a vertical measurement line
    ColumnResize,
}

/// Current window interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Moving,
    Resizing(ResizeDirection),
}

/// Classify a window-local point into a zone
pub fn classify(local: Point, width: f64, height: f64) -> Zone {
    use ResizeDirection::*;

    let (x, y) = (local.x, local.y);
    let left = x < BORDER;
    let right = x > width - BORDER;
    let top = y < BORDER;
    let bottom = y > height - BORDER;

    let direction = if left && top {
        NW
    } else if left && bottom {
        SW
    } else if right && top {
        NE
    } else if right && bottom {
        SE
    } else if left {
        W
    } else if right {
        E
    } else if top {
        N
    } else if bottom {
        S
    } else {
        return Zone::Interior;
    };
    Zone::Border(direction)
}

/// Cursor shown while hovering a zone
pub fn zone_cursor(zone: Zone) -> CursorIcon {
    match zone {
        Zone::Interior => CursorIcon::Default,
        Zone::Border(direction) => CursorIcon::Resize(direction),
    }
}

/// Move/resize state machine for the overlay window
#[derive(Debug, Clone, Default)]
pub struct WindowInteraction {
    mode: InteractionMode,
    hover: Option<Zone>,
    /// Pointer position at press, window-local
    press_local: Point,
    /// Distance from the pointer to the far edges at press
    far_offset: Point,
}

impl WindowInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Zone under the pointer as of the last idle move
    pub fn hover(&self) -> Option<Zone> {
        self.hover
    }

    pub fn is_active(&self) -> bool {
        self.mode != InteractionMode::Idle
    }

    /// Pointer moved with no button held. Returns the cursor to display.
    pub fn pointer_moved(&mut self, event: PointerEvent, geometry: &WindowGeometry) -> CursorIcon {
        let zone = classify(event.local, geometry.width, geometry.height);
        self.hover = Some(zone);
        zone_cursor(zone)
    }

    /// Pointer pressed. Picks the mode from the zone under the pointer.
    pub fn pointer_pressed(&mut self, event: PointerEvent, geometry: &WindowGeometry) -> CursorIcon {
        let zone = classify(event.local, geometry.width, geometry.height);
        self.hover = Some(zone);
        self.press_local = event.local;
        self.far_offset = Point::new(
            geometry.width - event.local.x,
            geometry.height - event.local.y,
        );

        self.mode = match zone {
            Zone::Interior => InteractionMode::Moving,
            Zone::Border(direction) => InteractionMode::Resizing(direction),
        };
        tracing::debug!(mode = ?self.mode, "Window interaction started");

        match self.mode {
            InteractionMode::Moving => CursorIcon::Move,
            _ => zone_cursor(zone),
        }
    }

    /// Pointer dragged. Applies the active move/resize to `geometry`.
    ///
    /// Returns true if the geometry changed.
    pub fn pointer_dragged(&mut self, event: PointerEvent, geometry: &mut WindowGeometry) -> bool {
        let before = *geometry;
        match self.mode {
            InteractionMode::Idle => {}
            InteractionMode::Moving => {
                geometry.x = event.screen.x - self.press_local.x;
                geometry.y = event.screen.y - self.press_local.y;
            }
            InteractionMode::Resizing(direction) => {
                if !matches!(direction, ResizeDirection::W | ResizeDirection::E) {
                    self.resize_height(direction, event, geometry);
                }
                if !matches!(direction, ResizeDirection::N | ResizeDirection::S) {
                    self.resize_width(direction, event, geometry);
                }
            }
        }
        *geometry != before
    }

    /// Pointer released. Ends the session.
    pub fn pointer_released(&mut self) -> CursorIcon {
        if self.mode != InteractionMode::Idle {
            tracing::debug!(mode = ?self.mode, "Window interaction ended");
        }
        let was_moving = self.mode == InteractionMode::Moving;
        self.mode = InteractionMode::Idle;
        match (was_moving, self.hover) {
            (false, Some(zone)) => zone_cursor(zone),
            _ => CursorIcon::Default,
        }
    }

    fn resize_height(
        &self,
        direction: ResizeDirection,
        event: PointerEvent,
        geometry: &mut WindowGeometry,
    ) {
        if direction.is_north() {
            if geometry.height > MIN_DIMENSION || event.local.y < 0.0 {
                let height = geometry.y - event.screen.y + geometry.height;
                geometry.height = height.max(MIN_DIMENSION);
                geometry.y = event.screen.y;
            }
        } else if geometry.height > MIN_DIMENSION
            || event.local.y + self.far_offset.y - geometry.height > 0.0
        {
            geometry.height = (event.local.y + self.far_offset.y).max(MIN_DIMENSION);
        }
    }

    fn resize_width(
        &self,
        direction: ResizeDirection,
        event: PointerEvent,
        geometry: &mut WindowGeometry,
    ) {
        if direction.is_west() {
            if geometry.width > MIN_DIMENSION || event.local.x < 0.0 {
                let width = geometry.x - event.screen.x + geometry.width;
                geometry.width = width.max(MIN_DIMENSION);
                geometry.x = event.screen.x;
            }
        } else if geometry.width > MIN_DIMENSION
            || event.local.x + self.far_offset.x - geometry.width > 0.0
        {
            geometry.width = (event.local.x + self.far_offset.x).max(MIN_DIMENSION);
        }
    }
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod interaction_tests;
