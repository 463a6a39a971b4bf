//! Draggable measurement lines
//!
//! Two primary lines (one per orientation) are always shown. Each has a
//! secondary "range" line paired with it that is only shown in range mode and
//! measures its distance from the primary.
//!
//! A horizontal line spans the window width and is dragged vertically, so its
//! offset is a y coordinate. A vertical line is the reverse.
//!
//! Moving a primary line emits [`LineEvent::PrimaryMoved`], which is applied
//! to the paired secondary before the drag call returns so the secondary keeps
//! its extent.

use crate::geometry::{Axis, Point, WindowGeometry};

/// Half the line hit band, excluding the center pixel
pub const LINE_PAD: f64 = 2.0;

/// Thickness of a line's hit band
pub const LINE_SIZE: f64 = 2.0 * LINE_PAD + 1.0;

/// Initial offset of the primary lines
pub const PRIMARY_START: f64 = 100.0 - LINE_PAD;

/// Initial distance of a secondary line from its primary
pub const SECONDARY_START_DELTA: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    Primary,
    Secondary,
}

/// Identifies one of the four lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineId {
    HorizontalPrimary,
    VerticalPrimary,
    HorizontalSecondary,
    VerticalSecondary,
}

impl LineId {
    /// Topmost first, the order pointer hit-testing uses
    pub const HIT_ORDER: [LineId; 4] = [
        LineId::VerticalSecondary,
        LineId::HorizontalSecondary,
        LineId::VerticalPrimary,
        LineId::HorizontalPrimary,
    ];

    pub fn orientation(self) -> Axis {
        match self {
            LineId::HorizontalPrimary | LineId::HorizontalSecondary => Axis::Horizontal,
            LineId::VerticalPrimary | LineId::VerticalSecondary => Axis::Vertical,
        }
    }

    pub fn role(self) -> LineRole {
        match self {
            LineId::HorizontalPrimary | LineId::VerticalPrimary => LineRole::Primary,
            LineId::HorizontalSecondary | LineId::VerticalSecondary => LineRole::Secondary,
        }
    }

    /// Window axis the line moves along
    pub fn drag_axis(self) -> Axis {
        match self.orientation() {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    fn primary_of(orientation: Axis) -> LineId {
        match orientation {
            Axis::Horizontal => LineId::HorizontalPrimary,
            Axis::Vertical => LineId::VerticalPrimary,
        }
    }

    fn secondary_of(orientation: Axis) -> LineId {
        match orientation {
            Axis::Horizontal => LineId::HorizontalSecondary,
            Axis::Vertical => LineId::VerticalSecondary,
        }
    }
}

/// Position of one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementLine {
    pub orientation: Axis,
    pub offset: f64,
    pub role: LineRole,
}

/// Notifications produced by line movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEvent {
    /// A primary line moved by `delta` pixels
    PrimaryMoved { orientation: Axis, delta: f64 },
}

/// Snapshot taken when a line drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragStart {
    line: LineId,
    pointer: Point,
    offset: f64,
}

/// Per-line drag state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineDrag {
    Idle,
    Dragging(LineId),
}

/// Text shown in the readout panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readouts {
    pub window_width: String,
    pub window_height: String,
    /// From the vertical primary line
    pub line_x: String,
    /// From the horizontal primary line
    pub line_y: String,
    /// Vertical secondary's distance from its primary, in range mode
    pub extent_w: Option<String>,
    /// Horizontal secondary's distance from its primary, in range mode
    pub extent_h: Option<String>,
}

fn px(value: i64) -> String {
    format!("{value}px")
}

/// The four measurement lines and the range-mode toggle
#[derive(Debug, Clone)]
pub struct MeasurementLines {
    horizontal_primary: MeasurementLine,
    vertical_primary: MeasurementLine,
    horizontal_secondary: MeasurementLine,
    vertical_secondary: MeasurementLine,
    range_mode: bool,
    drag: Option<DragStart>,
}

impl Default for MeasurementLines {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MeasurementLines {
    pub fn new(range_mode: bool) -> Self {
        let line = |orientation, offset, role| MeasurementLine {
            orientation,
            offset,
            role,
        };
        Self {
            horizontal_primary: line(Axis::Horizontal, PRIMARY_START, LineRole::Primary),
            vertical_primary: line(Axis::Vertical, PRIMARY_START, LineRole::Primary),
            horizontal_secondary: line(
                Axis::Horizontal,
                PRIMARY_START + SECONDARY_START_DELTA,
                LineRole::Secondary,
            ),
            vertical_secondary: line(
                Axis::Vertical,
                PRIMARY_START + SECONDARY_START_DELTA,
                LineRole::Secondary,
            ),
            range_mode,
            drag: None,
        }
    }

    pub fn line(&self, id: LineId) -> &MeasurementLine {
        match id {
            LineId::HorizontalPrimary => &self.horizontal_primary,
            LineId::VerticalPrimary => &self.vertical_primary,
            LineId::HorizontalSecondary => &self.horizontal_secondary,
            LineId::VerticalSecondary => &self.vertical_secondary,
        }
    }

    fn line_mut(&mut self, id: LineId) -> &mut MeasurementLine {
        match id {
            LineId::HorizontalPrimary => &mut self.horizontal_primary,
            LineId::VerticalPrimary => &mut self.vertical_primary,
            LineId::HorizontalSecondary => &mut self.horizontal_secondary,
            LineId::VerticalSecondary => &mut self.vertical_secondary,
        }
    }

    pub fn offset(&self, id: LineId) -> f64 {
        self.line(id).offset
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Range mode
    // ─────────────────────────────────────────────────────────────────────────

    pub fn range_mode(&self) -> bool {
        self.range_mode
    }

    /// Flip range mode. Secondary offsets are left untouched.
    pub fn toggle_range_mode(&mut self) -> bool {
        self.range_mode = !self.range_mode;
        if !self.range_mode
            && matches!(self.drag, Some(start) if start.line.role() == LineRole::Secondary)
        {
            self.drag = None;
        }
        tracing::debug!(range_mode = self.range_mode, "Range mode toggled");
        self.range_mode
    }

    /// Whether a line is currently drawn and interactive
    pub fn is_visible(&self, id: LineId) -> bool {
        match id.role() {
            LineRole::Primary => true,
            LineRole::Secondary => self.range_mode,
        }
    }

    /// Lines to draw this frame, bottom-most first
    pub fn visible_lines(&self) -> impl Iterator<Item = (LineId, &MeasurementLine)> {
        LineId::HIT_ORDER
            .into_iter()
            .rev()
            .filter(|id| self.is_visible(*id))
            .map(|id| (id, self.line(id)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hit testing and dragging
    // ─────────────────────────────────────────────────────────────────────────

    /// Topmost visible line whose hit band contains `local`
    pub fn line_at(&self, local: Point, geometry: &WindowGeometry) -> Option<LineId> {
        if local.x < 0.0 || local.y < 0.0 || local.x >= geometry.width || local.y >= geometry.height
        {
            return None;
        }
        LineId::HIT_ORDER.into_iter().find(|&id| {
            if !self.is_visible(id) {
                return false;
            }
            let coord = id.drag_axis().along(local);
            let offset = self.offset(id);
            coord >= offset && coord < offset + LINE_SIZE
        })
    }

    pub fn drag_state(&self) -> LineDrag {
        match self.drag {
            Some(start) => LineDrag::Dragging(start.line),
            None => LineDrag::Idle,
        }
    }

    /// Start dragging `id` from the scene-space pointer position
    pub fn press(&mut self, id: LineId, pointer: Point) {
        self.drag = Some(DragStart {
            line: id,
            pointer,
            offset: self.offset(id),
        });
        tracing::debug!(?id, offset = self.offset(id), "Line drag started");
    }

    /// Move the dragged line to follow `pointer`.
    ///
    /// Returns the event emitted by the move, if any. Paired secondaries have
    /// already been updated when this returns.
    pub fn drag(&mut self, pointer: Point, geometry: &WindowGeometry) -> Option<LineEvent> {
        let start = self.drag?;
        let axis = start.line.drag_axis();
        let proposed = start.offset + (axis.along(pointer) - axis.along(start.pointer));
        let container = geometry.extent(axis);

        let (lower, upper) = match start.line.role() {
            LineRole::Primary => (0.0, container - LINE_SIZE),
            LineRole::Secondary => {
                let primary = self.offset(LineId::primary_of(start.line.orientation()));
                (primary + LINE_SIZE * 2.0, container - LINE_SIZE)
            }
        };
        // The lower bound wins when the primary sits too close to the far edge
        let clamped = proposed.min(upper).max(lower);

        self.set_offset(start.line, clamped)
    }

    /// End the current drag, if any
    pub fn release(&mut self) {
        if let Some(start) = self.drag.take() {
            tracing::debug!(id = ?start.line, offset = self.offset(start.line), "Line drag ended");
        }
    }

    /// Place a line directly, emitting and dispatching coupling events
    pub fn set_offset(&mut self, id: LineId, offset: f64) -> Option<LineEvent> {
        let line = self.line_mut(id);
        let delta = offset - line.offset;
        line.offset = offset;

        if id.role() != LineRole::Primary || delta == 0.0 {
            return None;
        }
        let event = LineEvent::PrimaryMoved {
            orientation: id.orientation(),
            delta,
        };
        self.dispatch(event);
        Some(event)
    }

    fn dispatch(&mut self, event: LineEvent) {
        match event {
            LineEvent::PrimaryMoved { orientation, delta } => {
                self.line_mut(LineId::secondary_of(orientation)).offset += delta;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Readouts
    // ─────────────────────────────────────────────────────────────────────────

    /// Absolute position readout of a primary line
    pub fn position_readout(&self, orientation: Axis) -> i64 {
        self.offset(LineId::primary_of(orientation)).trunc() as i64 + LINE_PAD as i64
    }

    /// Signed distance of a secondary line from its primary
    pub fn extent_readout(&self, orientation: Axis) -> i64 {
        let secondary = self.offset(LineId::secondary_of(orientation)).trunc();
        (secondary - self.offset(LineId::primary_of(orientation))) as i64
    }

    pub fn readouts(&self, geometry: &WindowGeometry) -> Readouts {
        let range = self.range_mode;
        Readouts {
            window_width: px(geometry.width.trunc() as i64 - 1),
            window_height: px(geometry.height.trunc() as i64 - 1),
            line_x: px(self.position_readout(Axis::Vertical)),
            line_y: px(self.position_readout(Axis::Horizontal)),
            extent_w: range.then(|| px(self.extent_readout(Axis::Vertical))),
            extent_h: range.then(|| px(self.extent_readout(Axis::Horizontal))),
        }
    }
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod lines_tests;
