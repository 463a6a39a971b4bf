//! Ruler scene
//!
//! [`RulerScene`] owns every piece of mutable ruler state and is the only
//! thing the platform layer talks to. Input arrives as [`InputEvent`]s; all
//! resulting mutations (including marking regeneration and secondary line
//! coupling) are complete by the time [`RulerScene::handle`] returns.
//!
//! A pointer press starts exactly one session: a line drag if a visible line
//! is under the pointer, otherwise a window move or resize. The session owns
//! every drag event until the button is released.

use crate::display::{Primitive, Rect, StrokeStyle};
use crate::geometry::{Axis, Point, PointerEvent, WindowGeometry};
use crate::interaction::{CursorIcon, InteractionMode, WindowInteraction};
use crate::lines::{LINE_PAD, LineDrag, LineId, LineRole, MeasurementLines};
use crate::markings::{self, AxisMarkings};
use crate::metrics::{LabelMetricsCache, MARKER_FONT, TextMeasurer};
use crate::panel;
use crate::style;

/// Keys the ruler reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    T,
    Escape,
    Other,
}

/// Platform-independent input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved with no button held
    PointerMoved(PointerEvent),
    PointerPressed(PointerEvent),
    /// Pointer moved with the button held
    PointerDragged(PointerEvent),
    PointerReleased(PointerEvent),
    KeyPressed { key: Key, ctrl: bool },
    /// The window was resized from outside the ruler
    Resized { width: f64, height: f64 },
}

/// What the platform has to do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneResponse {
    /// The window must be moved/resized to [`RulerScene::geometry`]
    pub geometry_changed: bool,
    /// New cursor to show
    pub cursor: Option<CursorIcon>,
    pub close_requested: bool,
    pub redraw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Session {
    #[default]
    Idle,
    Line,
    Window,
}

pub struct RulerScene {
    geometry: WindowGeometry,
    horizontal: AxisMarkings,
    vertical: AxisMarkings,
    label_cache: LabelMetricsCache,
    lines: MeasurementLines,
    interaction: WindowInteraction,
    session: Session,
    cursor: CursorIcon,
}

impl RulerScene {
    pub fn new(
        geometry: WindowGeometry,
        range_mode: bool,
        measurer: &mut impl TextMeasurer,
    ) -> Self {
        let geometry = WindowGeometry::new(geometry.x, geometry.y, geometry.width, geometry.height);
        let mut label_cache = LabelMetricsCache::prewarmed(measurer);
        let horizontal =
            markings::generate(Axis::Horizontal, geometry.width, &mut label_cache, measurer);
        let vertical =
            markings::generate(Axis::Vertical, geometry.height, &mut label_cache, measurer);

        Self {
            geometry,
            horizontal,
            vertical,
            label_cache,
            lines: MeasurementLines::new(range_mode),
            interaction: WindowInteraction::new(),
            session: Session::Idle,
            cursor: CursorIcon::Default,
        }
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    pub fn lines(&self) -> &MeasurementLines {
        &self.lines
    }

    pub fn markings(&self, axis: Axis) -> &AxisMarkings {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub fn label_cache(&self) -> &LabelMetricsCache {
        &self.label_cache
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Whether a line drag or window move/resize is in progress
    pub fn in_session(&self) -> bool {
        self.session != Session::Idle
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle(
        &mut self,
        event: InputEvent,
        measurer: &mut impl TextMeasurer,
    ) -> SceneResponse {
        let mut response = SceneResponse::default();

        match event {
            InputEvent::PointerMoved(pointer) => {
                if self.session == Session::Idle {
                    let cursor = self.hover_cursor(pointer);
                    self.set_cursor(cursor, &mut response);
                }
            }

            InputEvent::PointerPressed(pointer) => {
                if self.session != Session::Idle {
                    return response;
                }
                if let Some(id) = self.lines.line_at(pointer.local, &self.geometry) {
                    self.lines.press(id, pointer.local);
                    self.session = Session::Line;
                    self.set_cursor(line_cursor(id), &mut response);
                } else {
                    let cursor = self.interaction.pointer_pressed(pointer, &self.geometry);
                    self.session = Session::Window;
                    self.set_cursor(cursor, &mut response);
                }
            }

            InputEvent::PointerDragged(pointer) => match self.session {
                Session::Idle => {}
                Session::Line => {
                    if let LineDrag::Dragging(id) = self.lines.drag_state() {
                        let before = self.lines.offset(id);
                        self.lines.drag(pointer.local, &self.geometry);
                        response.redraw = self.lines.offset(id) != before;
                    }
                }
                Session::Window => {
                    let before = self.geometry;
                    if self.interaction.pointer_dragged(pointer, &mut self.geometry) {
                        response.geometry_changed = true;
                        let resized = before.width != self.geometry.width
                            || before.height != self.geometry.height;
                        if resized {
                            self.sync_markings(measurer);
                            response.redraw = true;
                        }
                    }
                }
            },

            InputEvent::PointerReleased(pointer) => match self.session {
                Session::Idle => {}
                Session::Line => {
                    self.lines.release();
                    self.session = Session::Idle;
                    let cursor = self.hover_cursor(pointer);
                    self.set_cursor(cursor, &mut response);
                }
                Session::Window => {
                    let cursor = self.interaction.pointer_released();
                    self.session = Session::Idle;
                    self.set_cursor(cursor, &mut response);
                }
            },

            InputEvent::KeyPressed { key: Key::T, ctrl: true } => {
                self.lines.toggle_range_mode();
                if self.session == Session::Line && self.lines.drag_state() == LineDrag::Idle {
                    self.session = Session::Idle;
                    self.set_cursor(CursorIcon::Default, &mut response);
                }
                response.redraw = true;
            }

            InputEvent::KeyPressed { key: Key::Escape, .. } => {
                tracing::debug!("Close requested");
                response.close_requested = true;
            }

            InputEvent::KeyPressed { .. } => {}

            // The window follows the scene while a move/resize is running, so
            // size notifications arriving meanwhile are echoes of earlier frames
            InputEvent::Resized { .. } if self.session == Session::Window => {}

            InputEvent::Resized { width, height } => {
                let resized =
                    WindowGeometry::new(self.geometry.x, self.geometry.y, width, height);
                if resized != self.geometry {
                    self.geometry = resized;
                    self.sync_markings(measurer);
                    response.redraw = true;
                }
                // Floored below the minimum: push the real size back
                response.geometry_changed = resized.width != width || resized.height != height;
            }
        }

        response
    }

    fn set_cursor(&mut self, cursor: CursorIcon, response: &mut SceneResponse) {
        if cursor != self.cursor {
            self.cursor = cursor;
            response.cursor = Some(cursor);
        }
    }

    /// Cursor for an idle pointer: a line band wins over the window zones
    fn hover_cursor(&mut self, pointer: PointerEvent) -> CursorIcon {
        match self.lines.line_at(pointer.local, &self.geometry) {
            Some(id) => line_cursor(id),
            None => self.interaction.pointer_moved(pointer, &self.geometry),
        }
    }

    /// Regenerate the markings of every arm whose length changed
    fn sync_markings(&mut self, measurer: &mut impl TextMeasurer) {
        for axis in Axis::ALL {
            let length = self.geometry.extent(axis);
            let markings = match axis {
                Axis::Horizontal => &mut self.horizontal,
                Axis::Vertical => &mut self.vertical,
            };
            if markings.state.length != length {
                *markings = markings::generate(axis, length, &mut self.label_cache, measurer);
                tracing::debug!(?axis, length, "Ruler markings regenerated");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the primitives for the current frame, back to front
    pub fn display_list(&self, measurer: &mut impl TextMeasurer) -> Vec<Primitive> {
        let (width, height) = (self.geometry.width, self.geometry.height);
        let mut list = Vec::with_capacity(
            self.horizontal.ticks.len() * 2 + self.vertical.ticks.len() * 2 + 32,
        );

        list.push(Primitive::FillRect {
            rect: Rect::new(0.0, 0.0, width, height),
            color: style::BACKGROUND_OUTER,
        });
        let inset = style::BACKGROUND_INSET;
        list.push(Primitive::FillRect {
            rect: Rect::new(inset, inset, width - 2.0 * inset, height - 2.0 * inset),
            color: style::BACKGROUND_INNER,
        });

        for markings in [&self.horizontal, &self.vertical] {
            push_markings(&mut list, markings);
        }

        let readouts = self.lines.readouts(&self.geometry);
        let (_, panel) = panel::layout(&readouts, &self.geometry, measurer);
        list.extend(panel);

        for (_, line) in self.lines.visible_lines() {
            let center = line.offset + LINE_PAD + 0.5;
            let (from, to) = match line.orientation {
                Axis::Horizontal => (Point::new(0.0, center), Point::new(width, center)),
                Axis::Vertical => (Point::new(center, 0.0), Point::new(center, height)),
            };
            let stroke_style = match line.role {
                LineRole::Primary => StrokeStyle::Solid,
                LineRole::Secondary => StrokeStyle::Dashed {
                    dash: style::SECONDARY_DASH.0,
                    gap: style::SECONDARY_DASH.1,
                },
            };
            list.push(Primitive::Line {
                from,
                to,
                width: style::LINE_WIDTH,
                color: style::LINE_COLOR,
                style: stroke_style,
            });
        }

        list
    }
}

/// Horizontal lines are dragged vertically and vice versa
fn line_cursor(id: LineId) -> CursorIcon {
    match id.orientation() {
        Axis::Horizontal => CursorIcon::RowResize,
        Axis::Vertical => CursorIcon::ColumnResize,
    }
}

fn push_markings(list: &mut Vec<Primitive>, markings: &AxisMarkings) {
    let nudge = style::TICK_NUDGE;
    // (position, from, to) measured from the ruler edge
    let stroke = |position: f64, from: f64, to: f64| {
        let (start, end) = match markings.axis {
            Axis::Horizontal => (Point::new(position, from), Point::new(position, to)),
            Axis::Vertical => (Point::new(from, position), Point::new(to, position)),
        };
        Primitive::solid_line(
            Point::new(start.x + nudge, start.y + nudge),
            Point::new(end.x + nudge, end.y + nudge),
            style::TICK_WIDTH,
            style::TICK_COLOR,
        )
    };

    list.extend(
        markings
            .ticks
            .iter()
            .map(|tick| stroke(tick.position, tick.inset, tick.length)),
    );
    list.extend(
        markings
            .fine_ticks
            .iter()
            .map(|tick| stroke(tick.position, 0.0, tick.length)),
    );
    list.extend(markings.labels.iter().map(|label| Primitive::Text {
        text: label.text.clone(),
        x: label.x,
        y: label.y,
        font: MARKER_FONT,
        color: style::MARKER_COLOR,
    }));
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod scene_tests;
