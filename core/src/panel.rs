//! Readout panel layout
//!
//! A two-column grid centered in the window: bold keys on the left (centered
//! in their column), values on the left edge of the second column. Range mode
//! appends a separator and the w/h extent rows.

use crate::display::{Primitive, Rect};
use crate::geometry::{Point, WindowGeometry};
use crate::lines::Readouts;
use crate::metrics::{FontSpec, TextExtent, TextMeasurer};
use crate::style::{self, Rgba};

/// One line of the readout grid
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRow {
    Value {
        key: &'static str,
        value: String,
        font: FontSpec,
        color: Rgba,
    },
    Separator,
}

impl PanelRow {
    fn value(key: &'static str, value: &str, font: FontSpec, color: Rgba) -> Self {
        PanelRow::Value {
            key,
            value: value.to_string(),
            font,
            color,
        }
    }
}

/// Rows shown for the given readouts, top to bottom
pub fn rows(readouts: &Readouts) -> Vec<PanelRow> {
    let mut rows = vec![
        PanelRow::value(
            "W:",
            &readouts.window_width,
            style::WINDOW_READOUT_FONT,
            style::WINDOW_READOUT_COLOR,
        ),
        PanelRow::value(
            "H:",
            &readouts.window_height,
            style::WINDOW_READOUT_FONT,
            style::WINDOW_READOUT_COLOR,
        ),
        PanelRow::value(
            "X:",
            &readouts.line_x,
            style::POSITION_READOUT_FONT,
            style::POSITION_READOUT_COLOR,
        ),
        PanelRow::value(
            "Y:",
            &readouts.line_y,
            style::POSITION_READOUT_FONT,
            style::POSITION_READOUT_COLOR,
        ),
    ];

    if let (Some(w), Some(h)) = (&readouts.extent_w, &readouts.extent_h) {
        rows.push(PanelRow::Separator);
        rows.push(PanelRow::value(
            "w:",
            w,
            style::EXTENT_READOUT_FONT,
            style::EXTENT_READOUT_COLOR,
        ));
        rows.push(PanelRow::value(
            "h:",
            h,
            style::EXTENT_READOUT_FONT,
            style::EXTENT_READOUT_COLOR,
        ));
    }
    rows
}

/// Measured row, ready for placement
struct MeasuredRow<'a> {
    row: &'a PanelRow,
    key: TextExtent,
    value: TextExtent,
    height: f64,
}

/// Lay out the panel for `readouts` and return its bounds and primitives
pub fn layout(
    readouts: &Readouts,
    geometry: &WindowGeometry,
    measurer: &mut impl TextMeasurer,
) -> (Rect, Vec<Primitive>) {
    let rows = rows(readouts);

    let measured: Vec<MeasuredRow> = rows
        .iter()
        .map(|row| match row {
            PanelRow::Value {
                key, value, font, ..
            } => {
                let key = measurer.measure(key, &style::KEY_FONT);
                let value = measurer.measure(value, font);
                MeasuredRow {
                    row,
                    key,
                    value,
                    height: key.height.max(value.height) as f64,
                }
            }
            PanelRow::Separator => MeasuredRow {
                row,
                key: TextExtent::default(),
                value: TextExtent::default(),
                height: style::SEPARATOR_HEIGHT,
            },
        })
        .collect();

    let key_column = measured.iter().map(|m| m.key.width as f64).fold(0.0, f64::max);
    let value_column = measured
        .iter()
        .map(|m| m.value.width as f64)
        .fold(0.0, f64::max);
    let content_height: f64 = measured.iter().map(|m| m.height).sum::<f64>()
        + style::PANEL_GAP * measured.len().saturating_sub(1) as f64;

    let width = 2.0 * style::PANEL_PADDING + key_column + style::PANEL_GAP + value_column;
    let height = 2.0 * style::PANEL_PADDING + content_height;
    let bounds = Rect::new(
        ((geometry.width - width) / 2.0).floor(),
        ((geometry.height - height) / 2.0).floor(),
        width,
        height,
    );

    let mut primitives = Vec::with_capacity(1 + measured.len() * 2);
    primitives.push(Primitive::RoundedRect {
        rect: bounds,
        radius: style::PANEL_RADIUS,
        color: style::PANEL_BACKGROUND,
    });

    let left = bounds.x + style::PANEL_PADDING;
    let value_x = left + key_column + style::PANEL_GAP;
    let mut y = bounds.y + style::PANEL_PADDING;
    for m in &measured {
        match m.row {
            PanelRow::Value {
                key,
                value,
                font,
                color,
            } => {
                primitives.push(Primitive::Text {
                    text: key.to_string(),
                    x: left + (key_column - m.key.width as f64) / 2.0,
                    y: y + (m.height - m.key.height as f64) / 2.0,
                    font: style::KEY_FONT,
                    color: style::KEY_COLOR,
                });
                primitives.push(Primitive::Text {
                    text: value.clone(),
                    x: value_x,
                    y: y + (m.height - m.value.height as f64) / 2.0,
                    font: *font,
                    color: *color,
                });
            }
            PanelRow::Separator => {
                let mid = y + (m.height / 2.0).floor() + 0.5;
                primitives.push(Primitive::solid_line(
                    Point::new(left, mid),
                    Point::new(bounds.x + bounds.width - style::PANEL_PADDING, mid),
                    1.0,
                    style::SEPARATOR_COLOR,
                ));
            }
        }
        y += m.height + style::PANEL_GAP;
    }

    (bounds, primitives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::MeasurementLines;
    use crate::metrics::tests::FixedMeasurer;

    fn readouts(range_mode: bool) -> Readouts {
        MeasurementLines::new(range_mode).readouts(&WindowGeometry::new(0.0, 0.0, 401.0, 401.0))
    }

    #[test]
    fn test_rows_follow_range_mode() {
        assert_eq!(rows(&readouts(false)).len(), 4);

        let rows = rows(&readouts(true));
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[4], PanelRow::Separator);
        assert!(matches!(&rows[5], PanelRow::Value { key: "w:", value, .. } if value == "75px"));
    }

    #[test]
    fn test_panel_is_centered() {
        let geometry = WindowGeometry::new(0.0, 0.0, 401.0, 401.0);
        let mut measurer = FixedMeasurer::default();
        let (bounds, _) = layout(&readouts(false), &geometry, &mut measurer);

        // Keys "W:" at 15px: 2 * 6.5 * 1.25 = 16.25
        // Values "400px" at 15px: 5 * 6.5 * 1.25 = 40.625
        assert_eq!(bounds.width, 5.0 + 16.25 + 3.0 + 40.625 + 5.0);
        let row = (14.2f32 * 1.25) as f64;
        assert_eq!(bounds.height, 10.0 + 4.0 * row + 3.0 * 3.0);
        assert_eq!(bounds.x, ((401.0 - bounds.width) / 2.0).floor());
        assert_eq!(bounds.y, ((401.0 - bounds.height) / 2.0).floor());
    }

    #[test]
    fn test_panel_primitives() {
        let geometry = WindowGeometry::new(0.0, 0.0, 401.0, 401.0);
        let mut measurer = FixedMeasurer::default();
        let (bounds, primitives) = layout(&readouts(true), &geometry, &mut measurer);

        assert!(matches!(
            primitives.first(),
            Some(Primitive::RoundedRect { rect, .. }) if *rect == bounds
        ));

        let texts: Vec<&str> = primitives.iter().filter_map(Primitive::text).collect();
        assert_eq!(
            texts,
            [
                "W:", "400px", "H:", "400px", "X:", "100px", "Y:", "100px", "w:", "75px", "h:",
                "75px"
            ]
        );

        let separators = primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count();
        assert_eq!(separators, 1);

        // Every primitive stays inside the panel
        for primitive in &primitives {
            if let Primitive::Text { x, y, .. } = primitive {
                assert!(bounds.contains(Point::new(*x, *y)));
            }
        }
    }

    #[test]
    fn test_value_fonts() {
        let rows = rows(&readouts(true));
        let fonts: Vec<FontSpec> = rows
            .iter()
            .filter_map(|row| match row {
                PanelRow::Value { font, .. } => Some(*font),
                PanelRow::Separator => None,
            })
            .collect();
        assert!(!fonts[0].italic && !fonts[0].bold);
        assert!(fonts[2].italic);
        assert!(fonts[5].italic);
        assert!(style::KEY_FONT.bold);
    }
}
