pub mod display;
pub mod geometry;
pub mod interaction;
pub mod lines;
pub mod markings;
pub mod metrics;
pub mod panel;
pub mod scene;
pub mod style;

// Re-exports for convenience
pub use display::{Primitive, Rect, StrokeStyle};
pub use geometry::{Axis, MIN_DIMENSION, Point, PointerEvent, WindowGeometry};
pub use interaction::{CursorIcon, InteractionMode, ResizeDirection, WindowInteraction, Zone};
pub use lines::{LineDrag, LineEvent, LineId, LineRole, MeasurementLine, MeasurementLines, Readouts};
pub use markings::{AxisMarkings, AxisState, FineTick, LabelPlacement, TickMark, TickTier};
pub use metrics::{FontSpec, LabelMetrics, LabelMetricsCache, TextExtent, TextMeasurer};
pub use scene::{InputEvent, Key, RulerScene, SceneResponse};
pub use style::Rgba;
