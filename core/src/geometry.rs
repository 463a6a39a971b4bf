//! Basic geometry shared by the ruler components

/// Minimum window width and height in pixels
pub const MIN_DIMENSION: f64 = 30.0;

/// A ruler arm.
///
/// The horizontal arm runs along the top edge of the window (tick positions
/// are x coordinates), the vertical arm along the left edge (positions are y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Coordinate of `point` along this axis
    #[inline]
    pub fn along(self, point: Point) -> f64 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }
}

/// A point in either window-local or screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position and size of the overlay window in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowGeometry {
    /// Create a geometry, flooring the size at [`MIN_DIMENSION`]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(MIN_DIMENSION),
            height: height.max(MIN_DIMENSION),
        }
    }

    /// Extent of the window along `axis`
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Bottom-right corner in screen coordinates
    pub fn far_corner(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Convert a screen point to window-local coordinates
    pub fn to_local(&self, screen: Point) -> Point {
        Point::new(screen.x - self.x, screen.y - self.y)
    }
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::new(100.0, 100.0, 401.0, 401.0)
    }
}

/// Pointer sample delivered by the platform.
///
/// `local` is relative to the window's top-left corner at the time the event
/// was generated, `screen` is the global position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub local: Point,
    pub screen: Point,
}

impl PointerEvent {
    pub const fn new(local: Point, screen: Point) -> Self {
        Self { local, screen }
    }

    /// Build an event from a screen position and the window it lands on
    pub fn at_screen(screen: Point, geometry: &WindowGeometry) -> Self {
        Self {
            local: geometry.to_local(screen),
            screen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_floors_size() {
        let geometry = WindowGeometry::new(0.0, 0.0, 10.0, 500.0);
        assert_eq!(geometry.width, MIN_DIMENSION);
        assert_eq!(geometry.height, 500.0);
    }

    #[test]
    fn test_pointer_at_screen() {
        let geometry = WindowGeometry::new(50.0, 60.0, 200.0, 200.0);
        let event = PointerEvent::at_screen(Point::new(70.0, 100.0), &geometry);
        assert_eq!(event.local, Point::new(20.0, 40.0));
        assert_eq!(geometry.far_corner(), Point::new(250.0, 260.0));
    }
}
