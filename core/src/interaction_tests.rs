//! Tests for zone classification and frameless move/resize

use super::*;

fn geometry() -> WindowGeometry {
    WindowGeometry::new(100.0, 100.0, 200.0, 150.0)
}

/// Press at a window-local point
fn press_local(
    interaction: &mut WindowInteraction,
    geometry: &WindowGeometry,
    x: f64,
    y: f64,
) -> CursorIcon {
    let local = Point::new(x, y);
    let screen = Point::new(geometry.x + x, geometry.y + y);
    interaction.pointer_pressed(PointerEvent::new(local, screen), geometry)
}

/// Drag to a screen point, with local coordinates relative to the current geometry
fn drag_screen(
    interaction: &mut WindowInteraction,
    geometry: &mut WindowGeometry,
    x: f64,
    y: f64,
) -> bool {
    let event = PointerEvent::at_screen(Point::new(x, y), geometry);
    interaction.pointer_dragged(event, geometry)
}

#[test]
fn test_classify_zones() {
    use ResizeDirection::*;
    let cases = [
        ((0.0, 0.0), Zone::Border(NW)),
        ((5.9, 5.9), Zone::Border(NW)),
        ((3.0, 75.0), Zone::Border(W)),
        ((5.9, 144.1), Zone::Border(SW)),
        ((197.0, 3.0), Zone::Border(NE)),
        ((199.0, 149.0), Zone::Border(SE)),
        ((100.0, 0.0), Zone::Border(N)),
        ((100.0, 149.0), Zone::Border(S)),
        ((194.5, 75.0), Zone::Border(E)),
        // Border comparisons are strict
        ((194.0, 75.0), Zone::Interior),
        ((6.0, 6.0), Zone::Interior),
        ((100.0, 144.0), Zone::Interior),
        ((100.0, 75.0), Zone::Interior),
    ];
    for ((x, y), expected) in cases {
        assert_eq!(
            classify(Point::new(x, y), 200.0, 150.0),
            expected,
            "point ({x}, {y})"
        );
    }
}

#[test]
fn test_corner_wins_in_tiny_window() {
    // In a 10x10 window every point is within BORDER of two edges
    assert_eq!(
        classify(Point::new(5.0, 5.0), 10.0, 10.0),
        Zone::Border(ResizeDirection::NW)
    );
    assert_eq!(
        classify(Point::new(8.0, 2.0), 10.0, 10.0),
        Zone::Border(ResizeDirection::NE)
    );
    assert_eq!(
        classify(Point::new(8.0, 8.0), 10.0, 10.0),
        Zone::Border(ResizeDirection::SE)
    );
}

#[test]
fn test_hover_cursor() {
    let mut interaction = WindowInteraction::new();
    let geometry = geometry();
    let event = PointerEvent::at_screen(Point::new(299.0, 175.0), &geometry);
    assert_eq!(
        interaction.pointer_moved(event, &geometry),
        CursorIcon::Resize(ResizeDirection::E)
    );
    assert_eq!(
        interaction.hover(),
        Some(Zone::Border(ResizeDirection::E))
    );

    let event = PointerEvent::at_screen(Point::new(200.0, 175.0), &geometry);
    assert_eq!(
        interaction.pointer_moved(event, &geometry),
        CursorIcon::Default
    );
    assert!(!interaction.is_active());
}

#[test]
fn test_move_tracks_pointer() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();

    assert_eq!(
        press_local(&mut interaction, &geometry, 50.0, 60.0),
        CursorIcon::Move
    );
    assert_eq!(interaction.mode(), InteractionMode::Moving);

    assert!(drag_screen(&mut interaction, &mut geometry, 400.0, 300.0));
    assert_eq!((geometry.x, geometry.y), (350.0, 240.0));
    assert_eq!((geometry.width, geometry.height), (200.0, 150.0));

    assert!(drag_screen(&mut interaction, &mut geometry, 60.0, 70.0));
    assert_eq!((geometry.x, geometry.y), (10.0, 10.0));

    assert_eq!(interaction.pointer_released(), CursorIcon::Default);
    assert_eq!(interaction.mode(), InteractionMode::Idle);
}

#[test]
fn test_east_resize_past_edge() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();

    press_local(&mut interaction, &geometry, 197.0, 75.0);
    assert_eq!(
        interaction.mode(),
        InteractionMode::Resizing(ResizeDirection::E)
    );

    assert!(drag_screen(&mut interaction, &mut geometry, 347.0, 175.0));
    assert_eq!(geometry.width, 250.0);
    assert_eq!((geometry.x, geometry.y), (100.0, 100.0));
    assert_eq!(geometry.height, 150.0);

    // Vertical pointer motion is ignored for an E resize
    assert!(drag_screen(&mut interaction, &mut geometry, 357.0, 400.0));
    assert_eq!(geometry.width, 260.0);
    assert_eq!(geometry.height, 150.0);

    // Releasing over the border keeps the resize cursor until the next move
    assert_eq!(
        interaction.pointer_released(),
        CursorIcon::Resize(ResizeDirection::E)
    );
}

#[test]
fn test_northwest_resize_keeps_opposite_corner() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();
    let corner = geometry.far_corner();

    press_local(&mut interaction, &geometry, 2.0, 2.0);
    assert_eq!(
        interaction.mode(),
        InteractionMode::Resizing(ResizeDirection::NW)
    );

    drag_screen(&mut interaction, &mut geometry, 80.0, 70.0);
    assert_eq!(geometry, WindowGeometry::new(80.0, 70.0, 220.0, 180.0));
    assert_eq!(geometry.far_corner(), corner);

    drag_screen(&mut interaction, &mut geometry, 250.0, 220.0);
    assert_eq!(geometry, WindowGeometry::new(250.0, 220.0, 50.0, 30.0));
    assert_eq!(geometry.far_corner(), corner);
}

#[test]
fn test_south_resize_floor_and_recovery() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();

    press_local(&mut interaction, &geometry, 100.0, 148.0);
    assert_eq!(
        interaction.mode(),
        InteractionMode::Resizing(ResizeDirection::S)
    );

    // local y 10 -> 10 + 2 = 12, floored
    drag_screen(&mut interaction, &mut geometry, 200.0, 110.0);
    assert_eq!(geometry.height, MIN_DIMENSION);

    // At the floor and still above the old edge: no change
    assert!(!drag_screen(&mut interaction, &mut geometry, 200.0, 120.0));
    assert_eq!(geometry.height, MIN_DIMENSION);

    // Past the edge again: 40 + 2
    assert!(drag_screen(&mut interaction, &mut geometry, 200.0, 140.0));
    assert_eq!(geometry.height, 42.0);
    assert_eq!(geometry.y, 100.0);
}

#[test]
fn test_north_resize_at_floor_needs_pointer_above_window() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = WindowGeometry::new(100.0, 100.0, 200.0, MIN_DIMENSION);

    press_local(&mut interaction, &geometry, 100.0, 2.0);
    assert_eq!(
        interaction.mode(),
        InteractionMode::Resizing(ResizeDirection::N)
    );

    // Inside the window: held
    assert!(!drag_screen(&mut interaction, &mut geometry, 200.0, 105.0));
    assert_eq!((geometry.y, geometry.height), (100.0, MIN_DIMENSION));

    // Above the window: grows upward, bottom edge fixed
    assert!(drag_screen(&mut interaction, &mut geometry, 200.0, 90.0));
    assert_eq!((geometry.y, geometry.height), (90.0, 40.0));
    assert_eq!(geometry.width, 200.0);
}

#[test]
fn test_west_resize_clamped_still_tracks_position() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();

    press_local(&mut interaction, &geometry, 1.0, 75.0);
    drag_screen(&mut interaction, &mut geometry, 290.0, 175.0);
    assert_eq!(geometry.width, MIN_DIMENSION);
    assert_eq!(geometry.x, 290.0);
    assert_eq!(geometry.height, 150.0);
}

#[test]
fn test_dimensions_never_below_minimum() {
    use ResizeDirection::*;

    // Deterministic pseudo-random walk
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % 1000) as f64 - 500.0
    };

    let presses = [
        (N, 100.0, 1.0),
        (S, 100.0, 149.0),
        (E, 199.0, 75.0),
        (W, 1.0, 75.0),
        (NE, 199.0, 1.0),
        (NW, 1.0, 1.0),
        (SE, 199.0, 149.0),
        (SW, 1.0, 149.0),
    ];
    for (direction, x, y) in presses {
        let mut interaction = WindowInteraction::new();
        let mut geometry = geometry();
        press_local(&mut interaction, &geometry, x, y);
        assert_eq!(interaction.mode(), InteractionMode::Resizing(direction));

        for _ in 0..200 {
            let (dx, dy) = (next(), next());
            drag_screen(&mut interaction, &mut geometry, 200.0 + dx, 175.0 + dy);
            assert!(geometry.width >= MIN_DIMENSION, "{direction:?}");
            assert!(geometry.height >= MIN_DIMENSION, "{direction:?}");
        }
        interaction.pointer_released();
    }
}

#[test]
fn test_idle_drag_is_ignored() {
    let mut interaction = WindowInteraction::new();
    let mut geometry = geometry();
    assert!(!drag_screen(&mut interaction, &mut geometry, 0.0, 0.0));
    assert_eq!(geometry, self::geometry());
}
