//! Ruler window: native window + renderer + scene
//!
//! Drives the scene from platform events and pushes the resulting geometry,
//! cursor and frames back to the window.

use std::thread;
use std::time::{Duration, Instant};

use ruler_core::{RulerScene, SceneResponse, WindowGeometry};

use crate::error::OverlayError;
use crate::platform::{NativeOverlay, OverlayConfig, OverlayPlatform, PlatformEvent};
use crate::renderer::Renderer;

/// Minimum time between two rendered frames (~60 FPS)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Sleep between event polls when nothing is pending
const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct RulerOverlay<P: OverlayPlatform = NativeOverlay> {
    platform: P,
    renderer: Renderer,
    scene: RulerScene,
    dirty: bool,
    last_frame: Option<Instant>,
}

impl RulerOverlay<NativeOverlay> {
    /// Open the ruler window for the current platform
    pub fn new(config: OverlayConfig, range_mode: bool) -> Result<Self, OverlayError> {
        let renderer = Renderer::new()?;
        let platform = NativeOverlay::new(config)?;
        Ok(Self::with_platform(platform, renderer, range_mode))
    }
}

impl<P: OverlayPlatform> RulerOverlay<P> {
    pub fn with_platform(platform: P, mut renderer: Renderer, range_mode: bool) -> Self {
        let geometry = WindowGeometry::new(
            platform.x() as f64,
            platform.y() as f64,
            platform.width() as f64,
            platform.height() as f64,
        );
        let scene = RulerScene::new(geometry, range_mode, &mut renderer);
        let mut overlay = Self {
            platform,
            renderer,
            scene,
            dirty: true,
            last_frame: None,
        };
        // The initial size may have been floored
        overlay.apply_geometry();
        overlay
    }

    pub fn scene(&self) -> &RulerScene {
        &self.scene
    }

    /// Run until the ruler is closed
    pub fn run(&mut self) {
        tracing::info!("Ruler running");
        loop {
            let events = self.platform.poll_events();
            if !self.dispatch(events) {
                break;
            }

            if self.dirty && self.frame_due() {
                self.render();
            }
            thread::sleep(POLL_INTERVAL);
        }
        tracing::info!("Ruler closed");
    }

    /// Feed platform events to the scene. Returns false once the ruler should close.
    fn dispatch(&mut self, events: Vec<PlatformEvent>) -> bool {
        for event in events {
            match event {
                PlatformEvent::Input(input) => {
                    let response = self.scene.handle(input, &mut self.renderer);
                    if !self.apply(response) {
                        return false;
                    }
                }
                PlatformEvent::Exposed => self.dirty = true,
                PlatformEvent::CloseRequested => return false,
            }
        }
        true
    }

    fn apply(&mut self, response: SceneResponse) -> bool {
        if response.close_requested {
            return false;
        }
        if response.geometry_changed {
            self.apply_geometry();
        }
        if let Some(cursor) = response.cursor {
            self.platform.set_cursor(cursor);
        }
        if response.redraw {
            self.dirty = true;
        }
        true
    }

    fn apply_geometry(&mut self) {
        let geometry = *self.scene.geometry();
        let (width, height) = (geometry.width as u32, geometry.height as u32);
        let resized = width != self.platform.width() || height != self.platform.height();

        self.platform
            .set_position(geometry.x.round() as i32, geometry.y.round() as i32);
        if resized {
            self.platform.set_size(width, height);
            // Buffer contents are lost when it is recreated
            self.dirty = true;
        }
    }

    fn frame_due(&self) -> bool {
        self.last_frame
            .is_none_or(|last| last.elapsed() >= FRAME_INTERVAL)
    }

    fn render(&mut self) {
        let primitives = self.scene.display_list(&mut self.renderer);
        let width = self.platform.width();
        let height = self.platform.height();
        let Some(buffer) = self.platform.pixel_buffer() else {
            return;
        };

        self.renderer.draw(buffer, width, height, &primitives);
        self.platform.commit();
        self.dirty = false;
        self.last_frame = Some(Instant::now());
    }
}
