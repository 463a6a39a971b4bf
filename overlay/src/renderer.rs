//! Software renderer using tiny-skia and cosmic-text
//!
//! Paints a [`Primitive`] display list into an RGBA pixel buffer on the CPU.
//! The same shaping cache backs text measurement, so the renderer doubles as
//! the scene's [`TextMeasurer`].
use std::collections::HashMap;

use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, Family, FontSystem, LayoutGlyph, Metrics, Shaping, Style,
    SwashCache, Weight,
};
use ruler_core::{FontSpec, Primitive, Rgba, StrokeStyle, TextExtent, TextMeasurer};
use tiny_skia::{
    Color, FillRule, LineCap, Paint, PathBuilder, PixmapMut, Rect, Stroke, StrokeDash, Transform,
};

use crate::error::RendererError;
use crate::utils::{color_from_rgba, cosmic_color};

/// Maximum entries in the text shaping cache (LRU eviction when exceeded)
const TEXT_CACHE_MAX_ENTRIES: usize = 512;

const FONT_FAMILY: &str = "Noto Sans";

/// Cached result of text shaping
struct CachedText {
    /// Pre-shaped glyphs paired with the baseline of their layout run
    glyphs: Vec<(LayoutGlyph, f32)>,
    width: f32,
    height: f32,
    /// LRU tracking: incremented on each access
    last_used: u64,
}

/// Key for text cache: text, size in tenths, bold, italic
type TextCacheKey = (String, u32, bool, bool);

fn size_key(font: &FontSpec) -> u32 {
    (font.size * 10.0).round() as u32
}

/// A software renderer for the ruler face
pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Cache of shaped text to avoid re-shaping every frame
    text_cache: HashMap<TextCacheKey, CachedText>,
    /// Counter for LRU tracking
    cache_access_counter: u64,
}

impl Renderer {
    /// Create a new renderer. Fails when no system fonts can be found, since
    /// text measurement has no fallback.
    pub fn new() -> Result<Self, RendererError> {
        let font_system = FontSystem::new();
        let faces = font_system.db().faces().count();
        if faces == 0 {
            return Err(RendererError::NoFonts);
        }
        tracing::debug!(faces, "Loaded system fonts");

        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
            text_cache: HashMap::with_capacity(64),
            cache_access_counter: 0,
        })
    }

    /// Evict least recently used entries if cache is too large
    fn evict_lru_if_needed(&mut self) {
        if self.text_cache.len() <= TEXT_CACHE_MAX_ENTRIES {
            return;
        }

        // Remove ~25% of the cache, oldest first
        let target_size = TEXT_CACHE_MAX_ENTRIES * 3 / 4;
        let mut entries: Vec<_> = self
            .text_cache
            .iter()
            .map(|(k, v)| (k.clone(), v.last_used))
            .collect();
        entries.sort_by_key(|(_, last_used)| *last_used);

        for (key, _) in entries
            .into_iter()
            .take(self.text_cache.len() - target_size)
        {
            self.text_cache.remove(&key);
        }
    }

    /// Find cached entry by borrowed key (avoids String allocation on hit)
    fn find_cached(&mut self, text: &str, font: &FontSpec) -> Option<&mut CachedText> {
        let size = size_key(font);
        self.text_cache
            .iter_mut()
            .find(|(k, _)| k.0 == text && k.1 == size && k.2 == font.bold && k.3 == font.italic)
            .map(|(_, v)| v)
    }

    /// Ensure text is cached, shaping if needed. Returns (width, height).
    fn ensure_cached(&mut self, text: &str, font: &FontSpec) -> (f32, f32) {
        self.cache_access_counter += 1;
        let current_access = self.cache_access_counter;

        if let Some(cached) = self.find_cached(text, font) {
            cached.last_used = current_access;
            return (cached.width, cached.height);
        }

        let metrics = Metrics::new(font.size, font.size * 1.2);
        let mut text_buffer = Buffer::new(&mut self.font_system, metrics);

        let attrs = Attrs::new()
            .family(Family::Name(FONT_FAMILY))
            .weight(if font.bold { Weight::BOLD } else { Weight::NORMAL })
            .style(if font.italic { Style::Italic } else { Style::Normal });
        text_buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        text_buffer.shape_until_scroll(&mut self.font_system, false);

        let mut glyphs = Vec::new();
        let mut width = 0.0f32;
        let mut height = 0.0f32;

        for run in text_buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;

            for glyph in run.glyphs.iter() {
                glyphs.push((glyph.clone(), run.line_y));
            }
        }

        self.text_cache.insert(
            (text.to_string(), size_key(font), font.bold, font.italic),
            CachedText {
                glyphs,
                width,
                height,
                last_used: current_access,
            },
        );
        self.evict_lru_if_needed();

        (width, height)
    }

    /// Get cached glyphs for drawing. Must call ensure_cached first.
    fn get_cached_glyphs(&mut self, text: &str, font: &FontSpec) -> Vec<(LayoutGlyph, f32)> {
        self.find_cached(text, font)
            .map(|c| c.glyphs.clone())
            .unwrap_or_default()
    }

    /// Clear the buffer and paint `primitives` back to front
    pub fn draw(&mut self, buffer: &mut [u8], width: u32, height: u32, primitives: &[Primitive]) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            tracing::warn!(width, height, "Pixel buffer does not match window size");
            return;
        };
        pixmap.fill(Color::TRANSPARENT);

        for primitive in primitives {
            match primitive {
                Primitive::FillRect { rect, color } => fill_rect(&mut pixmap, rect, *color),
                Primitive::RoundedRect {
                    rect,
                    radius,
                    color,
                } => fill_rounded_rect(&mut pixmap, rect, *radius, *color),
                Primitive::Line {
                    from,
                    to,
                    width,
                    color,
                    style,
                } => {
                    let mut pb = PathBuilder::new();
                    pb.move_to(from.x as f32, from.y as f32);
                    pb.line_to(to.x as f32, to.y as f32);
                    if let Some(path) = pb.finish() {
                        let paint = paint(*color);
                        let stroke = stroke(*width, *style);
                        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                    }
                }
                Primitive::Text {
                    text,
                    x,
                    y,
                    font,
                    color,
                } => self.draw_text(&mut pixmap, text, *x as f32, *y as f32, font, *color),
            }
        }
    }

    /// Draw text with its layout box's top-left corner at (x, y)
    fn draw_text(
        &mut self,
        pixmap: &mut PixmapMut,
        text: &str,
        x: f32,
        y: f32,
        font: &FontSpec,
        color: Rgba,
    ) {
        let _ = self.ensure_cached(text, font);
        // Clone needed: swash_cache borrows self mutably while drawing
        let glyphs = self.get_cached_glyphs(text, font);
        let text_color = cosmic_color(color);

        for (glyph, baseline) in &glyphs {
            let physical_glyph = glyph.physical((x, y + baseline), 1.0);

            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical_glyph.cache_key)
            {
                let glyph_x = physical_glyph.x + image.placement.left;
                let glyph_y = physical_glyph.y - image.placement.top;

                draw_glyph_to_pixmap(
                    pixmap,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    glyph_x,
                    glyph_y,
                    text_color,
                );
            }
        }
    }
}

impl TextMeasurer for Renderer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> TextExtent {
        let (width, height) = self.ensure_cached(text, font);
        TextExtent { width, height }
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color_from_rgba(color));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32, style: StrokeStyle) -> Stroke {
    let dash = match style {
        StrokeStyle::Solid => None,
        StrokeStyle::Dashed { dash, gap } => StrokeDash::new(vec![dash, gap], 0.0),
    };
    Stroke {
        width,
        line_cap: LineCap::Butt,
        dash,
        ..Default::default()
    }
}

fn fill_rect(pixmap: &mut PixmapMut, rect: &ruler_core::Rect, color: Rgba) {
    let Some(r) = Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    ) else {
        return;
    };
    pixmap.fill_rect(r, &paint(color), Transform::identity(), None);
}

fn fill_rounded_rect(pixmap: &mut PixmapMut, rect: &ruler_core::Rect, radius: f32, color: Rgba) {
    let Some(path) = create_rounded_rect_path(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
        radius,
    ) else {
        return;
    };
    pixmap.fill_path(
        &path,
        &paint(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

/// Create a rounded rectangle path
fn create_rounded_rect_path(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<tiny_skia::Path> {
    let r = r.min(w / 2.0).min(h / 2.0);

    let mut pb = PathBuilder::new();

    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);

    pb.close();
    pb.finish()
}

/// Draw a glyph coverage mask onto a premultiplied pixmap
fn draw_glyph_to_pixmap(
    pixmap: &mut PixmapMut,
    glyph_data: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: CosmicColor,
) {
    let pixmap_width = pixmap.width() as i32;
    let pixmap_height = pixmap.height() as i32;
    let data = pixmap.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= pixmap_height {
            continue;
        }

        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= pixmap_width {
                continue;
            }

            let glyph_idx = (gy as u32 * glyph_width + gx as u32) as usize;
            let Some(&alpha) = glyph_data.get(glyph_idx) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }

            let pixel_idx = ((py as u32 * pixmap_width as u32 + px as u32) * 4) as usize;
            if pixel_idx + 3 >= data.len() {
                continue;
            }

            let src_a = (alpha as u32 * color.a() as u32) / 255;
            let inv_a = 255 - src_a;

            data[pixel_idx] =
                ((color.r() as u32 * src_a + data[pixel_idx] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 1] =
                ((color.g() as u32 * src_a + data[pixel_idx + 1] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 2] =
                ((color.b() as u32 * src_a + data[pixel_idx + 2] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 3] = (src_a + (data[pixel_idx + 3] as u32 * inv_a) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruler_core::Point;

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]
    }

    #[test]
    fn test_dashed_stroke_has_dash_pattern() {
        assert!(stroke(1.0, StrokeStyle::Solid).dash.is_none());
        let dashed = stroke(
            1.0,
            StrokeStyle::Dashed {
                dash: 10.0,
                gap: 5.0,
            },
        );
        assert!(dashed.dash.is_some());
    }

    #[test]
    fn test_rounded_rect_path_clamps_radius() {
        assert!(create_rounded_rect_path(0.0, 0.0, 4.0, 4.0, 10.0).is_some());
        assert!(create_rounded_rect_path(0.0, 0.0, 40.0, 20.0, 5.0).is_some());
    }

    #[test]
    fn test_fill_and_line_rasterize() {
        let (w, h) = (20, 20);
        let mut buffer = vec![0u8; (w * h * 4) as usize];
        let mut pixmap = PixmapMut::from_bytes(&mut buffer, w, h).unwrap();

        fill_rect(
            &mut pixmap,
            &ruler_core::Rect::new(0.0, 0.0, 10.0, 10.0),
            [0, 0, 255, 255],
        );
        let mut pb = PathBuilder::new();
        pb.move_to(15.5, 0.0);
        pb.line_to(15.5, 20.0);
        let path = pb.finish().unwrap();
        pixmap.stroke_path(
            &path,
            &paint([255, 0, 0, 255]),
            &stroke(1.0, StrokeStyle::Solid),
            Transform::identity(),
            None,
        );

        assert_eq!(pixel(&buffer, w, 5, 5), [0, 0, 255, 255]);
        assert_eq!(pixel(&buffer, w, 15, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, w, 12, 15), [0, 0, 0, 0]);
    }

    #[test]
    fn test_glyph_blend_is_clipped() {
        let (w, h) = (4, 4);
        let mut buffer = vec![0u8; (w * h * 4) as usize];
        let mut pixmap = PixmapMut::from_bytes(&mut buffer, w, h).unwrap();
        let mask = [255u8; 9];
        // Partially outside the pixmap on the top-left
        draw_glyph_to_pixmap(
            &mut pixmap,
            &mask,
            3,
            3,
            -1,
            -1,
            CosmicColor::rgba(0, 0, 0, 255),
        );
        assert_eq!(pixel(&buffer, w, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&buffer, w, 1, 1), [0, 0, 0, 255]);
        assert_eq!(pixel(&buffer, w, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_with_system_fonts() {
        // Hosts without fonts cannot build a renderer at all
        let Ok(mut renderer) = Renderer::new() else {
            return;
        };
        let font = FontSpec::regular(12.0);
        let extent = renderer.measure("100", &font);
        assert!(extent.width > 0.0);
        assert!(extent.height > 0.0);
        assert_eq!(renderer.measure("100", &font), extent);

        let (w, h) = (30, 30);
        let mut buffer = vec![0u8; (w * h * 4) as usize];
        renderer.draw(
            &mut buffer,
            w,
            h,
            &[
                Primitive::solid_line(Point::new(0.0, 0.5), Point::new(30.0, 0.5), 1.0, [0, 0, 0, 255]),
                Primitive::Text {
                    text: "100".to_string(),
                    x: 2.0,
                    y: 5.0,
                    font,
                    color: [0, 0, 0, 255],
                },
            ],
        );
        assert_eq!(pixel(&buffer, w, 10, 0), [0, 0, 0, 255]);
        assert!(buffer.chunks_exact(4).skip(w as usize).any(|p| p[3] > 0));
    }
}
