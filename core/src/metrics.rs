//! Label metrics cache
//!
//! Tick labels are re-laid out on every resize frame, so the rendered size of
//! each label string is measured once and kept for the life of the process.
//! The label alphabet is tiny (short digit strings), so entries are never
//! evicted.

use hashbrown::HashMap;

/// Font used when measuring or drawing a piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Measured layout extent of a text run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Text measurement facility provided by the rendering layer.
///
/// Measurement is infallible: a renderer that cannot measure text must fail
/// when it is constructed, not here.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec) -> TextExtent;
}

/// Font used for tick labels
pub const MARKER_FONT: FontSpec = FontSpec::regular(12.0);

/// Integer pixel size of a rendered tick label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMetrics {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

/// Labels measured up front: single digits and round hundreds up to 2000
pub fn prewarm_labels() -> impl Iterator<Item = String> {
    (1..=9)
        .chain((100..=2000).step_by(100))
        .map(|n: u32| n.to_string())
}

/// Cache of tick label sizes keyed by label text
#[derive(Debug, Default)]
pub struct LabelMetricsCache {
    entries: HashMap<String, LabelMetrics>,
}

impl LabelMetricsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with the common tick labels
    pub fn prewarmed(measurer: &mut impl TextMeasurer) -> Self {
        let mut cache = Self::new();
        for label in prewarm_labels() {
            cache.measure(&label, measurer);
        }
        tracing::debug!(entries = cache.len(), "Label metrics cache prewarmed");
        cache
    }

    /// Get the metrics for `text`, measuring it on first use
    pub fn measure(&mut self, text: &str, measurer: &mut impl TextMeasurer) -> &LabelMetrics {
        if !self.entries.contains_key(text) {
            let extent = measurer.measure(text, &MARKER_FONT);
            let metrics = LabelMetrics {
                text: text.to_string(),
                width: extent.width.max(0.0).ceil() as u32,
                height: extent.height.max(0.0).ceil() as u32,
            };
            self.entries.insert(text.to_string(), metrics);
        }
        &self.entries[text]
    }

    /// Cached metrics without measuring
    pub fn get(&self, text: &str) -> Option<&LabelMetrics> {
        self.entries.get(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
