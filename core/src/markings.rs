//! Ruler tick mark generation
//!
//! Each ruler arm is regenerated in full whenever its length changes. Ticks
//! are laid out every [`TICK_GAP`] pixels, with a second, finer pass of short
//! stubs every 2 pixels between the labeled ticks.
//!
//! | offset            | tier     | stroke      | label (horizontal) | label (vertical) |
//! |-------------------|----------|-------------|--------------------|------------------|
//! | 0                 | baseline | gap..2*gap  | none               | none             |
//! | % 100             | major    | 0..25+gap   | offset             | offset           |
//! | % 10              | medium   | 0..10+gap   | (offset % 100)/10  | offset if % 50   |
//! | otherwise (% 5)   | minor    | gap..2*gap  | none               | none             |

use crate::geometry::Axis;
use crate::metrics::{LabelMetricsCache, TextMeasurer};

/// Spacing between regular ticks
pub const TICK_GAP: f64 = 5.0;

/// Spacing of the fine stub ticks
pub const FINE_STEP: usize = 2;

/// Distance between the far end of a tick and its label
pub const LABEL_OFFSET: f64 = 2.0;

/// Length of the axis a ruler arm covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    pub length: f64,
    pub tick_gap: f64,
}

impl AxisState {
    pub fn new(length: f64) -> Self {
        Self {
            length,
            tick_gap: TICK_GAP,
        }
    }
}

/// Visual tier of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTier {
    /// The tick at offset 0
    Baseline,
    /// Every 100px
    Major,
    /// Every 10px that is not a major tick
    Medium,
    /// Every remaining 5px step
    Minor,
}

/// A single tick on a ruler arm.
///
/// The stroke is perpendicular to the axis and runs from `inset` to `length`,
/// both measured from the ruler edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub position: f64,
    pub inset: f64,
    pub length: f64,
    pub tier: TickTier,
    pub label: Option<String>,
}

impl TickMark {
    pub fn is_major(&self) -> bool {
        self.tier == TickTier::Major
    }
}

/// Short stub from the fine-grained pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineTick {
    pub position: f64,
    pub length: f64,
}

/// Top-left corner of a tick label in window coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Complete output of one generation pass for a ruler arm
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarkings {
    pub axis: Axis,
    pub state: AxisState,
    pub ticks: Vec<TickMark>,
    pub fine_ticks: Vec<FineTick>,
    pub labels: Vec<LabelPlacement>,
}

impl AxisMarkings {
    /// Markings for a zero-length arm
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            state: AxisState::new(0.0),
            ticks: Vec::new(),
            fine_ticks: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Tick at exactly `position`, if one was emitted
    pub fn tick_at(&self, position: f64) -> Option<&TickMark> {
        self.ticks.iter().find(|t| t.position == position)
    }
}

/// Tier, stroke length, start inset and label of the tick at `offset`
fn classify(axis: Axis, offset: u64, gap: f64) -> (TickTier, f64, f64, Option<String>) {
    if offset != 0 && offset % 100 == 0 {
        (TickTier::Major, 25.0 + gap, 0.0, Some(offset.to_string()))
    } else if offset != 0 && offset % 10 == 0 {
        let label = match axis {
            Axis::Vertical => (offset % 50 == 0).then(|| offset.to_string()),
            // The horizontal arm labels every 10px with the tens digit only
            Axis::Horizontal => Some(((offset % 100) / 10).to_string()),
        };
        (TickTier::Medium, 10.0 + gap, 0.0, label)
    } else if offset == 0 {
        (TickTier::Baseline, 2.0 * gap, gap, None)
    } else {
        (TickTier::Minor, 2.0 * gap, gap, None)
    }
}

/// Generate all ticks, fine stubs and label placements for an arm of `length` px.
///
/// Offsets are emitted in increasing order and strictly below `length`.
pub fn generate(
    axis: Axis,
    length: f64,
    cache: &mut LabelMetricsCache,
    measurer: &mut impl TextMeasurer,
) -> AxisMarkings {
    let length = if length.is_finite() { length } else { 0.0 };
    let state = AxisState::new(length);
    let gap = state.tick_gap;

    let mut ticks = Vec::new();
    let mut labels = Vec::new();

    let mut offset: u64 = 0;
    while (offset as f64) < length {
        let (tier, tick_length, inset, label) = classify(axis, offset, gap);
        let position = offset as f64;

        if let Some(text) = &label {
            let metrics = cache.measure(text, measurer);
            let (x, y) = match axis {
                Axis::Horizontal => (
                    position - (metrics.width / 2) as f64,
                    tick_length + LABEL_OFFSET,
                ),
                Axis::Vertical => (
                    tick_length + LABEL_OFFSET,
                    position - (metrics.height / 2) as f64 + 1.0,
                ),
            };
            labels.push(LabelPlacement {
                text: text.clone(),
                x,
                y,
            });
        }

        ticks.push(TickMark {
            position,
            inset,
            length: tick_length,
            tier,
            label,
        });
        offset += gap as u64;
    }

    let fine_ticks = (0..)
        .step_by(FINE_STEP)
        .take_while(|&i: &u64| (i as f64) < length)
        .filter(|&i| i == 0 || i % 10 != 0)
        .map(|i| FineTick {
            position: i as f64,
            length: gap,
        })
        .collect();


    AxisMarkings {
        axis,
        state,
        ticks,
        fine_ticks,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::FixedMeasurer;

    fn run(axis: Axis, length: f64) -> AxisMarkings {
        let mut measurer = FixedMeasurer::default();
        let mut cache = LabelMetricsCache::prewarmed(&mut measurer);
        generate(axis, length, &mut cache, &mut measurer)
    }

    fn label_at(markings: &AxisMarkings, position: f64) -> Option<&str> {
        markings.tick_at(position).and_then(|t| t.label.as_deref())
    }

    #[test]
    fn test_no_tick_at_or_beyond_length() {
        for length in [0.0, 1.0, 5.0, 99.0, 100.0, 101.0, 250.0, 401.0, 1234.5] {
            for axis in Axis::ALL {
                let markings = run(axis, length);
                assert!(markings.ticks.iter().all(|t| t.position < length));
                assert!(markings.fine_ticks.iter().all(|t| t.position < length));
            }
        }
    }

    #[test]
    fn test_single_unlabeled_baseline() {
        for length in [1.0, 100.0, 401.0] {
            for axis in Axis::ALL {
                let markings = run(axis, length);
                let at_zero: Vec<_> = markings
                    .ticks
                    .iter()
                    .filter(|t| t.position == 0.0)
                    .collect();
                assert_eq!(at_zero.len(), 1);
                assert_eq!(at_zero[0].tier, TickTier::Baseline);
                assert!(at_zero[0].label.is_none());
                assert_eq!(at_zero[0].inset, TICK_GAP);
                assert_eq!(at_zero[0].length, 2.0 * TICK_GAP);
            }
        }
    }

    #[test]
    fn test_zero_length_is_empty() {
        let markings = run(Axis::Horizontal, 0.0);
        assert!(markings.ticks.is_empty());
        assert!(markings.fine_ticks.is_empty());
        assert!(markings.labels.is_empty());

        let markings = run(Axis::Vertical, f64::NAN);
        assert!(markings.ticks.is_empty());
    }

    #[test]
    fn test_majors_are_long_and_labeled() {
        for axis in Axis::ALL {
            let markings = run(axis, 2500.0);
            for tick in markings.ticks.iter().filter(|t| t.position > 0.0) {
                if tick.position as u64 % 100 == 0 {
                    assert!(tick.is_major());
                    assert_eq!(tick.length, 25.0 + TICK_GAP);
                    assert_eq!(tick.inset, 0.0);
                    let expected = (tick.position as u64).to_string();
                    assert_eq!(tick.label.as_deref(), Some(expected.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_vertical_axis_250() {
        let markings = run(Axis::Vertical, 250.0);
        let positions: Vec<f64> = markings.ticks.iter().map(|t| t.position).collect();
        let expected: Vec<f64> = (0..250).step_by(5).map(|i| i as f64).collect();
        assert_eq!(positions, expected);

        let labeled: Vec<(f64, &str)> = markings
            .ticks
            .iter()
            .filter_map(|t| t.label.as_deref().map(|l| (t.position, l)))
            .collect();
        assert_eq!(
            labeled,
            vec![(50.0, "50"), (100.0, "100"), (150.0, "150"), (200.0, "200")]
        );

        assert_eq!(markings.tick_at(50.0).map(|t| t.tier), Some(TickTier::Medium));
        assert_eq!(markings.tick_at(50.0).map(|t| t.length), Some(15.0));
        assert_eq!(markings.tick_at(30.0).map(|t| t.tier), Some(TickTier::Medium));
        assert_eq!(label_at(&markings, 30.0), None);
        assert_eq!(markings.tick_at(45.0).map(|t| t.tier), Some(TickTier::Minor));
        assert_eq!(markings.tick_at(245.0).map(|t| t.tier), Some(TickTier::Minor));

        let majors = markings.ticks.iter().filter(|t| t.is_major()).count();
        let mediums = markings
            .ticks
            .iter()
            .filter(|t| t.tier == TickTier::Medium)
            .count();
        let minors = markings
            .ticks
            .iter()
            .filter(|t| t.tier == TickTier::Minor)
            .count();
        assert_eq!((majors, mediums, minors), (2, 22, 25));
    }

    #[test]
    fn test_horizontal_axis_250() {
        let markings = run(Axis::Horizontal, 250.0);
        assert_eq!(label_at(&markings, 0.0), None);
        assert_eq!(label_at(&markings, 10.0), Some("1"));
        assert_eq!(label_at(&markings, 50.0), Some("5"));
        assert_eq!(label_at(&markings, 90.0), Some("9"));
        assert_eq!(label_at(&markings, 100.0), Some("100"));
        assert_eq!(label_at(&markings, 150.0), Some("5"));
        assert_eq!(label_at(&markings, 200.0), Some("200"));
        assert_eq!(label_at(&markings, 240.0), Some("4"));
        assert_eq!(label_at(&markings, 245.0), None);
        // 2 majors + 22 mediums
        assert_eq!(markings.labels.len(), 24);
    }

    #[test]
    fn test_fine_ticks_skip_tens() {
        let markings = run(Axis::Horizontal, 25.0);
        let positions: Vec<f64> = markings.fine_ticks.iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 12.0, 14.0, 16.0, 18.0, 22.0, 24.0]
        );
        assert!(markings.fine_ticks.iter().all(|t| t.length == TICK_GAP));
    }

    #[test]
    fn test_label_placement() {
        let horizontal = run(Axis::Horizontal, 201.0);
        let label = horizontal
            .labels
            .iter()
            .find(|l| l.text == "100")
            .cloned()
            .expect("label at 100");
        // width ceil(6.5 * 3) = 20
        assert_eq!(label.x, 90.0);
        assert_eq!(label.y, 32.0);

        let digit = horizontal
            .labels
            .iter()
            .find(|l| l.text == "2")
            .cloned()
            .expect("label at 20");
        // width ceil(6.5) = 7, halved in whole pixels
        assert_eq!(digit.x, 17.0);
        assert_eq!(digit.y, 17.0);

        let vertical = run(Axis::Vertical, 201.0);
        let label = vertical
            .labels
            .iter()
            .find(|l| l.text == "200")
            .cloned()
            .expect("label at 200");
        // height ceil(14.2) = 15, halved in whole pixels
        assert_eq!(label.x, 32.0);
        assert_eq!(label.y, 194.0);
    }
}
