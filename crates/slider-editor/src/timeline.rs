//! Timeline interactions: dragging and resizing animation blocks, playhead
//! scrubbing, and the geometry the timeline view draws.
//!
//! A block spans `[delay, delay + duration]` of its slide. Grabbing the body
//! moves it, grabbing an edge resizes it:
//!
//! | Grab | Changes | Bounds |
//! |------|---------|--------|
//! | Body | `delay` | `0 ..= slide - duration` |
//! | Left edge | `delay`, `duration` (end fixed) | `0 ..= end - min` |
//! | Right edge | `duration` | `min ..= slide - delay` |
//!
//! The moved value is snapped to the grid and kept inside its bounds; when
//! the nearest grid line falls outside, the closest grid line inside wins.

use serde::Serialize;
use slider_core::{FALLBACK_TIMELINE_MS, LayerAnimation, LayerId, MIN_ANIMATION_MS, Slide};

/// Part of a block the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Grab {
    Body,
    LeftEdge,
    RightEdge,
}

/// A block's interval on the slide timeline (ms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timing {
    pub delay: f64,
    pub duration: f64,
}

impl Timing {
    pub fn new(delay: f64, duration: f64) -> Self {
        Self { delay, duration }
    }

    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

impl From<&LayerAnimation> for Timing {
    fn from(animation: &LayerAnimation) -> Self {
        Timing::new(animation.delay, animation.duration)
    }
}

/// Snapping grid and minimum duration for gesture edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineRules {
    pub grid_ms: f64,
    pub min_duration: f64,
}

impl Default for TimelineRules {
    fn default() -> Self {
        Self {
            grid_ms: 100.0,
            min_duration: MIN_ANIMATION_MS,
        }
    }
}

// ─── Gesture math ────────────────────────────────────────────────────────

/// Round `t` to the nearest multiple of `grid`.
pub fn snap_to_grid(t: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return t;
    }
    (t / grid).round() * grid
}

/// Horizontal pointer travel converted to timeline ms.
pub fn pixels_to_ms(dx: f64, container_width: f64, slide_duration: f64) -> f64 {
    if container_width <= 0.0 {
        return 0.0;
    }
    dx / container_width * slide_duration
}

/// Snap `t` to the grid while staying inside `[lo, hi]`.
fn snap_between(t: f64, lo: f64, hi: f64, grid: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    let t = t.clamp(lo, hi);
    if grid <= 0.0 {
        return t;
    }
    let snapped = snap_to_grid(t, grid);
    if snapped > hi {
        let below = (hi / grid).floor() * grid;
        if below >= lo { below } else { hi }
    } else if snapped < lo {
        let above = (lo / grid).ceil() * grid;
        if above <= hi { above } else { lo }
    } else {
        snapped
    }
}

pub fn move_block(original: Timing, dt: f64, slide_duration: f64, rules: TimelineRules) -> Timing {
    let max_delay = slide_duration - original.duration;
    Timing {
        delay: snap_between(original.delay + dt, 0.0, max_delay, rules.grid_ms),
        duration: original.duration,
    }
}

/// Move the start edge, keeping the end edge where it was.
pub fn resize_left(original: Timing, dt: f64, rules: TimelineRules) -> Timing {
    let end = original.end();
    let delay = snap_between(
        original.delay + dt,
        0.0,
        end - rules.min_duration,
        rules.grid_ms,
    );
    Timing {
        delay,
        duration: (end - delay).max(rules.min_duration),
    }
}

pub fn resize_right(original: Timing, dt: f64, slide_duration: f64, rules: TimelineRules) -> Timing {
    Timing {
        delay: original.delay,
        duration: snap_between(
            original.duration + dt,
            rules.min_duration,
            slide_duration - original.delay,
            rules.grid_ms,
        ),
    }
}

/// Which part of a block `offset_px` (from its left edge) falls on.
pub fn grab_at(offset_px: f64, block_width_px: f64, handle_px: f64) -> Grab {
    if offset_px < handle_px {
        Grab::LeftEdge
    } else if offset_px > block_width_px - handle_px {
        Grab::RightEdge
    } else {
        Grab::Body
    }
}

// ─── Drag gesture ────────────────────────────────────────────────────────

/// Text of the floating tooltip shown while dragging a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragTooltip {
    pub title: &'static str,
    pub primary: String,
    pub secondary: Option<String>,
}

/// One in-flight block drag. Every update is computed from the values at
/// pointer-down, never from the previous update.
#[derive(Debug, Clone)]
pub struct TimelineDrag {
    layer: LayerId,
    grab: Grab,
    start_x: f64,
    original: Timing,
    current: Timing,
    rules: TimelineRules,
}

impl TimelineDrag {
    pub fn begin(layer: LayerId, grab: Grab, pointer_x: f64, timing: Timing) -> Self {
        log::debug!("timeline drag {grab:?} on {layer}");
        Self {
            layer,
            grab,
            start_x: pointer_x,
            original: timing,
            current: timing,
            rules: TimelineRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: TimelineRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn grab(&self) -> Grab {
        self.grab
    }

    pub fn original(&self) -> Timing {
        self.original
    }

    pub fn current(&self) -> Timing {
        self.current
    }

    /// Recompute the block timing for the pointer at `pointer_x`.
    ///
    /// `container_width` is the timeline's width right now; the timeline can
    /// be resized mid-drag. Returns the new timing when it changed.
    pub fn update(
        &mut self,
        pointer_x: f64,
        container_width: f64,
        slide_duration: f64,
    ) -> Option<Timing> {
        let dt = pixels_to_ms(pointer_x - self.start_x, container_width, slide_duration);
        let next = match self.grab {
            Grab::Body => move_block(self.original, dt, slide_duration, self.rules),
            Grab::LeftEdge => resize_left(self.original, dt, self.rules),
            Grab::RightEdge => resize_right(self.original, dt, slide_duration, self.rules),
        };
        log::trace!("timeline drag → delay {} duration {}", next.delay, next.duration);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }

    pub fn tooltip(&self) -> DragTooltip {
        let Timing { delay, duration } = self.current;
        match self.grab {
            Grab::Body => DragTooltip {
                title: "Moving Block",
                primary: format!("Start: {}", format_seconds(delay)),
                secondary: None,
            },
            Grab::LeftEdge => DragTooltip {
                title: "Adjusting Start",
                primary: format!("Start: {}", format_seconds(delay)),
                secondary: Some(format!("Duration: {}", format_seconds(duration))),
            },
            Grab::RightEdge => DragTooltip {
                title: "Adjusting Duration",
                primary: format!("Duration: {}", format_seconds(duration)),
                secondary: Some(format!("End: {}", format_seconds(delay + duration))),
            },
        }
    }

    /// Finish the gesture, returning the final timing.
    pub fn end(self) -> Timing {
        log::debug!("timeline drag end on {}", self.layer);
        self.current
    }
}

// ─── Timeline view geometry ──────────────────────────────────────────────

/// Length of the timeline for the active slide.
pub fn timeline_length(slide: Option<&Slide>) -> f64 {
    slide.map_or(FALLBACK_TIMELINE_MS, |s| s.duration)
}

/// Playhead time for a click or drag at `pointer_x` within the timeline.
pub fn scrub_time(pointer_x: f64, container_width: f64, duration: f64) -> f64 {
    if container_width <= 0.0 {
        return 0.0;
    }
    (pointer_x / container_width * duration).clamp(0.0, duration.max(0.0))
}

/// Block position as percentages of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpan {
    pub left_percent: f64,
    pub width_percent: f64,
}

pub fn block_span(timing: Timing, duration: f64) -> BlockSpan {
    if duration <= 0.0 {
        return BlockSpan {
            left_percent: 0.0,
            width_percent: 0.0,
        };
    }
    BlockSpan {
        left_percent: timing.delay / duration * 100.0,
        width_percent: timing.duration / duration * 100.0,
    }
}

/// A one-second ruler tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeMarker {
    pub seconds: u32,
    pub percent: f64,
}

/// Upper bound on ruler ticks, however long the slide.
pub const MAX_TIME_MARKERS: u32 = 120;

/// Ticks at every whole second from 0 to `ceil(duration)`, spread evenly
/// across the full width. Past [`MAX_TIME_MARKERS`] seconds the ticks are
/// spaced further apart.
pub fn time_markers(duration: f64) -> Vec<TimeMarker> {
    let count = (duration.max(0.0) / 1000.0).ceil() as u32;
    if count == 0 {
        return vec![TimeMarker {
            seconds: 0,
            percent: 0.0,
        }];
    }
    // Long slides get a marker every `step` seconds.
    let step = count.div_ceil(MAX_TIME_MARKERS);
    (0..=count)
        .step_by(step as usize)
        .map(|i| TimeMarker {
            seconds: i,
            percent: f64::from(i) / f64::from(count) * 100.0,
        })
        .collect()
}

/// `1250.0` → `"1.3s"`.
pub fn format_seconds(ms: f64) -> String {
    format!("{:.1}s", ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: TimelineRules = TimelineRules {
        grid_ms: 100.0,
        min_duration: 100.0,
    };

    #[test]
    fn snap_rounds_to_nearest() {
        assert_eq!(snap_to_grid(149.0, 100.0), 100.0);
        assert_eq!(snap_to_grid(150.0, 100.0), 200.0);
        assert_eq!(snap_to_grid(37.0, 0.0), 37.0);
    }

    #[test]
    fn move_stays_inside_slide() {
        let t = Timing::new(14_900.0, 200.0);
        for dt in [1.0, 50.0, 500.0, 1e6] {
            let moved = move_block(t, dt, 15_000.0, RULES);
            assert_eq!(moved.delay, 14_800.0, "dt = {dt}");
            assert_eq!(moved.duration, 200.0);
        }
        assert_eq!(move_block(t, -1e6, 15_000.0, RULES).delay, 0.0);
    }

    #[test]
    fn move_with_unaligned_duration_stays_on_grid() {
        let t = Timing::new(0.0, 250.0);
        let moved = move_block(t, 1e6, 5000.0, RULES);
        assert_eq!(moved.delay, 4700.0);
        assert!(moved.end() <= 5000.0);
    }

    #[test]
    fn resize_left_floors_duration() {
        let t = Timing::new(1000.0, 500.0);
        let resized = resize_left(t, 1000.0, RULES);
        assert_eq!(resized, Timing::new(1400.0, 100.0));
        assert_eq!(resized.end(), 1500.0);

        let grown = resize_left(t, -420.0, RULES);
        assert_eq!(grown, Timing::new(600.0, 900.0));
        assert_eq!(resize_left(t, -5000.0, RULES), Timing::new(0.0, 1500.0));
    }

    #[test]
    fn resize_right_bounds() {
        let t = Timing::new(1000.0, 500.0);
        assert_eq!(resize_right(t, 260.0, 5000.0, RULES).duration, 800.0);
        assert_eq!(resize_right(t, -2000.0, 5000.0, RULES).duration, 100.0);
        assert_eq!(resize_right(t, 1e6, 5000.0, RULES).duration, 4000.0);
    }

    #[test]
    fn grab_zones() {
        assert_eq!(grab_at(3.0, 120.0, 8.0), Grab::LeftEdge);
        assert_eq!(grab_at(60.0, 120.0, 8.0), Grab::Body);
        assert_eq!(grab_at(115.0, 120.0, 8.0), Grab::RightEdge);
    }

    #[test]
    fn drag_reads_width_per_update() {
        let layer = LayerId::intern("block");
        let mut drag = TimelineDrag::begin(layer, Grab::Body, 100.0, Timing::new(0.0, 600.0));
        // 100 px on a 1000 px timeline of 5 s = 500 ms.
        assert_eq!(drag.update(200.0, 1000.0, 5000.0), Some(Timing::new(500.0, 600.0)));
        // Timeline shrank to 500 px: the same pointer now means 1000 ms.
        assert_eq!(drag.update(200.0, 500.0, 5000.0), Some(Timing::new(1000.0, 600.0)));
        assert_eq!(drag.update(200.0, 500.0, 5000.0), None);
        assert_eq!(drag.end(), Timing::new(1000.0, 600.0));
    }

    #[test]
    fn tooltips() {
        let layer = LayerId::intern("block");
        let mut drag = TimelineDrag::begin(layer, Grab::RightEdge, 0.0, Timing::new(1200.0, 600.0));
        drag.update(100.0, 1000.0, 5000.0);
        let tip = drag.tooltip();
        assert_eq!(tip.title, "Adjusting Duration");
        assert_eq!(tip.primary, "Duration: 1.1s");
        assert_eq!(tip.secondary.as_deref(), Some("End: 2.3s"));

        let drag = TimelineDrag::begin(layer, Grab::Body, 0.0, Timing::new(1200.0, 600.0));
        assert_eq!(drag.tooltip().primary, "Start: 1.2s");
    }

    #[test]
    fn scrub_clamps() {
        assert_eq!(scrub_time(250.0, 1000.0, 8000.0), 2000.0);
        assert_eq!(scrub_time(-10.0, 1000.0, 8000.0), 0.0);
        assert_eq!(scrub_time(1200.0, 1000.0, 8000.0), 8000.0);
        assert_eq!(scrub_time(10.0, 0.0, 8000.0), 0.0);
    }

    #[test]
    fn markers_and_spans() {
        let markers = time_markers(5000.0);
        assert_eq!(markers.len(), 6);
        assert_eq!(markers[5].percent, 100.0);
        assert_eq!(time_markers(4500.0).len(), 6);

        let markers = time_markers(1e12);
        assert!(markers.len() <= MAX_TIME_MARKERS as usize + 1);
        assert_eq!(markers[0].seconds, 0);
        assert!(markers[1].seconds > 1);
        assert_eq!(time_markers(f64::NAN).len(), 1);

        let span = block_span(Timing::new(1000.0, 500.0), 5000.0);
        assert_eq!(span.left_percent, 20.0);
        assert_eq!(span.width_percent, 10.0);
        assert_eq!(timeline_length(None), 15_000.0);
    }
}
