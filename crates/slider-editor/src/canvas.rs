//! Canvas drag: pointer position → layer `{x, y}` in canvas space.
//!
//! Each move runs three passes in order: grid snap (when enabled), guide
//! snap against the edges and centers of every other layer, then a clamp to
//! `x, y >= 0`. Guides run after the grid, so a guide wins when both apply.
//! There is no clamp against the right or bottom canvas edge.

use crate::config::CanvasSettings;
use kurbo::{Point, Size, Vec2};
use serde::Serialize;
use slider_core::{Layer, LayerId};
use smallvec::SmallVec;

/// Candidate guide lines in canvas px: three per other layer and axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentGuides {
    /// Vertical lines (left edge, center, right edge).
    pub x: SmallVec<[f64; 12]>,
    /// Horizontal lines (top edge, center, bottom edge).
    pub y: SmallVec<[f64; 12]>,
}

impl AlignmentGuides {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }
}

/// Guides from every layer other than `dragged`.
pub fn alignment_guides<'a>(
    dragged: LayerId,
    layers: impl IntoIterator<Item = &'a Layer>,
) -> AlignmentGuides {
    let mut guides = AlignmentGuides::default();
    for layer in layers.into_iter().filter(|l| l.id != dragged) {
        let s = &layer.style;
        guides.x.extend([s.x, s.x + s.width / 2.0, s.x + s.width]);
        guides.y.extend([s.y, s.y + s.height / 2.0, s.y + s.height]);
    }
    guides
}

/// Snap one axis. For each guide in order the start edge, then the center,
/// then the end edge is tested against the position as it stands; a later
/// match overrides an earlier one.
fn snap_axis(mut pos: f64, extent: f64, guides: &[f64], threshold: f64) -> f64 {
    for &guide in guides {
        if (pos - guide).abs() < threshold {
            pos = guide;
        }
        if (pos + extent / 2.0 - guide).abs() < threshold {
            pos = guide - extent / 2.0;
        }
        if (pos + extent - guide).abs() < threshold {
            pos = guide - extent;
        }
    }
    pos
}

/// Snap a layer of `size` at `pos` to the nearest guides within `threshold`.
pub fn snap_to_guides(pos: Point, size: Size, guides: &AlignmentGuides, threshold: f64) -> Point {
    Point::new(
        snap_axis(pos.x, size.width, &guides.x, threshold),
        snap_axis(pos.y, size.height, &guides.y, threshold),
    )
}

pub fn snap_point_to_grid(pos: Point, grid: f64) -> Point {
    if grid <= 0.0 {
        return pos;
    }
    Point::new((pos.x / grid).round() * grid, (pos.y / grid).round() * grid)
}

fn zoom_factor(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 }
}

// ─── Drag gesture ────────────────────────────────────────────────────────

/// One in-flight canvas drag. Guides are computed once at pointer-down.
#[derive(Debug, Clone)]
pub struct CanvasDrag {
    layer: LayerId,
    size: Size,
    origin: Point,
    /// Pointer offset from the layer's top-left corner, in screen px.
    grab_offset: Vec2,
    guides: AlignmentGuides,
}

impl CanvasDrag {
    pub fn begin<'a>(
        layer: &Layer,
        layers: impl IntoIterator<Item = &'a Layer>,
        pointer: Point,
        container_origin: Point,
        zoom: f64,
    ) -> Self {
        let zoom = zoom_factor(zoom);
        let origin = Point::new(layer.style.x, layer.style.y);
        let grab_offset = (pointer - container_origin) - origin.to_vec2() * zoom;
        let guides = alignment_guides(layer.id, layers);
        log::debug!(
            "canvas drag on {} with {} guide lines",
            layer.id,
            guides.x.len() + guides.y.len()
        );
        Self {
            layer: layer.id,
            size: Size::new(layer.style.width, layer.style.height),
            origin,
            grab_offset,
            guides,
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// Layer position at pointer-down.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn guides(&self) -> &AlignmentGuides {
        &self.guides
    }

    /// Layer position for the pointer at `pointer`.
    pub fn position(
        &self,
        pointer: Point,
        container_origin: Point,
        zoom: f64,
        settings: &CanvasSettings,
        threshold: f64,
    ) -> Point {
        let zoom = zoom_factor(zoom);
        let mut pos = (((pointer - container_origin) - self.grab_offset) / zoom).to_point();
        if settings.snap_to_grid {
            pos = snap_point_to_grid(pos, settings.grid_size);
        }
        pos = snap_to_guides(pos, self.size, &self.guides, threshold);
        let pos = Point::new(pos.x.max(0.0), pos.y.max(0.0));
        log::trace!("canvas drag {} → ({}, {})", self.layer, pos.x, pos.y);
        pos
    }
}
