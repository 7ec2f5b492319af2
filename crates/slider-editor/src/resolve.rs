//! Maps the playhead to each layer's animation phase.
//!
//! Pure functions only: same inputs, same output. While scrubbing (not
//! playing) a layer is either hidden or fully visible, never mid-entrance,
//! so a CSS animation is not replayed on every scrub step.

use serde::Serialize;
use slider_core::{Layer, LayerAnimation, LayerId, Slide, presets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPhase {
    /// Before the layer's start time.
    Hidden,
    /// Playing its entrance animation.
    Entering,
    /// Static, fully shown.
    Visible,
}

pub fn resolve(t: f64, animation: &LayerAnimation, is_playing: bool) -> AnimationPhase {
    if t < animation.delay {
        AnimationPhase::Hidden
    } else if is_playing && t < animation.end() {
        AnimationPhase::Entering
    } else {
        AnimationPhase::Visible
    }
}

/// Render input for one layer at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFrame {
    pub layer_id: LayerId,
    pub phase: AnimationPhase,
    /// Entrance progress in `[0, 1]`.
    pub progress: f64,
    /// Entrance utility class, present only while entering.
    pub animation_class: Option<String>,
}

pub fn layer_frame(layer: &Layer, t: f64, is_playing: bool) -> LayerFrame {
    let animation = &layer.animation;
    let phase = resolve(t, animation, is_playing);
    let progress = match phase {
        AnimationPhase::Hidden => 0.0,
        AnimationPhase::Visible => 1.0,
        AnimationPhase::Entering => ((t - animation.delay) / animation.duration).clamp(0.0, 1.0),
    };
    LayerFrame {
        layer_id: layer.id,
        phase,
        progress,
        animation_class: (phase == AnimationPhase::Entering)
            .then(|| presets::class_name(&animation.entrance)),
    }
}

/// Frames for every layer of `slide`, in paint order.
pub fn resolve_slide(slide: &Slide, t: f64, is_playing: bool) -> Vec<LayerFrame> {
    slide
        .layers
        .iter()
        .map(|layer| layer_frame(layer, t, is_playing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slider_core::LayerKind;

    fn timing(delay: f64, duration: f64) -> LayerAnimation {
        LayerAnimation::entrance("Fade In", delay, duration)
    }

    #[test]
    fn phases_while_playing() {
        let anim = timing(500.0, 1000.0);
        for t in [0.0, 250.0, 499.9] {
            assert_eq!(resolve(t, &anim, true), AnimationPhase::Hidden, "t = {t}");
        }
        for t in [500.0, 1000.0, 1499.9] {
            assert_eq!(resolve(t, &anim, true), AnimationPhase::Entering, "t = {t}");
        }
        for t in [1500.0, 4000.0] {
            assert_eq!(resolve(t, &anim, true), AnimationPhase::Visible, "t = {t}");
        }
    }

    #[test]
    fn scrubbing_never_enters() {
        let anim = timing(500.0, 1000.0);
        let mut t = 0.0;
        while t <= 3000.0 {
            assert_ne!(resolve(t, &anim, false), AnimationPhase::Entering, "t = {t}");
            t += 50.0;
        }
        assert_eq!(resolve(499.0, &anim, false), AnimationPhase::Hidden);
        assert_eq!(resolve(500.0, &anim, false), AnimationPhase::Visible);
    }

    #[test]
    fn frame_progress_and_class() {
        let mut layer = Layer::new_of_kind(LayerKind::Text, 1);
        layer.animation = LayerAnimation::entrance("Slide In Left", 1000.0, 800.0);

        let frame = layer_frame(&layer, 1200.0, true);
        assert_eq!(frame.phase, AnimationPhase::Entering);
        assert_eq!(frame.progress, 0.25);
        assert_eq!(frame.animation_class.as_deref(), Some("slide-in-left"));

        let frame = layer_frame(&layer, 1200.0, false);
        assert_eq!(frame.progress, 1.0);
        assert_eq!(frame.animation_class, None);

        assert_eq!(layer_frame(&layer, 10.0, true), layer_frame(&layer, 10.0, true));
    }

    #[test]
    fn slide_frames_follow_layer_order() {
        let project = slider_core::Project::sample();
        let slide = project.slide(0).unwrap();
        let frames = resolve_slide(slide, 300.0, true);
        let phases: Vec<_> = frames.iter().map(|f| f.phase).collect();
        assert_eq!(
            phases,
            [AnimationPhase::Entering, AnimationPhase::Entering, AnimationPhase::Hidden]
        );
    }
}
