//! Structural edits and their pure application to a project snapshot.
//!
//! `apply_edit` never mutates its input: it clones the project spine and
//! writes through `Arc::make_mut`, so only the touched slide and layer are
//! copied. An edit whose target no longer exists yields `None` and must not
//! be committed.

use crate::timeline::Timing;
use slider_core::{Layer, LayerId, Project, Slide, SlideId};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddSlide(Slide),
    /// Refused when it would remove the last slide.
    DeleteSlide(SlideId),
    SetSlideDuration {
        slide: SlideId,
        duration: f64,
    },
    AddLayer {
        slide: SlideId,
        layer: Layer,
    },
    DeleteLayer {
        slide: SlideId,
        layer: LayerId,
    },
    /// Replace a layer wholesale (property panels, duplicates).
    ReplaceLayer {
        slide: SlideId,
        layer: Layer,
    },
    SetTiming {
        slide: SlideId,
        layer: LayerId,
        timing: Timing,
    },
    MoveLayer {
        slide: SlideId,
        layer: LayerId,
        x: f64,
        y: f64,
    },
    LoadProject(Project),
}

impl Edit {
    /// Short description used as the undo label.
    pub fn label(&self) -> &'static str {
        match self {
            Edit::AddSlide(_) => "add slide",
            Edit::DeleteSlide(_) => "delete slide",
            Edit::SetSlideDuration { .. } => "set slide duration",
            Edit::AddLayer { .. } => "add layer",
            Edit::DeleteLayer { .. } => "delete layer",
            Edit::ReplaceLayer { .. } => "update layer",
            Edit::SetTiming { .. } => "change timing",
            Edit::MoveLayer { .. } => "move layer",
            Edit::LoadProject(_) => "load project",
        }
    }
}

/// The project after `edit`, or `None` when the edit does not apply.
///
/// Layer timing written by `ReplaceLayer`, `SetTiming` and
/// `SetSlideDuration` is clamped so `duration >= min_duration` and
/// `delay + duration <= slide.duration`.
pub fn apply_edit(project: &Project, edit: Edit, min_duration: f64) -> Option<Project> {
    let mut next = project.clone();
    match edit {
        Edit::AddSlide(slide) => {
            next.slides.push(Arc::new(slide));
        }
        Edit::DeleteSlide(id) => {
            if next.slides.len() <= 1 {
                log::warn!("refusing to delete the last slide");
                return None;
            }
            let index = next.slide_index(id)?;
            next.slides.remove(index);
        }
        Edit::SetSlideDuration { slide, duration } => {
            if !(duration.is_finite() && duration > 0.0) {
                log::warn!("rejected slide duration {duration}");
                return None;
            }
            let slide = next.slide_mut(slide)?;
            slide.duration = duration;
            for layer in &mut slide.layers {
                let clamped = layer.animation.clamped_to(duration, min_duration);
                if clamped != layer.animation {
                    Arc::make_mut(layer).animation = clamped;
                }
            }
        }
        Edit::AddLayer { slide, layer } => {
            next.slide_mut(slide)?.layers.push(Arc::new(layer));
        }
        Edit::DeleteLayer { slide, layer } => {
            let slide = next.slide_mut(slide)?;
            let index = slide.layer_index(layer)?;
            slide.layers.remove(index);
        }
        Edit::ReplaceLayer { slide, mut layer } => {
            let slide = next.slide_mut(slide)?;
            let duration = slide.duration;
            let index = slide.layer_index(layer.id)?;
            layer.animation = clamp_logged(&layer, duration, min_duration);
            slide.layers[index] = Arc::new(layer);
        }
        Edit::SetTiming {
            slide,
            layer,
            timing,
        } => {
            let slide = next.slide_mut(slide)?;
            let duration = slide.duration;
            let target = slide.layer_mut(layer)?;
            target.animation.delay = timing.delay;
            target.animation.duration = timing.duration;
            target.animation = clamp_logged(target, duration, min_duration);
        }
        Edit::MoveLayer { slide, layer, x, y } => {
            let target = next.slide_mut(slide)?.layer_mut(layer)?;
            target.style.x = x.max(0.0);
            target.style.y = y.max(0.0);
        }
        Edit::LoadProject(project) => {
            next = project;
        }
    }
    Some(next)
}

fn clamp_logged(layer: &Layer, slide_duration: f64, min_duration: f64) -> slider_core::LayerAnimation {
    let clamped = layer.animation.clamped_to(slide_duration, min_duration);
    if clamped != layer.animation {
        log::warn!(
            "clamped timing of {} from {}+{} to {}+{}",
            layer.id,
            layer.animation.delay,
            layer.animation.duration,
            clamped.delay,
            clamped.duration
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use slider_core::LayerKind;

    fn ids(project: &Project) -> (SlideId, LayerId) {
        let slide = &project.slides[0];
        (slide.id, slide.layers[0].id)
    }

    #[test]
    fn add_and_delete_layer() {
        let project = Project::sample();
        let (slide, _) = ids(&project);
        let layer = Layer::new_of_kind(LayerKind::Button, 4);
        let layer_id = layer.id;

        let added = apply_edit(&project, Edit::AddLayer { slide, layer }, 100.0).unwrap();
        assert_eq!(added.slides[0].layers.len(), 4);
        assert_eq!(project.slides[0].layers.len(), 3);

        let removed = apply_edit(
            &added,
            Edit::DeleteLayer {
                slide,
                layer: layer_id,
            },
            100.0,
        )
        .unwrap();
        assert_eq!(removed.slides[0].layers.len(), 3);
    }

    #[test]
    fn missing_target_is_none() {
        let project = Project::sample();
        let (slide, _) = ids(&project);
        let edit = Edit::DeleteLayer {
            slide,
            layer: LayerId::intern("no-such-layer"),
        };
        assert!(apply_edit(&project, edit, 100.0).is_none());
    }

    #[test]
    fn last_slide_cannot_be_deleted() {
        let project = Project::sample();
        let (slide, _) = ids(&project);
        assert!(apply_edit(&project, Edit::DeleteSlide(slide), 100.0).is_none());
    }

    #[test]
    fn set_timing_is_clamped() {
        let project = Project::sample();
        let (slide, layer) = ids(&project);
        let edit = Edit::SetTiming {
            slide,
            layer,
            timing: Timing::new(4900.0, 50.0),
        };
        let next = apply_edit(&project, edit, 100.0).unwrap();
        let anim = &next.slides[0].layers[0].animation;
        assert_eq!((anim.delay, anim.duration), (4900.0, 100.0));

        let edit = Edit::SetTiming {
            slide,
            layer,
            timing: Timing::new(4900.0, 800.0),
        };
        let next = apply_edit(&project, edit, 100.0).unwrap();
        let anim = &next.slides[0].layers[0].animation;
        assert_eq!((anim.delay, anim.duration), (4200.0, 800.0));
    }

    #[test]
    fn shrinking_slide_clamps_layers() {
        let project = Project::sample();
        let (slide, _) = ids(&project);
        let edit = Edit::SetSlideDuration {
            slide,
            duration: 700.0,
        };
        let next = apply_edit(&project, edit, 100.0).unwrap();
        for layer in &next.slides[0].layers {
            assert!(layer.animation.end() <= 700.0, "{:?}", layer.animation);
        }
        assert!(apply_edit(&project, Edit::SetSlideDuration { slide, duration: 0.0 }, 100.0).is_none());
    }

    #[test]
    fn edits_share_untouched_layers() {
        let project = Project::sample();
        let (slide, layer) = ids(&project);
        let next = apply_edit(
            &project,
            Edit::MoveLayer {
                slide,
                layer,
                x: 10.0,
                y: -5.0,
            },
            100.0,
        )
        .unwrap();
        assert_eq!(next.slides[0].layers[0].style.x, 10.0);
        assert_eq!(next.slides[0].layers[0].style.y, 0.0);
        assert!(Arc::ptr_eq(&project.slides[0].layers[1], &next.slides[0].layers[1]));
        assert_eq!(project.slides[0].layers[0].style.x, 50.0);
    }
}
