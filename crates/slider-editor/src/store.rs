//! The editor store: one owner for the project history, the UI-transient
//! state, the playback transport and the in-flight gestures.
//!
//! Structural edits go through [`EditorStore::dispatch`] and land in
//! history. Selection, current slide, playhead, zoom and canvas toggles
//! never do.

use crate::canvas::{AlignmentGuides, CanvasDrag};
use crate::config::{CanvasSettings, EditorConfig, Zoom};
use crate::edit::{Edit, apply_edit};
use crate::history::History;
use crate::playback::{FrameHandle, FrameScheduler, Tick, Transport};
use crate::resolve::{LayerFrame, resolve_slide};
use crate::shortcuts::ShortcutAction;
use crate::timeline::{self, DragTooltip, Grab, TimelineDrag, TimelineRules, Timing};
use kurbo::Point;
use serde::Serialize;
use serde_json::Value;
use slider_core::{
    ExportFormat, ExportOptions, ExportedFile, Layer, LayerId, LayerKind, Project, ProjectError,
    PropertyPath, SavedProject, Slide, SlideId, UpdateError, apply_property, templates,
};

/// Offset applied to a duplicated layer (canvas px).
const DUPLICATE_OFFSET: f64 = 20.0;

/// State that lives outside undo history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub current_slide_index: usize,
    pub selected_layer_id: Option<LayerId>,
}

/// Shortcut outcomes the host handles itself (file dialogs, help overlay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HostAction {
    Save,
    Export,
    ShowHelp,
}

pub struct EditorStore<S: FrameScheduler> {
    history: History,
    ui: UiState,
    transport: Transport<S>,
    canvas: CanvasSettings,
    zoom: Zoom,
    timeline_drag: Option<TimelineDrag>,
    canvas_drag: Option<CanvasDrag>,
    config: EditorConfig,
}

impl<S: FrameScheduler> EditorStore<S> {
    pub fn new(project: Project, scheduler: S, config: EditorConfig) -> Self {
        Self {
            history: History::new(project, config.history_depth),
            ui: UiState::default(),
            transport: Transport::new(scheduler, config.restart_threshold_ms),
            canvas: config.canvas.clone(),
            zoom: Zoom::default(),
            timeline_drag: None,
            canvas_drag: None,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn transport(&self) -> &Transport<S> {
        &self.transport
    }

    pub fn canvas_settings(&self) -> &CanvasSettings {
        &self.canvas
    }

    pub fn set_grid_size(&mut self, size: f64) {
        self.canvas.set_grid_size(size);
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn set_zoom(&mut self, factor: f64) {
        self.zoom = Zoom::new(factor);
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.project().slide(self.ui.current_slide_index)
    }

    /// The selected layer on the current slide. A stale selection reads as
    /// no selection.
    pub fn selected_layer(&self) -> Option<&Layer> {
        let id = self.ui.selected_layer_id?;
        self.current_slide()?.layer(id)
    }

    /// Length of the current slide's timeline (ms).
    pub fn slide_duration(&self) -> f64 {
        timeline::timeline_length(self.current_slide())
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.transport.current_time()
    }

    fn rules(&self) -> TimelineRules {
        TimelineRules {
            grid_ms: self.config.timeline_grid_ms,
            min_duration: self.config.min_animation_ms,
        }
    }

    // ─── Structural edits ────────────────────────────────────────────────

    /// Apply `edit` and record it in history. Returns `false`, leaving the
    /// project untouched, when the edit does not apply.
    ///
    /// An open drag is finished first, so the drag and `edit` become two
    /// separate undo steps.
    pub fn dispatch(&mut self, edit: Edit) -> bool {
        self.cancel_gestures();
        self.apply(edit)
    }

    /// Apply `edit` inside whatever gesture is open.
    fn apply(&mut self, edit: Edit) -> bool {
        let label = edit.label();
        match apply_edit(self.history.present(), edit, self.config.min_animation_ms) {
            Some(next) => {
                self.history.commit(next, label);
                true
            }
            None => {
                log::debug!("skipped {label}: target missing or edit refused");
                false
            }
        }
    }

    /// Set one property of the selected layer, e.g. `"style.x"` or
    /// `"animation.delay"`. Timing is clamped to the slide.
    pub fn update_property(&mut self, path: &str, value: Value) -> Result<(), UpdateError> {
        let path = PropertyPath::parse(path)?;
        let slide = self.current_slide().ok_or(UpdateError::NoSelection)?.id;
        let layer = self.selected_layer().ok_or(UpdateError::NoSelection)?;
        let updated = apply_property(layer, &path, value)?;
        if self.dispatch(Edit::ReplaceLayer {
            slide,
            layer: updated,
        }) {
            Ok(())
        } else {
            Err(UpdateError::LayerNotFound)
        }
    }

    /// Append a blank slide and make it current.
    pub fn add_slide(&mut self) -> SlideId {
        let slide = Slide::blank(self.project().slides.len() + 1);
        let id = slide.id;
        self.dispatch(Edit::AddSlide(slide));
        self.set_current_slide(self.project().slides.len() - 1);
        id
    }

    /// Append a copy of a template slide and make it current.
    pub fn add_template_slide(&mut self, template_id: &str) -> Option<SlideId> {
        let Some(slide) = templates::instantiate(template_id) else {
            log::warn!("unknown slide template {template_id:?}");
            return None;
        };
        let id = slide.id;
        self.dispatch(Edit::AddSlide(slide));
        self.set_current_slide(self.project().slides.len() - 1);
        Some(id)
    }

    /// Delete a slide. The last remaining slide is never deleted.
    pub fn delete_slide(&mut self, id: SlideId) -> bool {
        if !self.dispatch(Edit::DeleteSlide(id)) {
            return false;
        }
        let last = self.project().slides.len().saturating_sub(1);
        if self.ui.current_slide_index > last {
            self.set_current_slide(last);
        }
        true
    }

    pub fn set_slide_duration(&mut self, duration: f64) -> bool {
        let Some(slide) = self.current_slide().map(|s| s.id) else {
            return false;
        };
        let changed = self.dispatch(Edit::SetSlideDuration { slide, duration });
        if changed {
            let duration = self.slide_duration();
            if self.current_time() > duration {
                self.transport.set_current_time(duration, duration);
            }
        }
        changed
    }

    /// Add a layer of `kind` on top of the current slide and select it.
    pub fn add_layer(&mut self, kind: LayerKind) -> Option<LayerId> {
        let slide = self.current_slide()?;
        let (slide_id, z_index) = (slide.id, slide.layers.len() as i32 + 1);
        let layer = Layer::new_of_kind(kind, z_index);
        let id = layer.id;
        self.dispatch(Edit::AddLayer {
            slide: slide_id,
            layer,
        })
        .then(|| {
            self.ui.selected_layer_id = Some(id);
            id
        })
    }

    pub fn delete_selected_layer(&mut self) -> bool {
        let (Some(slide), Some(layer)) = (self.current_slide(), self.selected_layer()) else {
            return false;
        };
        let edit = Edit::DeleteLayer {
            slide: slide.id,
            layer: layer.id,
        };
        let deleted = self.dispatch(edit);
        if deleted {
            self.ui.selected_layer_id = None;
        }
        deleted
    }

    /// Copy the selected layer with a fresh id, offset it and select the copy.
    pub fn duplicate_selected_layer(&mut self) -> Option<LayerId> {
        let slide = self.current_slide()?;
        let source = self.selected_layer()?;
        let mut copy = source.clone();
        copy.id = LayerId::generate();
        copy.style.x += DUPLICATE_OFFSET;
        copy.style.y += DUPLICATE_OFFSET;
        copy.style.z_index = slide.layers.len() as i32 + 1;
        let (slide, id) = (slide.id, copy.id);
        self.dispatch(Edit::AddLayer { slide, layer: copy }).then(|| {
            self.ui.selected_layer_id = Some(id);
            id
        })
    }

    /// Move the selected layer by whole canvas px.
    pub fn nudge_selected_layer(&mut self, dx: f64, dy: f64) -> bool {
        let (Some(slide), Some(layer)) = (self.current_slide(), self.selected_layer()) else {
            return false;
        };
        let edit = Edit::MoveLayer {
            slide: slide.id,
            layer: layer.id,
            x: layer.style.x + dx,
            y: layer.style.y + dy,
        };
        self.dispatch(edit)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_layer(&mut self, id: Option<LayerId>) {
        self.ui.selected_layer_id = id;
    }

    /// Switch slides. Stops playback and rewinds the playhead.
    pub fn set_current_slide(&mut self, index: usize) -> bool {
        if index >= self.project().slides.len() {
            return false;
        }
        self.ui.current_slide_index = index;
        self.ui.selected_layer_id = None;
        self.cancel_gestures();
        self.transport.reset();
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        self.cancel_gestures();
        let label = self.history.undo();
        self.clamp_slide_index();
        label
    }

    pub fn redo(&mut self) -> Option<String> {
        self.cancel_gestures();
        let label = self.history.redo();
        self.clamp_slide_index();
        label
    }

    fn clamp_slide_index(&mut self) {
        let last = self.project().slides.len().saturating_sub(1);
        if self.ui.current_slide_index > last {
            self.ui.current_slide_index = last;
            self.transport.reset();
        }
        let duration = self.slide_duration();
        if !self.is_playing() && self.current_time() > duration {
            self.transport.set_current_time(duration, duration);
        }
    }

    // ─── Playback ────────────────────────────────────────────────────────

    pub fn play(&mut self, now: f64) {
        let duration = self.slide_duration();
        self.transport.play(now, duration);
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn toggle_playback(&mut self, now: f64) {
        let duration = self.slide_duration();
        self.transport.toggle(now, duration);
    }

    /// Play the current slide from the start.
    pub fn preview(&mut self, now: f64) {
        let duration = self.slide_duration();
        self.transport.preview(now, duration);
    }

    pub fn reset(&mut self) {
        self.transport.reset();
    }

    pub fn set_current_time(&mut self, t: f64) {
        let duration = self.slide_duration();
        self.transport.set_current_time(t, duration);
    }

    /// Move the playhead to a click at `pointer_x` on the timeline.
    pub fn scrub(&mut self, pointer_x: f64, container_width: f64) {
        let duration = self.slide_duration();
        let t = timeline::scrub_time(pointer_x, container_width, duration);
        self.transport.set_current_time(t, duration);
    }

    /// Host frame callback for the request `handle`.
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64) -> Tick {
        let duration = self.slide_duration();
        self.transport.on_frame(handle, now, duration)
    }

    /// Render state of every layer on the current slide.
    pub fn layer_states(&self) -> Vec<LayerFrame> {
        self.current_slide()
            .map(|slide| resolve_slide(slide, self.current_time(), self.is_playing()))
            .unwrap_or_default()
    }

    // ─── Timeline drag ───────────────────────────────────────────────────

    /// Start dragging a layer's block on the current slide's timeline.
    pub fn begin_timeline_drag(&mut self, layer: LayerId, grab: Grab, pointer_x: f64) -> bool {
        let Some(timing) = self
            .current_slide()
            .and_then(|s| s.layer(layer))
            .map(|l| Timing::from(&l.animation))
        else {
            return false;
        };
        self.cancel_gestures();
        self.transport.pause();
        self.ui.selected_layer_id = Some(layer);
        self.history.begin_gesture("change timing");
        self.timeline_drag =
            Some(TimelineDrag::begin(layer, grab, pointer_x, timing).with_rules(self.rules()));
        true
    }

    /// Begin a drag by hit-testing the grab zone: `offset_px` is the pointer
    /// offset from the block's left edge.
    pub fn begin_timeline_drag_at(
        &mut self,
        layer: LayerId,
        offset_px: f64,
        block_width_px: f64,
        pointer_x: f64,
    ) -> bool {
        let grab = timeline::grab_at(offset_px, block_width_px, self.config.resize_handle_px);
        self.begin_timeline_drag(layer, grab, pointer_x)
    }

    /// Preview the drag at `pointer_x`. Returns the new timing when it changed.
    pub fn timeline_drag_to(&mut self, pointer_x: f64, container_width: f64) -> Option<Timing> {
        let slide = self.current_slide()?;
        let (slide_id, duration) = (slide.id, slide.duration);
        let drag = self.timeline_drag.as_mut()?;
        let timing = drag.update(pointer_x, container_width, duration)?;
        let edit = Edit::SetTiming {
            slide: slide_id,
            layer: drag.layer(),
            timing,
        };
        self.apply(edit).then_some(timing)
    }

    pub fn timeline_tooltip(&self) -> Option<DragTooltip> {
        self.timeline_drag.as_ref().map(TimelineDrag::tooltip)
    }

    /// Finish the drag, recording it as one undo step.
    pub fn end_timeline_drag(&mut self) -> Option<Timing> {
        let drag = self.timeline_drag.take()?;
        self.history.end_gesture();
        Some(drag.end())
    }

    // ─── Canvas drag ─────────────────────────────────────────────────────

    /// Start dragging `layer` on the canvas. The layer is selected first.
    pub fn begin_canvas_drag(&mut self, layer: LayerId, pointer: Point, container_origin: Point) -> bool {
        self.cancel_gestures();
        self.select_layer(Some(layer));
        let Some(slide) = self.current_slide() else {
            return false;
        };
        let Some(target) = slide.layer(layer) else {
            return false;
        };
        let drag = CanvasDrag::begin(
            target,
            slide.other_layers(layer),
            pointer,
            container_origin,
            self.zoom.factor(),
        );
        self.transport.pause();
        self.history.begin_gesture("move layer");
        self.canvas_drag = Some(drag);
        true
    }

    /// Preview the drag at `pointer`. Returns the layer's new position.
    pub fn canvas_drag_to(&mut self, pointer: Point, container_origin: Point) -> Option<Point> {
        let drag = self.canvas_drag.as_ref()?;
        let slide = self.current_slide()?.id;
        let pos = drag.position(
            pointer,
            container_origin,
            self.zoom.factor(),
            &self.canvas,
            self.config.guide_snap_threshold,
        );
        let edit = Edit::MoveLayer {
            slide,
            layer: drag.layer(),
            x: pos.x,
            y: pos.y,
        };
        self.apply(edit).then_some(pos)
    }

    /// Guide lines to draw during a canvas drag.
    pub fn canvas_guides(&self) -> Option<&AlignmentGuides> {
        if !self.canvas.show_guides {
            return None;
        }
        self.canvas_drag.as_ref().map(CanvasDrag::guides)
    }

    pub fn end_canvas_drag(&mut self) -> bool {
        if self.canvas_drag.take().is_none() {
            return false;
        }
        self.history.end_gesture();
        true
    }

    fn cancel_gestures(&mut self) {
        let open = self.timeline_drag.take().is_some() | self.canvas_drag.take().is_some();
        if open {
            self.history.end_gesture();
        }
    }

    // ─── Persistence and export ──────────────────────────────────────────

    /// Replace the project with a parsed file. A rejected file leaves every
    /// piece of state as it was.
    pub fn load_project(&mut self, text: &str) -> Result<(), ProjectError> {
        let project = slider_core::load_project(text).inspect_err(|err| {
            log::warn!("project load rejected: {err}");
        })?;
        self.dispatch(Edit::LoadProject(project));
        self.ui = UiState::default();
        self.transport.reset();
        Ok(())
    }

    pub fn save_project(&self) -> Result<SavedProject, ProjectError> {
        slider_core::save_project(self.project())
    }

    pub fn export(&self, format: ExportFormat, options: &ExportOptions) -> Result<ExportedFile, ProjectError> {
        slider_core::export_project(self.project(), format, options)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Run a resolved shortcut at wall time `now`. Actions owned by the
    /// host come back as a [`HostAction`].
    pub fn handle_shortcut(&mut self, action: ShortcutAction, now: f64) -> Option<HostAction> {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                self.delete_selected_layer();
            }
            ShortcutAction::Duplicate => {
                self.duplicate_selected_layer();
            }
            ShortcutAction::Nudge { dx, dy } => {
                self.nudge_selected_layer(f64::from(dx), f64::from(dy));
            }
            ShortcutAction::AddLayer(kind) => {
                self.add_layer(kind);
            }
            ShortcutAction::NewSlide => {
                self.add_slide();
            }
            ShortcutAction::TogglePlayback => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.preview(now);
                }
            }
            ShortcutAction::ZoomIn => self.zoom.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom.zoom_out(),
            ShortcutAction::ZoomReset => self.zoom.reset(),
            ShortcutAction::ToggleGrid => self.canvas.toggle_grid(),
            ShortcutAction::ToggleRulers => self.canvas.toggle_rulers(),
            ShortcutAction::ToggleGuides => self.canvas.toggle_guides(),
            ShortcutAction::ToggleSnap => self.canvas.toggle_snap(),
            ShortcutAction::Deselect => self.select_layer(None),
            ShortcutAction::Save => return Some(HostAction::Save),
            ShortcutAction::Export => return Some(HostAction::Export),
            ShortcutAction::ShowHelp => return Some(HostAction::ShowHelp),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::ManualScheduler;
    use serde_json::json;

    fn store() -> EditorStore<ManualScheduler> {
        EditorStore::new(Project::sample(), ManualScheduler::new(), EditorConfig::default())
    }

    #[test]
    fn selection_is_not_history() {
        let mut store = store();
        store.select_layer(Some(LayerId::intern("2")));
        store.set_current_time(1200.0);
        assert!(!store.history().can_undo());
        assert_eq!(store.selected_layer().map(|l| l.id), Some(LayerId::intern("2")));
    }

    #[test]
    fn stale_selection_reads_as_none() {
        let mut store = store();
        store.select_layer(Some(LayerId::intern("gone")));
        assert!(store.selected_layer().is_none());
        assert!(matches!(
            store.update_property("style.x", json!(10)),
            Err(UpdateError::NoSelection)
        ));
        assert!(!store.delete_selected_layer());
    }

    #[test]
    fn update_property_commits_and_clamps() {
        let mut store = store();
        store.select_layer(Some(LayerId::intern("1")));
        store.update_property("animation.delay", json!(4900)).unwrap();
        let anim = &store.selected_layer().unwrap().animation;
        assert_eq!((anim.delay, anim.duration), (4200.0, 800.0));
        assert_eq!(store.history().undo_len(), 1);

        store.undo();
        assert_eq!(store.selected_layer().unwrap().animation.delay, 0.0);
    }

    #[test]
    fn add_layer_stacks_on_top_and_selects() {
        let mut store = store();
        let id = store.add_layer(LayerKind::Shape).unwrap();
        let layer = store.selected_layer().unwrap();
        assert_eq!(layer.id, id);
        assert_eq!(layer.style.z_index, 4);
    }

    #[test]
    fn slides_add_and_delete() {
        let mut store = store();
        let first = store.project().slides[0].id;
        assert!(!store.delete_slide(first));

        let second = store.add_slide();
        assert_eq!(store.ui().current_slide_index, 1);
        assert_eq!(store.current_slide().unwrap().name, "Slide 2");

        assert!(store.delete_slide(second));
        assert_eq!(store.ui().current_slide_index, 0);
        assert_eq!(store.project().slides.len(), 1);
    }

    #[test]
    fn switching_slides_stops_playback() {
        let mut store = store();
        store.add_slide();
        store.play(0.0);
        assert!(store.is_playing());
        store.set_current_slide(0);
        assert!(!store.is_playing());
        assert_eq!(store.current_time(), 0.0);
        assert!(!store.set_current_slide(7));
    }

    #[test]
    fn template_slide_is_added() {
        let mut store = store();
        assert!(store.add_template_slide("template-hero").is_some());
        assert_eq!(store.project().slides.len(), 2);
        assert!(store.add_template_slide("template-missing").is_none());
        assert_eq!(store.history().undo_len(), 1);
    }

    #[test]
    fn space_previews_then_pauses() {
        let mut store = store();
        store.set_current_time(2500.0);
        store.handle_shortcut(ShortcutAction::TogglePlayback, 1000.0);
        assert!(store.is_playing());
        assert_eq!(store.current_time(), 0.0);
        store.handle_shortcut(ShortcutAction::TogglePlayback, 1100.0);
        assert!(!store.is_playing());
    }

    #[test]
    fn host_actions_pass_through() {
        let mut store = store();
        assert_eq!(store.handle_shortcut(ShortcutAction::Save, 0.0), Some(HostAction::Save));
        assert_eq!(store.handle_shortcut(ShortcutAction::ZoomIn, 0.0), None);
        assert_eq!(store.zoom().percent(), 125);
        store.handle_shortcut(ShortcutAction::ToggleGuides, 0.0);
        assert!(!store.canvas_settings().show_guides);
    }

    #[test]
    fn nudge_and_duplicate() {
        let mut store = store();
        store.select_layer(Some(LayerId::intern("3")));
        store.handle_shortcut(ShortcutAction::Nudge { dx: 10, dy: -1 }, 0.0);
        let style = &store.selected_layer().unwrap().style;
        assert_eq!((style.x, style.y), (60.0, 379.0));

        let copy = store.duplicate_selected_layer().unwrap();
        assert_ne!(copy, LayerId::intern("3"));
        let style = &store.selected_layer().unwrap().style;
        assert_eq!((style.x, style.y), (80.0, 399.0));
        assert_eq!(store.current_slide().unwrap().layers.len(), 4);
    }

    #[test]
    fn failed_load_keeps_state() {
        let mut store = store();
        store.select_layer(Some(LayerId::intern("1")));
        assert!(store.load_project("{not json").is_err());
        assert!(store.load_project(r#"{"name": "no id"}"#).is_err());
        assert_eq!(store.ui().selected_layer_id, Some(LayerId::intern("1")));
        assert!(!store.history().can_undo());
    }
}
