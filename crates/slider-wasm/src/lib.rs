//! WASM bridge for Slider Studio: exposes the editor store to the browser shell.
//!
//! Compiled via `wasm-pack build --target web`. Queries return JSON strings;
//! fallible calls return `{"ok":true,...}` or `{"ok":false,"error":"..."}`
//! and leave the editor untouched on failure.

use kurbo::Point;
use serde_json::{Value, json};
use slider_core::{ExportFormat, ExportOptions, LayerId, LayerKind, Project, SlideId, presets, templates};
use slider_editor::playback::{FrameHandle, FrameScheduler};
use slider_editor::shortcuts::{ShortcutAction, ShortcutMap};
use slider_editor::store::{EditorStore, HostAction};
use slider_editor::timeline::{self, Timing};
use slider_editor::{EditorConfig, Tick};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

// ─── Frame scheduling ────────────────────────────────────────────────────

/// Frame scheduler backed by two JS callbacks, normally wrappers around
/// `requestAnimationFrame` and `cancelAnimationFrame`. The request callback
/// must return the numeric handle; the shell calls
/// [`SliderCanvas::on_frame`] with that handle when the frame fires.
pub struct JsFrameScheduler {
    request: js_sys::Function,
    cancel: js_sys::Function,
}

impl JsFrameScheduler {
    pub fn new(request: js_sys::Function, cancel: js_sys::Function) -> Self {
        Self { request, cancel }
    }
}

impl FrameScheduler for JsFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self.request.call0(&JsValue::NULL) {
            Ok(handle) => {
                let handle = handle.as_f64().map(|h| FrameHandle(h as u32));
                if handle.is_none() {
                    log::error!("requestAnimationFrame returned a non-numeric handle");
                }
                handle
            }
            Err(err) => {
                log::error!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.cancel.call1(&JsValue::NULL, &JsValue::from(handle.0)) {
            log::error!("cancelAnimationFrame failed: {err:?}");
        }
    }
}

// ─── Canvas controller ───────────────────────────────────────────────────

/// The WASM-facing editor handle. All interaction from the browser shell
/// goes through this struct.
#[wasm_bindgen]
pub struct SliderCanvas {
    store: EditorStore<JsFrameScheduler>,
}

#[wasm_bindgen]
impl SliderCanvas {
    /// Open the welcome project with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(request_frame: js_sys::Function, cancel_frame: js_sys::Function) -> Self {
        console_error_panic_hook_setup();
        let scheduler = JsFrameScheduler::new(request_frame, cancel_frame);
        Self {
            store: EditorStore::new(Project::sample(), scheduler, EditorConfig::default()),
        }
    }

    /// Like `new`, with an `EditorConfig` JSON document. Missing keys keep
    /// their defaults.
    pub fn with_config(
        config_json: &str,
        request_frame: js_sys::Function,
        cancel_frame: js_sys::Function,
    ) -> Result<SliderCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let scheduler = JsFrameScheduler::new(request_frame, cancel_frame);
        Ok(Self {
            store: EditorStore::new(Project::sample(), scheduler, config),
        })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The current project as JSON.
    pub fn get_project_json(&self) -> String {
        serde_json::to_string(self.store.project()).unwrap_or_else(|e| error_json(&e.to_string()))
    }

    /// Selection, playhead, zoom, canvas toggles and history flags.
    pub fn get_ui_state(&self) -> String {
        ui_state_json(&self.store).to_string()
    }

    /// Phase of every layer on the current slide at the playhead.
    pub fn get_layer_states(&self) -> String {
        serde_json::to_string(&self.store.layer_states()).unwrap_or_else(|e| error_json(&e.to_string()))
    }

    /// Ruler markers and block spans for the current slide's timeline.
    pub fn get_timeline(&self) -> String {
        timeline_json(&self.store).to_string()
    }

    // ─── Persistence and export ──────────────────────────────────────────

    pub fn load_project(&mut self, text: &str) -> String {
        match self.store.load_project(text) {
            Ok(()) => ok_json(json!({})),
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// `{"ok":true,"fileName":"…","json":"…"}` for the shell to download.
    pub fn save_project(&self) -> String {
        match self.store.save_project() {
            Ok(saved) => ok_json(json!({ "fileName": saved.file_name, "json": saved.json })),
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Export as `"html"`, `"css"` or `"json"`. `options_json` may be empty.
    pub fn export(&self, format: &str, options_json: &str) -> String {
        let (format, options) = match parse_export_request(format, options_json) {
            Ok(request) => request,
            Err(e) => return error_json(&e),
        };
        match self.store.export(format, &options) {
            Ok(file) => ok_json(json!({
                "fileName": file.file_name,
                "mimeType": file.mime_type,
                "content": file.content,
            })),
            Err(e) => error_json(&e.to_string()),
        }
    }

    // ─── Slides and layers ───────────────────────────────────────────────

    pub fn add_slide(&mut self) -> String {
        self.store.add_slide().as_str().to_string()
    }

    /// Returns the new slide id, or `""` for an unknown template.
    pub fn add_template_slide(&mut self, template_id: &str) -> String {
        self.store
            .add_template_slide(template_id)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_slide(&mut self, slide_id: &str) -> bool {
        self.store.delete_slide(SlideId::intern(slide_id))
    }

    pub fn set_current_slide(&mut self, index: usize) -> bool {
        self.store.set_current_slide(index)
    }

    pub fn set_slide_duration(&mut self, duration: f64) -> bool {
        self.store.set_slide_duration(duration)
    }

    /// Add a `text`, `image`, `button` or `shape` layer. Returns its id or `""`.
    pub fn add_layer(&mut self, kind: &str) -> String {
        LayerKind::parse(kind)
            .and_then(|kind| self.store.add_layer(kind))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_selected_layer(&mut self) -> bool {
        self.store.delete_selected_layer()
    }

    pub fn duplicate_selected_layer(&mut self) -> String {
        self.store
            .duplicate_selected_layer()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select a layer by id; `""` clears the selection.
    pub fn select_layer(&mut self, layer_id: &str) {
        let id = (!layer_id.is_empty()).then(|| LayerId::intern(layer_id));
        self.store.select_layer(id);
    }

    /// Set a property of the selected layer, e.g. `("style.x", "120")`.
    pub fn update_property(&mut self, path: &str, value_json: &str) -> String {
        let value: Value = match serde_json::from_str(value_json) {
            Ok(v) => v,
            Err(e) => return error_json(&format!("invalid value: {e}")),
        };
        match self.store.update_property(path, value) {
            Ok(()) => ok_json(json!({})),
            Err(e) => error_json(&e.to_string()),
        }
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo().is_some()
    }

    // ─── Playback ────────────────────────────────────────────────────────

    pub fn play(&mut self, now: f64) {
        self.store.play(now);
    }

    pub fn pause(&mut self) {
        self.store.pause();
    }

    pub fn toggle_playback(&mut self, now: f64) {
        self.store.toggle_playback(now);
    }

    pub fn preview(&mut self, now: f64) {
        self.store.preview(now);
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn set_current_time(&mut self, t: f64) {
        self.store.set_current_time(t);
    }

    pub fn scrub(&mut self, pointer_x: f64, container_width: f64) {
        self.store.scrub(pointer_x, container_width);
    }

    /// Frame callback for the request `handle`. Returns
    /// `{"playing":bool,"time":ms}`.
    pub fn on_frame(&mut self, handle: u32, now: f64) -> String {
        tick_json(self.store.on_frame(FrameHandle(handle), now), &self.store).to_string()
    }

    // ─── Timeline drag ───────────────────────────────────────────────────

    /// Pointer-down on a block. `offset_px` is measured from the block's
    /// left edge and picks the body or an edge handle.
    pub fn begin_timeline_drag(
        &mut self,
        layer_id: &str,
        offset_px: f64,
        block_width_px: f64,
        pointer_x: f64,
    ) -> bool {
        self.store
            .begin_timeline_drag_at(LayerId::intern(layer_id), offset_px, block_width_px, pointer_x)
    }

    /// Returns `true` when the block moved.
    pub fn timeline_drag_to(&mut self, pointer_x: f64, container_width: f64) -> bool {
        self.store.timeline_drag_to(pointer_x, container_width).is_some()
    }

    /// Tooltip for the block being dragged, or `null`.
    pub fn get_timeline_tooltip(&self) -> String {
        serde_json::to_string(&self.store.timeline_tooltip()).unwrap_or_else(|e| error_json(&e.to_string()))
    }

    pub fn end_timeline_drag(&mut self) -> bool {
        self.store.end_timeline_drag().is_some()
    }

    // ─── Canvas drag ─────────────────────────────────────────────────────

    pub fn begin_canvas_drag(
        &mut self,
        layer_id: &str,
        pointer_x: f64,
        pointer_y: f64,
        origin_x: f64,
        origin_y: f64,
    ) -> bool {
        self.store.begin_canvas_drag(
            LayerId::intern(layer_id),
            Point::new(pointer_x, pointer_y),
            Point::new(origin_x, origin_y),
        )
    }

    pub fn canvas_drag_to(&mut self, pointer_x: f64, pointer_y: f64, origin_x: f64, origin_y: f64) -> bool {
        self.store
            .canvas_drag_to(Point::new(pointer_x, pointer_y), Point::new(origin_x, origin_y))
            .is_some()
    }

    /// Guide lines to draw, or `null` when hidden or idle.
    pub fn get_guides(&self) -> String {
        serde_json::to_string(&self.store.canvas_guides()).unwrap_or_else(|e| error_json(&e.to_string()))
    }

    pub fn end_canvas_drag(&mut self) -> bool {
        self.store.end_canvas_drag()
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn set_zoom(&mut self, factor: f64) {
        self.store.set_zoom(factor);
    }

    pub fn set_grid_size(&mut self, size: f64) {
        self.store.set_grid_size(size);
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<action_name>","host":"save"|"export"|"showHelp"|null}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool, now: f64) -> String {
        handle_key_json(&mut self.store, key, ctrl, shift, alt, meta, now).to_string()
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn ok_json(mut fields: Value) -> String {
    if let Value::Object(map) = &mut fields {
        map.insert("ok".into(), Value::Bool(true));
    }
    fields.to_string()
}

fn error_json(message: &str) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

fn parse_export_request(format: &str, options_json: &str) -> Result<(ExportFormat, ExportOptions), String> {
    let format: ExportFormat = serde_json::from_value(Value::String(format.to_ascii_lowercase()))
        .map_err(|_| format!("unknown export format {format:?}"))?;
    let options = if options_json.trim().is_empty() {
        ExportOptions::default()
    } else {
        serde_json::from_str(options_json).map_err(|e| format!("invalid export options: {e}"))?
    };
    Ok((format, options))
}

fn ui_state_json<S: FrameScheduler>(store: &EditorStore<S>) -> Value {
    json!({
        "currentSlideIndex": store.ui().current_slide_index,
        "selectedLayerId": store.selected_layer().map(|l| l.id),
        "isPlaying": store.is_playing(),
        "currentTime": store.current_time(),
        "zoom": store.zoom().factor(),
        "zoomPercent": store.zoom().percent(),
        "canvas": store.canvas_settings(),
        "canUndo": store.history().can_undo(),
        "canRedo": store.history().can_redo(),
    })
}

fn timeline_json<S: FrameScheduler>(store: &EditorStore<S>) -> Value {
    let duration = store.slide_duration();
    let blocks: Vec<Value> = store
        .current_slide()
        .map(|slide| {
            slide
                .layers
                .iter()
                .map(|layer| {
                    let span = timeline::block_span(Timing::from(&layer.animation), duration);
                    json!({
                        "layerId": layer.id,
                        "leftPercent": span.left_percent,
                        "widthPercent": span.width_percent,
                        "label": timeline::format_seconds(layer.animation.duration),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    json!({
        "duration": duration,
        "markers": timeline::time_markers(duration),
        "blocks": blocks,
    })
}

fn tick_json<S: FrameScheduler>(tick: Tick, store: &EditorStore<S>) -> Value {
    let finished = matches!(tick, Tick::Finished(_));
    json!({
        "playing": store.is_playing(),
        "finished": finished,
        "time": store.current_time(),
    })
}

fn handle_key_json<S: FrameScheduler>(
    store: &mut EditorStore<S>,
    key: &str,
    ctrl: bool,
    shift: bool,
    alt: bool,
    meta: bool,
    now: f64,
) -> Value {
    let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
        return json!({ "changed": false, "action": "none", "host": null });
    };
    let before = store.history().snapshot();
    let host = store.handle_shortcut(action, now);
    let changed = !Arc::ptr_eq(&before, &store.history().snapshot());
    json!({
        "changed": changed,
        "action": action_to_name(action),
        "host": host.map(host_action_name),
    })
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Nudge { .. } => "nudge",
        ShortcutAction::AddLayer(_) => "addLayer",
        ShortcutAction::NewSlide => "newSlide",
        ShortcutAction::TogglePlayback => "togglePlayback",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomReset => "zoomReset",
        ShortcutAction::ToggleGrid => "toggleGrid",
        ShortcutAction::ToggleRulers => "toggleRulers",
        ShortcutAction::ToggleGuides => "toggleGuides",
        ShortcutAction::ToggleSnap => "toggleSnap",
        ShortcutAction::Save => "save",
        ShortcutAction::Export => "export",
        ShortcutAction::ShowHelp => "showHelp",
        ShortcutAction::Deselect => "deselect",
    }
}

fn host_action_name(action: HostAction) -> &'static str {
    match action {
        HostAction::Save => "save",
        HostAction::Export => "export",
        HostAction::ShowHelp => "showHelp",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Slider WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Validate a project file. Returns JSON: `{"ok":true,"slides":n}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_project(text: &str) -> String {
    match slider_core::load_project(text) {
        Ok(project) => ok_json(json!({ "slides": project.slides.len(), "layers": project.layer_count() })),
        Err(e) => error_json(&e.to_string()),
    }
}

/// The animation preset catalog for the animation panel's pickers.
#[wasm_bindgen]
pub fn animation_presets() -> String {
    let presets: Vec<Value> = presets::all()
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "kind": match p.kind {
                    presets::PresetKind::Entrance => "entrance",
                    presets::PresetKind::Exit => "exit",
                },
                "duration": p.duration,
                "easing": p.easing,
                "className": p.class_name(),
            })
        })
        .collect();
    Value::Array(presets).to_string()
}

/// Available slide templates as `[{"id","name","layers"}]`.
#[wasm_bindgen]
pub fn slide_templates() -> String {
    let list: Vec<Value> = templates::all()
        .iter()
        .map(|t| json!({ "id": t.id, "name": t.name, "layers": t.layers.len() }))
        .collect();
    Value::Array(list).to_string()
}
