//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, so the
//! bindings are shared between the WASM bridge and native hosts.

use slider_core::LayerKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    /// Remove the selected layer.
    Delete,
    Duplicate,
    /// Move the selected layer by whole canvas px.
    Nudge { dx: i32, dy: i32 },
    AddLayer(LayerKind),
    NewSlide,

    // ── Playback ──
    /// Space: preview from 0, or pause a running preview.
    TogglePlayback,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleGrid,
    ToggleRulers,
    ToggleGuides,
    ToggleSnap,

    // ── Host dialogs ──
    Save,
    Export,
    ShowHelp,
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// `meta` (⌘) and `ctrl` are interchangeable so the same bindings work on
/// macOS and elsewhere.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                ";" | ":" => Some(ShortcutAction::ToggleSnap),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::Save),
                "e" | "E" => Some(ShortcutAction::Export),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "n" | "N" => Some(ShortcutAction::NewSlide),
                "t" | "T" => Some(ShortcutAction::AddLayer(LayerKind::Text)),
                "b" | "B" => Some(ShortcutAction::AddLayer(LayerKind::Button)),
                "i" | "I" => Some(ShortcutAction::AddLayer(LayerKind::Image)),
                "g" | "G" => Some(ShortcutAction::ToggleGrid),
                "r" | "R" => Some(ShortcutAction::ToggleRulers),
                ";" => Some(ShortcutAction::ToggleGuides),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                _ => None,
            };
        }

        let step = if shift { 10 } else { 1 };
        match key {
            "ArrowLeft" => Some(ShortcutAction::Nudge { dx: -step, dy: 0 }),
            "ArrowRight" => Some(ShortcutAction::Nudge { dx: step, dy: 0 }),
            "ArrowUp" => Some(ShortcutAction::Nudge { dx: 0, dy: -step }),
            "ArrowDown" => Some(ShortcutAction::Nudge { dx: 0, dy: step }),
            _ if shift => None,
            " " => Some(ShortcutAction::TogglePlayback),
            "Delete" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "F1" => Some(ShortcutAction::ShowHelp),
            _ => None,
        }
    }
}
