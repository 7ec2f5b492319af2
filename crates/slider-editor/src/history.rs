//! Undo/redo history of whole-project snapshots.
//!
//! Every structural edit replaces `present` with a new `Arc<Project>`; the
//! old one moves to `past`. Snapshots share untouched slides and layers, so
//! keeping full states costs one spine clone per edit, not a deep copy.
//!
//! Drag gestures use **gesture batching**: `begin_gesture` remembers the
//! pre-gesture snapshot, commits inside the gesture only replace `present`
//! (live preview), and `end_gesture` records the whole drag as one undo step.

use slider_core::Project;
use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

/// A project state plus the label of the edit that produced it.
#[derive(Debug, Clone)]
struct Entry {
    project: Arc<Project>,
    label: String,
}

#[derive(Debug)]
struct Gesture {
    before: Entry,
    label: String,
}

#[derive(Debug)]
pub struct History {
    /// Oldest first; `past.last()` is the state right before `present`.
    past: Vec<Entry>,
    present: Entry,
    /// Nearest first; `future.front()` is what `redo` restores.
    future: VecDeque<Entry>,
    /// Maximum undo depth. `None` keeps everything.
    max_depth: Option<usize>,
    /// Gesture nesting depth (0 = no gesture).
    gesture_depth: usize,
    gesture: Option<Gesture>,
}

impl History {
    pub fn new(project: impl Into<Arc<Project>>, max_depth: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            present: Entry {
                project: project.into(),
                label: "open project".into(),
            },
            future: VecDeque::new(),
            max_depth,
            gesture_depth: 0,
            gesture: None,
        }
    }

    pub fn present(&self) -> &Project {
        &self.present.project
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<Project> {
        Arc::clone(&self.present.project)
    }

    /// Make `next` the present state.
    ///
    /// Outside a gesture the old present is pushed onto `past` and `future`
    /// is discarded. Inside a gesture only `present` changes.
    pub fn commit(&mut self, next: impl Into<Arc<Project>>, label: &str) {
        let next = next.into();
        if let Some(gesture) = &self.gesture {
            log::trace!("gesture preview: {}", gesture.label);
            self.present = Entry {
                project: next,
                label: gesture.label.clone(),
            };
            return;
        }

        log::debug!("commit: {label}");
        let old = mem::replace(
            &mut self.present,
            Entry {
                project: next,
                label: label.to_string(),
            },
        );
        self.push_past(old);
        self.future.clear();
    }

    /// Restore the previous state. Returns the label of the undone edit.
    pub fn undo(&mut self) -> Option<String> {
        self.finish_gesture();
        let previous = self.past.pop()?;
        let undone = mem::replace(&mut self.present, previous);
        log::debug!("undo: {}", undone.label);
        let label = undone.label.clone();
        self.future.push_front(undone);
        Some(label)
    }

    /// Re-apply the most recently undone state. Returns its label.
    pub fn redo(&mut self) -> Option<String> {
        self.finish_gesture();
        let next = self.future.pop_front()?;
        let old = mem::replace(&mut self.present, next);
        self.push_past(old);
        log::debug!("redo: {}", self.present.label);
        Some(self.present.label.clone())
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Drop all history and start over from `project`.
    pub fn clear(&mut self, project: impl Into<Arc<Project>>) {
        self.past.clear();
        self.future.clear();
        self.gesture = None;
        self.gesture_depth = 0;
        self.present = Entry {
            project: project.into(),
            label: "open project".into(),
        };
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Start a gesture group. Nested calls join the outermost gesture.
    pub fn begin_gesture(&mut self, label: &str) {
        if self.gesture_depth == 0 {
            self.gesture = Some(Gesture {
                before: self.present.clone(),
                label: label.to_string(),
            });
        }
        self.gesture_depth += 1;
    }

    /// End a gesture group. When the outermost gesture closes and the
    /// project changed, the pre-gesture state becomes one undo step.
    pub fn end_gesture(&mut self) {
        if self.gesture_depth == 0 {
            return;
        }
        self.gesture_depth -= 1;
        if self.gesture_depth > 0 {
            return;
        }
        let Some(gesture) = self.gesture.take() else {
            return;
        };

        let changed = !Arc::ptr_eq(&gesture.before.project, &self.present.project)
            && *gesture.before.project != *self.present.project;
        if changed {
            log::debug!("commit gesture: {}", gesture.label);
            self.push_past(gesture.before);
            self.future.clear();
        } else {
            // Nothing changed: keep the original snapshot so identity survives.
            self.present = gesture.before;
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_depth > 0
    }

    fn finish_gesture(&mut self) {
        if self.gesture_depth > 0 {
            log::warn!("closing unfinished gesture before history navigation");
            self.gesture_depth = 1;
            self.end_gesture();
        }
    }

    fn push_past(&mut self, entry: Entry) {
        self.past.push(entry);
        if self.max_depth.is_some_and(|max| self.past.len() > max) {
            self.past.remove(0);
        }
    }
}
