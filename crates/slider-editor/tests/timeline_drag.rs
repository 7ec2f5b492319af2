//! Integration tests: timeline block gestures through the editor store.

use slider_core::{LayerId, load_project};
use slider_editor::{EditorConfig, EditorStore, Grab, ManualScheduler, Timing};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn make_store() -> EditorStore<ManualScheduler> {
    init_logger();
    let project = load_project(include_str!("fixtures/long_slide.json")).unwrap();
    EditorStore::new(project, ManualScheduler::new(), EditorConfig::default())
}

fn timing_of(store: &EditorStore<ManualScheduler>, id: &str) -> Timing {
    let layer = store.current_slide().unwrap().layer(LayerId::intern(id)).unwrap();
    Timing::from(&layer.animation)
}

#[test]
fn move_never_passes_slide_end() {
    let mut store = make_store();
    // 1500 px timeline over 15 s: 1 px = 10 ms.
    store.begin_timeline_drag(LayerId::intern("late"), Grab::Body, 1490.0);
    for x in [1491.0, 1500.0, 1700.0, 5000.0, 1e7] {
        store.timeline_drag_to(x, 1500.0);
        let timing = timing_of(&store, "late");
        assert!(timing.delay <= 14_800.0, "x = {x}: {timing:?}");
        assert!(timing.end() <= 15_000.0, "x = {x}: {timing:?}");
    }
    assert_eq!(store.end_timeline_drag(), Some(Timing::new(14_800.0, 200.0)));
}

#[test]
fn resize_left_keeps_end_and_floors_duration() {
    let mut store = make_store();
    store.begin_timeline_drag(LayerId::intern("mid"), Grab::LeftEdge, 100.0);
    // +1000 ms.
    store.timeline_drag_to(200.0, 1500.0);
    let timing = timing_of(&store, "mid");
    assert_eq!(timing, Timing::new(1400.0, 100.0));
    assert_eq!(timing.end(), 1500.0);

    // Back past the original start: duration grows again.
    store.timeline_drag_to(50.0, 1500.0);
    assert_eq!(timing_of(&store, "mid"), Timing::new(500.0, 1000.0));
    store.end_timeline_drag();
}

#[test]
fn every_drag_result_is_on_the_grid() {
    let mut store = make_store();
    for grab in [Grab::Body, Grab::LeftEdge, Grab::RightEdge] {
        store.begin_timeline_drag(LayerId::intern("mid"), grab, 700.0);
        let mut x = 0.0;
        while x < 1500.0 {
            store.timeline_drag_to(x, 1500.0);
            let timing = timing_of(&store, "mid");
            assert_eq!(timing.delay % 100.0, 0.0, "{grab:?} at {x}: {timing:?}");
            assert_eq!(timing.duration % 100.0, 0.0, "{grab:?} at {x}: {timing:?}");
            x += 37.0;
        }
        store.end_timeline_drag();
        store.undo();
    }
    assert_eq!(timing_of(&store, "mid"), Timing::new(1000.0, 500.0));
}

#[test]
fn width_is_read_on_every_move() {
    let mut store = make_store();
    store.begin_timeline_drag(LayerId::intern("mid"), Grab::Body, 0.0);
    store.timeline_drag_to(100.0, 1500.0);
    assert_eq!(timing_of(&store, "mid").delay, 2000.0);
    // The panel was resized to half its width mid-drag.
    store.timeline_drag_to(100.0, 750.0);
    assert_eq!(timing_of(&store, "mid").delay, 3000.0);
    store.end_timeline_drag();
}

#[test]
fn grab_zone_hit_test_and_tooltip() {
    let mut store = make_store();
    // 4 px into a 50 px block hits the left handle.
    assert!(store.begin_timeline_drag_at(LayerId::intern("mid"), 4.0, 50.0, 104.0));
    store.timeline_drag_to(124.0, 1500.0);
    let tip = store.timeline_tooltip().unwrap();
    assert_eq!(tip.title, "Adjusting Start");
    assert_eq!(tip.primary, "Start: 1.2s");
    assert_eq!(tip.secondary.as_deref(), Some("Duration: 0.3s"));
    store.end_timeline_drag();
    assert!(store.timeline_tooltip().is_none());
}

#[test]
fn unknown_layer_starts_no_gesture() {
    let mut store = make_store();
    assert!(!store.begin_timeline_drag(LayerId::intern("ghost"), Grab::Body, 0.0));
    assert_eq!(store.timeline_drag_to(10.0, 1500.0), None);
    assert_eq!(store.end_timeline_drag(), None);
    assert!(!store.history().in_gesture());
}
