//! Integration tests: project file → model → project file.

use pretty_assertions::assert_eq;
use serde_json::Value;
use slider_core::{
    BackgroundKind, ExportFormat, ExportOptions, FontWeight, LayerId, LayerKind, ProjectError,
    ShapeKind, SlideId, export_project, load_project, save_project,
};

const TWO_SLIDES: &str = include_str!("fixtures/two_slides.json");

#[test]
fn fixture_loads_with_all_fields() {
    let project = load_project(TWO_SLIDES).unwrap();
    assert_eq!(project.name, "Launch Deck");
    assert_eq!(project.slides.len(), 2);
    assert!(!project.settings.autoplay);
    assert_eq!(project.settings.transition_type, "fade");

    let intro = project.slide(0).unwrap();
    assert_eq!(intro.id, SlideId::intern("intro"));
    assert_eq!(intro.background.kind, BackgroundKind::Color);

    let headline = intro.layer(LayerId::intern("headline")).unwrap();
    assert_eq!(headline.style.font_weight, Some(FontWeight::Number(800)));
    assert_eq!(headline.style.extra["kerning"], "optical");

    let badge = intro.layer(LayerId::intern("badge")).unwrap();
    assert_eq!(badge.kind, LayerKind::Shape);
    assert_eq!(badge.shape_type, Some(ShapeKind::Circle));
    assert_eq!(badge.animation.end(), 5500.0);

    assert_eq!(project.slide(1).unwrap().background.kind, BackgroundKind::Image);
}

#[test]
fn save_preserves_unknown_style_fields() {
    let project = load_project(TWO_SLIDES).unwrap();
    let saved = save_project(&project).unwrap();
    assert_eq!(saved.file_name, "Launch Deck.json");

    let original: Value = serde_json::from_str(TWO_SLIDES).unwrap();
    let written: Value = serde_json::from_str(&saved.json).unwrap();
    assert_eq!(
        written["slides"][0]["layers"][0]["style"]["textShadow"],
        original["slides"][0]["layers"][0]["style"]["textShadow"]
    );
    assert_eq!(load_project(&saved.json).unwrap(), project);
}

#[test]
fn negative_slide_duration_is_rejected() {
    let broken = TWO_SLIDES.replace("\"duration\": 3000", "\"duration\": -1");
    match load_project(&broken) {
        Err(ProjectError::InvalidSlideDuration { slide, duration }) => {
            assert_eq!(slide, SlideId::intern("outro"));
            assert_eq!(duration, -1.0);
        }
        other => panic!("expected InvalidSlideDuration, got {other:?}"),
    }
}

#[test]
fn exports_respect_project_settings() {
    let project = load_project(TWO_SLIDES).unwrap();
    let html = export_project(&project, ExportFormat::Html, &ExportOptions::default())
        .unwrap()
        .content;
    assert!(html.contains("class=\"navigation nav-prev\""));
    assert!(!html.contains("class=\"pagination-dot"));
    assert!(html.contains("data-animation=\"bounce-in\""));
    assert!(html.contains("font-weight: 800"));

    let css = export_project(&project, ExportFormat::Css, &ExportOptions::default())
        .unwrap()
        .content;
    assert!(css.contains("@keyframes bounce-out-keyframes"));
}
