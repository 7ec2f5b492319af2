//! Static catalog of entrance/exit animation presets.
//!
//! Layers reference presets by display name (`"Slide In Left"`); the
//! catalog maps that name to CSS keyframes, a default duration and easing,
//! and the utility class applied while the animation plays.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetKind {
    Entrance,
    Exit,
}

/// Read-only preset entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPreset {
    pub name: &'static str,
    pub kind: PresetKind,
    /// Body of a CSS `@keyframes` rule.
    pub keyframes: &'static str,
    /// Default duration (ms).
    pub duration: f64,
    pub easing: &'static str,
}

const SLIDE_EASE: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";
const SPRING_EASE: &str = "cubic-bezier(0.34, 1.56, 0.64, 1)";
const EXIT_EASE: &str = "cubic-bezier(0.55, 0.06, 0.68, 0.19)";
const ZOOM_EASE: &str = "cubic-bezier(0.55, 0.055, 0.675, 0.19)";
const BOUNCE_EASE: &str = "cubic-bezier(0.215, 0.61, 0.355, 1)";

const fn preset(
    name: &'static str,
    kind: PresetKind,
    keyframes: &'static str,
    duration: f64,
    easing: &'static str,
) -> AnimationPreset {
    AnimationPreset {
        name,
        kind,
        keyframes,
        duration,
        easing,
    }
}

use PresetKind::{Entrance, Exit};

static PRESETS: &[AnimationPreset] = &[
    // ─── Entrance ───
    preset(
        "Fade In",
        Entrance,
        "from { opacity: 0; } to { opacity: 1; }",
        600.0,
        "ease-out",
    ),
    preset(
        "Slide In Left",
        Entrance,
        "from { opacity: 0; transform: translateX(-100px); } to { opacity: 1; transform: translateX(0); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Slide In Right",
        Entrance,
        "from { opacity: 0; transform: translateX(100px); } to { opacity: 1; transform: translateX(0); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Slide In Up",
        Entrance,
        "from { opacity: 0; transform: translateY(50px); } to { opacity: 1; transform: translateY(0); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Slide In Down",
        Entrance,
        "from { opacity: 0; transform: translateY(-50px); } to { opacity: 1; transform: translateY(0); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Scale In",
        Entrance,
        "from { opacity: 0; transform: scale(0.8); } to { opacity: 1; transform: scale(1); }",
        600.0,
        SPRING_EASE,
    ),
    preset(
        "Scale In Big",
        Entrance,
        "from { opacity: 0; transform: scale(1.3); } to { opacity: 1; transform: scale(1); }",
        600.0,
        SPRING_EASE,
    ),
    preset(
        "Rotate In",
        Entrance,
        "from { opacity: 0; transform: rotate(-10deg) scale(0.9); } to { opacity: 1; transform: rotate(0deg) scale(1); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Flip In X",
        Entrance,
        "from { opacity: 0; transform: perspective(400px) rotateX(-90deg); } to { opacity: 1; transform: perspective(400px) rotateX(0deg); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Flip In Y",
        Entrance,
        "from { opacity: 0; transform: perspective(400px) rotateY(-90deg); } to { opacity: 1; transform: perspective(400px) rotateY(0deg); }",
        800.0,
        SLIDE_EASE,
    ),
    preset(
        "Bounce In",
        Entrance,
        "0% { opacity: 0; transform: scale3d(0.3, 0.3, 0.3); } \
         20% { transform: scale3d(1.1, 1.1, 1.1); } \
         40% { transform: scale3d(0.9, 0.9, 0.9); } \
         60% { opacity: 1; transform: scale3d(1.03, 1.03, 1.03); } \
         80% { transform: scale3d(0.97, 0.97, 0.97); } \
         100% { opacity: 1; transform: scale3d(1, 1, 1); }",
        1000.0,
        BOUNCE_EASE,
    ),
    preset(
        "Zoom In",
        Entrance,
        "from { opacity: 0; transform: scale3d(0.1, 0.1, 0.1); } 50% { opacity: 1; } to { transform: scale3d(1, 1, 1); }",
        800.0,
        ZOOM_EASE,
    ),
    // ─── Exit ───
    preset(
        "Fade Out",
        Exit,
        "from { opacity: 1; } to { opacity: 0; }",
        400.0,
        "ease-in",
    ),
    preset(
        "Slide Out Left",
        Exit,
        "from { opacity: 1; transform: translateX(0); } to { opacity: 0; transform: translateX(-100px); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Slide Out Right",
        Exit,
        "from { opacity: 1; transform: translateX(0); } to { opacity: 0; transform: translateX(100px); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Slide Out Up",
        Exit,
        "from { opacity: 1; transform: translateY(0); } to { opacity: 0; transform: translateY(-50px); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Slide Out Down",
        Exit,
        "from { opacity: 1; transform: translateY(0); } to { opacity: 0; transform: translateY(50px); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Scale Out",
        Exit,
        "from { opacity: 1; transform: scale(1); } to { opacity: 0; transform: scale(0.8); }",
        400.0,
        EXIT_EASE,
    ),
    preset(
        "Zoom Out",
        Exit,
        "from { opacity: 1; } 50% { opacity: 0; transform: scale3d(0.3, 0.3, 0.3); } to { opacity: 0; transform: scale3d(0.1, 0.1, 0.1); }",
        600.0,
        ZOOM_EASE,
    ),
    preset(
        "Rotate Out",
        Exit,
        "from { opacity: 1; transform: rotate(0deg) scale(1); } to { opacity: 0; transform: rotate(10deg) scale(0.9); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Flip Out X",
        Exit,
        "from { opacity: 1; transform: perspective(400px) rotateX(0deg); } to { opacity: 0; transform: perspective(400px) rotateX(90deg); }",
        600.0,
        EXIT_EASE,
    ),
    preset(
        "Bounce Out",
        Exit,
        "20% { transform: scale3d(0.9, 0.9, 0.9); } \
         50%, 55% { opacity: 1; transform: scale3d(1.1, 1.1, 1.1); } \
         100% { opacity: 0; transform: scale3d(0.3, 0.3, 0.3); }",
        800.0,
        BOUNCE_EASE,
    ),
];

/// Every preset, entrances first.
pub fn all() -> &'static [AnimationPreset] {
    PRESETS
}

pub fn find(name: &str) -> Option<&'static AnimationPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

pub fn is_valid(name: &str) -> bool {
    find(name).is_some()
}

/// Preset names, optionally restricted to one kind.
pub fn names(kind: Option<PresetKind>) -> impl Iterator<Item = &'static str> {
    PRESETS
        .iter()
        .filter(move |p| kind.is_none_or(|k| p.kind == k))
        .map(|p| p.name)
}

/// CSS utility class for a preset name: `"Slide In Left"` → `slide-in-left`.
pub fn class_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl AnimationPreset {
    pub fn class_name(&self) -> String {
        class_name(self.name)
    }

    /// `@keyframes` rule plus the utility class that plays it once.
    pub fn css(&self) -> String {
        let class = self.class_name();
        format!(
            "@keyframes {class}-keyframes {{ {} }}\n.{class} {{ animation: {class}-keyframes {}ms {} forwards; }}\n",
            self.keyframes, self.duration, self.easing
        )
    }
}

/// Stylesheet covering the given presets, in order, skipping duplicates.
pub fn stylesheet<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut css = String::new();
    for name in names {
        let Some(p) = find(name) else {
            log::warn!("unknown animation preset `{name}` skipped");
            continue;
        };
        if seen.contains(&p.name) {
            continue;
        }
        seen.push(p.name);
        let _ = writeln!(css, "{}", p.css());
    }
    css
}
