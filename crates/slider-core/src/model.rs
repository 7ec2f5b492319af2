//! Project data model: Project → Slides → Layers → {style, animation}.
//!
//! The tree is immutable by convention. Slides and layers sit behind `Arc`
//! so a new project snapshot shares every untouched branch with the one it
//! was derived from; edits go through [`Project::slide_mut`] and
//! [`Slide::layer_mut`], which clone only the path being written
//! (`Arc::make_mut`). History snapshots therefore never observe a later edit.
//!
//! The serde shape matches the editor's JSON project files (camelCase keys,
//! `type` tags).

use crate::id::{LayerId, ProjectId, SlideId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shortest allowed animation duration (ms).
pub const MIN_ANIMATION_MS: f64 = 100.0;

/// Duration given to newly added slides (ms).
pub const DEFAULT_SLIDE_DURATION_MS: f64 = 5000.0;

/// Timeline length shown when no slide is active (ms).
pub const FALLBACK_TIMELINE_MS: f64 = 15000.0;

const DEFAULT_GRADIENT: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

// ─── Project ─────────────────────────────────────────────────────────────

/// Root aggregate. Owned by the history engine's `present` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub slides: Vec<Arc<Slide>>,
    #[serde(default)]
    pub settings: ProjectSettings,
}

/// Playback settings carried into exported sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_slides: bool,
    pub navigation: bool,
    pub pagination: bool,
    pub transition_type: String,
    pub transition_duration: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            loop_slides: true,
            navigation: true,
            pagination: true,
            transition_type: "slide".into(),
            transition_duration: 800.0,
        }
    }
}

impl Project {
    /// An empty project with a single blank slide.
    pub fn new(name: &str) -> Self {
        Self {
            id: ProjectId::generate(),
            name: name.to_string(),
            slides: vec![Arc::new(Slide::blank(1))],
            settings: ProjectSettings::default(),
        }
    }

    /// The welcome project the editor opens with.
    pub fn sample() -> Self {
        let mut title = Layer::new_of_kind(LayerKind::Text, 1);
        title.id = LayerId::intern("1");
        title.content = "Welcome to Slider Studio".into();
        title.style.x = 50.0;
        title.style.y = 200.0;
        title.style.width = 500.0;
        title.style.height = 80.0;
        title.style.font_size = Some(48.0);
        title.style.font_weight = Some(FontWeight::Name("bold".into()));
        title.style.color = Some("#ffffff".into());
        title.animation = LayerAnimation::entrance("Slide In Left", 0.0, 800.0);

        let mut subtitle = Layer::new_of_kind(LayerKind::Text, 2);
        subtitle.id = LayerId::intern("2");
        subtitle.content = "Create stunning presentations with ease".into();
        subtitle.style.x = 50.0;
        subtitle.style.y = 300.0;
        subtitle.style.width = 600.0;
        subtitle.style.height = 40.0;
        subtitle.style.font_size = Some(24.0);
        subtitle.style.color = Some("#e0e0e0".into());
        subtitle.animation = LayerAnimation::entrance("Slide In Left", 200.0, 800.0);

        let mut button = Layer::new_of_kind(LayerKind::Button, 3);
        button.id = LayerId::intern("3");
        button.content = "Get Started".into();
        button.style.x = 50.0;
        button.style.y = 380.0;
        button.style.width = 150.0;
        button.style.height = 50.0;
        button.style.color = Some("#ffffff".into());
        button.style.border_radius = Some(25.0);
        button.animation = LayerAnimation {
            exit: "Scale Out".into(),
            ..LayerAnimation::entrance("Scale In", 400.0, 600.0)
        };

        let slide = Slide {
            id: SlideId::intern("1"),
            name: "Slide 1".into(),
            background: Background::gradient("linear-gradient(135deg, #8300e9 0%, #0077ff 100%)"),
            layers: vec![Arc::new(title), Arc::new(subtitle), Arc::new(button)],
            duration: DEFAULT_SLIDE_DURATION_MS,
        };

        Self {
            id: ProjectId::intern("1"),
            name: "My Slider".into(),
            slides: vec![Arc::new(slide)],
            settings: ProjectSettings::default(),
        }
    }

    /// Slide at `index`, if any.
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index).map(Arc::as_ref)
    }

    pub fn slide_index(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    pub fn slide_by_id(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id).map(Arc::as_ref)
    }

    /// Copy-on-write access to a slide. Clones the slide only when the
    /// current `Arc` is shared with another snapshot.
    pub fn slide_mut(&mut self, id: SlideId) -> Option<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| s.id == id)
            .map(Arc::make_mut)
    }

    /// Total number of layers across all slides.
    pub fn layer_count(&self) -> usize {
        self.slides.iter().map(|s| s.layers.len()).sum()
    }
}

// ─── Slide ───────────────────────────────────────────────────────────────

/// A container of layers with its own background and local timeline.
///
/// Invariant: `duration > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub name: String,
    pub background: Background,
    pub layers: Vec<Arc<Layer>>,
    /// Upper bound of the slide's timeline (ms).
    pub duration: f64,
}

impl Slide {
    /// A blank slide named after its 1-based position.
    pub fn blank(number: usize) -> Self {
        Self {
            id: SlideId::generate(),
            name: format!("Slide {number}"),
            background: Background::gradient(DEFAULT_GRADIENT),
            layers: Vec::new(),
            duration: DEFAULT_SLIDE_DURATION_MS,
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id).map(Arc::as_ref)
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Copy-on-write access to a layer.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .map(Arc::make_mut)
    }

    /// Every layer except `id`, in paint order.
    pub fn other_layers(&self, id: LayerId) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(move |l| l.id != id)
            .map(Arc::as_ref)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Image,
    Gradient,
}

/// Slide background: a CSS color, image URL, or CSS gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub value: String,
}

impl Background {
    pub fn gradient(value: &str) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            value: value.to_string(),
        }
    }

    pub fn color(value: &str) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.to_string(),
        }
    }

    pub fn image(url: &str) -> Self {
        Self {
            kind: BackgroundKind::Image,
            value: url.to_string(),
        }
    }

    /// Value for a CSS `background` declaration. Image URLs are wrapped
    /// in `url('...')`.
    pub fn css(&self) -> String {
        match self.kind {
            BackgroundKind::Image => format!("url('{}')", self.value.replace('\'', "%27")),
            BackgroundKind::Color | BackgroundKind::Gradient => self.value.clone(),
        }
    }
}

// ─── Layer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Text,
    Image,
    Button,
    Shape,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Text => "text",
            LayerKind::Image => "image",
            LayerKind::Button => "button",
            LayerKind::Shape => "shape",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(LayerKind::Text),
            "image" => Some(LayerKind::Image),
            "button" => Some(LayerKind::Button),
            "shape" => Some(LayerKind::Shape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Star,
}

/// A positioned, styled, animatable element on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeKind>,
    pub style: LayerStyle,
    pub animation: LayerAnimation,
}

impl Layer {
    /// A freshly added layer of `kind` with the editor's default geometry.
    pub fn new_of_kind(kind: LayerKind, z_index: i32) -> Self {
        let (width, height) = match kind {
            LayerKind::Text => (200.0, 50.0),
            LayerKind::Button => (120.0, 40.0),
            LayerKind::Image | LayerKind::Shape => (100.0, 100.0),
        };
        let content = match kind {
            LayerKind::Text => "New Text",
            LayerKind::Button => "Button",
            LayerKind::Shape => "rectangle",
            LayerKind::Image => "",
        };
        let style = LayerStyle {
            x: 100.0,
            y: 100.0,
            width,
            height,
            font_size: match kind {
                LayerKind::Text => Some(24.0),
                LayerKind::Button => Some(16.0),
                _ => None,
            },
            font_weight: Some(FontWeight::Name(
                if kind == LayerKind::Button { "bold" } else { "normal" }.into(),
            )),
            color: Some("#000000".into()),
            background_color: (kind == LayerKind::Button).then(|| "#0077ff".to_string()),
            border_radius: Some(if kind == LayerKind::Button { 5.0 } else { 0.0 }),
            z_index,
            ..LayerStyle::default()
        };

        Self {
            id: LayerId::generate(),
            kind,
            content: content.into(),
            shape_type: (kind == LayerKind::Shape).then_some(ShapeKind::Rectangle),
            style,
            animation: LayerAnimation::default(),
        }
    }
}

/// CSS font weight: numeric (`700`) or keyword (`"bold"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Number(u16),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Geometry plus the visual properties the property panels edit.
///
/// Fields this model does not know about (character-panel extras such as
/// `kerning` or `textShadow`) are kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            text_align: None,
            line_height: None,
            letter_spacing: None,
            color: None,
            background_color: None,
            border_radius: None,
            opacity: 1.0,
            rotation: 0.0,
            z_index: 0,
            extra: Map::new(),
        }
    }
}

impl LayerStyle {
    /// Clamp geometry and opacity into their valid ranges:
    /// `x, y >= 0`, `width, height >= 1`, `opacity` in `[0, 1]`.
    pub fn normalized(mut self) -> Self {
        self.x = self.x.max(0.0);
        self.y = self.y.max(0.0);
        self.width = self.width.max(1.0);
        self.height = self.height.max(1.0);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }
}

// ─── Animation ───────────────────────────────────────────────────────────

/// A layer's entrance/exit presets and its interval on the slide timeline.
///
/// `delay` is the interval start and `delay + duration` its end, both in ms
/// from the start of the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerAnimation {
    pub entrance: String,
    pub exit: String,
    pub duration: f64,
    pub delay: f64,
    pub easing: String,
}

impl Default for LayerAnimation {
    fn default() -> Self {
        Self::entrance("Fade In", 0.0, 600.0)
    }
}

impl LayerAnimation {
    /// An entrance preset with a Fade Out exit and ease-out easing.
    pub fn entrance(name: &str, delay: f64, duration: f64) -> Self {
        Self {
            entrance: name.to_string(),
            exit: "Fade Out".into(),
            duration,
            delay,
            easing: "ease-out".into(),
        }
    }

    /// End of the entrance interval (ms).
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }

    /// The timing clamped so that `duration >= min_duration` and
    /// `delay + duration <= slide_duration`. Duration wins over delay:
    /// the delay is pulled back before the duration is shortened.
    pub fn clamped_to(&self, slide_duration: f64, min_duration: f64) -> Self {
        let ceiling = slide_duration.max(min_duration);
        let duration = self.duration.max(min_duration).min(ceiling);
        let delay = self.delay.max(0.0).min((slide_duration - duration).max(0.0));
        Self {
            delay,
            duration,
            ..self.clone()
        }
    }
}
