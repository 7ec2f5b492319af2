//! Property-path updates, the single entry point the property panels use.
//!
//! A path is either a top-level layer field (`content`, `type`, `shapeType`)
//! or one field of a sub-object (`style.fontSize`, `animation.delay`). The
//! addressed sub-object is merged shallowly and re-validated through serde,
//! so a value of the wrong shape is rejected instead of stored.

use crate::error::UpdateError;
use crate::model::Layer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

const ANIMATION_FIELDS: &[&str] = &["entrance", "exit", "duration", "delay", "easing"];
const LAYER_FIELDS: &[&str] = &["content", "type", "shapeType", "style", "animation"];

/// A parsed dot path into a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    /// `style.<field>`
    Style(String),
    /// `animation.<field>`
    Animation(String),
    /// A top-level layer field.
    Layer(String),
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, UpdateError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(UpdateError::EmptyPath);
        }
        let Some((section, field)) = path.split_once('.') else {
            if !LAYER_FIELDS.contains(&path) {
                return Err(UpdateError::UnknownField(path.to_string()));
            }
            return Ok(PropertyPath::Layer(path.to_string()));
        };
        if field.is_empty() || field.contains('.') {
            return Err(UpdateError::UnknownField(path.to_string()));
        }
        match section {
            "style" => Ok(PropertyPath::Style(field.to_string())),
            "animation" if ANIMATION_FIELDS.contains(&field) => {
                Ok(PropertyPath::Animation(field.to_string()))
            }
            "animation" => Err(UpdateError::UnknownField(path.to_string())),
            other => Err(UpdateError::UnknownSection(other.to_string())),
        }
    }

    /// Whether this path edits the layer's timeline interval.
    pub fn touches_timing(&self) -> bool {
        match self {
            PropertyPath::Animation(field) => field == "delay" || field == "duration",
            PropertyPath::Layer(field) => field == "animation",
            PropertyPath::Style(_) => false,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Style(field) => write!(f, "style.{field}"),
            PropertyPath::Animation(field) => write!(f, "animation.{field}"),
            PropertyPath::Layer(field) => f.write_str(field),
        }
    }
}

/// Return a copy of `layer` with `path` set to `value`.
///
/// Style geometry is normalized (`x, y >= 0`, positive size, opacity in
/// `[0, 1]`). Timing is left as given; clamping it needs the owning slide.
pub fn apply_property(layer: &Layer, path: &PropertyPath, value: Value) -> Result<Layer, UpdateError> {
    let mut next = layer.clone();
    match path {
        PropertyPath::Style(field) => {
            next.style = merge_field(&layer.style, field, value, path)?.normalized();
        }
        PropertyPath::Animation(field) => {
            next.animation = merge_field(&layer.animation, field, value, path)?;
        }
        PropertyPath::Layer(field) => {
            next = merge_field(layer, field, value, path)?;
            next.id = layer.id;
            next.style = next.style.normalized();
        }
    }
    Ok(next)
}

fn merge_field<T>(current: &T, field: &str, value: Value, path: &PropertyPath) -> Result<T, UpdateError>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |source| UpdateError::InvalidValue {
        path: path.to_string(),
        source,
    };
    let mut object = serde_json::to_value(current).map_err(invalid)?;
    if let Some(map) = object.as_object_mut() {
        map.insert(field.to_string(), value);
    }
    serde_json::from_value(object).map_err(invalid)
}
