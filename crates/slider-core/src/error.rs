//! Error types for the persistence and property-update boundaries.

use crate::id::SlideId;
use thiserror::Error;

/// A project file that could not be loaded or written.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid project JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("project file must contain a JSON object")]
    NotAnObject,

    #[error("project file is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("project file has no slides")]
    NoSlides,

    #[error("slide `{slide}` has a non-positive duration ({duration} ms)")]
    InvalidSlideDuration { slide: SlideId, duration: f64 },

    #[error("failed to serialize project: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A `update_property` call that could not be applied to a layer.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("property path is empty")]
    EmptyPath,

    #[error("unknown property section `{0}` (expected `style` or `animation`)")]
    UnknownSection(String),

    #[error("unknown layer property `{0}`")]
    UnknownField(String),

    #[error("invalid value for `{path}`: {source}")]
    InvalidValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("layer not found")]
    LayerNotFound,

    #[error("no layer is selected")]
    NoSelection,
}
