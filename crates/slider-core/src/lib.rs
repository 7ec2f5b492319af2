pub mod error;
pub mod export;
pub mod id;
pub mod model;
pub mod persist;
pub mod presets;
pub mod templates;
pub mod update;

pub use error::{ProjectError, UpdateError};
pub use export::{ExportFormat, ExportOptions, ExportedFile, export_project};
pub use id::{LayerId, ProjectId, SlideId};
pub use model::*;
pub use persist::{SavedProject, load_project, save_project};
pub use presets::{AnimationPreset, PresetKind};
pub use update::{PropertyPath, apply_property};
