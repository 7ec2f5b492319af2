//! JSON load/save of whole projects.

use crate::error::ProjectError;
use crate::model::Project;
use serde_json::Value;

/// A serialized project ready to be handed to the host as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    pub file_name: String,
    pub json: String,
}

/// Pretty-printed JSON of `project`, named `{project.name}.json`.
pub fn save_project(project: &Project) -> Result<SavedProject, ProjectError> {
    let json = serde_json::to_string_pretty(project).map_err(ProjectError::Serialize)?;
    Ok(SavedProject {
        file_name: format!("{}.json", project.name),
        json,
    })
}

/// Parse a project file.
///
/// The document must be an object with `id` and at least one slide, and
/// every slide must have a positive duration. Nothing else is checked:
/// layer timing is accepted as stored.
pub fn load_project(text: &str) -> Result<Project, ProjectError> {
    let value: Value = serde_json::from_str(text).map_err(ProjectError::Parse)?;
    let Some(object) = value.as_object() else {
        return Err(ProjectError::NotAnObject);
    };
    for field in ["id", "slides"] {
        if !object.contains_key(field) {
            return Err(ProjectError::MissingField(field));
        }
    }

    let project: Project = serde_json::from_value(value).map_err(ProjectError::Parse)?;
    if project.slides.is_empty() {
        return Err(ProjectError::NoSlides);
    }
    if let Some(slide) = project
        .slides
        .iter()
        .find(|s| !(s.duration.is_finite() && s.duration > 0.0))
    {
        return Err(ProjectError::InvalidSlideDuration {
            slide: slide.id,
            duration: slide.duration,
        });
    }

    log::debug!(
        "loaded project `{}`: {} slides, {} layers",
        project.name,
        project.slides.len(),
        project.layer_count()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_then_load_keeps_project() {
        let project = Project::sample();
        let saved = save_project(&project).unwrap();
        assert_eq!(saved.file_name, "My Slider.json");
        assert!(saved.json.contains("\n  \"name\": \"My Slider\""));
        assert_eq!(load_project(&saved.json).unwrap(), project);
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(load_project("[1,2]"), Err(ProjectError::NotAnObject)));
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(matches!(
            load_project(r#"{"name":"x","slides":[]}"#),
            Err(ProjectError::MissingField("id"))
        ));
        assert!(matches!(
            load_project(r#"{"id":"p","name":"x"}"#),
            Err(ProjectError::MissingField("slides"))
        ));
    }

    #[test]
    fn rejects_empty_deck() {
        assert!(matches!(
            load_project(r#"{"id":"p","name":"x","slides":[]}"#),
            Err(ProjectError::NoSlides)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(load_project("{not json"), Err(ProjectError::Parse(_))));
    }

    #[test]
    fn rejects_zero_duration_slide() {
        let json = r##"{"id":"p","name":"x","slides":[{"id":"s","name":"S","background":{"type":"color","value":"#fff"},"layers":[],"duration":0}]}"##;
        assert!(matches!(
            load_project(json),
            Err(ProjectError::InvalidSlideDuration { duration, .. }) if duration == 0.0
        ));
    }
}
