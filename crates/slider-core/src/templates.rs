//! Built-in slide templates.
//!
//! Templates ship as a JSON asset in the project file format. Applying one
//! yields a copy with fresh slide and layer ids, so the same template can be
//! added to a project any number of times.

use crate::id::{LayerId, SlideId};
use crate::model::Slide;
use std::sync::{Arc, LazyLock};

static TEMPLATES: LazyLock<Vec<Slide>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../assets/templates.json")).unwrap_or_else(|err| {
        log::error!("built-in slide templates failed to parse: {err}");
        Vec::new()
    })
});

/// All built-in templates, in display order.
pub fn all() -> &'static [Slide] {
    &TEMPLATES
}

pub fn find(template_id: &str) -> Option<&'static Slide> {
    TEMPLATES.iter().find(|t| t.id.as_str() == template_id)
}

/// A new slide built from the template `template_id`, named `"{name} Copy"`.
pub fn instantiate(template_id: &str) -> Option<Slide> {
    let template = find(template_id)?;
    let layers = template
        .layers
        .iter()
        .map(|layer| {
            let mut layer = layer.as_ref().clone();
            layer.id = LayerId::generate();
            Arc::new(layer)
        })
        .collect();

    Some(Slide {
        id: SlideId::generate(),
        name: format!("{} Copy", template.name),
        background: template.background.clone(),
        layers,
        duration: template.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse() {
        let ids: Vec<_> = all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["template-hero", "template-features", "template-cta"]);
        assert!(all().iter().all(|t| t.duration == 15000.0));
        assert_eq!(find("template-features").unwrap().layers.len(), 4);
    }

    #[test]
    fn instantiate_gives_fresh_ids() {
        let a = instantiate("template-hero").unwrap();
        let b = instantiate("template-hero").unwrap();
        assert_eq!(a.name, "Hero Section Copy");
        assert_ne!(a.id, b.id);
        assert_ne!(a.layers[0].id, b.layers[0].id);
        assert_ne!(a.layers[0].id.as_str(), "hero-title");
        assert_eq!(a.layers[0].content, "Welcome to Our Amazing Service");
        assert_eq!(a.layers[2].animation.delay, 1000.0);
    }

    #[test]
    fn unknown_template() {
        assert!(instantiate("template-missing").is_none());
    }
}
