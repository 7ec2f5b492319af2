//! Export of a project to standalone HTML, CSS or JSON.
//!
//! Pure function of `(Project, format, options)`: nothing here reads editor
//! state, history or the playback clock.

use crate::error::ProjectError;
use crate::model::{FontWeight, Layer, LayerKind, Project, Slide};
use crate::presets;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Css,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Css => "css",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            ExportFormat::Css => "text/css",
            ExportFormat::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub include_animations: bool,
    pub include_styles: bool,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_slides: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_animations: true,
            include_styles: true,
            autoplay: true,
            loop_slides: true,
        }
    }
}

/// An exported text blob plus the file name and MIME type to offer it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

pub fn export_project(
    project: &Project,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportedFile, ProjectError> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(project).map_err(ProjectError::Serialize)?,
        ExportFormat::Css => stylesheet(project, options),
        ExportFormat::Html => html_document(project, options),
    };
    Ok(ExportedFile {
        file_name: format!("{}.{}", project.name, format.extension()),
        mime_type: format.mime_type(),
        content,
    })
}

// ─── CSS ─────────────────────────────────────────────────────────────────

const BASE_CSS: &str = "\
.slider-container { position: relative; width: 100%; max-width: 1200px; height: 600px; margin: 0 auto; overflow: hidden; background: #000; border-radius: 8px; }
.slide { position: absolute; top: 0; left: 0; width: 100%; height: 100%; opacity: 0; transition: opacity 0.8s ease-in-out; }
.slide.active { opacity: 1; }
.layer { position: absolute; display: flex; align-items: center; }
.navigation { position: absolute; top: 50%; transform: translateY(-50%); background: rgba(255,255,255,0.8); border: none; border-radius: 50%; width: 50px; height: 50px; cursor: pointer; font-size: 18px; z-index: 100; }
.nav-prev { left: 20px; }
.nav-next { right: 20px; }
.pagination { position: absolute; bottom: 20px; left: 50%; transform: translateX(-50%); display: flex; gap: 10px; z-index: 100; }
.pagination-dot { width: 12px; height: 12px; border-radius: 50%; background: rgba(255,255,255,0.5); cursor: pointer; }
.pagination-dot.active { background: #fff; }
@media (max-width: 768px) { .slider-container { height: 400px; } .layer { font-size: 0.8em !important; } }
";

/// Layout rules (optional) followed by keyframes for every preset the project uses.
pub fn stylesheet(project: &Project, options: &ExportOptions) -> String {
    let mut css = String::from("/* Slider Studio export */\n");
    if options.include_styles {
        css.push_str(BASE_CSS);
    }
    if options.include_animations {
        css.push_str("\n/* Animations */\n");
        let used = project
            .slides
            .iter()
            .flat_map(|s| s.layers.iter())
            .flat_map(|l| [l.animation.entrance.as_str(), l.animation.exit.as_str()]);
        css.push_str(&presets::stylesheet(used));
    }
    css
}

// ─── HTML ────────────────────────────────────────────────────────────────

fn html_document(project: &Project, options: &ExportOptions) -> String {
    let mut slides = String::new();
    for (index, slide) in project.slides.iter().enumerate() {
        write_slide(&mut slides, slide, index == 0);
    }
    let mut dots = String::new();
    for index in 0..project.slides.len() {
        let active = if index == 0 { " active" } else { "" };
        let _ = write!(dots, "<div class=\"pagination-dot{active}\"></div>");
    }

    let navigation = if project.settings.navigation {
        "    <button class=\"navigation nav-prev\">&lsaquo;</button>\n    <button class=\"navigation nav-next\">&rsaquo;</button>\n"
    } else {
        ""
    };
    let pagination = if project.settings.pagination {
        format!("    <div class=\"pagination\">{dots}</div>\n")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n\
         <div class=\"slider-container\">\n{slides}{navigation}{pagination}</div>\n\
         <script>\n{script}</script>\n</body>\n</html>\n",
        title = escape_html(&project.name),
        css = stylesheet(project, options),
        script = runtime_script(project, options),
    )
}

fn write_slide(out: &mut String, slide: &Slide, active: bool) {
    let class = if active { "slide active" } else { "slide" };
    let _ = writeln!(
        out,
        "  <div class=\"{class}\" data-duration=\"{}\" style=\"background: {};\">",
        slide.duration,
        escape_html(&slide.background.css())
    );
    for layer in &slide.layers {
        write_layer(out, layer);
    }
    out.push_str("  </div>\n");
}

fn write_layer(out: &mut String, layer: &Layer) {
    let s = &layer.style;
    let weight = match &s.font_weight {
        Some(FontWeight::Number(n)) => n.to_string(),
        Some(FontWeight::Name(name)) => name.clone(),
        None => "normal".into(),
    };
    let justify = if layer.kind == LayerKind::Button { "center" } else { "flex-start" };
    let style = format!(
        "left: {}px; top: {}px; width: {}px; height: {}px; font-size: {}px; font-weight: {weight}; \
         color: {}; background-color: {}; border-radius: {}px; opacity: {}; \
         transform: rotate({}deg); z-index: {}; justify-content: {justify};",
        s.x,
        s.y,
        s.width,
        s.height,
        s.font_size.unwrap_or(16.0),
        s.color.as_deref().unwrap_or("#000"),
        s.background_color.as_deref().unwrap_or("transparent"),
        s.border_radius.unwrap_or(0.0),
        s.opacity,
        s.rotation,
        s.z_index,
    );
    let body = match layer.kind {
        LayerKind::Image => format!(
            "<img src=\"{}\" alt=\"\" style=\"width: 100%; height: 100%; object-fit: cover;\">",
            escape_html(&layer.content)
        ),
        _ => escape_html(&layer.content),
    };
    let _ = writeln!(
        out,
        "    <div class=\"layer\" data-animation=\"{}\" data-delay=\"{}\" style=\"{}\">{body}</div>",
        presets::class_name(&layer.animation.entrance),
        layer.animation.delay,
        escape_html(&style),
    );
}

fn runtime_script(project: &Project, options: &ExportOptions) -> String {
    format!(
        "(function () {{
  var root = document.querySelector('.slider-container');
  if (!root) return;
  var slides = Array.prototype.slice.call(root.querySelectorAll('.slide'));
  var dots = Array.prototype.slice.call(root.querySelectorAll('.pagination-dot'));
  var autoplay = {autoplay}, loop = {looping}, interval = {interval}, current = 0, timer = null;
  function show(i) {{
    slides.forEach(function (s, n) {{ s.classList.toggle('active', n === i); }});
    dots.forEach(function (d, n) {{ d.classList.toggle('active', n === i); }});
    slides[i].querySelectorAll('.layer').forEach(function (layer) {{
      layer.classList.remove(layer.dataset.animation);
      setTimeout(function () {{ layer.classList.add(layer.dataset.animation); }}, parseInt(layer.dataset.delay || '0', 10));
    }});
    current = i;
  }}
  function step(d) {{
    var n = current + d;
    if (n >= slides.length) n = loop ? 0 : slides.length - 1;
    if (n < 0) n = loop ? slides.length - 1 : 0;
    go(n);
  }}
  function go(i) {{
    if (i === current) return;
    show(i);
    if (autoplay) {{ clearInterval(timer); timer = setInterval(function () {{ step(1); }}, interval); }}
  }}
  var prev = root.querySelector('.nav-prev'), next = root.querySelector('.nav-next');
  if (prev) prev.addEventListener('click', function () {{ step(-1); }});
  if (next) next.addEventListener('click', function () {{ step(1); }});
  dots.forEach(function (d, i) {{ d.addEventListener('click', function () {{ go(i); }}); }});
  if (slides.length) show(0);
  if (autoplay) timer = setInterval(function () {{ step(1); }}, interval);
}})();
",
        autoplay = options.autoplay,
        looping = options.loop_slides,
        interval = project.settings.transition_duration + 3000.0,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_export_is_pretty_project() {
        let project = Project::sample();
        let file = export_project(&project, ExportFormat::Json, &ExportOptions::default()).unwrap();
        assert_eq!(file.file_name, "My Slider.json");
        assert_eq!(file.mime_type, "application/json");
        let back: Project = serde_json::from_str(&file.content).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn css_includes_only_used_presets() {
        let project = Project::sample();
        let css = stylesheet(&project, &ExportOptions::default());
        assert!(css.contains(".slider-container"));
        assert!(css.contains("@keyframes slide-in-left-keyframes"));
        assert!(css.contains("@keyframes scale-out-keyframes"));
        assert!(!css.contains("bounce-in"));
    }

    #[test]
    fn css_options_toggle_sections() {
        let project = Project::sample();
        let options = ExportOptions {
            include_styles: false,
            include_animations: false,
            ..ExportOptions::default()
        };
        let css = stylesheet(&project, &options);
        assert!(!css.contains(".slider-container"));
        assert!(!css.contains("@keyframes"));
    }

    #[test]
    fn html_export_has_layers_and_options() {
        let project = Project::sample();
        let options = ExportOptions {
            autoplay: false,
            ..ExportOptions::default()
        };
        let file = export_project(&project, ExportFormat::Html, &options).unwrap();
        assert_eq!(file.file_name, "My Slider.html");
        let html = &file.content;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>My Slider</title>"));
        assert!(html.contains("data-animation=\"slide-in-left\""));
        assert!(html.contains("data-delay=\"400\""));
        assert!(html.contains("var autoplay = false, loop = true, interval = 3800"));
        assert_eq!(html.matches("class=\"layer\"").count(), 3);
    }

    #[test]
    fn html_escapes_content() {
        let mut project = Project::new("<b>");
        let slide_id = project.slides[0].id;
        let mut layer = Layer::new_of_kind(LayerKind::Text, 1);
        layer.content = "Tom & \"Jerry\"".into();
        if let Some(slide) = project.slide_mut(slide_id) {
            slide.layers.push(std::sync::Arc::new(layer));
        }
        let file = export_project(&project, ExportFormat::Html, &ExportOptions::default()).unwrap();
        assert!(file.content.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(file.content.contains("<title>&lt;b&gt;</title>"));
    }

    #[test]
    fn image_background_is_css_url() {
        let mut project = Project::new("Photo");
        let slide_id = project.slides[0].id;
        if let Some(slide) = project.slide_mut(slide_id) {
            slide.background = crate::model::Background::image("https://cdn.test/bg.jpg");
        }
        let file = export_project(&project, ExportFormat::Html, &ExportOptions::default()).unwrap();
        assert!(file.content.contains("background: url(&#39;https://cdn.test/bg.jpg&#39;);"));
    }
}
