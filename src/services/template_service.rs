use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::assets::AssetLoader;

pub const INDEX_TEMPLATE: &str = "index.html";
pub const RESULT_TEMPLATE: &str = "result.html";
pub const CHART_TEMPLATE: &str = "chart.svg";

/// Error type for template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the HTML pages and the chart SVG with Tera.
///
/// Templates are read once at startup from the [`AssetLoader`], so a
/// `TEMPLATES_DIR` override takes effect on restart.
pub struct TemplateService {
    tera: Tera,
}

impl TemplateService {
    pub fn new(loader: &AssetLoader) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        for name in [INDEX_TEMPLATE, RESULT_TEMPLATE, CHART_TEMPLATE] {
            let source = loader.read_template_string(name)?;
            tera.add_raw_template(name, &source)?;
        }
        Self::register_filters(&mut tera);

        tracing::info!(
            templates = tera.get_template_names().count(),
            "Template service initialized"
        );

        Ok(Self { tera })
    }

    fn register_filters(tera: &mut Tera) {
        // percent filter: 12.345 -> "12.3%"
        tera.register_filter(
            "percent",
            |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let v = tera::try_get_value!("percent", "value", f64, value);
                let places = args.get("places").and_then(|p| p.as_u64()).unwrap_or(1) as usize;
                Ok(tera::Value::String(format!("{v:.places$}%")))
            },
        );
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, TemplateError> {
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(name, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TemplateService {
        TemplateService::new(&AssetLoader::default()).unwrap()
    }

    #[test]
    fn test_index_renders_error_message() {
        let html = service()
            .render(INDEX_TEMPLATE, &json!({ "error": "Unsupported image format: .gif" }))
            .unwrap();
        assert!(html.contains("Unsupported image format: .gif"));
    }

    #[test]
    fn test_index_escapes_error_message() {
        let html = service()
            .render(INDEX_TEMPLATE, &json!({ "error": "<script>" }))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_percent_filter() {
        let mut tera = Tera::default();
        TemplateService::register_filters(&mut tera);
        tera.add_raw_template("t", "{{ v | percent }} {{ v | percent(places=2) }}")
            .unwrap();
        let mut ctx = Context::new();
        ctx.insert("v", &66.666);
        assert_eq!(tera.render("t", &ctx).unwrap(), "66.7% 66.67%");
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(INDEX_TEMPLATE), "custom {{ error }}").unwrap();
        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);

        let service = TemplateService::new(&loader).unwrap();
        let html = service
            .render(INDEX_TEMPLATE, &json!({ "error": "x" }))
            .unwrap();
        assert_eq!(html, "custom x");
        let svg = service
            .render(CHART_TEMPLATE, &json!({ "width": 10, "height": 10, "title": "t", "empty": true, "slices": [], "cx": 5.0, "cy": 5.0, "radius": 4.0, "title_y": 2.0, "title_size": 3.0, "label_size": 2.0 }))
            .unwrap();
        assert!(svg.contains("<svg"));
    }
}
