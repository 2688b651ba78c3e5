//! Starter workbook generation

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::entities::pricing::MarketPosition;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const WORKBOOK_TEMPLATE: &str = "workbook.yaml.tera";

/// Context for a new workbook
#[derive(Debug, Clone)]
pub struct WorkbookTemplate {
    pub file_name: String,
    pub business_type: String,
    pub target_margin: f64,
    pub expected_volume: f64,
    pub market_position: MarketPosition,
    /// Fill in sample costs, competitors and segments
    pub with_examples: bool,
    pub created: DateTime<Utc>,
}

impl WorkbookTemplate {
    pub fn new(file_name: impl Into<String>, business_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            business_type: business_type.into(),
            target_margin: 0.3,
            expected_volume: 1.0,
            market_position: MarketPosition::default(),
            with_examples: false,
            created: Utc::now(),
        }
    }

    pub fn with_examples(mut self, with_examples: bool) -> Self {
        self.with_examples = with_examples;
        self
    }

    pub fn with_target_margin(mut self, margin: f64) -> Self {
        self.target_margin = margin;
        self
    }

    pub fn with_expected_volume(mut self, volume: f64) -> Self {
        self.expected_volume = volume;
        self
    }

    pub fn with_market_position(mut self, position: MarketPosition) -> Self {
        self.market_position = position;
        self
    }
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

impl TemplateGenerator {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    pub fn generate_workbook(&self, ctx: &WorkbookTemplate) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == WORKBOOK_TEMPLATE) {
            return Err(TemplateError::NotFound(WORKBOOK_TEMPLATE.to_string()));
        }

        let mut context = tera::Context::new();
        context.insert("file_name", &ctx.file_name);
        context.insert("business_type", &ctx.business_type.replace('"', "'"));
        context.insert("target_margin", &ctx.target_margin);
        context.insert("expected_volume", &ctx.expected_volume);
        context.insert("market_position", &ctx.market_position.to_string());
        context.insert("with_examples", &ctx.with_examples);
        context.insert("created_date", &ctx.created.format("%Y-%m-%d").to_string());

        self.tera
            .render(WORKBOOK_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WorkbookValidator;

    #[test]
    fn test_blank_workbook_is_valid() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = WorkbookTemplate::new("shop.yaml", "retail")
            .with_target_margin(0.25)
            .with_market_position(MarketPosition::Budget);

        let yaml = generator.generate_workbook(&ctx).unwrap();
        let workbook = WorkbookValidator::new().unwrap().parse(&yaml, "shop.yaml").unwrap();

        assert_eq!(workbook.business_type, "retail");
        assert_eq!(workbook.target_margin, 0.25);
        assert_eq!(workbook.market_position, MarketPosition::Budget);
        assert!(workbook.direct_costs.is_empty());
    }

    #[test]
    fn test_example_workbook_builds_models() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = WorkbookTemplate::new("consulting.yaml", "consulting")
            .with_expected_volume(20.0)
            .with_examples(true);

        let yaml = generator.generate_workbook(&ctx).unwrap();
        let workbook = WorkbookValidator::new()
            .unwrap()
            .parse(&yaml, "consulting.yaml")
            .unwrap();

        let costs = workbook.build_cost_model().unwrap();
        assert_eq!(costs.total_cost_per_unit(), 750.0);
        let pricing = workbook.build_pricing_model(&costs).unwrap();
        assert_eq!(pricing.segments().len(), 2);
    }
}
