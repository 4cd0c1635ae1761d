//! Customer-facing quote documents rendered from an estimate

use chrono::{DateTime, Local};
use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::estimate::{round_money, AddOn, CostEstimate};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const QUOTE_TEMPLATE: &str = "quote.md.tera";

#[derive(Debug, Error, miette::Diagnostic)]
pub enum QuoteError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Presentation details that are not part of the estimate itself
#[derive(Debug, Clone)]
pub struct QuoteDetails {
    pub furniture_name: String,
    pub material_name: String,
    pub author: String,
    pub currency: String,
    pub date: DateTime<Local>,
}

#[derive(Serialize)]
struct AddOnLine {
    label: &'static str,
    amount: String,
}

fn add_on_label(add_on: AddOn) -> &'static str {
    match add_on {
        AddOn::Delivery => "Доставка",
        AddOn::Assembly => "Сборка",
        AddOn::Warranty => "Гарантия",
    }
}

/// Format a monetary amount with exactly two decimals
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round_money(value))
}

/// Quote renderer using Tera
pub struct QuoteRenderer {
    tera: Tera,
}

impl QuoteRenderer {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self, QuoteError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| QuoteError::RenderError(e.to_string()))?;
                }
            }
        }

        if !tera.get_template_names().any(|n| n == QUOTE_TEMPLATE) {
            return Err(QuoteError::NotFound(QUOTE_TEMPLATE.to_string()));
        }

        Ok(Self { tera })
    }

    /// Render a markdown quote; money is rounded to 2 decimals here and nowhere earlier
    pub fn render(&self, estimate: &CostEstimate, details: &QuoteDetails) -> Result<String, QuoteError> {
        let add_ons: Vec<AddOnLine> = estimate
            .add_ons
            .iter()
            .map(|(&add_on, &amount)| AddOnLine {
                label: add_on_label(add_on),
                amount: format_amount(amount),
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("date", &details.date.format("%Y-%m-%d").to_string());
        context.insert("author", &details.author);
        context.insert("currency", &details.currency);
        context.insert("furniture_type", &estimate.furniture_type);
        context.insert("furniture_name", &details.furniture_name);
        context.insert("material", &estimate.material);
        context.insert("material_name", &details.material_name);
        context.insert("width", &estimate.dimensions.width().to_string());
        context.insert("height", &estimate.dimensions.height().to_string());
        context.insert("depth", &estimate.dimensions.depth().to_string());
        context.insert("surface_area", &format!("{:.2}", estimate.surface_area));
        context.insert("adjusted_area", &format!("{:.2}", estimate.adjusted_area));
        context.insert("material_cost", &format_amount(estimate.material_cost));
        context.insert("labor_cost", &format_amount(estimate.labor_cost));
        context.insert("total_cost", &format_amount(estimate.total_cost));
        context.insert("add_ons", &add_ons);
        context.insert("total_with_add_ons", &format_amount(estimate.total_with_add_ons));

        self.tera
            .render(QUOTE_TEMPLATE, &context)
            .map_err(|e| QuoteError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::estimate::{CostEstimator, Dimensions, EstimateOptions};
    use chrono::TimeZone;

    fn details() -> QuoteDetails {
        QuoteDetails {
            furniture_name: "Шкаф".to_string(),
            material_name: "ЛДСП белая".to_string(),
            author: "Мастерская".to_string(),
            currency: "RUB".to_string(),
            date: Local.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap(),
        }
    }

    fn reference_estimate(options: &EstimateOptions) -> CostEstimate {
        let catalogs = Catalogs::builtin().unwrap();
        CostEstimator::new(&catalogs.materials, &catalogs.furniture_types)
            .estimate(
                "cabinet",
                "laminate_white",
                &Dimensions::new(800.0, 2000.0, 600.0).unwrap(),
                options,
            )
            .unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(754.4000000000001), "754.40");
        assert_eq!(format_amount(37_720.0), "37720.00");
        assert_eq!(format_amount(0.005), "0.01");
    }

    #[test]
    fn test_render_reference_quote() {
        let renderer = QuoteRenderer::new().unwrap();
        let quote = renderer
            .render(&reference_estimate(&EstimateOptions::default()), &details())
            .unwrap();

        assert!(quote.contains("2026-03-14"));
        assert!(quote.contains("ЛДСП белая"));
        assert!(quote.contains("800 × 2000 × 600"));
        assert!(quote.contains("| 13120.00 |"));
        assert!(quote.contains("**37720.00**"));
        assert!(quote.contains("| Доставка | 1886.00 |"));
        assert!(quote.contains("| Гарантия | 754.40 |"));
        assert!(quote.contains("**44132.40**"));
    }

    #[test]
    fn test_render_skips_disabled_add_ons() {
        let mut options = EstimateOptions::default();
        options.add_ons.delivery = false;
        let renderer = QuoteRenderer::new().unwrap();
        let quote = renderer.render(&reference_estimate(&options), &details()).unwrap();
        assert!(!quote.contains("Доставка"));
        assert!(quote.contains("Сборка"));
    }
}
