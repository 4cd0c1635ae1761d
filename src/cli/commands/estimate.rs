//! `craftruv estimate` command - Price a furniture design

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};
use tracing::debug;

use crate::cli::commands::utils::{write_output, CommandContext};
use crate::cli::helpers::format_money;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::estimate::{
    AddOnSelection, CostEstimate, EstimateRequest, EstimateResponse, LengthUnit, RawDimensions,
    RequestOptions,
};
use crate::quote::{format_amount, QuoteDetails, QuoteRenderer};

#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    /// Furniture type id (e.g. cabinet)
    #[arg(long = "type", short = 't')]
    pub furniture_type: Option<String>,

    /// Material id (e.g. laminate_white)
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Outer width
    #[arg(long, short = 'W', allow_negative_numbers = true)]
    pub width: Option<f64>,

    /// Outer height
    #[arg(long, short = 'H', allow_negative_numbers = true)]
    pub height: Option<f64>,

    /// Outer depth
    #[arg(long, short = 'D', allow_negative_numbers = true)]
    pub depth: Option<f64>,

    /// Unit of width, height and depth
    #[arg(long, short = 'u', value_enum, default_value_t = LengthUnit::Mm)]
    pub unit: LengthUnit,

    /// Do not charge delivery
    #[arg(long)]
    pub no_delivery: bool,

    /// Do not charge assembly
    #[arg(long)]
    pub no_assembly: bool,

    /// Do not charge warranty
    #[arg(long)]
    pub no_warranty: bool,

    /// Prompt for anything not given on the command line
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Read a JSON request from FILE ("-" for stdin) and print the response envelope
    #[arg(
        long,
        short = 'r',
        value_name = "FILE",
        conflicts_with_all = ["furniture_type", "material", "width", "height", "depth", "interactive"]
    )]
    pub request: Option<PathBuf>,

    /// Write the result to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: EstimateArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    if let Some(path) = &args.request {
        return run_request(path, &args, &ctx);
    }

    let request = build_request(&args, &ctx)?;
    debug!(
        furniture_type = %request.furniture_type,
        material = %request.material,
        unit = %request.dimensions.unit,
        "estimating"
    );
    let estimate = request.evaluate(&ctx.estimator())?;

    let content = render(&estimate, &ctx)?;
    write_output(&content, args.output.as_deref())
}

/// Envelope mode: the response is printed even when the request is rejected
fn run_request(path: &Path, args: &EstimateArgs, ctx: &CommandContext) -> Result<()> {
    let input = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("failed to read request {}: {}", path.display(), e))?
    };

    let request = EstimateRequest::from_json(&input)
        .map_err(|e| miette::miette!("malformed estimate request: {}", e))?;
    let result = request.evaluate(&ctx.estimator());

    match (&result, ctx.format) {
        (Ok(estimate), format) if !matches!(format, OutputFormat::Auto | OutputFormat::Json) => {
            let content = render(estimate, ctx)?;
            write_output(&content, args.output.as_deref())
        }
        _ => {
            let response = EstimateResponse::from_result(&result);
            let mut content = serde_json::to_string_pretty(&response).into_diagnostic()?;
            content.push('\n');
            write_output(&content, args.output.as_deref())?;
            match result {
                Ok(_) => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

fn build_request(args: &EstimateArgs, ctx: &CommandContext) -> Result<EstimateRequest> {
    let theme = ColorfulTheme::default();

    let furniture_type = match (&args.furniture_type, args.interactive) {
        (Some(id), _) => id.clone(),
        (None, true) => {
            let types: Vec<_> = ctx.catalogs.furniture_types.list().collect();
            let items: Vec<String> = types.iter().map(|t| format!("{} ({})", t.name, t.id)).collect();
            let selection = Select::with_theme(&theme)
                .with_prompt("Furniture type")
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;
            types[selection].id.clone()
        }
        (None, false) => return Err(missing_argument("--type")),
    };

    let material = match (&args.material, args.interactive) {
        (Some(id), _) => id.clone(),
        (None, true) => {
            let materials: Vec<_> = ctx.catalogs.materials.list().collect();
            let items: Vec<String> = materials
                .iter()
                .map(|m| format!("{} ({}, {})", m.name, m.id, format_money(m.price_per_area, ctx.config.currency())))
                .collect();
            let selection = Select::with_theme(&theme)
                .with_prompt("Material")
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;
            materials[selection].id.clone()
        }
        (None, false) => return Err(missing_argument("--material")),
    };

    let prompt_length = |value: Option<f64>, label: &str| -> Result<Option<f64>> {
        match value {
            Some(v) => Ok(Some(v)),
            None if args.interactive => Input::<f64>::with_theme(&theme)
                .with_prompt(format!("{} ({})", label, args.unit))
                .interact_text()
                .map(Some)
                .into_diagnostic(),
            None => Ok(None),
        }
    };
    let width = prompt_length(args.width, "Width")?;
    let height = prompt_length(args.height, "Height")?;
    let depth = prompt_length(args.depth, "Depth")?;

    Ok(EstimateRequest {
        furniture_type,
        material,
        dimensions: RawDimensions::from_numbers(width, height, depth, args.unit),
        options: RequestOptions {
            add_ons: AddOnSelection {
                delivery: !args.no_delivery,
                assembly: !args.no_assembly,
                warranty: !args.no_warranty,
            },
        },
    })
}

fn missing_argument(flag: &str) -> miette::Report {
    miette::miette!(
        help = "Pass it on the command line, use --interactive, or --request FILE",
        "missing required argument {}",
        flag
    )
}

fn render(estimate: &CostEstimate, ctx: &CommandContext) -> Result<String> {
    match ctx.format {
        OutputFormat::Json => {
            let response = EstimateResponse::success(estimate);
            let mut out = serde_json::to_string_pretty(&response).into_diagnostic()?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yml::to_string(&estimate.rounded()).into_diagnostic(),
        OutputFormat::Tsv => Ok(render_tsv(estimate)),
        OutputFormat::Md => {
            let details = QuoteDetails {
                furniture_name: ctx.catalogs.furniture_types.get(&estimate.furniture_type)?.name.clone(),
                material_name: ctx.catalogs.materials.get(&estimate.material)?.name.clone(),
                author: ctx.config.author(),
                currency: ctx.config.currency().to_string(),
                date: Local::now(),
            };
            Ok(QuoteRenderer::new()?.render(estimate, &details)?)
        }
        OutputFormat::Auto => render_breakdown(estimate, ctx),
        OutputFormat::Csv | OutputFormat::Id => Err(miette::miette!(
            help = "Use --format auto, yaml, json, tsv or md",
            "format {:?} is not supported for estimates",
            ctx.format
        )),
    }
}

/// `key<TAB>value` lines with money at two decimals
fn render_tsv(estimate: &CostEstimate) -> String {
    let dims = &estimate.dimensions;
    let lines = [
        ("furniture_type", estimate.furniture_type.clone()),
        ("material", estimate.material.clone()),
        ("width_mm", dims.width().to_string()),
        ("height_mm", dims.height().to_string()),
        ("depth_mm", dims.depth().to_string()),
        ("surface_area_m2", format!("{:.4}", estimate.surface_area)),
        ("adjusted_area_m2", format!("{:.4}", estimate.adjusted_area)),
        ("material_cost", format_amount(estimate.material_cost)),
        ("labor_cost", format_amount(estimate.labor_cost)),
        ("total_cost", format_amount(estimate.total_cost)),
    ];
    let add_on_keys = estimate
        .add_ons
        .iter()
        .map(|(add_on, &amount)| (add_on.to_string(), format_amount(amount)));

    let mut out = String::new();
    for (key, value) in lines {
        out.push_str(&format!("{}\t{}\n", key, value));
    }
    for (key, value) in add_on_keys {
        out.push_str(&format!("{}\t{}\n", key, value));
    }
    out.push_str(&format!(
        "total_with_add_ons\t{}\n",
        format_amount(estimate.total_with_add_ons)
    ));
    out
}

fn render_breakdown(estimate: &CostEstimate, ctx: &CommandContext) -> Result<String> {
    let currency = ctx.config.currency();
    let furniture = ctx.catalogs.furniture_types.get(&estimate.furniture_type)?;
    let material = ctx.catalogs.materials.get(&estimate.material)?;
    let dims = &estimate.dimensions;

    let mut out = String::new();
    out.push_str(&format!(
        "{} {} · {} {}\n",
        style(&furniture.name).bold(),
        style(format!("({})", furniture.id)).dim(),
        style(&material.name).bold(),
        style(format!("({})", material.id)).dim(),
    ));
    out.push_str(&format!(
        "{} × {} × {} mm, surface {:.2} m², adjusted {:.2} m²\n\n",
        dims.width(),
        dims.height(),
        dims.depth(),
        estimate.surface_area,
        estimate.adjusted_area
    ));

    let mut builder = Builder::default();
    builder.push_record(["Item", "Amount"]);
    builder.push_record(["Material".to_string(), format_money(estimate.material_cost, currency)]);
    builder.push_record(["Labor".to_string(), format_money(estimate.labor_cost, currency)]);
    builder.push_record([
        format!("Total (× {})", furniture.base_multiplier),
        format_money(estimate.total_cost, currency),
    ]);
    for (add_on, &amount) in &estimate.add_ons {
        let rate = ctx.rates.add_on_rate(*add_on);
        builder.push_record([
            format!("{} ({:.0}%)", capitalize(&add_on.to_string()), rate * 100.0),
            format_money(amount, currency),
        ]);
    }
    builder.push_record([
        "Total with add-ons".to_string(),
        format_money(estimate.total_with_add_ons, currency),
    ]);
    out.push_str(&builder.build().with(Style::rounded()).to_string());
    out.push('\n');

    Ok(out)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::estimate::{CostEstimator, Dimensions, EstimateOptions};

    fn reference_estimate() -> CostEstimate {
        let catalogs = Catalogs::builtin().unwrap();
        CostEstimator::new(&catalogs.materials, &catalogs.furniture_types)
            .estimate(
                "cabinet",
                "laminate_white",
                &Dimensions::new(800.0, 2000.0, 600.0).unwrap(),
                &EstimateOptions::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_render_tsv() {
        let out = render_tsv(&reference_estimate());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "furniture_type\tcabinet");
        assert!(lines.contains(&"width_mm\t800"));
        assert!(lines.contains(&"surface_area_m2\t6.5600"));
        assert!(lines.contains(&"total_cost\t37720.00"));
        assert!(lines.contains(&"delivery\t1886.00"));
        assert_eq!(lines.last(), Some(&"total_with_add_ons\t44132.40"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("delivery"), "Delivery");
        assert_eq!(capitalize(""), "");
    }
}
