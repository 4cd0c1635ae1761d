//! `craftruv material` command - Browse the material catalog

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::catalog::{Material, MaterialCategory};
use crate::cli::commands::utils::CommandContext;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum MaterialCommands {
    /// List materials in catalog order
    List(ListArgs),

    /// Show one material
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only materials of this category
    #[arg(long, short = 'c')]
    pub category: Option<MaterialCategory>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Material id (e.g. laminate_white)
    pub id: String,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 24),
    ColumnDef::new("name", "NAME", 32),
    ColumnDef::new("category", "CATEGORY", 10),
    ColumnDef::new("price_per_area", "PRICE/M²", 12),
];

pub fn run(cmd: MaterialCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    match cmd {
        MaterialCommands::List(args) => run_list(args, &ctx, global),
        MaterialCommands::Show(args) => run_show(args, &ctx),
    }
}

fn run_list(args: ListArgs, ctx: &CommandContext, global: &GlobalOpts) -> Result<()> {
    let materials: Vec<&Material> = ctx
        .catalogs
        .materials
        .list()
        .filter(|m| args.category.map_or(true, |c| m.category == c))
        .collect();

    if args.count {
        println!("{}", materials.len());
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&materials).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&materials).into_diagnostic()?);
        }
        format => {
            let rows: Vec<TableRow> = materials.iter().map(|m| material_row(m)).collect();
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(COLUMNS, "material")
                .with_config(config)
                .output(&rows, format);
        }
    }

    Ok(())
}

fn material_row(m: &Material) -> TableRow {
    TableRow::new(m.id.clone())
        .cell("id", CellValue::Id(m.id.clone()))
        .cell("name", CellValue::Text(m.name.clone()))
        .cell("category", CellValue::Type(m.category.to_string()))
        .cell("price_per_area", CellValue::Float(m.price_per_area, 2))
}

fn run_show(args: ShowArgs, ctx: &CommandContext) -> Result<()> {
    let material = ctx.catalogs.materials.get(&args.id)?;

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(material).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", material.id),
        _ => print!("{}", serde_yml::to_string(material).into_diagnostic()?),
    }

    Ok(())
}
