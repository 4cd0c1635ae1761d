//! `craftruv furniture` command - Browse furniture types

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::catalog::FurnitureType;
use crate::cli::commands::utils::CommandContext;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum FurnitureCommands {
    /// List furniture types in catalog order
    List,

    /// Show one furniture type
    Show {
        /// Furniture type id (e.g. wardrobe)
        id: String,
    },
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("base_multiplier", "MULTIPLIER", 10),
    ColumnDef::new("description", "DESCRIPTION", 40),
];

pub fn run(cmd: FurnitureCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    match cmd {
        FurnitureCommands::List => run_list(&ctx, global),
        FurnitureCommands::Show { id } => run_show(&id, &ctx),
    }
}

fn run_list(ctx: &CommandContext, global: &GlobalOpts) -> Result<()> {
    let types: Vec<&FurnitureType> = ctx.catalogs.furniture_types.list().collect();

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&types).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&types).into_diagnostic()?);
        }
        format => {
            let rows: Vec<TableRow> = types
                .iter()
                .map(|t| {
                    TableRow::new(t.id.clone())
                        .cell("id", CellValue::Id(t.id.clone()))
                        .cell("name", CellValue::Text(t.name.clone()))
                        .cell("base_multiplier", CellValue::Float(t.base_multiplier, 2))
                        .cell("description", CellValue::Text(t.description.clone()))
                })
                .collect();
            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                TableConfig::default()
            };
            TableFormatter::new(COLUMNS, "furniture type")
                .with_config(config)
                .output(&rows, format);
        }
    }

    Ok(())
}

fn run_show(id: &str, ctx: &CommandContext) -> Result<()> {
    let furniture_type = ctx.catalogs.furniture_types.get(id)?;

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(furniture_type).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", furniture_type.id),
        _ => print!("{}", serde_yml::to_string(furniture_type).into_diagnostic()?),
    }

    Ok(())
}
