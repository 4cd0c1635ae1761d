//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, estimate::EstimateArgs,
    furniture::FurnitureCommands, init::InitArgs, material::MaterialCommands,
};

#[derive(Parser)]
#[command(name = "craftruv")]
#[command(author, version, about = "CraftRuv furniture estimator")]
#[command(long_about = "Price corpus furniture designs from a furniture type, a material and the outer box dimensions.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .craftruv/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Material catalog file (YAML or CSV), overrides config and project catalogs
    #[arg(long, global = true, value_name = "FILE")]
    pub materials: Option<PathBuf>,

    /// Furniture type catalog file (YAML or CSV), overrides config and project catalogs
    #[arg(long = "furniture-types", global = true, value_name = "FILE")]
    pub furniture_types: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new CraftRuv project with editable catalogs
    Init(InitArgs),

    /// Estimate the price of a furniture design
    Estimate(EstimateArgs),

    /// Browse the material catalog
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Browse the furniture type catalog
    #[command(subcommand)]
    Furniture(FurnitureCommands),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for terminals)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables, or a quote document for estimates
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Resolve `auto` against the configured default format
    pub fn or_default(self, configured: Option<&str>) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|s| OutputFormat::from_str(s, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_default_resolution() {
        assert_eq!(OutputFormat::Auto.or_default(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::Yaml.or_default(Some("json")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::Auto.or_default(Some("bogus")), OutputFormat::Auto);
        assert_eq!(OutputFormat::Auto.or_default(None), OutputFormat::Auto);
    }
}
