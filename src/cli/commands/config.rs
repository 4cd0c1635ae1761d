//! `craftruv config` command - Configuration management
//!
//! Provides commands to view and modify CraftRuv configuration.

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;
use crate::estimate::PricingRates;
use crate::yaml::YamlSyntaxError;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., currency, pricing.labor_rate)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Name printed on generated quotes"),
    ("currency", "Currency label for prices (default RUB)"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, etc.)",
    ),
    ("materials_file", "Material catalog file (YAML or CSV)"),
    ("furniture_types_file", "Furniture type catalog file (YAML or CSV)"),
    ("pricing.labor_rate", "Labor cost per m² of adjusted area"),
    (
        "pricing.internal_parts_factor",
        "Outer surface to consumed material factor",
    ),
    ("pricing.delivery_rate", "Delivery fraction of total cost"),
    ("pricing.assembly_rate", "Assembly fraction of total cost"),
    ("pricing.warranty_rate", "Warranty fraction of total cost"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let project_root = global.project.as_deref();
    match cmd {
        ConfigCommands::Show(args) => run_show(args, project_root),
        ConfigCommands::Set(args) => run_set(args, project_root),
        ConfigCommands::Unset(args) => run_unset(args, project_root),
        ConfigCommands::Path(args) => run_path(args, project_root),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, project_root: Option<&Path>) -> Result<()> {
    let project = discover(project_root).ok();
    let config = Config::load_for(project.as_ref());

    if let Some(key) = &args.key {
        ensure_valid_key(key)?;
        let value = get_config_value(&config, key)?;
        if let Some(v) = value {
            println!("{}", v);
        } else {
            return Err(miette::miette!("Key '{}' is not set", key));
        }
        return Ok(());
    }

    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        show_config_file("Project config:", &project_config_path(project_root)?)?;
    } else if args.global_only {
        show_config_file("Global config:", &global_config_path()?)?;
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();

        for (key, _) in VALID_KEYS {
            print_config_value(key, get_config_value(&config, key)?.as_deref());
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (CRAFTRUV_AUTHOR, CRAFTRUV_CURRENCY, CRAFTRUV_MATERIALS, CRAFTRUV_FURNITURE_TYPES)");
        println!("  2. Project config (.craftruv/config.yaml)");
        println!("  3. Global config (~/.config/craftruv/config.yaml)");
    }

    Ok(())
}

fn run_set(args: SetArgs, project_root: Option<&Path>) -> Result<()> {
    ensure_valid_key(&args.key)?;
    let value = parse_value(&args.key, &args.value)?;

    let config_path = if args.global {
        global_config_path()?
    } else {
        project_config_path(project_root)?
    };

    let mut config_map = read_config_map(&config_path)?;
    set_nested_value(&mut config_map, &args.key, value)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );

    Ok(())
}

fn run_unset(args: UnsetArgs, project_root: Option<&Path>) -> Result<()> {
    let config_path = if args.global {
        global_config_path()?
    } else {
        project_config_path(project_root)?
    };

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_config_map(&config_path)?;
    if !unset_nested_value(&mut config_map, &args.key) {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );

    Ok(())
}

fn run_path(args: PathArgs, project_root: Option<&Path>) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        println!("{}", project_config_path(project_root)?.display());
    } else if args.global_only {
        println!("{}", global_config_path()?.display());
    } else {
        let global_path = global_config_path()?;

        println!("{}", style("Configuration file paths:").bold());
        println!();
        println!("  {} {}", style("Global:").cyan(), global_path.display());
        print_existence(&global_path, 9);

        println!();
        match project_config_path(project_root) {
            Ok(path) => {
                println!("  {} {}", style("Project:").cyan(), path.display());
                print_existence(&path, 10);
            }
            Err(_) => println!(
                "  {} {}",
                style("Project:").cyan(),
                style("(not in a CraftRuv project)").dim()
            ),
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<30} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'craftruv config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn discover(project_root: Option<&Path>) -> std::result::Result<Project, crate::core::ProjectError> {
    match project_root {
        Some(root) => Project::discover_from(root),
        None => Project::discover(),
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn project_config_path(project_root: Option<&Path>) -> Result<PathBuf> {
    Ok(discover(project_root)?.config_path())
}

fn ensure_valid_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        return Ok(());
    }
    Err(miette::miette!(
        help = "Run `craftruv config keys` to list valid keys",
        "Unknown configuration key '{}'",
        key
    ))
}

/// Convert the CLI string into the YAML value stored for `key`
fn parse_value(key: &str, value: &str) -> Result<serde_yml::Value> {
    if key.starts_with("pricing.") {
        let number: f64 = value
            .trim()
            .parse()
            .map_err(|_| miette::miette!("'{}' expects a number, got '{}'", key, value))?;
        if !number.is_finite() || number <= 0.0 {
            return Err(miette::miette!("'{}' must be a positive number, got {}", key, value));
        }
        return Ok(serde_yml::Value::Number(number.into()));
    }

    if key == "default_format" && OutputFormat::from_str(value, true).is_err() {
        return Err(miette::miette!(
            "Invalid format '{}'. Use auto, yaml, tsv, json, csv, md, or id",
            value
        ));
    }

    Ok(serde_yml::Value::String(value.to_string()))
}

fn get_config_value(config: &Config, key: &str) -> Result<Option<String>> {
    let display_path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
    let rates = || -> Result<PricingRates> { Ok(config.pricing_rates()?) };

    Ok(match key {
        "author" => config.author.clone(),
        "currency" => Some(config.currency().to_string()),
        "default_format" => config.default_format.clone(),
        "materials_file" => display_path(&config.materials_file),
        "furniture_types_file" => display_path(&config.furniture_types_file),
        "pricing.labor_rate" => Some(rates()?.labor_rate.to_string()),
        "pricing.internal_parts_factor" => Some(rates()?.internal_parts_factor.to_string()),
        "pricing.delivery_rate" => Some(rates()?.delivery_rate.to_string()),
        "pricing.assembly_rate" => Some(rates()?.assembly_rate.to_string()),
        "pricing.warranty_rate" => Some(rates()?.warranty_rate.to_string()),
        _ => None,
    })
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_existence(path: &Path, indent: usize) {
    let label = if path.exists() {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", label, indent = indent);
}

fn show_config_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }

    Ok(())
}

/// Existing config as a YAML mapping; empty, missing or comment-only files become `{}`.
/// A file that does not parse as a mapping is an error and is never rewritten.
fn read_config_map(path: &Path) -> Result<serde_yml::Value> {
    let empty = || serde_yml::Value::Mapping(Default::default());
    if !path.exists() {
        return Ok(empty());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    let filename = path.display().to_string();
    let parsed: serde_yml::Value = serde_yml::from_str(&content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, &content, &filename))?;
    match parsed {
        serde_yml::Value::Null => Ok(empty()),
        serde_yml::Value::Mapping(_) => Ok(parsed),
        _ => Err(miette::miette!(
            help = "Fix or remove the file, then retry",
            "Config file {} is not a key/value mapping; leaving it untouched",
            filename
        )),
    }
}

fn set_nested_value(root: &mut serde_yml::Value, key: &str, value: serde_yml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(miette::miette!("Empty configuration key"));
    };

    let mut current = root;
    for part in parents {
        let serde_yml::Value::Mapping(map) = current else {
            return Err(miette::miette!("Cannot set '{}': parent is not a mapping", key));
        };
        let entry = map
            .entry(serde_yml::Value::String(part.to_string()))
            .or_insert_with(|| serde_yml::Value::Mapping(Default::default()));
        if !entry.is_mapping() {
            *entry = serde_yml::Value::Mapping(Default::default());
        }
        current = entry;
    }

    match current {
        serde_yml::Value::Mapping(map) => {
            map.insert(serde_yml::Value::String(last.to_string()), value);
            Ok(())
        }
        _ => Err(miette::miette!("Cannot set '{}': parent is not a mapping", key)),
    }
}

fn unset_nested_value(root: &mut serde_yml::Value, key: &str) -> bool {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return false;
    };

    let mut current = root;
    for part in parents {
        match current {
            serde_yml::Value::Mapping(map) => {
                match map.get_mut(&serde_yml::Value::String(part.to_string())) {
                    Some(next) => current = next,
                    None => return false,
                }
            }
            _ => return false,
        }
    }

    match current {
        serde_yml::Value::Mapping(map) => map
            .remove(&serde_yml::Value::String(last.to_string()))
            .is_some(),
        _ => false,
    }
}
