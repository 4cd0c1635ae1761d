//! Shared setup for commands: project, config and catalogs

use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::catalog::{CatalogEntry, CatalogSource, Catalogs, FurnitureType, Material};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project};
use crate::estimate::{CostEstimator, PricingRates};

/// Everything a command needs, resolved once per invocation
pub struct CommandContext {
    pub config: Config,
    pub catalogs: Catalogs,
    pub rates: PricingRates,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Discover the project, layer the config and load both catalogs
    ///
    /// Catalog precedence: `--materials`/`--furniture-types` flags, config
    /// keys (including environment), the project's copies, then built-in.
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let project = match &global.project {
            Some(root) => Some(Project::discover_from(root)?),
            None => Project::discover().ok(),
        };
        if let Some(project) = &project {
            debug!(root = %project.root().display(), "using project");
        }

        let config = Config::load_for(project.as_ref());
        let rates = config.pricing_rates()?;

        let materials = CatalogSource::resolve(
            global.materials.as_deref().or(config.materials_file.as_deref()),
            project.as_ref().map(|p| p.catalog_path(Material::FILE_NAME)),
        );
        let furniture_types = CatalogSource::resolve(
            global
                .furniture_types
                .as_deref()
                .or(config.furniture_types_file.as_deref()),
            project.as_ref().map(|p| p.catalog_path(FurnitureType::FILE_NAME)),
        );
        let catalogs = Catalogs::load(&materials, &furniture_types)?;

        let format = global.format.or_default(config.default_format.as_deref());

        Ok(Self {
            config,
            catalogs,
            rates,
            format,
        })
    }

    pub fn estimator(&self) -> CostEstimator<'_> {
        CostEstimator::new(&self.catalogs.materials, &self.catalogs.furniture_types)
            .with_rates(self.rates)
    }
}

/// Write to `output_path` if given, otherwise to stdout
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            eprintln!("Written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
