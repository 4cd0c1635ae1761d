//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::Project;
use crate::estimate::{PricingOverrides, PricingRates, RatesError};

/// CraftRuv configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name printed on generated quotes
    pub author: Option<String>,

    /// Currency label appended to monetary values
    pub currency: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Material catalog file (YAML or CSV)
    pub materials_file: Option<PathBuf>,

    /// Furniture type catalog file (YAML or CSV)
    pub furniture_types_file: Option<PathBuf>,

    /// Overrides for the built-in pricing rates
    pub pricing: PricingOverrides,
}

impl Config {
    /// Load configuration from all sources using an already discovered project
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/craftruv/config.yaml); relative catalog paths
        //    are relative to its directory
        if let Some(global_path) = Self::global_config_path() {
            if let Some(mut global) = Self::read_layer(&global_path) {
                if let Some(dir) = global_path.parent() {
                    global.anchor_catalog_paths(dir);
                }
                config.merge(global);
            }
        }

        // 3. Project config (.craftruv/config.yaml); relative catalog paths are project-relative
        if let Some(project) = project {
            if let Some(mut project_config) = Self::read_layer(&project.config_path()) {
                project_config.anchor_catalog_paths(project.root());
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("CRAFTRUV_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(currency) = std::env::var("CRAFTRUV_CURRENCY") {
            config.currency = Some(currency);
        }
        if let Ok(path) = std::env::var("CRAFTRUV_MATERIALS") {
            config.materials_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("CRAFTRUV_FURNITURE_TYPES") {
            config.furniture_types_file = Some(PathBuf::from(path));
        }

        config
    }

    /// Read one config file; a missing file is not an error, an unreadable one is logged and skipped
    fn read_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(layer) => {
                debug!(path = %path.display(), "loaded config layer");
                Some(layer.unwrap_or_default())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Join relative catalog paths onto `base`; absolute paths are kept
    fn anchor_catalog_paths(&mut self, base: &Path) {
        self.materials_file = self.materials_file.take().map(|p| base.join(p));
        self.furniture_types_file = self.furniture_types_file.take().map(|p| base.join(p));
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "craftruv")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.materials_file.is_some() {
            self.materials_file = other.materials_file;
        }
        if other.furniture_types_file.is_some() {
            self.furniture_types_file = other.furniture_types_file;
        }
        self.pricing.merge(other.pricing);
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Currency label, "RUB" unless configured
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("RUB")
    }

    /// Effective pricing rates after all overrides
    pub fn pricing_rates(&self) -> Result<PricingRates, RatesError> {
        self.pricing.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base: Config = serde_yml::from_str(
            "author: Workshop\ncurrency: RUB\npricing:\n  labor_rate: 1200\n  warranty_rate: 0.03\n",
        )
        .unwrap();
        let project: Config =
            serde_yml::from_str("currency: EUR\npricing:\n  labor_rate: 1800\n").unwrap();
        base.merge(project);

        assert_eq!(base.author.as_deref(), Some("Workshop"));
        assert_eq!(base.currency(), "EUR");
        let rates = base.pricing_rates().unwrap();
        assert_eq!(rates.labor_rate, 1800.0);
        assert_eq!(rates.warranty_rate, 0.03);
    }

    #[test]
    fn test_defaults_use_builtin_rates() {
        let config = Config::default();
        assert_eq!(config.pricing_rates().unwrap(), PricingRates::default());
        assert_eq!(config.currency(), "RUB");
    }

    #[test]
    fn test_project_layer_resolves_relative_catalog_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "materials_file: prices/materials.csv\n").unwrap();

        let config = Config::load_for(Some(&project));
        let expected = project.root().join("prices/materials.csv");
        // Environment can override; only check when it is not set
        if std::env::var("CRAFTRUV_MATERIALS").is_err() {
            assert_eq!(config.materials_file, Some(expected));
        }
    }

    #[test]
    fn test_empty_project_config_is_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "# only comments\n").unwrap();
        let layer = Config::read_layer(&path).unwrap();
        assert!(layer.author.is_none());
    }

    #[test]
    fn test_anchor_catalog_paths_keeps_absolute_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let absolute = tmp.path().join("shared/furniture.yaml");
        let mut layer: Config = serde_yml::from_str(&format!(
            "materials_file: prices.csv\nfurniture_types_file: {}\n",
            absolute.display()
        ))
        .unwrap();

        layer.anchor_catalog_paths(Path::new("/etc/craftruv"));
        assert_eq!(
            layer.materials_file,
            Some(PathBuf::from("/etc/craftruv/prices.csv"))
        );
        assert_eq!(layer.furniture_types_file, Some(absolute));
    }
}
