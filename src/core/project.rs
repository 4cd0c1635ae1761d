//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{CatalogEntry, CatalogError, FurnitureType, FurnitureTypeCatalog, Material, MaterialCatalog};

const PROJECT_DIR: &str = ".craftruv";

/// A workshop project: a directory holding `.craftruv/` with config and catalogs
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .craftruv/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Initialize even if .craftruv/ exists, resetting config and catalog copies
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };

        std::fs::create_dir_all(project.catalogs_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        // Editable copies of the built-in catalogs
        let copies = [
            (Material::FILE_NAME, MaterialCatalog::builtin_source()?),
            (FurnitureType::FILE_NAME, FurnitureTypeCatalog::builtin_source()?),
        ];
        for (file_name, source) in copies {
            std::fs::write(project.catalog_path(file_name), source)
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# CraftRuv Project Configuration

# Name printed on generated quotes (default: git user.name)
# author: ""

# Currency label for prices
# currency: RUB

# Default output format (auto, yaml, json, tsv, csv, md, id)
# default_format: auto

# Catalog files, relative to the project root (YAML or CSV).
# Defaults to .craftruv/catalogs/materials.yaml and furniture_types.yaml
# materials_file: prices/materials.csv
# furniture_types_file: prices/furniture_types.csv

# Pricing overrides
# pricing:
#   labor_rate: 1500
#   internal_parts_factor: 2.5
#   delivery_rate: 0.05
#   assembly_rate: 0.10
#   warranty_rate: 0.02
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .craftruv configuration directory
    pub fn craftruv_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.craftruv_dir().join("config.yaml")
    }

    pub fn catalogs_dir(&self) -> PathBuf {
        self.craftruv_dir().join("catalogs")
    }

    /// Location of the project's copy of a catalog file
    pub fn catalog_path(&self, file_name: &str) -> PathBuf {
        self.catalogs_dir().join(file_name)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ProjectError {
    #[error("not a CraftRuv project (searched from {searched_from:?}). Run 'craftruv init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("CraftRuv project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
}
