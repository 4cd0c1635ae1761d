//! Read-only lookup tables for materials and furniture types
//!
//! Both catalogs share one implementation, [`Catalog`], parameterised over the
//! entry type. A catalog is built once (from the embedded defaults, a project
//! copy, or an explicit YAML/CSV file), validated on construction, and then
//! only read. Entries keep the order they were declared in.

pub mod furniture;
pub mod material;

use rust_embed::Embed;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use furniture::{FurnitureType, FurnitureTypeCatalog};
pub use material::{Material, MaterialCatalog, MaterialCategory};

use crate::yaml::YamlSyntaxError;

#[derive(Embed)]
#[folder = "catalogs/"]
struct EmbeddedCatalogs;

/// A record that can live in a [`Catalog`]
pub trait CatalogEntry: Clone + Serialize + DeserializeOwned {
    /// Singular name of the entry kind ("material", "furniture type")
    const KIND: &'static str;

    /// File name of the built-in catalog and of a project's editable copy
    const FILE_NAME: &'static str;

    /// Stable identifier
    fn id(&self) -> &str;

    /// Check the entry's own invariants, returning a reason on failure
    fn validate(&self) -> Result<(), String>;

    /// Error reported when `id` is not in the catalog
    fn not_found(id: &str, available: &[&str]) -> CatalogError;
}

/// Errors raised while building or querying a catalog
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CatalogError {
    #[error("material '{id}' not found")]
    #[diagnostic(code(craftruv::catalog::material_not_found))]
    MaterialNotFound {
        id: String,
        #[help]
        help: Option<String>,
    },

    #[error("furniture type '{id}' not found")]
    #[diagnostic(code(craftruv::catalog::furniture_type_not_found))]
    FurnitureTypeNotFound {
        id: String,
        #[help]
        help: Option<String>,
    },

    #[error("duplicate {kind} id '{id}'")]
    #[diagnostic(
        code(craftruv::catalog::duplicate_id),
        help("Catalog ids must be unique; rename or remove one of the entries.")
    )]
    DuplicateId { kind: &'static str, id: String },

    #[error("invalid {kind} '{id}': {reason}")]
    #[diagnostic(code(craftruv::catalog::invalid_entry))]
    InvalidEntry {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("{kind} catalog is empty")]
    #[diagnostic(code(craftruv::catalog::empty))]
    Empty { kind: &'static str },

    #[error("failed to read catalog {}", .path.display())]
    #[diagnostic(code(craftruv::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error("invalid CSV in {file}: {message}")]
    #[diagnostic(
        code(craftruv::catalog::csv),
        help("The first row must name the columns, e.g. id,name,price_per_area,category")
    )]
    Csv { file: String, message: String },

    #[error("built-in catalog '{0}' is missing from the binary")]
    #[diagnostic(code(craftruv::catalog::builtin_missing))]
    BuiltinMissing(&'static str),
}

/// Format the "available ids" help line for not-found errors
pub(crate) fn available_help(command: &str, available: &[&str]) -> Option<String> {
    if available.is_empty() {
        return None;
    }
    Some(format!(
        "Available: {}. Run `craftruv {} list` for details.",
        available.join(", "),
        command
    ))
}

/// Immutable, insertion-ordered lookup table keyed by entry id
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: CatalogEntry> Catalog<T> {
    /// Build a catalog, validating every entry and rejecting duplicate ids
    pub fn new(entries: Vec<T>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty { kind: T::KIND });
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            let id = entry.id();
            if id.trim().is_empty() {
                return Err(CatalogError::InvalidEntry {
                    kind: T::KIND,
                    id: format!("#{}", pos + 1),
                    reason: "id must not be empty".to_string(),
                });
            }
            entry
                .validate()
                .map_err(|reason| CatalogError::InvalidEntry {
                    kind: T::KIND,
                    id: id.to_string(),
                    reason,
                })?;
            if index.insert(id.to_string(), pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    kind: T::KIND,
                    id: id.to_string(),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// Look up an entry, reporting the kind-specific not-found error on a miss
    pub fn get(&self, id: &str) -> Result<&T, CatalogError> {
        self.find(id).ok_or_else(|| {
            let available: Vec<&str> = self.ids().collect();
            T::not_found(id, &available)
        })
    }

    /// Look up an entry without building an error
    pub fn find(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// All entries in declaration order
    pub fn list(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// All ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a YAML list of entries
    pub fn from_yaml_str(source: &str, filename: &str) -> Result<Self, CatalogError> {
        let entries: Vec<T> = serde_yml::from_str(source)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))?;
        Self::new(entries)
    }

    /// Parse CSV with a header row naming the entry fields
    pub fn from_csv_reader<R: std::io::Read>(reader: R, filename: &str) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();
        for record in rdr.deserialize::<T>() {
            let entry = record.map_err(|e| CatalogError::Csv {
                file: filename.to_string(),
                message: e.to_string(),
            })?;
            entries.push(entry);
        }
        Self::new(entries)
    }

    /// Load a catalog file; `.csv` files are read as CSV, anything else as YAML
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let filename = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv_reader(content.as_bytes(), &filename)
        } else {
            Self::from_yaml_str(&content, &filename)
        }
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        let source = Self::builtin_source()?;
        Self::from_yaml_str(&source, T::FILE_NAME)
    }

    /// Raw text of the embedded catalog file, comments included
    pub fn builtin_source() -> Result<String, CatalogError> {
        let file = EmbeddedCatalogs::get(T::FILE_NAME)
            .ok_or(CatalogError::BuiltinMissing(T::FILE_NAME))?;
        Ok(String::from_utf8_lossy(&file.data).into_owned())
    }
}

/// Where a catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

impl CatalogSource {
    /// Prefer an explicit file, then a project copy that exists on disk, then the built-in table
    pub fn resolve(explicit: Option<&Path>, project_copy: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return CatalogSource::File(path.to_path_buf());
        }
        match project_copy {
            Some(path) if path.is_file() => CatalogSource::File(path),
            _ => CatalogSource::Builtin,
        }
    }

    fn load<T: CatalogEntry>(&self) -> Result<Catalog<T>, CatalogError> {
        let catalog = match self {
            CatalogSource::Builtin => Catalog::<T>::builtin()?,
            CatalogSource::File(path) => Catalog::<T>::from_path(path)?,
        };
        debug!(kind = T::KIND, source = %self, entries = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Builtin => write!(f, "built-in"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The two catalogs an estimate needs, loaded together at startup
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub materials: MaterialCatalog,
    pub furniture_types: FurnitureTypeCatalog,
}

impl Catalogs {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load(&CatalogSource::Builtin, &CatalogSource::Builtin)
    }

    pub fn load(materials: &CatalogSource, furniture_types: &CatalogSource) -> Result<Self, CatalogError> {
        Ok(Self {
            materials: materials.load()?,
            furniture_types: furniture_types.load()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn laminate(id: &str, price: f64) -> Material {
        Material {
            id: id.to_string(),
            name: id.to_string(),
            price_per_area: price,
            category: MaterialCategory::Laminate,
        }
    }

    #[test]
    fn test_catalog_preserves_declaration_order() {
        let catalog =
            Catalog::new(vec![laminate("zebra", 1.0), laminate("alpha", 2.0), laminate("mid", 3.0)])
                .unwrap();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["zebra", "alpha", "mid"]);

        // A second listing yields the full set again
        assert_eq!(catalog.list().count(), 3);
        assert_eq!(catalog.list().count(), 3);
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![laminate("oak", 1.0), laminate("oak", 2.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id, .. } if id == "oak"));
    }

    #[test]
    fn test_catalog_rejects_empty_id() {
        let err = Catalog::new(vec![laminate("  ", 1.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry { .. }));
    }

    #[test]
    fn test_catalog_rejects_empty_list() {
        let err = Catalog::<Material>::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::Empty { .. }));
    }

    #[test]
    fn test_get_miss_lists_available_ids() {
        let catalog = Catalog::new(vec![laminate("oak", 1.0)]).unwrap();
        match catalog.get("unobtainium").unwrap_err() {
            CatalogError::MaterialNotFound { id, help } => {
                assert_eq!(id, "unobtainium");
                assert!(help.unwrap().contains("oak"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_yaml_parse_error_is_diagnostic() {
        let source = "- id: oak\n  name: Oak\n  price_per_area: cheap\n  category: wood\n";
        let err = Catalog::<Material>::from_yaml_str(source, "materials.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
    }

    #[test]
    fn test_from_path_reads_csv_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("materials.csv");
        std::fs::write(
            &path,
            "id,name,price_per_area,category\noak,Oak board,3200,wood\nglass,Glass,3000,glass\n",
        )
        .unwrap();

        let catalog = Catalog::<Material>::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("oak").unwrap().price_per_area, 3200.0);
        assert_eq!(catalog.get("glass").unwrap().category, MaterialCategory::Glass);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = Catalog::<Material>::from_path(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_source_resolution_order() {
        let dir = tempdir().unwrap();
        let copy = dir.path().join("materials.yaml");

        // Project copy that does not exist falls back to built-in
        assert_eq!(CatalogSource::resolve(None, Some(copy.clone())), CatalogSource::Builtin);

        std::fs::write(&copy, "").unwrap();
        assert_eq!(
            CatalogSource::resolve(None, Some(copy.clone())),
            CatalogSource::File(copy.clone())
        );

        let explicit = dir.path().join("other.csv");
        assert_eq!(
            CatalogSource::resolve(Some(&explicit), Some(copy)),
            CatalogSource::File(explicit)
        );
    }

    #[test]
    fn test_builtin_catalogs_load() {
        let catalogs = Catalogs::builtin().unwrap();
        assert!(!catalogs.materials.is_empty());
        assert!(!catalogs.furniture_types.is_empty());
    }
}
