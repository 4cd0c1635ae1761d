//! Furniture types and their assembly complexity multipliers

use serde::{Deserialize, Serialize};

use super::{available_help, Catalog, CatalogEntry, CatalogError};

/// A kind of corpus furniture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureType {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Scales material + labor cost to reflect how involved the build is
    pub base_multiplier: f64,
}

impl CatalogEntry for FurnitureType {
    const KIND: &'static str = "furniture type";
    const FILE_NAME: &'static str = "furniture_types.yaml";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if !self.base_multiplier.is_finite() || self.base_multiplier <= 0.0 {
            return Err(format!(
                "base_multiplier must be a positive number, got {}",
                self.base_multiplier
            ));
        }
        Ok(())
    }

    fn not_found(id: &str, available: &[&str]) -> CatalogError {
        CatalogError::FurnitureTypeNotFound {
            id: id.to_string(),
            help: available_help("furniture", available),
        }
    }
}

pub type FurnitureTypeCatalog = Catalog<FurnitureType>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_furniture_catalog() {
        let catalog = FurnitureTypeCatalog::builtin().unwrap();
        assert_eq!(catalog.get("cabinet").unwrap().base_multiplier, 1.0);
        assert_eq!(catalog.get("kitchen").unwrap().base_multiplier, 1.3);
        assert_eq!(catalog.ids().next(), Some("cabinet"));
    }

    #[test]
    fn test_miss_is_furniture_type_not_found() {
        let catalog = FurnitureTypeCatalog::builtin().unwrap();
        let err = catalog.get("spaceship").unwrap_err();
        assert!(matches!(err, CatalogError::FurnitureTypeNotFound { .. }));
        assert_eq!(err.to_string(), "furniture type 'spaceship' not found");
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        let yaml = "- id: flat\n  name: Flat\n  base_multiplier: 0\n";
        let err = FurnitureTypeCatalog::from_yaml_str(yaml, "furniture_types.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry { ref id, .. } if id == "flat"));
    }

    #[test]
    fn test_description_optional_in_csv() {
        let csv = "id,name,description,base_multiplier\nbench,Скамья,,0.8\n";
        let catalog = FurnitureTypeCatalog::from_csv_reader(csv.as_bytes(), "types.csv").unwrap();
        let bench = catalog.get("bench").unwrap();
        assert_eq!(bench.description, "");
        assert_eq!(bench.base_multiplier, 0.8);
    }
}
