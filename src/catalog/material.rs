//! Sheet and finishing materials priced per square meter

use serde::{Deserialize, Serialize};

use super::{available_help, Catalog, CatalogEntry, CatalogError};

/// Material category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Wood,
    Laminate,
    Veneer,
    Mdf,
    Metal,
    Glass,
    Plastic,
    Fabric,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 8] = [
        MaterialCategory::Wood,
        MaterialCategory::Laminate,
        MaterialCategory::Veneer,
        MaterialCategory::Mdf,
        MaterialCategory::Metal,
        MaterialCategory::Glass,
        MaterialCategory::Plastic,
        MaterialCategory::Fabric,
    ];
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialCategory::Wood => write!(f, "wood"),
            MaterialCategory::Laminate => write!(f, "laminate"),
            MaterialCategory::Veneer => write!(f, "veneer"),
            MaterialCategory::Mdf => write!(f, "mdf"),
            MaterialCategory::Metal => write!(f, "metal"),
            MaterialCategory::Glass => write!(f, "glass"),
            MaterialCategory::Plastic => write!(f, "plastic"),
            MaterialCategory::Fabric => write!(f, "fabric"),
        }
    }
}

impl std::str::FromStr for MaterialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialCategory::ALL
            .into_iter()
            .find(|c| c.to_string() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid category: {}. Use wood, laminate, veneer, mdf, metal, glass, plastic, or fabric",
                    s
                )
            })
    }
}

/// A material that furniture bodies are cut from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Stable identifier (not the display name)
    pub id: String,

    /// Localized display name
    pub name: String,

    /// Price in currency units per square meter
    pub price_per_area: f64,

    pub category: MaterialCategory,
}

impl CatalogEntry for Material {
    const KIND: &'static str = "material";
    const FILE_NAME: &'static str = "materials.yaml";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        if !self.price_per_area.is_finite() || self.price_per_area <= 0.0 {
            return Err(format!(
                "price_per_area must be a positive number, got {}",
                self.price_per_area
            ));
        }
        Ok(())
    }

    fn not_found(id: &str, available: &[&str]) -> CatalogError {
        CatalogError::MaterialNotFound {
            id: id.to_string(),
            help: available_help("material", available),
        }
    }
}

pub type MaterialCatalog = Catalog<Material>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in MaterialCategory::ALL {
            let parsed: MaterialCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!("MDF".parse::<MaterialCategory>().unwrap(), MaterialCategory::Mdf);
        assert!("granite".parse::<MaterialCategory>().is_err());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        for price in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let material = Material {
                id: "bad".to_string(),
                name: "Bad".to_string(),
                price_per_area: price,
                category: MaterialCategory::Mdf,
            };
            assert!(material.validate().is_err(), "price {price} accepted");
        }
    }

    #[test]
    fn test_builtin_material_catalog() {
        let catalog = MaterialCatalog::builtin().unwrap();
        let laminate = catalog.get("laminate_white").unwrap();
        assert_eq!(laminate.price_per_area, 800.0);
        assert_eq!(laminate.category, MaterialCategory::Laminate);
        assert!(catalog.list().all(|m| m.price_per_area > 0.0));
    }

    #[test]
    fn test_yaml_entry_shape() {
        let yaml = "- id: oak\n  name: Дуб\n  price_per_area: 3200\n  category: wood\n";
        let catalog = MaterialCatalog::from_yaml_str(yaml, "materials.yaml").unwrap();
        let oak = catalog.get("oak").unwrap();
        assert_eq!(oak.name, "Дуб");
        assert_eq!(oak.category, MaterialCategory::Wood);
    }
}
