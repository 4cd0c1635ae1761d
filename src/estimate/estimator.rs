//! Price breakdown for a furniture design

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::dimensions::Dimensions;
use super::error::EstimationError;
use super::rates::PricingRates;
use crate::catalog::{available_help, FurnitureTypeCatalog, MaterialCatalog};

/// Surcharge computed as a fixed fraction of total cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddOn {
    Delivery,
    Assembly,
    Warranty,
}

impl AddOn {
    pub const ALL: [AddOn; 3] = [AddOn::Delivery, AddOn::Assembly, AddOn::Warranty];
}

impl std::fmt::Display for AddOn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddOn::Delivery => write!(f, "delivery"),
            AddOn::Assembly => write!(f, "assembly"),
            AddOn::Warranty => write!(f, "warranty"),
        }
    }
}

/// Which add-ons to charge; all of them unless switched off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AddOnSelection {
    pub delivery: bool,
    pub assembly: bool,
    pub warranty: bool,
}

impl Default for AddOnSelection {
    fn default() -> Self {
        Self {
            delivery: true,
            assembly: true,
            warranty: true,
        }
    }
}

impl AddOnSelection {
    pub fn includes(&self, add_on: AddOn) -> bool {
        match add_on {
            AddOn::Delivery => self.delivery,
            AddOn::Assembly => self.assembly,
            AddOn::Warranty => self.warranty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstimateOptions {
    pub add_ons: AddOnSelection,
}

/// Computed price breakdown
///
/// Values keep full precision; use [`CostEstimate::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub furniture_type: String,
    pub material: String,
    pub dimensions: Dimensions,
    /// Outer box surface in m²
    pub surface_area: f64,
    /// Surface scaled by the internal-parts factor, in m²
    pub adjusted_area: f64,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub add_ons: BTreeMap<AddOn, f64>,
    pub total_with_add_ons: f64,
}

impl CostEstimate {
    pub fn add_on(&self, add_on: AddOn) -> Option<f64> {
        self.add_ons.get(&add_on).copied()
    }

    /// Copy with every monetary value rounded to 2 decimals
    pub fn rounded(&self) -> CostEstimate {
        CostEstimate {
            material_cost: round_money(self.material_cost),
            labor_cost: round_money(self.labor_cost),
            total_cost: round_money(self.total_cost),
            add_ons: self
                .add_ons
                .iter()
                .map(|(&k, &v)| (k, round_money(v)))
                .collect(),
            total_with_add_ons: round_money(self.total_with_add_ons),
            ..self.clone()
        }
    }
}

/// Round to 2 decimal places
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices designs against a pair of catalogs
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator<'a> {
    materials: &'a MaterialCatalog,
    furniture_types: &'a FurnitureTypeCatalog,
    rates: PricingRates,
}

impl<'a> CostEstimator<'a> {
    pub fn new(materials: &'a MaterialCatalog, furniture_types: &'a FurnitureTypeCatalog) -> Self {
        Self {
            materials,
            furniture_types,
            rates: PricingRates::default(),
        }
    }

    /// Use rates other than the built-in constants; callers validate them first
    pub fn with_rates(mut self, rates: PricingRates) -> Self {
        self.rates = rates;
        self
    }

    /// Compute the price breakdown for one design
    ///
    /// The furniture type is resolved before the material, so a request with
    /// both ids wrong reports the furniture type.
    pub fn estimate(
        &self,
        furniture_type_id: &str,
        material_id: &str,
        dimensions: &Dimensions,
        options: &EstimateOptions,
    ) -> Result<CostEstimate, EstimationError> {
        let furniture_type = self.furniture_types.find(furniture_type_id).ok_or_else(|| {
            let ids: Vec<&str> = self.furniture_types.ids().collect();
            EstimationError::UnknownFurnitureType {
                id: furniture_type_id.to_string(),
                help: available_help("furniture", &ids),
            }
        })?;
        let material = self.materials.find(material_id).ok_or_else(|| {
            let ids: Vec<&str> = self.materials.ids().collect();
            EstimationError::UnknownMaterial {
                id: material_id.to_string(),
                help: available_help("material", &ids),
            }
        })?;

        let surface_area = dimensions.surface_area_m2();
        let adjusted_area = surface_area * self.rates.internal_parts_factor;
        let material_cost = adjusted_area * material.price_per_area;
        let labor_cost = adjusted_area * self.rates.labor_rate;
        let total_cost = (material_cost + labor_cost) * furniture_type.base_multiplier;

        let add_ons: BTreeMap<AddOn, f64> = AddOn::ALL
            .into_iter()
            .filter(|a| options.add_ons.includes(*a))
            .map(|a| (a, total_cost * self.rates.add_on_rate(a)))
            .collect();
        let total_with_add_ons = total_cost + add_ons.values().sum::<f64>();

        // Valid dimensions can still overflow to inf or underflow to 0 once multiplied
        let amounts = [
            surface_area,
            adjusted_area,
            material_cost,
            labor_cost,
            total_cost,
            total_with_add_ons,
        ];
        if let Some(bad) = amounts
            .into_iter()
            .chain(add_ons.values().copied())
            .find(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(EstimationError::OutOfRange {
                too_large: !bad.is_finite(),
            });
        }

        debug!(
            furniture_type = furniture_type_id,
            material = material_id,
            surface_area,
            total_cost,
            "estimated design"
        );

        Ok(CostEstimate {
            furniture_type: furniture_type.id.clone(),
            material: material.id.clone(),
            dimensions: *dimensions,
            surface_area,
            adjusted_area,
            material_cost,
            labor_cost,
            total_cost,
            add_ons,
            total_with_add_ons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FurnitureType, Material, MaterialCategory};
    use crate::estimate::error::{DimensionField, DimensionIssue};
    use rand::Rng;

    const EPS: f64 = 1e-6;

    fn fixtures() -> (MaterialCatalog, FurnitureTypeCatalog) {
        let materials = MaterialCatalog::new(vec![
            Material {
                id: "laminate_white".to_string(),
                name: "ЛДСП белая".to_string(),
                price_per_area: 800.0,
                category: MaterialCategory::Laminate,
            },
            Material {
                id: "solid_oak".to_string(),
                name: "Массив дуба".to_string(),
                price_per_area: 6500.0,
                category: MaterialCategory::Wood,
            },
        ])
        .unwrap();
        let furniture = FurnitureTypeCatalog::new(vec![
            FurnitureType {
                id: "cabinet".to_string(),
                name: "Шкаф".to_string(),
                description: String::new(),
                base_multiplier: 1.0,
            },
            FurnitureType {
                id: "kitchen".to_string(),
                name: "Кухня".to_string(),
                description: String::new(),
                base_multiplier: 1.3,
            },
        ])
        .unwrap();
        (materials, furniture)
    }

    fn reference_dims() -> Dimensions {
        Dimensions::new(800.0, 2000.0, 600.0).unwrap()
    }

    #[test]
    fn test_reference_cabinet_breakdown() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let est = estimator
            .estimate("cabinet", "laminate_white", &reference_dims(), &EstimateOptions::default())
            .unwrap();

        assert!((est.surface_area - 6.56).abs() < EPS);
        assert!((est.adjusted_area - 16.4).abs() < EPS);
        assert!((est.material_cost - 13_120.0).abs() < EPS);
        assert!((est.labor_cost - 24_600.0).abs() < EPS);
        assert!((est.total_cost - 37_720.0).abs() < EPS);
        assert!((est.add_on(AddOn::Delivery).unwrap() - 1_886.0).abs() < EPS);
        assert!((est.add_on(AddOn::Assembly).unwrap() - 3_772.0).abs() < EPS);
        assert!((est.add_on(AddOn::Warranty).unwrap() - 754.4).abs() < EPS);
        assert!((est.total_with_add_ons - 44_132.4).abs() < EPS);

        let rounded = est.rounded();
        assert_eq!(rounded.total_cost, 37_720.0);
        assert_eq!(rounded.total_with_add_ons, 44_132.4);
    }

    #[test]
    fn test_kitchen_multiplier() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let est = estimator
            .estimate("kitchen", "laminate_white", &reference_dims(), &EstimateOptions::default())
            .unwrap();
        assert!((est.total_cost - 49_036.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_material() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let err = estimator
            .estimate("cabinet", "unobtainium", &reference_dims(), &EstimateOptions::default())
            .unwrap_err();
        assert!(matches!(err, EstimationError::UnknownMaterial { ref id, .. } if id == "unobtainium"));
    }

    #[test]
    fn test_unknown_furniture_type() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let err = estimator
            .estimate("spaceship", "unobtainium", &reference_dims(), &EstimateOptions::default())
            .unwrap_err();
        assert!(matches!(err, EstimationError::UnknownFurnitureType { .. }));
    }

    #[test]
    fn test_zero_width_never_reaches_estimator() {
        let err = Dimensions::new(0.0, 100.0, 100.0).unwrap_err();
        assert_eq!(
            err,
            EstimationError::invalid(DimensionField::Width, DimensionIssue::NonPositive)
        );
    }

    #[test]
    fn test_disabled_add_ons_excluded_from_total() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let options = EstimateOptions {
            add_ons: AddOnSelection {
                delivery: false,
                assembly: true,
                warranty: false,
            },
        };
        let est = estimator
            .estimate("cabinet", "laminate_white", &reference_dims(), &options)
            .unwrap();

        assert_eq!(est.add_ons.len(), 1);
        assert!(est.add_on(AddOn::Delivery).is_none());
        assert!((est.total_with_add_ons - (37_720.0 + 3_772.0)).abs() < EPS);
    }

    #[test]
    fn test_custom_rates() {
        let (materials, furniture) = fixtures();
        let rates = PricingRates {
            labor_rate: 2000.0,
            ..PricingRates::default()
        };
        let estimator = CostEstimator::new(&materials, &furniture).with_rates(rates);
        let est = estimator
            .estimate("cabinet", "laminate_white", &reference_dims(), &EstimateOptions::default())
            .unwrap();
        assert!((est.labor_cost - 16.4 * 2000.0).abs() < EPS);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let dims = Dimensions::new(1234.5, 987.25, 432.125).unwrap();
        let a = estimator
            .estimate("kitchen", "solid_oak", &dims, &EstimateOptions::default())
            .unwrap();
        let b = estimator
            .estimate("kitchen", "solid_oak", &dims, &EstimateOptions::default())
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_with_add_ons.to_bits(), b.total_with_add_ons.to_bits());
    }

    #[test]
    fn test_random_designs_are_positive_monotone_and_proportional() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let mut rng = rand::rng();

        for _ in 0..500 {
            let w = rng.random_range(1.0..3000.0);
            let h = rng.random_range(1.0..3000.0);
            let d = rng.random_range(1.0..1000.0);
            let grow = rng.random_range(0.0..500.0);
            let furniture_id = if rng.random_bool(0.5) { "cabinet" } else { "kitchen" };
            let material_id = if rng.random_bool(0.5) { "laminate_white" } else { "solid_oak" };

            let base = estimator
                .estimate(
                    furniture_id,
                    material_id,
                    &Dimensions::new(w, h, d).unwrap(),
                    &EstimateOptions::default(),
                )
                .unwrap();

            assert!(base.surface_area > 0.0);
            assert!(base.material_cost > 0.0);
            assert!(base.labor_cost > 0.0);
            assert!(base.total_cost > 0.0);
            assert!(base.add_ons.values().all(|v| *v > 0.0));

            let ratio = |a: AddOn| base.add_on(a).unwrap() / base.total_cost;
            assert!((ratio(AddOn::Delivery) - 0.05).abs() < 1e-12);
            assert!((ratio(AddOn::Assembly) - 0.10).abs() < 1e-12);
            assert!((ratio(AddOn::Warranty) - 0.02).abs() < 1e-12);

            for grown in [
                Dimensions::new(w + grow, h, d).unwrap(),
                Dimensions::new(w, h + grow, d).unwrap(),
                Dimensions::new(w, h, d + grow).unwrap(),
            ] {
                let bigger = estimator
                    .estimate(furniture_id, material_id, &grown, &EstimateOptions::default())
                    .unwrap();
                assert!(bigger.adjusted_area >= base.adjusted_area);
                assert!(bigger.material_cost >= base.material_cost);
                assert!(bigger.labor_cost >= base.labor_cost);
                assert!(bigger.total_cost >= base.total_cost);
            }
        }
    }

    #[test]
    fn test_huge_design_overflow_is_rejected() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let dims = Dimensions::new(1e200, 1e200, 1.0).unwrap();
        let err = estimator
            .estimate("cabinet", "laminate_white", &dims, &EstimateOptions::default())
            .unwrap_err();
        assert_eq!(err, EstimationError::OutOfRange { too_large: true });
    }

    #[test]
    fn test_tiny_design_underflow_is_rejected() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        let dims = Dimensions::new(1e-160, 1e-160, 1e-160).unwrap();
        assert_eq!(dims.surface_area_m2(), 0.0);
        let err = estimator
            .estimate("cabinet", "laminate_white", &dims, &EstimateOptions::default())
            .unwrap_err();
        assert_eq!(err, EstimationError::OutOfRange { too_large: false });
    }

    #[test]
    fn test_extreme_but_representable_designs_stay_positive_and_finite() {
        let (materials, furniture) = fixtures();
        let estimator = CostEstimator::new(&materials, &furniture);
        for (w, h, d) in [(1e-3, 1e-3, 1e-3), (1e9, 1e9, 1e9), (0.5, 1e6, 0.5)] {
            let est = estimator
                .estimate(
                    "kitchen",
                    "solid_oak",
                    &Dimensions::new(w, h, d).unwrap(),
                    &EstimateOptions::default(),
                )
                .unwrap();
            assert!(est.surface_area.is_finite() && est.surface_area > 0.0);
            assert!(est.total_with_add_ons.is_finite() && est.total_with_add_ons > 0.0);
            assert!(est.add_ons.values().all(|v| v.is_finite() && *v > 0.0));
        }
    }
}
