//! Box dimensions, always held in millimeters

use serde::{Deserialize, Serialize};

use super::error::{DimensionField, DimensionIssue, EstimationError};

/// Square millimeters in one square meter
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Unit a caller supplies lengths in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
}

impl LengthUnit {
    /// Millimeters per one of this unit
    pub fn millimeters(self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::M => 1000.0,
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Mm => write!(f, "mm"),
            LengthUnit::Cm => write!(f, "cm"),
            LengthUnit::M => write!(f, "m"),
        }
    }
}

/// Outer width, height and depth of a furniture body in millimeters
///
/// Values are validated on construction, so every `Dimensions` is strictly
/// positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    width: f64,
    height: f64,
    depth: f64,
}

impl Dimensions {
    /// Build from millimeter values
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, EstimationError> {
        Self::with_unit(width, height, depth, LengthUnit::Mm)
    }

    /// Build from values in `unit`, converting to millimeters once
    ///
    /// Fields are checked after conversion, in width, height, depth order,
    /// and the first bad one is reported.
    pub fn with_unit(
        width: f64,
        height: f64,
        depth: f64,
        unit: LengthUnit,
    ) -> Result<Self, EstimationError> {
        let factor = unit.millimeters();
        Ok(Self {
            width: check(DimensionField::Width, width * factor)?,
            height: check(DimensionField::Height, height * factor)?,
            depth: check(DimensionField::Depth, depth * factor)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Total outer surface of the box in mm²: 2wh + 2wd + 2hd
    pub fn surface_area_mm2(&self) -> f64 {
        2.0 * (self.width * self.height)
            + 2.0 * (self.width * self.depth)
            + 2.0 * (self.height * self.depth)
    }

    /// Total outer surface of the box in m²
    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_mm2() / MM2_PER_M2
    }
}

fn check(field: DimensionField, value: f64) -> Result<f64, EstimationError> {
    if value.is_nan() || value.is_infinite() {
        return Err(EstimationError::invalid(field, DimensionIssue::NonFinite));
    }
    if value <= 0.0 {
        return Err(EstimationError::invalid(field, DimensionIssue::NonPositive));
    }
    Ok(value)
}
