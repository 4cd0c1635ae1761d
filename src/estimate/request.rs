//! JSON request and response envelope used by the web layer
//!
//! Dimension fields arrive as arbitrary JSON so that a missing or non-numeric
//! value is reported as an invalid dimension instead of a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dimensions::{Dimensions, LengthUnit};
use super::error::{DimensionField, DimensionIssue, EstimationError};
use super::estimator::{AddOnSelection, CostEstimate, CostEstimator, EstimateOptions};

/// Dimensions as received, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDimensions {
    pub width: Option<Value>,
    pub height: Option<Value>,
    pub depth: Option<Value>,
    pub unit: LengthUnit,
}

impl RawDimensions {
    pub fn from_numbers(width: Option<f64>, height: Option<f64>, depth: Option<f64>, unit: LengthUnit) -> Self {
        // JSON numbers cannot hold NaN or infinity; keep those as text so they
        // are still reported as non-finite rather than missing
        let to_value = |v: Option<f64>| {
            v.map(|n| match serde_json::Number::from_f64(n) {
                Some(num) => Value::Number(num),
                None => Value::String(n.to_string()),
            })
        };
        Self {
            width: to_value(width),
            height: to_value(height),
            depth: to_value(depth),
            unit,
        }
    }

    /// Validate in width, height, depth order
    pub fn resolve(&self) -> Result<Dimensions, EstimationError> {
        let width = number(DimensionField::Width, self.width.as_ref())?;
        let height = number(DimensionField::Height, self.height.as_ref())?;
        let depth = number(DimensionField::Depth, self.depth.as_ref())?;
        Dimensions::with_unit(width, height, depth, self.unit)
    }
}

/// Accepts JSON numbers and numeric strings (HTML form fields arrive as text)
fn number(field: DimensionField, value: Option<&Value>) -> Result<f64, EstimationError> {
    match value {
        None | Some(Value::Null) => Err(EstimationError::invalid(field, DimensionIssue::Missing)),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| EstimationError::invalid(field, DimensionIssue::NonNumeric)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(EstimationError::invalid(field, DimensionIssue::Missing))
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| EstimationError::invalid(field, DimensionIssue::NonNumeric)),
        Some(_) => Err(EstimationError::invalid(field, DimensionIssue::NonNumeric)),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    pub add_ons: AddOnSelection,
}

/// `{ furnitureType, material, dimensions: { width, height, depth, unit? }, options? }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimateRequest {
    pub furniture_type: String,
    pub material: String,
    pub dimensions: RawDimensions,
    pub options: RequestOptions,
}

impl EstimateRequest {
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Validate dimensions, then price the design
    pub fn evaluate(&self, estimator: &CostEstimator<'_>) -> Result<CostEstimate, EstimationError> {
        let dimensions = self.dimensions.resolve()?;
        let options = EstimateOptions {
            add_ons: self.options.add_ons,
        };
        estimator.estimate(&self.furniture_type, &self.material, &dimensions, &options)
    }
}

/// `{ success: true, data }` or `{ success: false, message }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CostEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    status: u16,
}

impl EstimateResponse {
    /// Monetary values in `data` are rounded to 2 decimals for display
    pub fn success(estimate: &CostEstimate) -> Self {
        Self {
            success: true,
            data: Some(estimate.rounded()),
            message: None,
            status: 200,
        }
    }

    pub fn failure(err: &EstimationError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(err.to_string()),
            status: err.status_code(),
        }
    }

    pub fn from_result(result: &Result<CostEstimate, EstimationError>) -> Self {
        match result {
            Ok(estimate) => Self::success(estimate),
            Err(err) => Self::failure(err),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }
}
