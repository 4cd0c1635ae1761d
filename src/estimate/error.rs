//! Estimation failures

use serde::Serialize;
use std::fmt;

/// Which box dimension failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionField {
    Width,
    Height,
    Depth,
}

impl fmt::Display for DimensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionField::Width => write!(f, "width"),
            DimensionField::Height => write!(f, "height"),
            DimensionField::Depth => write!(f, "depth"),
        }
    }
}

/// What was wrong with a dimension value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionIssue {
    Missing,
    NonNumeric,
    NonPositive,
    NonFinite,
}

impl fmt::Display for DimensionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionIssue::Missing => write!(f, "is missing"),
            DimensionIssue::NonNumeric => write!(f, "is not a number"),
            DimensionIssue::NonPositive => write!(f, "must be greater than zero"),
            DimensionIssue::NonFinite => write!(f, "must be a finite number"),
        }
    }
}

/// Why an estimate could not be produced
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
pub enum EstimationError {
    #[error("unknown furniture type '{id}'")]
    #[diagnostic(code(craftruv::estimate::unknown_furniture_type))]
    UnknownFurnitureType {
        id: String,
        #[help]
        help: Option<String>,
    },

    #[error("unknown material '{id}'")]
    #[diagnostic(code(craftruv::estimate::unknown_material))]
    UnknownMaterial {
        id: String,
        #[help]
        help: Option<String>,
    },

    #[error("invalid dimensions: {field} {issue}")]
    #[diagnostic(
        code(craftruv::estimate::invalid_dimensions),
        help("width, height and depth are all required and must be positive numbers")
    )]
    InvalidDimensions {
        field: DimensionField,
        issue: DimensionIssue,
    },

    /// Each dimension is valid on its own but the area or a price leaves the f64 range
    #[error("invalid dimensions: the design is too {} to price", size_word(.too_large))]
    #[diagnostic(
        code(craftruv::estimate::out_of_range),
        help("Check the unit (--unit mm|cm|m) and the magnitude of width, height and depth")
    )]
    OutOfRange { too_large: bool },
}

fn size_word(too_large: &bool) -> &'static str {
    if *too_large {
        "large"
    } else {
        "small"
    }
}

impl EstimationError {
    pub fn invalid(field: DimensionField, issue: DimensionIssue) -> Self {
        EstimationError::InvalidDimensions { field, issue }
    }

    /// HTTP status the web layer answers with; every estimation failure is a client error
    pub fn status_code(&self) -> u16 {
        400
    }
}
