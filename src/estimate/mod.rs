//! Cost estimation for furniture designs
//!
//! Given a furniture type, a material and the outer box of a design, the
//! estimator derives the surface area, scales it for internal parts, and
//! composes material cost, labor cost and add-on surcharges into a
//! [`CostEstimate`].

pub mod dimensions;
pub mod error;
pub mod estimator;
pub mod rates;
pub mod request;

pub use dimensions::{Dimensions, LengthUnit, MM2_PER_M2};
pub use error::{DimensionField, DimensionIssue, EstimationError};
pub use estimator::{
    round_money, AddOn, AddOnSelection, CostEstimate, CostEstimator, EstimateOptions,
};
pub use rates::{PricingOverrides, PricingRates, RatesError};
pub use request::{EstimateRequest, EstimateResponse, RawDimensions, RequestOptions};
