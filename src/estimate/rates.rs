//! Pricing constants and their configurable overrides

use serde::{Deserialize, Serialize};

use super::AddOn;

/// Labor cost per square meter of adjusted area
pub const LABOR_RATE: f64 = 1500.0;

/// Multiplier from outer box surface to material actually consumed,
/// covering shelves and partitions
pub const INTERNAL_PARTS_FACTOR: f64 = 2.5;

pub const DELIVERY_RATE: f64 = 0.05;
pub const ASSEMBLY_RATE: f64 = 0.10;
pub const WARRANTY_RATE: f64 = 0.02;

/// Invalid pricing configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
#[error("invalid pricing setting '{key}': {value} (must be a positive number)")]
#[diagnostic(
    code(craftruv::config::pricing),
    help("Check the pricing section of your config with `craftruv config show`")
)]
pub struct RatesError {
    pub key: &'static str,
    pub value: f64,
}

/// Rates used by the estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRates {
    pub labor_rate: f64,
    pub internal_parts_factor: f64,
    pub delivery_rate: f64,
    pub assembly_rate: f64,
    pub warranty_rate: f64,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            labor_rate: LABOR_RATE,
            internal_parts_factor: INTERNAL_PARTS_FACTOR,
            delivery_rate: DELIVERY_RATE,
            assembly_rate: ASSEMBLY_RATE,
            warranty_rate: WARRANTY_RATE,
        }
    }
}

impl PricingRates {
    /// Fraction of total cost charged for an add-on
    pub fn add_on_rate(&self, add_on: AddOn) -> f64 {
        match add_on {
            AddOn::Delivery => self.delivery_rate,
            AddOn::Assembly => self.assembly_rate,
            AddOn::Warranty => self.warranty_rate,
        }
    }

    /// Every rate must be positive and finite so every estimate stays positive
    pub fn validate(&self) -> Result<(), RatesError> {
        let fields = [
            ("pricing.labor_rate", self.labor_rate),
            ("pricing.internal_parts_factor", self.internal_parts_factor),
            ("pricing.delivery_rate", self.delivery_rate),
            ("pricing.assembly_rate", self.assembly_rate),
            ("pricing.warranty_rate", self.warranty_rate),
        ];
        for (key, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(RatesError { key, value });
            }
        }
        Ok(())
    }
}

/// Partial rates from a config layer; unset fields keep the lower layer's value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labor_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_parts_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_rate: Option<f64>,
}

impl PricingOverrides {
    /// Merge another layer into this one (other takes precedence)
    pub fn merge(&mut self, other: PricingOverrides) {
        self.labor_rate = other.labor_rate.or(self.labor_rate);
        self.internal_parts_factor = other.internal_parts_factor.or(self.internal_parts_factor);
        self.delivery_rate = other.delivery_rate.or(self.delivery_rate);
        self.assembly_rate = other.assembly_rate.or(self.assembly_rate);
        self.warranty_rate = other.warranty_rate.or(self.warranty_rate);
    }

    /// Apply the overrides on top of the built-in rates and validate the result
    pub fn resolve(&self) -> Result<PricingRates, RatesError> {
        let defaults = PricingRates::default();
        let rates = PricingRates {
            labor_rate: self.labor_rate.unwrap_or(defaults.labor_rate),
            internal_parts_factor: self
                .internal_parts_factor
                .unwrap_or(defaults.internal_parts_factor),
            delivery_rate: self.delivery_rate.unwrap_or(defaults.delivery_rate),
            assembly_rate: self.assembly_rate.unwrap_or(defaults.assembly_rate),
            warranty_rate: self.warranty_rate.unwrap_or(defaults.warranty_rate),
        };
        rates.validate()?;
        Ok(rates)
    }
}
