//! CraftRuv: furniture cost and material estimation
//!
//! Prices corpus furniture (cabinets, kitchens, wardrobes, tables) from a
//! furniture type, a sheet material and the outer box dimensions of a design.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod estimate;
pub mod quote;
pub mod yaml;
