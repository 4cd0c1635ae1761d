//! Command implementations

pub mod completions;
pub mod config;
pub mod estimate;
pub mod furniture;
pub mod init;
pub mod material;
pub mod utils;
