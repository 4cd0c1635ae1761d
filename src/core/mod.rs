//! Core module - project layout and configuration

pub mod config;
pub mod project;

pub use config::Config;
pub use project::{Project, ProjectError};
