//! YAML helpers shared by catalog loading

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
