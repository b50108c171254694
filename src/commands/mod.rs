//! Command implementations for the jpegli-explorer CLI

pub mod clean;
pub mod completions;
pub mod convert;
pub mod install;
pub mod settings;
pub mod tools;
pub mod version;
