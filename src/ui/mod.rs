//! Console presentation layer
//!
//! Diagnostics go through `tracing`; everything a user is meant to read as a
//! result (tool paths, settings, conversion statistics) is printed from here.

pub mod display;
