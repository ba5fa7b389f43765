//! Unit test harness for antenna-pointing.
//!
//! Configuration parsing and validation through the public API.

mod config_parsing;
mod config_validation;
