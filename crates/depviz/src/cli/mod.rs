//! CLI command implementations.

mod display;

pub mod run;
