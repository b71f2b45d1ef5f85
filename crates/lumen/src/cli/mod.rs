//! Command implementations for the `lumen` binary.

pub mod config;
pub mod process;
