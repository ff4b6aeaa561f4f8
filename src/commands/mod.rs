//! CLI command implementations
//!
//! The `sniff` module drives a reconstruction run; `dump`, `graph` and
//! `report` format its results for the terminal and for files.

mod dump;
mod graph;
mod report;
pub mod sniff;

pub use sniff::{run_sniff, SniffOptions, WRITES_OUTPUT};
