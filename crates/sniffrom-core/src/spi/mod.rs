//! SPI flash command knowledge
//!
//! This module provides the opcode constants seen on the bus, the address
//! decoding rules, and the command catalog used to classify transactions.

mod address;
mod catalog;
pub mod opcodes;

pub use address::{AddressConfig, AddressWidth, Endianness};
pub(crate) use catalog::catalog_index;
pub use catalog::{describe, CommandInfo, OpcodeClass, CATALOG};
