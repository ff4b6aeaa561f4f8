//! Run statistics
//!
//! Counts transactions per cataloged opcode, unknown opcodes, first-touch
//! bytes, and write events. Re-reads and re-writes of an address do not add
//! to the discovered byte count; every write event adds to the write count.

use crate::decoder::{AccessKind, JedecId, TransactionSummary};
use crate::image::Applied;
use crate::spi::{catalog_index, CATALOG};

/// One row of the opcode summary table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeCount {
    /// Opcode, or `None` for the aggregate unknown row
    pub opcode: Option<u8>,
    /// Catalog description (empty for unknown)
    pub description: &'static str,
    /// Number of transactions
    pub count: u64,
}

/// Statistics accumulated over a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    per_opcode: Vec<u64>,
    unknown: u64,
    bytes_discovered: u64,
    bytes_written: u64,
    jedec_id: Option<JedecId>,
    device_id: Option<u8>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Empty statistics
    pub fn new() -> Self {
        Self {
            per_opcode: vec![0; CATALOG.len()],
            unknown: 0,
            bytes_discovered: 0,
            bytes_written: 0,
            jedec_id: None,
            device_id: None,
        }
    }

    /// Record a finished transaction
    pub fn record_transaction(&mut self, summary: &TransactionSummary) {
        match summary.opcode().and_then(catalog_index) {
            Some(i) => self.per_opcode[i] += 1,
            None => self.unknown += 1,
        }
        if summary.jedec_id.is_some() {
            self.jedec_id = summary.jedec_id;
        }
        if summary.device_id.is_some() {
            self.device_id = summary.device_id;
        }
    }

    /// Record a byte event that was folded into the image
    pub fn record_byte(&mut self, kind: AccessKind, applied: &Applied) {
        if applied.is_first_touch() {
            self.bytes_discovered += 1;
        }
        if kind == AccessKind::Write {
            self.bytes_written += 1;
        }
    }

    /// Number of transactions with `opcode`
    pub fn count(&self, opcode: u8) -> u64 {
        catalog_index(opcode).map_or(0, |i| self.per_opcode[i])
    }

    /// Number of transactions with an opcode outside the catalog
    pub fn unknown(&self) -> u64 {
        self.unknown
    }

    /// Distinct addresses touched by reads or writes
    pub fn bytes_discovered(&self) -> u64 {
        self.bytes_discovered
    }

    /// Write events, including repeated writes to one address
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Most recent complete JEDEC id
    pub fn jedec_id(&self) -> Option<JedecId> {
        self.jedec_id
    }

    /// Most recent RES device id
    pub fn device_id(&self) -> Option<u8> {
        self.device_id
    }

    /// Summary rows for opcodes seen at least once, in opcode order,
    /// followed by an unknown row if any unknown opcodes were seen
    pub fn rows(&self) -> Vec<OpcodeCount> {
        let mut rows: Vec<_> = CATALOG
            .iter()
            .zip(&self.per_opcode)
            .filter(|(_, count)| **count > 0)
            .map(|(info, &count)| OpcodeCount {
                opcode: Some(info.opcode),
                description: info.description,
                count,
            })
            .collect();

        if self.unknown > 0 {
            rows.push(OpcodeCount {
                opcode: None,
                description: "",
                count: self.unknown,
            });
        }
        rows
    }
}
