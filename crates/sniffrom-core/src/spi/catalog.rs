//! Command catalog and opcode classification
//!
//! The catalog is the closed set of opcodes the decoder recognizes. An opcode
//! outside the catalog is [`OpcodeClass::Unknown`]: it is counted, and the
//! rest of its transaction is passed through without interpretation.

use super::opcodes::*;

/// A cataloged opcode and its human readable description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Opcode byte
    pub opcode: u8,
    /// Description used in verbose output and the summary table
    pub description: &'static str,
}

const fn cmd(opcode: u8, description: &'static str) -> CommandInfo {
    CommandInfo {
        opcode,
        description,
    }
}

/// Every recognized opcode, sorted by opcode value
pub static CATALOG: &[CommandInfo] = &[
    cmd(NOP, "No Operation"),
    cmd(WRSR, "Write Status Register 1"),
    cmd(PP, "Page Program"),
    cmd(READ, "Read Data"),
    cmd(WRDI, "Write Disable"),
    cmd(RDSR, "Read Status Register 1"),
    cmd(WREN, "Write Enable"),
    cmd(RDSR2_07, "Read Status Register 2"),
    cmd(FAST_READ, "Fast Read Data"),
    cmd(FAST_READ_4B, "Fast Read Data (4-byte address)"),
    cmd(WRSR3, "Write Status Register 3"),
    cmd(PP_4B, "Page Program (4-byte address)"),
    cmd(READ_4B, "Read Data (4-byte address)"),
    cmd(ABRD, "AutoBoot Register Read"),
    cmd(ABWR, "AutoBoot Register Write / Read Status Register 3"),
    cmd(BRRD, "Bank Register Read"),
    cmd(BRWR, "Bank Register Write"),
    cmd(SE_20, "Sector Erase (4K)"),
    cmd(RDSCUR_2B, "Read Security Register"),
    cmd(WRSCUR_2F, "Program Security Register"),
    cmd(QPP, "Page Program (Quad I/O)"),
    cmd(RDSR3_33, "Read Status Register 3"),
    cmd(QPP_4B, "Page Program (Quad I/O, 4-byte address)"),
    cmd(RDSR2, "Read Status Register 2 / Configuration Register 1"),
    cmd(QPP_38, "Page Program (Quad I/O) / Enter QPI Mode"),
    cmd(PRSCUR, "Program Security Register / One Time Program (OTP) array"),
    cmd(RDSCUR, "Read Security Register"),
    cmd(RDUID, "Read Unique ID / One Time Program (OTP) Array"),
    cmd(EWSR, "Write Enable for Volatile Status Register"),
    cmd(BE_52, "Block Erase (32KB)"),
    cmd(RDSFDP, "Read Serial Flash Discoverable Parameters (SFDP) Register"),
    cmd(CE_60, "Chip Erase"),
    cmd(RSTEN, "Enable Reset"),
    cmd(WPSEL, "Write Protect Selection"),
    cmd(REMS, "Read Manufacturer ID / Device ID"),
    cmd(REMS_DUAL, "Read Manufacturer ID / Device ID (Dual I/O)"),
    cmd(REMS_QUAD, "Read Manufacturer ID / Device ID (Quad I/O)"),
    cmd(RST, "Reset Device"),
    cmd(RDID, "Read JEDEC ID"),
    cmd(RES, "Release Power-Down / Device ID"),
    cmd(DP, "Power Down"),
    cmd(CE_C7, "Chip Erase"),
    cmd(BE_D8, "Block Erase (64KB)"),
    cmd(DYBRD, "Read Dynamic Protection Bit (DYB)"),
    cmd(DYBWR, "Write Dynamic Protection Bit (DYB)"),
    cmd(PPBRD, "Read Persistent Protection Bit (PPB)"),
    cmd(PPBP, "Program Persistent Protection Bit (PPB)"),
    cmd(PPBE, "Erase Persistent Protection Bit (PPB)"),
    cmd(PASSRD, "Password Read"),
    cmd(PASSP, "Password Program"),
    cmd(PASSU, "Password Unlock"),
];

/// Position of `opcode` in [`CATALOG`], if cataloged
pub(crate) fn catalog_index(opcode: u8) -> Option<usize> {
    CATALOG
        .binary_search_by_key(&opcode, |info| info.opcode)
        .ok()
}

/// Description of a cataloged opcode
pub fn describe(opcode: u8) -> Option<&'static str> {
    catalog_index(opcode).map(|i| CATALOG[i].description)
}

/// How the decoder interprets the payload of a transaction
///
/// Only the configured-width READ, FAST_READ and PP opcodes carry decoded
/// data. Their 4-byte-address variants are counted like any other cataloged
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeClass {
    /// Address phase, then data on the response line
    Read,
    /// Address phase, one dummy byte, then data on the response line
    FastRead,
    /// Address phase, then data on the command line
    PageProgram,
    /// Three identifier bytes on the response line
    ReadJedecId,
    /// Optional three dummy bytes, then a device id byte
    ReleasePowerDown,
    /// Cataloged but payload is not interpreted
    OtherCataloged,
    /// Not in the catalog
    Unknown,
}

impl OpcodeClass {
    /// Classify an opcode byte
    pub fn of(opcode: u8) -> Self {
        match opcode {
            READ => Self::Read,
            FAST_READ => Self::FastRead,
            PP => Self::PageProgram,
            RDID => Self::ReadJedecId,
            RES => Self::ReleasePowerDown,
            op if catalog_index(op).is_some() => Self::OtherCataloged,
            _ => Self::Unknown,
        }
    }

    /// Returns true for opcodes present in the catalog
    pub fn is_cataloged(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}
