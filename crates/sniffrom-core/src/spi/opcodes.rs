//! SPI flash opcodes recognized in captures
//!
//! Names follow the common JEDEC / manufacturer mnemonics. Several opcodes
//! are overloaded between vendors; the catalog description lists the
//! alternatives.

// ============================================================================
// Control
// ============================================================================

/// No Operation
pub const NOP: u8 = 0x00;
/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL bit in status register
pub const WRDI: u8 = 0x04;
/// Write Enable for Volatile Status Register
pub const EWSR: u8 = 0x50;
/// Enable Reset
pub const RSTEN: u8 = 0x66;
/// Reset Device
pub const RST: u8 = 0x99;
/// Write Protect Selection
pub const WPSEL: u8 = 0x68;

// ============================================================================
// Status and configuration registers
// ============================================================================

/// Write Status Register 1
pub const WRSR: u8 = 0x01;
/// Read Status Register 1
pub const RDSR: u8 = 0x05;
/// Read Status Register 2 (some vendors)
pub const RDSR2_07: u8 = 0x07;
/// Write Status Register 3
pub const WRSR3: u8 = 0x11;
/// AutoBoot Register Read
pub const ABRD: u8 = 0x14;
/// AutoBoot Register Write / Read Status Register 3
pub const ABWR: u8 = 0x15;
/// Bank Register Read
pub const BRRD: u8 = 0x16;
/// Bank Register Write
pub const BRWR: u8 = 0x17;
/// Read Status Register 3 (some vendors)
pub const RDSR3_33: u8 = 0x33;
/// Enter QPI Mode / Read Status Register 2 / Read Configuration Register 1
pub const RDSR2: u8 = 0x35;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device ID)
pub const RDID: u8 = 0x9F;
/// Read Electronic Manufacturer & Device ID (legacy)
pub const REMS: u8 = 0x90;
/// Read Manufacturer / Device ID, dual I/O
pub const REMS_DUAL: u8 = 0x92;
/// Read Manufacturer / Device ID, quad I/O
pub const REMS_QUAD: u8 = 0x94;
/// Read Electronic Signature / Release from Deep Power Down
pub const RES: u8 = 0xAB;
/// Read Unique ID / OTP array
pub const RDUID: u8 = 0x4B;
/// Read SFDP table
pub const RDSFDP: u8 = 0x5A;

// ============================================================================
// Read commands
// ============================================================================

/// Read Data
pub const READ: u8 = 0x03;
/// Fast Read (with dummy byte)
pub const FAST_READ: u8 = 0x0B;
/// Read Data with 4-byte address
pub const READ_4B: u8 = 0x13;
/// Fast Read with 4-byte address
pub const FAST_READ_4B: u8 = 0x0C;

// ============================================================================
// Page Program
// ============================================================================

/// Page Program with 3-byte address
pub const PP: u8 = 0x02;
/// Page Program with 4-byte address
pub const PP_4B: u8 = 0x12;
/// Quad Page Program
pub const QPP: u8 = 0x32;
/// Quad Page Program with 4-byte address
pub const QPP_4B: u8 = 0x34;
/// Quad Page Program (alternate) / Enter QPI Mode
pub const QPP_38: u8 = 0x38;

// ============================================================================
// Erase
// ============================================================================

/// Sector Erase 4KB
pub const SE_20: u8 = 0x20;
/// Block Erase 32KB
pub const BE_52: u8 = 0x52;
/// Block Erase 64KB
pub const BE_D8: u8 = 0xD8;
/// Chip Erase
pub const CE_60: u8 = 0x60;
/// Chip Erase (alternate opcode)
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// Security registers / OTP
// ============================================================================

/// Read Security Register
pub const RDSCUR_2B: u8 = 0x2B;
/// Program Security Register
pub const WRSCUR_2F: u8 = 0x2F;
/// Program Security Register / OTP array
pub const PRSCUR: u8 = 0x42;
/// Read Security Register (Winbond)
pub const RDSCUR: u8 = 0x48;

// ============================================================================
// Power management
// ============================================================================

/// Deep Power Down
pub const DP: u8 = 0xB9;

// ============================================================================
// Sector protection (Spansion/Cypress)
// ============================================================================

/// Read Dynamic Protection Bit
pub const DYBRD: u8 = 0xE0;
/// Write Dynamic Protection Bit
pub const DYBWR: u8 = 0xE1;
/// Read Persistent Protection Bit
pub const PPBRD: u8 = 0xE2;
/// Program Persistent Protection Bit
pub const PPBP: u8 = 0xE3;
/// Erase Persistent Protection Bit
pub const PPBE: u8 = 0xE4;
/// Password Read
pub const PASSRD: u8 = 0xE7;
/// Password Program
pub const PASSP: u8 = 0xE8;
/// Password Unlock
pub const PASSU: u8 = 0xE9;
