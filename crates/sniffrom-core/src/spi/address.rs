//! Address width and byte-order types

use crate::error::{Error, Result};

/// Address width for SPI commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// 2-byte (16-bit) address, small serial EEPROM-style parts
    TwoByte,
    /// 3-byte (24-bit) address - supports up to 16 MiB
    #[default]
    ThreeByte,
    /// 4-byte (32-bit) address - supports up to 4 GiB
    FourByte,
}

impl AddressWidth {
    /// Look up the width for a byte count
    pub fn from_bytes(bytes: u8) -> Result<Self> {
        match bytes {
            2 => Ok(Self::TwoByte),
            3 => Ok(Self::ThreeByte),
            4 => Ok(Self::FourByte),
            n => Err(Error::InvalidConfig(format!(
                "address length must be 2, 3 or 4 bytes, got {}",
                n
            ))),
        }
    }

    /// Returns the number of address bytes
    pub const fn bytes(&self) -> usize {
        match self {
            Self::TwoByte => 2,
            Self::ThreeByte => 3,
            Self::FourByte => 4,
        }
    }

    /// Returns the maximum addressable size in bytes
    pub const fn max_size(&self) -> u64 {
        1u64 << (8 * self.bytes())
    }
}

/// Order in which address bytes appear on the bus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// First address byte on the wire is the most significant (standard SPI)
    #[default]
    MsbFirst,
    /// First address byte on the wire is the least significant
    LsbFirst,
}

/// Address phase configuration, fixed for a whole run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressConfig {
    /// Number of address bytes following an addressed opcode
    pub width: AddressWidth,
    /// Byte order of the address phase
    pub endianness: Endianness,
}

impl AddressConfig {
    /// Create a new address configuration
    pub const fn new(width: AddressWidth, endianness: Endianness) -> Self {
        Self { width, endianness }
    }

    /// Decode address bytes in arrival order into an address
    ///
    /// `bytes` must hold exactly the bytes of the address phase; the width of
    /// the slice, not `self.width`, determines how many bytes are folded.
    pub fn decode(&self, bytes: &[u8]) -> u32 {
        let fold = |acc: u32, &b: &u8| (acc << 8) | b as u32;
        match self.endianness {
            Endianness::MsbFirst => bytes.iter().fold(0, fold),
            Endianness::LsbFirst => bytes.iter().rev().fold(0, fold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_byte_msb_first() {
        let cfg = AddressConfig::default();
        for [a0, a1, a2] in [[0x00, 0x00, 0x10], [0x12, 0x34, 0x56], [0xFF, 0x00, 0x80]] {
            let expected = (a0 as u32) * 65536 + (a1 as u32) * 256 + a2 as u32;
            assert_eq!(cfg.decode(&[a0, a1, a2]), expected);
        }
    }

    #[test]
    fn test_three_byte_lsb_first() {
        let cfg = AddressConfig::new(AddressWidth::ThreeByte, Endianness::LsbFirst);
        for [a0, a1, a2] in [[0x00, 0x00, 0x10], [0x12, 0x34, 0x56], [0xFF, 0x00, 0x80]] {
            let expected = (a2 as u32) * 65536 + (a1 as u32) * 256 + a0 as u32;
            assert_eq!(cfg.decode(&[a0, a1, a2]), expected);
        }
    }

    #[test]
    fn test_other_widths() {
        let msb = AddressConfig::new(AddressWidth::FourByte, Endianness::MsbFirst);
        assert_eq!(msb.decode(&[0x01, 0x02, 0x03, 0x04]), 0x0102_0304);
        let lsb = AddressConfig::new(AddressWidth::TwoByte, Endianness::LsbFirst);
        assert_eq!(lsb.decode(&[0x34, 0x12]), 0x1234);
    }

    #[test]
    fn test_width_from_bytes() {
        assert_eq!(AddressWidth::from_bytes(2).unwrap(), AddressWidth::TwoByte);
        assert_eq!(AddressWidth::from_bytes(4).unwrap().bytes(), 4);
        assert!(AddressWidth::from_bytes(5).is_err());
        assert_eq!(AddressWidth::ThreeByte.max_size(), 16 * 1024 * 1024);
    }
}
