//! CLI argument parsing

use clap::{Parser, ValueEnum};
use sniffrom_core::decoder::FilterMode;
use sniffrom_core::spi::Endianness;
use std::path::PathBuf;

/// Parse a string as a hex or decimal byte
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u8>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a buffer size: decimal, `0x` hex, or a decimal count of `KiB`/`MiB`
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let invalid = || format!("invalid size: {} (expected e.g. 4096, 0x1000, 64KiB, 32MiB)", s);

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return usize::from_str_radix(hex, 16).map_err(|_| invalid());
    }

    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(i) => s.split_at(i),
        None => (s, ""),
    };
    let shift = match unit.trim_start() {
        "" => 0,
        "KiB" => 10,
        "MiB" => 20,
        _ => return Err(invalid()),
    };
    let n: usize = digits.parse().map_err(|_| invalid())?;
    n.checked_mul(1 << shift)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Address byte order on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Endian {
    /// Most significant address byte first
    Msb,
    /// Least significant address byte first
    Lsb,
}

impl From<Endian> for Endianness {
    fn from(e: Endian) -> Self {
        match e {
            Endian::Msb => Endianness::MsbFirst,
            Endian::Lsb => Endianness::LsbFirst,
        }
    }
}

/// Which commands to reconstruct from
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    /// READ commands only
    R,
    /// WRITE (page program) commands only
    W,
    /// READ and WRITE commands
    Rw,
}

impl From<Filter> for FilterMode {
    fn from(f: Filter) -> Self {
        match f {
            Filter::R => FilterMode::Reads,
            Filter::W => FilterMode::Writes,
            Filter::Rw => FilterMode::Both,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sniffrom")]
#[command(
    author,
    version,
    about = "Reconstructs flash memory contents from passively captured READ/WRITE commands",
    long_about = "Reconstructs flash memory contents from passively captured READ/WRITE \
                  commands in a logic analyzer SPI export (CSV: time, packet id, MOSI, MISO)."
)]
pub struct Cli {
    /// Logic analyzer SPI export file (.csv)
    pub input_file: PathBuf,

    /// Length of address in bytes
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=4))]
    pub addrlen: u8,

    /// Endianness of address bytes
    #[arg(long, value_enum, default_value_t = Endian::Msb)]
    pub endian: Endian,

    /// Parse READ, WRITE, or READ and WRITE commands
    #[arg(long, value_enum, default_value_t = Filter::Rw)]
    pub filter: Filter,

    /// Output binary image file
    #[arg(short, default_value = "output.bin")]
    pub output: PathBuf,

    /// Also dump statistics
    #[arg(long)]
    pub summary: bool,

    /// Export a visual representation of the flash layout
    #[arg(long)]
    pub graph: bool,

    /// Graph output file (binary PPM)
    #[arg(long, default_value = "image.ppm")]
    pub graph_output: PathBuf,

    /// Image buffer size (e.g. "16MiB", "0x1000000")
    #[arg(long, default_value = "32MiB", value_parser = parse_size)]
    pub capacity: usize,

    /// Value of erased / never observed bytes
    #[arg(long, default_value = "0xFF", value_parser = parse_hex_u8)]
    pub fill: u8,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
