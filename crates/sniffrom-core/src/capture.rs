//! Bus capture rows
//!
//! Captures are the row-per-byte exports produced by logic analyzer SPI
//! decoders:
//!
//! ```text
//! Time [s],Packet ID,MOSI,MISO
//! 0.21347662,0,0x05,0xFF
//! ```
//!
//! The packet id groups bytes into transactions (one chip-select assertion).
//! Rows that do not parse, such as the header line, are skipped.

use std::io::BufRead;

use crate::error::{Error, Result};

/// One byte exchanged on the bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusSample {
    /// Capture timestamp in seconds
    pub time: f64,
    /// Transaction (packet) identifier assigned by the capture tool
    pub transaction_id: u64,
    /// Byte on the command line (MOSI): opcode, address, write data
    pub mosi: u8,
    /// Byte on the response line (MISO): read data
    pub miso: u8,
}

impl BusSample {
    /// Create a sample with a zero timestamp
    pub const fn new(transaction_id: u64, mosi: u8, miso: u8) -> Self {
        Self {
            time: 0.0,
            transaction_id,
            mosi,
            miso,
        }
    }
}

fn parse_hex_u8(s: &str) -> Option<u8> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(hex, 16).ok()
}

/// Parse one capture row
///
/// `line` is the 1-based line number used in the error.
pub fn parse_line(line: usize, text: &str) -> Result<BusSample> {
    let malformed = |reason| Error::MalformedRecord { line, reason };

    let mut fields = text.split(',').map(str::trim);
    let (Some(time), Some(id), Some(mosi), Some(miso)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("expected 4 columns"));
    };

    // Non-numeric ids mark the header row (and any other noise)
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("non-numeric packet id"));
    }
    let transaction_id = id.parse().map_err(|_| malformed("packet id out of range"))?;
    let time = time.parse().map_err(|_| malformed("invalid timestamp"))?;
    let mosi = parse_hex_u8(mosi).ok_or_else(|| malformed("invalid MOSI byte"))?;
    let miso = parse_hex_u8(miso).ok_or_else(|| malformed("invalid MISO byte"))?;

    Ok(BusSample {
        time,
        transaction_id,
        mosi,
        miso,
    })
}

/// Pull-based reader over a line-structured capture
///
/// Yields samples in capture order. Malformed rows are skipped and counted;
/// only I/O errors are returned.
pub struct CaptureReader<R> {
    inner: R,
    buf: Vec<u8>,
    line: usize,
    skipped: usize,
}

impl<R: BufRead> CaptureReader<R> {
    /// Wrap a buffered reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line: 0,
            skipped: 0,
        }
    }

    /// Number of rows skipped as malformed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for CaptureReader<R> {
    type Item = Result<BusSample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            // Binary noise in the export is a malformed row, not a read error
            let parsed = match std::str::from_utf8(&self.buf) {
                Ok(text) => parse_line(self.line, text),
                Err(_) => Err(Error::MalformedRecord {
                    line: self.line,
                    reason: "not valid UTF-8",
                }),
            };
            match parsed {
                Ok(sample) => return Some(Ok(sample)),
                Err(e) => {
                    log::trace!("Skipping row: {}", e);
                    self.skipped += 1;
                }
            }
        }
    }
}
