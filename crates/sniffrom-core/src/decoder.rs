//! Transaction decoder
//!
//! Groups bus samples into transactions by packet id and interprets each
//! transaction according to its opcode class. The decoder is a lazy iterator:
//! it pulls samples on demand and yields [`DecodeEvent`]s.
//!
//! A transaction is finished when a sample with a higher packet id arrives or
//! when the capture ends; its [`TransactionSummary`] is emitted at that point,
//! after all of its byte events.

use core::iter::Fuse;

use heapless::Vec;

use crate::capture::BusSample;
use crate::error::Result;
use crate::spi::{describe, AddressConfig, OpcodeClass};

/// Which data-carrying commands produce byte events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Only read commands
    Reads,
    /// Only page program commands
    Writes,
    /// Both reads and writes
    #[default]
    Both,
}

impl FilterMode {
    fn allows(&self, kind: AccessKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _) | (Self::Reads, AccessKind::Read) | (Self::Writes, AccessKind::Write)
        )
    }
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Address phase layout
    pub address: AddressConfig,
    /// Event filter
    pub filter: FilterMode,
}

/// Direction of a memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Byte read from the flash
    Read,
    /// Byte programmed into the flash
    Write,
}

/// A single byte observed being read from or written to the flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteEvent {
    /// Flash address (base address + offset within the transaction)
    pub address: u64,
    /// Data byte
    pub value: u8,
    /// Read or write
    pub kind: AccessKind,
}

/// JEDEC identification returned by RDID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JedecId {
    /// Manufacturer id
    pub manufacturer: u8,
    /// Device id bytes (memory type, capacity)
    pub device: [u8; 2],
}

impl JedecId {
    /// Device id as a 16-bit value
    pub fn device_id(&self) -> u16 {
        u16::from_be_bytes(self.device)
    }
}

/// Address range a data-carrying transaction covered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRange {
    /// Decoded base address
    pub base: u64,
    /// Number of data bytes transferred
    pub len: u64,
    /// Read or write
    pub kind: AccessKind,
}

/// Summary of a finished transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSummary {
    /// Packet id
    pub id: u64,
    /// Timestamp of the opcode sample
    pub time: f64,
    /// Opcode byte as seen on the bus, cataloged or not
    pub raw_opcode: u8,
    /// Opcode class
    pub class: OpcodeClass,
    /// Identifier captured by a complete RDID transaction
    pub jedec_id: Option<JedecId>,
    /// Device id captured by a RES transaction with the dummy phase
    pub device_id: Option<u8>,
    /// Data range, for read/program transactions that passed the filter
    pub data: Option<DataRange>,
}

impl TransactionSummary {
    /// Opcode, or `None` if it is not in the catalog
    pub fn opcode(&self) -> Option<u8> {
        self.class.is_cataloged().then_some(self.raw_opcode)
    }

    /// Catalog description of the opcode
    pub fn description(&self) -> Option<&'static str> {
        self.opcode().and_then(describe)
    }
}

/// Item produced by the [`Decoder`]
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent {
    /// A byte read or written at a flash address
    Byte(ByteEvent),
    /// A transaction finished
    Transaction(TransactionSummary),
}

/// Number of dummy bytes between RES and the device id
const RES_DUMMY_BYTES: u8 = 3;
/// Number of identifier bytes captured from RDID
const JEDEC_ID_LEN: usize = 3;

/// In-flight transaction state
#[derive(Debug)]
struct Transaction {
    id: u64,
    time: f64,
    opcode: u8,
    class: OpcodeClass,
    address_config: AddressConfig,
    address_bytes: Vec<u8, 4>,
    base: u64,
    offset: u64,
    dummy_bytes: u8,
    jedec: Vec<u8, JEDEC_ID_LEN>,
    device_id: Option<u8>,
    emitted: Option<AccessKind>,
}

impl Transaction {
    fn open(sample: &BusSample, config: &AddressConfig) -> Self {
        let class = OpcodeClass::of(sample.mosi);

        Self {
            id: sample.transaction_id,
            time: sample.time,
            opcode: sample.mosi,
            class,
            address_config: *config,
            address_bytes: Vec::new(),
            base: 0,
            offset: 0,
            dummy_bytes: 0,
            jedec: Vec::new(),
            device_id: None,
            emitted: None,
        }
    }

    /// Collect one address byte; returns true once the address is complete
    fn address_complete(&mut self, byte: u8) -> bool {
        let len = self.address_config.width.bytes();
        if self.address_bytes.len() < len {
            // Capacity is 4 and len <= 4, so this cannot fail
            let _ = self.address_bytes.push(byte);
            if self.address_bytes.len() == len {
                self.base = self.address_config.decode(&self.address_bytes) as u64;
            }
            return false;
        }
        true
    }

    fn data_byte(&mut self, value: u8, kind: AccessKind, filter: FilterMode) -> Option<ByteEvent> {
        let address = self.base + self.offset;
        self.offset += 1;
        if !filter.allows(kind) {
            return None;
        }
        self.emitted = Some(kind);
        Some(ByteEvent {
            address,
            value,
            kind,
        })
    }

    /// Advance the state machine by one post-opcode sample
    fn step(&mut self, sample: &BusSample, filter: FilterMode) -> Option<ByteEvent> {
        match self.class {
            OpcodeClass::Read => {
                if !self.address_complete(sample.mosi) {
                    return None;
                }
                self.data_byte(sample.miso, AccessKind::Read, filter)
            }
            OpcodeClass::FastRead => {
                if !self.address_complete(sample.mosi) {
                    return None;
                }
                if self.dummy_bytes == 0 {
                    self.dummy_bytes = 1;
                    return None;
                }
                self.data_byte(sample.miso, AccessKind::Read, filter)
            }
            OpcodeClass::PageProgram => {
                if !self.address_complete(sample.mosi) {
                    return None;
                }
                self.data_byte(sample.mosi, AccessKind::Write, filter)
            }
            OpcodeClass::ReadJedecId => {
                // Extra bytes (extended device info) are ignored
                let _ = self.jedec.push(sample.miso);
                None
            }
            OpcodeClass::ReleasePowerDown => {
                if self.dummy_bytes < RES_DUMMY_BYTES {
                    self.dummy_bytes += 1;
                } else if self.device_id.is_none() {
                    self.device_id = Some(sample.miso);
                }
                None
            }
            OpcodeClass::OtherCataloged | OpcodeClass::Unknown => None,
        }
    }

    fn finish(self) -> TransactionSummary {
        let jedec_id = match self.jedec[..] {
            [manufacturer, d0, d1] => Some(JedecId {
                manufacturer,
                device: [d0, d1],
            }),
            _ => None,
        };
        let data = self.emitted.map(|kind| DataRange {
            base: self.base,
            len: self.offset,
            kind,
        });

        TransactionSummary {
            id: self.id,
            time: self.time,
            raw_opcode: self.opcode,
            class: self.class,
            jedec_id,
            device_id: self.device_id,
            data,
        }
    }
}

/// Lazy transaction decoder over a sample stream
///
/// The sample stream yields `Result`s so that read errors from the capture
/// source are passed through unchanged.
pub struct Decoder<I> {
    samples: Fuse<I>,
    config: DecoderConfig,
    current: Option<Transaction>,
}

impl<I> Decoder<I>
where
    I: Iterator<Item = Result<BusSample>>,
{
    /// Create a decoder over `samples`
    pub fn new<S>(samples: S, config: DecoderConfig) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            samples: samples.into_iter().fuse(),
            config,
            current: None,
        }
    }

    /// Decoder configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}

impl<I> Iterator for Decoder<I>
where
    I: Iterator<Item = Result<BusSample>>,
{
    type Item = Result<DecodeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let sample = match self.samples.next() {
                Some(Ok(sample)) => sample,
                Some(Err(e)) => return Some(Err(e)),
                // End of capture flushes the in-flight transaction
                None => {
                    return self
                        .current
                        .take()
                        .map(|t| Ok(DecodeEvent::Transaction(t.finish())))
                }
            };

            let filter = self.config.filter;
            if let Some(t) = self
                .current
                .as_mut()
                .filter(|t| sample.transaction_id <= t.id)
            {
                if sample.transaction_id < t.id {
                    log::debug!(
                        "Packet id went backwards ({} < {}), treating as part of current transaction",
                        sample.transaction_id,
                        t.id
                    );
                }
                if let Some(event) = t.step(&sample, filter) {
                    return Some(Ok(DecodeEvent::Byte(event)));
                }
                continue;
            }

            let next = Transaction::open(&sample, &self.config.address);
            if next.class == OpcodeClass::Unknown {
                log::debug!("Packet {}: unknown opcode 0x{:02X}", next.id, next.opcode);
            }
            if let Some(done) = self.current.replace(next) {
                return Some(Ok(DecodeEvent::Transaction(done.finish())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::{AddressWidth, Endianness};

    fn decode(samples: &[BusSample], config: DecoderConfig) -> std::vec::Vec<DecodeEvent> {
        Decoder::new(samples.iter().copied().map(Ok), config)
            .map(|e| e.unwrap())
            .collect()
    }

    fn bytes(events: &[DecodeEvent]) -> std::vec::Vec<ByteEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                DecodeEvent::Byte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    fn summaries(events: &[DecodeEvent]) -> std::vec::Vec<TransactionSummary> {
        events
            .iter()
            .filter_map(|e| match e {
                DecodeEvent::Transaction(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn transaction(id: u64, opcode: u8, rest: &[(u8, u8)]) -> std::vec::Vec<BusSample> {
        let mut v = vec![BusSample::new(id, opcode, 0xFF)];
        v.extend(rest.iter().map(|&(mosi, miso)| BusSample::new(id, mosi, miso)));
        v
    }

    #[test]
    fn test_read_data() {
        let samples = transaction(
            0,
            0x03,
            &[(0x00, 0xFF), (0x01, 0xFF), (0x00, 0xFF), (0x00, 0xAA), (0x00, 0xBB)],
        );
        let events = decode(&samples, DecoderConfig::default());
        let b = bytes(&events);
        assert_eq!(b.len(), 2);
        assert_eq!(
            b[0],
            ByteEvent {
                address: 0x100,
                value: 0xAA,
                kind: AccessKind::Read
            }
        );
        assert_eq!(b[1].address, 0x101);
        assert_eq!(b[1].value, 0xBB);

        let s = summaries(&events);
        assert_eq!(s.len(), 1);
        assert_eq!(
            s[0].data,
            Some(DataRange {
                base: 0x100,
                len: 2,
                kind: AccessKind::Read
            })
        );
        // Summary comes after the byte events
        assert!(matches!(events.last(), Some(DecodeEvent::Transaction(_))));
    }

    #[test]
    fn test_fast_read_consumes_one_dummy_byte() {
        let payload = [(0x00, 0xFF), (0x00, 0xFF), (0x20, 0xFF), (0x00, 0x11), (0x00, 0x22)];
        let read = bytes(&decode(&transaction(0, 0x03, &payload), DecoderConfig::default()));
        let fast = bytes(&decode(&transaction(0, 0x0B, &payload), DecoderConfig::default()));

        assert_eq!(read.len(), 2);
        assert_eq!(fast.len(), 1);
        assert_eq!(read[0].value, 0x11);
        assert_eq!(fast[0].value, 0x22);
        assert_eq!(fast[0].address, 0x20);
    }

    #[test]
    fn test_page_program_uses_mosi() {
        let samples = transaction(
            4,
            0x02,
            &[(0x00, 0xFF), (0x10, 0xFF), (0x00, 0xFF), (0xDE, 0x00), (0xAD, 0x00)],
        );
        let b = bytes(&decode(&samples, DecoderConfig::default()));
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].address, 0x1000);
        assert_eq!(b[0].value, 0xDE);
        assert_eq!(b[0].kind, AccessKind::Write);
        assert_eq!(b[1].value, 0xAD);
    }

    #[test]
    fn test_lsb_first_address() {
        let config = DecoderConfig {
            address: AddressConfig::new(AddressWidth::ThreeByte, Endianness::LsbFirst),
            ..Default::default()
        };
        let samples = transaction(0, 0x03, &[(0x10, 0xFF), (0x00, 0xFF), (0x00, 0xFF), (0x00, 0x5A)]);
        let b = bytes(&decode(&samples, config));
        assert_eq!(b[0].address, 0x10);
    }

    #[test]
    fn test_two_byte_address() {
        let config = DecoderConfig {
            address: AddressConfig::new(AddressWidth::TwoByte, Endianness::MsbFirst),
            ..Default::default()
        };
        let samples = transaction(0, 0x03, &[(0x01, 0xFF), (0x02, 0xFF), (0x00, 0x5A)]);
        let b = bytes(&decode(&samples, config));
        assert_eq!(b[0].address, 0x0102);
        assert_eq!(b[0].value, 0x5A);
    }

    #[test]
    fn test_four_byte_opcodes_are_only_counted() {
        for op in [0x13, 0x0C, 0x12] {
            let samples = transaction(
                3,
                op,
                &[(0x10, 0xFF), (0x00, 0xFF), (0x00, 0xFF), (0x00, 0xFF), (0xAA, 0xAA)],
            );
            let events = decode(&samples, DecoderConfig::default());
            assert!(bytes(&events).is_empty());
            let s = summaries(&events);
            assert_eq!(s[0].class, OpcodeClass::OtherCataloged);
            assert_eq!(s[0].opcode(), Some(op));
            assert_eq!(s[0].data, None);
        }
    }

    #[test]
    fn test_filter_suppresses_events_but_not_state() {
        let mut samples = transaction(0, 0x03, &[(0x00, 0xFF), (0x00, 0xFF), (0x00, 0xFF), (0x00, 0x01)]);
        samples.extend(transaction(
            1,
            0x02,
            &[(0x00, 0xFF), (0x00, 0xFF), (0x40, 0xFF), (0x99, 0xFF)],
        ));
        let config = DecoderConfig {
            filter: FilterMode::Writes,
            ..Default::default()
        };
        let events = decode(&samples, config);
        let b = bytes(&events);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].kind, AccessKind::Write);
        assert_eq!(b[0].address, 0x40);

        let s = summaries(&events);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].data, None);

        let reads = DecoderConfig {
            filter: FilterMode::Reads,
            ..Default::default()
        };
        let b = bytes(&decode(&samples, reads));
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].kind, AccessKind::Read);
    }

    #[test]
    fn test_jedec_id() {
        let samples = transaction(0, 0x9F, &[(0, 0x11), (0, 0x22), (0, 0x33), (0, 0x44)]);
        let s = summaries(&decode(&samples, DecoderConfig::default()));
        let id = s[0].jedec_id.unwrap();
        assert_eq!(id.manufacturer, 0x11);
        assert_eq!(id.device, [0x22, 0x33]);
        assert_eq!(id.device_id(), 0x2233);
    }

    #[test]
    fn test_truncated_jedec_id_not_reported() {
        let samples = transaction(0, 0x9F, &[(0, 0x11), (0, 0x22)]);
        let s = summaries(&decode(&samples, DecoderConfig::default()));
        assert_eq!(s[0].jedec_id, None);
    }

    #[test]
    fn test_release_power_down_device_id() {
        let full = transaction(0, 0xAB, &[(0, 0xFF), (0, 0xFF), (0, 0xFF), (0, 0x17)]);
        let s = summaries(&decode(&full, DecoderConfig::default()));
        assert_eq!(s[0].device_id, Some(0x17));

        let short = transaction(0, 0xAB, &[(0, 0xFF), (0, 0xFF), (0, 0x17)]);
        let s = summaries(&decode(&short, DecoderConfig::default()));
        assert_eq!(s[0].device_id, None);

        let bare = transaction(0, 0xAB, &[]);
        let s = summaries(&decode(&bare, DecoderConfig::default()));
        assert_eq!(s[0].device_id, None);
    }

    #[test]
    fn test_unknown_opcode_passthrough() {
        let samples = transaction(7, 0x3B, &[(0x00, 0x01), (0x00, 0x02), (0x00, 0x03), (0x00, 0x04)]);
        let events = decode(&samples, DecoderConfig::default());
        assert!(bytes(&events).is_empty());
        let s = summaries(&events);
        assert_eq!(s[0].class, OpcodeClass::Unknown);
        assert_eq!(s[0].opcode(), None);
        assert_eq!(s[0].raw_opcode, 0x3B);
        assert_eq!(s[0].description(), None);
    }

    #[test]
    fn test_transactions_split_on_id_change() {
        let mut samples = transaction(0, 0x06, &[]);
        samples.extend(transaction(1, 0x05, &[(0, 0x00)]));
        samples.extend(transaction(5, 0x04, &[]));
        let s = summaries(&decode(&samples, DecoderConfig::default()));
        let ids: std::vec::Vec<_> = s.iter().map(|t| (t.id, t.raw_opcode)).collect();
        assert_eq!(ids, [(0, 0x06), (1, 0x05), (5, 0x04)]);
        assert_eq!(s[1].description(), Some("Read Status Register 1"));
    }

    #[test]
    fn test_empty_stream() {
        assert!(decode(&[], DecoderConfig::default()).is_empty());
    }

    #[test]
    fn test_read_error_passes_through() {
        let samples = vec![
            Ok(BusSample::new(0, 0x06, 0xFF)),
            Err(crate::Error::Io(std::io::Error::other("boom"))),
        ];
        let mut decoder = Decoder::new(samples, DecoderConfig::default());
        assert!(matches!(decoder.next(), Some(Err(crate::Error::Io(_)))));
    }
}
