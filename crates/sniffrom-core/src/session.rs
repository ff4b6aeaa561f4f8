//! Reconstruction session
//!
//! A [`Session`] is the per-run context: it owns the image buffers and the
//! statistics and folds the decoder's event stream into both. One session is
//! created per capture; nothing is shared between sessions.

use crate::capture::BusSample;
use crate::decoder::{DecodeEvent, Decoder, DecoderConfig, TransactionSummary};
use crate::error::Result;
use crate::image::{Applied, FlashImage};
use crate::stats::Statistics;

/// Default image capacity (32 MiB)
pub const DEFAULT_CAPACITY: usize = 32 * 1024 * 1024;

/// Erased flash cell value
pub const DEFAULT_FILL: u8 = 0xFF;

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Decoder configuration
    pub decoder: DecoderConfig,
    /// Image buffer capacity in bytes
    pub capacity: usize,
    /// Fill value of unobserved bytes
    pub fill: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            capacity: DEFAULT_CAPACITY,
            fill: DEFAULT_FILL,
        }
    }
}

/// Callbacks for diagnostic output during a run
///
/// All methods default to doing nothing.
pub trait SessionObserver {
    /// Called after a transaction is finished and its bytes are in the image
    fn transaction(&mut self, _summary: &TransactionSummary, _image: &FlashImage) {}

    /// Called when an event touches an address that was already accessed
    fn reaccess(&mut self, _applied: &Applied) {}
}

/// An observer that ignores everything
pub struct NoObserver;

impl SessionObserver for NoObserver {}

/// Per-run reconstruction state
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    image: FlashImage,
    stats: Statistics,
}

impl Session {
    /// Create a session with freshly allocated buffers
    pub fn new(config: SessionConfig) -> Self {
        Self {
            image: FlashImage::new(config.capacity, config.fill),
            stats: Statistics::new(),
            config,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Image buffers
    pub fn image(&self) -> &FlashImage {
        &self.image
    }

    /// Run statistics
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Fold one decode event into the image and statistics
    ///
    /// Returns the outcome for byte events.
    pub fn process(&mut self, event: &DecodeEvent) -> Result<Option<Applied>> {
        match event {
            DecodeEvent::Byte(byte) => {
                let applied = self.image.apply(byte)?;
                self.stats.record_byte(byte.kind, &applied);
                Ok(Some(applied))
            }
            DecodeEvent::Transaction(summary) => {
                self.stats.record_transaction(summary);
                Ok(None)
            }
        }
    }

    /// Decode a whole capture into this session
    pub fn run<S>(&mut self, samples: S) -> Result<()>
    where
        S: IntoIterator<Item = Result<BusSample>>,
    {
        self.run_with(samples, &mut NoObserver)
    }

    /// Decode a whole capture, reporting progress to `observer`
    ///
    /// Stops at the first capacity violation or read error.
    pub fn run_with<S, O>(&mut self, samples: S, observer: &mut O) -> Result<()>
    where
        S: IntoIterator<Item = Result<BusSample>>,
        O: SessionObserver + ?Sized,
    {
        let decoder = Decoder::new(samples, self.config.decoder);
        for event in decoder {
            let event = event?;
            match self.process(&event)? {
                Some(applied) if !applied.is_first_touch() => observer.reaccess(&applied),
                Some(_) => {}
                None => {
                    if let DecodeEvent::Transaction(summary) = &event {
                        observer.transaction(summary, &self.image);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureReader;
    use crate::decoder::FilterMode;
    use crate::image::Access;
    use crate::Error;

    const CAPTURE: &str = "\
Time [s],Packet ID,MOSI,MISO
0.000100,0,0x9F,0xFF
0.000101,0,0x00,0x11
0.000102,0,0x00,0x22
0.000103,0,0x00,0x33
0.000200,1,0x03,0xFF
0.000201,1,0x00,0xFF
0.000202,1,0x00,0xFF
0.000203,1,0x10,0xFF
0.000204,1,0x00,0xAA
0.000205,1,0x00,0xBB
";

    fn small_config() -> SessionConfig {
        SessionConfig {
            capacity: 0x1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_capture() {
        let mut session = Session::new(small_config());
        session.run(CaptureReader::new(CAPTURE.as_bytes())).unwrap();

        let image = session.image();
        assert_eq!(image.image()[0x10], 0xAA);
        assert_eq!(image.image()[0x11], 0xBB);
        assert_eq!(image.access_map()[0x10], Access::Read);
        assert_eq!(image.access_map()[0x11], Access::Read);
        assert_eq!(image.access_map()[0x12], Access::Unaccessed);
        assert_eq!(image.trimmed_image().len(), 0x12);
        assert!(image.trimmed_writes().is_empty());

        let stats = session.stats();
        assert_eq!(stats.bytes_discovered(), 2);
        assert_eq!(stats.bytes_written(), 0);
        assert_eq!(stats.count(0x9F), 1);
        assert_eq!(stats.count(0x03), 1);
        let id = stats.jedec_id().unwrap();
        assert_eq!((id.manufacturer, id.device), (0x11, [0x22, 0x33]));
    }

    #[test]
    fn test_write_then_read_stays_written() {
        let capture = "\
0.1,0,0x02,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xFF
0.1,0,0x04,0xFF
0.1,0,0x5A,0xFF
0.1,0,0x5A,0xFF
0.2,1,0x03,0xFF
0.2,1,0x00,0xFF
0.2,1,0x00,0xFF
0.2,1,0x04,0xFF
0.2,1,0x00,0x5A
";
        let mut session = Session::new(small_config());
        session.run(CaptureReader::new(capture.as_bytes())).unwrap();

        let image = session.image();
        assert_eq!(image.access_map()[4], Access::Written);
        assert_eq!(image.access_map()[5], Access::Written);
        assert_eq!(image.trimmed_writes(), &[0xFF, 0xFF, 0xFF, 0xFF, 0x5A, 0x5A]);
        assert_eq!(session.stats().bytes_discovered(), 2);
        assert_eq!(session.stats().bytes_written(), 2);
    }

    #[test]
    fn test_capacity_exceeded_stops_run() {
        let capture = "\
0.1,0,0x03,0xFF
0.1,0,0x00,0xFF
0.1,0,0x10,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0x01
";
        let mut session = Session::new(small_config());
        let err = session.run(CaptureReader::new(capture.as_bytes())).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                address: 0x1000,
                capacity: 0x1000
            }
        ));
    }

    #[test]
    fn test_filtered_reads_skip_capacity_check() {
        let capture = "\
0.1,0,0x03,0xFF
0.1,0,0xFF,0xFF
0.1,0,0xFF,0xFF
0.1,0,0xFF,0xFF
0.1,0,0x00,0x01
";
        let mut config = small_config();
        config.decoder.filter = FilterMode::Writes;
        let mut session = Session::new(config);
        session.run(CaptureReader::new(capture.as_bytes())).unwrap();
        assert_eq!(session.stats().count(0x03), 1);
        assert_eq!(session.stats().bytes_discovered(), 0);
    }

    #[test]
    fn test_four_byte_read_is_counted_not_decoded() {
        let capture = "\
0.1,0,0x13,0xFF
0.1,0,0x10,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xAA
";
        let mut session = Session::new(SessionConfig::default());
        session.run(CaptureReader::new(capture.as_bytes())).unwrap();
        assert_eq!(session.stats().count(0x13), 1);
        assert_eq!(session.stats().bytes_discovered(), 0);
        assert!(session.image().trimmed_image().is_empty());
    }

    #[test]
    fn test_fresh_sessions_are_identical() {
        let run = || {
            let mut session = Session::new(small_config());
            session.run(CaptureReader::new(CAPTURE.as_bytes())).unwrap();
            session
        };
        let (a, b) = (run(), run());
        assert_eq!(a.image(), b.image());
        assert_eq!(a.stats(), b.stats());
    }

    #[derive(Default)]
    struct Recorder {
        transactions: Vec<u8>,
        reaccesses: Vec<(usize, Access)>,
    }

    impl SessionObserver for Recorder {
        fn transaction(&mut self, summary: &TransactionSummary, _image: &FlashImage) {
            self.transactions.push(summary.raw_opcode);
        }

        fn reaccess(&mut self, applied: &Applied) {
            self.reaccesses.push((applied.address, applied.prior));
        }
    }

    #[test]
    fn test_observer_sees_reaccess() {
        let capture = "\
0.1,0,0x03,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0xFF
0.1,0,0x00,0x01
0.2,1,0x0B,0xFF
0.2,1,0x00,0xFF
0.2,1,0x00,0xFF
0.2,1,0x00,0xFF
0.2,1,0x00,0xFF
0.2,1,0x00,0x01
0.3,2,0x06,0xFF
";
        let mut recorder = Recorder::default();
        let mut session = Session::new(small_config());
        session
            .run_with(CaptureReader::new(capture.as_bytes()), &mut recorder)
            .unwrap();
        assert_eq!(recorder.transactions, [0x03, 0x0B, 0x06]);
        assert_eq!(recorder.reaccesses, [(0, Access::Read)]);
    }
}
