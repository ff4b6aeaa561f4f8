//! sniffrom-core - Core library for passive SPI flash reconstruction
//!
//! This crate turns a logic-analyzer capture of SPI bus traffic into a
//! reconstructed flash image. It contains no I/O beyond reading the capture
//! stream; printing, progress display and file output live in the `sniffrom`
//! binary.
//!
//! # Pipeline
//!
//! ```text
//! CaptureReader -> Decoder -> Session (FlashImage + Statistics) -> trim
//! ```
//!
//! - [`capture`] parses the exported rows into [`capture::BusSample`]s
//! - [`decoder`] groups samples into transactions and emits byte events
//! - [`image`] folds byte events into the image and access map buffers
//! - [`stats`] counts opcodes and discovered bytes
//! - [`trim`] computes the logical length of each image buffer
//!
//! # Example
//!
//! ```ignore
//! use sniffrom_core::capture::CaptureReader;
//! use sniffrom_core::session::{Session, SessionConfig};
//!
//! let reader = CaptureReader::new(std::io::BufReader::new(file));
//! let mut session = Session::new(SessionConfig::default());
//! session.run(reader)?;
//! println!("{} bytes discovered", session.stats().bytes_discovered());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod capture;
pub mod decoder;
pub mod error;
pub mod image;
pub mod session;
pub mod spi;
pub mod stats;
pub mod trim;

pub use error::{Error, Result};
