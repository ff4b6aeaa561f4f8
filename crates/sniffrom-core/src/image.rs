//! Reconstructed flash image
//!
//! [`FlashImage`] owns three parallel buffers of the same capacity:
//!
//! - the image rebuilt from every observed byte (reads and writes)
//! - the image rebuilt from page program data only
//! - the access map, recording how each address was touched
//!
//! Buffers start out filled with the erased-cell value (normally 0xFF) and the
//! access map with [`Access::Unaccessed`].

use crate::decoder::{AccessKind, ByteEvent};
use crate::error::{Error, Result};
use crate::trim::trimmed_len;

/// How an address has been touched so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Access {
    /// Never seen on the bus
    #[default]
    Unaccessed = 0,
    /// Seen in read data only
    Read = 1,
    /// Programmed at least once
    Written = 2,
}

impl core::fmt::Display for Access {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unaccessed => write!(f, "unaccessed"),
            Self::Read => write!(f, "read"),
            Self::Written => write!(f, "written"),
        }
    }
}

/// Result of folding one byte event into the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// Address the event touched
    pub address: usize,
    /// Classification of the address before this event
    pub prior: Access,
}

impl Applied {
    /// First time this address was seen
    pub fn is_first_touch(&self) -> bool {
        self.prior == Access::Unaccessed
    }
}

/// Image buffers under reconstruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashImage {
    fill: u8,
    image: Vec<u8>,
    writes: Vec<u8>,
    access: Vec<Access>,
}

impl FlashImage {
    /// Allocate buffers of `capacity` bytes filled with `fill`
    pub fn new(capacity: usize, fill: u8) -> Self {
        Self {
            fill,
            image: vec![fill; capacity],
            writes: vec![fill; capacity],
            access: vec![Access::Unaccessed; capacity],
        }
    }

    /// Buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.image.len()
    }

    /// Fill value of unobserved bytes
    pub fn fill(&self) -> u8 {
        self.fill
    }

    /// Fold a byte event into the buffers
    ///
    /// Reads update the all-sources image and mark the address as read unless
    /// it was already written. Writes update both images and always mark the
    /// address as written. Addresses beyond the capacity are rejected before
    /// any buffer is touched.
    pub fn apply(&mut self, event: &ByteEvent) -> Result<Applied> {
        let address = usize::try_from(event.address)
            .ok()
            .filter(|&a| a < self.capacity())
            .ok_or(Error::CapacityExceeded {
                address: event.address,
                capacity: self.capacity(),
            })?;

        let prior = self.access[address];
        self.image[address] = event.value;
        match event.kind {
            AccessKind::Read => {
                if prior != Access::Written {
                    self.access[address] = Access::Read;
                }
            }
            AccessKind::Write => {
                self.writes[address] = event.value;
                self.access[address] = Access::Written;
            }
        }

        Ok(Applied { address, prior })
    }

    /// Full all-sources buffer
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Full writes-only buffer
    pub fn writes(&self) -> &[u8] {
        &self.writes
    }

    /// Per-address access classification
    pub fn access_map(&self) -> &[Access] {
        &self.access
    }

    /// All-sources image with trailing fill bytes removed
    pub fn trimmed_image(&self) -> &[u8] {
        &self.image[..trimmed_len(&self.image, self.fill)]
    }

    /// Writes-only image with trailing fill bytes removed
    pub fn trimmed_writes(&self) -> &[u8] {
        &self.writes[..trimmed_len(&self.writes, self.fill)]
    }
}
