use crate::codec::{MAX_RECORD_SIZE, max_representable};
use crate::error::Error;

/// Record size of the classic 32-bit counter.
pub const DEFAULT_RECORD_SIZE: u8 = 4;

/// Requested layout of a wear leveled region. Unset fields fall back to the whole device and the
/// largest representable value minus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegionConfig {
    /// First address of the region.
    pub min_address: u32,
    /// Last address of the region, inclusive. `None` uses the last address of the storage.
    pub max_address: Option<u32>,
    /// Bytes per record.
    pub record_size: u8,
    /// Writing a value above the ceiling clears the region.
    pub overflow_ceiling: Option<u64>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_address: 0,
            max_address: None,
            record_size: DEFAULT_RECORD_SIZE,
            overflow_ceiling: None,
        }
    }
}

impl RegionConfig {
    pub const fn new(min_address: u32, max_address: u32) -> Self {
        Self {
            min_address,
            max_address: Some(max_address),
            record_size: DEFAULT_RECORD_SIZE,
            overflow_ceiling: None,
        }
    }

    pub const fn with_record_size(mut self, record_size: u8) -> Self {
        self.record_size = record_size;
        self
    }

    pub const fn with_overflow_ceiling(mut self, overflow_ceiling: u64) -> Self {
        self.overflow_ceiling = Some(overflow_ceiling);
        self
    }

    /// Validates the config against a storage of `capacity` bytes.
    ///
    /// Returns the effective region and whether `max_address` had to be clamped to the capacity.
    pub fn resolve(&self, capacity: usize) -> Result<(Region, bool), Error> {
        if self.record_size == 0 || self.record_size as usize > MAX_RECORD_SIZE {
            return Err(Error::InvalidRecordSize(self.record_size));
        }

        // the last address must stay below u32::MAX so the region length fits a u32
        let last_address = match capacity.checked_sub(1).map(u32::try_from) {
            Some(Ok(last)) if last < u32::MAX => last,
            Some(_) => return Err(Error::CapacityTooLarge(capacity)),
            None => return Err(Error::AddressOutOfRange(self.min_address)),
        };

        if self.min_address > last_address {
            return Err(Error::AddressOutOfRange(self.min_address));
        }

        let (max_address, clamped) = match self.max_address {
            Some(max) if max > last_address => (last_address, true),
            Some(max) => (max, false),
            None => (last_address, false),
        };

        let record_end = self.min_address as u64 + self.record_size as u64 - 1;
        if record_end > max_address as u64 {
            return Err(Error::RegionTooSmall);
        }

        let representable = max_representable(self.record_size);
        let overflow_ceiling = match self.overflow_ceiling {
            Some(ceiling) if ceiling > representable => {
                return Err(Error::CeilingNotRepresentable(ceiling));
            }
            Some(ceiling) => ceiling,
            None => representable - 1,
        };

        let region = Region {
            min_address: self.min_address,
            max_address,
            record_size: self.record_size,
            overflow_ceiling,
        };
        Ok((region, clamped))
    }
}

/// Validated region. Trailing bytes that can't hold a full record are cleared along with the
/// region but never carry a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub(crate) min_address: u32,
    pub(crate) max_address: u32,
    pub(crate) record_size: u8,
    pub(crate) overflow_ceiling: u64,
}

impl Region {
    pub fn min_address(&self) -> u32 {
        self.min_address
    }

    pub fn max_address(&self) -> u32 {
        self.max_address
    }

    pub fn record_size(&self) -> u8 {
        self.record_size
    }

    pub fn overflow_ceiling(&self) -> u64 {
        self.overflow_ceiling
    }

    pub fn slot_count(&self) -> u32 {
        (self.max_address - self.min_address + 1) / self.record_size as u32
    }

    /// Start address of the last slot that fits completely into the region.
    pub fn last_slot(&self) -> u32 {
        self.min_address + (self.slot_count() - 1) * self.record_size as u32
    }

    /// Start addresses of all records in ascending order.
    pub fn slot_addresses(&self) -> impl Iterator<Item = u32> + use<> {
        let min = self.min_address;
        let size = self.record_size as u32;
        (0..self.slot_count()).map(move |slot| min + slot * size)
    }

    /// Slot following `cursor`, wrapping to the start once the next record would cross
    /// `max_address`.
    pub(crate) fn next_slot(&self, cursor: u32) -> u32 {
        let size = self.record_size as u64;
        let candidate = cursor as u64 + size;
        if candidate + size - 1 > self.max_address as u64 {
            self.min_address
        } else {
            candidate as u32
        }
    }

    pub(crate) fn contains_slot(&self, address: u32) -> bool {
        address >= self.min_address
            && address <= self.last_slot()
            && (address - self.min_address).is_multiple_of(self.record_size as u32)
    }
}
