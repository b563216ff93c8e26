#![doc = include_str ! ("../README.md")]
#![cfg_attr(not(target_arch = "x86_64"), no_std)]

pub mod codec;
pub mod config;
pub mod error;
pub mod platform;
mod raw;
mod scan;

pub use codec::{BigEndian, Codec, LittleEndian};
pub use config::{Region, RegionConfig};

use crate::error::Error;
use crate::platform::Platform;
use core::marker::PhantomData;
#[cfg(feature = "defmt")]
use defmt::{debug, warn};

/// What the allocator knows about the region. Nothing is persisted besides the records
/// themselves, so this is rebuilt by a scan after every restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum State {
    /// The region hasn't been scanned yet.
    Unrecovered,
    /// Every record decodes to zero, the next write goes to the first slot.
    Empty,
    /// `highest` is stored at `address`, the most recently written record.
    Known { highest: u64, address: u32 },
}

/// Branch taken by [`WearLeveling::write_value`].
#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteOutcome {
    /// The value was stored in the record at `address`.
    Written { address: u32 },
    /// The value was not greater than `highest`, nothing was written.
    RejectedStale { highest: u64 },
    /// The value exceeded the overflow ceiling. The region was cleared and the value dropped.
    ResetPerformed,
}

/// Result of applying a [`RegionConfig`].
#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitOutcome {
    Configured,
    /// The requested `max_address` exceeded the storage and was lowered to its last address.
    ConfigClamped { requested: u32, effective: u32 },
}

/// Spreads a monotonically increasing counter over a region of byte addressable storage.
///
/// Every accepted value goes to the record following the previous one, wrapping at the end of
/// the region. Old records are left in place and overwritten on a later lap.
///
/// The instance caches the highest value and its address. At most one live instance may cover
/// any byte of the region: clears done through another instance or by foreign code are not
/// noticed until [`WearLeveling::invalidate`] is called. The type is not reentrant, share it
/// between threads only behind a lock.
pub struct WearLeveling<T: Platform, C: Codec = BigEndian> {
    pub(crate) hal: T,
    pub(crate) region: Region,
    pub(crate) state: State,
    pub(crate) faulted: bool,
    _codec: PhantomData<C>,
}

impl<T: Platform, C: Codec> WearLeveling<T, C> {
    /// Uses the whole storage with 4 byte records and the default overflow ceiling.
    pub fn new(hal: T) -> Result<Self, Error> {
        let (wear_leveling, _) = Self::with_config(hal, RegionConfig::default())?;
        Ok(wear_leveling)
    }

    /// Creates an instance for the given region. The storage is not touched until the first
    /// read or write.
    pub fn with_config(hal: T, config: RegionConfig) -> Result<(Self, InitOutcome), Error> {
        let (region, outcome) = Self::resolve(&hal, &config)?;
        let wear_leveling = Self {
            hal,
            region,
            state: State::Unrecovered,
            faulted: false,
            _codec: PhantomData,
        };
        Ok((wear_leveling, outcome))
    }

    /// Applies a new region. The cached state is dropped and rebuilt from the new region on the
    /// next access.
    pub fn initialize(&mut self, config: RegionConfig) -> Result<InitOutcome, Error> {
        let (region, outcome) = Self::resolve(&self.hal, &config)?;
        self.region = region;
        self.state = State::Unrecovered;
        Ok(outcome)
    }

    fn resolve(hal: &T, config: &RegionConfig) -> Result<(Region, InitOutcome), Error> {
        let (region, clamped) = config.resolve(hal.capacity())?;

        #[cfg(feature = "debug-logs")]
        println!("  WearLeveling: {region:?}");

        if !clamped {
            return Ok((region, InitOutcome::Configured));
        }

        let requested = config.max_address.unwrap_or(region.max_address);

        #[cfg(feature = "defmt")]
        warn!(
            "max address {:#06x} exceeds storage, clamped to {:#06x}",
            requested, region.max_address
        );

        Ok((
            region,
            InitOutcome::ConfigClamped {
                requested,
                effective: region.max_address,
            },
        ))
    }

    /// Stores `value` in the next record if it is greater than every value stored so far.
    ///
    /// Scans the region first if this instance hasn't done so yet. Stale values are ignored, as
    /// callers usually derive the value from a clock or counter and repeat themselves routinely.
    /// A value above the overflow ceiling clears the region instead of being written.
    pub fn write_value(&mut self, value: u64) -> Result<WriteOutcome, Error> {
        if self.faulted {
            return Err(Error::StorageFault);
        }

        match self.write_value_unchecked(value) {
            Ok(outcome) => Ok(outcome),
            Err(Error::StorageFault) => Err(self.fault()),
            Err(e) => Err(e),
        }
    }

    fn write_value_unchecked(&mut self, value: u64) -> Result<WriteOutcome, Error> {
        let (highest, address) = match self.recover()? {
            State::Known { highest, address } => (highest, self.region.next_slot(address)),
            _ => (0, self.region.min_address),
        };

        if value <= highest {
            #[cfg(feature = "defmt")]
            debug!("value {} not written, highest is {}", value, highest);

            return Ok(WriteOutcome::RejectedStale { highest });
        }

        if value > self.region.overflow_ceiling {
            #[cfg(feature = "defmt")]
            warn!(
                "value {} exceeds ceiling {}, clearing region",
                value, self.region.overflow_ceiling
            );

            self.clear_region()?;
            return Ok(WriteOutcome::ResetPerformed);
        }

        #[cfg(feature = "debug-logs")]
        println!("  WearLeveling: write {value} ({value:#x}) @{address:#06x}");

        raw::write_record::<T, C>(&mut self.hal, address, self.region.record_size, value)?;
        self.state = State::Known {
            highest: value,
            address,
        };

        Ok(WriteOutcome::Written { address })
    }

    /// Returns the highest stored value, `0` for an empty region. Scans the region on first use.
    pub fn highest_value(&mut self) -> Result<u64, Error> {
        match self.recover() {
            Ok(State::Known { highest, .. }) => Ok(highest),
            Ok(_) => Ok(0),
            Err(Error::StorageFault) => Err(self.fault()),
            Err(e) => Err(e),
        }
    }

    /// Zeroes every byte of the region, including trailing bytes that don't form a full record.
    pub fn clear_range(&mut self) -> Result<(), Error> {
        if self.faulted {
            return Err(Error::StorageFault);
        }

        match self.clear_region() {
            Err(Error::StorageFault) => Err(self.fault()),
            other => other,
        }
    }

    /// Zeroes the entire storage, ignoring the region bounds.
    ///
    /// Other instances on the same storage keep their cached values, see the type level
    /// documentation.
    pub fn clear_whole_storage(&mut self) -> Result<(), Error> {
        if self.faulted {
            return Err(Error::StorageFault);
        }

        #[cfg(feature = "defmt")]
        debug!("clear_whole_storage: {} bytes", self.hal.capacity());

        let capacity = self.hal.capacity();
        let last = match capacity.checked_sub(1) {
            Some(last) => u32::try_from(last).map_err(|_| Error::CapacityTooLarge(capacity))?,
            None => return Ok(()),
        };
        match raw::zero_fill(&mut self.hal, 0, last) {
            Ok(()) => {
                self.state = State::Empty;
                Ok(())
            }
            Err(Error::StorageFault) => Err(self.fault()),
            Err(e) => Err(e),
        }
    }

    /// Forgets the cached state so the next access rescans the region. Also clears a previous
    /// storage fault.
    pub fn invalidate(&mut self) {
        self.state = State::Unrecovered;
        self.faulted = false;
    }

    /// Address of the most recently written record. `None` if the region hasn't been scanned yet
    /// or holds no record.
    pub fn cursor(&self) -> Option<u32> {
        match self.state {
            State::Known { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Decodes the record starting at `address`, which has to be a slot of the region.
    pub fn read_record(&mut self, address: u32) -> Result<u64, Error> {
        if !self.region.contains_slot(address) {
            return Err(Error::AddressOutOfRange(address));
        }

        match raw::read_record::<T, C>(&mut self.hal, address, self.region.record_size) {
            Err(Error::StorageFault) => Err(self.fault()),
            other => other,
        }
    }

    /// Gives back the storage.
    pub fn release(self) -> T {
        self.hal
    }

    fn recover(&mut self) -> Result<State, Error> {
        if self.state == State::Unrecovered {
            self.state = scan::scan::<T, C>(&mut self.hal, &self.region)?;
        }
        Ok(self.state)
    }

    fn clear_region(&mut self) -> Result<(), Error> {
        raw::zero_fill(
            &mut self.hal,
            self.region.min_address,
            self.region.max_address,
        )?;
        self.state = State::Empty;
        Ok(())
    }

    /// A partially written record may be left behind, so the state has to be rebuilt.
    fn fault(&mut self) -> Error {
        self.faulted = true;
        self.state = State::Unrecovered;
        Error::StorageFault
    }
}
