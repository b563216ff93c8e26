use embedded_storage::Storage;

/// Any byte addressable storage can back a wear leveled region. The allocator only ever reads and
/// writes a single byte per call, so no alignment requirements apply.
pub trait Platform: Storage {}

impl<T: Storage> Platform for T {}

#[cfg(any(
    feature = "esp32",
    feature = "esp32s2",
    feature = "esp32s3",
    feature = "esp32c2",
    feature = "esp32c3",
    feature = "esp32c6",
    feature = "esp32h2",
))]
mod chip {
    use embedded_storage::{ReadStorage, Storage};
    use esp_storage::{FlashStorage, FlashStorageError};

    /// Emulated EEPROM on top of the internal flash. `esp-storage` performs the read-modify-write
    /// cycle of the containing sector for every byte update.
    pub struct EspEeprom<'d> {
        inner: FlashStorage<'d>,
        offset: u32,
        size: usize,
    }

    impl<'d> EspEeprom<'d> {
        /// Restricts the emulated EEPROM to `size` bytes starting at the flash address `offset`.
        pub fn new(inner: FlashStorage<'d>, offset: u32, size: usize) -> Self {
            Self {
                inner,
                offset,
                size,
            }
        }
    }

    impl ReadStorage for EspEeprom<'_> {
        type Error = FlashStorageError;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            ReadStorage::read(&mut self.inner, self.offset + offset, bytes)
        }

        fn capacity(&self) -> usize {
            self.size
        }
    }

    impl Storage for EspEeprom<'_> {
        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            Storage::write(&mut self.inner, self.offset + offset, bytes)
        }
    }
}

#[cfg(any(
    feature = "esp32",
    feature = "esp32s2",
    feature = "esp32s3",
    feature = "esp32c2",
    feature = "esp32c3",
    feature = "esp32c6",
    feature = "esp32h2",
))]
pub use chip::*;
