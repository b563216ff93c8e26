use thiserror::Error;

/// Errors that can occur while configuring or operating a wear leveled region. Stale writes and
/// overflow resets are not errors, they are reported through [`crate::WriteOutcome`].
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The provided storage returned an error. The instance refuses further writes until
    /// [`crate::WearLeveling::invalidate`] is called, since a record may have been torn.
    #[error("storage fault")]
    StorageFault,

    /// Records have to be between 1 and 8 bytes wide.
    #[error("invalid record size: {0}")]
    InvalidRecordSize(u8),

    /// The minimum address lies outside of the storage.
    #[error("address out of range: {0:#06x}")]
    AddressOutOfRange(u32),

    /// The region can't hold a single record.
    #[error("region too small")]
    RegionTooSmall,

    /// The overflow ceiling can't be encoded with the configured record size.
    #[error("overflow ceiling not representable: {0}")]
    CeilingNotRepresentable(u64),

    /// Addresses are 32 bits wide, larger storages can't be addressed.
    #[error("storage capacity too large: {0} bytes")]
    CapacityTooLarge(usize),
}
