use crate::codec::{Codec, MAX_RECORD_SIZE};
use crate::error::Error;
use crate::platform::Platform;
#[cfg(feature = "defmt")]
use defmt::trace;

#[inline(always)]
pub(crate) fn read_byte<T: Platform>(hal: &mut T, address: u32) -> Result<u8, Error> {
    let mut buf = [0u8; 1];
    hal.read(address, &mut buf).map_err(|_| Error::StorageFault)?;
    Ok(buf[0])
}

/// Writes `value` only if the stored byte differs, every skipped write saves a cycle of the cell.
#[inline(always)]
pub(crate) fn update_byte<T: Platform>(hal: &mut T, address: u32, value: u8) -> Result<(), Error> {
    if read_byte(hal, address)? == value {
        return Ok(());
    }

    hal.write(address, &[value]).map_err(|_| Error::StorageFault)
}

pub(crate) fn read_record<T: Platform, C: Codec>(
    hal: &mut T,
    address: u32,
    record_size: u8,
) -> Result<u64, Error> {
    let mut buf = [0u8; MAX_RECORD_SIZE];
    let record = &mut buf[..record_size as usize];
    for (offset, byte) in record.iter_mut().enumerate() {
        *byte = read_byte(hal, address + offset as u32)?;
    }
    Ok(C::decode(record))
}

/// Not atomic: a fault or power loss between two bytes leaves a torn record behind.
pub(crate) fn write_record<T: Platform, C: Codec>(
    hal: &mut T,
    address: u32,
    record_size: u8,
    value: u64,
) -> Result<(), Error> {
    #[cfg(feature = "defmt")]
    trace!("write_record @{:#06x}: {}", address, value);

    let mut buf = [0u8; MAX_RECORD_SIZE];
    let record = &mut buf[..record_size as usize];
    C::encode(value, record);
    for (offset, &byte) in record.iter().enumerate() {
        update_byte(hal, address + offset as u32, byte)?;
    }
    Ok(())
}

/// Zeroes `first..=last` byte by byte.
pub(crate) fn zero_fill<T: Platform>(hal: &mut T, first: u32, last: u32) -> Result<(), Error> {
    #[cfg(feature = "defmt")]
    trace!("zero_fill {:#06x}..={:#06x}", first, last);

    for address in first..=last {
        update_byte(hal, address, 0)?;
    }
    Ok(())
}
