//! Reconstructs the allocator state from the region after a restart.
//!
//! Records carry neither sequence numbers nor checksums. Since values only ever grow, the record
//! with the numerically largest value is the one written last, regardless of its position.

use crate::State;
use crate::codec::Codec;
use crate::config::Region;
use crate::error::Error;
use crate::platform::Platform;
use crate::raw;
#[cfg(feature = "defmt")]
use defmt::debug;

/// Reads every slot of the region once. The first occurrence wins if the maximum appears more than
/// once, which only happens with torn or externally written records.
pub(crate) fn scan<T: Platform, C: Codec>(hal: &mut T, region: &Region) -> Result<State, Error> {
    #[cfg(feature = "defmt")]
    debug!(
        "scan: {:#06x}..={:#06x}, {} slots",
        region.min_address,
        region.max_address,
        region.slot_count()
    );

    #[cfg(feature = "debug-logs")]
    println!(
        "  scan: {:#06x}..={:#06x}",
        region.min_address, region.max_address
    );

    let mut highest = 0u64;
    let mut address = region.min_address;
    for slot in region.slot_addresses() {
        let value = raw::read_record::<T, C>(hal, slot, region.record_size)?;
        if value > highest {
            highest = value;
            address = slot;

            #[cfg(feature = "debug-logs")]
            println!("  scan: new highest {highest} @{address:#06x}");
        }
    }

    let state = if highest == 0 {
        State::Empty
    } else {
        State::Known { highest, address }
    };

    #[cfg(feature = "defmt")]
    debug!("scan: {}", state);

    Ok(state)
}
