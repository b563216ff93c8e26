//! The `Codec` trait translates between the counter value and the fixed width byte sequence of a
//! record. The allocator itself never looks at the byte order.

/// Records are at most as wide as the counter value.
pub const MAX_RECORD_SIZE: usize = size_of::<u64>();

pub trait Codec {
    /// Encodes `value` into `buf`. `buf.len()` is the record size, bits that don't fit are dropped.
    fn encode(value: u64, buf: &mut [u8]);

    /// Decodes a record of `buf.len()` bytes.
    fn decode(buf: &[u8]) -> u64;
}

/// Most significant byte first. This is the on-device format of the original 4 byte counter and
/// the default.
pub struct BigEndian;

/// Least significant byte first.
pub struct LittleEndian;

impl Codec for BigEndian {
    fn encode(value: u64, buf: &mut [u8]) {
        let width = buf.len();
        let bytes = value.to_be_bytes();
        buf.copy_from_slice(&bytes[MAX_RECORD_SIZE - width..]);
    }

    fn decode(buf: &[u8]) -> u64 {
        buf.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }
}

impl Codec for LittleEndian {
    fn encode(value: u64, buf: &mut [u8]) {
        let width = buf.len();
        let bytes = value.to_le_bytes();
        buf.copy_from_slice(&bytes[..width]);
    }

    fn decode(buf: &[u8]) -> u64 {
        buf.iter().rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }
}

/// Largest value that fits into `record_size` bytes.
pub(crate) const fn max_representable(record_size: u8) -> u64 {
    if record_size as usize >= MAX_RECORD_SIZE {
        u64::MAX
    } else {
        (1u64 << (record_size as u32 * 8)) - 1
    }
}
