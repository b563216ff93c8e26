//! Host side inspection and modification of wear leveled counters in EEPROM dumps.
//!
//! The dump is loaded into an [`EepromImage`] and handed to the same allocator that runs on the
//! device, so a region written here is read back identically by the firmware and vice versa.

pub mod error;
pub mod image;

mod export;

use std::path::Path;

use eeprom_wear_level::{
    BigEndian,
    Codec,
    LittleEndian,
    Region,
    RegionConfig,
    WearLeveling,
    WriteOutcome,
};
use serde::Serialize;

pub use error::Error;
pub use image::EepromImage;

use crate::image::ImageRef;

/// Byte order of the records in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

/// A single slot of the region as found in the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub address: u32,
    pub value: u64,
    /// Record bytes as stored, hex encoded.
    pub raw: String,
    /// Whether this is the most recently written record.
    pub cursor: bool,
}

/// State of a region as the allocator would recover it after a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub region: Region,
    pub highest: u64,
    pub cursor: Option<u32>,
    pub records: Vec<Record>,
}

impl Report {
    /// Serialize all records to CSV and return the content as a `String`.
    pub fn to_csv(&self) -> Result<String, Error> {
        export::write_csv_content(self)
    }

    /// Serialize all records to a CSV file at the given `path`.
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        export::write_csv(self, path)
    }
}

/// Scans the region and lists every record.
pub fn inspect(
    image: &mut EepromImage,
    config: RegionConfig,
    byte_order: ByteOrder,
) -> Result<Report, Error> {
    match byte_order {
        ByteOrder::Big => inspect_with::<BigEndian>(image, config),
        ByteOrder::Little => inspect_with::<LittleEndian>(image, config),
    }
}

/// Writes `value` the same way the firmware would.
pub fn write_value(
    image: &mut EepromImage,
    config: RegionConfig,
    byte_order: ByteOrder,
    value: u64,
) -> Result<WriteOutcome, Error> {
    let outcome = match byte_order {
        ByteOrder::Big => open::<BigEndian>(image, config)?.write_value(value)?,
        ByteOrder::Little => open::<LittleEndian>(image, config)?.write_value(value)?,
    };
    Ok(outcome)
}

/// Zeroes the region.
pub fn clear_range(image: &mut EepromImage, config: RegionConfig) -> Result<(), Error> {
    // byte order doesn't matter for zeroes
    open::<BigEndian>(image, config)?.clear_range()?;
    Ok(())
}

/// Zeroes the whole image, no matter its size.
pub fn clear_whole_storage(image: &mut EepromImage) -> Result<(), Error> {
    // single byte records fit any non empty image, the region is ignored anyway
    let config = RegionConfig::default().with_record_size(1);
    open::<BigEndian>(image, config)?.clear_whole_storage()?;
    Ok(())
}

fn open<C: Codec>(
    image: &mut EepromImage,
    config: RegionConfig,
) -> Result<WearLeveling<ImageRef<'_>, C>, Error> {
    let (wear_leveling, _) = WearLeveling::with_config(ImageRef(image), config)?;
    Ok(wear_leveling)
}

fn inspect_with<C: Codec>(image: &mut EepromImage, config: RegionConfig) -> Result<Report, Error> {
    let mut wear_leveling = open::<C>(image, config)?;
    let highest = wear_leveling.highest_value()?;
    let cursor = wear_leveling.cursor();
    let region = *wear_leveling.region();

    let mut records = Vec::with_capacity(region.slot_count() as usize);
    for address in region.slot_addresses() {
        let value = wear_leveling.read_record(address)?;
        records.push(Record {
            address,
            value,
            raw: String::new(),
            cursor: cursor == Some(address),
        });
    }

    // the allocator borrows the image mutably, fill in the raw bytes afterwards
    drop(wear_leveling);
    let size = region.record_size() as usize;
    for record in &mut records {
        let start = record.address as usize;
        record.raw = hex::encode(&image.as_bytes()[start..start + size]);
    }

    Ok(Report {
        region,
        highest,
        cursor,
        records,
    })
}
