use thiserror::Error;

/// Errors that can occur while loading, inspecting, modifying or exporting EEPROM images.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("wear leveling: {0}")]
    WearLeveling(#[from] eeprom_wear_level::error::Error),

    #[error("image size {0} is not supported")]
    InvalidImageSize(usize),
}
