use std::path::Path;

use csv::Writer;

use crate::Report;
use crate::error::Error;

/// Serialize all records of `report` to a CSV file at the given `output_path`.
///
/// Records are written in ascending address order with the columns `address`, `value`, `raw`
/// and `cursor`.
pub(crate) fn write_csv<P: AsRef<Path>>(report: &Report, output_path: P) -> Result<(), Error> {
    let mut wtr = Writer::from_path(output_path)?;
    write_records(&mut wtr, report)
}

/// Serialize all records of `report` to CSV and return the content as a `String`.
pub(crate) fn write_csv_content(report: &Report) -> Result<String, Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    write_records(&mut wtr, report)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        Error::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn write_records<W: std::io::Write>(wtr: &mut Writer<W>, report: &Report) -> Result<(), Error> {
    for record in &report.records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}
