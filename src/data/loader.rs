//! CSV loading of raw trip records.

use crate::data::{columns, TripRecord};
use crate::error::{Result, TaxiFareError};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Loads at most `nrows` records from the CSV file at `path`.
///
/// # Errors
/// [`TaxiFareError::Data`] if the file cannot be opened, a required column
/// is missing from the header, or a numeric field does not parse.
pub fn load_trips<P: AsRef<Path>>(path: P, nrows: Option<usize>) -> Result<Vec<TripRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| TaxiFareError::Data(format!("cannot open {}: {}", path.display(), e)))?;
    let records = read_trips(BufReader::new(file), nrows)?;
    info!(path = %path.display(), rows = records.len(), "loaded trips");
    Ok(records)
}

/// Reads trip records from any CSV source with a header row.
pub fn read_trips<R: Read>(reader: R, nrows: Option<usize>) -> Result<Vec<TripRecord>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(TaxiFareError::Data(format!(
                "missing required column `{}`",
                required
            )));
        }
    }

    let limit = nrows.unwrap_or(usize::MAX);
    let mut records = Vec::new();
    for result in rdr.deserialize::<TripRecord>().take(limit) {
        records.push(result?);
    }
    Ok(records)
}
