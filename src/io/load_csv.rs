//! Load-profile CSV exchange (`Hour,Load_kW`, one row per hour).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::load::{DEFAULT_HOURLY_KW, HOURS_PER_DAY};

const HEADER: [&str; 2] = ["Hour", "Load_kW"];

#[derive(Debug, Error)]
pub enum LoadCsvError {
    #[error("cannot open load profile \"{path}\": {source}")]
    Open { path: String, source: io::Error },
    #[error("malformed load profile CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads a 24-hour profile from CSV with a header row.
///
/// The second column of each row is the load. Unparseable or missing values
/// become [`DEFAULT_HOURLY_KW`], negatives become zero, rows past the 24th
/// are ignored and short files are padded with [`DEFAULT_HOURLY_KW`].
///
/// # Errors
///
/// Returns [`LoadCsvError::Csv`] if the input is not readable as CSV.
pub fn read_load_csv(reader: impl Read) -> Result<[f64; HOURS_PER_DAY], LoadCsvError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = [DEFAULT_HOURLY_KW; HOURS_PER_DAY];
    for (slot, record) in values.iter_mut().zip(rdr.records()) {
        let record = record?;
        *slot = record
            .get(1)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map_or(DEFAULT_HOURLY_KW, |v| v.max(0.0));
    }
    Ok(values)
}

/// Reads a load profile CSV file.
///
/// # Errors
///
/// Returns a `LoadCsvError` if the file cannot be opened or parsed.
pub fn import_load_csv(path: &Path) -> Result<[f64; HOURS_PER_DAY], LoadCsvError> {
    let file = File::open(path).map_err(|source| LoadCsvError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_load_csv(io::BufReader::new(file))
}

/// Writes hourly values as `Hour,Load_kW` CSV.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_load_csv(values: &[f64; HOURS_PER_DAY], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for (hour, v) in values.iter().enumerate() {
        wtr.write_record(&[hour.to_string(), v.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes hourly values to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_load_csv(values: &[f64; HOURS_PER_DAY], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_load_csv(values, io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::LoadPattern;

    #[test]
    fn export_then_import_preserves_values() {
        let mut values = LoadPattern::Processing.hourly_kw();
        values[5] = 1234.5678;
        let mut buf = Vec::new();
        write_load_csv(&values, &mut buf).expect("write should succeed");
        let back = read_load_csv(buf.as_slice()).expect("read should succeed");
        assert_eq!(back, values);
    }

    #[test]
    fn header_is_hour_load() {
        let mut buf = Vec::new();
        write_load_csv(&[1.0; 24], &mut buf).expect("write should succeed");
        let text = String::from_utf8(buf).expect("utf-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Hour,Load_kW"));
        assert_eq!(lines.next(), Some("0,1"));
        assert_eq!(text.lines().count(), 25);
    }

    #[test]
    fn invalid_and_negative_entries_are_substituted() {
        let csv = "Hour,Load_kW\n0,100\n1,abc\n2,-50\n3\n4, 75.5 \n";
        let values = read_load_csv(csv.as_bytes()).expect("read should succeed");
        assert_eq!(values[0], 100.0);
        assert_eq!(values[1], DEFAULT_HOURLY_KW);
        assert_eq!(values[2], 0.0);
        assert_eq!(values[3], DEFAULT_HOURLY_KW);
        assert_eq!(values[4], 75.5);
        // Short file is padded.
        assert!(values[5..].iter().all(|&v| v == DEFAULT_HOURLY_KW));
    }

    #[test]
    fn rows_beyond_24_are_ignored() {
        let mut csv = String::from("Hour,Load_kW\n");
        for h in 0..30 {
            csv.push_str(&format!("{h},{}\n", h * 10));
        }
        let values = read_load_csv(csv.as_bytes()).expect("read should succeed");
        assert_eq!(values[23], 230.0);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = import_load_csv(Path::new("/nonexistent/profile.csv"))
            .expect_err("missing file should fail");
        assert!(err.to_string().contains("/nonexistent/profile.csv"));
    }
}
