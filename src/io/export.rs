//! CSV export for charge-profile series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::battery::types::ChargeProfilePoint;

/// Column header for CSV profile export.
const HEADER: &str = "time_hr,capacity_kwh,soc,mileage_mi";

/// Exports a charge profile to a CSV file at the given path.
///
/// Writes a header row followed by one data row per profile point. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(profile: &[ChargeProfilePoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(profile, buf)
}

/// Writes a charge profile as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(profile: &[ChargeProfilePoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(','))?;

    // Data rows
    for p in profile {
        wtr.write_record(&[
            format!("{:.2}", p.time_hr),
            format!("{:.4}", p.capacity_kwh),
            format!("{:.4}", p.soc),
            format!("{:.4}", p.mileage_mi),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
