use anyhow::Result;
use std::{fs::OpenOptions, path::Path};

use model::*;

/// Appends every reading in `snapshot` to the CSV log at `path`,
/// creating the file with a header on first use and appending without
/// one afterwards. The log is append-only; rows are never rewritten.
pub fn append_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut w = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    for reading in &snapshot.readings {
        w.serialize(reading)?;
    }
    w.flush()?;
    Ok(())
}

/// Reads the entire historical log, oldest rows first. A missing file
/// is an error; an existing log with no rows yields an empty vec.
pub fn read_log(path: &Path) -> Result<Vec<TrafficReading>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        rows.push(rec?);
    }
    Ok(rows)
}
