// Unicorn Logs - core/export.rs
//
// CSV and JSON export of the displayed entries (newest first).
// Core layer: writes to any Write trait object.

use crate::core::model::{DisplayEntry, LogRecord};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export entries to CSV format.
///
/// Writes: received_at, container_name, timestamp, ip, content
pub fn export_csv<'a, W: Write>(
    entries: impl IntoIterator<Item = &'a DisplayEntry>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["received_at", "container_name", "timestamp", "ip", "content"])
        .map_err(csv_err)?;

    let mut count = 0;
    for entry in entries {
        let received = entry.received_at.to_rfc3339();
        let r = &entry.record;
        csv_writer
            .write_record([
                received.as_str(),
                r.container_name.as_str(),
                r.timestamp.as_str(),
                r.ip.as_str(),
                r.content.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export entries to JSON format (array of wire-format records).
pub fn export_json<'a, W: Write>(
    entries: impl IntoIterator<Item = &'a DisplayEntry>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let records: Vec<&LogRecord> = entries.into_iter().map(|e| &e.record).collect();
    serde_json::to_writer_pretty(writer, &records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}
