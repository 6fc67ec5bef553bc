//! CSV decoding of satellite fire-detection feeds
//!
//! Columns are located by header name, so VIIRS and MODIS layouts both work.
//! Files without a header fall back to the VIIRS positional layout.
//! Malformed rows are skipped and counted; they never abort the read.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use contracts::{AcquisitionTime, ContractError, DetectionRecord, SourceTag, ACQ_DATE_FORMAT};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, instrument};

use crate::config::SourceStats;
use crate::error::{IngestionError, Result};

/// VIIRS active-fire column order
const VIIRS_COLUMNS: [&str; 13] = [
    "latitude",
    "longitude",
    "bright_ti4",
    "scan",
    "track",
    "acq_date",
    "acq_time",
    "satellite",
    "confidence",
    "version",
    "bright_ti5",
    "frp",
    "daynight",
];

/// Column positions of the fields the core needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    latitude: usize,
    longitude: usize,
    acq_date: usize,
    acq_time: usize,
    names: Vec<String>,
}

impl ColumnLayout {
    /// Positional VIIRS layout
    pub fn viirs() -> Self {
        Self {
            latitude: 0,
            longitude: 1,
            acq_date: 5,
            acq_time: 6,
            names: VIIRS_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build from a header row; `None` if the row is not a header
    pub fn from_header(header: &StringRecord) -> Option<Self> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted);

        Some(Self {
            latitude: find("latitude")?,
            longitude: find("longitude")?,
            acq_date: find("acq_date")?,
            acq_time: find("acq_time")?,
            names,
        })
    }

    fn is_core_column(&self, idx: usize) -> bool {
        idx == self.latitude || idx == self.longitude || idx == self.acq_date || idx == self.acq_time
    }
}

/// Reads one source into detection records
#[derive(Debug, Clone)]
pub struct CsvRecordReader {
    source: SourceTag,
}

impl CsvRecordReader {
    pub fn new(source: SourceTag) -> Self {
        Self { source }
    }

    /// Decode every row of `reader`
    ///
    /// # Errors
    /// Only I/O failures are returned; row-level problems are counted in
    /// [`SourceStats::skipped`].
    #[instrument(name = "csv_read", skip(self, reader), fields(source = %self.source))]
    pub fn read<R: Read>(&self, reader: R) -> Result<(Vec<DetectionRecord>, SourceStats)> {
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut stats = SourceStats::new(self.source.clone());
        let mut records = Vec::new();
        let mut layout: Option<ColumnLayout> = None;

        for (line, row) in csv.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => {
                    return Err(IngestionError::source_read(
                        self.source.as_str(),
                        e.to_string(),
                    ));
                }
                Err(e) => {
                    stats.rows += 1;
                    stats.skipped += 1;
                    debug!(source = %self.source, line = line + 1, error = %e, "Skipping undecodable row");
                    continue;
                }
            };

            let active = match layout {
                Some(ref layout) => layout,
                None => {
                    let detected = ColumnLayout::from_header(&row);
                    let is_header = detected.is_some();
                    let layout = layout.insert(detected.unwrap_or_else(ColumnLayout::viirs));
                    if is_header {
                        continue;
                    }
                    &*layout
                }
            };

            stats.rows += 1;
            match parse_row(&row, active, &self.source) {
                Ok(record) => {
                    stats.records += 1;
                    records.push(record);
                }
                Err(e) => {
                    stats.skipped += 1;
                    debug!(source = %self.source, line = line + 1, error = %e, "Skipping malformed row");
                }
            }
        }

        Ok((records, stats))
    }
}

fn field<'a>(row: &'a StringRecord, idx: usize, name: &str) -> std::result::Result<&'a str, ContractError> {
    row.get(idx)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ContractError::invalid_record(name, "missing"))
}

fn parse_coordinate(row: &StringRecord, idx: usize, name: &str) -> std::result::Result<f64, ContractError> {
    let raw = field(row, idx, name)?;
    raw.parse::<f64>()
        .map_err(|e| ContractError::invalid_record(name, format!("'{raw}': {e}")))
}

/// Decode a single data row
pub fn parse_row(
    row: &StringRecord,
    layout: &ColumnLayout,
    source: &SourceTag,
) -> std::result::Result<DetectionRecord, ContractError> {
    let latitude = parse_coordinate(row, layout.latitude, "latitude")?;
    let longitude = parse_coordinate(row, layout.longitude, "longitude")?;

    let raw_date = field(row, layout.acq_date, "acq_date")?;
    let acq_date = NaiveDate::parse_from_str(raw_date, ACQ_DATE_FORMAT)
        .map_err(|e| ContractError::invalid_record("acq_date", format!("'{raw_date}': {e}")))?;

    let acq_time: AcquisitionTime = field(row, layout.acq_time, "acq_time")?.parse()?;

    let extra: BTreeMap<String, String> = row
        .iter()
        .enumerate()
        .filter(|(idx, _)| !layout.is_core_column(*idx))
        .map(|(idx, value)| {
            let name = layout
                .names
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("column_{idx}"));
            (name, value.to_string())
        })
        .collect();

    Ok(DetectionRecord::new(latitude, longitude, acq_date, acq_time, source.clone())?.with_extra(extra))
}
