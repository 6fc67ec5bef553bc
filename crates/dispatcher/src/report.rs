//! Console report
//!
//! Plain-text table of ranked clusters followed by the merge summary and a
//! footer naming the config and output files.

use std::fmt;
use std::path::{Path, PathBuf};

use contracts::ReportRow;

const HEADERS: [&str; 4] = ["Seen Count", "First Seen Date", "Latitude", "Longitude"];
const FOOTER_RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

const ALIGN: [Align; 4] = [Align::Right, Align::Left, Align::Right, Align::Right];

/// Everything printed to stdout after a run
#[derive(Debug, Clone)]
pub struct ConsoleReport {
    rows: Vec<ReportRow>,
    threshold: String,
    merged_records: usize,
    config_file: PathBuf,
    output_file: PathBuf,
}

impl ConsoleReport {
    /// `merged_records` is the number of records that survived the region filter
    pub fn new(
        rows: Vec<ReportRow>,
        threshold: impl fmt::Display,
        merged_records: usize,
        config_file: impl AsRef<Path>,
        output_file: impl AsRef<Path>,
    ) -> Self {
        Self {
            rows,
            threshold: threshold.to_string(),
            merged_records,
            config_file: config_file.as_ref().to_path_buf(),
            output_file: output_file.as_ref().to_path_buf(),
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Aligned table, header and dash rule included
    pub fn table(&self) -> String {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|r| {
                [
                    r.count.to_string(),
                    r.earliest.to_string(),
                    r.latitude.to_string(),
                    r.longitude.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 2);
        lines.push(format_line(&HEADERS.map(String::from), &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        lines.extend(cells.iter().map(|row| format_line(row, &widths)));
        lines.join("\n")
    }

    pub fn threshold_line(&self) -> String {
        format!(
            "Fires must be within {} of one another to be merged.",
            self.threshold
        )
    }

    pub fn merge_line(&self) -> String {
        format!(
            "Using this method to merge {} into {} wildfires.",
            self.merged_records,
            self.rows.len()
        )
    }

    pub fn footer(&self) -> String {
        let rule = "-".repeat(FOOTER_RULE_WIDTH);
        format!(
            "{rule}\nConfig File: {}\nOutput File: {}\n{rule}",
            self.config_file.display(),
            self.output_file.display()
        )
    }

    /// Write the full report to stdout
    pub fn print(&self) {
        println!("{self}");
    }
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths.iter().copied())
        .zip(ALIGN)
        .map(|((cell, width), align)| match align {
            Align::Left => format!("{cell:<width$}"),
            Align::Right => format!("{cell:>width$}"),
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl fmt::Display for ConsoleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.table())?;
        writeln!(f)?;
        writeln!(f, "{}", self.threshold_line())?;
        writeln!(f, "{}", self.merge_line())?;
        writeln!(f)?;
        write!(f, "{}", self.footer())
    }
}
