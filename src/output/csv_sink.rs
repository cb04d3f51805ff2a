use crate::output::traits::{OutputResult, ReportSink};
use crate::report::RecordSet;
use std::path::Path;

/// Writes the report as CSV, one header row then one row per page
///
/// Display hints have no CSV representation and are dropped; hyperlink
/// cells keep their URL text.
#[derive(Debug, Default)]
pub struct CsvSink;

impl CsvSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for CsvSink {
    fn write(&mut self, report: &RecordSet, path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&report.headers)?;
        for row in &report.rows {
            writer.write_record(&row.cells)?;
        }
        writer.flush()?;
        Ok(())
    }
}
