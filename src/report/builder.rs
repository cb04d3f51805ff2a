use crate::report::hints::{ColorClass, DisplayHints};
use crate::report::record::{PageRecord, PLACEHOLDER};
use crate::report::schema::{Column, ReportSchema};

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub cells: Vec<String>,
    pub hints: DisplayHints,
}

/// Finalized report handed to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub headers: Vec<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<ReportRow>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, if the report has it
    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

/// Turns accumulated page records into a sorted, display-ready report
#[derive(Debug)]
pub struct RecordSetBuilder {
    schema: ReportSchema,
}

impl RecordSetBuilder {
    pub fn new(schema: ReportSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    /// Builds the report
    ///
    /// Rows are sorted by URL in byte order, so the output does not depend on
    /// the order in which workers finished. Derived columns are computed
    /// after sorting, one cell per record.
    ///
    /// # Example
    ///
    /// ```
    /// use pagemap::report::{PageRecord, RecordSetBuilder, ReportSchema};
    ///
    /// let records = vec![
    ///     PageRecord::new("http://example.com/b", "ROOT", "B", "pcf"),
    ///     PageRecord::new("http://example.com/a", "ROOT", "A", "pcf"),
    /// ];
    /// let report = RecordSetBuilder::new(ReportSchema::default()).build(records);
    /// assert_eq!(report.rows[0].cells[0], "http://example.com/a");
    /// ```
    pub fn build(&self, mut records: Vec<PageRecord>) -> RecordSet {
        records.sort_by(|a, b| a.url.cmp(&b.url));

        let columns = self.schema.columns();
        let headers = self.schema.headers();
        let link_candidates: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Column::Primary | Column::Derived(_)))
            .map(|(i, _)| i)
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|column| self.schema.cell(*column, record))
                    .collect();

                let link_columns = link_candidates
                    .iter()
                    .copied()
                    .filter(|&i| is_linkable(&cells[i]))
                    .collect();

                let color =
                    ColorClass::for_file_type(&record.file_type, self.schema.fallback_file_type());

                ReportRow {
                    cells,
                    hints: DisplayHints {
                        color,
                        link_columns,
                    },
                }
            })
            .collect();

        RecordSet {
            headers,
            columns,
            rows,
        }
    }
}

fn is_linkable(value: &str) -> bool {
    !value.is_empty() && value != PLACEHOLDER
}
