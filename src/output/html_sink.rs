use crate::output::traits::{OutputResult, ReportSink};
use crate::report::{ColorClass, Column, RecordSet, ReportRow};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const STYLE: &str = "
table { border-collapse: collapse; font-family: sans-serif; font-size: 13px; }
th, td { border: 1px solid #ccc; padding: 2px 6px; text-align: left; vertical-align: top; }
th { background: #eee; }
td { overflow-wrap: anywhere; }
.red, .red a { color: red; }
.green { color: green; }
.blue { color: blue; }
";

/// Writes the report as a standalone HTML table
///
/// PDF rows are red, PHP and fallback file-type cells are green and blue,
/// link columns become anchors. Column widths follow the spreadsheet layout
/// the report replaces.
#[derive(Debug, Default)]
pub struct HtmlSink {
    title: String,
}

impl HtmlSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Renders the complete document
    pub fn render(&self, report: &RecordSet) -> String {
        let file_type_column = report.column_index(Column::FileType);

        let markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    table {
                        colgroup {
                            @for column in &report.columns {
                                col style=[column_width(*column).map(|w| format!("width: {}ch", w))];
                            }
                        }
                        thead {
                            tr {
                                @for header in &report.headers {
                                    th { (header) }
                                }
                            }
                        }
                        tbody {
                            @for row in &report.rows {
                                (render_row(row, file_type_column))
                            }
                        }
                    }
                }
            }
        };

        markup.into_string()
    }
}

impl ReportSink for HtmlSink {
    fn write(&mut self, report: &RecordSet, path: &Path) -> OutputResult<()> {
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(self.render(report).as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

fn render_row(row: &ReportRow, file_type_column: Option<usize>) -> Markup {
    let color = row.hints.color;
    let row_class = if color.is_row_wide() {
        color.css_color()
    } else {
        None
    };

    html! {
        tr class=[row_class] {
            @for (index, cell) in row.cells.iter().enumerate() {
                td class=[cell_class(color, index, file_type_column)] {
                    @if row.hints.is_link(index) {
                        a href=(cell) { (cell) }
                    } @else {
                        (cell)
                    }
                }
            }
        }
    }
}

fn cell_class(
    color: ColorClass,
    index: usize,
    file_type_column: Option<usize>,
) -> Option<&'static str> {
    match color {
        ColorClass::GreenFileType | ColorClass::BlueFileType if Some(index) == file_type_column => {
            color.css_color()
        }
        _ => None,
    }
}

fn column_width(column: Column) -> Option<u16> {
    match column {
        Column::Primary => Some(30),
        Column::Title => Some(50),
        Column::Notes => Some(22),
        _ => None,
    }
}
