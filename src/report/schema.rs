use crate::config::{OptionalColumnConfig, ReportConfig};
use crate::report::derived::{self, DerivedColumn};
use crate::report::record::PageRecord;
use crate::url::DEFAULT_FALLBACK_FILE_TYPE;
use std::fmt;

pub const REDIRECTS_TO_HEADER: &str = "Redirects To";
pub const TITLE_HEADER: &str = "Title";
pub const FILE_TYPE_HEADER: &str = "File Type";
pub const NOTES_HEADER: &str = "Notes";

/// Review columns that can be switched on per report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalColumn {
    Qaed,
    LookedAt,
    RedirectCheck,
}

impl OptionalColumn {
    pub const ALL: [OptionalColumn; 3] = [Self::Qaed, Self::LookedAt, Self::RedirectCheck];

    pub fn header(&self) -> &'static str {
        match self {
            Self::Qaed => "QAed?",
            Self::LookedAt => "Looked at?",
            Self::RedirectCheck => "Redirect?",
        }
    }
}

impl From<OptionalColumnConfig> for OptionalColumn {
    fn from(config: OptionalColumnConfig) -> Self {
        match config {
            OptionalColumnConfig::Qaed => Self::Qaed,
            OptionalColumnConfig::LookedAt => Self::LookedAt,
            OptionalColumnConfig::RedirectCheck => Self::RedirectCheck,
        }
    }
}

/// One column of the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Primary,
    RedirectsTo,
    Title,
    FileType,
    Optional(OptionalColumn),
    Notes,
    /// Index into the schema's derived columns
    Derived(usize),
}

/// Headers no derived column may reuse
pub fn builtin_headers(primary_column: &str) -> Vec<&str> {
    let mut headers = vec![
        primary_column,
        REDIRECTS_TO_HEADER,
        TITLE_HEADER,
        FILE_TYPE_HEADER,
        NOTES_HEADER,
    ];
    headers.extend(OptionalColumn::ALL.iter().map(|c| c.header()));
    headers
}

/// Layout of a report: which columns exist and how their cells are filled
///
/// The three historical report flavors (basic sitemap, CMS audit, page
/// inventory) are all instances of this one schema.
pub struct ReportSchema {
    primary_column: String,
    fallback_file_type: String,
    optional: Vec<OptionalColumn>,
    derived: Vec<Box<dyn DerivedColumn>>,
}

impl ReportSchema {
    /// Creates the basic layout with no optional or derived columns
    pub fn new(primary_column: impl Into<String>, fallback_file_type: impl Into<String>) -> Self {
        Self {
            primary_column: primary_column.into(),
            fallback_file_type: fallback_file_type.into(),
            optional: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Builds the layout described by the `[report]` configuration section
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut schema = Self::new(&config.primary_column, &config.fallback_file_type);
        for column in &config.columns {
            schema = schema.with_optional(OptionalColumn::from(*column));
        }
        for column in &config.derived {
            schema = schema.with_derived(derived::from_config(column));
        }
        schema
    }

    /// Enables an optional column; duplicates are ignored
    pub fn with_optional(mut self, column: OptionalColumn) -> Self {
        if !self.optional.contains(&column) {
            self.optional.push(column);
            self.optional.sort();
        }
        self
    }

    /// Appends a derived column after the existing ones
    pub fn with_derived(mut self, column: Box<dyn DerivedColumn>) -> Self {
        self.derived.push(column);
        self
    }

    pub fn primary_column(&self) -> &str {
        &self.primary_column
    }

    pub fn fallback_file_type(&self) -> &str {
        &self.fallback_file_type
    }

    pub fn derived(&self) -> &[Box<dyn DerivedColumn>] {
        &self.derived
    }

    /// Columns in render order
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![
            Column::Primary,
            Column::RedirectsTo,
            Column::Title,
            Column::FileType,
        ];
        columns.extend(self.optional.iter().copied().map(Column::Optional));
        columns.push(Column::Notes);
        columns.extend((0..self.derived.len()).map(Column::Derived));
        columns
    }

    /// Header text of a column
    pub fn header(&self, column: Column) -> &str {
        match column {
            Column::Primary => &self.primary_column,
            Column::RedirectsTo => REDIRECTS_TO_HEADER,
            Column::Title => TITLE_HEADER,
            Column::FileType => FILE_TYPE_HEADER,
            Column::Optional(optional) => optional.header(),
            Column::Notes => NOTES_HEADER,
            Column::Derived(index) => self.derived.get(index).map_or("", |d| d.name()),
        }
    }

    /// Headers in render order
    pub fn headers(&self) -> Vec<String> {
        self.columns()
            .into_iter()
            .map(|c| self.header(c).to_string())
            .collect()
    }

    /// Cell text of a column for one record
    pub fn cell(&self, column: Column, record: &PageRecord) -> String {
        match column {
            Column::Primary => record.url.clone(),
            Column::RedirectsTo => record.redirects_to.clone(),
            Column::Title => record.title.clone(),
            Column::FileType => record.file_type.clone(),
            Column::Optional(OptionalColumn::Qaed | OptionalColumn::LookedAt) => String::new(),
            Column::Optional(OptionalColumn::RedirectCheck) => {
                record.redirect_check.as_str().to_string()
            }
            Column::Notes => record.notes.clone(),
            Column::Derived(index) => self
                .derived
                .get(index)
                .map(|d| d.derive(record))
                .unwrap_or_default(),
        }
    }
}

impl Default for ReportSchema {
    fn default() -> Self {
        Self::new("URL", DEFAULT_FALLBACK_FILE_TYPE)
    }
}

impl fmt::Debug for ReportSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportSchema")
            .field("primary_column", &self.primary_column)
            .field("fallback_file_type", &self.fallback_file_type)
            .field("optional", &self.optional)
            .field(
                "derived",
                &self.derived.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
