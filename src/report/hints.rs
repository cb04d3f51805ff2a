/// Color treatment of one report row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorClass {
    /// The whole row is highlighted (PDF documents)
    RedRow,
    /// Only the file-type cell is highlighted (PHP pages)
    GreenFileType,
    /// Only the file-type cell is highlighted (no suffix, fallback type)
    BlueFileType,
    #[default]
    None,
}

impl ColorClass {
    /// Picks the color for a file type
    ///
    /// `pdf` wins over everything, then `php`, then the fallback type.
    pub fn for_file_type(file_type: &str, fallback: &str) -> Self {
        if file_type == "pdf" {
            Self::RedRow
        } else if file_type == "php" {
            Self::GreenFileType
        } else if file_type == fallback {
            Self::BlueFileType
        } else {
            Self::None
        }
    }

    /// CSS color name, if any
    pub fn css_color(&self) -> Option<&'static str> {
        match self {
            Self::RedRow => Some("red"),
            Self::GreenFileType => Some("green"),
            Self::BlueFileType => Some("blue"),
            Self::None => None,
        }
    }

    /// Returns true if the color applies to every cell of the row
    pub fn is_row_wide(&self) -> bool {
        matches!(self, Self::RedRow)
    }
}

/// Presentation hints attached to one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayHints {
    pub color: ColorClass,

    /// Column indices whose cell should render as a hyperlink to its own text
    pub link_columns: Vec<usize>,
}

impl DisplayHints {
    pub fn is_link(&self, column: usize) -> bool {
        self.link_columns.contains(&column)
    }
}
