//! Renderer-neutral tables.

/// One cell value with the formatting class it is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// Currency amount, shown with one decimal.
    Money(f64),
    /// Piece count.
    Count(f64),
    /// Percentage in whole percents, shown with one decimal.
    Percent(f64),
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Numeric payload, `None` for text and empty cells.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Money(v) | Cell::Count(v) | Cell::Percent(v) => Some(*v),
            Cell::Empty | Cell::Text(_) => None,
        }
    }
}

/// One worksheet: header row, data rows and an optional bold totals row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
    pub totals: Option<Vec<Cell>>,
}

impl Sheet {
    /// Data rows plus the totals row, if any.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.totals.is_some())
    }
}

/// A workbook ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}
