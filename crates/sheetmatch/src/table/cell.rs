//! Scalar cell values and missing-value handling.

use std::fmt;

/// Numbers at or above this magnitude are rendered in float form.
const INTEGER_RENDER_LIMIT: f64 = 1e15;

/// A single cell in a table.
///
/// `Empty` is the canonical missing marker. Blank or whitespace-only text is
/// also treated as missing and collapses to `Empty` under [`Cell::normalized`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Check if this cell represents a missing value.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::Bool(_) => false,
        }
    }

    /// Collapse any missing representation to `Cell::Empty`.
    ///
    /// Non-missing values pass through untouched: no trimming, no coercion.
    pub fn normalized(self) -> Self {
        if self.is_missing() { Cell::Empty } else { self }
    }

    /// Render the textual form of the cell. Missing values render as `""`.
    pub fn to_text(&self) -> String {
        if self.is_missing() {
            return String::new();
        }
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

/// Integral values render without a decimal point so `5.0` and `"5"` agree.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < INTEGER_RENDER_LIMIT {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}
