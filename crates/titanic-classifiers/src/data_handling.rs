//! In-memory passenger table and the model-ready feature set.
//!
//! `PassengerTable` keeps every column of the source file with an inferred
//! type so previews and the correlation plot see the whole record, while
//! `FeatureSet` is the dense matrix/label pair handed to the scaler and model.
use std::fmt::Write as _;

use ndarray::{Array1, Array2, Axis};

use crate::error::DataError;

/// Cell contents read as missing, matching the tokens pandas treats as NA.
pub const DEFAULT_NA_VALUES: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// A single typed column. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    pub fn missing_count(&self) -> usize {
        match self {
            Column::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            Column::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Infer a column from raw string cells using the default missing-value
    /// tokens.
    pub fn infer(cells: Vec<String>) -> Column {
        Column::infer_with_na(cells, &DEFAULT_NA_VALUES)
    }

    /// Infer a column from raw string cells: numeric when every present cell
    /// parses as a float. Empty cells and any of `na_values` (after trimming)
    /// are missing, as is a parsed NaN.
    pub fn infer_with_na<S: AsRef<str>>(cells: Vec<String>, na_values: &[S]) -> Column {
        let is_missing = |cell: &str| {
            let cell = cell.trim();
            cell.is_empty() || na_values.iter().any(|na| na.as_ref() == cell)
        };

        let numeric = cells
            .iter()
            .filter(|c| !is_missing(c.as_str()))
            .all(|c| c.trim().parse::<f64>().is_ok());

        if numeric {
            Column::Numeric(
                cells
                    .iter()
                    .map(|c| {
                        if is_missing(c.as_str()) {
                            None
                        } else {
                            c.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
                        }
                    })
                    .collect(),
            )
        } else {
            Column::Text(
                cells
                    .into_iter()
                    .map(|c| if is_missing(c.as_str()) { None } else { Some(c) })
                    .collect(),
            )
        }
    }

    fn display_cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(values) => match values[row] {
                Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
                Some(v) => format!("{:.4}", v),
                None => "NaN".to_string(),
            },
            Column::Text(values) => values[row].clone().unwrap_or_else(|| "NaN".to_string()),
        }
    }
}

/// Column-oriented passenger table with named, typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerTable {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl PassengerTable {
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, DataError> {
        if names.len() != columns.len() {
            return Err(DataError::ShapeMismatch {
                expected: names.len(),
                found: columns.len(),
            });
        }
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(DataError::ShapeMismatch {
                expected: n_rows,
                found: bad.len(),
            });
        }
        Ok(PassengerTable {
            names,
            columns,
            n_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|idx| &self.columns[idx])
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], DataError> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(Column::Text(_)) => Err(DataError::WrongColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
            None => Err(DataError::MissingColumn(name.to_string())),
        }
    }

    /// Replace a column in place, or append it when the name is new.
    pub fn set_column(&mut self, name: &str, column: Column) -> Result<(), DataError> {
        if column.len() != self.n_rows && !self.columns.is_empty() {
            return Err(DataError::ShapeMismatch {
                expected: self.n_rows,
                found: column.len(),
            });
        }
        match self.position(name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                if self.columns.is_empty() {
                    self.n_rows = column.len();
                }
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// All numeric columns in table order.
    pub fn numeric_columns(&self) -> Vec<(&str, &[Option<f64>])> {
        self.names
            .iter()
            .zip(self.columns.iter())
            .filter_map(|(name, col)| match col {
                Column::Numeric(values) => Some((name.as_str(), values.as_slice())),
                Column::Text(_) => None,
            })
            .collect()
    }

    /// Render the first `n` rows as an aligned text table.
    pub fn head(&self, n: usize) -> String {
        let rows = n.min(self.n_rows);
        let widths: Vec<usize> = self
            .names
            .iter()
            .zip(self.columns.iter())
            .map(|(name, col)| {
                (0..rows)
                    .map(|r| col.display_cell(r).chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let index_width = rows.saturating_sub(1).to_string().len();

        let mut out = String::new();
        let _ = write!(out, "{:>w$}", "", w = index_width);
        for (name, width) in self.names.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", name, w = *width);
        }
        out.push('\n');
        for r in 0..rows {
            let _ = write!(out, "{:>w$}", r, w = index_width);
            for (col, width) in self.columns.iter().zip(&widths) {
                let _ = write!(out, "  {:>w$}", col.display_cell(r), w = *width);
            }
            out.push('\n');
        }
        out
    }

    pub fn log_input_data_summary(&self) {
        log::info!(
            "Loaded {} passengers with {} columns",
            self.n_rows,
            self.columns.len()
        );
        for (name, col) in self.names.iter().zip(&self.columns) {
            let missing = col.missing_count();
            if missing > 0 {
                log::debug!("Column '{}' has {} missing values", name, missing);
            }
        }
    }
}

/// Dense feature matrix aligned row for row with the `Survived` label.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub x: Array2<f64>,
    pub y: Array1<usize>,
    pub feature_names: Vec<String>,
}

impl FeatureSet {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Keep only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> FeatureSet {
        FeatureSet {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }
}
