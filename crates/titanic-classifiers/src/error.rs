use std::error::Error;
use std::fmt;

/// Domain errors raised while turning passenger records into model inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A column required by the pipeline is absent from the table.
    MissingColumn(String),
    /// A column exists but does not hold the expected type.
    WrongColumnType { column: String, expected: &'static str },
    /// A required cell is empty. `row` is zero-based.
    MissingValue { row: usize, column: String },
    /// Sex is neither "female" nor "male".
    UnknownSex { row: usize, value: String },
    /// A label outside {0, 1}.
    InvalidLabel { row: usize, value: f64 },
    /// A column has no observed values to derive a statistic from.
    EmptyColumn(String),
    /// Nothing to fit on.
    EmptyData,
    ShapeMismatch { expected: usize, found: usize },
    InvalidTestSize(f64),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataError::MissingColumn(name) => write!(f, "Missing required column '{}'", name),
            DataError::WrongColumnType { column, expected } => {
                write!(f, "Column '{}' must be {}", column, expected)
            }
            DataError::MissingValue { row, column } => {
                write!(f, "Missing value for '{}' at row {}", column, row + 1)
            }
            DataError::UnknownSex { row, value } => write!(
                f,
                "Unknown Sex value '{}' at row {} (expected 'female' or 'male')",
                value,
                row + 1
            ),
            DataError::InvalidLabel { row, value } => {
                write!(f, "Survived must be 0 or 1, found {} at row {}", value, row + 1)
            }
            DataError::EmptyColumn(name) => write!(f, "Column '{}' has no observed values", name),
            DataError::EmptyData => write!(f, "Cannot fit on an empty matrix"),
            DataError::ShapeMismatch { expected, found } => write!(
                f,
                "Expected {} feature columns, found {}",
                expected, found
            ),
            DataError::InvalidTestSize(v) => {
                write!(f, "test_size must lie strictly between 0 and 1, got {}", v)
            }
        }
    }
}

impl Error for DataError {}
