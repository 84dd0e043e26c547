//! IO utilities for loading passenger files.

pub mod passenger_csv;

pub use passenger_csv::{
    read_passenger_csv, read_passenger_csv_with_config, CsvReaderConfig, REQUIRED_COLUMNS,
};
