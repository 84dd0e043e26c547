//! Passenger CSV reader.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::data_handling::{Column, PassengerTable, DEFAULT_NA_VALUES};

/// Columns the pipeline cannot run without.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Survived", "Pclass", "Sex", "Age"];

/// Configuration for reading passenger files.
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    pub delimiter: u8,
    /// Columns that must appear in the header row.
    pub required_columns: Vec<String>,
    /// Cell contents read as missing values.
    pub na_values: Vec<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            required_columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            na_values: DEFAULT_NA_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Read a comma-delimited passenger file with a header row.
pub fn read_passenger_csv<P: AsRef<Path>>(path: P) -> Result<PassengerTable> {
    read_passenger_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read a passenger file using a custom configuration.
pub fn read_passenger_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &CsvReaderConfig,
) -> Result<PassengerTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open passenger file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read passenger header row")?
        .clone();

    for name in &config.required_columns {
        if find_column(&headers, name).is_none() {
            return Err(anyhow!(
                "Missing required column '{}' in {}",
                name,
                path.as_ref().display()
            ));
        }
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    let names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let columns: Vec<Column> = cells
        .into_iter()
        .map(|column| Column::infer_with_na(column, &config.na_values))
        .collect();

    let table = PassengerTable::new(names, columns).context("Failed to build passenger table")?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        table.n_rows(),
        table.n_columns(),
        path.as_ref().display()
    );
    Ok(table)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_quoted_names_and_missing_ages() {
        let file = write_tmp(
            "PassengerId,Survived,Pclass,Name,Sex,Age\n\
             1,0,3,\"Braund, Mr. Owen Harris\",male,22\n\
             6,0,3,\"Moran, Mr. James\",male,\n",
        );
        let table = read_passenger_csv(file.path()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.numeric("Age").unwrap(), &[Some(22.0), None]);
        match table.column("Name") {
            Some(Column::Text(names)) => {
                assert_eq!(names[0].as_deref(), Some("Braund, Mr. Owen Harris"))
            }
            other => panic!("unexpected column {:?}", other),
        }
    }

    #[test]
    fn missing_required_column_is_reported_by_name() {
        let file = write_tmp("Survived,Pclass,Sex\n1,1,female\n");
        let err = read_passenger_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("'Age'"));
    }

    #[test]
    fn na_tokens_load_as_missing_ages() {
        let file = write_tmp(
            "Survived,Pclass,Sex,Age\n\
             1,1,female,38\n\
             0,3,male,NaN\n\
             1,2,female,NA\n\
             0,3,male,20\n",
        );
        let table = read_passenger_csv(file.path()).unwrap();
        assert_eq!(
            table.numeric("Age").unwrap(),
            &[Some(38.0), None, None, Some(20.0)]
        );
    }

    #[test]
    fn custom_delimiter() {
        let file = write_tmp("Survived;Pclass;Sex;Age\n1;2;female;30\n");
        let config = CsvReaderConfig {
            delimiter: b';',
            ..CsvReaderConfig::default()
        };
        let table = read_passenger_csv_with_config(file.path(), &config).unwrap();
        assert_eq!(table.numeric("Pclass").unwrap(), &[Some(2.0)]);
    }
}
