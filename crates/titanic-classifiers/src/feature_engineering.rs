//! Derive the numeric model inputs from raw passenger columns.
//!
//! The steps mutate the `PassengerTable` in place so the engineered table can
//! still be previewed and plotted alongside the untouched columns:
//!
//! * `Sex` becomes 1 for "female" and 0 for "male".
//! * Missing `Age` cells take the mean of the observed ages of the whole table.
//!   The mean is taken before the train/test split, so test rows contribute to
//!   the fill value. Keep this ordering if results must stay comparable.
//! * `FirstClass` and `SecondClass` indicator columns are appended from
//!   `Pclass`; third class is both flags at 0.
use ndarray::{Array1, Array2};

use crate::data_handling::{Column, FeatureSet, PassengerTable};
use crate::error::DataError;

pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const PCLASS: &str = "Pclass";
pub const SURVIVED: &str = "Survived";
pub const FIRST_CLASS: &str = "FirstClass";
pub const SECOND_CLASS: &str = "SecondClass";

/// Model feature order. Coefficients and sample vectors follow it.
pub const FEATURE_COLUMNS: [&str; 4] = [SEX, AGE, FIRST_CLASS, SECOND_CLASS];

/// Map a raw Sex cell to its binary code.
pub fn sex_code(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("female") {
        Some(1.0)
    } else if value.eq_ignore_ascii_case("male") {
        Some(0.0)
    } else {
        None
    }
}

/// Replace the text `Sex` column with its 0/1 encoding.
///
/// An already encoded column is validated and left as is, so the step can be
/// re-run on an engineered table.
pub fn encode_sex(table: &mut PassengerTable) -> Result<(), DataError> {
    let encoded = match table.column(SEX) {
        Some(Column::Text(values)) => values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                let raw = value.as_deref().unwrap_or("");
                sex_code(raw).map(Some).ok_or_else(|| DataError::UnknownSex {
                    row,
                    value: raw.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(Column::Numeric(values)) => {
            for (row, value) in values.iter().enumerate() {
                match value {
                    Some(v) if *v == 0.0 || *v == 1.0 => {}
                    other => {
                        return Err(DataError::UnknownSex {
                            row,
                            value: other.map(|v| v.to_string()).unwrap_or_default(),
                        })
                    }
                }
            }
            return Ok(());
        }
        None => return Err(DataError::MissingColumn(SEX.to_string())),
    };

    table.set_column(SEX, Column::Numeric(encoded))
}

/// Fill missing ages with the mean of the observed ages. Returns the mean.
pub fn impute_age(table: &mut PassengerTable) -> Result<f64, DataError> {
    let ages = table.numeric(AGE)?;

    let observed: Vec<f64> = ages.iter().flatten().copied().filter(|a| !a.is_nan()).collect();
    if observed.is_empty() {
        return Err(DataError::EmptyColumn(AGE.to_string()));
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;

    let missing = ages.len() - observed.len();
    if missing == 0 {
        return Ok(mean);
    }

    let filled = ages
        .iter()
        .map(|v| Some(v.filter(|a| !a.is_nan()).unwrap_or(mean)))
        .collect();
    table.set_column(AGE, Column::Numeric(filled))?;
    log::debug!("Imputed {} missing ages with mean {:.4}", missing, mean);
    Ok(mean)
}

/// Append `FirstClass` and `SecondClass` indicator columns derived from `Pclass`.
pub fn add_class_indicators(table: &mut PassengerTable) -> Result<(), DataError> {
    let pclass = table.numeric(PCLASS)?;

    let mut first = Vec::with_capacity(pclass.len());
    let mut second = Vec::with_capacity(pclass.len());
    for (row, value) in pclass.iter().enumerate() {
        let p = value.ok_or_else(|| DataError::MissingValue {
            row,
            column: PCLASS.to_string(),
        })?;
        first.push(Some(if p == 1.0 { 1.0 } else { 0.0 }));
        second.push(Some(if p == 2.0 { 1.0 } else { 0.0 }));
    }

    table.set_column(FIRST_CLASS, Column::Numeric(first))?;
    table.set_column(SECOND_CLASS, Column::Numeric(second))
}

/// Run every engineering step in order. Returns the age fill value.
pub fn engineer_features(table: &mut PassengerTable) -> Result<f64, DataError> {
    encode_sex(table)?;
    let age_mean = impute_age(table)?;
    add_class_indicators(table)?;
    log::info!(
        "Engineered features {:?} (age fill value {:.4})",
        FEATURE_COLUMNS,
        age_mean
    );
    Ok(age_mean)
}

/// Build the feature matrix and label vector from an engineered table.
pub fn select_features(table: &PassengerTable) -> Result<FeatureSet, DataError> {
    let n = table.n_rows();
    let columns = FEATURE_COLUMNS
        .iter()
        .map(|name| table.numeric(name).map(|values| (*name, values)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut x = Array2::<f64>::zeros((n, FEATURE_COLUMNS.len()));
    for (c, (name, values)) in columns.iter().enumerate() {
        for (r, value) in values.iter().enumerate() {
            x[(r, c)] = value.ok_or_else(|| DataError::MissingValue {
                row: r,
                column: name.to_string(),
            })?;
        }
    }

    let y = table
        .numeric(SURVIVED)?
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if *v == 0.0 => Ok(0usize),
            Some(v) if *v == 1.0 => Ok(1usize),
            Some(v) => Err(DataError::InvalidLabel { row, value: *v }),
            None => Err(DataError::MissingValue {
                row,
                column: SURVIVED.to_string(),
            }),
        })
        .collect::<Result<Array1<usize>, _>>()?;

    Ok(FeatureSet {
        x,
        y,
        feature_names: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
    })
}
