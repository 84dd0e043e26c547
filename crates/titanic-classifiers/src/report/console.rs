use std::fmt::Write as _;

use ndarray::{Array1, Array2};

use crate::pipeline::PipelineOutcome;

/// `[0 1 0]`
pub fn format_labels(labels: &Array1<usize>) -> String {
    let cells: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    format!("[{}]", cells.join(" "))
}

/// Bracketed rows, one per line, in the layout of a printed 2-D array:
///
/// ```text
/// [[0.88 0.12]
///  [0.07 0.93]]
/// ```
pub fn format_matrix(matrix: &Array2<f64>, precision: usize) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .into_iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.*}", precision, v)).collect();
            format!("[{}]", cells.join(" "))
        })
        .collect();
    format!("[{}]", rows.join("\n "))
}

pub fn format_coefficients(names: &[String], coefficients: &Array1<f64>, intercept: f64) -> String {
    let width = names
        .iter()
        .map(|n| n.len())
        .chain(std::iter::once("intercept".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (name, coef) in names.iter().zip(coefficients.iter()) {
        let _ = writeln!(out, "  {:<w$}  {:>10.6}", name, coef, w = width);
    }
    let _ = writeln!(out, "  {:<w$}  {:>10.6}", "intercept", intercept, w = width);
    out
}

/// Render the console summary of a finished run.
pub fn render_summary(outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", outcome.raw_preview);
    let _ = writeln!(out, "{}", outcome.engineered_preview);
    let _ = writeln!(out, "Train accuracy: {:.6}", outcome.train_score);
    let _ = writeln!(out, "Test accuracy:  {:.6}", outcome.test_score);
    let _ = writeln!(out, "Coefficients:");
    let _ = write!(
        out,
        "{}",
        format_coefficients(
            &outcome.feature_names,
            &outcome.model.coefficients(),
            outcome.model.intercept()
        )
    );
    let _ = writeln!(out, "Passengers: {}", outcome.samples.names.join(", "));
    let _ = writeln!(out, "{}", format_labels(&outcome.samples.predictions));
    let _ = writeln!(out, "{}", format_matrix(&outcome.samples.probabilities, 8));
    out
}

pub fn print_summary(outcome: &PipelineOutcome) {
    print!("{}", render_summary(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_space_separated() {
        assert_eq!(format_labels(&Array1::from_vec(vec![0, 1, 0])), "[0 1 0]");
        assert_eq!(format_labels(&Array1::from_vec(vec![])), "[]");
    }

    #[test]
    fn matrix_rows_on_separate_lines() {
        let m = Array2::from_shape_vec((2, 2), vec![0.875, 0.125, 0.25, 0.75]).unwrap();
        assert_eq!(format_matrix(&m, 3), "[[0.875 0.125]\n [0.250 0.750]]");
    }

    #[test]
    fn coefficients_include_intercept() {
        let names = vec!["Sex".to_string(), "Age".to_string()];
        let text = format_coefficients(&names, &Array1::from_vec(vec![1.25, -0.5]), 0.1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("Sex"));
        assert!(lines[1].contains("-0.500000"));
        assert!(lines[2].trim_start().starts_with("intercept"));
    }
}
