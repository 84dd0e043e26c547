use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotly::common::{ColorScale, ColorScalePalette, ErrorData, ErrorType, Fill, Line, Mode};
use plotly::layout::{Annotation, Axis, Layout};
use plotly::{Bar, HeatMap, Plot, Scatter};

use crate::data_handling::PassengerTable;
use crate::error::DataError;
use crate::feature_engineering::{AGE, PCLASS, SEX, SURVIVED};
use crate::stats::{correlation_matrix, gaussian_kde, group_rates, quartiles};

pub const CORRELATION_TITLE: &str = "Correlation of Features";
pub const AGE_TITLE: &str = "Age vs. Survival";
pub const SEX_TITLE: &str = "Sex vs. Survival";
pub const PCLASS_TITLE: &str = "Passenger Class vs. Survival";

/// File stems of the four survival plots, in drawing order.
pub const PLOT_FILES: [&str; 4] = [
    "correlation_heatmap",
    "age_vs_survival",
    "sex_vs_survival",
    "pclass_vs_survival",
];

const KDE_POINTS: usize = 200;
/// Half-width of a violin at its widest point, in x-axis units.
const VIOLIN_HALF_WIDTH: f64 = 0.4;
const GROUP_COLORS: [&str; 2] = ["rgba(31, 119, 180, 0.5)", "rgba(255, 127, 14, 0.5)"];

/// Pearson correlation heatmap over every numeric column of the table.
pub fn plot_correlation_heatmap(table: &PassengerTable, title: &str) -> Result<Plot, DataError> {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return Err(DataError::EmptyData);
    }

    let names: Vec<String> = numeric.iter().map(|(name, _)| name.to_string()).collect();
    let columns: Vec<&[Option<f64>]> = numeric.iter().map(|(_, values)| *values).collect();
    let z = correlation_matrix(&columns);

    // One centred label per cell with the coefficient
    let mut annotations = Vec::with_capacity(names.len() * names.len());
    for (row, y) in names.iter().enumerate() {
        for (col, x) in names.iter().enumerate() {
            let r = z[row][col];
            let text = if r.is_nan() { "NaN".to_string() } else { format!("{:.2}", r) };
            annotations.push(
                Annotation::new()
                    .x(x.as_str())
                    .y(y.as_str())
                    .text(text)
                    .show_arrow(false),
            );
        }
    }

    let trace = HeatMap::new(names.clone(), names, z)
        .color_scale(ColorScale::Palette(ColorScalePalette::RdBu))
        .name("Pearson r");

    let layout = Layout::new()
        .title(title)
        .width(1000)
        .height(1000)
        .annotations(annotations);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    Ok(plot)
}

/// Violin plot of Age per Survived group, with median and interquartile markers.
pub fn plot_age_violin(table: &PassengerTable, title: &str) -> Result<Plot, DataError> {
    let age = table.numeric(AGE)?;
    let survived = table.numeric(SURVIVED)?;

    let mut plot = Plot::new();
    for (group, color) in [0.0f64, 1.0].iter().zip(GROUP_COLORS) {
        let values: Vec<f64> = age
            .iter()
            .zip(survived.iter())
            .filter_map(|(a, s)| match (a, s) {
                (Some(a), Some(s)) if s == group => Some(*a),
                _ => None,
            })
            .collect();

        if let Some(kde) = gaussian_kde(&values, KDE_POINTS) {
            let peak = kde.density.iter().cloned().fold(0.0, f64::max);
            let half_widths: Vec<f64> = kde
                .density
                .iter()
                .map(|d| d / peak * VIOLIN_HALF_WIDTH)
                .collect();

            // Outline: right edge bottom-up, then left edge top-down.
            let mut outline_x: Vec<f64> = half_widths.iter().map(|w| group + w).collect();
            let mut outline_y = kde.grid.clone();
            outline_x.extend(half_widths.iter().rev().map(|w| group - w));
            outline_y.extend(kde.grid.iter().rev());

            plot.add_trace(
                Scatter::new(outline_x, outline_y)
                    .name(&format!("Survived = {}", group))
                    .mode(Mode::Lines)
                    .fill(Fill::ToSelf)
                    .fill_color(color)
                    .line(Line::new().color(color)),
            );
        } else {
            log::warn!(
                "Not enough spread in Age for Survived = {} to estimate a density",
                group
            );
        }

        if let Some((q1, median, q3)) = quartiles(&values) {
            plot.add_trace(
                Scatter::new(vec![*group, *group], vec![q1, q3])
                    .name(&format!("IQR (Survived = {})", group))
                    .mode(Mode::Lines)
                    .line(Line::new().color("black").width(4.0))
                    .show_legend(false),
            );
            plot.add_trace(
                Scatter::new(vec![*group], vec![median])
                    .name(&format!("Median (Survived = {})", group))
                    .mode(Mode::Markers)
                    .show_legend(false),
            );
        }
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .width(1000)
            .height(600)
            .x_axis(Axis::new().title(SURVIVED))
            .y_axis(Axis::new().title(AGE)),
    );
    Ok(plot)
}

/// Bar plot of the mean survival rate per group of `key`, with 95% error bars.
pub fn plot_survival_rate_by(
    table: &PassengerTable,
    key: &str,
    labels: impl Fn(f64) -> String,
    title: &str,
) -> Result<Plot, DataError> {
    let rates = group_rates(table.numeric(key)?, table.numeric(SURVIVED)?);
    if rates.is_empty() {
        return Err(DataError::EmptyColumn(key.to_string()));
    }

    let x: Vec<String> = rates.iter().map(|r| labels(r.key)).collect();
    let y: Vec<f64> = rates.iter().map(|r| r.rate).collect();
    let ci: Vec<f64> = rates.iter().map(|r| r.ci95).collect();

    let trace = Bar::new(x, y)
        .name("Survival rate")
        .error_y(ErrorData::new(ErrorType::Data).array(ci));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(title)
            .width(1000)
            .height(600)
            .x_axis(Axis::new().title(key))
            .y_axis(Axis::new().title(SURVIVED)),
    );
    Ok(plot)
}

/// Survival rate by encoded Sex (0 = male, 1 = female).
pub fn plot_sex_survival(table: &PassengerTable, title: &str) -> Result<Plot, DataError> {
    plot_survival_rate_by(
        table,
        SEX,
        |k| match k as i64 {
            0 => "male (0)".to_string(),
            1 => "female (1)".to_string(),
            other => other.to_string(),
        },
        title,
    )
}

/// Survival rate by passenger class.
pub fn plot_pclass_survival(table: &PassengerTable, title: &str) -> Result<Plot, DataError> {
    plot_survival_rate_by(table, PCLASS, |k| format!("{}", k as i64), title)
}

/// Build the four plots for an engineered table, paired with their file stems.
pub fn survival_plots(table: &PassengerTable) -> Result<Vec<(&'static str, Plot)>, DataError> {
    Ok(vec![
        (PLOT_FILES[0], plot_correlation_heatmap(table, CORRELATION_TITLE)?),
        (PLOT_FILES[1], plot_age_violin(table, AGE_TITLE)?),
        (PLOT_FILES[2], plot_sex_survival(table, SEX_TITLE)?),
        (PLOT_FILES[3], plot_pclass_survival(table, PCLASS_TITLE)?),
    ])
}

/// Write each plot as a standalone HTML file under `dir`, creating it if needed.
pub fn write_plots(plots: &[(&str, Plot)], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(plots.len());
    for (stem, plot) in plots {
        let path = dir.join(format!("{}.html", stem));
        fs::write(&path, plot.to_html())
            .with_context(|| format!("Failed to write plot: {}", path.display()))?;
        log::info!("Saved plot to {}", path.display());
        written.push(path);
    }
    Ok(written)
}
